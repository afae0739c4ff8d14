//! Shared test plumbing. The teacher's `check!`/`check_error!` macros
//! (`examples/jprochazk-hebi/src/tests/common/mod.rs`) snapshot a
//! program's stdout and result with `insta`; nothing here can be
//! reviewed by actually running `cargo insta review`, so these variants
//! assert directly against an expected value instead of a snapshot.

use diag::Error;

use crate::{Runtime, Value};

/// Compiles and runs `src`, returning its final value. Panics with a
/// rendered diagnostic (not a bare `Debug` dump) on failure, so a test
/// failure's output looks like what a user running `luci` would see.
pub fn eval(src: &str) -> Value {
  let mut rt = Runtime::new();
  rt.eval(src)
    .unwrap_or_else(|e| panic!("eval error: {}", diag::Report::new(&e).with_source(src)))
}

/// Like [`eval`], but renders the result through `repr()` before the
/// `Runtime` (and its heap) goes out of scope — needed for assertions on
/// heap-allocated results (strings, lists, maps) since `Value`'s own
/// `PartialEq` compares `GcRef`s, not content, for those variants.
pub fn eval_repr(src: &str) -> String {
  let mut rt = Runtime::new();
  match rt.eval(src) {
    Ok(v) => rt.repr(v),
    Err(e) => panic!("eval error: {}", diag::Report::new(&e).with_source(src)),
  }
}

pub fn eval_err(src: &str) -> Error {
  let mut rt = Runtime::new();
  rt.eval(src).expect_err("expected an evaluation error")
}

#[macro_export]
macro_rules! check {
  ($name:ident, $input:literal, $expected:expr) => {
    #[test]
    fn $name() {
      let input = indoc::indoc!($input);
      assert_eq!($crate::tests::common::eval(input), $expected);
    }
  };
}

#[macro_export]
macro_rules! check_repr {
  ($name:ident, $input:literal, $expected:literal) => {
    #[test]
    fn $name() {
      let input = indoc::indoc!($input);
      assert_eq!($crate::tests::common::eval_repr(input), $expected);
    }
  };
}

#[macro_export]
macro_rules! check_error {
  ($name:ident, $input:literal, $kind:expr) => {
    #[test]
    fn $name() {
      let input = indoc::indoc!($input);
      let err = $crate::tests::common::eval_err(input);
      assert_eq!(err.kind, $kind);
    }
  };
}
