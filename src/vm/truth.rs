//! Truthiness, split out as its own concern (mirroring
//! `examples/jprochazk-hebi/src/isolate/truth.rs`) since `NOT`, `JMPF`,
//! and the eager `LGAND`/`LGOR` opcodes all need the same coercion:
//! `nil` and zero-valued scalars are falsy, empty strings/lists/maps are
//! falsy, everything else is truthy. The per-type rule itself lives in
//! each `TypeDescriptor.asbool`; this is just the call site VM opcodes
//! share.

use crate::value::{Heap, Value};

pub fn is_truthy(heap: &Heap, v: Value) -> bool {
  heap.asbool(v)
}
