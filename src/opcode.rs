//! Bytecode instruction set (C6 emission target / C8 dispatch target).
//!
//! The original historically split each instruction word into an 11-bit
//! opcode and a 16-bit operand; spec §9 explicitly permits widening that
//! encoding, so each `Instr` here is a tag plus a plain `i32` operand
//! rather than a packed bitfield. The `ops!` macro mirrors the shape of
//! `instructions! { ... }` in `examples/jprochazk-hebi/src/op/mod.rs`
//! (using `paste` to generate matching constructor/name methods from one
//! list) without needing its register-machine operand encoding.

use paste::paste;

macro_rules! ops {
  ($($name:ident),+ $(,)?) => {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum Op {
      $($name),+
    }

    impl Op {
      pub fn mnemonic(self) -> &'static str {
        match self {
          $(Op::$name => stringify!($name)),+
        }
      }
    }

    paste! {
      impl Instr {
        $(
          pub fn [<$name:lower>](operand: i32) -> Instr {
            Instr { op: Op::$name, operand }
          }
        )+
      }
    }
  };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instr {
  pub op: Op,
  pub operand: i32,
}

ops! {
  Nil, Pop, Dup,
  LoadK, LoadL, StoreL, LoadG, StoreG,
  Neg, Not, BwNot,
  Add, Sub, Mul, Div, Mod, Pow,
  Eq, Neq, Lt, Gt, Lte, Gte,
  BwAnd, BwOr, BwXor, LgAnd, LgOr,
  Cget, Cput,
  MkList, MkMap, MkIter, IterJump,
  Jmp, JmpF,
  Call, Ret,
}

impl Instr {
  pub fn bare(op: Op) -> Instr {
    Instr { op, operand: 0 }
  }
}

/// Renders one function's instruction stream as `idx  MNEMONIC operand`
/// lines, for the CLI's `-p` / disassemble-only mode.
pub fn disassemble(instrs: &[Instr]) -> String {
  let mut out = String::new();
  for (idx, instr) in instrs.iter().enumerate() {
    out.push_str(&format!("{idx:>5}  {:<10} {}\n", instr.op.mnemonic(), instr.operand));
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn constructors_set_the_right_opcode_and_operand() {
    let i = Instr::loadk(3);
    assert_eq!(i.op, Op::LoadK);
    assert_eq!(i.operand, 3);
  }

  #[test]
  fn disassembly_lists_mnemonics_in_order() {
    let code = vec![Instr::loadk(0), Instr::add(0), Instr::ret(0)];
    let text = disassemble(&code);
    assert!(text.contains("LoadK"));
    assert!(text.contains("Add"));
    assert!(text.contains("Ret"));
  }
}
