//! Arithmetic and bitwise dispatch, grounded on the shape (a sibling
//! module doing nothing but binary-operator dispatch) of
//! `examples/jprochazk-hebi/src/isolate/binop.rs`. Numeric coercion
//! (int promoted to float when mixed) happens here; string/list `+`
//! (concatenation) is the one non-numeric case the operator set covers.

use diag::Error;

use crate::opcode::Op;
use crate::value::{Heap, LList, LString, Value};

pub fn neg(heap: &mut Heap, v: Value) -> Result<Value, Error> {
  match v {
    Value::Int(i) => i
      .checked_neg()
      .map(Value::Int)
      .ok_or_else(|| Error::value("integer overflow negating").with_opcode("NEG")),
    Value::Float(f) => Ok(Value::Float(-f)),
    other => Err(type_error("NEG", "int or float", other)),
  }
}

pub fn bwnot(v: Value) -> Result<Value, Error> {
  match v {
    Value::Int(i) => Ok(Value::Int(!i)),
    other => Err(type_error("BWNOT", "int", other)),
  }
}

pub fn arith(heap: &mut Heap, op: Op, lhs: Value, rhs: Value) -> Result<Value, Error> {
  match (lhs, rhs) {
    (Value::Int(a), Value::Int(b)) => int_arith(op, a, b),
    (Value::Int(a), Value::Float(b)) => float_arith(op, a as f64, b),
    (Value::Float(a), Value::Int(b)) => float_arith(op, a, b as f64),
    (Value::Float(a), Value::Float(b)) => float_arith(op, a, b),
    (Value::Str(a), Value::Str(b)) if op == Op::Add => {
      let mut bytes = heap.strings.get(a).bytes.clone();
      bytes.extend_from_slice(&heap.strings.get(b).bytes);
      Ok(Value::Str(heap.alloc_string(LString::new(bytes))))
    }
    (Value::List(a), Value::List(b)) if op == Op::Add => {
      let mut items = heap.lists.get(a).items.clone();
      items.extend_from_slice(&heap.lists.get(b).items);
      Ok(Value::List(heap.alloc_list(LList::new(items))))
    }
    (Value::Map(a), Value::Map(b)) if op == Op::Add => {
      let mut map = heap.maps.get(a).clone();
      for (key, value) in heap.maps.get(b).iter() {
        map.insert(key, value, &heap.strings);
      }
      Ok(Value::Map(heap.alloc_map(map)))
    }
    (Value::Str(a), Value::Int(b)) if op == Op::Mul => {
      if b < 0 {
        return Err(Error::value("string repetition count must not be negative").with_opcode(op.mnemonic()));
      }
      let unit = heap.strings.get(a).bytes.clone();
      let bytes = unit.repeat(b as usize);
      Ok(Value::Str(heap.alloc_string(LString::new(bytes))))
    }
    (lhs, rhs) => Err(Error::ty(format!(
      "unsupported operand types for {}: {} and {}",
      op.mnemonic(),
      lhs.tag().name(),
      rhs.tag().name()
    ))
    .with_opcode(op.mnemonic())),
  }
}

fn int_arith(op: Op, a: i64, b: i64) -> Result<Value, Error> {
  let overflow = || Error::value("integer overflow").with_opcode(op.mnemonic());
  let div_zero = || Error::value("division by zero").with_opcode(op.mnemonic());
  match op {
    Op::Add => a.checked_add(b).map(Value::Int).ok_or_else(overflow),
    Op::Sub => a.checked_sub(b).map(Value::Int).ok_or_else(overflow),
    Op::Mul => a.checked_mul(b).map(Value::Int).ok_or_else(overflow),
    Op::Div => {
      if b == 0 {
        Err(div_zero())
      } else {
        a.checked_div(b).map(Value::Int).ok_or_else(overflow)
      }
    }
    Op::Mod => {
      if b == 0 {
        Err(div_zero())
      } else {
        a.checked_rem(b).map(Value::Int).ok_or_else(overflow)
      }
    }
    Op::Pow => {
      if b >= 0 {
        a.checked_pow(b as u32).map(Value::Int).ok_or_else(overflow)
      } else {
        Ok(Value::Float((a as f64).powf(b as f64)))
      }
    }
    Op::BwAnd => Ok(Value::Int(a & b)),
    Op::BwOr => Ok(Value::Int(a | b)),
    Op::BwXor => Ok(Value::Int(a ^ b)),
    _ => unreachable!("int_arith called with non-arithmetic opcode"),
  }
}

fn float_arith(op: Op, a: f64, b: f64) -> Result<Value, Error> {
  let div_zero = || Error::value("division by zero").with_opcode(op.mnemonic());
  match op {
    Op::Add => Ok(Value::Float(a + b)),
    Op::Sub => Ok(Value::Float(a - b)),
    Op::Mul => Ok(Value::Float(a * b)),
    Op::Div if b == 0.0 => Err(div_zero()),
    Op::Div => Ok(Value::Float(a / b)),
    Op::Mod => Err(Error::ty("modulus is defined only for integers").with_opcode(op.mnemonic())),
    Op::Pow => Ok(Value::Float(a.powf(b))),
    Op::BwAnd | Op::BwOr | Op::BwXor => {
      Err(Error::ty("bitwise operators require int operands").with_opcode(op.mnemonic()))
    }
    _ => unreachable!("float_arith called with non-arithmetic opcode"),
  }
}

fn type_error(opcode: &'static str, expected: &str, got: Value) -> Error {
  Error::ty(format!("expected {expected}, got {}", got.tag().name())).with_opcode(opcode)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn mixed_int_float_promotes_to_float() {
    let mut heap = Heap::default();
    let r = arith(&mut heap, Op::Add, Value::Int(1), Value::Float(0.5)).unwrap();
    assert_eq!(r, Value::Float(1.5));
  }

  #[test]
  fn division_by_zero_is_a_value_error() {
    let mut heap = Heap::default();
    let err = arith(&mut heap, Op::Div, Value::Int(1), Value::Int(0)).unwrap_err();
    assert_eq!(err.kind, diag::Kind::Value);
  }

  #[test]
  fn string_concatenation_allocates_a_new_string() {
    let mut heap = Heap::default();
    let a = heap.alloc_string(LString::new(b"foo".to_vec()));
    let b = heap.alloc_string(LString::new(b"bar".to_vec()));
    let r = arith(&mut heap, Op::Add, Value::Str(a), Value::Str(b)).unwrap();
    let Value::Str(r) = r else { panic!() };
    assert_eq!(heap.strings.get(r).bytes, b"foobar");
  }

  #[test]
  fn bitwise_and_rejects_floats() {
    let mut heap = Heap::default();
    let err = arith(&mut heap, Op::BwAnd, Value::Float(1.0), Value::Int(2)).unwrap_err();
    assert_eq!(err.kind, diag::Kind::Type);
  }
}
