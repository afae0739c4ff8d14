//! Equality and ordering. Split from `binop.rs` because equality has to
//! work across every type pair (mismatched types are just unequal, never
//! an error) while ordering is only defined for numbers and strings —
//! two different dispatch shapes sharing nothing but the popped operands.

use diag::Error;

use crate::opcode::Op;
use crate::value::{Heap, Value};

pub fn values_equal(heap: &Heap, a: Value, b: Value) -> bool {
  match (a, b) {
    (Value::Nil, Value::Nil) => true,
    (Value::Int(x), Value::Int(y)) => x == y,
    (Value::Float(x), Value::Float(y)) => x == y,
    (Value::Int(x), Value::Float(y)) | (Value::Float(y), Value::Int(x)) => x as f64 == y,
    (Value::Str(x), Value::Str(y)) => heap.strings.get(x).bytes == heap.strings.get(y).bytes,
    (Value::List(x), Value::List(y)) => {
      let (xs, ys) = (&heap.lists.get(x).items, &heap.lists.get(y).items);
      xs.len() == ys.len()
        && xs
          .iter()
          .zip(ys.iter())
          .all(|(a, b)| values_equal(heap, *a, *b))
    }
    (Value::Map(x), Value::Map(y)) => {
      let (mx, my) = (heap.maps.get(x), heap.maps.get(y));
      if mx.len() != my.len() {
        return false;
      }
      mx.table.iter().all(|(k, v)| {
        let key_bytes = &heap.strings.get(k).bytes;
        match my.get(key_bytes, &heap.strings) {
          Some(other) => values_equal(heap, v, other),
          None => false,
        }
      })
    }
    (Value::File(x), Value::File(y)) => x == y,
    (Value::Iter(x), Value::Iter(y)) => x == y,
    (Value::Func(x), Value::Func(y)) => x == y,
    (Value::Native(x), Value::Native(y)) => x == y,
    _ => false,
  }
}

pub fn compare(heap: &Heap, op: Op, lhs: Value, rhs: Value) -> Result<bool, Error> {
  use std::cmp::Ordering;
  let ord = match (lhs, rhs) {
    (Value::Int(a), Value::Int(b)) => a.cmp(&b),
    (Value::Int(a), Value::Float(b)) => (a as f64).partial_cmp(&b).unwrap_or(Ordering::Equal),
    (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(b as f64)).unwrap_or(Ordering::Equal),
    (Value::Float(a), Value::Float(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    (Value::Str(a), Value::Str(b)) => heap.strings.get(a).bytes.cmp(&heap.strings.get(b).bytes),
    (lhs, rhs) => {
      return Err(Error::ty(format!(
        "'{}' not supported between {} and {}",
        op.mnemonic(),
        lhs.tag().name(),
        rhs.tag().name()
      ))
      .with_opcode(op.mnemonic()))
    }
  };
  Ok(match op {
    Op::Lt => ord == Ordering::Less,
    Op::Gt => ord == Ordering::Greater,
    Op::Lte => ord != Ordering::Greater,
    Op::Gte => ord != Ordering::Less,
    _ => unreachable!("compare called with non-comparison opcode"),
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::value::LString;

  #[test]
  fn int_and_float_compare_numerically_equal() {
    let heap = Heap::default();
    assert!(values_equal(&heap, Value::Int(2), Value::Float(2.0)));
  }

  #[test]
  fn lists_compare_structurally() {
    let mut heap = Heap::default();
    let a = heap.alloc_list(crate::value::LList::new(vec![Value::Int(1), Value::Int(2)]));
    let b = heap.alloc_list(crate::value::LList::new(vec![Value::Int(1), Value::Int(2)]));
    assert!(values_equal(&heap, Value::List(a), Value::List(b)));
  }

  #[test]
  fn strings_order_lexicographically() {
    let mut heap = Heap::default();
    let a = heap.alloc_string(LString::new(b"abc".to_vec()));
    let b = heap.alloc_string(LString::new(b"abd".to_vec()));
    assert!(compare(&heap, Op::Lt, Value::Str(a), Value::Str(b)).unwrap());
  }

  #[test]
  fn ordering_mismatched_types_is_a_type_error() {
    let heap = Heap::default();
    let err = compare(&heap, Op::Lt, Value::Nil, Value::Int(1)).unwrap_err();
    assert_eq!(err.kind, diag::Kind::Type);
  }
}
