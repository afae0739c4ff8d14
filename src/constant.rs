//! C5: the constant table. Append-only by design: every literal the
//! compiler encounters (ints, floats, strings, nested function protos)
//! gets pushed once, in emission order, and `LOADK` addresses it by the
//! index `push` returns. No interning — two occurrences of the same
//! literal get two slots, matching the "append-only" framing rather than
//! a dedup scheme we'd have to invent.

use crate::value::Value;

#[derive(Default)]
pub struct ConstantTable {
  values: Vec<Value>,
}

impl ConstantTable {
  pub fn push(&mut self, v: Value) -> usize {
    self.values.push(v);
    self.values.len() - 1
  }

  pub fn get(&self, idx: usize) -> Value {
    self.values[idx]
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  pub fn into_vec(self) -> Vec<Value> {
    self.values
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn push_returns_sequential_indices() {
    let mut t = ConstantTable::default();
    assert_eq!(t.push(Value::Int(1)), 0);
    assert_eq!(t.push(Value::Int(2)), 1);
    assert_eq!(t.get(0), Value::Int(1));
    assert_eq!(t.get(1), Value::Int(2));
  }

  #[test]
  fn duplicate_literals_each_get_their_own_slot() {
    let mut t = ConstantTable::default();
    let a = t.push(Value::Int(7));
    let b = t.push(Value::Int(7));
    assert_ne!(a, b);
    assert_eq!(t.len(), 2);
  }
}
