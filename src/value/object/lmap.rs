use crate::gc::Arena;
use crate::map::LuciMap;
use crate::value::{LString, Value};

/// Backing storage for `Value::Map`: a user-visible hash table built on
/// the C3 implementation (`crate::map::LuciMap`).
#[derive(Default, Clone)]
pub struct LMap {
  pub table: LuciMap,
}

impl LMap {
  pub fn get(&self, key: &[u8], strings: &Arena<LString>) -> Option<Value> {
    self.table.get(key, strings)
  }

  pub fn insert(
    &mut self,
    key: crate::gc::GcRef<LString>,
    value: Value,
    strings: &Arena<LString>,
  ) {
    self.table.insert(key, value, strings)
  }

  pub fn len(&self) -> usize {
    self.table.len()
  }

  pub fn is_empty(&self) -> bool {
    self.table.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (crate::gc::GcRef<LString>, Value)> + '_ {
    self.table.iter()
  }
}
