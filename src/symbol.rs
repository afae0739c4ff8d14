//! C4: symbol tables. The compiler keeps one per scope (one for the
//! current function's locals, one shared table for the top-level
//! program's globals) mapping a name to a stable slot index, with a
//! companion `objects[]` array giving the reverse mapping back to the
//! name for diagnostics and the `-g`/disassembly views.
//!
//! Uses the same djb2 hash as C3's `LuciMap` (`crate::map::h0`) over a
//! closed, linearly-probed table, growing through the same prime ladder,
//! since the slot itself only ever stores a `usize` and doesn't need
//! `LuciMap`'s double hashing or GC-aware keys.

use crate::map::h0;

/// `NBUCKETS` from `examples/original_source/src/symbol.c`: its own prime
/// ladder, distinct from `map.rs::CAPACITIES` (spec.md's map starts at 7).
const CAPACITIES: &[usize] = &[
  97, 193, 389, 769, 1543, 3079, 6151, 12289, 24593, 49157, 98317, 196613, 393241, 786433,
  1572869,
];

#[derive(Clone, Copy)]
enum Slot {
  Empty,
  Occupied(usize), // index into `objects`
}

pub struct SymbolTable {
  objects: Vec<String>,
  slots: Vec<Slot>,
  cap_index: usize,
}

impl Default for SymbolTable {
  fn default() -> Self {
    SymbolTable {
      objects: vec![],
      slots: vec![Slot::Empty; CAPACITIES[0]],
      cap_index: 0,
    }
  }
}

impl SymbolTable {
  pub fn resolve(&self, name: &str) -> Option<usize> {
    let cap = self.slots.len();
    let mut idx = (h0(name.as_bytes()) % cap as u64) as usize;
    for _ in 0..cap {
      match self.slots[idx] {
        Slot::Empty => return None,
        Slot::Occupied(obj_idx) if self.objects[obj_idx] == name => return Some(obj_idx),
        Slot::Occupied(_) => {}
      }
      idx = (idx + 1) % cap;
    }
    None
  }

  /// Returns the existing slot for `name`, or declares a fresh one and
  /// returns that. Slot indices are stable for the table's lifetime:
  /// once assigned, a name never moves to a different slot, even across
  /// a grow (only the hash table used to look names up is rebuilt).
  pub fn declare(&mut self, name: &str) -> usize {
    if let Some(existing) = self.resolve(name) {
      return existing;
    }
    if self.load_factor() > 0.5 {
      self.grow();
    }
    let obj_idx = self.objects.len();
    self.objects.push(name.to_string());
    self.raw_insert(name, obj_idx);
    obj_idx
  }

  pub fn name_of(&self, slot: usize) -> &str {
    &self.objects[slot]
  }

  pub fn len(&self) -> usize {
    self.objects.len()
  }

  pub fn is_empty(&self) -> bool {
    self.objects.is_empty()
  }

  fn load_factor(&self) -> f64 {
    self.objects.len() as f64 / self.slots.len() as f64
  }

  fn raw_insert(&mut self, name: &str, obj_idx: usize) {
    let cap = self.slots.len();
    let mut idx = (h0(name.as_bytes()) % cap as u64) as usize;
    loop {
      match self.slots[idx] {
        Slot::Empty => {
          self.slots[idx] = Slot::Occupied(obj_idx);
          return;
        }
        Slot::Occupied(_) => idx = (idx + 1) % cap,
      }
    }
  }

  fn grow(&mut self) {
    let next = (self.cap_index + 1).min(CAPACITIES.len() - 1);
    self.cap_index = next;
    self.slots = vec![Slot::Empty; CAPACITIES[next]];
    for (obj_idx, name) in self.objects.clone().into_iter().enumerate() {
      self.raw_insert(&name, obj_idx);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn declaring_the_same_name_twice_returns_the_same_slot() {
    let mut t = SymbolTable::default();
    let a = t.declare("x");
    let b = t.declare("x");
    assert_eq!(a, b);
    assert_eq!(t.len(), 1);
  }

  #[test]
  fn distinct_names_get_distinct_slots_and_resolve_back() {
    let mut t = SymbolTable::default();
    let a = t.declare("a");
    let b = t.declare("b");
    assert_ne!(a, b);
    assert_eq!(t.resolve("a"), Some(a));
    assert_eq!(t.resolve("b"), Some(b));
    assert_eq!(t.resolve("c"), None);
  }

  #[test]
  fn survives_growth_past_the_initial_capacity() {
    let mut t = SymbolTable::default();
    let mut slots = vec![];
    for i in 0..60 {
      slots.push(t.declare(&format!("v{i}")));
    }
    for (i, slot) in slots.iter().enumerate() {
      assert_eq!(t.resolve(&format!("v{i}")), Some(*slot));
      assert_eq!(t.name_of(*slot), format!("v{i}"));
    }
  }
}
