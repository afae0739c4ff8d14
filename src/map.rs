//! C3: open-addressed, double-hashed string-keyed map.
//!
//! Grounded on `examples/original_source/src/map.c` (probe sequence, the
//! prime capacity ladder, the 0.6/0.2 grow/shrink thresholds, the
//! probe-preserving delete) and `src/stringtype.c` (the djb2 + sdbm hash
//! pair used for the double hash). Keys are GC string refs; values are
//! `Value`s, both `Copy`, so growing/shrinking the table is just moving
//! pairs around, no deep copies.

use crate::gc::GcRef;
use crate::value::{LString, Value};

/// Capacities the table grows/shrinks through. Primes avoid a probe
/// sequence that cycles through only a fraction of the table, same
/// rationale as `table_sizes[]` in the original.
pub(crate) const CAPACITIES: &[usize] = &[
  7, 17, 43, 97, 193, 389, 769, 1543, 3079, 6151, 12289, 24593, 49157, 98317, 196613, 393241,
  786433, 1572869,
];

const GROW_LOAD: f64 = 0.6;
const SHRINK_LOAD: f64 = 0.2;

#[derive(Clone, Copy)]
enum Slot {
  Empty,
  Deleted,
  Occupied(GcRef<LString>, Value),
}

#[derive(Clone)]
pub struct LuciMap {
  slots: Vec<Slot>,
  cap_index: usize,
  len: usize,
}

impl Default for LuciMap {
  fn default() -> Self {
    LuciMap {
      slots: vec![Slot::Empty; CAPACITIES[0]],
      cap_index: 0,
      len: 0,
    }
  }
}

/// djb2, as `string_hash_0`.
pub(crate) fn h0(bytes: &[u8]) -> u64 {
  let mut h: u64 = 5381;
  for &c in bytes {
    h = h.wrapping_shl(5).wrapping_add(h).wrapping_add(c as u64);
  }
  h
}

/// sdbm, as `string_hash_1`.
fn h1(bytes: &[u8]) -> u64 {
  let mut h: u64 = 0;
  for &c in bytes {
    h = (c as u64)
      .wrapping_add(h.wrapping_shl(6))
      .wrapping_add(h.wrapping_shl(16))
      .wrapping_sub(h);
  }
  h
}

impl LuciMap {
  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  /// Quadratic double hashing: `index_i = (h0 + i*i*h1) mod cap`, the
  /// `GET_INDEX(H0,H1,I,N)` macro from the original, not a fixed-step
  /// linear probe.
  fn slot_for(h0: u64, h1: u64, i: usize, cap: usize) -> usize {
    let cap = cap as u64;
    let i = i as u64 % cap;
    let quad = (i * i) % cap;
    (((h0 % cap) + (quad * (h1 % cap)) % cap) % cap) as usize
  }

  fn find_slot(&self, bytes: &[u8], strings: &crate::gc::Arena<LString>) -> Option<usize> {
    let cap = self.slots.len();
    let h0 = h0(bytes);
    let h1 = h1(bytes);
    for i in 0..cap {
      let idx = Self::slot_for(h0, h1, i, cap);
      match self.slots[idx] {
        Slot::Empty => return None,
        Slot::Deleted => {}
        Slot::Occupied(key, _) if strings.get(key).bytes == bytes => return Some(idx),
        Slot::Occupied(_, _) => {}
      }
    }
    None
  }

  pub fn get(&self, bytes: &[u8], strings: &crate::gc::Arena<LString>) -> Option<Value> {
    self.find_slot(bytes, strings).map(|idx| match self.slots[idx] {
      Slot::Occupied(_, v) => v,
      _ => unreachable!(),
    })
  }

  pub fn insert(
    &mut self,
    key: GcRef<LString>,
    value: Value,
    strings: &crate::gc::Arena<LString>,
  ) {
    let bytes = strings.get(key).bytes.clone();
    if let Some(idx) = self.find_slot(&bytes, strings) {
      self.slots[idx] = Slot::Occupied(key, value);
      return;
    }
    if self.load_factor() > GROW_LOAD {
      self.resize(self.cap_index + 1, strings);
    }
    self.raw_insert(key, value, strings);
    self.len += 1;
  }

  fn raw_insert(&mut self, key: GcRef<LString>, value: Value, strings: &crate::gc::Arena<LString>) {
    let bytes = strings.get(key).bytes.clone();
    let cap = self.slots.len();
    let h0 = h0(&bytes);
    let h1 = h1(&bytes);
    for i in 0..cap {
      let idx = Self::slot_for(h0, h1, i, cap);
      match self.slots[idx] {
        Slot::Empty | Slot::Deleted => {
          self.slots[idx] = Slot::Occupied(key, value);
          return;
        }
        Slot::Occupied(_, _) => {}
      }
    }
    unreachable!("map probe exhausted capacity without finding a free slot")
  }

  /// Removes `bytes`, preserving the probe sequence for every key that
  /// comes after it by re-threading the rest of the chain, exactly as
  /// `mt_remove` does, rather than leaving a `Deleted` tombstone that
  /// would break lookups for keys further down the same chain.
  pub fn remove(&mut self, bytes: &[u8], strings: &crate::gc::Arena<LString>) -> Option<Value> {
    let idx = self.find_slot(bytes, strings)?;
    let removed = match self.slots[idx] {
      Slot::Occupied(_, v) => v,
      _ => unreachable!(),
    };
    self.slots[idx] = Slot::Empty;
    self.len -= 1;

    let cap = self.slots.len();
    let mut scan = (idx + 1) % cap;
    while let Slot::Occupied(k, v) = self.slots[scan] {
      self.slots[scan] = Slot::Empty;
      self.raw_insert(k, v, strings);
      scan = (scan + 1) % cap;
      if scan == idx {
        break;
      }
    }

    if self.cap_index > 0 && self.load_factor() < SHRINK_LOAD {
      self.resize(self.cap_index - 1, strings);
    }
    Some(removed)
  }

  fn load_factor(&self) -> f64 {
    self.len as f64 / self.slots.len() as f64
  }

  fn resize(&mut self, new_index: usize, strings: &crate::gc::Arena<LString>) {
    let new_index = new_index.min(CAPACITIES.len() - 1);
    let old_slots = std::mem::replace(&mut self.slots, vec![Slot::Empty; CAPACITIES[new_index]]);
    self.cap_index = new_index;
    self.len = 0;
    for slot in old_slots {
      if let Slot::Occupied(k, v) = slot {
        self.raw_insert(k, v, strings);
        self.len += 1;
      }
    }
  }

  pub fn iter<'a>(&'a self) -> impl Iterator<Item = (GcRef<LString>, Value)> + 'a {
    self.slots.iter().filter_map(|s| match s {
      Slot::Occupied(k, v) => Some((*k, *v)),
      _ => None,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::gc::Arena;

  fn setup() -> Arena<LString> {
    Arena::default()
  }

  fn mk(strings: &mut Arena<LString>, s: &str) -> GcRef<LString> {
    strings.alloc(LString::new(s.as_bytes().to_vec()))
  }

  #[test]
  fn insert_and_get_roundtrip() {
    let mut strings = setup();
    let mut map = LuciMap::default();
    let k = mk(&mut strings, "answer");
    map.insert(k, Value::Int(42), &strings);
    assert_eq!(map.get(b"answer", &strings), Some(Value::Int(42)));
    assert_eq!(map.get(b"missing", &strings), None);
  }

  #[test]
  fn grows_past_load_threshold_and_keeps_all_keys() {
    let mut strings = setup();
    let mut map = LuciMap::default();
    let mut keys = vec![];
    for i in 0..30 {
      let k = mk(&mut strings, &format!("k{i}"));
      map.insert(k, Value::Int(i), &strings);
      keys.push((k, i));
    }
    assert_eq!(map.len(), 30);
    for (_, i) in &keys {
      assert_eq!(
        map.get(format!("k{i}").as_bytes(), &strings),
        Some(Value::Int(*i))
      );
    }
  }

  #[test]
  fn remove_preserves_probe_chain_for_later_keys() {
    let mut strings = setup();
    let mut map = LuciMap::default();
    let mut inserted = vec![];
    for i in 0..10 {
      let k = mk(&mut strings, &format!("key{i}"));
      map.insert(k, Value::Int(i), &strings);
      inserted.push(i);
    }
    map.remove(b"key3", &strings);
    assert_eq!(map.get(b"key3", &strings), None);
    for i in inserted {
      if i == 3 {
        continue;
      }
      assert_eq!(
        map.get(format!("key{i}").as_bytes(), &strings),
        Some(Value::Int(i)),
        "key{i} should survive removal of key3"
      );
    }
  }

  #[test]
  fn overwrite_existing_key_does_not_grow_len() {
    let mut strings = setup();
    let mut map = LuciMap::default();
    let k = mk(&mut strings, "x");
    map.insert(k, Value::Int(1), &strings);
    let k2 = mk(&mut strings, "x");
    map.insert(k2, Value::Int(2), &strings);
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(b"x", &strings), Some(Value::Int(2)));
  }
}
