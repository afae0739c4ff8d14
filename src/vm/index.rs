//! `CGET`/`CPUT`: container indexing. List and String indices accept
//! negative values Python-style (the Open Question resolution in
//! `SPEC_FULL.md`); Map indices must be strings, since C3's `LuciMap` is
//! string-keyed.

use diag::Error;

use crate::value::{object::resolve_index, Heap, LString, Value};

pub fn cget(heap: &Heap, container: Value, idx: Value) -> Result<Value, Error> {
  match container {
    Value::List(r) => {
      let i = require_int("CGET", idx)?;
      let items = &heap.lists.get(r).items;
      let resolved = resolve_index(i, items.len())
        .ok_or_else(|| Error::lookup("list index out of range").with_opcode("CGET"))?;
      Ok(items[resolved])
    }
    Value::Str(r) => {
      let i = require_int("CGET", idx)?;
      let bytes = &heap.strings.get(r).bytes;
      let resolved = resolve_index(i, bytes.len())
        .ok_or_else(|| Error::lookup("string index out of range").with_opcode("CGET"))?;
      Ok(Value::Int(bytes[resolved] as i64))
    }
    Value::Map(r) => {
      let key = require_str("CGET", idx)?;
      let bytes = heap.strings.get(key).bytes.clone();
      heap
        .maps
        .get(r)
        .get(&bytes, &heap.strings)
        .ok_or_else(|| Error::lookup("key not found").with_opcode("CGET"))
    }
    other => Err(type_error("CGET", "list, str or map", other)),
  }
}

pub fn cput(heap: &mut Heap, container: Value, idx: Value, value: Value) -> Result<(), Error> {
  match container {
    Value::List(r) => {
      let i = require_int("CPUT", idx)?;
      let len = heap.lists.get(r).items.len();
      let resolved = resolve_index(i, len)
        .ok_or_else(|| Error::lookup("list index out of range").with_opcode("CPUT"))?;
      heap.lists.get_mut(r).items[resolved] = value;
      Ok(())
    }
    Value::Map(r) => {
      let key = require_str("CPUT", idx)?;
      let Heap { maps, strings, .. } = heap;
      maps.get_mut(r).insert(key, value, strings);
      Ok(())
    }
    other => Err(type_error("CPUT", "list or map", other)),
  }
}

fn require_int(opcode: &'static str, v: Value) -> Result<i64, Error> {
  match v {
    Value::Int(i) => Ok(i),
    other => Err(type_error(opcode, "int index", other)),
  }
}

fn require_str(opcode: &'static str, v: Value) -> Result<crate::gc::GcRef<LString>, Error> {
  match v {
    Value::Str(r) => Ok(r),
    other => Err(type_error(opcode, "str key", other)),
  }
}

fn type_error(opcode: &'static str, expected: &str, got: Value) -> Error {
  Error::ty(format!("expected {expected}, got {}", got.tag().name())).with_opcode(opcode)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::value::LList;

  #[test]
  fn negative_list_index_wraps() {
    let mut heap = Heap::default();
    let r = heap.alloc_list(LList::new(vec![Value::Int(10), Value::Int(20)]));
    let v = cget(&heap, Value::List(r), Value::Int(-1)).unwrap();
    assert_eq!(v, Value::Int(20));
  }

  #[test]
  fn list_index_out_of_range_is_a_lookup_error() {
    let mut heap = Heap::default();
    let r = heap.alloc_list(LList::new(vec![Value::Int(1)]));
    let err = cget(&heap, Value::List(r), Value::Int(5)).unwrap_err();
    assert_eq!(err.kind, diag::Kind::Lookup);
  }

  #[test]
  fn cput_on_map_inserts_by_string_key() {
    let mut heap = Heap::default();
    let m = heap.alloc_map(crate::value::LMap::default());
    let k = heap.alloc_string(LString::new(b"a".to_vec()));
    cput(&mut heap, Value::Map(m), Value::Str(k), Value::Int(1)).unwrap();
    let got = cget(&heap, Value::Map(m), Value::Str(k)).unwrap();
    assert_eq!(got, Value::Int(1));
  }
}
