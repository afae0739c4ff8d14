//! `MKITER`/`ITERJUMP` support. The cursor logic itself lives on `LIter`
//! (`value/object/iter.rs`); this module only adapts it to the VM's
//! value-level interface, including turning a `Map` into an iterator
//! over its keys.

use diag::Error;

use crate::value::{Heap, LIter, LList, Value};

pub fn make_iter(heap: &mut Heap, container: Value) -> Result<Value, Error> {
  match container {
    Value::Iter(_) => Ok(container),
    Value::List(r) => Ok(Value::Iter(heap.alloc_iter(LIter::over_list(r)))),
    Value::Str(r) => Ok(Value::Iter(heap.alloc_iter(LIter::over_str(r)))),
    Value::Map(r) => {
      let keys: Vec<Value> = heap.maps.get(r).table.iter().map(|(k, _)| Value::Str(k)).collect();
      let list_ref = heap.alloc_list(LList::new(keys));
      Ok(Value::Iter(heap.alloc_iter(LIter::over_list(list_ref))))
    }
    other => Err(
      Error::ty(format!("'{}' is not iterable", other.tag().name())).with_opcode("MKITER"),
    ),
  }
}

/// Advances the iterator at the top of the stack without popping it —
/// see the comment on `Compiler::compile_for` for why both the
/// exhausted and non-exhausted paths must leave the stack the same
/// depth.
pub fn advance(heap: &mut Heap, v: Value) -> Result<Option<Value>, Error> {
  let Value::Iter(r) = v else {
    return Err(Error::ty(format!("expected iterator, got {}", v.tag().name())).with_opcode("ITERJUMP"));
  };
  let Heap {
    iters,
    lists,
    strings,
    ..
  } = heap;
  Ok(iters.get_mut(r).next(lists, strings))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn iterating_a_list_yields_each_element_then_stops() {
    let mut heap = Heap::default();
    let list = heap.alloc_list(LList::new(vec![Value::Int(1), Value::Int(2)]));
    let it = make_iter(&mut heap, Value::List(list)).unwrap();
    assert_eq!(advance(&mut heap, it).unwrap(), Some(Value::Int(1)));
    assert_eq!(advance(&mut heap, it).unwrap(), Some(Value::Int(2)));
    assert_eq!(advance(&mut heap, it).unwrap(), None);
  }

  #[test]
  fn iterating_a_map_yields_its_keys() {
    let mut heap = Heap::default();
    let mut map = crate::value::LMap::default();
    let k = heap.alloc_string(crate::value::LString::new(b"a".to_vec()));
    map.insert(k, Value::Int(1), &heap.strings);
    let m = heap.alloc_map(map);
    let it = make_iter(&mut heap, Value::Map(m)).unwrap();
    assert_eq!(advance(&mut heap, it).unwrap(), Some(Value::Str(k)));
  }
}
