//! Per-type dispatch table (spec §4.2's `TypeDescriptor`). One static
//! record per `TypeTag`, selected once via `descriptor_for` and then
//! called through uniformly — `descriptor_for(v.tag()).repr(heap, v)`
//! reads the same at every call site regardless of which type `v` holds,
//! which is the dispatch contract the spec asks for.

use super::{Heap, TypeTag, Value};

pub struct TypeDescriptor {
  pub name: &'static str,
  pub repr: fn(&Heap, Value) -> String,
  pub asbool: fn(&Heap, Value) -> bool,
  pub len: Option<fn(&Heap, Value) -> Option<i64>>,
}

const NIL: TypeDescriptor = TypeDescriptor {
  name: "nil",
  repr: |_, _| "nil".to_string(),
  asbool: |_, _| false,
  len: None,
};

const INT: TypeDescriptor = TypeDescriptor {
  name: "int",
  repr: |_, v| match v {
    Value::Int(i) => i.to_string(),
    _ => unreachable!(),
  },
  asbool: |_, v| matches!(v, Value::Int(i) if i != 0),
  len: None,
};

const FLOAT: TypeDescriptor = TypeDescriptor {
  name: "float",
  repr: |_, v| match v {
    Value::Float(f) => format!("{f}"),
    _ => unreachable!(),
  },
  asbool: |_, v| matches!(v, Value::Float(f) if f != 0.0),
  len: None,
};

const STR: TypeDescriptor = TypeDescriptor {
  name: "str",
  repr: |heap, v| match v {
    Value::Str(r) => format!("{:?}", heap.strings.get(r).as_str_lossy()),
    _ => unreachable!(),
  },
  asbool: |heap, v| match v {
    Value::Str(r) => !heap.strings.get(r).is_empty(),
    _ => unreachable!(),
  },
  len: Some(|heap, v| match v {
    Value::Str(r) => Some(heap.strings.get(r).len() as i64),
    _ => unreachable!(),
  }),
};

const LIST: TypeDescriptor = TypeDescriptor {
  name: "list",
  repr: |heap, v| match v {
    Value::List(r) => {
      let items = &heap.lists.get(r).items;
      let parts: Vec<String> = items.iter().map(|it| heap.repr(*it)).collect();
      format!("[{}]", parts.join(", "))
    }
    _ => unreachable!(),
  },
  asbool: |heap, v| match v {
    Value::List(r) => !heap.lists.get(r).items.is_empty(),
    _ => unreachable!(),
  },
  len: Some(|heap, v| match v {
    Value::List(r) => Some(heap.lists.get(r).items.len() as i64),
    _ => unreachable!(),
  }),
};

const MAP: TypeDescriptor = TypeDescriptor {
  name: "map",
  repr: |heap, v| match v {
    Value::Map(r) => {
      let pairs: Vec<String> = heap
        .maps
        .get(r)
        .table
        .iter()
        .map(|(k, val)| {
          format!(
            "{:?}: {}",
            heap.strings.get(k).as_str_lossy(),
            heap.repr(val)
          )
        })
        .collect();
      format!("{{{}}}", pairs.join(", "))
    }
    _ => unreachable!(),
  },
  asbool: |heap, v| match v {
    Value::Map(r) => !heap.maps.get(r).is_empty(),
    _ => unreachable!(),
  },
  len: Some(|heap, v| match v {
    Value::Map(r) => Some(heap.maps.get(r).len() as i64),
    _ => unreachable!(),
  }),
};

const FILE: TypeDescriptor = TypeDescriptor {
  name: "file",
  repr: |heap, v| match v {
    Value::File(r) => format!("<file '{}' mode '{}'>", heap.files.get(r).path, heap.files.get(r).mode),
    _ => unreachable!(),
  },
  asbool: |heap, v| match v {
    Value::File(r) => !heap.files.get(r).is_closed(),
    _ => unreachable!(),
  },
  len: None,
};

const ITER: TypeDescriptor = TypeDescriptor {
  name: "iterator",
  repr: |_, _| "<iterator>".to_string(),
  asbool: |_, _| true,
  len: None,
};

const FUNC: TypeDescriptor = TypeDescriptor {
  name: "func",
  repr: |heap, v| match v {
    Value::Func(r) => format!("<func {}>", heap.funcs.get(r).name()),
    _ => unreachable!(),
  },
  asbool: |_, _| true,
  len: None,
};

const NATIVE: TypeDescriptor = TypeDescriptor {
  name: "nativefunc",
  repr: |_, _| "<built-in function>".to_string(),
  asbool: |_, _| true,
  len: None,
};

pub fn descriptor_for(tag: TypeTag) -> &'static TypeDescriptor {
  match tag {
    TypeTag::Nil => &NIL,
    TypeTag::Int => &INT,
    TypeTag::Float => &FLOAT,
    TypeTag::Str => &STR,
    TypeTag::List => &LIST,
    TypeTag::Map => &MAP,
    TypeTag::File => &FILE,
    TypeTag::Iter => &ITER,
    TypeTag::Func => &FUNC,
    TypeTag::Native => &NATIVE,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::value::LString;

  #[test]
  fn nil_is_always_falsy() {
    assert!(!descriptor_for(TypeTag::Nil).asbool(&Heap::default(), Value::Nil));
  }

  #[test]
  fn zero_int_is_falsy_nonzero_is_truthy() {
    let heap = Heap::default();
    assert!(!descriptor_for(TypeTag::Int).asbool(&heap, Value::Int(0)));
    assert!(descriptor_for(TypeTag::Int).asbool(&heap, Value::Int(3)));
  }

  #[test]
  fn empty_string_is_falsy() {
    let mut heap = Heap::default();
    let r = heap.alloc_string(LString::new(vec![]));
    assert!(!heap.asbool(Value::Str(r)));
  }

  #[test]
  fn list_repr_nests_element_reprs() {
    let mut heap = Heap::default();
    let inner = heap.alloc_string(LString::new(b"a".to_vec()));
    let list = heap.alloc_list(crate::value::LList::new(vec![Value::Int(1), Value::Str(inner)]));
    assert_eq!(heap.repr(Value::List(list)), "[1, \"a\"]");
  }
}
