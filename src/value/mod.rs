//! C2: the uniform object model. `Value` is the tagged union every stack
//! slot, local, constant and field holds; each non-scalar variant is a
//! `GcRef` into one of `Heap`'s per-kind arenas (C1). Dispatch on a
//! `Value`'s behavior (its `repr`, truthiness, length, indexing) goes
//! through the small `TypeDescriptor` table in `descriptor.rs`, keyed by
//! `TypeTag` — the uniform-dispatch contract spec §4.2 describes, realized
//! as a match-based table because the type set here is closed (unlike
//! `examples/jprochazk-hebi`'s `object_repr!`, which dispatches across an
//! open set of boxed trait objects).

pub mod descriptor;
pub mod object;

use std::rc::Rc;

use crate::function::LFunction;
use crate::gc::{Arena, GcRef};
pub use object::{IterSource, LFile, LIter, LList, LMap, LString};

pub use descriptor::{descriptor_for, TypeDescriptor};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
  Nil,
  Int(i64),
  Float(f64),
  Str(GcRef<LString>),
  List(GcRef<LList>),
  Map(GcRef<LMap>),
  File(GcRef<LFile>),
  Iter(GcRef<LIter>),
  Func(GcRef<LFunction>),
  /// Index into the VM's static native-function table (`builtins.rs`).
  Native(u32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeTag {
  Nil,
  Int,
  Float,
  Str,
  List,
  Map,
  File,
  Iter,
  Func,
  Native,
}

impl Value {
  pub fn tag(self) -> TypeTag {
    match self {
      Value::Nil => TypeTag::Nil,
      Value::Int(_) => TypeTag::Int,
      Value::Float(_) => TypeTag::Float,
      Value::Str(_) => TypeTag::Str,
      Value::List(_) => TypeTag::List,
      Value::Map(_) => TypeTag::Map,
      Value::File(_) => TypeTag::File,
      Value::Iter(_) => TypeTag::Iter,
      Value::Func(_) => TypeTag::Func,
      Value::Native(_) => TypeTag::Native,
    }
  }
}

impl TypeTag {
  pub fn name(self) -> &'static str {
    descriptor_for(self).name
  }
}

/// Owns every GC-managed object kind. Non-scalar `Value`s are only
/// meaningful alongside a `Heap` to resolve them through.
#[derive(Default)]
pub struct Heap {
  pub strings: Arena<LString>,
  pub lists: Arena<LList>,
  pub maps: Arena<LMap>,
  pub files: Arena<LFile>,
  pub iters: Arena<LIter>,
  pub funcs: Arena<LFunction>,
  allocations_since_gc: usize,
}

/// Allocation count at which the VM should run a collection. Chosen to
/// be small enough that tests exercise collection without needing
/// thousands of allocations; real workloads would want this much larger
/// or adaptive.
pub const GC_ALLOCATION_THRESHOLD: usize = 4096;

impl Heap {
  pub fn alloc_string(&mut self, s: LString) -> GcRef<LString> {
    self.allocations_since_gc += 1;
    self.strings.alloc(s)
  }

  pub fn alloc_list(&mut self, l: LList) -> GcRef<LList> {
    self.allocations_since_gc += 1;
    self.lists.alloc(l)
  }

  pub fn alloc_map(&mut self, m: LMap) -> GcRef<LMap> {
    self.allocations_since_gc += 1;
    self.maps.alloc(m)
  }

  pub fn alloc_file(&mut self, f: LFile) -> GcRef<LFile> {
    self.allocations_since_gc += 1;
    self.files.alloc(f)
  }

  pub fn alloc_iter(&mut self, it: LIter) -> GcRef<LIter> {
    self.allocations_since_gc += 1;
    self.iters.alloc(it)
  }

  pub fn alloc_func(&mut self, proto: Rc<crate::function::FunctionProto>) -> GcRef<LFunction> {
    self.allocations_since_gc += 1;
    self.funcs.alloc(LFunction::new(proto))
  }

  pub fn should_collect(&self) -> bool {
    self.allocations_since_gc >= GC_ALLOCATION_THRESHOLD
  }

  /// Marks every value reachable from `roots`, then sweeps every arena.
  /// Grounded on spec §4.1's "mark from the value stack, frame stack,
  /// active locals/constants, and the global object array".
  pub fn collect<I: IntoIterator<Item = Value>>(&mut self, roots: I) {
    for root in roots {
      self.mark_value(root);
    }
    self.strings.sweep(|_| {});
    self.lists.sweep(|_| {});
    self.maps.sweep(|_| {});
    self.files.sweep(|f| f.close());
    self.iters.sweep(|_| {});
    self.funcs.sweep(|_| {});
    self.allocations_since_gc = 0;
  }

  fn mark_value(&mut self, v: Value) {
    match v {
      Value::Nil | Value::Int(_) | Value::Float(_) | Value::Native(_) => {}
      Value::Str(r) => {
        self.strings.mark(r);
      }
      Value::List(r) => {
        if self.lists.mark(r) {
          let items = self.lists.get(r).items.clone();
          for item in items {
            self.mark_value(item);
          }
        }
      }
      Value::Map(r) => {
        if self.maps.mark(r) {
          let pairs: Vec<(GcRef<LString>, Value)> = self.maps.get(r).table.iter().collect();
          for (k, val) in pairs {
            self.strings.mark(k);
            self.mark_value(val);
          }
        }
      }
      Value::File(r) => {
        self.files.mark(r);
      }
      Value::Iter(r) => {
        if self.iters.mark(r) {
          let child = match &self.iters.get(r).source {
            IterSource::List(l) => Some(Value::List(*l)),
            IterSource::Str(s) => Some(Value::Str(*s)),
            IterSource::Range { .. } => None,
          };
          if let Some(c) = child {
            self.mark_value(c);
          }
        }
      }
      Value::Func(r) => {
        if self.funcs.mark(r) {
          let consts = self.funcs.get(r).proto.constants.clone();
          for c in consts {
            self.mark_value(c);
          }
        }
      }
    }
  }

  /// Deep-copies `v` so a callee gets private storage (spec's
  /// copy-on-call contract for C8's `CALL`): scalars and immutable
  /// strings/functions are shared, but lists and maps get a fresh,
  /// recursively-copied backing object so mutations inside the callee
  /// are invisible to the caller.
  pub fn deepcopy(&mut self, v: Value) -> Value {
    match v {
      Value::List(r) => {
        let items = self.lists.get(r).items.clone();
        let copied: Vec<Value> = items.into_iter().map(|item| self.deepcopy(item)).collect();
        Value::List(self.alloc_list(LList::new(copied)))
      }
      Value::Map(r) => {
        let pairs: Vec<(GcRef<LString>, Value)> = self.maps.get(r).table.iter().collect();
        let mut m = LMap::default();
        for (k, val) in pairs {
          let copied = self.deepcopy(val);
          m.insert(k, copied, &self.strings);
        }
        Value::Map(self.alloc_map(m))
      }
      other => other,
    }
  }

  pub fn repr(&self, v: Value) -> String {
    (descriptor_for(v.tag()).repr)(self, v)
  }

  pub fn asbool(&self, v: Value) -> bool {
    (descriptor_for(v.tag()).asbool)(self, v)
  }

  pub fn len(&self, v: Value) -> Option<i64> {
    descriptor_for(v.tag()).len.and_then(|f| f(self, v))
  }
}
