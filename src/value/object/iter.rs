use crate::gc::GcRef;
use crate::value::object::{LList, LString};
use crate::value::Value;

/// What `MKITER` wraps: a cursor over one of the iterable kinds the
/// language supports. Ranges are synthesized by `for x in a, b do`
/// without ever materializing a list, matching the `for` loop semantics
/// described for C8.
pub enum IterSource {
  List(GcRef<LList>),
  Str(GcRef<LString>),
  Range { next: i64, stop: i64, step: i64 },
}

pub struct LIter {
  pub source: IterSource,
  pub pos: usize,
}

impl LIter {
  pub fn over_list(list: GcRef<LList>) -> Self {
    LIter {
      source: IterSource::List(list),
      pos: 0,
    }
  }

  pub fn over_str(s: GcRef<LString>) -> Self {
    LIter {
      source: IterSource::Str(s),
      pos: 0,
    }
  }

  pub fn range(start: i64, stop: i64, step: i64) -> Self {
    LIter {
      source: IterSource::Range {
        next: start,
        stop,
        step,
      },
      pos: 0,
    }
  }

  /// Advances the cursor, returning the next element, or `None` once the
  /// source is exhausted. `ITERJUMP` calls this every iteration.
  pub fn next(
    &mut self,
    lists: &crate::gc::Arena<LList>,
    strings: &mut crate::gc::Arena<LString>,
  ) -> Option<Value> {
    match &mut self.source {
      IterSource::List(l) => {
        let items = &lists.get(*l).items;
        if self.pos >= items.len() {
          None
        } else {
          let v = items[self.pos];
          self.pos += 1;
          Some(v)
        }
      }
      IterSource::Str(s) => {
        let bytes = &strings.get(*s).bytes;
        if self.pos >= bytes.len() {
          None
        } else {
          let byte = bytes[self.pos];
          self.pos += 1;
          let r = strings.alloc(crate::value::LString::new(vec![byte]));
          Some(Value::Str(r))
        }
      }
      IterSource::Range { next, stop, step } => {
        let (next_v, stop_v, step_v) = (*next, *stop, *step);
        let done = if step_v > 0 {
          next_v >= stop_v
        } else {
          next_v <= stop_v
        };
        if done {
          None
        } else {
          *next += step_v;
          Some(Value::Int(next_v))
        }
      }
    }
  }
}
