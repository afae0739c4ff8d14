//! C8: the stack-based bytecode interpreter.
//!
//! Grounded on the `Isolate`/dispatch-loop shape in
//! `examples/jprochazk-hebi/src/isolate.rs`, which splits its per-opcode
//! logic into sibling modules (`binop`, `cmp`, `call`, `index`, `truth`,
//! ...) rather than one giant `match` arm — the same split is used here.
//! One difference from the teacher: there is a single shared value stack
//! across every frame (not a stack-per-frame), since `CALL`/`RET` always
//! consume exactly `argc + 1` values and produce exactly one, so stack
//! discipline holds across a call boundary without per-frame isolation.

mod binop;
mod call;
mod cmp;
mod index;
mod iter;
mod truth;

use std::rc::Rc;

use diag::Error;

use crate::function::FunctionProto;
use crate::opcode::{Instr, Op};
use crate::value::{Heap, Value};

pub type NativeFn = fn(&mut Vm, &[Value]) -> Result<Value, Error>;

pub struct NativeDef {
  pub name: &'static str,
  pub func: NativeFn,
}

struct Frame {
  proto: Rc<FunctionProto>,
  locals: Vec<Value>,
  ip: usize,
}

pub struct Vm<'a> {
  pub heap: &'a mut Heap,
  frames: Vec<Frame>,
  stack: Vec<Value>,
  natives: &'a [NativeDef],
  pub verbose: bool,
}

impl<'a> Vm<'a> {
  pub fn new(heap: &'a mut Heap, natives: &'a [NativeDef]) -> Self {
    Vm {
      heap,
      frames: vec![],
      stack: vec![],
      natives,
      verbose: false,
    }
  }

  pub fn native_index(&self, name: &str) -> Option<usize> {
    self.natives.iter().position(|n| n.name == name)
  }

  /// Runs `proto` as the module-level function. Its frame (`frames[0]`)
  /// is the global object array for the rest of the call's lifetime:
  /// `LOADG`/`STOREG` always address `frames[0].locals`, per the
  /// "Globals visibility" resolution in `SPEC_FULL.md`.
  pub fn run(&mut self, proto: Rc<FunctionProto>) -> Result<Value, Error> {
    let locals = vec![Value::Nil; proto.n_locals];
    self.frames.push(Frame {
      proto,
      locals,
      ip: 0,
    });

    loop {
      if self.frames.is_empty() {
        return Ok(self.stack.pop().unwrap_or(Value::Nil));
      }
      if self.heap.should_collect() {
        self.collect();
      }

      let frame_idx = self.frames.len() - 1;
      let instr = self.frames[frame_idx].proto.instructions[self.frames[frame_idx].ip];
      self.frames[frame_idx].ip += 1;

      if self.verbose {
        eprintln!(
          "[{:>3}] {:<8} {}  (stack={})",
          self.frames[frame_idx].ip - 1,
          instr.op.mnemonic(),
          instr.operand,
          self.stack.len()
        );
      }

      match self.step(instr)? {
        Flow::Continue => {}
        Flow::Returned => {
          if self.frames.is_empty() {
            return Ok(self.stack.pop().unwrap_or(Value::Nil));
          }
        }
      }
    }
  }

  fn step(&mut self, instr: Instr) -> Result<Flow, Error> {
    match instr.op {
      Op::Nil => self.push(Value::Nil),
      Op::Pop => {
        self.pop()?;
      }
      Op::Dup => {
        let v = self.peek()?;
        self.push(v);
      }
      Op::LoadK => {
        let v = self.current_proto().constants[instr.operand as usize];
        self.push(v);
      }
      Op::LoadL => {
        let v = self.current_frame().locals[instr.operand as usize];
        self.push(v);
      }
      Op::StoreL => {
        let v = self.peek()?;
        let idx = self.frames.len() - 1;
        self.frames[idx].locals[instr.operand as usize] = v;
      }
      Op::LoadG => {
        let v = self.frames[0].locals[instr.operand as usize];
        self.push(v);
      }
      Op::StoreG => {
        let v = self.peek()?;
        self.frames[0].locals[instr.operand as usize] = v;
      }
      Op::Neg => {
        let v = self.pop()?;
        let r = binop::neg(self.heap, v)?;
        self.push(r);
      }
      Op::Not => {
        let v = self.pop()?;
        self.push(Value::Int(!truth::is_truthy(self.heap, v) as i64));
      }
      Op::BwNot => {
        let v = self.pop()?;
        let r = binop::bwnot(v)?;
        self.push(r);
      }
      Op::Add | Op::Sub | Op::Mul | Op::Div | Op::Mod | Op::Pow | Op::BwAnd | Op::BwOr
      | Op::BwXor => {
        let rhs = self.pop()?;
        let lhs = self.pop()?;
        let r = binop::arith(self.heap, instr.op, lhs, rhs)?;
        self.push(r);
      }
      Op::LgAnd => {
        let rhs = self.pop()?;
        let lhs = self.pop()?;
        self.push(Value::Int((truth::is_truthy(self.heap, lhs) && truth::is_truthy(self.heap, rhs)) as i64));
      }
      Op::LgOr => {
        let rhs = self.pop()?;
        let lhs = self.pop()?;
        self.push(Value::Int((truth::is_truthy(self.heap, lhs) || truth::is_truthy(self.heap, rhs)) as i64));
      }
      Op::Eq => {
        let rhs = self.pop()?;
        let lhs = self.pop()?;
        self.push(Value::Int(cmp::values_equal(self.heap, lhs, rhs) as i64));
      }
      Op::Neq => {
        let rhs = self.pop()?;
        let lhs = self.pop()?;
        self.push(Value::Int(!cmp::values_equal(self.heap, lhs, rhs) as i64));
      }
      Op::Lt | Op::Gt | Op::Lte | Op::Gte => {
        let rhs = self.pop()?;
        let lhs = self.pop()?;
        let r = cmp::compare(self.heap, instr.op, lhs, rhs)?;
        self.push(Value::Int(r as i64));
      }
      Op::Cget => {
        let container = self.pop()?;
        let idx = self.pop()?;
        let v = index::cget(self.heap, container, idx)?;
        self.push(v);
      }
      Op::Cput => {
        let container = self.pop()?;
        let idx = self.pop()?;
        let value = self.peek()?;
        index::cput(self.heap, container, idx, value)?;
      }
      Op::MkList => {
        let n = instr.operand as usize;
        let start = self.stack.len() - n;
        let items: Vec<Value> = self.stack.drain(start..).collect();
        let r = self.heap.alloc_list(crate::value::LList::new(items));
        self.push(Value::List(r));
      }
      Op::MkMap => {
        let n = instr.operand as usize;
        let start = self.stack.len() - 2 * n;
        let flat: Vec<Value> = self.stack.drain(start..).collect();
        let mut map = crate::value::LMap::default();
        for pair in flat.chunks_exact(2) {
          let key = match pair[0] {
            Value::Str(r) => r,
            other => {
              return Err(
                Error::value(format!("map keys must be strings, got {}", other.tag().name()))
                  .with_opcode("MkMap"),
              )
            }
          };
          map.insert(key, pair[1], &self.heap.strings);
        }
        let r = self.heap.alloc_map(map);
        self.push(Value::Map(r));
      }
      Op::MkIter => {
        let container = self.pop()?;
        let v = iter::make_iter(self.heap, container)?;
        self.push(v);
      }
      Op::IterJump => {
        let top = self.peek()?;
        match iter::advance(self.heap, top)? {
          Some(v) => self.push(v),
          None => {
            let idx = self.frames.len() - 1;
            self.frames[idx].ip = instr.operand as usize;
          }
        }
      }
      Op::Jmp => {
        let idx = self.frames.len() - 1;
        self.frames[idx].ip = instr.operand as usize;
      }
      Op::JmpF => {
        let cond = self.pop()?;
        if !truth::is_truthy(self.heap, cond) {
          let idx = self.frames.len() - 1;
          self.frames[idx].ip = instr.operand as usize;
        }
      }
      Op::Call => {
        let argc = instr.operand as usize;
        return call::dispatch(self, argc);
      }
      Op::Ret => {
        let value = self.pop()?;
        self.frames.pop();
        self.push(value);
        return Ok(Flow::Returned);
      }
    }
    Ok(Flow::Continue)
  }

  fn push(&mut self, v: Value) {
    self.stack.push(v);
  }

  fn pop(&mut self) -> Result<Value, Error> {
    self
      .stack
      .pop()
      .ok_or_else(|| Error::value("value stack underflow"))
  }

  fn peek(&self) -> Result<Value, Error> {
    self
      .stack
      .last()
      .copied()
      .ok_or_else(|| Error::value("value stack underflow"))
  }

  fn current_frame(&self) -> &Frame {
    self.frames.last().expect("no active frame")
  }

  fn current_proto(&self) -> &FunctionProto {
    &self.current_frame().proto
  }

  fn collect(&mut self) {
    let mut roots: Vec<Value> = self.stack.clone();
    for frame in &self.frames {
      roots.extend(frame.locals.iter().copied());
      roots.extend(frame.proto.constants.iter().copied());
    }
    self.heap.collect(roots);
  }
}

enum Flow {
  Continue,
  Returned,
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::compiler::compile;

  fn run_src(src: &str) -> Value {
    let module = syntax::parse(src).expect("parse");
    let mut heap = Heap::default();
    let natives = crate::builtins::table();
    let proto = compile(&module, &mut heap, &natives).expect("compile");
    let mut vm = Vm::new(&mut heap, &natives);
    vm.run(Rc::new(proto)).expect("run")
  }

  #[test]
  fn arithmetic_and_locals() {
    let v = run_src("x = 1 + 2 * 3\nreturn x");
    assert_eq!(v, Value::Int(7));
  }

  #[test]
  fn while_loop_accumulates() {
    let v = run_src(
      "i = 0\ntotal = 0\nwhile i < 5 do\n  total = total + i\n  i = i + 1\ndone\nreturn total",
    );
    assert_eq!(v, Value::Int(10));
  }

  #[test]
  fn for_loop_over_list_sums_elements() {
    let v = run_src("total = 0\nfor x in [1, 2, 3] do\n  total = total + x\ndone\nreturn total");
    assert_eq!(v, Value::Int(6));
  }

  #[test]
  fn break_exits_loop_early() {
    let v = run_src(
      "total = 0\nfor x in [1, 2, 3, 4] do\n  if x == 3 then break end\n  total = total + x\ndone\nreturn total",
    );
    assert_eq!(v, Value::Int(3));
  }

  #[test]
  fn function_call_with_copy_on_call_semantics() {
    let v = run_src(
      "func bump(l)\n  l[0] = 99\n  return l\nend\noriginal = [1, 2]\nbumped = bump(original)\nreturn original[0]",
    );
    assert_eq!(v, Value::Int(1));
  }

  #[test]
  fn recursive_function_computes_factorial() {
    let v = run_src(
      "func fact(n)\n  if n <= 1 then\n    return 1\n  end\n  return n * fact(n - 1)\nend\nreturn fact(5)",
    );
    assert_eq!(v, Value::Int(120));
  }
}
