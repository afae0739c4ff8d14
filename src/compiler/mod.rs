//! C6: the tree-to-bytecode compiler.
//!
//! One `Compiler` per function scope, generalized from the `CompileState`
//! shape in `examples/jprochazk-hebi/src/emit/mod.rs`: each scope owns its
//! own locals (`SymbolTable`) and constants (`ConstantTable`) and emits
//! into its own instruction buffer, while a single shared globals table
//! (see the "Globals visibility" Open Question resolution in
//! `SPEC_FULL.md`) is threaded through every nested scope by `Rc<RefCell<_>>`.
//! Functions here never capture outer locals, so hebi's register
//! allocator and upvalue machinery have no counterpart — named local
//! slots only.

mod expr;
mod stmt;

use std::cell::RefCell;
use std::rc::Rc;

use diag::Error;
use span::Span;
use syntax::{Kind, Node};

use crate::constant::ConstantTable;
use crate::function::FunctionProto;
use crate::opcode::{Instr, Op};
use crate::symbol::SymbolTable;
use crate::value::{Heap, Value};
use crate::vm::NativeDef;

type Shared<T> = Rc<RefCell<T>>;

/// Where a name resolves to at compile time.
enum Resolution {
  Local(usize),
  Global(usize),
  Undefined,
}

struct LoopCtx {
  continue_target: usize,
  break_jumps: Vec<usize>,
}

pub struct Compiler<'a> {
  heap: &'a mut Heap,
  locals: Shared<SymbolTable>,
  globals: Shared<SymbolTable>,
  constants: ConstantTable,
  instructions: Vec<Instr>,
  name: String,
  n_params: usize,
  loops: Vec<LoopCtx>,
}

/// Compiles a parsed module into the implicit top-level function record,
/// per spec §1's "treat top-level code as an implicit function". `natives`
/// is the standard-library table (spec §3's `LibFunc`, concretely
/// `builtins::table()`): every entry's name is bound as a global ahead of
/// the user's own code, so `print(x)` resolves like any other global
/// lookup instead of needing a dedicated opcode.
pub fn compile(module: &Node, heap: &mut Heap, natives: &[NativeDef]) -> Result<FunctionProto, Error> {
  let globals: Shared<SymbolTable> = Rc::new(RefCell::new(SymbolTable::default()));
  for native in natives {
    globals.borrow_mut().declare(native.name);
  }
  hoist_locals(module, &mut globals.borrow_mut());
  hoist_funcs(module, &mut globals.borrow_mut());

  let mut compiler = Compiler {
    heap,
    locals: globals.clone(),
    globals,
    constants: ConstantTable::default(),
    instructions: vec![],
    name: "<module>".to_string(),
    n_params: 0,
    loops: vec![],
  };
  compiler.bootstrap_natives(natives);
  compiler.compile_body(module)?;
  Ok(compiler.finish())
}

/// Pre-declares every name a block binds by plain assignment or by `for`,
/// before compiling a single statement, so a later statement in the same
/// block can still reference a name assigned after it in program order.
/// Does not descend into nested `func` bodies — those get their own
/// hoisting pass when `compile_function` compiles them. Named `func`
/// bindings are hoisted separately by `hoist_funcs`, since those always
/// bind in the persistent top-level globals table, not this scope's own
/// locals (see `hoist_funcs`).
fn hoist_locals(node: &Node, table: &mut SymbolTable) {
  match &node.kind {
    Kind::Statements(stmts) => {
      for s in stmts {
        hoist_locals(s, table);
      }
    }
    Kind::Assign(name, _) => {
      table.declare(name);
    }
    Kind::For(name, iter, body) => {
      table.declare(name);
      hoist_locals(iter, table);
      hoist_locals(body, table);
    }
    Kind::While(cond, body) => {
      hoist_locals(cond, table);
      hoist_locals(body, table);
    }
    Kind::IfElse(cond, then_, else_) => {
      hoist_locals(cond, table);
      hoist_locals(then_, table);
      if let Some(e) = else_ {
        hoist_locals(e, table);
      }
    }
    _ => {}
  }
}

/// Pre-declares every named `func` a block defines directly, into the
/// persistent top-level globals table regardless of how deeply nested
/// the block being compiled is. Per the "Globals visibility" resolution
/// there are no true closures over an intermediate call's locals, so a
/// named function is always a global binding — this is what lets a
/// function call itself, or a sibling defined later in the same block,
/// resolve at compile time instead of erroring as undefined. Does not
/// descend into nested `func` bodies; those get their own pass when
/// `compile_function` compiles them.
fn hoist_funcs(node: &Node, globals: &mut SymbolTable) {
  match &node.kind {
    Kind::Statements(stmts) => {
      for s in stmts {
        hoist_funcs(s, globals);
      }
    }
    Kind::For(_, iter, body) => {
      hoist_funcs(iter, globals);
      hoist_funcs(body, globals);
    }
    Kind::While(cond, body) => {
      hoist_funcs(cond, globals);
      hoist_funcs(body, globals);
    }
    Kind::IfElse(cond, then_, else_) => {
      hoist_funcs(cond, globals);
      hoist_funcs(then_, globals);
      if let Some(e) = else_ {
        hoist_funcs(e, globals);
      }
    }
    Kind::FuncDef(name, ..) => {
      if !name.is_empty() {
        globals.declare(name);
      }
    }
    _ => {}
  }
}

impl<'a> Compiler<'a> {
  fn finish(self) -> FunctionProto {
    let mut instructions = self.instructions;
    instructions.push(Instr::nil(0));
    instructions.push(Instr::ret(0));
    FunctionProto {
      name: self.name,
      n_params: self.n_params,
      n_locals: self.locals.borrow().len(),
      instructions,
      constants: self.constants.into_vec(),
    }
  }

  fn emit(&mut self, instr: Instr) -> usize {
    self.instructions.push(instr);
    self.instructions.len() - 1
  }

  fn here(&self) -> usize {
    self.instructions.len()
  }

  /// Backpatches a previously-emitted jump at `idx` to target the
  /// instruction that will be emitted next.
  fn patch_jump_to_here(&mut self, idx: usize) {
    let target = self.here() as i32;
    self.instructions[idx].operand = target;
  }

  fn resolve(&self, name: &str) -> Resolution {
    if let Some(slot) = self.locals.borrow().resolve(name) {
      return Resolution::Local(slot);
    }
    if !Rc::ptr_eq(&self.locals, &self.globals) {
      if let Some(slot) = self.globals.borrow().resolve(name) {
        return Resolution::Global(slot);
      }
    }
    Resolution::Undefined
  }

  /// Slot + opcode pair to use for an assignment target, per the
  /// "Globals visibility" resolution: prefer an existing local, then an
  /// existing global, and only declare a brand new local if neither
  /// exists yet.
  fn declare_for_write(&mut self, name: &str) -> (usize, bool) {
    if let Some(slot) = self.locals.borrow().resolve(name) {
      return (slot, true);
    }
    if !Rc::ptr_eq(&self.locals, &self.globals) {
      if let Some(slot) = self.globals.borrow().resolve(name) {
        return (slot, false);
      }
    }
    let slot = self.locals.borrow_mut().declare(name);
    (slot, true)
  }

  fn compile_body(&mut self, body: &Node) -> Result<(), Error> {
    match &body.kind {
      Kind::Statements(stmts) => {
        for s in stmts {
          self.compile_stmt(s)?;
        }
        Ok(())
      }
      _ => self.compile_stmt(body),
    }
  }

  /// Compiles a nested `func` literal into its own `FunctionProto`,
  /// sharing this compiler's globals table but starting a fresh locals
  /// table seeded with the parameter names.
  fn compile_function(
    &mut self,
    name: &str,
    params: &[String],
    body: &Node,
  ) -> Result<FunctionProto, Error> {
    let locals = Rc::new(RefCell::new(SymbolTable::default()));
    for p in params {
      locals.borrow_mut().declare(p);
    }
    hoist_locals(body, &mut locals.borrow_mut());
    hoist_funcs(body, &mut self.globals.borrow_mut());
    let mut inner = Compiler {
      heap: &mut *self.heap,
      locals,
      globals: self.globals.clone(),
      constants: ConstantTable::default(),
      instructions: vec![],
      name: name.to_string(),
      n_params: params.len(),
      loops: vec![],
    };
    inner.compile_body(body)?;
    Ok(inner.finish())
  }

  fn undefined_name(&self, name: &str, span: Span) -> Error {
    Error::compile(format!("undefined name '{name}'"), span)
  }

  /// Emits `LOADK native; STORE slot; POP` for each entry of `natives`,
  /// ahead of any user statement, binding each library function's name
  /// to a `Value::Native` the same way a top-level `func` binds its name
  /// to a `Value::Func`.
  fn bootstrap_natives(&mut self, natives: &[NativeDef]) {
    for (i, native) in natives.iter().enumerate() {
      let idx = self.constants.push(Value::Native(i as u32));
      self.emit(Instr::loadk(idx as i32));
      let (slot, is_local) = self.declare_for_write(native.name);
      if is_local {
        self.emit(Instr::storel(slot as i32));
      } else {
        self.emit(Instr::storeg(slot as i32));
      }
      self.emit(Instr::bare(Op::Pop));
    }
  }
}
