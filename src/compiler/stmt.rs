use std::rc::Rc;

use diag::Error;
use syntax::{Kind, Node};

use super::{Compiler, LoopCtx};
use crate::opcode::{Instr, Op};
use crate::value::Value;

impl<'a> Compiler<'a> {
  pub(super) fn compile_stmt(&mut self, node: &Node) -> Result<(), Error> {
    match &node.kind {
      Kind::Pass => {}
      Kind::Statements(stmts) => {
        for s in stmts {
          self.compile_stmt(s)?;
        }
      }
      Kind::IfElse(cond, then_, else_) => self.compile_if(cond, then_, else_.as_deref())?,
      Kind::While(cond, body) => self.compile_while(cond, body)?,
      Kind::For(name, iter, body) => self.compile_for(name, iter, body)?,
      Kind::FuncDef(name, params, body) if !name.is_empty() => {
        // A named function always binds in the persistent top-level
        // globals table, never as a local of its enclosing function —
        // `hoist_funcs` already pre-declared it there, so this is
        // usually a no-op lookup. Binding it any other way would make a
        // function nested inside another function unable to resolve
        // its own name for recursion (STOREL addresses the *current*
        // call's locals, which don't exist yet outside this call).
        let proto = self.compile_function(name, params, body)?;
        let gcref = self.heap.alloc_func(Rc::new(proto));
        let idx = self.constants.push(Value::Func(gcref));
        self.emit(Instr::loadk(idx as i32));
        let slot = self.globals.borrow_mut().declare(name);
        self.emit(Instr::storeg(slot as i32));
        self.emit(Instr::bare(Op::Pop));
      }
      Kind::Break => {
        let loop_ctx = self
          .loops
          .last()
          .ok_or_else(|| Error::compile("'break' outside of a loop", node.span))?;
        let _ = loop_ctx;
        let idx = self.emit(Instr::jmp(0));
        self.loops.last_mut().unwrap().break_jumps.push(idx);
      }
      Kind::Continue => {
        let target = self
          .loops
          .last()
          .ok_or_else(|| Error::compile("'continue' outside of a loop", node.span))?
          .continue_target;
        self.emit(Instr::jmp(target as i32));
      }
      Kind::Return(value) => {
        match value {
          Some(v) => self.compile_expr(v)?,
          None => {
            self.emit(Instr::nil(0));
          }
        }
        self.emit(Instr::bare(Op::Ret));
      }
      _ => {
        // Anything else is an expression used in statement position;
        // its value is computed and then discarded.
        self.compile_expr(node)?;
        self.emit(Instr::bare(Op::Pop));
      }
    }
    Ok(())
  }

  fn compile_if(&mut self, cond: &Node, then_: &Node, else_: Option<&Node>) -> Result<(), Error> {
    self.compile_expr(cond)?;
    let jmp_to_else = self.emit(Instr::jmpf(0));
    self.compile_body(then_)?;
    if let Some(else_) = else_ {
      let jmp_to_end = self.emit(Instr::jmp(0));
      self.patch_jump_to_here(jmp_to_else);
      self.compile_body(else_)?;
      self.patch_jump_to_here(jmp_to_end);
    } else {
      self.patch_jump_to_here(jmp_to_else);
    }
    Ok(())
  }

  fn compile_while(&mut self, cond: &Node, body: &Node) -> Result<(), Error> {
    let loop_start = self.here();
    self.compile_expr(cond)?;
    let jmp_to_end = self.emit(Instr::jmpf(0));

    self.loops.push(LoopCtx {
      continue_target: loop_start,
      break_jumps: vec![],
    });
    self.compile_body(body)?;
    self.emit(Instr::jmp(loop_start as i32));

    self.patch_jump_to_here(jmp_to_end);
    let ctx = self.loops.pop().unwrap();
    for idx in ctx.break_jumps {
      self.patch_jump_to_here(idx);
    }
    Ok(())
  }

  /// `ITERJUMP` never pops the iterator itself, whether it yields a
  /// value or finds the source exhausted — it only peeks. That keeps the
  /// stack depth identical on every path that reaches the loop's exit
  /// label (normal exhaustion and `break` alike), so a single `Pop`
  /// there is correct either way, instead of needing the VM to special-
  /// case which path it arrived from.
  fn compile_for(&mut self, name: &str, iter: &Node, body: &Node) -> Result<(), Error> {
    self.compile_expr(iter)?;
    self.emit(Instr::bare(Op::MkIter));

    let (slot, is_local) = self.declare_for_write(name);
    let loop_start = self.here();
    let jmp_to_end = self.emit(Instr::iterjump(0));
    if is_local {
      self.emit(Instr::storel(slot as i32));
    } else {
      self.emit(Instr::storeg(slot as i32));
    }
    self.emit(Instr::bare(Op::Pop));

    self.loops.push(LoopCtx {
      continue_target: loop_start,
      break_jumps: vec![],
    });
    self.compile_body(body)?;
    self.emit(Instr::jmp(loop_start as i32));

    self.patch_jump_to_here(jmp_to_end);
    let ctx = self.loops.pop().unwrap();
    for idx in ctx.break_jumps {
      self.patch_jump_to_here(idx);
    }
    self.emit(Instr::bare(Op::Pop)); // drop the iterator itself
    Ok(())
  }
}
