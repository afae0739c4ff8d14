use std::rc::Rc;

use diag::Error;
use syntax::{BinOp, Kind, Node, UnOp};

use super::{Compiler, Resolution};
use crate::opcode::{Instr, Op};
use crate::value::{LList, LString, Value};

impl<'a> Compiler<'a> {
  /// Emits code that leaves exactly one value, `node`'s result, on top
  /// of the stack.
  pub(super) fn compile_expr(&mut self, node: &Node) -> Result<(), Error> {
    match &node.kind {
      Kind::Nil => {
        self.emit(Instr::nil(0));
      }
      Kind::Int(v) => {
        let idx = self.constants.push(Value::Int(*v));
        self.emit(Instr::loadk(idx as i32));
      }
      Kind::Float(v) => {
        let idx = self.constants.push(Value::Float(*v));
        self.emit(Instr::loadk(idx as i32));
      }
      Kind::Str(bytes) => {
        let r = self.heap.alloc_string(LString::new(bytes.clone()));
        let idx = self.constants.push(Value::Str(r));
        self.emit(Instr::loadk(idx as i32));
      }
      Kind::Id(name) => match self.resolve(name) {
        Resolution::Local(slot) => {
          self.emit(Instr::loadl(slot as i32));
        }
        Resolution::Global(slot) => {
          self.emit(Instr::loadg(slot as i32));
        }
        Resolution::Undefined => return Err(self.undefined_name(name, node.span)),
      },
      Kind::Unary(op, inner) => {
        self.compile_expr(inner)?;
        self.emit(Instr::bare(match op {
          UnOp::Neg => Op::Neg,
          UnOp::LgNot => Op::Not,
          UnOp::BwNot => Op::BwNot,
        }));
      }
      Kind::Binary(op, lhs, rhs) => {
        self.compile_expr(lhs)?;
        self.compile_expr(rhs)?;
        self.emit(Instr::bare(binop_opcode(*op)));
      }
      Kind::ContainerGet(container, index) => {
        self.compile_expr(index)?;
        self.compile_expr(container)?;
        self.emit(Instr::bare(Op::Cget));
      }
      Kind::ContainerPut(container, index, value) => {
        self.compile_expr(value)?;
        self.compile_expr(index)?;
        self.compile_expr(container)?;
        self.emit(Instr::bare(Op::Cput));
      }
      Kind::ListDef(items) => {
        for item in items {
          self.compile_expr(item)?;
        }
        self.emit(Instr::mklist(items.len() as i32));
      }
      Kind::MapDef(pairs) => {
        for (k, v) in pairs {
          self.compile_expr(k)?;
          self.compile_expr(v)?;
        }
        self.emit(Instr::mkmap(pairs.len() as i32));
      }
      Kind::Assign(name, value) => {
        self.compile_expr(value)?;
        let (slot, is_local) = self.declare_for_write(name);
        if is_local {
          self.emit(Instr::storel(slot as i32));
        } else {
          self.emit(Instr::storeg(slot as i32));
        }
      }
      Kind::Call(callee, args) => {
        self.compile_expr(callee)?;
        for a in args {
          self.compile_expr(a)?;
        }
        self.emit(Instr::call(args.len() as i32));
      }
      Kind::FuncDef(_, params, body) => {
        let proto = self.compile_function("<anonymous>", params, body)?;
        let gcref = self.heap.alloc_func(Rc::new(proto));
        let idx = self.constants.push(Value::Func(gcref));
        self.emit(Instr::loadk(idx as i32));
      }
      other => {
        return Err(Error::compile(
          format!("{other:?} is not a valid expression"),
          node.span,
        ))
      }
    }
    Ok(())
  }
}

fn binop_opcode(op: BinOp) -> Op {
  match op {
    BinOp::Add => Op::Add,
    BinOp::Sub => Op::Sub,
    BinOp::Mul => Op::Mul,
    BinOp::Div => Op::Div,
    BinOp::Mod => Op::Mod,
    BinOp::Pow => Op::Pow,
    BinOp::Eq => Op::Eq,
    BinOp::Neq => Op::Neq,
    BinOp::Lt => Op::Lt,
    BinOp::Gt => Op::Gt,
    BinOp::Lte => Op::Lte,
    BinOp::Gte => Op::Gte,
    BinOp::LgOr => Op::LgOr,
    BinOp::LgAnd => Op::LgAnd,
    BinOp::BwXor => Op::BwXor,
    BinOp::BwOr => Op::BwOr,
    BinOp::BwAnd => Op::BwAnd,
  }
}
