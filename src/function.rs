//! C7: function records.
//!
//! Grounded on `examples/jprochazk-hebi/src/value/object/function.rs`,
//! which splits a callable into an immutable compiled template plus a
//! thin handle: here that is `FunctionProto` (instructions, constants,
//! arity, local-slot count — produced once by the compiler and shared for
//! the program's lifetime) and `LFunction` (the GC-managed `Value::Func`
//! payload, just a handle onto a `FunctionProto`). The per-call "invocation
//! copy" spec §4.6 describes — a fresh `locals[]` sized to `n_locals`,
//! initialized to `Nil` — is *not* stored here: it is materialized by the
//! VM's `Frame` at `CALL` time and discarded at `RETURN`, since the
//! proto itself never owns per-call state.

use std::rc::Rc;

use crate::opcode::Instr;
use crate::value::Value;

/// The compiled, immutable body of a function. Lives for the life of the
/// program: once compiled it is never mutated, so sharing it behind `Rc`
/// across every invocation and every closure-free reference to the same
/// function literal is sound without a GC arena of its own.
#[derive(Debug)]
pub struct FunctionProto {
  pub name: String,
  pub n_params: usize,
  pub n_locals: usize,
  pub instructions: Vec<Instr>,
  pub constants: Vec<Value>,
}

/// The `Value::Func` payload: a callable handle onto a proto. Distinct
/// from `FunctionProto` so that `Value::Func` can be copied cheaply (it's
/// GC-managed, like every other object kind) while the proto it points
/// to is reused identically across every reference to the same `func`
/// expression.
#[derive(Debug)]
pub struct LFunction {
  pub proto: Rc<FunctionProto>,
}

impl LFunction {
  pub fn new(proto: Rc<FunctionProto>) -> Self {
    LFunction { proto }
  }

  pub fn arity(&self) -> usize {
    self.proto.n_params
  }

  pub fn name(&self) -> &str {
    &self.proto.name
  }
}
