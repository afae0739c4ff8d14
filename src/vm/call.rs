//! `CALL`: argument passing and frame setup. Implements the copy-on-call
//! contract directly — every argument handed to a Luci function is
//! `Heap::deepcopy`'d into the callee's own `locals[]`, so a list or map
//! passed as an argument can be mutated inside the callee without the
//! caller observing it (see the `function_call_with_copy_on_call_semantics`
//! test in `vm/mod.rs`).

use diag::Error;

use super::{Flow, Frame, Vm};
use crate::value::Value;

pub fn dispatch(vm: &mut Vm, argc: usize) -> Result<Flow, Error> {
  let stack_len = vm.stack.len();
  if stack_len < argc + 1 {
    return Err(Error::value("value stack underflow in CALL").with_opcode("CALL"));
  }
  let args: Vec<Value> = vm.stack.drain(stack_len - argc..).collect();
  let callee = vm
    .stack
    .pop()
    .ok_or_else(|| Error::value("value stack underflow in CALL").with_opcode("CALL"))?;

  match callee {
    Value::Func(r) => {
      let proto = vm.heap.funcs.get(r).proto.clone();
      if args.len() != proto.n_params {
        return Err(Error::value(format!(
          "{} takes {} argument(s), got {}",
          proto.name,
          proto.n_params,
          args.len()
        ))
        .with_opcode("CALL"));
      }
      let mut locals = vec![Value::Nil; proto.n_locals];
      for (slot, arg) in locals.iter_mut().zip(args) {
        *slot = vm.heap.deepcopy(arg);
      }
      vm.frames.push(Frame {
        proto,
        locals,
        ip: 0,
      });
      Ok(Flow::Continue)
    }
    Value::Native(idx) => {
      let func = vm.natives[idx as usize].func;
      let result = func(vm, &args)?;
      vm.stack.push(result);
      Ok(Flow::Continue)
    }
    other => Err(
      Error::ty(format!("'{}' is not callable", other.tag().name())).with_opcode("CALL"),
    ),
  }
}
