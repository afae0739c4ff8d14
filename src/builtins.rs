//! Standard-library dispatch glue. Spec §3's `LibFunc` is "pointer to
//! native function of signature `(args[], n) -> value`, minimum-arity
//! hint"; `NativeDef`/`NativeFn` (`vm/mod.rs`) are that signature made
//! concrete. The functions themselves are grounded one-for-one on
//! `examples/original_source/src/functions.c`'s `builtins[]` table
//! (`luci_help`, `luci_print`, `luci_readline`, `luci_typeof`,
//! `luci_assert`, `luci_cast_*`, `luci_fopen`/`fclose`/`fread`/`fwrite`,
//! `luci_flines`, `luci_range`, `luci_sum`).

use std::io::Write as _;

use diag::Error;

use crate::value::{Heap, LFile, LIter, LList, LString, Value};
use crate::vm::{NativeDef, Vm};

pub fn table() -> Vec<NativeDef> {
  vec![
    NativeDef { name: "help", func: help },
    NativeDef { name: "print", func: print },
    NativeDef { name: "input", func: readline },
    NativeDef { name: "readline", func: readline },
    NativeDef { name: "readlines", func: readlines },
    NativeDef { name: "type", func: typeof_, },
    NativeDef { name: "assert", func: assert_ },
    NativeDef { name: "str", func: cast_str },
    NativeDef { name: "int", func: cast_int },
    NativeDef { name: "float", func: cast_float },
    NativeDef { name: "open", func: open },
    NativeDef { name: "close", func: close },
    NativeDef { name: "read", func: read },
    NativeDef { name: "write", func: write },
    NativeDef { name: "range", func: range },
    NativeDef { name: "sum", func: sum },
  ]
}

/// `print`'s per-argument rendering: unlike `Heap::repr`, a top-level
/// string argument is written raw, without the quoting `repr` adds for
/// strings nested inside a list or map (spec §8 scenario 2: `print(s)`
/// on `s = "abc"` prints `abc`, not `"abc"`).
fn display(heap: &Heap, v: Value) -> String {
  match v {
    Value::Str(r) => heap.strings.get(r).as_str_lossy().into_owned(),
    other => heap.repr(other),
  }
}

fn print(vm: &mut Vm, args: &[Value]) -> Result<Value, Error> {
  let parts: Vec<String> = args.iter().map(|a| display(vm.heap, *a)).collect();
  let mut stdout = std::io::stdout();
  let _ = writeln!(stdout, "{}", parts.join(" "));
  Ok(Value::Nil)
}

fn help(_vm: &mut Vm, _args: &[Value]) -> Result<Value, Error> {
  println!("-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-");
  println!("              HELP               ");
  println!("-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-");
  println!("        BUILTIN FUNCTIONS        ");
  println!("-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-");
  for def in table() {
    println!("{:^32}", def.name);
  }
  println!("-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-");
  Ok(Value::Nil)
}

/// `input()`/`readline()` with no arguments reads a line from stdin;
/// given a `File`, reads its next line. Returns `Nil` at EOF, matching
/// `luci_readline`'s "return NULL" and spec §4.3's "reading past the end
/// ... returns the singleton Nil" convention for exhausted sources.
fn readline(vm: &mut Vm, args: &[Value]) -> Result<Value, Error> {
  let line = match args.first() {
    None => {
      let mut buf = String::new();
      let n = std::io::stdin()
        .read_line(&mut buf)
        .map_err(|e| Error::resource(e.to_string()))?;
      if n == 0 {
        None
      } else {
        if buf.ends_with('\n') {
          buf.pop();
          if buf.ends_with('\r') {
            buf.pop();
          }
        }
        Some(buf)
      }
    }
    Some(Value::File(r)) => vm
      .heap
      .files
      .get_mut(*r)
      .read_line()
      .map_err(|e| Error::resource(e.to_string()))?,
    Some(other) => return Err(type_error("readline", "file", *other)),
  };
  Ok(match line {
    Some(s) => Value::Str(vm.heap.alloc_string(LString::new(s.into_bytes()))),
    None => Value::Nil,
  })
}

/// Whole-file line list, `luci_flines`'s equivalent: repeatedly reads a
/// line from the given file until EOF.
fn readlines(vm: &mut Vm, args: &[Value]) -> Result<Value, Error> {
  let Some(Value::File(r)) = args.first() else {
    return Err(Error::value("readlines requires a file argument"));
  };
  let mut lines = Vec::new();
  loop {
    let line = vm
      .heap
      .files
      .get_mut(*r)
      .read_line()
      .map_err(|e| Error::resource(e.to_string()))?;
    match line {
      Some(s) => lines.push(Value::Str(vm.heap.alloc_string(LString::new(s.into_bytes())))),
      None => break,
    }
  }
  Ok(Value::List(vm.heap.alloc_list(LList::new(lines))))
}

fn typeof_(vm: &mut Vm, args: &[Value]) -> Result<Value, Error> {
  let name = args.first().map(|v| v.tag().name()).unwrap_or("nil");
  Ok(Value::Str(vm.heap.alloc_string(LString::new(name.as_bytes().to_vec()))))
}

fn assert_(vm: &mut Vm, args: &[Value]) -> Result<Value, Error> {
  let v = args.first().copied().unwrap_or(Value::Nil);
  if vm.heap.asbool(v) {
    Ok(Value::Nil)
  } else {
    Err(Error::value("assertion failed"))
  }
}

fn cast_str(vm: &mut Vm, args: &[Value]) -> Result<Value, Error> {
  let v = args.first().copied().unwrap_or(Value::Nil);
  let s = display(vm.heap, v);
  Ok(Value::Str(vm.heap.alloc_string(LString::new(s.into_bytes()))))
}

fn cast_int(vm: &mut Vm, args: &[Value]) -> Result<Value, Error> {
  let v = args.first().copied().unwrap_or(Value::Nil);
  let i = match v {
    Value::Int(i) => i,
    Value::Float(f) => f as i64,
    Value::Str(r) => vm
      .heap
      .strings
      .get(r)
      .as_str_lossy()
      .trim()
      .parse::<i64>()
      .map_err(|_| Error::value("could not cast string to int"))?,
    other => return Err(type_error("int", "int, float or str", other)),
  };
  Ok(Value::Int(i))
}

fn cast_float(vm: &mut Vm, args: &[Value]) -> Result<Value, Error> {
  let v = args.first().copied().unwrap_or(Value::Nil);
  let f = match v {
    Value::Int(i) => i as f64,
    Value::Float(f) => f,
    Value::Str(r) => vm
      .heap
      .strings
      .get(r)
      .as_str_lossy()
      .trim()
      .parse::<f64>()
      .map_err(|_| Error::value("could not cast string to float"))?,
    other => return Err(type_error("float", "int, float or str", other)),
  };
  Ok(Value::Float(f))
}

fn open(vm: &mut Vm, args: &[Value]) -> Result<Value, Error> {
  let (Some(Value::Str(path_ref)), Some(Value::Str(mode_ref))) = (args.first(), args.get(1))
  else {
    return Err(Error::value("open requires a path and a mode, both strings"));
  };
  let path = vm.heap.strings.get(*path_ref).as_str_lossy().into_owned();
  let mode = vm.heap.strings.get(*mode_ref).as_str_lossy().into_owned();
  if !matches!(mode.as_str(), "r" | "w" | "a") {
    return Err(Error::value(format!("invalid file open mode: {mode}")));
  }
  let file = LFile::open(path, mode).map_err(|e| Error::resource(e.to_string()))?;
  Ok(Value::File(vm.heap.alloc_file(file)))
}

fn close(vm: &mut Vm, args: &[Value]) -> Result<Value, Error> {
  let Some(Value::File(r)) = args.first() else {
    return Err(Error::value("close requires a file argument"));
  };
  vm.heap.files.get_mut(*r).close();
  Ok(Value::Nil)
}

fn read(vm: &mut Vm, args: &[Value]) -> Result<Value, Error> {
  let Some(Value::File(r)) = args.first() else {
    return Err(Error::value("read requires a file argument"));
  };
  let contents = vm
    .heap
    .files
    .get_mut(*r)
    .read_all()
    .map_err(|e| Error::resource(e.to_string()))?;
  Ok(Value::Str(vm.heap.alloc_string(LString::new(contents.into_bytes()))))
}

fn write(vm: &mut Vm, args: &[Value]) -> Result<Value, Error> {
  let (Some(Value::File(file_ref)), Some(Value::Str(text_ref))) = (args.first(), args.get(1))
  else {
    return Err(Error::value("write requires a file and a string"));
  };
  let text = vm.heap.strings.get(*text_ref).as_str_lossy().into_owned();
  vm.heap
    .files
    .get_mut(*file_ref)
    .write_str(&text)
    .map_err(|e| Error::resource(e.to_string()))?;
  Ok(Value::Nil)
}

/// `range(n)`, `range(a, b)` or `range(a, b, step)`, matching
/// `luci_range`'s three call shapes. Produces an iterator directly
/// rather than materializing a list, the same way a `for x in a, b do`
/// loop synthesizes an `IterSource::Range`.
fn range(vm: &mut Vm, args: &[Value]) -> Result<Value, Error> {
  let ints: Vec<i64> = args
    .iter()
    .map(|v| match v {
      Value::Int(i) => Ok(*i),
      other => Err(type_error("range", "int", *other)),
    })
    .collect::<Result<_, _>>()?;
  let (start, stop, step) = match ints.as_slice() {
    [n] => (0, *n, 1),
    [a, b] => (*a, *b, 1),
    [a, b, c] => (*a, *b, *c),
    _ => return Err(Error::value("range takes 1 to 3 integer arguments")),
  };
  if step == 0 {
    return Err(Error::value("range step must not be zero"));
  }
  if (stop > start && step < 0) || (stop < start && step > 0) {
    return Err(Error::value("invalid step for the requested range"));
  }
  Ok(Value::Iter(vm.heap.alloc_iter(LIter::range(start, stop, step))))
}

/// Sums a list of ints/floats, promoting to float if any element is one
/// (`luci_sum`).
fn sum(vm: &mut Vm, args: &[Value]) -> Result<Value, Error> {
  let Some(Value::List(r)) = args.first() else {
    return Err(Error::value("sum requires a list argument"));
  };
  let items = vm.heap.lists.get(*r).items.clone();
  let mut int_total: i64 = 0;
  let mut float_total: f64 = 0.0;
  let mut is_float = false;
  for item in items {
    match item {
      Value::Int(i) => {
        int_total += i;
        float_total += i as f64;
      }
      Value::Float(f) => {
        is_float = true;
        float_total += f;
      }
      other => return Err(type_error("sum", "int or float", other)),
    }
  }
  Ok(if is_float {
    Value::Float(float_total)
  } else {
    Value::Int(int_total)
  })
}

fn type_error(name: &'static str, expected: &str, got: Value) -> Error {
  Error::ty(format!(
    "{name} expected {expected}, got {}",
    got.tag().name()
  ))
}
