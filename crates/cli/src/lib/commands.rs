use std::path::PathBuf;

use clap::Parser;

use crate::common::read_file;

/// CLI surface from spec §6: `-h -v -n -g -p -c -V`, a final non-flag
/// filename argument, REPL fallback when it's absent. Clap's own
/// `--help`/`--version` are disabled so `-h`/`-V` keep the original's
/// exact (non-clap-standard) meaning.
#[derive(Parser, Debug)]
#[command(name = "luci", disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
  /// Print usage and the byte size of each runtime value variant, then exit.
  #[arg(short = 'h')]
  help: bool,
  /// Print compile/run timing and a parsed-module summary to stderr.
  #[arg(short = 'v')]
  verbose: bool,
  /// Parse and compile only; do not execute.
  #[arg(short = 'n')]
  no_exec: bool,
  /// Emit a DOT graph of the parsed AST instead of running it.
  #[arg(short = 'g')]
  dot: bool,
  /// Print the compiled bytecode disassembly.
  #[arg(short = 'p')]
  print_bytecode: bool,
  /// Emit serialized bytecode (stub).
  #[arg(short = 'c')]
  emit_bytecode: bool,
  /// Print the version string and exit immediately, before anything else.
  #[arg(short = 'V')]
  version: bool,
  /// Source file to run. Absent: start the interactive REPL.
  file: Option<PathBuf>,
}

impl Cli {
  pub fn run(self) -> anyhow::Result<()> {
    if self.version {
      println!("luci {}", env!("CARGO_PKG_VERSION"));
      return Ok(());
    }
    if self.help {
      print_help();
      return Ok(());
    }

    let Some(path) = self.file else {
      return crate::repl::run(self.verbose).map_err(|e| anyhow::anyhow!(e.to_string()));
    };

    let source = read_file(&path)?;

    if self.dot {
      let module = syntax::parse(&source).map_err(|mut errors| report(&source, errors.remove(0)))?;
      println!("{}", syntax::dot::to_dot(&module));
      return Ok(());
    }

    let mut rt = luci::Runtime::new().with_verbose(self.verbose);
    let proto = rt.compile(&source).map_err(|e| report(&source, e))?;

    if self.print_bytecode {
      println!("{}", luci::opcode::disassemble(&proto.instructions));
    }
    if self.emit_bytecode {
      eprintln!("(bytecode serialization is not implemented; this is a stub)");
    }
    if self.no_exec {
      return Ok(());
    }

    match rt.run(proto) {
      Ok(v) => {
        if self.verbose {
          eprintln!("=> {}", rt.repr(v));
        }
        Ok(())
      }
      Err(e) => Err(report(&source, e)),
    }
  }
}

fn report(source: &str, e: diag::Error) -> anyhow::Error {
  eprintln!("{}", diag::Report::new(&e).with_source(source));
  anyhow::anyhow!("luci: execution failed")
}

/// `-h`: usage plus, per the original's `help()`, the byte size of each
/// runtime value variant (`src/main.c`).
fn print_help() {
  println!("usage: luci [-hvngpcV] [file]");
  println!();
  println!("  -h   print this help and exit");
  println!("  -v   verbose: print compile/run timing to stderr");
  println!("  -n   parse and compile only, do not execute");
  println!("  -g   emit a DOT graph of the parsed AST");
  println!("  -p   print the compiled bytecode disassembly");
  println!("  -c   emit serialized bytecode (stub)");
  println!("  -V   print the version and exit");
  println!();
  println!("value sizes (bytes):");
  println!("  Value          {}", std::mem::size_of::<luci::Value>());
  println!("  FunctionProto  {}", std::mem::size_of::<luci::FunctionProto>());
}
