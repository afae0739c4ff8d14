//! Interactive mode, spec §6: "absent [filename] -> interactive mode
//! reads from standard input". Grounded on
//! `examples/jprochazk-hebi/examples/cli/repl.rs`'s read-validate-eval
//! loop, simplified for Luci's keyword-terminated blocks (`do ... done`,
//! `then ... end`): instead of an indentation heuristic, a chunk is
//! "complete" once it parses without error, so the user can paste a
//! multi-line `while`/`func`/`if` and it is evaluated as one unit the
//! moment its closing keyword lands.
//!
//! Each chunk runs as an independent top-level module: top-level
//! variables from one submission are not visible to the next (the
//! compiler only threads one shared globals table through a single
//! `compile` call). The heap persists across chunks, so GC-managed
//! objects already printed or referenced by a later chunk's literals
//! keep working; only *bindings* don't carry over.

use rustyline::error::ReadlineError;
use rustyline::Editor;

pub fn run(verbose: bool) -> rustyline::Result<()> {
  let mut editor = Editor::<()>::new()?;
  let mut rt = luci::Runtime::new().with_verbose(verbose);

  println!("Luci REPL v{}", env!("CARGO_PKG_VERSION"));
  println!("Press CTRL-D to exit");

  let mut buffer = String::new();
  loop {
    let prompt = if buffer.is_empty() { ">>> " } else { "... " };
    match editor.readline(prompt) {
      Ok(line) => {
        editor.add_history_entry(line.as_str());
        if !buffer.is_empty() {
          buffer.push('\n');
        }
        buffer.push_str(&line);

        match syntax::parse(&buffer) {
          Ok(_) => {
            match rt.eval(&buffer) {
              Ok(v) => println!("{}", rt.repr(v)),
              Err(e) => eprintln!("{}", diag::Report::new(&e).with_source(&buffer)),
            }
            buffer.clear();
          }
          Err(mut errors) if line.trim().is_empty() => {
            // A blank line means the user is done with this chunk, but
            // it still doesn't parse: report the first error instead of
            // looping forever waiting for input that would complete it.
            eprintln!("{}", diag::Report::new(&errors.remove(0)).with_source(&buffer));
            buffer.clear();
          }
          Err(_) => {
            // Incomplete so far, or invalid but the user may still be
            // mid-block. Keep reading more lines.
          }
        }
      }
      Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => return Ok(()),
      Err(e) => return Err(e),
    }
  }
}
