use std::fs::File;
use std::io::{BufRead, BufReader, Write as _};

/// Backing storage for `Value::File`. Grounded on the builtins in
/// `examples/original_source/src/functions.c` (`lucy_open`, `lucy_close`,
/// `lucy_read`, `lucy_write`, `lucy_readline`, `lucy_readlines`): a
/// file handle plus the path and mode it was opened with, so `repr`
/// and error messages can name it.
pub struct LFile {
  pub path: String,
  pub mode: String,
  pub handle: Option<BufReader<File>>,
  pub writer: Option<File>,
}

impl LFile {
  pub fn open(path: String, mode: String) -> std::io::Result<Self> {
    let mut opts = std::fs::OpenOptions::new();
    match mode.as_str() {
      "r" => {
        opts.read(true);
      }
      "w" => {
        opts.write(true).create(true).truncate(true);
      }
      "a" => {
        opts.write(true).create(true).append(true);
      }
      _ => {
        opts.read(true);
      }
    }
    let file = opts.open(&path)?;
    let is_read = mode == "r";
    Ok(LFile {
      path,
      mode,
      handle: if is_read {
        Some(BufReader::new(file.try_clone()?))
      } else {
        None
      },
      writer: if is_read { None } else { Some(file) },
    })
  }

  pub fn close(&mut self) {
    self.handle = None;
    self.writer = None;
  }

  pub fn is_closed(&self) -> bool {
    self.handle.is_none() && self.writer.is_none()
  }

  pub fn read_line(&mut self) -> std::io::Result<Option<String>> {
    let Some(reader) = self.handle.as_mut() else {
      return Ok(None);
    };
    let mut buf = String::new();
    let n = reader.read_line(&mut buf)?;
    if n == 0 {
      Ok(None)
    } else {
      if buf.ends_with('\n') {
        buf.pop();
        if buf.ends_with('\r') {
          buf.pop();
        }
      }
      Ok(Some(buf))
    }
  }

  pub fn read_all(&mut self) -> std::io::Result<String> {
    use std::io::Read;
    let mut out = String::new();
    if let Some(reader) = self.handle.as_mut() {
      reader.read_to_string(&mut out)?;
    }
    Ok(out)
  }

  pub fn write_str(&mut self, s: &str) -> std::io::Result<()> {
    if let Some(w) = self.writer.as_mut() {
      w.write_all(s.as_bytes())?;
    }
    Ok(())
  }
}
