//! Diagnostics for Luci: the error taxonomy of spec §7 plus a small
//! reporter that prints `kind: message (line:col)` to a writer, with
//! optional ANSI coloring via `owo_colors` when the target is a tty.

use std::fmt::{self, Display};

use owo_colors::OwoColorize;
use span::Span;
use thiserror::Error as ThisError;

/// The taxonomy from spec §7. Not Rust exception types — a tag used purely
/// for diagnostic classification, since every Luci error is fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum Kind {
  #[error("parse error")]
  Parse,
  #[error("compile error")]
  Compile,
  #[error("type error")]
  Type,
  #[error("value error")]
  Value,
  #[error("lookup error")]
  Lookup,
  #[error("resource error")]
  Resource,
}

#[derive(Debug, Clone)]
pub struct Error {
  pub kind: Kind,
  pub message: String,
  pub span: Option<Span>,
  /// For interpreter-stage errors: the opcode being executed (§7).
  pub opcode: Option<&'static str>,
}

impl Error {
  fn new(kind: Kind, message: impl Into<String>) -> Self {
    Error {
      kind,
      message: message.into(),
      span: None,
      opcode: None,
    }
  }

  pub fn parse(message: impl Into<String>, span: Span) -> Self {
    Self::new(Kind::Parse, message).with_span(span)
  }

  pub fn compile(message: impl Into<String>, span: Span) -> Self {
    Self::new(Kind::Compile, message).with_span(span)
  }

  pub fn ty(message: impl Into<String>) -> Self {
    Self::new(Kind::Type, message)
  }

  pub fn value(message: impl Into<String>) -> Self {
    Self::new(Kind::Value, message)
  }

  pub fn lookup(message: impl Into<String>) -> Self {
    Self::new(Kind::Lookup, message)
  }

  pub fn resource(message: impl Into<String>) -> Self {
    Self::new(Kind::Resource, message)
  }

  pub fn with_span(mut self, span: Span) -> Self {
    self.span = Some(span);
    self
  }

  pub fn with_opcode(mut self, name: &'static str) -> Self {
    self.opcode = Some(name);
    self
  }
}

impl Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    Report::new(self).fmt(f)
  }
}

impl std::error::Error for Error {}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Renders an [`Error`] as a single diagnostic line. Kept deliberately
/// simpler than a full snippet renderer: spec §7 only asks for "the
/// error kind, a human-readable message, and ... the current
/// instruction's opcode name".
pub struct Report<'a> {
  error: &'a Error,
  src: Option<&'a str>,
  color: bool,
}

impl<'a> Report<'a> {
  pub fn new(error: &'a Error) -> Self {
    Report {
      error,
      src: None,
      color: false,
    }
  }

  pub fn with_source(mut self, src: &'a str) -> Self {
    self.src = Some(src);
    self
  }

  pub fn with_color(mut self, color: bool) -> Self {
    self.color = color;
    self
  }
}

impl<'a> Display for Report<'a> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let kind = self.error.kind.to_string();
    if self.color {
      write!(f, "{}", kind.red().bold())?;
    } else {
      write!(f, "{kind}")?;
    }
    write!(f, ": {}", self.error.message)?;
    if let (Some(span), Some(src)) = (self.error.span, self.src) {
      write!(f, " ({})", span.line_col(src))?;
    }
    if let Some(opcode) = self.error.opcode {
      write!(f, " [at {opcode}]")?;
    }
    Ok(())
  }
}
