use std::path::Path;

use anyhow::Context;

/// Reads the named source file, per spec §6: "the final non-flag argument
/// is the source filename". Absent filename is handled by the caller,
/// which falls back to the REPL instead of calling this.
pub fn read_file(path: &Path) -> anyhow::Result<String> {
  std::fs::read_to_string(path)
    .with_context(|| format!("failed to read file at {}", path.display()))
}
