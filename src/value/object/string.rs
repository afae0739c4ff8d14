/// Backing storage for `Value::Str`. Bytes rather than `String` because
/// Luci source strings are not guaranteed to be valid UTF-8 once escapes
/// and indexing are involved (spec §3, `Str(Vec<u8>)`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LString {
  pub bytes: Vec<u8>,
}

impl LString {
  pub fn new(bytes: Vec<u8>) -> Self {
    LString { bytes }
  }

  pub fn as_str_lossy(&self) -> std::borrow::Cow<'_, str> {
    String::from_utf8_lossy(&self.bytes)
  }

  pub fn len(&self) -> usize {
    self.bytes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.bytes.is_empty()
  }
}
