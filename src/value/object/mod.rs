mod file;
mod iter;
mod list;
mod lmap;
mod string;

pub use file::LFile;
pub use iter::{IterSource, LIter};
pub use list::{resolve_index, LList};
pub use lmap::LMap;
pub use string::LString;
