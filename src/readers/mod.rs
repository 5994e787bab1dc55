pub mod memory;
pub mod text;
pub mod types;
pub mod utils;

pub use memory::VecSource;
pub use text::{RowParser, TextSource};
pub use types::{FileError, FileType, ReadError, RecordSource};
pub use utils::{require_columns, resolve_input};

use std::path::Path;

pub fn open_records<T: 'static>(
    path: &Path,
    parse: RowParser<T>,
) -> Result<Box<dyn RecordSource<T>>, ReadError> {
    Ok(Box::new(TextSource::open(path, parse)?))
}
