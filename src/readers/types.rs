use std::fmt;
use std::path::PathBuf;

/// A forward-only supply of records. Once `Ok(None)` has been returned the source is exhausted.
pub trait RecordSource<T> {
    fn next_record(&mut self) -> Result<Option<T>, ReadError>;
}

impl<T, S: RecordSource<T> + ?Sized> RecordSource<T> for Box<S> {
    fn next_record(&mut self) -> Result<Option<T>, ReadError> {
        (**self).next_record()
    }
}

#[derive(Debug)]
pub enum ReadError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },
    File(FileError),
}

#[derive(Debug)]
pub enum FileError {
    UnknownFileType(PathBuf),
    NotFound { name: String, base: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// Fields separated by blanks or tabs
    Whitespace,
    /// Fields separated by commas
    Csv,
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::Io { path, source } => {
                write!(f, "cannot read {}: {}", path.display(), source)
            }
            ReadError::Parse {
                path,
                line,
                message,
            } => write!(f, "{}:{}: {}", path.display(), line, message),
            ReadError::File(e) => write!(f, "{}", e),
        }
    }
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::UnknownFileType(path) => {
                write!(f, "unknown input file type: {}", path.display())
            }
            FileError::NotFound { name, base } => {
                write!(f, "input file {} not found under {}", name, base.display())
            }
        }
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReadError::Io { source, .. } => Some(source),
            ReadError::File(e) => Some(e),
            ReadError::Parse { .. } => None,
        }
    }
}

impl std::error::Error for FileError {}

impl From<FileError> for ReadError {
    fn from(err: FileError) -> ReadError {
        ReadError::File(err)
    }
}
