use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use super::types::{FileType, ReadError, RecordSource};
use super::utils::{file_type_from_path, is_data_line, split_fields};

/// Turns the numbers of one line into a record.
pub type RowParser<T> = Box<dyn Fn(&[f64]) -> Result<T, String>>;

/// Records read line by line from a delimited text file.
pub struct TextSource<T> {
    path: PathBuf,
    file_type: FileType,
    lines: Lines<BufReader<File>>,
    line_number: usize,
    parse: RowParser<T>,
}

impl<T> TextSource<T> {
    pub fn open<P: AsRef<Path>>(path: P, parse: RowParser<T>) -> Result<Self, ReadError> {
        let path = path.as_ref().to_path_buf();
        let file_type = file_type_from_path(&path)?;
        let file = File::open(&path).map_err(|source| ReadError::Io {
            path: path.clone(),
            source,
        })?;

        Ok(TextSource {
            path,
            file_type,
            lines: BufReader::new(file).lines(),
            line_number: 0,
            parse,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T> RecordSource<T> for TextSource<T> {
    fn next_record(&mut self) -> Result<Option<T>, ReadError> {
        for line in self.lines.by_ref() {
            self.line_number += 1;
            let line = line.map_err(|source| ReadError::Io {
                path: self.path.clone(),
                source,
            })?;
            if !is_data_line(&line) {
                continue;
            }

            let record = split_fields(&line, self.file_type)
                .and_then(|row| (self.parse)(&row))
                .map_err(|message| ReadError::Parse {
                    path: self.path.clone(),
                    line: self.line_number,
                    message,
                })?;
            return Ok(Some(record));
        }
        Ok(None)
    }
}
