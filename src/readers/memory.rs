use std::collections::VecDeque;

use super::types::{ReadError, RecordSource};

/// Records held in memory, handed out in order.
#[derive(Debug, Clone, Default)]
pub struct VecSource<T> {
    records: VecDeque<T>,
}

impl<T> VecSource<T> {
    pub fn new(records: Vec<T>) -> Self {
        VecSource {
            records: records.into(),
        }
    }
}

impl<T> From<Vec<T>> for VecSource<T> {
    fn from(records: Vec<T>) -> Self {
        VecSource::new(records)
    }
}

impl<T> RecordSource<T> for VecSource<T> {
    fn next_record(&mut self) -> Result<Option<T>, ReadError> {
        Ok(self.records.pop_front())
    }
}
