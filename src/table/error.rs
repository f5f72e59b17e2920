use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("table is full, all {capacity} slots are occupied")]
    TableFull { capacity: usize },
    #[error("key is {len} bytes long, at most {max} are allowed")]
    KeyTooLong { len: usize, max: usize },
}
