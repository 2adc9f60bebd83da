use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Selection set not found: `{0}`")]
    NotFound(String),

    #[error("No selection set to remove")]
    Empty,

    #[error("Index {index} is out of range for {len} selection sets")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Duplicate selection set name: `{0}`")]
    DuplicateName(String),
}
