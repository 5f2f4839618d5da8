use thiserror::Error;

#[derive(Debug, Error)]
pub enum KvError {
    #[error("kv: key not found")]
    NotFound,
    #[error("kv: batch already committed or rolled back")]
    BatchClosed,
    #[error("kv: underlying store error: {0}")]
    Store(String),
}
