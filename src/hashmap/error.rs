#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MapError {
    #[error("[HashMap]Key Is Not Exist")]
    KeyNotFound,
    #[error("[HashMap]Length Mismatch: {keys} keys, {values} values")]
    LengthMismatch { keys: usize, values: usize },
    #[error("[HashMap]Invalid Config: {0}")]
    InvalidConfig(String),
}
