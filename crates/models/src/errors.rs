use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid item id: {0}")]
    InvalidId(String),
    #[error("conversion error: {0}")]
    Conversion(String),
}
