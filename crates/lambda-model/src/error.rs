use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("manifest encoding failed: {0}")]
    Encoding(String),
}
