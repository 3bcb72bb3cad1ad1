use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] mensura_core::Error),

    #[error("invalid unit table: {0}")]
    Table(#[from] serde_json::Error),
}
