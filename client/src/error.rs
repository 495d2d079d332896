use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid contract ABI: {0}")]
    InvalidAbi(String),

    #[error("contract ABI exposes no supported mint function")]
    MintNotFound,

    #[error("unknown transaction id {0}")]
    UnknownTx(u64),

    #[error("history I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("history JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
