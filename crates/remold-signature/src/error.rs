pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("invalid signature `{signature}` at offset {offset}")]
    InvalidSignature { signature: String, offset: usize },
}
