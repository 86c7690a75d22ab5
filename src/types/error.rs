use thiserror::Error;

#[derive(Error, Debug)]
pub enum SwapError {
    #[error("Unsupported value variant: {0}")]
    UnsupportedVariant(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Value out of range: {0}")]
    OutOfRange(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Insufficient liquidity: {0}")]
    InsufficientLiquidity(String),

    #[error("Unknown token {0} for pair")]
    UnknownToken(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("XDR error: {0}")]
    Xdr(#[from] stellar_xdr::curr::Error),

    #[error("Base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Decimal error: {0}")]
    Decimal(#[from] rust_decimal::Error),

    #[error("Config file error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SwapError>;

impl SwapError {
    pub fn unsupported(tag: impl Into<String>) -> Self {
        Self::UnsupportedVariant(tag.into())
    }
}
