pub mod convert;
pub mod native;
pub mod scval;
pub mod strkey;
pub mod wide;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use stellar_xdr::curr::{Limits, ReadXdr, WriteXdr};
use tracing::debug;

pub use convert::*;
pub use native::{NativeValue, from_native, scval_to_bigint, to_native};
pub use scval::*;

use crate::types::Result;
use crate::utils::config::CodecConfig;

/// Base64 XDR entry points with a configured nesting limit
pub struct ValueCodec {
    max_depth: u32,
}

impl ValueCodec {
    pub fn new(config: &CodecConfig) -> Self {
        Self {
            max_depth: config.max_depth,
        }
    }

    pub fn decode(&self, base64_xdr: &str) -> Result<ScVal> {
        let bytes = STANDARD.decode(base64_xdr.trim())?;
        debug!(len = bytes.len(), "decoding value");
        let limits = Limits {
            depth: self.max_depth,
            len: bytes.len(),
        };
        Ok(ScVal::from_xdr(&bytes, limits)?)
    }

    pub fn encode(&self, value: &ScVal) -> Result<String> {
        Ok(value.to_xdr_base64(Limits::depth(self.max_depth))?)
    }

    pub fn decode_native(&self, base64_xdr: &str) -> Result<NativeValue> {
        to_native(&self.decode(base64_xdr)?)
    }

    pub fn encode_native(&self, value: &NativeValue) -> Result<String> {
        self.encode(&from_native(value)?)
    }
}

impl Default for ValueCodec {
    fn default() -> Self {
        Self::new(&CodecConfig::default())
    }
}

/// Parse one base64-encoded XDR value
pub fn decode(base64_xdr: &str) -> Result<ScVal> {
    ValueCodec::default().decode(base64_xdr)
}

/// Serialize a value to base64 XDR
pub fn encode(value: &ScVal) -> Result<String> {
    ValueCodec::default().encode(value)
}

/// Serialize a native value through its canonical tagged form
pub fn encode_native(value: &NativeValue) -> Result<String> {
    ValueCodec::default().encode_native(value)
}

/// Decode base64 XDR straight to its native form
pub fn scval_str_to_native(base64_xdr: &str) -> Result<NativeValue> {
    ValueCodec::default().decode_native(base64_xdr)
}
