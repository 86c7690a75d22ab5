//! Builders over the ledger's `ScVal` types.

pub use stellar_xdr::curr::{
    AccountId, ContractExecutable, Duration, Hash, Int128Parts, Int256Parts, PublicKey, ScAddress,
    ScBytes, ScContractInstance, ScError, ScErrorCode, ScMap, ScMapEntry, ScNonceKey, ScString,
    ScSymbol, ScVal, ScVec, TimePoint, UInt128Parts, UInt256Parts, Uint256,
};

use crate::types::{Result, SwapError};

pub const SYMBOL_MAX_LEN: usize = 32;

/// Symbols are at most 32 characters from `[A-Za-z0-9_]`
pub fn is_valid_symbol(name: &str) -> bool {
    name.len() <= SYMBOL_MAX_LEN && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

pub fn symbol(name: &str) -> Result<ScVal> {
    if !is_valid_symbol(name) {
        return Err(SwapError::Encode(format!("invalid symbol '{}'", name)));
    }
    Ok(ScVal::Symbol(ScSymbol(name.as_bytes().to_vec().try_into()?)))
}

pub fn string(text: &str) -> Result<ScVal> {
    Ok(ScVal::String(ScString(text.as_bytes().to_vec().try_into()?)))
}

pub fn bytes(data: Vec<u8>) -> Result<ScVal> {
    Ok(ScVal::Bytes(ScBytes(data.try_into()?)))
}

pub fn vec(items: Vec<ScVal>) -> Result<ScVal> {
    Ok(ScVal::Vec(Some(ScVec(items.try_into()?))))
}

pub fn map(entries: Vec<(ScVal, ScVal)>) -> Result<ScVal> {
    let entries: Vec<ScMapEntry> = entries
        .into_iter()
        .map(|(key, val)| ScMapEntry { key, val })
        .collect();
    Ok(ScVal::Map(Some(ScMap(entries.try_into()?))))
}

/// Entries of a vec body; an absent body reads as empty
pub fn vec_items(items: &Option<ScVec>) -> &[ScVal] {
    items.as_ref().map(|v| v.0.as_slice()).unwrap_or(&[])
}

/// Entries of a map body; an absent body reads as empty
pub fn map_entries(entries: &Option<ScMap>) -> &[ScMapEntry] {
    entries.as_ref().map(|m| m.0.as_slice()).unwrap_or(&[])
}
