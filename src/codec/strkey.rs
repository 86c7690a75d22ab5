//! `G...` / `C...` text form of ledger addresses.

use stellar_strkey::{Contract, Strkey, ed25519};

use crate::codec::scval::{AccountId, Hash, PublicKey, ScAddress, Uint256};
use crate::types::{Result, SwapError};

pub fn encode_address(address: &ScAddress) -> String {
    match address {
        ScAddress::Account(AccountId(PublicKey::PublicKeyTypeEd25519(Uint256(key)))) => {
            ed25519::PublicKey(*key).to_string()
        }
        ScAddress::Contract(Hash(id)) => Contract(*id).to_string(),
    }
}

/// Parse an account or contract strkey, verifying its checksum
pub fn decode_address(text: &str) -> Result<ScAddress> {
    let strkey = Strkey::from_string(text)
        .map_err(|e| SwapError::InvalidAddress(format!("{}: {}", text, e)))?;
    match strkey {
        Strkey::PublicKeyEd25519(ed25519::PublicKey(key)) => Ok(ScAddress::Account(AccountId(
            PublicKey::PublicKeyTypeEd25519(Uint256(key)),
        ))),
        Strkey::Contract(Contract(id)) => Ok(ScAddress::Contract(Hash(id))),
        _ => Err(SwapError::InvalidAddress(format!(
            "{}: not an account or contract address",
            text
        ))),
    }
}
