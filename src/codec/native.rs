use std::collections::BTreeMap;
use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use num_bigint::BigInt;
use serde::ser::{SerializeMap, SerializeSeq, SerializeStruct};
use serde::{Serialize, Serializer};
use tracing::warn;

use crate::codec::convert::{i128_to_scval, i256_to_scval, u128_to_scval, u256_to_scval};
use crate::codec::scval::{
    self, ContractExecutable, Hash, ScContractInstance, ScMapEntry, ScVal, is_valid_symbol,
    map_entries, vec_items,
};
use crate::codec::{strkey, wide};
use crate::types::{Result, SwapError};

/// Plain Rust view of a decoded `ScVal`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NativeValue {
    Bool(bool),
    /// 32-bit integers, and `Void` as zero
    Number(i64),
    /// 64/128/256-bit integers, timepoints, durations and nonces
    BigInt(BigInt),
    /// Strings, symbols and address strkeys
    String(String),
    Bytes(Vec<u8>),
    Vec(Vec<NativeValue>),
    /// A map keyed by the display form of its keys
    Object(BTreeMap<String, NativeValue>),
    /// A map nested directly as the value of an `Object` entry
    Map(BTreeMap<NativeValue, NativeValue>),
    Instance(ScContractInstance),
}

/// Convert a tagged value to its native form.
///
/// Map values that are themselves maps become `NativeValue::Map`; any deeper
/// map under those goes back through the `Object` rule.
pub fn to_native(value: &ScVal) -> Result<NativeValue> {
    let native = match value {
        ScVal::Bool(b) => NativeValue::Bool(*b),
        ScVal::Void => NativeValue::Number(0),
        ScVal::U32(n) => NativeValue::Number(*n as i64),
        ScVal::I32(n) => NativeValue::Number(*n as i64),
        ScVal::U64(_)
        | ScVal::I64(_)
        | ScVal::U128(_)
        | ScVal::I128(_)
        | ScVal::U256(_)
        | ScVal::I256(_) => NativeValue::BigInt(wide_to_bigint(value)?),
        ScVal::Timepoint(t) => NativeValue::BigInt(BigInt::from(t.0)),
        ScVal::Duration(d) => NativeValue::BigInt(BigInt::from(d.0)),
        ScVal::LedgerKeyNonce(key) => NativeValue::BigInt(BigInt::from(key.nonce)),
        ScVal::Address(address) => NativeValue::String(strkey::encode_address(address)),
        ScVal::String(s) => NativeValue::String(String::from_utf8_lossy(s.0.as_slice()).into_owned()),
        ScVal::Symbol(s) => NativeValue::String(String::from_utf8_lossy(s.0.as_slice()).into_owned()),
        ScVal::Bytes(data) => NativeValue::Bytes(data.0.to_vec()),
        ScVal::Vec(items) => NativeValue::Vec(
            vec_items(items)
                .iter()
                .map(to_native)
                .collect::<Result<Vec<_>>>()?,
        ),
        ScVal::Map(entries) => {
            let mut object = BTreeMap::new();
            for entry in map_entries(entries) {
                let key = to_native(&entry.key)?.to_string();
                let val = match &entry.val {
                    ScVal::Map(inner) => NativeValue::Map(to_assoc(map_entries(inner))?),
                    other => to_native(other)?,
                };
                object.insert(key, val);
            }
            NativeValue::Object(object)
        }
        ScVal::ContractInstance(instance) => NativeValue::Instance(instance.clone()),
        ScVal::Error(_) | ScVal::LedgerKeyContractInstance => {
            warn!(tag = value.name(), "no native form for value");
            return Err(SwapError::unsupported(value.name()));
        }
    };
    Ok(native)
}

fn to_assoc(entries: &[ScMapEntry]) -> Result<BTreeMap<NativeValue, NativeValue>> {
    let mut map = BTreeMap::new();
    for entry in entries {
        map.insert(to_native(&entry.key)?, to_native(&entry.val)?);
    }
    Ok(map)
}

/// Canonical tagged form of a native value.
///
/// Numbers take the narrowest of `I32`/`U32`/`I64`, big integers the narrowest
/// of `I128`/`U128`/`I256`/`U256`, strings become `String`, and object keys
/// become symbols when they are valid symbols and strings otherwise.
/// `to_native` inverts this for every value it can itself produce.
pub fn from_native(value: &NativeValue) -> Result<ScVal> {
    let scval = match value {
        NativeValue::Bool(b) => ScVal::Bool(*b),
        NativeValue::Number(n) => number_to_scval(*n),
        NativeValue::BigInt(n) => bigint_to_scval(n)?,
        NativeValue::String(s) => scval::string(s)?,
        NativeValue::Bytes(data) => scval::bytes(data.clone())?,
        NativeValue::Vec(items) => {
            scval::vec(items.iter().map(from_native).collect::<Result<Vec<_>>>()?)?
        }
        NativeValue::Object(object) => scval::map(
            object
                .iter()
                .map(|(key, val)| Ok((object_key(key)?, from_native(val)?)))
                .collect::<Result<Vec<_>>>()?,
        )?,
        NativeValue::Map(entries) => scval::map(
            entries
                .iter()
                .map(|(key, val)| Ok((from_native(key)?, from_native(val)?)))
                .collect::<Result<Vec<_>>>()?,
        )?,
        NativeValue::Instance(instance) => ScVal::ContractInstance(instance.clone()),
    };
    Ok(scval)
}

fn number_to_scval(n: i64) -> ScVal {
    if let Ok(v) = i32::try_from(n) {
        ScVal::I32(v)
    } else if let Ok(v) = u32::try_from(n) {
        ScVal::U32(v)
    } else {
        ScVal::I64(n)
    }
}

fn bigint_to_scval(value: &BigInt) -> Result<ScVal> {
    let fits = |count: usize, signed: bool| {
        let (min, max) = wide::bounds(count, signed);
        *value >= min && *value <= max
    };
    if fits(2, true) {
        i128_to_scval(value)
    } else if fits(2, false) {
        u128_to_scval(value)
    } else if fits(4, true) {
        i256_to_scval(value)
    } else {
        u256_to_scval(value)
    }
}

fn object_key(key: &str) -> Result<ScVal> {
    if is_valid_symbol(key) {
        scval::symbol(key)
    } else {
        scval::string(key)
    }
}

/// Integer tags (and `Void` as zero) as an arbitrary-precision integer
pub fn scval_to_bigint(value: &ScVal) -> Result<BigInt> {
    match value {
        ScVal::Void => Ok(BigInt::from(0)),
        _ => wide_to_bigint(value),
    }
}

fn wide_to_bigint(value: &ScVal) -> Result<BigInt> {
    let big = match value {
        ScVal::U64(n) => BigInt::from(*n),
        ScVal::I64(n) => BigInt::from(*n),
        ScVal::U128(p) => wide::from_limbs(&[p.hi, p.lo], false),
        ScVal::I128(p) => wide::from_limbs(&[p.hi as u64, p.lo], true),
        ScVal::U256(p) => wide::from_limbs(&[p.hi_hi, p.hi_lo, p.lo_hi, p.lo_lo], false),
        ScVal::I256(p) => wide::from_limbs(&[p.hi_hi as u64, p.hi_lo, p.lo_hi, p.lo_lo], true),
        other => return Err(SwapError::unsupported(other.name())),
    };
    Ok(big)
}

impl fmt::Display for NativeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeValue::Bool(b) => write!(f, "{}", b),
            NativeValue::Number(n) => write!(f, "{}", n),
            NativeValue::BigInt(n) => write!(f, "{}", n),
            NativeValue::String(s) => write!(f, "{}", s),
            NativeValue::Bytes(data) => {
                for byte in data {
                    write!(f, "{:02x}", byte)?;
                }
                Ok(())
            }
            NativeValue::Vec(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            NativeValue::Object(object) => {
                write!(f, "{{")?;
                for (i, (key, val)) in object.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, val)?;
                }
                write!(f, "}}")
            }
            NativeValue::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, val)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, val)?;
                }
                write!(f, "}}")
            }
            NativeValue::Instance(instance) => match &instance.executable {
                ContractExecutable::Wasm(Hash(hash)) => {
                    write!(f, "<instance wasm:")?;
                    for byte in hash {
                        write!(f, "{:02x}", byte)?;
                    }
                    write!(f, ">")
                }
                ContractExecutable::StellarAsset => write!(f, "<instance stellar-asset>"),
            },
        }
    }
}

/// JSON-friendly form: big integers as decimal strings, bytes as base64,
/// associative maps with display-form keys
impl Serialize for NativeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            NativeValue::Bool(b) => serializer.serialize_bool(*b),
            NativeValue::Number(n) => serializer.serialize_i64(*n),
            NativeValue::BigInt(n) => serializer.serialize_str(&n.to_string()),
            NativeValue::String(s) => serializer.serialize_str(s),
            NativeValue::Bytes(data) => serializer.serialize_str(&STANDARD.encode(data)),
            NativeValue::Vec(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            NativeValue::Object(object) => {
                let mut map = serializer.serialize_map(Some(object.len()))?;
                for (key, val) in object {
                    map.serialize_entry(key, val)?;
                }
                map.end()
            }
            NativeValue::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, val) in entries {
                    map.serialize_entry(&key.to_string(), val)?;
                }
                map.end()
            }
            NativeValue::Instance(instance) => {
                let mut state = serializer.serialize_struct("Instance", 2)?;
                let executable = match &instance.executable {
                    ContractExecutable::Wasm(Hash(hash)) => format!("wasm:{}", STANDARD.encode(hash)),
                    ContractExecutable::StellarAsset => "stellar_asset".to_string(),
                };
                state.serialize_field("executable", &executable)?;
                let storage = instance
                    .storage
                    .as_ref()
                    .map(|entries| to_native(&ScVal::Map(Some(entries.clone()))))
                    .transpose()
                    .map_err(<S::Error as serde::ser::Error>::custom)?;
                state.serialize_field("storage", &storage)?;
                state.end()
            }
        }
    }
}
