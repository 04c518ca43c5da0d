//! Serde helpers shared by the ledger types.
//!
//! Human-readable formats (JSON, TOML) get hex strings for byte fields and
//! decimal strings for amounts. Binary formats keep the raw bytes so the
//! encoding stays compact and canonical.

/// `Vec<u8>` as lowercase hex in human-readable formats.
pub mod hex_bytes {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            hex::encode(bytes).serialize(serializer)
        } else {
            bytes.serialize(serializer)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            let s = s.strip_prefix("0x").unwrap_or(&s);
            hex::decode(s).map_err(D::Error::custom)
        } else {
            Vec::<u8>::deserialize(deserializer)
        }
    }
}

/// `BigUint` as a decimal string in human-readable formats, minimal
/// big-endian magnitude bytes otherwise.
pub mod biguint {
    use num_bigint::BigUint;
    use serde::de::Error;
    use num_traits::Num;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            value.to_str_radix(10).serialize(serializer)
        } else {
            value.to_bytes_be().serialize(serializer)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            BigUint::from_str_radix(s.trim(), 10).map_err(D::Error::custom)
        } else {
            let bytes = Vec::<u8>::deserialize(deserializer)?;
            // zero is [0]; anything else must not carry a leading zero byte
            match bytes.as_slice() {
                [] => Err(D::Error::custom("empty amount magnitude")),
                [0, _, ..] => Err(D::Error::custom("amount magnitude has a leading zero byte")),
                _ => Ok(BigUint::from_bytes_be(&bytes)),
            }
        }
    }
}
