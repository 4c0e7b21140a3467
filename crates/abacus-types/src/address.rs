//! Address types for abacus
//!
//! An address is 20 raw bytes tagged at the type level with the role it
//! plays. The string form is Bech32 using the prefix the process-wide
//! [`Config`] assigns to that role, so the same bytes print differently as
//! an account, a validator operator or a consensus node.

use crate::config::{config, Config, Role};
use crate::error::{Result, SdkError};
use bech32::primitives::decode::CheckedHrpstring;
use bech32::{Bech32, Hrp};
use ripemd::Ripemd160;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::str::FromStr;

/// Length in bytes of a non-empty address
pub const ADDR_LEN: usize = 20;

/// Type-level marker for an address role
pub trait AddressRole:
    Clone + Copy + fmt::Debug + Default + PartialEq + Eq + PartialOrd + Ord + Hash + 'static
{
    const ROLE: Role;
    /// Name used by `Debug`
    const TYPE_NAME: &'static str;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountRole;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ValidatorRole;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConsensusRole;

impl AddressRole for AccountRole {
    const ROLE: Role = Role::Account;
    const TYPE_NAME: &'static str = "AccAddress";
}

impl AddressRole for ValidatorRole {
    const ROLE: Role = Role::Validator;
    const TYPE_NAME: &'static str = "ValAddress";
}

impl AddressRole for ConsensusRole {
    const ROLE: Role = Role::Consensus;
    const TYPE_NAME: &'static str = "ConsAddress";
}

/// Account address - 20 bytes
pub type AccAddress = Address<AccountRole>;

/// Validator operator address - 20 bytes
pub type ValAddress = Address<ValidatorRole>;

/// Consensus node address - 20 bytes
pub type ConsAddress = Address<ConsensusRole>;

/// Check raw bytes form a usable address
pub fn verify_address_format(bytes: &[u8]) -> Result<()> {
    if bytes.is_empty() {
        return Err(SdkError::InvalidAddress(
            "addresses cannot be empty".to_string(),
        ));
    }
    if bytes.len() != ADDR_LEN {
        return Err(SdkError::InvalidAddress(format!(
            "address length must be {ADDR_LEN} bytes, got {}",
            bytes.len()
        )));
    }
    Ok(())
}

/// Role-tagged address. The empty address has no bytes.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address<R: AddressRole> {
    bytes: Vec<u8>,
    role: PhantomData<R>,
}

impl<R: AddressRole> Address<R> {
    fn from_vec(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            role: PhantomData,
        }
    }

    /// The empty address
    pub fn empty() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Wrap exactly 20 raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        verify_address_format(bytes)?;
        Ok(Self::from_vec(bytes.to_vec()))
    }

    /// Create an address from a public key using the standard derivation
    /// ripemd160(sha256(pubkey_bytes))
    pub fn from_pubkey(pubkey_bytes: &[u8]) -> Self {
        let sha256_hash = Sha256::digest(pubkey_bytes);
        let ripemd160_hash = Ripemd160::digest(sha256_hash);
        Self::from_vec(ripemd160_hash.to_vec())
    }

    /// Decode a hex string, either case
    pub fn from_hex(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(SdkError::InvalidAddress(
                "decoding address from hex string failed: empty address".to_string(),
            ));
        }
        let bytes = hex::decode(s)
            .map_err(|e| SdkError::InvalidAddress(format!("invalid hex {s:?}: {e}")))?;
        Self::from_bytes(&bytes)
    }

    /// Decode a Bech32 string using the process-wide prefix for this role
    pub fn from_bech32(s: &str) -> Result<Self> {
        Self::from_bech32_with(s, &config())
    }

    pub fn from_bech32_with(s: &str, cfg: &Config) -> Result<Self> {
        if s.trim().is_empty() {
            return Err(SdkError::InvalidAddress(
                "empty address string is not allowed".to_string(),
            ));
        }
        // Bech32 checksum only; a Bech32m string of the same bytes is rejected
        let checked = CheckedHrpstring::new::<Bech32>(s)
            .map_err(|e| SdkError::InvalidAddress(format!("{s}: {e}")))?;

        let expected = cfg.addr_prefix(R::ROLE);
        let got = checked.hrp().to_lowercase();
        if got != expected {
            return Err(SdkError::InvalidAddress(format!(
                "invalid Bech32 prefix; expected {expected}, got {got}"
            )));
        }
        let data: Vec<u8> = checked.byte_iter().collect();
        Self::from_bytes(&data)
    }

    /// Bech32 form under the prefix `cfg` assigns to this role. The empty
    /// address encodes as an empty string.
    pub fn to_bech32_with(&self, cfg: &Config) -> Result<String> {
        if self.is_empty() {
            return Ok(String::new());
        }
        let prefix = cfg.addr_prefix(R::ROLE);
        let hrp = Hrp::parse(prefix)
            .map_err(|e| SdkError::InvalidConfig(format!("invalid bech32 prefix {prefix:?}: {e}")))?;
        bech32::encode::<Bech32>(hrp, &self.bytes)
            .map_err(|e| SdkError::InvalidAddress(format!("bech32 encoding failed: {e}")))
    }

    pub fn to_bech32(&self) -> Result<String> {
        self.to_bech32_with(&config())
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Upper-case hex of the raw bytes
    pub fn to_hex(&self) -> String {
        hex::encode_upper(&self.bytes)
    }

    /// Binary form: the raw bytes
    pub fn marshal(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    /// Parse the binary form; empty input is the empty address
    pub fn unmarshal(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Ok(Self::empty());
        }
        Self::from_bytes(data)
    }

    /// Reinterpret the same bytes under another role
    pub fn cast<R2: AddressRole>(&self) -> Address<R2> {
        Address::from_vec(self.bytes.clone())
    }
}

impl<R: AddressRole> fmt::Display for Address<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.to_bech32().map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}

impl<R: AddressRole> fmt::Debug for Address<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(R::TYPE_NAME).field(&self.to_hex()).finish()
    }
}

impl<R: AddressRole> fmt::UpperHex for Address<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl<R: AddressRole> fmt::LowerHex for Address<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.bytes))
    }
}

impl<R: AddressRole> fmt::Pointer for Address<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(&self.bytes.as_ptr(), f)
    }
}

impl<R: AddressRole> FromStr for Address<R> {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_bech32(s)
    }
}

impl<R: AddressRole> AsRef<[u8]> for Address<R> {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl<R: AddressRole> TryFrom<&[u8]> for Address<R> {
    type Error = SdkError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes(bytes)
    }
}

impl<R: AddressRole> Serialize for Address<R> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let s = self.to_bech32().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&s)
    }
}

impl<'de, R: AddressRole> Deserialize<'de> for Address<R> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s.trim().is_empty() {
            return Ok(Self::empty());
        }
        Self::from_bech32(&s).map_err(serde::de::Error::custom)
    }
}
