//! Core types for abacus
//!
//! This crate provides the money types built on `abacus-math` (integer and
//! decimal coins), role-tagged Bech32 addresses, and the process-wide
//! configuration that supplies address prefixes and the denom pattern.

pub mod address;
pub mod coin;
pub mod config;
pub mod dec_coin;
pub mod error;
mod merge;

pub use abacus_math::{Dec, Int, MathError, Uint};
pub use address::{
    verify_address_format, AccAddress, AccountRole, Address, AddressRole, ConsAddress,
    ConsensusRole, ValAddress, ValidatorRole,
};
pub use coin::{validate_denom, Coin, Coins, CoinsBuilder};
pub use config::{config, registry, seal, Config, ConfigFile, ConfigRegistry, Role};
pub use dec_coin::{DecCoin, DecCoins};
pub use error::{IsSdkError, Result, SdkError};
