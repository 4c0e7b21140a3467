//! Process-wide configuration for abacus
//!
//! The configuration holds the Bech32 human-readable prefixes for every
//! address role and the regular expression coin denominations must match.
//! It follows an initialize-then-seal discipline: a single writer adjusts
//! the values at startup, calls [`seal`], and from then on every reader
//! gets the same immutable [`Config`] without taking a lock.

use crate::error::{Result, SdkError};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};
use tracing::{debug, info, warn};

/// Default coin denomination pattern, without anchors
pub const DEFAULT_COIN_DENOM_REGEX: &str = r"[a-zA-Z][a-zA-Z0-9/:._-]{2,127}";

pub const DEFAULT_ACCOUNT_ADDR_PREFIX: &str = "cosmos";
pub const DEFAULT_ACCOUNT_PUB_PREFIX: &str = "cosmospub";
pub const DEFAULT_VALIDATOR_ADDR_PREFIX: &str = "cosmosvaloper";
pub const DEFAULT_VALIDATOR_PUB_PREFIX: &str = "cosmosvaloperpub";
pub const DEFAULT_CONSENSUS_ADDR_PREFIX: &str = "cosmosvalcons";
pub const DEFAULT_CONSENSUS_PUB_PREFIX: &str = "cosmosvalconspub";

/// The three address roles that carry their own Bech32 prefixes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Account,
    Validator,
    Consensus,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Account, Role::Validator, Role::Consensus];

    pub fn name(&self) -> &'static str {
        match self {
            Role::Account => "account",
            Role::Validator => "validator",
            Role::Consensus => "consensus",
        }
    }
}

/// Bech32 prefixes for each `{role} x {address, public key}` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bech32Prefixes {
    pub account_addr: String,
    pub account_pub: String,
    pub validator_addr: String,
    pub validator_pub: String,
    pub consensus_addr: String,
    pub consensus_pub: String,
}

impl Default for Bech32Prefixes {
    fn default() -> Self {
        Self {
            account_addr: DEFAULT_ACCOUNT_ADDR_PREFIX.to_string(),
            account_pub: DEFAULT_ACCOUNT_PUB_PREFIX.to_string(),
            validator_addr: DEFAULT_VALIDATOR_ADDR_PREFIX.to_string(),
            validator_pub: DEFAULT_VALIDATOR_PUB_PREFIX.to_string(),
            consensus_addr: DEFAULT_CONSENSUS_ADDR_PREFIX.to_string(),
            consensus_pub: DEFAULT_CONSENSUS_PUB_PREFIX.to_string(),
        }
    }
}

impl Bech32Prefixes {
    pub fn addr(&self, role: Role) -> &str {
        match role {
            Role::Account => &self.account_addr,
            Role::Validator => &self.validator_addr,
            Role::Consensus => &self.consensus_addr,
        }
    }

    pub fn pubkey(&self, role: Role) -> &str {
        match role {
            Role::Account => &self.account_pub,
            Role::Validator => &self.validator_pub,
            Role::Consensus => &self.consensus_pub,
        }
    }

    fn set(&mut self, role: Role, addr: &str, pubkey: &str) {
        let (a, p) = match role {
            Role::Account => (&mut self.account_addr, &mut self.account_pub),
            Role::Validator => (&mut self.validator_addr, &mut self.validator_pub),
            Role::Consensus => (&mut self.consensus_addr, &mut self.consensus_pub),
        };
        *a = addr.to_string();
        *p = pubkey.to_string();
    }

    /// Check every prefix is a usable Bech32 HRP
    pub fn validate(&self) -> Result<()> {
        for role in Role::ALL {
            validate_hrp(self.addr(role))?;
            validate_hrp(self.pubkey(role))?;
        }
        Ok(())
    }
}

/// Prefixes must be valid lowercase Bech32 HRPs so encoding never fails later
pub fn validate_hrp(hrp: &str) -> Result<()> {
    bech32::Hrp::parse(hrp)
        .map_err(|e| SdkError::InvalidConfig(format!("invalid bech32 prefix {hrp:?}: {e}")))?;
    if hrp.bytes().any(|b| b.is_ascii_uppercase()) {
        return Err(SdkError::InvalidConfig(format!(
            "bech32 prefix must be lowercase: {hrp:?}"
        )));
    }
    Ok(())
}

fn compile_denom_regex(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{pattern})$"))
        .map_err(|e| SdkError::InvalidConfig(format!("invalid coin denom regex: {e}")))
}

/// Immutable snapshot of the configuration
#[derive(Debug, Clone)]
pub struct Config {
    prefixes: Bech32Prefixes,
    denom_pattern: String,
    denom_regex: Regex,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefixes: Bech32Prefixes::default(),
            denom_pattern: DEFAULT_COIN_DENOM_REGEX.to_string(),
            denom_regex: Regex::new(&format!("^(?:{DEFAULT_COIN_DENOM_REGEX})$"))
                .unwrap_or_else(|e| unreachable!("default denom regex is valid: {e}")),
        }
    }
}

impl Config {
    pub fn prefixes(&self) -> &Bech32Prefixes {
        &self.prefixes
    }

    pub fn addr_prefix(&self, role: Role) -> &str {
        self.prefixes.addr(role)
    }

    pub fn pub_prefix(&self, role: Role) -> &str {
        self.prefixes.pubkey(role)
    }

    pub fn account_addr_prefix(&self) -> &str {
        &self.prefixes.account_addr
    }

    pub fn validator_addr_prefix(&self) -> &str {
        &self.prefixes.validator_addr
    }

    pub fn consensus_addr_prefix(&self) -> &str {
        &self.prefixes.consensus_addr
    }

    /// The unanchored denom pattern
    pub fn coin_denom_regex(&self) -> &str {
        &self.denom_pattern
    }

    /// Check a denomination against the configured pattern
    pub fn validate_denom(&self, denom: &str) -> Result<()> {
        if !self.denom_regex.is_match(denom) {
            return Err(SdkError::InvalidDenom(denom.to_string()));
        }
        Ok(())
    }

    /// Serializable form of this configuration
    pub fn to_file(&self) -> ConfigFile {
        ConfigFile {
            bech32: self.prefixes.clone(),
            coin_denom_regex: Some(self.denom_pattern.clone()),
        }
    }
}

/// Holder of a [`Config`] that can be updated until it is sealed
#[derive(Debug)]
pub struct ConfigRegistry {
    current: RwLock<Arc<Config>>,
    sealed: OnceLock<Arc<Config>>,
}

impl Default for ConfigRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigRegistry {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(Config::default())),
            sealed: OnceLock::new(),
        }
    }

    /// Current configuration. Lock-free once sealed.
    pub fn get(&self) -> Arc<Config> {
        if let Some(sealed) = self.sealed.get() {
            return Arc::clone(sealed);
        }
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed.get().is_some()
    }

    fn update<F>(&self, what: &str, apply: F) -> Result<()>
    where
        F: FnOnce(&mut Config) -> Result<()>,
    {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if self.is_sealed() {
            warn!(setting = what, "rejected config update after seal");
            return Err(SdkError::Sealed);
        }
        let mut next = Config::clone(&guard);
        apply(&mut next)?;
        *guard = Arc::new(next);
        debug!(setting = what, "config updated");
        Ok(())
    }

    /// Set the address and public key prefixes for one role
    pub fn set_bech32_prefix(&self, role: Role, addr_prefix: &str, pub_prefix: &str) -> Result<()> {
        validate_hrp(addr_prefix)?;
        validate_hrp(pub_prefix)?;
        self.update(role.name(), |cfg| {
            cfg.prefixes.set(role, addr_prefix, pub_prefix);
            Ok(())
        })
    }

    pub fn set_bech32_prefix_for_account(&self, addr_prefix: &str, pub_prefix: &str) -> Result<()> {
        self.set_bech32_prefix(Role::Account, addr_prefix, pub_prefix)
    }

    pub fn set_bech32_prefix_for_validator(&self, addr_prefix: &str, pub_prefix: &str) -> Result<()> {
        self.set_bech32_prefix(Role::Validator, addr_prefix, pub_prefix)
    }

    pub fn set_bech32_prefix_for_consensus_node(
        &self,
        addr_prefix: &str,
        pub_prefix: &str,
    ) -> Result<()> {
        self.set_bech32_prefix(Role::Consensus, addr_prefix, pub_prefix)
    }

    /// Replace the denomination pattern. The pattern is matched against the
    /// whole denom; anchors are added here.
    pub fn set_coin_denom_regex(&self, pattern: &str) -> Result<()> {
        let regex = compile_denom_regex(pattern)?;
        self.update("coin_denom_regex", |cfg| {
            cfg.denom_pattern = pattern.to_string();
            cfg.denom_regex = regex;
            Ok(())
        })
    }

    /// Apply every setting from a config file in one update
    pub fn apply_file(&self, file: &ConfigFile) -> Result<()> {
        file.validate()?;
        let regex = match &file.coin_denom_regex {
            Some(pattern) => Some((pattern.clone(), compile_denom_regex(pattern)?)),
            None => None,
        };
        self.update("file", |cfg| {
            cfg.prefixes = file.bech32.clone();
            if let Some((pattern, regex)) = regex {
                cfg.denom_pattern = pattern;
                cfg.denom_regex = regex;
            }
            Ok(())
        })
    }

    /// Freeze the configuration. Calling it again returns the same handle.
    pub fn seal(&self) -> Arc<Config> {
        let guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let sealed = self.sealed.get_or_init(|| {
            info!(
                account_prefix = %guard.prefixes.account_addr,
                denom_regex = %guard.denom_pattern,
                "config sealed"
            );
            Arc::clone(&guard)
        });
        Arc::clone(sealed)
    }
}

lazy_static! {
    static ref GLOBAL_CONFIG: ConfigRegistry = ConfigRegistry::new();
}

/// The process-wide registry
pub fn registry() -> &'static ConfigRegistry {
    &GLOBAL_CONFIG
}

/// The process-wide configuration, built with defaults on first use
pub fn config() -> Arc<Config> {
    GLOBAL_CONFIG.get()
}

/// Seal the process-wide configuration
pub fn seal() -> Arc<Config> {
    GLOBAL_CONFIG.seal()
}

/// On-disk form of the configuration
///
/// ```toml
/// coin_denom_regex = "[a-z]{3,10}"
///
/// [bech32]
/// account_addr = "osmo"
/// account_pub = "osmopub"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub bech32: Bech32Prefixes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coin_denom_regex: Option<String>,
}

impl ConfigFile {
    /// Load from the default path, falling back to defaults if it doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SdkError::InvalidConfig(format!("{}: {}", path.display(), e)))?;

        let file: ConfigFile = toml::from_str(&content)
            .map_err(|e| SdkError::InvalidConfig(format!("{}: {}", path.display(), e)))?;

        file.validate()?;
        Ok(file)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SdkError::InvalidConfig(format!("failed to create config directory: {e}"))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| SdkError::InvalidConfig(format!("failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| SdkError::InvalidConfig(format!("{}: {}", path.display(), e)))
    }

    /// `~/.abacus/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| SdkError::InvalidConfig("home directory not found".to_string()))?;
        Ok(home.join(".abacus").join("config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        self.bech32.validate()?;
        if let Some(pattern) = &self.coin_denom_regex {
            compile_denom_regex(pattern)?;
        }
        Ok(())
    }
}
