//! Per-request network configuration parsing and validation.
//!
//! The host mediation framework hands every ad request a flat string-keyed
//! configuration map. This module wraps that map in [`NetworkConfig`] and
//! provides the typed, validated accessors the rest of the crate relies
//! on: [`AccountId`] and [`PlacementId`]. All accessors are pure functions
//! over the map with no side effects.
//!
//! # Configuration keys
//!
//! Keys are case-sensitive:
//!
//! - [`ACCOUNT_ID_KEY`] (`accountid`): required, non-empty string.
//! - [`PLACEMENT_ID_KEY`] (`placementid`): required, positive integer
//!   string.
//! - [`AD_MARKUP_KEY`] (`adm`): optional pre-fetched bidding payload. When
//!   present, the adapter loads the markup directly instead of issuing a
//!   traditional ad request.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration key holding the vendor account identifier.
pub const ACCOUNT_ID_KEY: &str = "accountid";

/// Configuration key holding the vendor placement identifier.
pub const PLACEMENT_ID_KEY: &str = "placementid";

/// Configuration key holding the bidding ad markup, when present.
pub const AD_MARKUP_KEY: &str = "adm";

/// Fixed extras key identifying the mediation partner to the vendor.
pub const TP_KEY: &str = "tp";

/// Fixed extras value identifying the mediation partner to the vendor.
pub const TP_VALUE: &str = "c_mopub";

/// Fixed extras key carrying the host SDK version, when discoverable.
pub const TP_VERSION_KEY: &str = "tp-ver";

/// Flat string-keyed configuration map supplied per ad request.
///
/// Owned by the caller and read-only to the adapter. The transparent serde
/// representation lets tests and demos build one straight from TOML:
///
/// ```
/// use inmobi_mediation_bridge::config::NetworkConfig;
///
/// let config: NetworkConfig = toml::from_str(r#"
///     accountid = "account-1234"
///     placementid = "42"
/// "#).unwrap();
///
/// assert_eq!(config.placement_id().unwrap().get(), 42);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkConfig(HashMap<String, String>);

impl NetworkConfig {
    /// Creates an empty configuration map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw value for a key, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns true if the map holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Extracts and validates the vendor account identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::AccountIdMissing`] when the `accountid`
    /// entry is absent or empty.
    pub fn account_id(&self) -> Result<AccountId, ConfigError> {
        match self.get(ACCOUNT_ID_KEY) {
            Some(value) if !value.is_empty() => Ok(AccountId(value.to_owned())),
            _ => Err(ConfigError::AccountIdMissing),
        }
    }

    /// Extracts and validates the vendor placement identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::PlacementIdMissing`] when the `placementid`
    /// entry is absent or empty, and [`ConfigError::PlacementIdInvalid`]
    /// when it is not parseable as a positive integer.
    pub fn placement_id(&self) -> Result<PlacementId, ConfigError> {
        let raw = match self.get(PLACEMENT_ID_KEY) {
            Some(value) if !value.is_empty() => value,
            _ => return Err(ConfigError::PlacementIdMissing),
        };

        match raw.parse::<i64>() {
            Ok(value) if value > 0 => Ok(PlacementId(value)),
            _ => Err(ConfigError::PlacementIdInvalid(raw.to_owned())),
        }
    }

    /// Returns the bidding ad markup, if the host's auction supplied one.
    #[must_use]
    pub fn ad_markup(&self) -> Option<&str> {
        self.get(AD_MARKUP_KEY)
    }
}

impl<K, V> FromIterator<(K, V)> for NetworkConfig
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Validated vendor account identifier: a non-empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountId(String);

impl AccountId {
    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated vendor placement identifier.
///
/// Invariant: the wrapped value is strictly positive. The only way to
/// construct one is through [`NetworkConfig::placement_id`], which
/// enforces the invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlacementId(i64);

impl PlacementId {
    /// Returns the numeric identifier.
    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PlacementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Builds the fixed extras map attached to non-bidding vendor requests.
///
/// Always carries the partner tag; the host SDK version is best-effort and
/// omitted when the host did not supply one.
#[must_use]
pub fn partner_extras(host_sdk_version: Option<&str>) -> HashMap<String, String> {
    let mut extras = HashMap::new();
    extras.insert(TP_KEY.to_owned(), TP_VALUE.to_owned());
    if let Some(version) = host_sdk_version {
        extras.insert(TP_VERSION_KEY.to_owned(), version.to_owned());
    }
    extras
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn config(entries: &[(&str, &str)]) -> NetworkConfig {
        entries.iter().copied().collect()
    }

    #[test]
    fn account_id_present() {
        let cfg = config(&[(ACCOUNT_ID_KEY, "account-1234")]);
        assert_eq!(cfg.account_id().unwrap().as_str(), "account-1234");
    }

    #[test]
    fn account_id_missing() {
        assert_eq!(NetworkConfig::new().account_id(), Err(ConfigError::AccountIdMissing));
    }

    #[test]
    fn account_id_empty_is_missing() {
        let cfg = config(&[(ACCOUNT_ID_KEY, "")]);
        assert_eq!(cfg.account_id(), Err(ConfigError::AccountIdMissing));
    }

    #[test]
    fn placement_id_valid() {
        let cfg = config(&[(PLACEMENT_ID_KEY, "42")]);
        assert_eq!(cfg.placement_id().unwrap().get(), 42);
    }

    #[test]
    fn placement_id_missing() {
        assert_eq!(NetworkConfig::new().placement_id(), Err(ConfigError::PlacementIdMissing));
        let cfg = config(&[(PLACEMENT_ID_KEY, "")]);
        assert_eq!(cfg.placement_id(), Err(ConfigError::PlacementIdMissing));
    }

    #[test]
    fn placement_id_rejects_zero_negative_and_garbage() {
        for raw in ["0", "-5", "abc"] {
            let cfg = config(&[(PLACEMENT_ID_KEY, raw)]);
            assert_eq!(
                cfg.placement_id(),
                Err(ConfigError::PlacementIdInvalid(raw.to_owned())),
                "expected rejection for {raw:?}",
            );
        }
    }

    #[test]
    fn ad_markup_passthrough() {
        let cfg = config(&[(AD_MARKUP_KEY, "<payload>")]);
        assert_eq!(cfg.ad_markup(), Some("<payload>"));
        assert_eq!(NetworkConfig::new().ad_markup(), None);
    }

    #[test]
    fn partner_extras_with_host_version() {
        let extras = partner_extras(Some("5.18.0"));
        assert_eq!(extras.get(TP_KEY).map(String::as_str), Some(TP_VALUE));
        assert_eq!(extras.get(TP_VERSION_KEY).map(String::as_str), Some("5.18.0"));
    }

    #[test]
    fn partner_extras_without_host_version() {
        let extras = partner_extras(None);
        assert_eq!(extras.len(), 1);
        assert!(!extras.contains_key(TP_VERSION_KEY));
    }

    #[test]
    fn config_from_toml() {
        let cfg: NetworkConfig = toml::from_str(
            r#"
            accountid = "acct"
            placementid = "1337"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.account_id().unwrap().as_str(), "acct");
        assert_eq!(cfg.placement_id().unwrap().get(), 1337);
    }

    proptest! {
        #[test]
        fn positive_placements_round_trip(id in 1_i64..=i64::MAX) {
            let cfg = config(&[(PLACEMENT_ID_KEY, id.to_string().as_str())]);
            prop_assert_eq!(cfg.placement_id().unwrap().get(), id);
        }

        #[test]
        fn non_positive_placements_are_invalid(id in i64::MIN..=0_i64) {
            let raw = id.to_string();
            let cfg = config(&[(PLACEMENT_ID_KEY, raw.as_str())]);
            prop_assert_eq!(cfg.placement_id(), Err(ConfigError::PlacementIdInvalid(raw)));
        }

        #[test]
        fn non_numeric_placements_are_invalid(raw in "[a-zA-Z][a-zA-Z0-9]{0,8}") {
            let cfg = config(&[(PLACEMENT_ID_KEY, raw.as_str())]);
            prop_assert_eq!(cfg.placement_id(), Err(ConfigError::PlacementIdInvalid(raw)));
        }
    }
}
