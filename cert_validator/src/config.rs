// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Validator configuration.
//!
//! Built once, before any validator exists, and never changed afterwards.
//! With the `std` feature the configuration can also be read from the
//! environment:
//!
//! | Variable                              | Meaning                          |
//! |---------------------------------------|----------------------------------|
//! | `CERT_VALIDATOR_DISTRUST_POLICIES`    | comma-separated enable list      |
//! | `CERT_VALIDATOR_ALLOW_NON_CA_ANCHOR`  | accept anchors that are not CAs  |
//! | `CERT_VALIDATOR_CHECK_TLS_REVOCATION` | revocation checking for TLS      |
//! | `CERT_VALIDATOR_BLOCKLIST`            | untrusted SHA-256 fingerprints   |

extern crate alloc;

use crate::blocklist::Blocklist;
use crate::distrust::{DistrustPolicies, DEFAULT_DISTRUST_POLICIES};

pub const DEFAULT_MAX_CHAIN_DEPTH: usize = 10;

pub const ENV_DISTRUST_POLICIES: &str = "CERT_VALIDATOR_DISTRUST_POLICIES";
pub const ENV_ALLOW_NON_CA_ANCHOR: &str = "CERT_VALIDATOR_ALLOW_NON_CA_ANCHOR";
pub const ENV_CHECK_TLS_REVOCATION: &str = "CERT_VALIDATOR_CHECK_TLS_REVOCATION";
pub const ENV_BLOCKLIST: &str = "CERT_VALIDATOR_BLOCKLIST";

/// Options shared by every validator built from this configuration.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Distrust policies evaluated after end-entity checks
    pub distrust_policies: DistrustPolicies,

    /// Accept v3 anchors without CA basic constraints or keyCertSign
    pub allow_non_ca_anchor: bool,

    /// Enable revocation checking for the TLS variants
    pub check_tls_revocation: bool,

    /// Explicitly untrusted certificates
    pub blocklist: Blocklist,

    /// Longest input chain accepted
    pub max_chain_depth: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            distrust_policies: DistrustPolicies::parse(DEFAULT_DISTRUST_POLICIES),
            allow_non_ca_anchor: false,
            check_tls_revocation: false,
            blocklist: Blocklist::new(),
            max_chain_depth: DEFAULT_MAX_CHAIN_DEPTH,
        }
    }
}

impl ValidatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_distrust_policies(mut self, policies: DistrustPolicies) -> Self {
        self.distrust_policies = policies;
        self
    }

    pub fn allow_non_ca_anchor(mut self, allow: bool) -> Self {
        self.allow_non_ca_anchor = allow;
        self
    }

    pub fn check_tls_revocation(mut self, enable: bool) -> Self {
        self.check_tls_revocation = enable;
        self
    }

    pub fn with_blocklist(mut self, blocklist: Blocklist) -> Self {
        self.blocklist = blocklist;
        self
    }

    pub fn with_max_chain_depth(mut self, depth: usize) -> Self {
        self.max_chain_depth = depth;
        self
    }

    /// Read the configuration from the process environment.
    ///
    /// Unset variables keep their defaults. Booleans are true unless the
    /// value is `false` or `0`.
    #[cfg(feature = "std")]
    pub fn from_env() -> crate::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<alloc::string::String>,
    {
        let mut config = Self::default();

        if let Some(list) = lookup(ENV_DISTRUST_POLICIES) {
            config.distrust_policies = DistrustPolicies::parse(&list);
        }
        config.allow_non_ca_anchor = lookup(ENV_ALLOW_NON_CA_ANCHOR)
            .map(|v| parse_flag(&v))
            .unwrap_or(config.allow_non_ca_anchor);
        config.check_tls_revocation = lookup(ENV_CHECK_TLS_REVOCATION)
            .map(|v| parse_flag(&v))
            .unwrap_or(config.check_tls_revocation);
        if let Some(text) = lookup(ENV_BLOCKLIST) {
            config.blocklist = Blocklist::parse(&text)?;
        }

        log::debug!(
            "Validator config: distrust={:?} allow_non_ca_anchor={} check_tls_revocation={} blocklist={}",
            config.distrust_policies,
            config.allow_non_ca_anchor,
            config.check_tls_revocation,
            config.blocklist.len()
        );
        Ok(config)
    }
}

fn parse_flag(value: &str) -> bool {
    value != "false" && value != "0"
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::collections::BTreeMap;
    use alloc::string::{String, ToString};

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ValidatorConfig::default();
        assert_eq!(config.distrust_policies.names(), ["SYMANTEC_TLS"]);
        assert!(!config.allow_non_ca_anchor);
        assert!(!config.check_tls_revocation);
        assert!(config.blocklist.is_empty());
        assert_eq!(config.max_chain_depth, DEFAULT_MAX_CHAIN_DEPTH);
    }

    #[test]
    fn test_builder() {
        let config = ValidatorConfig::new()
            .with_distrust_policies(DistrustPolicies::none())
            .allow_non_ca_anchor(true)
            .check_tls_revocation(true)
            .with_max_chain_depth(3);
        assert!(config.distrust_policies.is_empty());
        assert!(config.allow_non_ca_anchor);
        assert!(config.check_tls_revocation);
        assert_eq!(config.max_chain_depth, 3);
    }

    #[test]
    fn test_flags_from_lookup() {
        let config = ValidatorConfig::from_lookup(lookup_from(&[
            (ENV_ALLOW_NON_CA_ANCHOR, "yes"),
            (ENV_CHECK_TLS_REVOCATION, "0"),
        ]))
        .unwrap();
        assert!(config.allow_non_ca_anchor);
        assert!(!config.check_tls_revocation);

        let config =
            ValidatorConfig::from_lookup(lookup_from(&[(ENV_ALLOW_NON_CA_ANCHOR, "false")]))
                .unwrap();
        assert!(!config.allow_non_ca_anchor);
    }

    #[test]
    fn test_policies_and_blocklist_from_lookup() {
        let fp = "FF856A2D251DCD88D36656F450126798CFABAADE40799C722DE4D2B5DB36A73A";
        let config = ValidatorConfig::from_lookup(lookup_from(&[
            (ENV_DISTRUST_POLICIES, "NOT_A_POLICY"),
            (ENV_BLOCKLIST, fp),
        ]))
        .unwrap();
        assert!(config.distrust_policies.is_empty());
        assert_eq!(config.blocklist.len(), 1);

        assert!(ValidatorConfig::from_lookup(lookup_from(&[(ENV_BLOCKLIST, "zz")])).is_err());
    }
}
