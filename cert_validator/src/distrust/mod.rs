// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! CA distrust policies.
//!
//! A policy vetoes chains that a trust anchor alone would accept, e.g.
//! server certificates issued by a retired CA after a cutover date. The set
//! of enabled policies is fixed when a validator is built.
//!
//! # Shipped policies
//! - `SYMANTEC_TLS`: TLS server certificates anchored by a legacy Symantec
//!   root and issued after 2019-04-16, except through the Apple IST CA 2/8
//!   sub-CAs, whose own cutover is 2019-12-31.

extern crate alloc;

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::format;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::time::Duration;

use crate::blocklist::fingerprint_hex;
use crate::certificate::Certificate;
use crate::error::{Error, ErrorKind, Result, ValidatorError};
use crate::time::Time;
use crate::validator::Variant;

/// Name of the shipped Symantec policy.
pub const SYMANTEC_TLS: &str = "SYMANTEC_TLS";

/// Enabled when no explicit list is configured.
pub const DEFAULT_DISTRUST_POLICIES: &str = SYMANTEC_TLS;

const SECONDS_PER_DAY: u64 = 86_400;

/// 2019-04-16
const APRIL_16_2019: u64 = 18_002;
/// 2019-12-31
const DECEMBER_31_2019: u64 = 18_261;

const SYMANTEC_ROOTS: &[&str] = &[
    // GeoTrust Global CA
    "FF856A2D251DCD88D36656F450126798CFABAADE40799C722DE4D2B5DB36A73A",
    // GeoTrust Primary Certification Authority
    "37D51006C512EAAB626421F1EC8C92013FC5F82AE98EE533EB4619B8DEB4D06C",
    // GeoTrust Primary Certification Authority - G2
    "5EDB7AC43B82A06A8761E8D7BE4979EBF2611F7DD79BF91C1C6B566A219ED766",
    // GeoTrust Primary Certification Authority - G3
    "B478B812250DF878635C2AA7EC7D155EAA625EE82916E2CD294361886CD1FBD4",
    // GeoTrust Universal CA
    "A0459B9F63B22559F5FA5D4C6DB3F9F72FF19342033578F073BF1D1B46CBB912",
    // thawte Primary Root CA
    "8D722F81A9C113C0791DF136A2966DB26C950A971DB46B4199F4EA54B78BFB9F",
    // thawte Primary Root CA - G2
    "A4310D50AF18A6447190372A86AFAF8B951FFB431D837F1E5688B45971ED1557",
    // thawte Primary Root CA - G3
    "4B03F45807AD70F21BFC2CAE71C9FDE4604C064CF5FFB686BAE5DBAAD7FDD34C",
    // VeriSign Class 3 Public Primary Certification Authority - G3
    "EB04CF5EB1F39AFA762F2BB120F296CBA520C1B97DB1589565B81CB9A17B7244",
    // VeriSign Class 3 Public Primary Certification Authority - G4
    "69DDD7EA90BB57C93E135DC85EA6FCD5480B603239BDC454FC758B2A26CF7F79",
    // VeriSign Class 3 Public Primary Certification Authority - G5
    "9ACFAB7E43C8D880D06B262A94DEEEE4B4659989C3D0CAF19BAF6405E41AB7DF",
    // VeriSign Universal Root Certification Authority
    "2399561127A57125DE8CEFEA610DDF2FA078B5C8067F4E828290BFB860E84B3C",
    // Symantec Class 3 Public Primary Certification Authority - G4
    "3F9F27D583204B9E09C8A3D2066C4B57D3A2479C3693650880505698105DBCE9",
    // Symantec Class 3 Public Primary Certification Authority - G6
    "3A43E220FE7F3EA9653D1E21742EAC2B75C20FD8980305BC502CAF8C2D9B41A1",
    // Symantec Class 3 ECC 256 bit Extended Validation CA
    "A4B6B3996FC2F306B3FD8681BD63413D8C5009CC4FA329C2CCF0E2FA1B140305",
    // Symantec Class 3 ECC 256 bit SSL CA - G2
    "83CE3C1229688A593D485F81973C0F9195431EDA37CC5E36430E79C7A888638B",
];

const SYMANTEC_EXEMPT_SUBCAS: &[(&str, u64)] = &[
    // Apple IST CA 2 - G1
    (
        "AC2B922ECFD5E01711772FEA8ED372DE9D1E2245FCE3F57A9CDBEC77296A424B",
        DECEMBER_31_2019,
    ),
    // Apple IST CA 8 - G1
    (
        "A4FE7C7F15155F3F0AEF7AAA83CF6E06DEB97CA3F909DF920AC1490882D488ED",
        DECEMBER_31_2019,
    ),
];

/// A named veto over validated chains.
pub trait DistrustPolicy: Send + Sync {
    fn name(&self) -> &str;

    /// `chain` is leaf first and ends with the trust anchor.
    fn check(&self, variant: Variant, chain: &[Certificate]) -> Result<()>;
}

/// Days since the Unix epoch of a calendar date.
pub fn day_of(year: u16, month: u8, day: u8) -> Result<u64> {
    Ok(Time::from_date(year, month, day)?.days_since_epoch())
}

fn format_day(day: u64) -> String {
    match Time::from_unix_duration(Duration::from_secs(day * SECONDS_PER_DAY)) {
        Ok(t) => {
            let dt = t.to_date_time();
            format!("{:04}-{:02}-{:02}", dt.year(), dt.month(), dt.day())
        }
        Err(_) => format!("day {}", day),
    }
}

fn fingerprint(cert: &Certificate, role: &str) -> Result<String> {
    cert.fingerprint_sha256()
        .map(|fp| fingerprint_hex(&fp))
        .map_err(|e| {
            log::error!("Cannot fingerprint {} {}", role, cert.subject());
            Error::Validation(
                ValidatorError::new(
                    ErrorKind::FingerprintUnavailable,
                    format!("cannot generate fingerprint for {}", role),
                )
                .with_certificate(cert)
                .with_cause(e),
            )
        })
}

/// Distrusts leaves issued after a cutover day when the chain ends at one of
/// a fixed set of anchors.
///
/// When the chain has a sub-CA below the anchor and that sub-CA is in the
/// exemption table, its own cutover applies instead. Dates compare at UTC
/// day granularity; a leaf issued on the cutover day passes.
#[derive(Debug, Clone)]
pub struct AnchorDistrustPolicy {
    name: String,
    variants: Vec<Variant>,
    anchors: BTreeSet<String>,
    cutover_day: u64,
    exemptions: BTreeMap<String, u64>,
}

impl AnchorDistrustPolicy {
    pub fn new(name: &str, variants: &[Variant], cutover_day: u64) -> Self {
        Self {
            name: name.to_string(),
            variants: variants.to_vec(),
            anchors: BTreeSet::new(),
            cutover_day,
            exemptions: BTreeMap::new(),
        }
    }

    pub fn with_anchor(mut self, fingerprint: &[u8; 32]) -> Self {
        self.anchors.insert(fingerprint_hex(fingerprint));
        self
    }

    pub fn with_exemption(mut self, sub_ca_fingerprint: &[u8; 32], cutover_day: u64) -> Self {
        self.exemptions
            .insert(fingerprint_hex(sub_ca_fingerprint), cutover_day);
        self
    }

    pub fn symantec_tls() -> Self {
        Self {
            name: SYMANTEC_TLS.to_string(),
            variants: alloc::vec![Variant::TlsServer],
            anchors: SYMANTEC_ROOTS.iter().map(|s| s.to_string()).collect(),
            cutover_day: APRIL_16_2019,
            exemptions: SYMANTEC_EXEMPT_SUBCAS
                .iter()
                .map(|(fp, day)| (fp.to_string(), *day))
                .collect(),
        }
    }

    pub fn cutover_day(&self) -> u64 {
        self.cutover_day
    }

    fn check_not_before(&self, leaf: &Certificate, cutover: u64, anchor: &Certificate) -> Result<()> {
        let issued = leaf.validity().not_before.days_since_epoch();
        if issued > cutover {
            log::error!(
                "{}: certificate issued {} after cutover {}",
                self.name,
                format_day(issued),
                format_day(cutover)
            );
            return Err(Error::validation_for(
                ErrorKind::UntrustedCertificate,
                format!(
                    "certificate issued after {} and anchored by a distrusted root: {}",
                    format_day(cutover),
                    anchor.subject()
                ),
                anchor,
            ));
        }
        Ok(())
    }
}

impl DistrustPolicy for AnchorDistrustPolicy {
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, variant: Variant, chain: &[Certificate]) -> Result<()> {
        if !self.variants.contains(&variant) {
            return Ok(());
        }
        let (leaf, anchor) = match (chain.first(), chain.last()) {
            (Some(leaf), Some(anchor)) => (leaf, anchor),
            _ => return Ok(()),
        };

        let anchor_fp = fingerprint(anchor, "trust anchor")?;
        if !self.anchors.contains(&anchor_fp) {
            return Ok(());
        }

        if chain.len() > 2 {
            let sub_ca = &chain[chain.len() - 2];
            let sub_fp = fingerprint(sub_ca, "intermediate CA")?;
            if let Some(&day) = self.exemptions.get(&sub_fp) {
                log::debug!("{}: chain goes through exempted sub-CA", self.name);
                return self.check_not_before(leaf, day, anchor);
            }
        }

        self.check_not_before(leaf, self.cutover_day, anchor)
    }
}

/// The enabled policies, evaluated in order.
#[derive(Clone, Default)]
pub struct DistrustPolicies {
    policies: Vec<Arc<dyn DistrustPolicy>>,
}

impl DistrustPolicies {
    pub fn none() -> Self {
        Self::default()
    }

    /// Parse a comma-separated enable list. Names are case sensitive;
    /// unknown names are logged and ignored.
    pub fn parse(list: &str) -> Self {
        let mut enabled = Self::none();
        for name in list.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            match name {
                SYMANTEC_TLS => {
                    if !enabled.names().contains(&SYMANTEC_TLS) {
                        enabled.push(Arc::new(AnchorDistrustPolicy::symantec_tls()));
                    }
                }
                unknown => log::warn!("Unknown distrust policy '{}' ignored", unknown),
            }
        }
        enabled
    }

    pub fn push(&mut self, policy: Arc<dyn DistrustPolicy>) {
        self.policies.push(policy);
    }

    pub fn with_policy(mut self, policy: Arc<dyn DistrustPolicy>) -> Self {
        self.push(policy);
        self
    }

    pub fn names(&self) -> Vec<&str> {
        self.policies.iter().map(|p| p.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn check_all(&self, variant: Variant, chain: &[Certificate]) -> Result<()> {
        for policy in &self.policies {
            log::trace!("Evaluating distrust policy {}", policy.name());
            policy.check(variant, chain)?;
        }
        Ok(())
    }
}

impl fmt::Debug for DistrustPolicies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cutover_constants() {
        assert_eq!(day_of(2019, 4, 16).unwrap(), APRIL_16_2019);
        assert_eq!(day_of(2019, 12, 31).unwrap(), DECEMBER_31_2019);
        assert_eq!(format_day(APRIL_16_2019), "2019-04-16");
    }

    #[test]
    fn test_parse_enable_list() {
        assert_eq!(DistrustPolicies::parse("SYMANTEC_TLS").names(), [SYMANTEC_TLS]);
        assert_eq!(
            DistrustPolicies::parse(" SYMANTEC_TLS , ,SYMANTEC_TLS").names(),
            [SYMANTEC_TLS]
        );
        assert!(DistrustPolicies::parse("symantec_tls").is_empty());
        assert!(DistrustPolicies::parse("BOGUS,").is_empty());
        assert!(DistrustPolicies::parse("").is_empty());
        assert_eq!(DistrustPolicies::parse("BOGUS,SYMANTEC_TLS").len(), 1);
    }

    #[test]
    fn test_symantec_tables() {
        let policy = AnchorDistrustPolicy::symantec_tls();
        assert_eq!(policy.anchors.len(), SYMANTEC_ROOTS.len());
        assert!(policy.anchors.iter().all(|fp| fp.len() == 64));
        assert_eq!(policy.exemptions.len(), 2);
        assert_eq!(policy.cutover_day(), APRIL_16_2019);
    }

    #[cfg(feature = "ring-backend")]
    mod chains {
        use super::super::*;
        use crate::test_util::{unix_of, CertBuilder};

        struct Fixture {
            root: Certificate,
            sub: Certificate,
        }

        fn fixture() -> Fixture {
            let root = CertBuilder::ca("Legacy Root", 2).key_seed(10).self_signed();
            let sub = CertBuilder::ca("Legacy Sub", 1).key_seed(11).signed_by(&root, 10);
            Fixture { root, sub }
        }

        fn leaf_issued(f: &Fixture, y: u16, m: u8, d: u8, h: u64) -> Certificate {
            let nb = unix_of(y, m, d) + h * 3600;
            CertBuilder::leaf("server.example")
                .key_seed(12)
                .validity(nb, nb + 365 * SECONDS_PER_DAY)
                .signed_by(&f.sub, 11)
        }

        fn policy(f: &Fixture) -> AnchorDistrustPolicy {
            AnchorDistrustPolicy::new("TEST", &[Variant::TlsServer], APRIL_16_2019)
                .with_anchor(&f.root.fingerprint_sha256().unwrap())
        }

        #[test]
        fn test_cutover_boundary() {
            let f = fixture();
            let p = policy(&f);

            let on_day = leaf_issued(&f, 2019, 4, 16, 0);
            let late_on_day = leaf_issued(&f, 2019, 4, 16, 23);
            let day_after = leaf_issued(&f, 2019, 4, 17, 0);

            for leaf in [&on_day, &late_on_day] {
                let chain = [leaf.clone(), f.sub.clone(), f.root.clone()];
                assert!(p.check(Variant::TlsServer, &chain).is_ok());
            }

            let chain = [day_after, f.sub.clone(), f.root.clone()];
            let err = p.check(Variant::TlsServer, &chain).unwrap_err();
            assert_eq!(err.kind(), Some(ErrorKind::UntrustedCertificate));
            assert_eq!(err.certificate(), Some(&f.root));

            // other variants are not affected
            assert!(p.check(Variant::TlsClient, &chain).is_ok());
            assert!(p.check(Variant::CodeSigning, &chain).is_ok());
        }

        #[test]
        fn test_exempt_sub_ca_governs() {
            let f = fixture();
            let p = policy(&f).with_exemption(&f.sub.fingerprint_sha256().unwrap(), DECEMBER_31_2019);

            let summer = leaf_issued(&f, 2019, 6, 1, 0);
            let new_year_eve = leaf_issued(&f, 2019, 12, 31, 12);
            let new_year = leaf_issued(&f, 2020, 1, 1, 0);

            for leaf in [summer, new_year_eve] {
                let chain = [leaf, f.sub.clone(), f.root.clone()];
                assert!(p.check(Variant::TlsServer, &chain).is_ok());
            }
            let chain = [new_year, f.sub.clone(), f.root.clone()];
            assert_eq!(
                p.check(Variant::TlsServer, &chain).unwrap_err().kind(),
                Some(ErrorKind::UntrustedCertificate)
            );
        }

        #[test]
        fn test_exemption_needs_a_sub_ca() {
            let f = fixture();
            // the exempted certificate is the leaf's direct issuer only when
            // the chain has more than two certificates
            let leaf = CertBuilder::leaf("direct.example")
                .key_seed(13)
                .validity(unix_of(2019, 6, 1), unix_of(2020, 6, 1))
                .signed_by(&f.root, 10);
            let p = policy(&f).with_exemption(&leaf.fingerprint_sha256().unwrap(), DECEMBER_31_2019);

            let chain = [leaf, f.root.clone()];
            assert!(p.check(Variant::TlsServer, &chain).is_err());
        }

        #[test]
        fn test_unlisted_anchor_passes() {
            let f = fixture();
            let p = AnchorDistrustPolicy::new("TEST", &[Variant::TlsServer], APRIL_16_2019);
            let chain = [leaf_issued(&f, 2024, 1, 1, 0), f.sub.clone(), f.root.clone()];
            assert!(p.check(Variant::TlsServer, &chain).is_ok());

            let registry = DistrustPolicies::parse(SYMANTEC_TLS);
            assert!(registry.check_all(Variant::TlsServer, &chain).is_ok());
        }
    }
}
