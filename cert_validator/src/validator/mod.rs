// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Validation dispatcher.
//!
//! A [`Validator`] is built once per (algorithm, variant, trust anchor set)
//! and reused for any number of chains. It resolves the chain with the
//! selected algorithm and then runs the end-entity usage checks on the
//! leaf of the resolved chain.

extern crate alloc;

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::anchors::TrustAnchors;
use crate::certificate::Certificate;
use crate::chain::CertificateChain;
use crate::config::ValidatorConfig;
use crate::crypto_backend::CryptoBackend;
#[cfg(feature = "ring-backend")]
use crate::crypto_backend::RingBackend;
use crate::error::{Error, ErrorKind, Result};
use crate::path::{DfsPathBuilder, PathBuilder, PathParameters, PathValidator, PkixPathValidator};
#[cfg(feature = "ring-backend")]
use crate::time::SystemClock;
use crate::time::{Clock, Time};
use crate::x509::constraints::SharedConstraints;

pub mod end_entity;
pub mod pkix;
pub mod simple;

pub use end_entity::EndEntityChecker;
pub use pkix::TrustAnchorValidator;
pub use simple::SimpleValidator;

// ============================================================================
// Variant, algorithm and usage parameter
// ============================================================================

/// What the end-entity certificate is going to be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Generic,
    TlsServer,
    TlsClient,
    CodeSigning,
    JceSigning,
    TsaServer,
}

impl Variant {
    pub const ALL: [Variant; 6] = [
        Variant::Generic,
        Variant::TlsServer,
        Variant::TlsClient,
        Variant::CodeSigning,
        Variant::JceSigning,
        Variant::TsaServer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Generic => "generic",
            Variant::TlsServer => "tls-server",
            Variant::TlsClient => "tls-client",
            Variant::CodeSigning => "code-signing",
            Variant::JceSigning => "jce-signing",
            Variant::TsaServer => "tsa-server",
        }
    }

    pub fn is_tls(&self) -> bool {
        matches!(self, Variant::TlsServer | Variant::TlsClient)
    }

    /// Signed code stays verifiable after its certificates expire.
    pub fn skips_validity(&self) -> bool {
        matches!(self, Variant::CodeSigning | Variant::JceSigning)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for Variant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Variant::ALL
            .iter()
            .find(|v| v.as_str() == s)
            .copied()
            .ok_or_else(|| Error::internal(format!("unknown validator variant {}", s)))
    }
}

/// Chain resolution algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// Greedy top-down walk of the supplied chain
    Simple,
    /// Shortcuts over trusted certificates, then path validation or building
    TrustAnchorAware,
}

/// Variant-dependent input to the end-entity checks.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum UsageParameter {
    #[default]
    None,
    /// Negotiated TLS key exchange, e.g. `ECDHE_RSA`
    KeyExchange(String),
    /// Signing time of code or a JAR
    Timestamp(Time),
}

impl UsageParameter {
    pub fn key_exchange(&self) -> Option<&str> {
        match self {
            UsageParameter::KeyExchange(s) => Some(s),
            _ => None,
        }
    }

    pub fn timestamp(&self) -> Option<&Time> {
        match self {
            UsageParameter::Timestamp(t) => Some(t),
            _ => None,
        }
    }
}

// ============================================================================
// Request
// ============================================================================

/// One validation call.
///
/// `revocation_evidence[i]` belongs to `chain[i]`; `Some(vec![])` means no
/// evidence for that certificate.
#[derive(Clone)]
pub struct ValidationRequest<'a> {
    chain: &'a [Certificate],
    other_certs: &'a [Certificate],
    revocation_evidence: &'a [Option<Vec<u8>>],
    constraints: Option<SharedConstraints>,
    parameter: UsageParameter,
}

impl<'a> ValidationRequest<'a> {
    pub fn new(chain: &'a [Certificate]) -> Self {
        Self {
            chain,
            other_certs: &[],
            revocation_evidence: &[],
            constraints: None,
            parameter: UsageParameter::None,
        }
    }

    /// Extra certificates the path builder may use.
    pub fn with_other_certs(mut self, other_certs: &'a [Certificate]) -> Self {
        self.other_certs = other_certs;
        self
    }

    pub fn with_revocation_evidence(mut self, evidence: &'a [Option<Vec<u8>>]) -> Self {
        self.revocation_evidence = evidence;
        self
    }

    pub fn with_constraints(mut self, constraints: SharedConstraints) -> Self {
        self.constraints = Some(constraints);
        self
    }

    pub fn with_parameter(mut self, parameter: UsageParameter) -> Self {
        self.parameter = parameter;
        self
    }

    pub fn chain(&self) -> &'a [Certificate] {
        self.chain
    }

    pub fn other_certs(&self) -> &'a [Certificate] {
        self.other_certs
    }

    pub fn revocation_evidence(&self) -> &'a [Option<Vec<u8>>] {
        self.revocation_evidence
    }

    pub fn constraints(&self) -> Option<&SharedConstraints> {
        self.constraints.as_ref()
    }

    pub fn parameter(&self) -> &UsageParameter {
        &self.parameter
    }
}

impl fmt::Debug for ValidationRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationRequest")
            .field("chain", &self.chain.len())
            .field("other_certs", &self.other_certs.len())
            .field("revocation_evidence", &self.revocation_evidence.len())
            .field("constraints", &self.constraints.is_some())
            .field("parameter", &self.parameter)
            .finish()
    }
}

// ============================================================================
// Dispatcher
// ============================================================================

/// A chain validation algorithm.
pub trait ChainResolver: Send + Sync {
    /// Resolve `request.chain()` to a chain ordered leaf to anchor.
    fn resolve(&self, request: &ValidationRequest<'_>) -> Result<Vec<Certificate>>;

    /// Whether unrecognized critical extensions of the leaf are already
    /// rejected during resolution.
    fn checks_critical_extensions(&self) -> bool;
}

/// Public entry point of the engine.
pub struct Validator {
    variant: Variant,
    resolver: Box<dyn ChainResolver>,
    end_entity: EndEntityChecker,
    max_chain_depth: usize,
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("variant", &self.variant)
            .field("end_entity", &self.end_entity)
            .field("max_chain_depth", &self.max_chain_depth)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "ring-backend")]
impl Validator {
    /// A validator using the ring backend and the system clock.
    pub fn new(
        algorithm: Algorithm,
        variant: Variant,
        anchors: TrustAnchors,
        config: &ValidatorConfig,
    ) -> Self {
        Self::with_backend(
            algorithm,
            variant,
            anchors,
            config,
            RingBackend,
            Arc::new(SystemClock),
        )
    }
}

impl Validator {
    pub fn with_backend<B>(
        algorithm: Algorithm,
        variant: Variant,
        anchors: TrustAnchors,
        config: &ValidatorConfig,
        backend: B,
        clock: Arc<dyn Clock>,
    ) -> Self
    where
        B: CryptoBackend + Send + Sync + 'static,
    {
        log::debug!("Creating {:?} validator for {} with {} anchors", algorithm, variant, anchors.len());
        match algorithm {
            Algorithm::Simple => {
                let resolver = SimpleValidator::new(variant, anchors, config, backend, clock);
                Self::from_resolver(variant, Box::new(resolver), config)
            }
            Algorithm::TrustAnchorAware => {
                let params = PathParameters::new(Arc::new(anchors), variant)
                    .with_revocation_enabled(variant.is_tls() && config.check_tls_revocation)
                    .with_max_path_length(config.max_chain_depth);
                let validator: Arc<dyn PathValidator> = Arc::new(PkixPathValidator::new(backend));
                let builder: Arc<dyn PathBuilder> = Arc::new(DfsPathBuilder::new(validator.clone()));
                Self::from_parameters(params, validator, builder, config, clock)
            }
        }
    }

    /// A trust-anchor-aware validator over an externally prepared path
    /// configuration and collaborators.
    pub fn from_parameters(
        params: PathParameters,
        path_validator: Arc<dyn PathValidator>,
        path_builder: Arc<dyn PathBuilder>,
        config: &ValidatorConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let variant = params.variant();
        let resolver = TrustAnchorValidator::new(params, path_validator, path_builder, config, clock);
        Self::from_resolver(variant, Box::new(resolver), config)
    }

    pub fn from_resolver(
        variant: Variant,
        resolver: Box<dyn ChainResolver>,
        config: &ValidatorConfig,
    ) -> Self {
        Self {
            variant,
            resolver,
            end_entity: EndEntityChecker::new(variant, config.distrust_policies.clone()),
            max_chain_depth: config.max_chain_depth,
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Validate `request` and return the resolved chain, leaf first.
    pub fn validate(&self, request: &ValidationRequest<'_>) -> Result<CertificateChain> {
        let chain = request.chain();
        let leaf = chain
            .first()
            .ok_or_else(|| Error::validation(ErrorKind::EmptyChain, "empty certificate chain"))?;

        let resolved = self.resolver.resolve(request)?;
        log::debug!(
            "{} chain of {} resolved to {} certificates",
            self.variant,
            chain.len(),
            resolved.len()
        );

        // a trusted leaf ignores whatever follows it
        if resolved.len() > 1 && chain.len() > self.max_chain_depth {
            return Err(Error::validation_for(
                ErrorKind::PathLengthViolation,
                format!(
                    "chain of {} certificates exceeds maximum depth {}",
                    chain.len(),
                    self.max_chain_depth
                ),
                leaf,
            ));
        }

        // a lone trust anchor is not subject to end-entity checks
        if resolved.len() > 1 {
            let check_unresolved = !self.resolver.checks_critical_extensions();
            self.end_entity
                .check(&resolved, request.parameter(), check_unresolved)?;
        }

        Ok(CertificateChain::new(resolved))
    }

    /// [`Validator::validate`] with no extra inputs.
    pub fn validate_chain(&self, chain: &[Certificate]) -> Result<CertificateChain> {
        self.validate(&ValidationRequest::new(chain))
    }
}


#[cfg(all(test, not(feature = "ring-backend")))]
mod no_hash_tests {
    use super::*;
    use crate::blocklist::Blocklist;
    use crate::certificate::name::{name_from_pairs, CN};
    use crate::certificate::{SubjectPublicKeyInfo, TBSCertificate, Version};
    use crate::crypto_backend::SignatureAlgorithm;
    use crate::distrust::{AnchorDistrustPolicy, DistrustPolicies};
    use crate::time::{FixedClock, Validity};
    use crate::x509::oids;
    use alloc::vec;
    use core::time::Duration;
    use der::asn1::BitString;
    use spki::AlgorithmIdentifier;

    const ALGORITHMS: [Algorithm; 2] = [Algorithm::Simple, Algorithm::TrustAnchorAware];

    /// Signatures are not checked here, only hashing is missing.
    struct AcceptAll;

    impl CryptoBackend for AcceptAll {
        fn verify_signature(
            &self,
            _algorithm: SignatureAlgorithm,
            _tbs_data: &[u8],
            _signature: &[u8],
            _public_key: &[u8],
        ) -> Result<()> {
            Ok(())
        }
    }

    fn at(secs: u64) -> Time {
        Time::from_unix_duration(Duration::from_secs(secs)).unwrap()
    }

    fn v1_cert(subject: &str, issuer: &str, key: u8) -> Certificate {
        let ed25519 = AlgorithmIdentifier {
            oid: oids::ED25519,
            parameters: None,
        };
        let spki = SubjectPublicKeyInfo {
            algorithm: ed25519.clone(),
            subject_public_key: BitString::from_bytes(&[key; 32]).unwrap(),
        };
        let mut tbs = TBSCertificate::new(
            vec![key],
            ed25519.clone(),
            name_from_pairs(&[(CN, issuer)]).unwrap(),
            Validity::new(at(1_577_836_800), at(1_893_456_000)),
            name_from_pairs(&[(CN, subject)]).unwrap(),
            spki,
        );
        tbs.version = Version::V1;
        Certificate::new(tbs, ed25519, BitString::from_bytes(&[0u8; 64]).unwrap())
    }

    fn validator(algorithm: Algorithm, root: &Certificate, config: &ValidatorConfig) -> Validator {
        Validator::with_backend(
            algorithm,
            Variant::Generic,
            TrustAnchors::new(vec![root.clone()]).unwrap(),
            config,
            AcceptAll,
            Arc::new(FixedClock(at(1_704_067_200))),
        )
    }

    #[test]
    fn test_chain_passes_without_fingerprints() {
        let root = v1_cert("Root", "Root", 1);
        let leaf = v1_cert("Leaf", "Root", 2);
        for algorithm in ALGORITHMS {
            let out = validator(algorithm, &root, &ValidatorConfig::default())
                .validate_chain(&[leaf.clone()])
                .unwrap();
            assert_eq!(out.into_vec(), vec![leaf.clone(), root.clone()]);
        }
    }

    #[test]
    fn test_blocklist_without_hash_fails_closed() {
        let root = v1_cert("Root", "Root", 1);
        let leaf = v1_cert("Leaf", "Root", 2);
        let mut blocklist = Blocklist::new();
        blocklist.insert([0xab; 32]);
        let config = ValidatorConfig::default().with_blocklist(blocklist);

        for algorithm in ALGORITHMS {
            let err = validator(algorithm, &root, &config)
                .validate_chain(&[leaf.clone()])
                .unwrap_err();
            assert_eq!(err.kind(), Some(ErrorKind::FingerprintUnavailable));
            assert!(err.certificate().is_some());
        }
    }

    #[test]
    fn test_distrust_policy_without_hash_fails_closed() {
        let root = v1_cert("Root", "Root", 1);
        let leaf = v1_cert("Leaf", "Root", 2);
        let policy = AnchorDistrustPolicy::new("TEST", &[Variant::Generic], 0).with_anchor(&[0xcd; 32]);
        let config = ValidatorConfig::default()
            .with_distrust_policies(DistrustPolicies::none().with_policy(Arc::new(policy)));

        for algorithm in ALGORITHMS {
            let err = validator(algorithm, &root, &config)
                .validate_chain(&[leaf.clone()])
                .unwrap_err();
            assert_eq!(err.kind(), Some(ErrorKind::FingerprintUnavailable));
            assert_eq!(err.certificate(), Some(&root));
        }
    }
}
