// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Trust-anchor-aware chain validation.
//!
//! Cheap shortcuts are tried first, walking the chain from the leaf:
//! - the leaf is trusted: the chain is just the leaf
//! - certificate `i` is trusted (or shares name and key with an anchor):
//!   the prefix `[0, i)` goes to the path validator
//! - a name does not chain: the path builder takes over
//! - the last issuer names an anchor: the whole chain goes to the path
//!   validator
//!
//! Anything else is handed to the path builder with the rest of the chain
//! and the caller's extra certificates as the pool.

extern crate alloc;

use alloc::string::ToString;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;

use crate::blocklist::Blocklist;
use crate::certificate::{Certificate, Version};
use crate::config::ValidatorConfig;
use crate::error::{Error, ErrorKind, Result, ValidatorError};
use crate::path::{PathBuilder, PathParameters, PathValidator};
use crate::time::Clock;
use crate::validator::{ChainResolver, ValidationRequest};
use crate::x509::extensions::KeyUsage;

/// The modern chain algorithm, built on external path collaborators.
pub struct TrustAnchorValidator {
    params: PathParameters,
    path_validator: Arc<dyn PathValidator>,
    path_builder: Arc<dyn PathBuilder>,
    allow_non_ca_anchor: bool,
    blocklist: Blocklist,
    clock: Arc<dyn Clock>,
}

impl core::fmt::Debug for TrustAnchorValidator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TrustAnchorValidator")
            .field("params", &self.params)
            .field("allow_non_ca_anchor", &self.allow_non_ca_anchor)
            .field("blocklist", &self.blocklist.len())
            .finish_non_exhaustive()
    }
}

impl TrustAnchorValidator {
    pub fn new(
        params: PathParameters,
        path_validator: Arc<dyn PathValidator>,
        path_builder: Arc<dyn PathBuilder>,
        config: &ValidatorConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            params,
            path_validator,
            path_builder,
            allow_non_ca_anchor: config.allow_non_ca_anchor,
            blocklist: config.blocklist.clone(),
            clock,
        }
    }

    /// Base configuration every call starts from.
    pub fn parameters(&self) -> &PathParameters {
        &self.params
    }

    fn prepare(&self, request: &ValidationRequest<'_>) -> Result<PathParameters> {
        let mut params = self.params.clone();

        let timestamp = if params.variant().skips_validity() {
            request.parameter().timestamp().copied()
        } else {
            None
        };
        match (timestamp, params.date()) {
            (Some(ts), _) => params.set_date(ts),
            (None, Some(_)) => {}
            (None, None) => params.set_date(self.clock.now()?),
        }

        if let Some(constraints) = request.constraints() {
            params.add_constraints(constraints.clone());
        }

        let evidence = request.revocation_evidence();
        if params.revocation_checker().is_some() || params.revocation_enabled() {
            for (cert, item) in request.chain().iter().zip(evidence) {
                let Some(response) = item.as_ref().filter(|r| !r.is_empty()) else {
                    continue;
                };
                if let Err(e) = params.attach_stapled_response(cert, response.clone()) {
                    log::debug!("Stapled response for {} not attached: {}", cert.subject(), e);
                }
            }
        } else if evidence.iter().any(|e| e.is_some()) {
            log::debug!("Revocation checking disabled, ignoring stapled responses");
        }

        Ok(params)
    }

    /// Anchors must be CAs allowed to sign certificates.
    fn check_anchor(&self, anchor: &Certificate) -> Result<()> {
        if self.allow_non_ca_anchor || anchor.version() != Version::V3 {
            return Ok(());
        }
        if !anchor.is_ca() {
            return Err(Error::validation_for(
                ErrorKind::InvalidTrustAnchor,
                "trust anchor is not a CA",
                anchor,
            ));
        }
        match anchor.key_usage() {
            Ok(None) => Ok(()),
            Ok(Some(ku)) if ku.has(KeyUsage::KEY_CERT_SIGN) => Ok(()),
            _ => Err(Error::validation_for(
                ErrorKind::InvalidTrustAnchor,
                "trust anchor key usage does not permit certificate signing",
                anchor,
            )),
        }
    }

    fn validate_path(&self, path: &[Certificate], params: &PathParameters) -> Result<Vec<Certificate>> {
        log::debug!("pkix: validating path of {} certificates", path.len());
        let anchor = self
            .path_validator
            .validate(path, params)
            .map_err(|e| wrap(ErrorKind::PathValidationFailed, e))?;
        self.check_anchor(&anchor)?;

        let mut chain = path.to_vec();
        chain.push(anchor);
        Ok(chain)
    }

    fn build_path(&self, request: &ValidationRequest<'_>, params: &PathParameters) -> Result<Vec<Certificate>> {
        let chain = request.chain();
        let mut pool: Vec<Certificate> = chain[1..].to_vec();
        pool.extend(request.other_certs().iter().cloned());
        log::debug!("pkix: building path from a pool of {}", pool.len());

        let built = self
            .path_builder
            .build(&chain[0], &pool, params)
            .map_err(|e| wrap(ErrorKind::PathBuildingFailed, e))?;
        self.check_anchor(&built.anchor)?;
        Ok(built.into_chain())
    }

    fn resolve_unchecked(&self, request: &ValidationRequest<'_>) -> Result<Vec<Certificate>> {
        let chain = request.chain();
        let last = chain
            .last()
            .ok_or_else(|| Error::validation(ErrorKind::EmptyChain, "empty certificate chain"))?;
        let anchors = self.params.anchors();

        if anchors.contains(&chain[0]) {
            log::debug!("pkix: leaf is a trust anchor");
            return Ok(vec![chain[0].clone()]);
        }

        let params = self.prepare(request)?;

        for i in 0..chain.len() {
            let cert = &chain[i];
            if i != 0 && !cert.subject().matches(chain[i - 1].issuer()) {
                log::debug!("pkix: chain not ordered at depth {}", i);
                return self.build_path(request, &params);
            }
            if anchors.contains(cert) || anchors.has_subject_key(cert) {
                if i == 0 {
                    return Ok(vec![cert.clone()]);
                }
                log::debug!("pkix: trusted certificate at depth {}", i);
                return self.validate_path(&chain[..i], &params);
            }
        }

        if anchors.has_subject(last.issuer()) {
            return self.validate_path(chain, &params);
        }
        self.build_path(request, &params)
    }
}

/// Wrap a collaborator failure, keeping the offending certificate.
fn wrap(kind: ErrorKind, cause: Error) -> Error {
    if cause.kind() == Some(ErrorKind::InvalidTrustAnchor) {
        return cause;
    }
    let mut err = ValidatorError::new(kind, cause.to_string());
    if let Some(cert) = cause.certificate() {
        err = err.with_certificate(cert);
    }
    Error::Validation(err.with_cause(cause))
}

impl ChainResolver for TrustAnchorValidator {
    fn resolve(&self, request: &ValidationRequest<'_>) -> Result<Vec<Certificate>> {
        let resolved = self.resolve_unchecked(request)?;
        for cert in &resolved {
            self.blocklist.check(cert)?;
        }
        Ok(resolved)
    }

    fn checks_critical_extensions(&self) -> bool {
        self.path_validator.checks_critical_extensions()
            && self.path_builder.checks_critical_extensions()
    }
}

#[cfg(all(test, feature = "ring-backend"))]
mod tests {
    use super::*;
    use crate::anchors::TrustAnchors;
    use crate::crypto_backend::RingBackend;
    use crate::path::{BuiltPath, DfsPathBuilder, PkixPathValidator};
    use crate::test_util::{clock, now, unix_of, CertBuilder};
    use crate::time::Time;
    use crate::validator::{UsageParameter, Variant};
    use alloc::sync::Arc;
    use std::sync::Mutex;

    /// Records calls and answers with a fixed anchor.
    struct Recorder {
        anchor: Certificate,
        paths: Mutex<Vec<usize>>,
        dates: Mutex<Vec<Option<Time>>>,
        stapled: Mutex<usize>,
    }

    impl Recorder {
        fn new(anchor: Certificate) -> Arc<Self> {
            Arc::new(Self {
                anchor,
                paths: Mutex::new(Vec::new()),
                dates: Mutex::new(Vec::new()),
                stapled: Mutex::new(0),
            })
        }
    }

    impl PathValidator for Recorder {
        fn validate(&self, path: &[Certificate], params: &PathParameters) -> Result<Certificate> {
            self.paths.lock().unwrap().push(path.len());
            self.dates.lock().unwrap().push(params.date().copied());
            *self.stapled.lock().unwrap() = params.stapled_count();
            Ok(self.anchor.clone())
        }

        fn checks_critical_extensions(&self) -> bool {
            true
        }
    }

    impl PathBuilder for Recorder {
        fn build(
            &self,
            target: &Certificate,
            pool: &[Certificate],
            _params: &PathParameters,
        ) -> Result<BuiltPath> {
            self.paths.lock().unwrap().push(pool.len() + 100);
            Ok(BuiltPath {
                path: vec![target.clone()],
                anchor: self.anchor.clone(),
            })
        }

        fn checks_critical_extensions(&self) -> bool {
            false
        }
    }

    struct Fixture {
        root: Certificate,
        inter: Certificate,
        leaf: Certificate,
    }

    fn fixture() -> Fixture {
        let root = CertBuilder::ca("Root", 1).key_seed(1).self_signed();
        let inter = CertBuilder::ca("Inter", 0).key_seed(2).signed_by(&root, 1);
        let leaf = CertBuilder::leaf("Leaf").key_seed(3).signed_by(&inter, 2);
        Fixture { root, inter, leaf }
    }

    fn with_recorder(
        anchors: Vec<Certificate>,
        variant: Variant,
        rec: &Arc<Recorder>,
        config: &ValidatorConfig,
    ) -> TrustAnchorValidator {
        let params = PathParameters::new(Arc::new(TrustAnchors::new(anchors).unwrap()), variant);
        TrustAnchorValidator::new(params, rec.clone(), rec.clone(), config, clock())
    }

    fn real(anchors: Vec<Certificate>, config: &ValidatorConfig) -> TrustAnchorValidator {
        let params = PathParameters::new(
            Arc::new(TrustAnchors::new(anchors).unwrap()),
            Variant::Generic,
        );
        let pv: Arc<dyn PathValidator> = Arc::new(PkixPathValidator::new(RingBackend));
        let pb = Arc::new(DfsPathBuilder::new(pv.clone()));
        TrustAnchorValidator::new(params, pv, pb, config, clock())
    }

    #[test]
    fn test_shortcuts() {
        let f = fixture();
        let config = ValidatorConfig::default();
        let rec = Recorder::new(f.root.clone());
        let v = with_recorder(vec![f.root.clone()], Variant::Generic, &rec, &config);

        // whole chain ends just below the anchor
        let chain = [f.leaf.clone(), f.inter.clone()];
        let out = v.resolve(&ValidationRequest::new(&chain)).unwrap();
        assert_eq!(out, vec![f.leaf.clone(), f.inter.clone(), f.root.clone()]);

        // anchor inside the chain: prefix only
        let chain = [f.leaf.clone(), f.inter.clone(), f.root.clone()];
        v.resolve(&ValidationRequest::new(&chain)).unwrap();

        // misordered: builder with the rest of the chain as pool
        let chain = [f.leaf.clone(), f.root.clone(), f.inter.clone()];
        v.resolve(&ValidationRequest::new(&chain)).unwrap();

        assert_eq!(*rec.paths.lock().unwrap(), vec![2, 2, 102]);
        assert!(!v.checks_critical_extensions());
    }

    #[test]
    fn test_trusted_leaf() {
        let f = fixture();
        let rec = Recorder::new(f.root.clone());
        let v = with_recorder(vec![f.leaf.clone()], Variant::Generic, &rec, &ValidatorConfig::default());

        let chain = [f.leaf.clone(), f.inter.clone()];
        assert_eq!(v.resolve(&ValidationRequest::new(&chain)).unwrap(), vec![f.leaf.clone()]);
        assert!(rec.paths.lock().unwrap().is_empty());
    }

    #[test]
    fn test_timestamp_sets_date_for_code_signing() {
        let f = fixture();
        let ts = Time::from_date(2021, 6, 1).unwrap();
        let chain = [f.leaf.clone(), f.inter.clone()];
        let request = ValidationRequest::new(&chain).with_parameter(UsageParameter::Timestamp(ts));

        let rec = Recorder::new(f.root.clone());
        let v = with_recorder(vec![f.root.clone()], Variant::CodeSigning, &rec, &ValidatorConfig::default());
        v.resolve(&request).unwrap();

        let rec2 = Recorder::new(f.root.clone());
        let v = with_recorder(vec![f.root.clone()], Variant::TlsClient, &rec2, &ValidatorConfig::default());
        v.resolve(&request).unwrap();

        assert_eq!(*rec.dates.lock().unwrap(), vec![Some(ts)]);
        assert_eq!(*rec2.dates.lock().unwrap(), vec![Some(now())]);
    }

    #[test]
    fn test_stapled_evidence() {
        let f = fixture();
        let chain = [f.leaf.clone(), f.inter.clone()];
        let evidence = [Some(vec![1u8, 2, 3]), Some(vec![])];
        let request = ValidationRequest::new(&chain).with_revocation_evidence(&evidence);

        let rec = Recorder::new(f.root.clone());
        let params = PathParameters::new(
            Arc::new(TrustAnchors::new(vec![f.root.clone()]).unwrap()),
            Variant::TlsServer,
        )
        .with_revocation_enabled(true)
        .with_stapled_response(&f.leaf, vec![9])
        .unwrap();
        let v = TrustAnchorValidator::new(params, rec.clone(), rec.clone(), &ValidatorConfig::default(), clock());
        v.resolve(&request).unwrap();

        // the empty item is skipped and existing evidence is kept
        assert_eq!(*rec.stapled.lock().unwrap(), 1);
        let base = v.parameters();
        assert_eq!(base.stapled_response(&f.leaf), Some(&[9u8][..]));

        let rec = Recorder::new(f.root.clone());
        let v = with_recorder(vec![f.root.clone()], Variant::TlsServer, &rec, &ValidatorConfig::default());
        v.resolve(&request).unwrap();
        assert_eq!(*rec.stapled.lock().unwrap(), 0);
    }

    #[test]
    fn test_non_ca_anchor_gate() {
        let anchor = CertBuilder::leaf("Root").key_seed(1).self_signed();
        let leaf = CertBuilder::leaf("Leaf").key_seed(3).signed_by(&anchor, 1);
        let chain = [leaf];

        let err = real(vec![anchor.clone()], &ValidatorConfig::default())
            .resolve(&ValidationRequest::new(&chain))
            .unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::InvalidTrustAnchor));
        assert_eq!(err.certificate(), Some(&anchor));

        let relaxed = ValidatorConfig::default().allow_non_ca_anchor(true);
        assert!(real(vec![anchor.clone()], &relaxed)
            .resolve(&ValidationRequest::new(&chain))
            .is_ok());

        let v1 = CertBuilder::leaf("Root").key_seed(1).version(Version::V1).self_signed();
        assert!(real(vec![v1], &ValidatorConfig::default())
            .resolve(&ValidationRequest::new(&chain))
            .is_ok());
    }

    #[test]
    fn test_failures_are_wrapped() {
        let f = fixture();
        let expired = CertBuilder::leaf("Leaf")
            .key_seed(3)
            .validity(unix_of(2020, 1, 1), unix_of(2021, 1, 1))
            .signed_by(&f.inter, 2);
        let v = real(vec![f.root.clone()], &ValidatorConfig::default());

        let chain = [expired.clone(), f.inter.clone()];
        let err = v.resolve(&ValidationRequest::new(&chain)).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::PathValidationFailed));
        assert_eq!(err.certificate(), Some(&expired));
        assert_eq!(err.cause().and_then(|c| c.kind()), Some(ErrorKind::CertificateExpired));

        let chain = [f.leaf.clone()];
        let err = v.resolve(&ValidationRequest::new(&chain)).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::PathBuildingFailed));
        let other = [f.inter.clone()];
        let out = v
            .resolve(&ValidationRequest::new(&chain).with_other_certs(&other))
            .unwrap();
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_blocklisted_intermediate() {
        let f = fixture();
        let mut blocklist = Blocklist::new();
        blocklist.insert(f.inter.fingerprint_sha256().unwrap());
        let config = ValidatorConfig::default().with_blocklist(blocklist);

        let chain = [f.leaf.clone(), f.inter.clone()];
        let err = real(vec![f.root.clone()], &config)
            .resolve(&ValidationRequest::new(&chain))
            .unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::UntrustedCertificate));
        assert_eq!(err.certificate(), Some(&f.inter));
    }
}
