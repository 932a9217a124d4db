// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! RFC 5280 style path validation.
//!
//! The anchor is located by the issuer name of the last certificate in the
//! path. Every anchor with that subject is tried in turn; the first one the
//! whole path validates against wins.
//!
//! Checks, top-down from the anchor:
//! - validity at the requested date
//! - name chaining and signature
//! - default and caller algorithm constraints
//! - revocation, when enabled
//! - no duplicate extensions
//! - CA rules for intermediates (basic constraints, path length, keyCertSign)
//! - no critical extension outside the recognized set, leaf included

extern crate alloc;

use alloc::format;
use alloc::vec::Vec;

use const_oid::ObjectIdentifier;

use crate::certificate::Certificate;
use crate::crypto_backend::CryptoBackend;
use crate::error::{Error, ErrorKind, Result, ValidatorError};
use crate::path::{PathParameters, PathValidator};
use crate::time::{Clock, SystemClock, Time};
use crate::x509::constraints::{check_algorithms, AlgorithmConstraints, DefaultAlgorithmConstraints};
use crate::x509::extensions::{ca_path_len, KeyUsage};
use crate::x509::oids;
use crate::x509::verify::{signature_step, validity_step};

/// Critical extensions this validator processes.
pub const RECOGNIZED_EXTENSIONS: &[ObjectIdentifier] = &[
    oids::BASIC_CONSTRAINTS,
    oids::KEY_USAGE,
    oids::EXTENDED_KEY_USAGE,
    oids::SUBJECT_ALT_NAME,
    oids::AUTHORITY_KEY_IDENTIFIER,
    oids::SUBJECT_KEY_IDENTIFIER,
];

/// Default [`PathValidator`].
#[derive(Debug, Clone, Default)]
pub struct PkixPathValidator<B: CryptoBackend> {
    backend: B,
    defaults: DefaultAlgorithmConstraints,
}

impl<B: CryptoBackend> PkixPathValidator<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            defaults: DefaultAlgorithmConstraints::default(),
        }
    }

    fn validate_against(
        &self,
        path: &[Certificate],
        anchor: &Certificate,
        params: &PathParameters,
    ) -> Result<()> {
        let now = match params.date() {
            Some(date) => *date,
            None => SystemClock.now()?,
        };

        // a path of n certificates has n-1 intermediates
        let mut max_path_len = path.len().saturating_sub(1);
        if let Some(limit) = ca_path_len(anchor) {
            max_path_len = max_path_len.min(limit as usize);
        }

        let mut issuer = anchor;
        for (depth, cert) in path.iter().rev().enumerate() {
            let is_leaf = depth + 1 == path.len();
            log::trace!("pkix: depth {} subject {}", depth, cert.subject());

            if let Some(oid) = cert.extensions().and_then(|e| e.find_duplicate()) {
                return Err(Error::validation_for(
                    ErrorKind::PathValidationFailed,
                    format!("duplicate extension {}", oid),
                    cert,
                ));
            }

            validity_step(cert, &now)?;

            if !cert.issuer().matches(issuer.subject()) {
                return Err(Error::validation_for(
                    ErrorKind::NameChaining,
                    format!("issuer {} does not match {}", cert.issuer(), issuer.subject()),
                    cert,
                ));
            }

            signature_step(&self.backend, cert, issuer.subject_public_key_info())?;

            let constraints = core::iter::once(&self.defaults as &dyn AlgorithmConstraints).chain(
                params
                    .algorithm_constraints()
                    .iter()
                    .map(|c| c.as_ref() as &dyn AlgorithmConstraints),
            );
            check_algorithms(
                constraints,
                cert,
                issuer.subject_public_key_info(),
                params.variant(),
            )?;

            if params.revocation_enabled() {
                self.check_revocation(cert, issuer, params, &now)?;
            }

            if !is_leaf {
                max_path_len = check_intermediate(cert, max_path_len)?;
            }

            check_recognized(cert)?;
            issuer = cert;
        }
        Ok(())
    }

    fn check_revocation(
        &self,
        cert: &Certificate,
        issuer: &Certificate,
        params: &PathParameters,
        now: &Time,
    ) -> Result<()> {
        let checker = params.revocation_checker().ok_or_else(|| {
            Error::validation_for(
                ErrorKind::Revoked,
                "revocation checking enabled but no revocation checker configured",
                cert,
            )
        })?;
        checker
            .check(cert, issuer, params.stapled_response(cert), now)
            .map_err(|e| match e {
                Error::Validation(_) => e,
                _ => Error::Validation(
                    ValidatorError::new(ErrorKind::Revoked, "revocation check failed")
                        .with_certificate(cert)
                        .with_cause(e),
                ),
            })
    }
}

/// CA rules for an intermediate; returns the remaining path length.
fn check_intermediate(cert: &Certificate, max_path_len: usize) -> Result<usize> {
    let limit = ca_path_len(cert).ok_or_else(|| {
        Error::validation_for(
            ErrorKind::CaExtensionViolation,
            "intermediate certificate is not a CA",
            cert,
        )
    })?;

    let mut remaining = max_path_len;
    if !cert.is_self_issued() {
        if remaining == 0 {
            return Err(Error::validation_for(
                ErrorKind::PathLengthViolation,
                "path length constraint exceeded",
                cert,
            ));
        }
        remaining -= 1;
    }
    remaining = remaining.min(limit as usize);

    match cert.key_usage() {
        Ok(Some(ku)) if !ku.has(KeyUsage::KEY_CERT_SIGN) => Err(Error::validation_for(
            ErrorKind::CaExtensionViolation,
            "CA key usage does not permit certificate signing",
            cert,
        )),
        Err(e) => Err(Error::Validation(
            ValidatorError::new(ErrorKind::CaExtensionViolation, "malformed key usage")
                .with_certificate(cert)
                .with_cause(e),
        )),
        _ => Ok(remaining),
    }
}

fn check_recognized(cert: &Certificate) -> Result<()> {
    let unknown: Vec<ObjectIdentifier> = cert
        .critical_extensions()
        .into_iter()
        .filter(|oid| !RECOGNIZED_EXTENSIONS.contains(oid))
        .collect();
    if let Some(oid) = unknown.first() {
        log::error!("Unrecognized critical extension {} in {}", oid, cert.subject());
        return Err(Error::validation_for(
            ErrorKind::UnsupportedCriticalExtension,
            format!("unrecognized critical extension {}", oid),
            cert,
        ));
    }
    Ok(())
}

impl<B: CryptoBackend + Send + Sync> PathValidator for PkixPathValidator<B> {
    fn validate(&self, path: &[Certificate], params: &PathParameters) -> Result<Certificate> {
        let last = path
            .last()
            .ok_or_else(|| Error::validation(ErrorKind::EmptyChain, "empty path"))?;

        if path.len() > params.max_path_length() {
            return Err(Error::validation_for(
                ErrorKind::PathLengthViolation,
                format!(
                    "path of {} certificates exceeds maximum {}",
                    path.len(),
                    params.max_path_length()
                ),
                last,
            ));
        }

        let candidates = params.anchors().find_by_subject(last.issuer());
        if candidates.is_empty() {
            return Err(Error::validation_for(
                ErrorKind::NoTrustAnchor,
                format!("no trust anchor named {}", last.issuer()),
                last,
            ));
        }

        let mut last_err = None;
        for anchor in candidates {
            match self.validate_against(path, anchor, params) {
                Ok(()) => {
                    log::trace!("pkix: path anchored at {}", anchor.subject());
                    return Ok(anchor.clone());
                }
                Err(e) => {
                    log::debug!("pkix: anchor {} rejected: {}", anchor.subject(), e);
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| Error::internal("no anchor candidate evaluated")))
    }

    fn checks_critical_extensions(&self) -> bool {
        true
    }
}

#[cfg(all(test, feature = "ring-backend"))]
mod tests {
    use super::*;
    use crate::anchors::TrustAnchors;
    use crate::crypto_backend::RingBackend;
    use crate::path::RevocationChecker;
    use crate::test_util::{now, CertBuilder};
    use crate::validator::Variant;
    use alloc::sync::Arc;
    use alloc::vec;

    struct Chain {
        root: Certificate,
        inter: Certificate,
        leaf: Certificate,
    }

    fn chain() -> Chain {
        let root = CertBuilder::ca("Root", 1).key_seed(1).self_signed();
        let inter = CertBuilder::ca("Inter", 0).key_seed(2).signed_by(&root, 1);
        let leaf = CertBuilder::leaf("Leaf").key_seed(3).signed_by(&inter, 2);
        Chain { root, inter, leaf }
    }

    fn params(anchors: Vec<Certificate>) -> PathParameters {
        PathParameters::new(Arc::new(TrustAnchors::new(anchors).unwrap()), Variant::Generic)
            .with_date(now())
    }

    #[test]
    fn test_valid_path_returns_anchor() {
        let c = chain();
        let p = params(vec![c.root.clone()]);
        let pv = PkixPathValidator::new(RingBackend);

        let anchor = pv.validate(&[c.leaf.clone(), c.inter.clone()], &p).unwrap();
        assert_eq!(anchor, c.root);
        assert!(pv.checks_critical_extensions());
    }

    #[test]
    fn test_unknown_anchor() {
        let c = chain();
        let p = params(vec![]);
        let err = PkixPathValidator::new(RingBackend)
            .validate(&[c.leaf, c.inter], &p)
            .unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::NoTrustAnchor));
    }

    #[test]
    fn test_critical_extension_on_leaf_rejected() {
        let c = chain();
        let leaf = CertBuilder::leaf("Leaf")
            .key_seed(3)
            .extension(ObjectIdentifier::new_unwrap("1.3.6.1.4.1.99999.1"), true, &[0x05, 0x00])
            .signed_by(&c.inter, 2);
        let p = params(vec![c.root.clone()]);
        let err = PkixPathValidator::new(RingBackend)
            .validate(&[leaf, c.inter], &p)
            .unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::UnsupportedCriticalExtension));
    }

    #[test]
    fn test_anchor_path_len_zero() {
        let root = CertBuilder::ca("Root", 0).key_seed(1).self_signed();
        let inter = CertBuilder::ca_unbounded("Inter").key_seed(2).signed_by(&root, 1);
        let leaf = CertBuilder::leaf("Leaf").key_seed(3).signed_by(&inter, 2);
        let p = params(vec![root]);
        let err = PkixPathValidator::new(RingBackend)
            .validate(&[leaf, inter], &p)
            .unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::PathLengthViolation));
    }

    #[test]
    fn test_revocation_without_checker_fails() {
        let c = chain();
        let p = params(vec![c.root.clone()]).with_revocation_enabled(true);
        let err = PkixPathValidator::new(RingBackend)
            .validate(&[c.leaf, c.inter], &p)
            .unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::Revoked));
    }

    struct RevokeLeaf(Certificate);

    impl RevocationChecker for RevokeLeaf {
        fn check(
            &self,
            cert: &Certificate,
            _issuer: &Certificate,
            stapled: Option<&[u8]>,
            _at: &Time,
        ) -> Result<()> {
            if *cert == self.0 && stapled != Some(b"good") {
                return Err(Error::internal("revoked"));
            }
            Ok(())
        }
    }

    #[test]
    fn test_revocation_checker_consulted() {
        let c = chain();
        let checker = Arc::new(RevokeLeaf(c.leaf.clone()));
        let p = params(vec![c.root.clone()])
            .with_revocation_enabled(true)
            .with_revocation_checker(checker);
        let pv = PkixPathValidator::new(RingBackend);

        let err = pv.validate(&[c.leaf.clone(), c.inter.clone()], &p).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::Revoked));
        assert_eq!(err.certificate(), Some(&c.leaf));

        let p = p.with_stapled_response(&c.leaf, b"good".to_vec()).unwrap();
        assert!(pv.validate(&[c.leaf, c.inter], &p).is_ok());
    }
}
