// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Per-certificate checks shared by the chain validators: signature
//! algorithm consistency, signature verification against an issuer key,
//! and the validity window.

extern crate alloc;

use alloc::format;
use alloc::string::ToString;

use der::Encode;

use crate::certificate::{Certificate, SubjectPublicKeyInfo};
use crate::crypto_backend::{CryptoBackend, SignatureAlgorithm};
use crate::error::{Error, ErrorKind, Result, SignatureError, TimeError, ValidatorError};
use crate::time::Time;

/// RFC 5280 4.1.1.2: `signatureAlgorithm` must be identical to the TBS
/// `signature` field, parameters included.
pub fn check_signature_algorithm(cert: &Certificate) -> Result<()> {
    let outer = &cert.signature_algorithm;
    let inner = &cert.tbs_certificate.signature;

    let outer_params = outer.parameters.as_ref().and_then(|p| p.to_der().ok());
    let inner_params = inner.parameters.as_ref().and_then(|p| p.to_der().ok());

    if outer.oid != inner.oid || outer_params != inner_params {
        log::error!(
            "Signature algorithm mismatch: {} vs TBS {}",
            outer.oid,
            inner.oid
        );
        return Err(Error::SignatureError(SignatureError::AlgorithmMismatch {
            cert_algo: outer.oid.to_string(),
            tbs_algo: inner.oid.to_string(),
        }));
    }
    Ok(())
}

/// Verify `cert`'s signature with the issuer's public key.
pub fn verify_signed_by<B: CryptoBackend + ?Sized>(
    backend: &B,
    cert: &Certificate,
    issuer_key: &SubjectPublicKeyInfo,
) -> Result<()> {
    check_signature_algorithm(cert)?;

    let algorithm = SignatureAlgorithm::for_issuer_key(cert.signature_algorithm(), issuer_key)
        .map_err(|e| {
            log::error!(
                "Unsupported signature algorithm {}",
                cert.signature_algorithm().oid
            );
            e
        })?;
    log::trace!("verify_signed_by: {:?} over {}", algorithm, cert.subject());

    let tbs = cert.tbs_certificate_der()?;
    backend.verify_signature(
        algorithm,
        &tbs,
        cert.signature_bytes(),
        issuer_key.subject_public_key.raw_bytes(),
    )
}

/// Whether `at` falls inside `cert`'s validity window (bounds inclusive).
pub fn check_validity(cert: &Certificate, at: &Time) -> Result<()> {
    let validity = cert.validity();
    if !validity.is_well_formed() {
        return Err(Error::TimeError(TimeError::ParseError(format!(
            "notBefore {:?} after notAfter {:?}",
            validity.not_before, validity.not_after
        ))));
    }
    if at.is_before(&validity.not_before) {
        return Err(Error::not_yet_valid());
    }
    if at.is_after(&validity.not_after) {
        return Err(Error::expired());
    }
    Ok(())
}

/// [`verify_signed_by`] reported as a chain failure naming `cert`.
pub(crate) fn signature_step<B: CryptoBackend + ?Sized>(
    backend: &B,
    cert: &Certificate,
    issuer_key: &SubjectPublicKeyInfo,
) -> Result<()> {
    verify_signed_by(backend, cert, issuer_key).map_err(|e| {
        Error::Validation(
            ValidatorError::new(ErrorKind::SignatureError, "signature check failed")
                .with_certificate(cert)
                .with_cause(e),
        )
    })
}

/// [`check_validity`] reported as a chain failure naming `cert`.
pub(crate) fn validity_step(cert: &Certificate, at: &Time) -> Result<()> {
    check_validity(cert, at).map_err(|e| {
        log::error!("{} is outside its validity period: {}", cert.subject(), e);
        Error::Validation(
            ValidatorError::new(ErrorKind::CertificateExpired, "outside validity period")
                .with_certificate(cert)
                .with_cause(e),
        )
    })
}

#[cfg(all(test, feature = "ring-backend"))]
mod tests {
    use super::*;
    use crate::crypto_backend::RingBackend;
    use crate::test_util::{unix_of, CertBuilder};
    use crate::x509::oids;

    #[test]
    fn test_signature_verifies_against_issuer() {
        let root = CertBuilder::ca("Root", 1).key_seed(1).self_signed();
        let leaf = CertBuilder::leaf("Leaf").key_seed(2).signed_by(&root, 1);
        let stranger = CertBuilder::ca("Root", 1).key_seed(3).self_signed();

        assert!(verify_signed_by(&RingBackend, &leaf, root.subject_public_key_info()).is_ok());
        assert!(verify_signed_by(&RingBackend, &root, root.subject_public_key_info()).is_ok());

        let err = signature_step(&RingBackend, &leaf, stranger.subject_public_key_info())
            .unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::SignatureError));
        assert_eq!(err.certificate(), Some(&leaf));
        assert_eq!(err.cause().and_then(|c| c.kind()), Some(ErrorKind::SignatureError));
    }

    #[test]
    fn test_algorithm_mismatch() {
        let root = CertBuilder::ca("Root", 1).key_seed(1).self_signed();
        let mut leaf = CertBuilder::leaf("Leaf").key_seed(2).signed_by(&root, 1);
        leaf.signature_algorithm.oid = oids::SHA256_WITH_RSA;

        assert!(matches!(
            check_signature_algorithm(&leaf),
            Err(Error::SignatureError(SignatureError::AlgorithmMismatch { .. }))
        ));
        assert!(verify_signed_by(&RingBackend, &leaf, root.subject_public_key_info()).is_err());
    }

    #[test]
    fn test_validity_window() {
        let cert = CertBuilder::leaf("Leaf")
            .validity(unix_of(2020, 1, 1), unix_of(2021, 1, 1))
            .self_signed();
        let at = |y, m, d| Time::from_date(y, m, d).unwrap();

        assert!(check_validity(&cert, &at(2020, 6, 1)).is_ok());
        assert!(check_validity(&cert, &at(2020, 1, 1)).is_ok());
        assert!(matches!(
            check_validity(&cert, &at(2019, 12, 31)),
            Err(Error::TimeError(TimeError::NotYetValid))
        ));
        let err = validity_step(&cert, &at(2021, 1, 2)).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::CertificateExpired));
    }
}
