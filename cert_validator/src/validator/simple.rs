// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Simple chain validation.
//!
//! The supplied chain is cut at the first trusted certificate (or extended
//! by an anchor named by its last issuer) and then walked top-down from the
//! anchor. No path search is performed: the caller's ordering is the path.

extern crate alloc;

use alloc::format;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::anchors::TrustAnchors;
use crate::blocklist::Blocklist;
use crate::certificate::{Certificate, Version};
use crate::config::ValidatorConfig;
use crate::crypto_backend::CryptoBackend;
use crate::error::{Error, ErrorKind, Result, ValidatorError};
use crate::time::{Clock, Time};
use crate::validator::{ChainResolver, ValidationRequest, Variant};
use crate::x509::constraints::{check_algorithms, AlgorithmConstraints, DefaultAlgorithmConstraints};
use crate::x509::extensions::{ca_path_len, netscape_cert_type_permits, KeyUsage, NetscapeCertType};
use crate::x509::oids;
use crate::x509::verify::{signature_step, validity_step};

/// The legacy chain algorithm.
pub struct SimpleValidator<B: CryptoBackend> {
    variant: Variant,
    anchors: TrustAnchors,
    blocklist: Blocklist,
    backend: B,
    clock: Arc<dyn Clock>,
    defaults: DefaultAlgorithmConstraints,
}

impl<B: CryptoBackend> core::fmt::Debug for SimpleValidator<B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SimpleValidator")
            .field("variant", &self.variant)
            .field("anchors", &self.anchors.len())
            .field("blocklist", &self.blocklist.len())
            .finish_non_exhaustive()
    }
}

impl<B: CryptoBackend> SimpleValidator<B> {
    pub fn new(
        variant: Variant,
        anchors: TrustAnchors,
        config: &ValidatorConfig,
        backend: B,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            variant,
            anchors,
            blocklist: config.blocklist.clone(),
            backend,
            clock,
            defaults: DefaultAlgorithmConstraints::default(),
        }
    }

    pub fn anchors(&self) -> &TrustAnchors {
        &self.anchors
    }

    /// Cut `chain` at its first trusted certificate, replacing that one by
    /// the canonical anchor, or append the anchor its last issuer names.
    pub fn build_trusted_chain(&self, chain: &[Certificate]) -> Result<Vec<Certificate>> {
        for (i, cert) in chain.iter().enumerate() {
            if let Some(anchor) = self.anchors.trusted_match(cert) {
                log::debug!("simple: {} at depth {} is trusted", cert.subject(), i);
                let mut trusted = chain[..i].to_vec();
                trusted.push(anchor.clone());
                return Ok(trusted);
            }
        }

        let last = chain
            .last()
            .ok_or_else(|| Error::validation(ErrorKind::EmptyChain, "empty certificate chain"))?;
        let candidates = self.anchors.find_by_subject(last.issuer());
        let akid = last.authority_key_identifier();
        let anchor = candidates
            .iter()
            .find(|a| akid.is_some() && a.subject_key_identifier() == akid)
            .or_else(|| candidates.first())
            .ok_or_else(|| {
                Error::validation_for(
                    ErrorKind::NoTrustAnchor,
                    format!("no trust anchor named {}", last.issuer()),
                    last,
                )
            })?;

        let mut trusted = chain.to_vec();
        trusted.push((*anchor).clone());
        Ok(trusted)
    }

    fn check_link(
        &self,
        cert: &Certificate,
        issuer: &Certificate,
        request: &ValidationRequest<'_>,
        now: Option<&Time>,
    ) -> Result<()> {
        let extra = request
            .constraints()
            .map(|c| c.as_ref() as &dyn AlgorithmConstraints);
        let constraints =
            core::iter::once(&self.defaults as &dyn AlgorithmConstraints).chain(extra);
        check_algorithms(
            constraints,
            cert,
            issuer.subject_public_key_info(),
            self.variant,
        )?;

        if let Some(now) = now {
            validity_step(cert, now)?;
        }

        if !cert.issuer().matches(issuer.subject()) {
            return Err(Error::validation_for(
                ErrorKind::NameChaining,
                format!("issuer {} does not match {}", cert.issuer(), issuer.subject()),
                cert,
            ));
        }

        signature_step(&self.backend, cert, issuer.subject_public_key_info())
    }

    /// CA rules for `cert`; returns the remaining path length.
    fn check_ca(&self, cert: &Certificate, max_path_len: u32) -> Result<u32> {
        let mut critical = cert.critical_extensions();

        let path_len = match ca_path_len(cert) {
            Some(len) => len,
            // v1 self-issued certificates predate basic constraints
            None if cert.version() != Version::V3 && cert.is_self_issued() => u32::MAX,
            None => {
                return Err(Error::validation_for(
                    ErrorKind::CaExtensionViolation,
                    "end entity certificate used as a CA",
                    cert,
                ))
            }
        };
        critical.remove(&oids::BASIC_CONSTRAINTS);

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
        remaining = remaining.min(path_len);

        match cert.key_usage() {
            Ok(Some(ku)) if !ku.has(KeyUsage::KEY_CERT_SIGN) => {
                return Err(Error::validation_for(
                    ErrorKind::CaExtensionViolation,
                    "CA key usage does not permit certificate signing",
                    cert,
                ))
            }
            Err(e) => {
                return Err(Error::Validation(
                    ValidatorError::new(ErrorKind::CaExtensionViolation, "malformed key usage")
                        .with_certificate(cert)
                        .with_cause(e),
                ))
            }
            _ => {}
        }
        critical.remove(&oids::KEY_USAGE);

        let ca_type = match self.variant {
            Variant::TlsServer | Variant::TlsClient => Some(NetscapeCertType::SSL_CA),
            Variant::CodeSigning | Variant::JceSigning => Some(NetscapeCertType::OBJECT_SIGNING_CA),
            Variant::Generic | Variant::TsaServer => None,
        };
        if let Some(bit) = ca_type {
            if !netscape_cert_type_permits(cert, bit) {
                return Err(Error::validation_for(
                    ErrorKind::CaExtensionViolation,
                    format!("netscape certificate type does not permit CA bit {:#04x}", bit),
                    cert,
                ));
            }
            critical.remove(&oids::NETSCAPE_CERT_TYPE);
        }

        if let Some(oid) = critical.iter().next() {
            log::error!("Unsupported critical extension {} in CA {}", oid, cert.subject());
            return Err(Error::validation_for(
                ErrorKind::UnsupportedCriticalExtension,
                format!("unsupported critical extension {} in CA certificate", oid),
                cert,
            ));
        }

        Ok(remaining)
    }
}

impl<B: CryptoBackend + Send + Sync> ChainResolver for SimpleValidator<B> {
    fn resolve(&self, request: &ValidationRequest<'_>) -> Result<Vec<Certificate>> {
        let trusted = self.build_trusted_chain(request.chain())?;

        for cert in &trusted {
            self.blocklist.check(cert)?;
        }

        let now = if self.variant.skips_validity() {
            None
        } else {
            Some(self.clock.now()?)
        };

        let anchor_index = trusted.len() - 1;
        let mut max_path_len = anchor_index as u32;
        if let Some(limit) = ca_path_len(&trusted[anchor_index]) {
            max_path_len = max_path_len.min(limit);
        }

        for i in (0..anchor_index).rev() {
            let cert = &trusted[i];
            log::trace!("simple: depth {} subject {}", i, cert.subject());
            self.check_link(cert, &trusted[i + 1], request, now.as_ref())?;
            if i != 0 {
                max_path_len = self.check_ca(cert, max_path_len)?;
            }
        }

        Ok(trusted)
    }

    fn checks_critical_extensions(&self) -> bool {
        false
    }
}

#[cfg(all(test, feature = "ring-backend"))]
mod tests {
    use super::*;
    use crate::crypto_backend::RingBackend;
    use crate::test_util::{clock, CertBuilder};
    use alloc::vec;

    fn simple(variant: Variant, anchors: Vec<Certificate>) -> SimpleValidator<RingBackend> {
        SimpleValidator::new(
            variant,
            TrustAnchors::new(anchors).unwrap(),
            &ValidatorConfig::default(),
            RingBackend,
            clock(),
        )
    }

    fn resolve(v: &SimpleValidator<RingBackend>, chain: &[Certificate]) -> Result<Vec<Certificate>> {
        v.resolve(&ValidationRequest::new(chain))
    }

    #[test]
    fn test_anchor_appended_by_issuer_name() {
        let root = CertBuilder::ca("Root", 1).key_seed(1).self_signed();
        let inter = CertBuilder::ca("Inter", 0).key_seed(2).signed_by(&root, 1);
        let leaf = CertBuilder::leaf("Leaf").key_seed(3).signed_by(&inter, 2);
        let v = simple(Variant::Generic, vec![root.clone()]);

        let out = resolve(&v, &[leaf.clone(), inter.clone()]).unwrap();
        assert_eq!(out, vec![leaf, inter, root]);
    }

    #[test]
    fn test_anchor_preferred_by_key_identifier() {
        let old = CertBuilder::ca("Root", 1).key_seed(1).skid(&[1; 20]).self_signed();
        let new = CertBuilder::ca("Root", 1).key_seed(2).skid(&[2; 20]).self_signed();
        let leaf = CertBuilder::leaf("Leaf").key_seed(3).akid(&[2; 20]).signed_by(&new, 2);
        let v = simple(Variant::Generic, vec![old, new.clone()]);

        let out = resolve(&v, &[leaf]).unwrap();
        assert_eq!(out[1], new);
    }

    #[test]
    fn test_reissued_anchor_in_chain_is_replaced() {
        let root = CertBuilder::ca("Root", 1).key_seed(1).serial(1).self_signed();
        let reissued = CertBuilder::ca("Root", 1).key_seed(1).serial(2).self_signed();
        let leaf = CertBuilder::leaf("Leaf").key_seed(3).signed_by(&root, 1);
        let v = simple(Variant::Generic, vec![root.clone()]);

        let out = resolve(&v, &[leaf.clone(), reissued]).unwrap();
        assert_eq!(out, vec![leaf, root]);
    }

    #[test]
    fn test_name_chaining() {
        let root = CertBuilder::ca("Root", 1).key_seed(1).self_signed();
        let inter = CertBuilder::ca("Inter", 0).key_seed(2).signed_by(&root, 1);
        let other = CertBuilder::ca("Other", 0).key_seed(4).signed_by(&root, 1);
        let leaf = CertBuilder::leaf("Leaf").key_seed(3).signed_by(&other, 4);
        let v = simple(Variant::Generic, vec![root]);

        let err = resolve(&v, &[leaf.clone(), inter]).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::NameChaining));
        assert_eq!(err.certificate(), Some(&leaf));
    }

    #[test]
    fn test_intermediate_must_be_ca() {
        let root = CertBuilder::ca("Root", 1).key_seed(1).self_signed();
        let inter = CertBuilder::leaf("Inter").key_seed(2).signed_by(&root, 1);
        let leaf = CertBuilder::leaf("Leaf").key_seed(3).signed_by(&inter, 2);
        let v = simple(Variant::Generic, vec![root]);

        let err = resolve(&v, &[leaf, inter]).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::CaExtensionViolation));
    }

    #[test]
    fn test_ca_key_usage_without_cert_sign() {
        let root = CertBuilder::ca("Root", 1).key_seed(1).self_signed();
        let inter = CertBuilder::ca("Inter", 0)
            .key_usage(KeyUsage::DIGITAL_SIGNATURE)
            .key_seed(2)
            .signed_by(&root, 1);
        let leaf = CertBuilder::leaf("Leaf").key_seed(3).signed_by(&inter, 2);
        let v = simple(Variant::Generic, vec![root]);

        let err = resolve(&v, &[leaf, inter]).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::CaExtensionViolation));
    }

    #[test]
    fn test_netscape_ca_type_by_variant() {
        let root = CertBuilder::ca("Root", 1).key_seed(1).self_signed();
        let inter = CertBuilder::ca("Inter", 0)
            .netscape(NetscapeCertType::OBJECT_SIGNING_CA)
            .key_seed(2)
            .signed_by(&root, 1);
        let leaf = CertBuilder::leaf("Leaf").key_seed(3).signed_by(&inter, 2);
        let chain = [leaf, inter];

        assert!(resolve(&simple(Variant::CodeSigning, vec![root.clone()]), &chain).is_ok());
        assert!(resolve(&simple(Variant::TsaServer, vec![root.clone()]), &chain).is_ok());
        let err = resolve(&simple(Variant::TlsServer, vec![root]), &chain).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::CaExtensionViolation));
    }

    #[test]
    fn test_critical_extension_on_ca() {
        let root = CertBuilder::ca("Root", 1).key_seed(1).self_signed();
        let inter = CertBuilder::ca("Inter", 0)
            .extension(
                const_oid::ObjectIdentifier::new_unwrap("1.3.6.1.4.1.99999.2"),
                true,
                &[0x05, 0x00],
            )
            .key_seed(2)
            .signed_by(&root, 1);
        let leaf = CertBuilder::leaf("Leaf").key_seed(3).signed_by(&inter, 2);
        let v = simple(Variant::Generic, vec![root]);

        let err = resolve(&v, &[leaf, inter]).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::UnsupportedCriticalExtension));
    }

    #[test]
    fn test_v1_self_issued_acts_as_ca() {
        let root = CertBuilder::ca("Root", 2).key_seed(1).self_signed();
        let old = CertBuilder::ca("Inter", 0).key_seed(2).signed_by(&root, 1);
        // key rollover: issuer and subject are both "Inter"
        let rollover = CertBuilder::leaf("Inter")
            .version(Version::V1)
            .key_seed(5)
            .signed_by(&old, 2);
        let leaf = CertBuilder::leaf("Leaf").key_seed(3).signed_by(&rollover, 5);
        let v = simple(Variant::Generic, vec![root.clone()]);

        assert!(rollover.is_self_issued());
        assert!(resolve(&v, &[leaf, rollover, old]).is_ok());

        let v1 = CertBuilder::leaf("Other")
            .version(Version::V1)
            .key_seed(6)
            .signed_by(&root, 1);
        let leaf = CertBuilder::leaf("Leaf").key_seed(3).signed_by(&v1, 6);
        let err = resolve(&v, &[leaf, v1.clone()]).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::CaExtensionViolation));
        assert_eq!(err.certificate(), Some(&v1));
    }
}
