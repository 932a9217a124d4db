// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Algorithm constraints
//!
//! Every link of a chain is checked against the default constraints and any
//! caller-supplied ones. A rejection fails the chain with
//! [`ErrorKind::AlgorithmDisabled`].
//!
//! # Defaults
//! - MD2 and MD5 based signatures are never accepted
//! - SHA-1 based signatures are not accepted for TLS
//! - RSA keys must have at least a 2048-bit modulus

extern crate alloc;

use alloc::format;
use alloc::sync::Arc;

use der::asn1::UintRef;
use der::{Decode, Reader, SliceReader};
use spki::AlgorithmIdentifier;

use crate::certificate::{Certificate, SubjectPublicKeyInfo};
use crate::crypto_backend::SignatureAlgorithm;
use crate::error::{AlgorithmError, Error, ErrorKind, Result};
use crate::validator::Variant;
use crate::x509::oids;

/// Predicate over signature and key algorithms.
pub trait AlgorithmConstraints: Send + Sync {
    /// Whether a certificate signed with `algorithm` by the holder of
    /// `issuer_key` is acceptable for `variant`.
    fn permits_signature(
        &self,
        algorithm: &AlgorithmIdentifier<der::Any>,
        issuer_key: &SubjectPublicKeyInfo,
        variant: Variant,
    ) -> bool;

    /// Whether a certificate may carry `key`.
    fn permits_key(&self, key: &SubjectPublicKeyInfo, variant: Variant) -> bool {
        let _ = (key, variant);
        true
    }
}

/// Constraints applied to every chain.
#[derive(Debug, Clone)]
pub struct DefaultAlgorithmConstraints {
    min_rsa_bits: usize,
}

impl Default for DefaultAlgorithmConstraints {
    fn default() -> Self {
        Self { min_rsa_bits: 2048 }
    }
}

impl DefaultAlgorithmConstraints {
    pub fn with_min_rsa_bits(min_rsa_bits: usize) -> Self {
        Self { min_rsa_bits }
    }
}

impl AlgorithmConstraints for DefaultAlgorithmConstraints {
    fn permits_signature(
        &self,
        algorithm: &AlgorithmIdentifier<der::Any>,
        issuer_key: &SubjectPublicKeyInfo,
        variant: Variant,
    ) -> bool {
        if oids::is_md_signature(&algorithm.oid) {
            log::error!("MD2/MD5 signature algorithm {} disabled", algorithm.oid);
            return false;
        }
        if oids::is_sha1_signature(&algorithm.oid) {
            if variant.is_tls() {
                log::error!("SHA-1 signature algorithm disabled for {}", variant);
                return false;
            }
            return true;
        }
        match SignatureAlgorithm::for_issuer_key(algorithm, issuer_key) {
            Ok(_) => true,
            Err(e) => {
                log::error!("Signature algorithm {} not usable: {}", algorithm.oid, e);
                false
            }
        }
    }

    fn permits_key(&self, key: &SubjectPublicKeyInfo, _variant: Variant) -> bool {
        if key.algorithm.oid != oids::RSA {
            return true;
        }
        match rsa_modulus_bits(key) {
            Ok(bits) if bits >= self.min_rsa_bits => true,
            Ok(bits) => {
                log::error!(
                    "RSA key of {} bits below minimum {}",
                    bits,
                    self.min_rsa_bits
                );
                false
            }
            Err(_) => false,
        }
    }
}

/// Modulus size of an RSA SubjectPublicKeyInfo.
///
/// ```asn1
/// RSAPublicKey ::= SEQUENCE { modulus INTEGER, publicExponent INTEGER }
/// ```
pub fn rsa_modulus_bits(key: &SubjectPublicKeyInfo) -> Result<usize> {
    let invalid = |what: &str| {
        Error::AlgorithmError(AlgorithmError::InvalidParameters(format!(
            "RSAPublicKey: {}",
            what
        )))
    };

    let mut reader =
        SliceReader::new(key.subject_public_key.raw_bytes()).map_err(|_| invalid("length"))?;
    let header = der::Header::decode(&mut reader).map_err(|_| invalid("header"))?;
    if header.tag != der::Tag::Sequence {
        return Err(invalid("expected SEQUENCE"));
    }

    let modulus = reader
        .read_nested(header.length, |seq| {
            let m = UintRef::decode(seq)?;
            UintRef::decode(seq)?;
            Ok(m)
        })
        .map_err(|_| invalid("modulus"))?;

    let bytes = modulus.as_bytes();
    let leading_zeros = bytes.first().map(|b| b.leading_zeros() as usize).unwrap_or(0);
    Ok(bytes.len() * 8 - leading_zeros)
}

/// Check `cert`, signed by the holder of `issuer_key`, against each of
/// `constraints`.
pub(crate) fn check_algorithms<'a, I>(
    constraints: I,
    cert: &Certificate,
    issuer_key: &SubjectPublicKeyInfo,
    variant: Variant,
) -> Result<()>
where
    I: IntoIterator<Item = &'a dyn AlgorithmConstraints>,
{
    for c in constraints {
        if !c.permits_signature(cert.signature_algorithm(), issuer_key, variant) {
            return Err(Error::validation_for(
                ErrorKind::AlgorithmDisabled,
                format!(
                    "signature algorithm {} disabled",
                    cert.signature_algorithm().oid
                ),
                cert,
            ));
        }
        if !c.permits_key(cert.subject_public_key_info(), variant) {
            return Err(Error::validation_for(
                ErrorKind::AlgorithmDisabled,
                format!(
                    "public key algorithm {} disabled",
                    cert.subject_public_key_info().algorithm.oid
                ),
                cert,
            ));
        }
    }
    Ok(())
}

/// Shared handle to caller-supplied constraints.
pub type SharedConstraints = Arc<dyn AlgorithmConstraints>;
