// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Cryptographic backend abstraction.
//!
//! Validators verify signatures through [`CryptoBackend`] so the primitive
//! library can be swapped. The `ring-backend` feature provides
//! [`RingBackend`] and the SHA-256 used for certificate fingerprints.

extern crate alloc;

use const_oid::ObjectIdentifier;
use spki::AlgorithmIdentifier;

use crate::certificate::SubjectPublicKeyInfo;
use crate::error::{AlgorithmError, Error, Result};
use crate::x509::oids;

#[cfg(feature = "ring-backend")]
mod ring;
#[cfg(feature = "ring-backend")]
pub use self::ring::*;

/// Signature algorithms the backends can verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    EcdsaP256Sha256,
    EcdsaP256Sha384,
    EcdsaP384Sha256,
    EcdsaP384Sha384,
    RsaPkcs1Sha256,
    RsaPkcs1Sha384,
    RsaPkcs1Sha512,
    RsaPssSha256,
    RsaPssSha384,
    RsaPssSha512,
    /// EdDSA Ed25519 (hash is built-in to the algorithm)
    Ed25519,
}

impl SignatureAlgorithm {
    /// Resolve the certificate's signature algorithm against the issuer key.
    ///
    /// ECDSA needs the curve, which only the issuer's SubjectPublicKeyInfo
    /// carries.
    pub fn for_issuer_key(
        signature_algorithm: &AlgorithmIdentifier<der::Any>,
        issuer_key: &SubjectPublicKeyInfo,
    ) -> Result<Self> {
        let curve_oid = if issuer_key.algorithm.oid == oids::ECPUBLICKEY {
            issuer_key
                .algorithm
                .parameters
                .as_ref()
                .and_then(|p| p.decode_as::<ObjectIdentifier>().ok())
        } else {
            None
        };
        Self::from_oid_with_params(
            &signature_algorithm.oid,
            curve_oid.as_ref(),
            signature_algorithm.parameters.as_ref(),
        )
    }

    /// Map a signature OID, the curve (ECDSA only) and the algorithm
    /// parameters (RSA-PSS only) to a [`SignatureAlgorithm`].
    pub fn from_oid_with_params(
        sig_oid: &ObjectIdentifier,
        curve_oid: Option<&ObjectIdentifier>,
        params: Option<&der::Any>,
    ) -> Result<Self> {
        match *sig_oid {
            oids::ECDSA_WITH_SHA256 | oids::ECDSA_WITH_SHA384 => {
                let sha384 = *sig_oid == oids::ECDSA_WITH_SHA384;
                match (curve_oid, sha384) {
                    (Some(&oids::ECDSA_P256), false) => Ok(SignatureAlgorithm::EcdsaP256Sha256),
                    (Some(&oids::ECDSA_P256), true) => Ok(SignatureAlgorithm::EcdsaP256Sha384),
                    (Some(&oids::ECDSA_P384), false) => Ok(SignatureAlgorithm::EcdsaP384Sha256),
                    (Some(&oids::ECDSA_P384), true) => Ok(SignatureAlgorithm::EcdsaP384Sha384),
                    (Some(curve), _) => Err(Error::unsupported_algorithm(alloc::format!(
                        "ECDSA with unsupported curve OID: {}",
                        curve
                    ))),
                    (None, _) => Err(Error::AlgorithmError(AlgorithmError::MissingParameters)),
                }
            }
            oids::SHA256_WITH_RSA => Ok(SignatureAlgorithm::RsaPkcs1Sha256),
            oids::SHA384_WITH_RSA => Ok(SignatureAlgorithm::RsaPkcs1Sha384),
            oids::SHA512_WITH_RSA => Ok(SignatureAlgorithm::RsaPkcs1Sha512),
            oids::RSA_PSS => Self::parse_rsa_pss_params(params),
            oids::ED25519 => Ok(SignatureAlgorithm::Ed25519),
            _ => Err(Error::AlgorithmError(AlgorithmError::UnknownOid(
                alloc::format!("{}", sig_oid),
            ))),
        }
    }

    /// Convert an OID to a SignatureAlgorithm (without curve information).
    pub fn from_oid(oid: &ObjectIdentifier) -> Result<Self> {
        Self::from_oid_with_params(oid, None, None)
    }

    /// Hash algorithm from RSASSA-PSS-params.
    ///
    /// ```asn1
    /// RSASSA-PSS-params ::= SEQUENCE {
    ///     hashAlgorithm     [0] HashAlgorithm DEFAULT sha1,
    ///     maskGenAlgorithm  [1] MaskGenAlgorithm DEFAULT mgf1SHA1,
    ///     saltLength        [2] INTEGER DEFAULT 20,
    ///     trailerField      [3] TrailerField DEFAULT trailerFieldBC
    /// }
    /// ```
    ///
    /// The SHA-1 default is not supported, so absent parameters are an error.
    fn parse_rsa_pss_params(params: Option<&der::Any>) -> Result<Self> {
        use der::{Reader, SliceReader, TagMode, TagNumber};

        let params = params.ok_or(Error::AlgorithmError(AlgorithmError::MissingParameters))?;
        let mut reader = SliceReader::new(params.value()).map_err(|_| {
            Error::AlgorithmError(AlgorithmError::InvalidParameters(
                "RSA-PSS parameters".into(),
            ))
        })?;

        let hash_oid = reader
            .context_specific::<AlgorithmIdentifier<der::Any>>(TagNumber::N0, TagMode::Explicit)
            .ok()
            .flatten()
            .map(|ai| ai.oid);

        match hash_oid {
            Some(oids::SHA256) => Ok(SignatureAlgorithm::RsaPssSha256),
            Some(oids::SHA384) => Ok(SignatureAlgorithm::RsaPssSha384),
            Some(oids::SHA512) => Ok(SignatureAlgorithm::RsaPssSha512),
            Some(oid) => Err(Error::unsupported_algorithm(alloc::format!(
                "RSA-PSS with unsupported hash OID: {}",
                oid
            ))),
            None => Err(Error::unsupported_algorithm(
                "RSA-PSS with the default SHA-1 hash",
            )),
        }
    }
}

/// Crypto backend trait for signature verification.
pub trait CryptoBackend {
    /// Verify `signature` over `tbs_data` with the DER `public_key` bits.
    fn verify_signature(
        &self,
        algorithm: SignatureAlgorithm,
        tbs_data: &[u8],
        signature: &[u8],
        public_key: &[u8],
    ) -> Result<()>;
}

/// SHA-256 digest.
pub fn sha256(data: &[u8]) -> Result<[u8; 32]> {
    #[cfg(feature = "ring-backend")]
    {
        let digest = ::ring::digest::digest(&::ring::digest::SHA256, data);
        let mut out = [0u8; 32];
        out.copy_from_slice(digest.as_ref());
        Ok(out)
    }

    #[cfg(not(feature = "ring-backend"))]
    {
        let _ = data;
        Err(Error::AlgorithmError(AlgorithmError::HashUnavailable))
    }
}
