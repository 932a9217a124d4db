// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Error types for certificate chain validation
//!
//! Low-level failures (DER decoding, signature primitives, time handling)
//! are kept as their own variants. Failures of the validation engine itself
//! are reported as [`ValidatorError`], which carries an [`ErrorKind`], the
//! offending certificate when one is identifiable, and the underlying cause.

extern crate alloc;

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use core::fmt;

use crate::certificate::Certificate;

/// Result type alias for validation operations
pub type Result<T> = core::result::Result<T, Error>;

/// Top-level error type
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// Errors during DER/ASN.1 parsing
    ParseError(ParseError),

    /// Errors during DER/ASN.1 parsing (from der crate)
    Asn1(der::Error),

    /// Errors related to cryptographic signature verification
    SignatureError(SignatureError),

    /// Errors related to time validation
    TimeError(TimeError),

    /// Unsupported or invalid cryptographic algorithms
    AlgorithmError(AlgorithmError),

    /// Certificate encoding errors (PEM/DER conversion)
    EncodingError(EncodingError),

    /// Chain validation failure
    Validation(ValidatorError),

    /// Internal error (should not occur in normal operation)
    InternalError(String),
}

/// Errors that occur during DER/ASN.1 parsing
#[derive(Debug, Clone)]
pub enum ParseError {
    /// Invalid DER encoding
    InvalidDer(String),

    /// Invalid bit string encoding
    InvalidBitString(String),

    /// Invalid time encoding
    InvalidTimeEncoding(String),

    /// Missing required field
    MissingField(String),

    /// Invalid hex fingerprint
    InvalidFingerprint(String),

    /// Error from der crate
    DerError(String),
}

/// Errors related to cryptographic signature verification
#[derive(Debug, Clone)]
pub enum SignatureError {
    /// Signature verification failed
    VerificationFailed,

    /// Signature algorithm mismatch between certificate and TBS certificate
    AlgorithmMismatch { cert_algo: String, tbs_algo: String },

    /// Invalid signature format
    InvalidSignatureFormat(String),

    /// Public key cannot verify signature
    InvalidPublicKey(String),

    /// Signature algorithm not supported
    UnsupportedSignatureAlgorithm(String),

    /// Error from ring cryptographic library
    RingError(String),
}

/// Errors related to time validation
#[derive(Debug, Clone)]
pub enum TimeError {
    /// Certificate not yet valid
    NotYetValid,

    /// Certificate has expired
    Expired,

    /// Time parsing error
    ParseError(String),

    /// Clock unavailable or out of range
    InvalidTime,
}

/// Errors related to cryptographic algorithms
#[derive(Debug, Clone)]
pub enum AlgorithmError {
    /// Algorithm not supported
    Unsupported(String),

    /// Algorithm parameters invalid
    InvalidParameters(String),

    /// Algorithm parameters missing
    MissingParameters,

    /// Hash primitive unavailable in this build
    HashUnavailable,

    /// Unknown algorithm OID
    UnknownOid(String),
}

/// Errors related to certificate encoding
#[derive(Debug, Clone)]
pub enum EncodingError {
    /// Invalid PEM format
    InvalidPem(String),

    /// PEM label mismatch
    InvalidPemLabel { expected: String, found: String },

    /// Invalid DER encoding
    InvalidDer(String),
}

/// Classification of chain validation failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// No certificates supplied
    EmptyChain,
    /// Chain does not lead to any configured trust anchor
    NoTrustAnchor,
    /// Issuer/subject name mismatch between adjacent certificates
    NameChaining,
    /// Cryptographic verification failed
    SignatureError,
    /// Outside validity window
    CertificateExpired,
    /// Signature or key algorithm rejected by policy
    AlgorithmDisabled,
    /// A CA certificate fails basic-constraints or key-usage rules
    CaExtensionViolation,
    /// Path length constraint exceeded
    PathLengthViolation,
    /// Critical extension not recognized by any check
    UnsupportedCriticalExtension,
    /// End-entity certificate not fit for the requested usage
    UsageViolation,
    /// Explicit blocklist hit or distrust-policy veto
    UntrustedCertificate,
    /// Candidate trust anchor lacks required CA attributes
    InvalidTrustAnchor,
    /// Wrapped failure from the path builder
    PathBuildingFailed,
    /// Wrapped failure from the path validator
    PathValidationFailed,
    /// Fingerprint could not be computed
    FingerprintUnavailable,
    /// Revocation check failed
    Revoked,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::EmptyChain => "empty chain",
            ErrorKind::NoTrustAnchor => "no trust anchor",
            ErrorKind::NameChaining => "name chaining",
            ErrorKind::SignatureError => "signature error",
            ErrorKind::CertificateExpired => "certificate expired",
            ErrorKind::AlgorithmDisabled => "algorithm disabled",
            ErrorKind::CaExtensionViolation => "CA extension violation",
            ErrorKind::PathLengthViolation => "path length violation",
            ErrorKind::UnsupportedCriticalExtension => "unsupported critical extension",
            ErrorKind::UsageViolation => "usage violation",
            ErrorKind::UntrustedCertificate => "untrusted certificate",
            ErrorKind::InvalidTrustAnchor => "invalid trust anchor",
            ErrorKind::PathBuildingFailed => "path building failed",
            ErrorKind::PathValidationFailed => "path validation failed",
            ErrorKind::FingerprintUnavailable => "fingerprint unavailable",
            ErrorKind::Revoked => "revoked",
        }
    }

    /// Path length violations are a class of CA extension violation.
    pub fn is_ca_extension_violation(&self) -> bool {
        matches!(
            self,
            ErrorKind::CaExtensionViolation | ErrorKind::PathLengthViolation
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A chain validation failure
#[derive(Debug, Clone)]
pub struct ValidatorError {
    kind: ErrorKind,
    message: String,
    certificate: Option<Box<Certificate>>,
    cause: Option<Box<Error>>,
}

impl ValidatorError {
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S) -> Self {
        Self {
            kind,
            message: message.into(),
            certificate: None,
            cause: None,
        }
    }

    /// Attach the offending certificate
    pub fn with_certificate(mut self, cert: &Certificate) -> Self {
        self.certificate = Some(Box::new(cert.clone()));
        self
    }

    /// Attach the underlying cause
    pub fn with_cause(mut self, cause: Error) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn certificate(&self) -> Option<&Certificate> {
        self.certificate.as_deref()
    }

    pub fn cause(&self) -> Option<&Error> {
        self.cause.as_deref()
    }
}

impl fmt::Display for ValidatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if let Some(cert) = &self.certificate {
            write!(f, " [subject: {}]", cert.subject())?;
        }
        if let Some(cause) = &self.cause {
            write!(f, " (caused by: {})", cause)?;
        }
        Ok(())
    }
}

impl From<ValidatorError> for Error {
    fn from(err: ValidatorError) -> Self {
        Error::Validation(err)
    }
}

// ============================================================================
// Error Display Implementation (works in both std and no_std)
// ============================================================================

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ParseError(e) => write!(f, "Parse error: {}", e),
            Error::Asn1(e) => write!(f, "ASN.1 error: {}", e),
            Error::SignatureError(e) => write!(f, "Signature error: {}", e),
            Error::TimeError(e) => write!(f, "Time validation error: {}", e),
            Error::AlgorithmError(e) => write!(f, "Algorithm error: {}", e),
            Error::EncodingError(e) => write!(f, "Encoding error: {}", e),
            Error::Validation(e) => write!(f, "Validation error: {}", e),
            Error::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidDer(msg) => write!(f, "Invalid DER encoding: {}", msg),
            ParseError::InvalidBitString(msg) => write!(f, "Invalid bit string: {}", msg),
            ParseError::InvalidTimeEncoding(msg) => write!(f, "Invalid time encoding: {}", msg),
            ParseError::MissingField(field) => write!(f, "Missing required field: {}", field),
            ParseError::InvalidFingerprint(msg) => write!(f, "Invalid fingerprint: {}", msg),
            ParseError::DerError(msg) => write!(f, "DER error: {}", msg),
        }
    }
}

impl fmt::Display for SignatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureError::VerificationFailed => write!(f, "Signature verification failed"),
            SignatureError::AlgorithmMismatch {
                cert_algo,
                tbs_algo,
            } => {
                write!(
                    f,
                    "Signature algorithm mismatch: cert={}, tbs={}",
                    cert_algo, tbs_algo
                )
            }
            SignatureError::InvalidSignatureFormat(msg) => {
                write!(f, "Invalid signature format: {}", msg)
            }
            SignatureError::InvalidPublicKey(msg) => write!(f, "Invalid public key: {}", msg),
            SignatureError::UnsupportedSignatureAlgorithm(algo) => {
                write!(f, "Unsupported signature algorithm: {}", algo)
            }
            SignatureError::RingError(msg) => write!(f, "Cryptographic error: {}", msg),
        }
    }
}

impl fmt::Display for TimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeError::NotYetValid => write!(f, "Certificate not yet valid"),
            TimeError::Expired => write!(f, "Certificate has expired"),
            TimeError::ParseError(msg) => write!(f, "Time parse error: {}", msg),
            TimeError::InvalidTime => write!(f, "Invalid time"),
        }
    }
}

impl fmt::Display for AlgorithmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlgorithmError::Unsupported(algo) => write!(f, "Unsupported algorithm: {}", algo),
            AlgorithmError::InvalidParameters(msg) => {
                write!(f, "Invalid algorithm parameters: {}", msg)
            }
            AlgorithmError::MissingParameters => write!(f, "Missing algorithm parameters"),
            AlgorithmError::HashUnavailable => write!(f, "No hash backend available"),
            AlgorithmError::UnknownOid(oid) => write!(f, "Unknown algorithm OID: {}", oid),
        }
    }
}

impl fmt::Display for EncodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodingError::InvalidPem(msg) => write!(f, "Invalid PEM: {}", msg),
            EncodingError::InvalidPemLabel { expected, found } => {
                write!(
                    f,
                    "Invalid PEM label: expected '{}', found '{}'",
                    expected, found
                )
            }
            EncodingError::InvalidDer(msg) => write!(f, "Invalid DER: {}", msg),
        }
    }
}

// ============================================================================
// std::error::Error implementation (when std feature is enabled)
// ============================================================================

#[cfg(feature = "std")]
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Validation(e) => e
                .cause()
                .map(|cause| cause as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

// ============================================================================
// Conversions from external crate errors
// ============================================================================

/// Convert from der crate errors
impl From<der::Error> for Error {
    fn from(err: der::Error) -> Self {
        Error::ParseError(ParseError::DerError(err.to_string()))
    }
}

/// Convert from ring's Unspecified error
#[cfg(feature = "ring-backend")]
impl From<ring::error::Unspecified> for Error {
    fn from(_: ring::error::Unspecified) -> Self {
        Error::SignatureError(SignatureError::RingError(
            "Cryptographic operation failed".to_string(),
        ))
    }
}

/// Convert from ring's KeyRejected error
#[cfg(feature = "ring-backend")]
impl From<ring::error::KeyRejected> for Error {
    fn from(err: ring::error::KeyRejected) -> Self {
        Error::SignatureError(SignatureError::InvalidPublicKey(err.to_string()))
    }
}

/// Convert from PEM decoding errors
impl From<pem_rfc7468::Error> for Error {
    fn from(err: pem_rfc7468::Error) -> Self {
        Error::EncodingError(EncodingError::InvalidPem(err.to_string()))
    }
}

// ============================================================================
// Helper constructors for common error cases
// ============================================================================

impl Error {
    /// Create a signature verification failure
    pub fn signature_failed() -> Self {
        Error::SignatureError(SignatureError::VerificationFailed)
    }

    /// Create an unsupported algorithm error
    pub fn unsupported_algorithm<S: Into<String>>(algo: S) -> Self {
        Error::AlgorithmError(AlgorithmError::Unsupported(algo.into()))
    }

    /// Create a certificate expired error
    pub fn expired() -> Self {
        Error::TimeError(TimeError::Expired)
    }

    /// Create a certificate not yet valid error
    pub fn not_yet_valid() -> Self {
        Error::TimeError(TimeError::NotYetValid)
    }

    /// Create a validation failure of the given kind
    pub fn validation<S: Into<String>>(kind: ErrorKind, msg: S) -> Self {
        Error::Validation(ValidatorError::new(kind, msg))
    }

    /// Create a validation failure naming the offending certificate
    pub fn validation_for<S: Into<String>>(kind: ErrorKind, msg: S, cert: &Certificate) -> Self {
        Error::Validation(ValidatorError::new(kind, msg).with_certificate(cert))
    }

    /// Create an internal error (should be rare)
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Error::InternalError(msg.into())
    }

    /// Map this error onto the validation taxonomy, if it belongs there.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Error::Validation(e) => Some(e.kind()),
            Error::SignatureError(_) => Some(ErrorKind::SignatureError),
            Error::TimeError(TimeError::Expired) | Error::TimeError(TimeError::NotYetValid) => {
                Some(ErrorKind::CertificateExpired)
            }
            _ => None,
        }
    }

    /// The offending certificate, when one was recorded
    pub fn certificate(&self) -> Option<&Certificate> {
        match self {
            Error::Validation(e) => e.certificate(),
            _ => None,
        }
    }

    /// The wrapped cause of a validation failure
    pub fn cause(&self) -> Option<&Error> {
        match self {
            Error::Validation(e) => e.cause(),
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::signature_failed();
        assert_eq!(
            err.to_string(),
            "Signature error: Signature verification failed"
        );

        let err = Error::expired();
        assert!(err.to_string().contains("expired"));

        let err = Error::validation(ErrorKind::NoTrustAnchor, "no anchor for issuer");
        assert_eq!(
            err.to_string(),
            "Validation error: no trust anchor: no anchor for issuer"
        );
    }

    #[test]
    fn test_error_conversions() {
        let der_err = der::Error::new(der::ErrorKind::Failed, der::Length::ZERO);
        let err: Error = der_err.into();
        assert!(matches!(err, Error::ParseError(ParseError::DerError(_))));
        assert_eq!(err.kind(), None);
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            Error::signature_failed().kind(),
            Some(ErrorKind::SignatureError)
        );
        assert_eq!(
            Error::not_yet_valid().kind(),
            Some(ErrorKind::CertificateExpired)
        );
        assert_eq!(
            Error::validation(ErrorKind::EmptyChain, "empty").kind(),
            Some(ErrorKind::EmptyChain)
        );
    }

    #[test]
    fn test_cause_preserved() {
        let inner = Error::validation(ErrorKind::NameChaining, "issuer mismatch");
        let outer = Error::Validation(
            ValidatorError::new(ErrorKind::PathValidationFailed, "path validation failed")
                .with_cause(inner),
        );
        assert_eq!(outer.kind(), Some(ErrorKind::PathValidationFailed));
        assert_eq!(
            outer.cause().and_then(|c| c.kind()),
            Some(ErrorKind::NameChaining)
        );
        assert!(outer.to_string().contains("caused by"));
    }

    #[test]
    fn test_ca_extension_class() {
        assert!(ErrorKind::PathLengthViolation.is_ca_extension_violation());
        assert!(ErrorKind::CaExtensionViolation.is_ca_extension_violation());
        assert!(!ErrorKind::UsageViolation.is_ca_extension_violation());
    }

    #[test]
    fn test_clone() {
        let err = Error::signature_failed();
        let cloned = err.clone();
        assert_eq!(err.to_string(), cloned.to_string());
    }
}
