// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! X.509 Certificate Chain Validation
//!
//! A no_std-compatible certificate chain validation engine. Uses `der` for
//! ASN.1 parsing and optional crypto backends for signature checks.
//!
//! # Features
//! - Two chain algorithms: a simple top-down walk of the supplied chain,
//!   and a trust-anchor-aware algorithm with shortcuts, path validation and
//!   path building
//! - End-entity checks per usage (TLS server/client, code signing, JCE
//!   signing, timestamping)
//! - Distrust policies and an explicit blocklist
//! - Algorithm constraints and revocation collaborators
//!
//! # Example
//! ```no_run
//! use cert_validator::prelude::*;
//!
//! # fn example(roots_pem: &str, chain_der: &[&[u8]]) -> cert_validator::Result<()> {
//! let anchors = TrustAnchors::from_pem_bundle(roots_pem)?;
//! let config = ValidatorConfig::from_env()?;
//! let validator = Validator::new(Algorithm::TrustAnchorAware, Variant::TlsServer, anchors, &config);
//!
//! let chain = chain_der
//!     .iter()
//!     .map(|der| Certificate::from_der(der))
//!     .collect::<cert_validator::Result<Vec<_>>>()?;
//! let request = ValidationRequest::new(&chain)
//!     .with_parameter(UsageParameter::KeyExchange("ECDHE_RSA".into()));
//! let resolved = validator.validate(&request)?;
//! let _ = resolved.root();
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod anchors;
pub mod blocklist;
pub mod certificate;
pub mod chain;
pub mod config;
pub mod crypto_backend;
pub mod distrust;
pub mod error;
pub mod path;
pub mod time;
pub mod validator;
pub mod x509;

#[cfg(all(test, feature = "ring-backend"))]
pub(crate) mod test_util;

pub use anchors::TrustAnchors;
pub use blocklist::Blocklist;
pub use certificate::Certificate;
pub use chain::CertificateChain;
pub use config::ValidatorConfig;
pub use distrust::{AnchorDistrustPolicy, DistrustPolicies, DistrustPolicy};
pub use error::{Error, ErrorKind, Result, ValidatorError};
pub use path::{
    BuiltPath, DfsPathBuilder, PathBuilder, PathParameters, PathValidator, PkixPathValidator,
    RevocationChecker,
};
pub use time::{Clock, FixedClock, SystemClock};
pub use validator::{
    Algorithm, ChainResolver, UsageParameter, ValidationRequest, Validator, Variant,
};
pub use x509::extensions::{BasicConstraints, ExtendedKeyUsage, Extension, Extensions, KeyUsage};
pub use x509::{AlgorithmConstraints, DefaultAlgorithmConstraints};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        Algorithm, Certificate, Error, Result, TrustAnchors, UsageParameter, ValidationRequest,
        Validator, ValidatorConfig, Variant,
    };
}
