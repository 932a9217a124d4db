// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! End-entity usage checks.
//!
//! Each variant requires a key usage bit, an extended key usage purpose and
//! a legacy Netscape certificate type bit. An absent extension permits
//! everything, except the TSA variant which requires EKU to be present.
//!
//! | Variant      | Key usage                 | EKU                       | Netscape type  |
//! |--------------|---------------------------|---------------------------|----------------|
//! | tls-server   | by key exchange           | serverAuth, SGC           | sslServer      |
//! | tls-client   | digitalSignature          | clientAuth                | sslClient      |
//! | code-signing | digitalSignature          | codeSigning               | objectSigning  |
//! | jce-signing  | digitalSignature          | codeSigning               | not checked    |
//! | tsa-server   | digitalSignature          | timeStamping (required)   | not checked    |
//!
//! anyExtendedKeyUsage satisfies every EKU requirement.

extern crate alloc;

use alloc::collections::BTreeSet;
use alloc::format;
use alloc::string::String;

use const_oid::ObjectIdentifier;

use crate::certificate::Certificate;
use crate::distrust::DistrustPolicies;
use crate::error::{Error, ErrorKind, Result};
use crate::validator::{UsageParameter, Variant};
use crate::x509::extensions::{
    extended_key_usage_permits, key_usage_permits, netscape_cert_type_permits, KeyUsage,
    NetscapeCertType,
};
use crate::x509::oids;

const TLS_SERVER_PURPOSES: &[ObjectIdentifier] =
    &[oids::SERVER_AUTH, oids::NETSCAPE_SGC, oids::MICROSOFT_SGC];

/// Key usage bit required of a TLS server certificate for `key_exchange`.
pub fn tls_server_key_usage(key_exchange: &str) -> Option<u16> {
    match key_exchange {
        "RSA" => Some(KeyUsage::KEY_ENCIPHERMENT),
        "DHE_DSS" | "DHE_RSA" | "ECDHE_ECDSA" | "ECDHE_RSA" | "RSA_EXPORT" | "UNKNOWN" => {
            Some(KeyUsage::DIGITAL_SIGNATURE)
        }
        "DH_DSS" | "DH_RSA" | "ECDH_ECDSA" | "ECDH_RSA" => Some(KeyUsage::KEY_AGREEMENT),
        _ => None,
    }
}

/// Variant-specific checks on the leaf of a resolved chain, followed by the
/// enabled distrust policies.
#[derive(Debug, Clone)]
pub struct EndEntityChecker {
    variant: Variant,
    distrust: DistrustPolicies,
}

impl EndEntityChecker {
    pub fn new(variant: Variant, distrust: DistrustPolicies) -> Self {
        Self { variant, distrust }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Check `chain[0]`. With `check_unresolved`, a critical extension
    /// that no usage check consumed is fatal.
    pub fn check(
        &self,
        chain: &[Certificate],
        parameter: &UsageParameter,
        check_unresolved: bool,
    ) -> Result<()> {
        let leaf = chain
            .first()
            .ok_or_else(|| Error::validation(ErrorKind::EmptyChain, "empty certificate chain"))?;

        if self.variant != Variant::Generic {
            let mut critical = leaf.critical_extensions();
            self.check_usage(leaf, parameter, &mut critical)?;

            if check_unresolved {
                critical.remove(&oids::BASIC_CONSTRAINTS);
                critical.remove(&oids::SUBJECT_ALT_NAME);
                if let Some(oid) = critical.iter().next() {
                    log::error!("Unresolved critical extension {} in {}", oid, leaf.subject());
                    return Err(Error::validation_for(
                        ErrorKind::UnsupportedCriticalExtension,
                        format!("unresolved critical extension {}", oid),
                        leaf,
                    ));
                }
            }
        }

        self.distrust.check_all(self.variant, chain)
    }

    fn check_usage(
        &self,
        leaf: &Certificate,
        parameter: &UsageParameter,
        critical: &mut BTreeSet<ObjectIdentifier>,
    ) -> Result<()> {
        match self.variant {
            Variant::Generic => Ok(()),
            Variant::TlsServer => {
                let key_exchange = parameter.key_exchange().unwrap_or("");
                let ku = tls_server_key_usage(key_exchange).ok_or_else(|| {
                    usage_violation(leaf, format!("unknown key exchange algorithm '{}'", key_exchange))
                })?;
                require_key_usage(leaf, ku, critical)?;
                require_purpose(leaf, TLS_SERVER_PURPOSES, critical)?;
                require_netscape(leaf, NetscapeCertType::SSL_SERVER, critical)
            }
            Variant::TlsClient => {
                require_key_usage(leaf, KeyUsage::DIGITAL_SIGNATURE, critical)?;
                require_purpose(leaf, &[oids::CLIENT_AUTH], critical)?;
                require_netscape(leaf, NetscapeCertType::SSL_CLIENT, critical)
            }
            Variant::CodeSigning => {
                require_key_usage(leaf, KeyUsage::DIGITAL_SIGNATURE, critical)?;
                require_purpose(leaf, &[oids::CODE_SIGNING], critical)?;
                require_netscape(leaf, NetscapeCertType::OBJECT_SIGNING, critical)
            }
            Variant::JceSigning => {
                require_key_usage(leaf, KeyUsage::DIGITAL_SIGNATURE, critical)?;
                require_purpose(leaf, &[oids::CODE_SIGNING], critical)?;
                // bit not checked, historically misissued JCE certificates
                critical.remove(&oids::NETSCAPE_CERT_TYPE);
                Ok(())
            }
            Variant::TsaServer => {
                require_key_usage(leaf, KeyUsage::DIGITAL_SIGNATURE, critical)?;
                if !matches!(leaf.extended_key_usage(), Ok(Some(_))) {
                    return Err(usage_violation(
                        leaf,
                        String::from("extended key usage is required"),
                    ));
                }
                require_purpose(leaf, &[oids::TIME_STAMPING], critical)
            }
        }
    }
}

fn usage_violation(leaf: &Certificate, msg: String) -> Error {
    log::error!("{}: {}", leaf.subject(), msg);
    Error::validation_for(ErrorKind::UsageViolation, msg, leaf)
}

fn require_key_usage(
    leaf: &Certificate,
    bit: u16,
    critical: &mut BTreeSet<ObjectIdentifier>,
) -> Result<()> {
    if !key_usage_permits(leaf, bit) {
        return Err(usage_violation(
            leaf,
            format!("key usage does not permit {:#06x}", bit),
        ));
    }
    critical.remove(&oids::KEY_USAGE);
    Ok(())
}

fn require_purpose(
    leaf: &Certificate,
    purposes: &[ObjectIdentifier],
    critical: &mut BTreeSet<ObjectIdentifier>,
) -> Result<()> {
    if !extended_key_usage_permits(leaf, purposes) {
        return Err(usage_violation(
            leaf,
            format!("extended key usage does not permit {}", purposes[0]),
        ));
    }
    critical.remove(&oids::EXTENDED_KEY_USAGE);
    Ok(())
}

fn require_netscape(
    leaf: &Certificate,
    bit: u8,
    critical: &mut BTreeSet<ObjectIdentifier>,
) -> Result<()> {
    if !netscape_cert_type_permits(leaf, bit) {
        return Err(usage_violation(
            leaf,
            format!("netscape certificate type does not permit {:#04x}", bit),
        ));
    }
    critical.remove(&oids::NETSCAPE_CERT_TYPE);
    Ok(())
}
