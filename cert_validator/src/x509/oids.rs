// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! OID constants used by chain validation
//!
//! Extension identifiers, key purposes (including the obsolete step-up
//! purposes still honoured for TLS servers), and the signature, digest and
//! key algorithm identifiers consulted by algorithm constraints.

use const_oid::ObjectIdentifier;

// =============================================================================
// Extension OIDs - RFC 5280 Section 4.2
// =============================================================================

/// Subject Key Identifier - 2.5.29.14
pub const SUBJECT_KEY_IDENTIFIER: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.14");

/// Key Usage - 2.5.29.15
pub const KEY_USAGE: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.15");

/// Subject Alternative Name - 2.5.29.17
pub const SUBJECT_ALT_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.17");

/// Basic Constraints - 2.5.29.19
pub const BASIC_CONSTRAINTS: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.19");

/// Authority Key Identifier - 2.5.29.35
pub const AUTHORITY_KEY_IDENTIFIER: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.35");

/// Extended Key Usage - 2.5.29.37
pub const EXTENDED_KEY_USAGE: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.37");

/// Netscape certificate type - 2.16.840.1.113730.1.1
///
/// Legacy BIT STRING extension that predates EKU.
pub const NETSCAPE_CERT_TYPE: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("2.16.840.1.113730.1.1");

// =============================================================================
// Key purpose OIDs - RFC 5280 Section 4.2.1.12
// =============================================================================

/// anyExtendedKeyUsage - 2.5.29.37.0
pub const ANY_EXTENDED_KEY_USAGE: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.29.37.0");

/// TLS Web Server Authentication - 1.3.6.1.5.5.7.3.1
pub const SERVER_AUTH: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.3.1");

/// TLS Web Client Authentication - 1.3.6.1.5.5.7.3.2
pub const CLIENT_AUTH: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.3.2");

/// Code Signing - 1.3.6.1.5.5.7.3.3
pub const CODE_SIGNING: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.3.3");

/// Email Protection - 1.3.6.1.5.5.7.3.4
pub const EMAIL_PROTECTION: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.3.4");

/// Time Stamping - 1.3.6.1.5.5.7.3.8
pub const TIME_STAMPING: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.3.8");

/// OCSP Signing - 1.3.6.1.5.5.7.3.9
pub const OCSP_SIGNING: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.3.9");

/// Netscape Server Gated Crypto - 2.16.840.1.113730.4.1
pub const NETSCAPE_SGC: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.113730.4.1");

/// Microsoft Server Gated Crypto - 1.3.6.1.4.1.311.10.3.3
pub const MICROSOFT_SGC: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.4.1.311.10.3.3");

// =============================================================================
// Signature algorithm OIDs
// =============================================================================

/// md2WithRSAEncryption - 1.2.840.113549.1.1.2
pub const MD2_WITH_RSA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.2");

/// md5WithRSAEncryption - 1.2.840.113549.1.1.4
pub const MD5_WITH_RSA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.4");

/// sha1WithRSAEncryption - 1.2.840.113549.1.1.5
pub const SHA1_WITH_RSA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.5");

/// ecdsa-with-SHA1 - 1.2.840.10045.4.1
pub const ECDSA_WITH_SHA1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.4.1");

/// dsa-with-sha1 - 1.2.840.10040.4.3
pub const DSA_WITH_SHA1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10040.4.3");

/// ecdsa-with-SHA256 - 1.2.840.10045.4.3.2
pub const ECDSA_WITH_SHA256: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.10045.4.3.2");

/// ecdsa-with-SHA384 - 1.2.840.10045.4.3.3
pub const ECDSA_WITH_SHA384: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.10045.4.3.3");

/// sha256WithRSAEncryption - 1.2.840.113549.1.1.11
pub const SHA256_WITH_RSA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.11");

/// sha384WithRSAEncryption - 1.2.840.113549.1.1.12
pub const SHA384_WITH_RSA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.12");

/// sha512WithRSAEncryption - 1.2.840.113549.1.1.13
pub const SHA512_WITH_RSA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.13");

/// RSASSA-PSS - 1.2.840.113549.1.1.10
pub const RSA_PSS: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.10");

// =============================================================================
// Digest OIDs
// =============================================================================

/// SHA-256 - 2.16.840.1.101.3.4.2.1
pub const SHA256: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.1");

/// SHA-384 - 2.16.840.1.101.3.4.2.2
pub const SHA384: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.2");

/// SHA-512 - 2.16.840.1.101.3.4.2.3
pub const SHA512: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.3");

// =============================================================================
// Public key algorithm OIDs
// =============================================================================

/// RSA Encryption - 1.2.840.113549.1.1.1
pub const RSA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");

/// EC Public Key - 1.2.840.10045.2.1
pub const ECPUBLICKEY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");

/// secp256r1 - 1.2.840.10045.3.1.7
pub const ECDSA_P256: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");

/// secp384r1 - 1.3.132.0.34
pub const ECDSA_P384: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.34");

/// Ed25519 - 1.3.101.112
pub const ED25519: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.101.112");

// =============================================================================
// Helper Functions
// =============================================================================

/// Signature algorithms built on MD2 or MD5.
pub fn is_md_signature(oid: &ObjectIdentifier) -> bool {
    oid == &MD2_WITH_RSA || oid == &MD5_WITH_RSA
}

/// Signature algorithms built on SHA-1.
pub fn is_sha1_signature(oid: &ObjectIdentifier) -> bool {
    oid == &SHA1_WITH_RSA || oid == &ECDSA_WITH_SHA1 || oid == &DSA_WITH_SHA1
}

/// Obsolete export-approved purposes treated as serverAuth.
pub fn is_step_up_purpose(oid: &ObjectIdentifier) -> bool {
    oid == &NETSCAPE_SGC || oid == &MICROSOFT_SGC
}
