// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! X.509 v3 certificate extensions and the predicates built on them.
//!
//! The typed extensions here cover what chain validation reads: Basic
//! Constraints, Key Usage, Extended Key Usage, the legacy Netscape
//! certificate type, and the key identifiers used to pick between anchors
//! that share a subject name.
//!
//! The free functions at the bottom answer yes/no questions about a
//! certificate. An absent extension places no restriction. An extension that
//! is present but cannot be decoded never grants anything.

extern crate alloc;

use alloc::vec::Vec;
use core::fmt;

use const_oid::ObjectIdentifier;
use der::asn1::{BitString, OctetString};
use der::{
    Decode, DecodeValue, Encode, EncodeValue, FixedTag, Header, Length, Reader, Sequence, Tag,
    TagMode, TagNumber, Writer,
};

use crate::certificate::Certificate;
use crate::x509::oids;

pub use crate::certificate::{Extension, Extensions};
pub use crate::x509::oids::{
    AUTHORITY_KEY_IDENTIFIER, BASIC_CONSTRAINTS, EXTENDED_KEY_USAGE, KEY_USAGE,
    NETSCAPE_CERT_TYPE, SUBJECT_ALT_NAME, SUBJECT_KEY_IDENTIFIER,
};

// ============================================================================
// Basic Constraints - RFC 5280 Section 4.2.1.9
// ============================================================================

/// Basic Constraints extension.
///
/// ```asn1
/// BasicConstraints ::= SEQUENCE {
///     cA                      BOOLEAN DEFAULT FALSE,
///     pathLenConstraint       INTEGER (0..MAX) OPTIONAL
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Sequence)]
pub struct BasicConstraints {
    /// Whether the subject is a CA
    #[asn1(default = "default_false")]
    pub ca: bool,

    /// Maximum number of non-self-issued intermediates below this CA
    #[asn1(optional = "true")]
    pub path_len_constraint: Option<u32>,
}

fn default_false() -> bool {
    false
}

impl BasicConstraints {
    pub fn new_end_entity() -> Self {
        Self {
            ca: false,
            path_len_constraint: None,
        }
    }

    pub fn new_ca(path_len: Option<u32>) -> Self {
        Self {
            ca: true,
            path_len_constraint: path_len,
        }
    }

    /// Parse from the extension value bytes
    pub fn from_extension(ext: &Extension) -> Result<Self, der::Error> {
        Self::from_der(ext.value())
    }
}

// ============================================================================
// Key Usage - RFC 5280 Section 4.2.1.3
// ============================================================================

/// Key Usage bit flags.
///
/// ```asn1
/// KeyUsage ::= BIT STRING {
///     digitalSignature        (0),
///     nonRepudiation          (1),
///     keyEncipherment         (2),
///     dataEncipherment        (3),
///     keyAgreement            (4),
///     keyCertSign             (5),
///     cRLSign                 (6),
///     encipherOnly            (7),
///     decipherOnly            (8)
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyUsage {
    bits: u16,
}

impl KeyUsage {
    // Bit 0 of the BIT STRING is the MSB of the first content byte. The first
    // two bytes are kept as a big-endian u16 so the constants map directly.

    /// Digital signature (bit 0)
    pub const DIGITAL_SIGNATURE: u16 = 1 << 15;
    /// Non-repudiation / content commitment (bit 1)
    pub const NON_REPUDIATION: u16 = 1 << 14;
    /// Key encipherment (bit 2)
    pub const KEY_ENCIPHERMENT: u16 = 1 << 13;
    /// Data encipherment (bit 3)
    pub const DATA_ENCIPHERMENT: u16 = 1 << 12;
    /// Key agreement (bit 4)
    pub const KEY_AGREEMENT: u16 = 1 << 11;
    /// Certificate signing (bit 5)
    pub const KEY_CERT_SIGN: u16 = 1 << 10;
    /// CRL signing (bit 6)
    pub const CRL_SIGN: u16 = 1 << 9;
    /// Encipher only (bit 7)
    pub const ENCIPHER_ONLY: u16 = 1 << 8;
    /// Decipher only (bit 8)
    pub const DECIPHER_ONLY: u16 = 1 << 7;

    pub fn new(bits: u16) -> Self {
        Self { bits }
    }

    pub fn bits(&self) -> u16 {
        self.bits
    }

    /// Check if a specific usage is enabled
    pub fn has(&self, usage: u16) -> bool {
        (self.bits & usage) != 0
    }

    /// Parse from DER-encoded BIT STRING
    pub fn from_der(bytes: &[u8]) -> Result<Self, der::Error> {
        let bit_string = BitString::from_der(bytes)?;
        let raw_bytes = bit_string.raw_bytes();

        let bits = match raw_bytes.len() {
            0 => 0,
            1 => u16::from_be_bytes([raw_bytes[0], 0]),
            _ => u16::from_be_bytes([raw_bytes[0], raw_bytes[1]]),
        };

        Ok(Self { bits })
    }

    /// DER encoding with trailing zero bits trimmed.
    pub fn to_der(&self) -> Result<Vec<u8>, der::Error> {
        minimal_bit_string(&self.bits.to_be_bytes())?.to_der()
    }

    pub fn from_extension(ext: &Extension) -> Result<Self, der::Error> {
        Self::from_der(ext.value())
    }
}

impl fmt::Display for KeyUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(u16, &str); 9] = [
            (KeyUsage::DIGITAL_SIGNATURE, "digitalSignature"),
            (KeyUsage::NON_REPUDIATION, "nonRepudiation"),
            (KeyUsage::KEY_ENCIPHERMENT, "keyEncipherment"),
            (KeyUsage::DATA_ENCIPHERMENT, "dataEncipherment"),
            (KeyUsage::KEY_AGREEMENT, "keyAgreement"),
            (KeyUsage::KEY_CERT_SIGN, "keyCertSign"),
            (KeyUsage::CRL_SIGN, "cRLSign"),
            (KeyUsage::ENCIPHER_ONLY, "encipherOnly"),
            (KeyUsage::DECIPHER_ONLY, "decipherOnly"),
        ];
        let usages: Vec<&str> = NAMES
            .iter()
            .filter(|(bit, _)| self.has(*bit))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "{}", usages.join(", "))
    }
}

/// Encode `bytes` as a BIT STRING without trailing zero bits.
fn minimal_bit_string(bytes: &[u8]) -> Result<BitString, der::Error> {
    let mut content: Vec<u8> = bytes.to_vec();
    while content.last() == Some(&0) {
        content.pop();
    }
    let unused = content
        .last()
        .map(|b| b.trailing_zeros() as u8)
        .unwrap_or(0);
    BitString::new(unused, content)
}

// ============================================================================
// Extended Key Usage - RFC 5280 Section 4.2.1.12
// ============================================================================

/// Extended Key Usage extension.
///
/// ```asn1
/// ExtKeyUsageSyntax ::= SEQUENCE SIZE (1..MAX) OF KeyPurposeId
/// KeyPurposeId ::= OBJECT IDENTIFIER
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedKeyUsage {
    /// List of key purpose OIDs
    pub key_purposes: Vec<ObjectIdentifier>,
}

impl<'a> DecodeValue<'a> for ExtendedKeyUsage {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: Header) -> der::Result<Self> {
        reader.read_nested(header.length, |reader| {
            let mut key_purposes = Vec::new();
            while !reader.is_finished() {
                key_purposes.push(ObjectIdentifier::decode(reader)?);
            }
            Ok(Self { key_purposes })
        })
    }
}

impl EncodeValue for ExtendedKeyUsage {
    fn value_len(&self) -> der::Result<Length> {
        let mut len = Length::ZERO;
        for oid in &self.key_purposes {
            len = (len + oid.encoded_len()?)?;
        }
        Ok(len)
    }

    fn encode_value(&self, writer: &mut impl Writer) -> der::Result<()> {
        for oid in &self.key_purposes {
            oid.encode(writer)?;
        }
        Ok(())
    }
}

impl FixedTag for ExtendedKeyUsage {
    const TAG: Tag = Tag::Sequence;
}

impl ExtendedKeyUsage {
    pub fn new(key_purposes: Vec<ObjectIdentifier>) -> Self {
        Self { key_purposes }
    }

    pub fn from_extension(ext: &Extension) -> Result<Self, der::Error> {
        Self::from_der(ext.value())
    }

    /// Check if a specific purpose is present
    pub fn has_purpose(&self, oid: &ObjectIdentifier) -> bool {
        self.key_purposes.iter().any(|p| p == oid)
    }

    /// True if any of `purposes`, or anyExtendedKeyUsage, is listed.
    pub fn permits_any(&self, purposes: &[ObjectIdentifier]) -> bool {
        self.has_purpose(&oids::ANY_EXTENDED_KEY_USAGE)
            || purposes.iter().any(|p| self.has_purpose(p))
    }
}

// ============================================================================
// Netscape certificate type (legacy)
// ============================================================================

/// Netscape certificate type.
///
/// ```asn1
/// NetscapeCertType ::= BIT STRING {
///     sslClient        (0),
///     sslServer        (1),
///     smime            (2),
///     objectSigning    (3),
///     reserved         (4),
///     sslCA            (5),
///     smimeCA          (6),
///     objectSigningCA  (7)
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetscapeCertType {
    bits: u8,
}

impl NetscapeCertType {
    pub const SSL_CLIENT: u8 = 0x80;
    pub const SSL_SERVER: u8 = 0x40;
    pub const SMIME: u8 = 0x20;
    pub const OBJECT_SIGNING: u8 = 0x10;
    pub const SSL_CA: u8 = 0x04;
    pub const SMIME_CA: u8 = 0x02;
    pub const OBJECT_SIGNING_CA: u8 = 0x01;

    pub fn new(bits: u8) -> Self {
        Self { bits }
    }

    pub fn has(&self, bit: u8) -> bool {
        (self.bits & bit) != 0
    }

    pub fn from_der(bytes: &[u8]) -> Result<Self, der::Error> {
        let bit_string = BitString::from_der(bytes)?;
        let bits = bit_string.raw_bytes().first().copied().unwrap_or(0);
        Ok(Self { bits })
    }

    pub fn to_der(&self) -> Result<Vec<u8>, der::Error> {
        minimal_bit_string(&[self.bits])?.to_der()
    }
}

// ============================================================================
// Authority Key Identifier - RFC 5280 Section 4.2.1.1
// ============================================================================

/// Authority Key Identifier extension.
///
/// Only `keyIdentifier` is retained; the issuer/serial alternative is
/// skipped on decode.
///
/// ```asn1
/// AuthorityKeyIdentifier ::= SEQUENCE {
///     keyIdentifier             [0] KeyIdentifier           OPTIONAL,
///     authorityCertIssuer       [1] GeneralNames            OPTIONAL,
///     authorityCertSerialNumber [2] CertificateSerialNumber OPTIONAL
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthorityKeyIdentifier {
    pub key_identifier: Option<OctetString>,
}

impl<'a> DecodeValue<'a> for AuthorityKeyIdentifier {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: Header) -> der::Result<Self> {
        reader.read_nested(header.length, |reader| {
            let key_identifier =
                reader.context_specific::<OctetString>(TagNumber::N0, TagMode::Implicit)?;
            while !reader.is_finished() {
                der::Any::decode(reader)?;
            }
            Ok(Self { key_identifier })
        })
    }
}

impl EncodeValue for AuthorityKeyIdentifier {
    fn value_len(&self) -> der::Result<Length> {
        match &self.key_identifier {
            Some(id) => implicit_key_id(id).encoded_len(),
            None => Ok(Length::ZERO),
        }
    }

    fn encode_value(&self, writer: &mut impl Writer) -> der::Result<()> {
        if let Some(id) = &self.key_identifier {
            implicit_key_id(id).encode(writer)?;
        }
        Ok(())
    }
}

fn implicit_key_id(id: &OctetString) -> der::asn1::ContextSpecificRef<'_, OctetString> {
    der::asn1::ContextSpecificRef {
        tag_number: TagNumber::N0,
        tag_mode: TagMode::Implicit,
        value: id,
    }
}

impl FixedTag for AuthorityKeyIdentifier {
    const TAG: Tag = Tag::Sequence;
}

impl AuthorityKeyIdentifier {
    pub fn new(key_identifier: &[u8]) -> Result<Self, der::Error> {
        Ok(Self {
            key_identifier: Some(OctetString::new(key_identifier)?),
        })
    }
}

// ============================================================================
// Predicates
// ============================================================================

/// Whether `cert` may be used for any of the `required` key usage bits.
///
/// Absent Key Usage permits everything.
pub fn key_usage_permits(cert: &Certificate, required: u16) -> bool {
    match cert.key_usage() {
        Ok(None) => true,
        Ok(Some(ku)) => ku.has(required),
        Err(_) => false,
    }
}

/// Whether `cert`'s Extended Key Usage lists one of `purposes` or
/// anyExtendedKeyUsage. Absent EKU permits everything.
pub fn extended_key_usage_permits(cert: &Certificate, purposes: &[ObjectIdentifier]) -> bool {
    match cert.extended_key_usage() {
        Ok(None) => true,
        Ok(Some(eku)) => eku.permits_any(purposes),
        Err(_) => false,
    }
}

/// Whether the legacy Netscape certificate type allows `bit`. Absent
/// extension permits everything.
pub fn netscape_cert_type_permits(cert: &Certificate, bit: u8) -> bool {
    match cert.netscape_cert_type() {
        Ok(None) => true,
        Ok(Some(ct)) => ct.has(bit),
        Err(_) => false,
    }
}

/// CA path length of `cert`.
///
/// `None` when the certificate is not a CA (constraints absent, `cA` false,
/// or undecodable), `Some(u32::MAX)` when no limit is declared.
pub fn ca_path_len(cert: &Certificate) -> Option<u32> {
    match cert.basic_constraints() {
        Ok(Some(bc)) if bc.ca => Some(bc.path_len_constraint.unwrap_or(u32::MAX)),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
