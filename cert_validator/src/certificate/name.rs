// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Distinguished names.
//!
//! Names keep each attribute value as its raw DER TLV so that string types
//! the `der` crate cannot represent (UniversalString, tag 0x1C) survive a
//! decode/encode round trip untouched.
//!
//! Comparison follows RFC 5280 Section 7.1: two names match when they have
//! the same RDNs in the same order and each attribute value is equal after
//! whitespace compression and case folding, regardless of the string type
//! used to encode it. [`RDNSequence::canonical_key`] renders that form so it
//! can also be used as a map key.

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use const_oid::ObjectIdentifier;
use der::{
    asn1::{PrintableStringRef, SetOfVec, Utf8StringRef},
    Decode, DecodeValue, Encode, EncodeValue, Error, ErrorKind, Header, Length, Reader, Sequence,
    Tag, ValueOrd, Writer,
};

/// Common Name (CN) - 2.5.4.3
pub const CN: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.3");

/// Serial Number - 2.5.4.5
pub const SERIAL_NUMBER: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.5");

/// Country (C) - 2.5.4.6
pub const COUNTRY_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.6");

/// Locality (L) - 2.5.4.7
pub const LOCALITY_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.7");

/// State or Province (ST) - 2.5.4.8
pub const STATE_OR_PROVINCE_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.8");

/// Organization (O) - 2.5.4.10
pub const ORGANIZATION_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.10");

/// Organizational Unit (OU) - 2.5.4.11
pub const ORGANIZATIONAL_UNIT_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.11");

/// Domain Component (DC) - 0.9.2342.19200300.100.1.25
pub const DOMAIN_COMPONENT: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("0.9.2342.19200300.100.1.25");

/// Email Address - 1.2.840.113549.1.9.1
pub const EMAIL_ADDRESS: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.9.1");

const TAG_UTF8: u8 = 0x0C;
const TAG_PRINTABLE: u8 = 0x13;
const TAG_TELETEX: u8 = 0x14;
const TAG_IA5: u8 = 0x16;
const TAG_UNIVERSAL: u8 = 0x1C;
const TAG_BMP: u8 = 0x1E;

// ============================================================================
// AttributeTypeAndValue
// ============================================================================

/// A single `type=value` pair of an RDN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeTypeAndValue {
    /// Attribute type (OID)
    pub oid: ObjectIdentifier,
    /// Raw DER-encoded value (tag + length + content).
    raw_value: Vec<u8>,
}

impl<'a> DecodeValue<'a> for AttributeTypeAndValue {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: Header) -> der::Result<Self> {
        reader.read_nested(header.length, |nested| {
            let oid = ObjectIdentifier::decode(nested)?;
            let remaining = nested.remaining_len();
            let raw_value = nested.read_vec(remaining)?;

            if raw_value.is_empty() {
                return Err(ErrorKind::Length { tag: Tag::Sequence }.into());
            }

            Ok(Self { oid, raw_value })
        })
    }
}

impl EncodeValue for AttributeTypeAndValue {
    fn value_len(&self) -> der::Result<Length> {
        self.oid.encoded_len()? + Length::try_from(self.raw_value.len())?
    }

    fn encode_value(&self, writer: &mut impl Writer) -> der::Result<()> {
        self.oid.encode(writer)?;
        writer.write(&self.raw_value)
    }
}

impl Sequence<'_> for AttributeTypeAndValue {}

impl ValueOrd for AttributeTypeAndValue {
    fn value_cmp(&self, other: &Self) -> der::Result<core::cmp::Ordering> {
        Ok(self
            .oid
            .cmp(&other.oid)
            .then_with(|| self.raw_value.cmp(&other.raw_value)))
    }
}

impl AttributeTypeAndValue {
    /// UTF8String value.
    pub fn new_utf8(oid: ObjectIdentifier, value: &str) -> Result<Self, Error> {
        let raw_value = Utf8StringRef::new(value)?.to_der()?;
        Ok(Self { oid, raw_value })
    }

    /// PrintableString value.
    pub fn new_printable(oid: ObjectIdentifier, value: &str) -> Result<Self, Error> {
        let raw_value = PrintableStringRef::new(value)?.to_der()?;
        Ok(Self { oid, raw_value })
    }

    /// The raw tag byte of the attribute value.
    pub fn value_tag_byte(&self) -> u8 {
        self.raw_value.first().copied().unwrap_or(0)
    }

    /// Content octets of the value TLV.
    pub fn value_content(&self) -> &[u8] {
        let len_byte = match self.raw_value.get(1) {
            Some(b) => *b,
            None => return &[],
        };
        let start = if len_byte & 0x80 == 0 {
            2
        } else {
            2 + (len_byte & 0x7F) as usize
        };
        self.raw_value.get(start..).unwrap_or(&[])
    }

    /// The value as text, for every DirectoryString type plus IA5String.
    ///
    /// `None` for non-string values or invalid encodings.
    pub fn value_as_str(&self) -> Option<String> {
        let content = self.value_content();
        match self.value_tag_byte() {
            TAG_UTF8 | TAG_PRINTABLE | TAG_IA5 => core::str::from_utf8(content)
                .ok()
                .map(|s| s.to_string()),
            // T.61 is treated as Latin-1
            TAG_TELETEX => Some(content.iter().map(|&b| b as char).collect()),
            TAG_BMP => {
                if content.len() % 2 != 0 {
                    return None;
                }
                let units: Vec<u16> = content
                    .chunks(2)
                    .map(|c| u16::from_be_bytes([c[0], c[1]]))
                    .collect();
                String::from_utf16(&units).ok()
            }
            TAG_UNIVERSAL => {
                if content.len() % 4 != 0 {
                    return None;
                }
                content
                    .chunks(4)
                    .map(|c| char::from_u32(u32::from_be_bytes([c[0], c[1], c[2], c[3]])))
                    .collect()
            }
            _ => None,
        }
    }

    /// Short name for the attribute type if known.
    pub fn attr_name(&self) -> Option<&'static str> {
        match self.oid {
            CN => Some("CN"),
            SERIAL_NUMBER => Some("SERIALNUMBER"),
            COUNTRY_NAME => Some("C"),
            LOCALITY_NAME => Some("L"),
            STATE_OR_PROVINCE_NAME => Some("ST"),
            ORGANIZATION_NAME => Some("O"),
            ORGANIZATIONAL_UNIT_NAME => Some("OU"),
            DOMAIN_COMPONENT => Some("DC"),
            EMAIL_ADDRESS => Some("emailAddress"),
            _ => None,
        }
    }

    /// `oid=value` with the value case-folded and whitespace-compressed.
    /// Values that are not strings are rendered as `#hex` of their DER.
    fn canonical(&self) -> String {
        let mut out = self.oid.to_string();
        out.push('=');
        match self.value_as_str() {
            Some(text) => {
                let folded = fold_value(&text);
                for ch in folded.chars() {
                    if matches!(ch, '\\' | ',' | '+' | '=' | '#') {
                        out.push('\\');
                    }
                    out.push(ch);
                }
            }
            None => {
                out.push('#');
                for b in &self.raw_value {
                    out.push_str(&alloc::format!("{:02x}", b));
                }
            }
        }
        out
    }
}

/// Trim, collapse internal whitespace runs to one space, and lowercase.
fn fold_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for word in value.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.extend(word.chars().flat_map(char::to_lowercase));
    }
    out
}

impl fmt::Display for AttributeTypeAndValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.attr_name() {
            Some(name) => write!(f, "{}=", name)?,
            None => write!(f, "{}=", self.oid)?,
        }
        match self.value_as_str() {
            Some(value) => write!(f, "{}", value),
            None => write!(f, "<binary>"),
        }
    }
}

// ============================================================================
// RelativeDistinguishedName
// ============================================================================

/// RelativeDistinguishedName (RDN) is a SET OF AttributeTypeAndValue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelativeDistinguishedName {
    pub attributes: SetOfVec<AttributeTypeAndValue>,
}

impl RelativeDistinguishedName {
    /// Create a new RDN with a single attribute.
    pub fn new(attr: AttributeTypeAndValue) -> Result<Self, Error> {
        Self::from_attributes(alloc::vec![attr])
    }

    /// Create a new RDN from multiple attributes.
    pub fn from_attributes(attrs: Vec<AttributeTypeAndValue>) -> Result<Self, Error> {
        let mut attributes = SetOfVec::new();
        for attr in attrs {
            attributes.insert(attr)?;
        }
        Ok(Self { attributes })
    }

    fn canonical(&self) -> String {
        let mut parts: Vec<String> = self.attributes.iter().map(|a| a.canonical()).collect();
        parts.sort();
        parts.join("+")
    }
}

impl<'a> DecodeValue<'a> for RelativeDistinguishedName {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: Header) -> der::Result<Self> {
        let attributes = SetOfVec::decode_value(reader, header)?;
        Ok(Self { attributes })
    }
}

impl EncodeValue for RelativeDistinguishedName {
    fn value_len(&self) -> der::Result<Length> {
        self.attributes.value_len()
    }

    fn encode_value(&self, writer: &mut impl Writer) -> der::Result<()> {
        self.attributes.encode_value(writer)
    }
}

impl der::FixedTag for RelativeDistinguishedName {
    const TAG: Tag = Tag::Set;
}

impl fmt::Display for RelativeDistinguishedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let attrs: Vec<String> = self.attributes.iter().map(|a| a.to_string()).collect();
        write!(f, "{}", attrs.join("+"))
    }
}

// ============================================================================
// RDNSequence (Name)
// ============================================================================

/// A distinguished name, RDNs ordered from root to leaf.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RDNSequence {
    pub rdns: Vec<RelativeDistinguishedName>,
}

impl<'a> DecodeValue<'a> for RDNSequence {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: Header) -> der::Result<Self> {
        reader.read_nested(header.length, |reader| {
            let mut rdns = Vec::new();
            while !reader.is_finished() {
                rdns.push(RelativeDistinguishedName::decode(reader)?);
            }
            Ok(Self { rdns })
        })
    }
}

impl EncodeValue for RDNSequence {
    fn value_len(&self) -> der::Result<Length> {
        let mut len = Length::ZERO;
        for rdn in &self.rdns {
            len = (len + rdn.encoded_len()?)?;
        }
        Ok(len)
    }

    fn encode_value(&self, writer: &mut impl Writer) -> der::Result<()> {
        for rdn in &self.rdns {
            rdn.encode(writer)?;
        }
        Ok(())
    }
}

impl der::FixedTag for RDNSequence {
    const TAG: Tag = Tag::Sequence;
}

impl RDNSequence {
    pub fn new() -> Self {
        Self { rdns: Vec::new() }
    }

    pub fn from_rdns(rdns: Vec<RelativeDistinguishedName>) -> Self {
        Self { rdns }
    }

    pub fn push(&mut self, rdn: RelativeDistinguishedName) {
        self.rdns.push(rdn);
    }

    pub fn is_empty(&self) -> bool {
        self.rdns.is_empty()
    }

    /// Find the first attribute with the given OID.
    pub fn find_attr(&self, oid: ObjectIdentifier) -> Option<&AttributeTypeAndValue> {
        self.rdns
            .iter()
            .flat_map(|rdn| rdn.attributes.iter())
            .find(|attr| attr.oid == oid)
    }

    /// Get the Common Name (CN) if present.
    pub fn common_name(&self) -> Option<String> {
        self.find_attr(CN).and_then(|a| a.value_as_str())
    }

    /// Normalized rendering; equal keys mean matching names.
    pub fn canonical_key(&self) -> String {
        let rdns: Vec<String> = self.rdns.iter().map(|r| r.canonical()).collect();
        rdns.join(",")
    }

    /// RFC 5280 name comparison.
    pub fn matches(&self, other: &RDNSequence) -> bool {
        self == other || self.canonical_key() == other.canonical_key()
    }
}

impl fmt::Display for RDNSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rdns: Vec<String> = self.rdns.iter().rev().map(|r| r.to_string()).collect();
        write!(f, "{}", rdns.join(", "))
    }
}

/// Type alias for Name (which is just RDNSequence in practice).
pub type Name = RDNSequence;

/// Build a name from `(oid, value)` pairs, one single-valued RDN each,
/// encoding values as UTF8String.
pub fn name_from_pairs(pairs: &[(ObjectIdentifier, &str)]) -> Result<Name, Error> {
    let mut name = Name::new();
    for (oid, value) in pairs {
        name.push(RelativeDistinguishedName::new(
            AttributeTypeAndValue::new_utf8(*oid, value)?,
        )?);
    }
    Ok(name)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn single(attr: AttributeTypeAndValue) -> Name {
        Name::from_rdns(alloc::vec![RelativeDistinguishedName::new(attr).unwrap()])
    }

    #[test]
    fn test_attribute_display() {
        let attr = AttributeTypeAndValue::new_utf8(CN, "Example Corp").unwrap();
        assert_eq!(attr.value_as_str().unwrap(), "Example Corp");
        assert_eq!(attr.attr_name(), Some("CN"));
        assert_eq!(attr.to_string(), "CN=Example Corp");
    }

    #[test]
    fn test_name_display_is_leaf_first() {
        let name = name_from_pairs(&[
            (COUNTRY_NAME, "US"),
            (ORGANIZATION_NAME, "Example Inc"),
            (CN, "John Doe"),
        ])
        .unwrap();
        assert_eq!(name.to_string(), "CN=John Doe, O=Example Inc, C=US");
        assert_eq!(name.common_name().unwrap(), "John Doe");
    }

    #[test]
    fn test_matching_ignores_case_and_whitespace() {
        let a = single(AttributeTypeAndValue::new_utf8(CN, "Example  Root CA").unwrap());
        let b = single(AttributeTypeAndValue::new_utf8(CN, " example root ca ").unwrap());
        assert_ne!(a, b);
        assert!(a.matches(&b));
        assert_eq!(a.canonical_key(), b.canonical_key());
    }

    #[test]
    fn test_matching_ignores_string_type() {
        let utf8 = single(AttributeTypeAndValue::new_utf8(CN, "Root").unwrap());
        let printable = single(AttributeTypeAndValue::new_printable(CN, "Root").unwrap());
        assert!(utf8.matches(&printable));
    }

    #[test]
    fn test_matching_respects_order_and_type() {
        let a = name_from_pairs(&[(ORGANIZATION_NAME, "X"), (CN, "Y")]).unwrap();
        let b = name_from_pairs(&[(CN, "Y"), (ORGANIZATION_NAME, "X")]).unwrap();
        assert!(!a.matches(&b));

        let c = name_from_pairs(&[(ORGANIZATION_NAME, "Y")]).unwrap();
        let d = name_from_pairs(&[(CN, "Y")]).unwrap();
        assert!(!c.matches(&d));
    }

    #[test]
    fn test_escaping_keeps_keys_distinct() {
        let joined = name_from_pairs(&[(CN, "a,2.5.4.3=b")]).unwrap();
        let split = name_from_pairs(&[(CN, "a"), (CN, "b")]).unwrap();
        assert_ne!(joined.canonical_key(), split.canonical_key());
    }

    #[test]
    fn test_encode_decode_rdn_sequence() {
        let name = name_from_pairs(&[(CN, "Test User"), (ORGANIZATION_NAME, "Test Org")]).unwrap();
        let der = name.to_der().unwrap();
        let decoded = RDNSequence::from_der(&der).unwrap();
        assert_eq!(name, decoded);
    }

    #[test]
    fn test_universal_string_value() {
        // UniversalString "AB"
        let attr = AttributeTypeAndValue {
            oid: CN,
            raw_value: alloc::vec![0x1C, 0x08, 0, 0, 0, 0x41, 0, 0, 0, 0x42],
        };
        assert_eq!(attr.value_as_str().unwrap(), "AB");
        let as_utf8 = AttributeTypeAndValue::new_utf8(CN, "ab").unwrap();
        assert!(single(attr).matches(&single(as_utf8)));
    }
}
