// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Explicitly untrusted certificates, by SHA-256 fingerprint.
//!
//! Text form: one hex fingerprint per line or comma separated. Case is
//! ignored, `:` separators are allowed and `#` starts a comment.

extern crate alloc;

use alloc::collections::BTreeSet;
use alloc::format;
use alloc::string::String;

use crate::certificate::Certificate;
use crate::error::{Error, ErrorKind, ParseError, Result, ValidatorError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blocklist {
    fingerprints: BTreeSet<[u8; 32]>,
}

impl Blocklist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut list = Blocklist::new();
        for line in text.lines() {
            let line = line.split('#').next().unwrap_or("");
            for item in line.split(',') {
                let item = item.trim();
                if item.is_empty() {
                    continue;
                }
                list.fingerprints.insert(parse_fingerprint(item)?);
            }
        }
        Ok(list)
    }

    pub fn insert(&mut self, fingerprint: [u8; 32]) {
        self.fingerprints.insert(fingerprint);
    }

    pub fn is_empty(&self) -> bool {
        self.fingerprints.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fingerprints.len()
    }

    pub fn contains(&self, fingerprint: &[u8; 32]) -> bool {
        self.fingerprints.contains(fingerprint)
    }

    /// Fail if `cert` is listed. Nothing is hashed when the list is empty.
    pub fn check(&self, cert: &Certificate) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        let fp = cert.fingerprint_sha256().map_err(|e| {
            Error::Validation(
                ValidatorError::new(
                    ErrorKind::FingerprintUnavailable,
                    "cannot fingerprint certificate for blocklist check",
                )
                .with_certificate(cert)
                .with_cause(e),
            )
        })?;
        if self.contains(&fp) {
            log::error!("Certificate {} is on the blocklist", cert.subject());
            return Err(Error::validation_for(
                ErrorKind::UntrustedCertificate,
                "certificate is explicitly untrusted",
                cert,
            ));
        }
        Ok(())
    }
}

/// Decode a 64-digit hex SHA-256 fingerprint, `:` separators allowed.
pub fn parse_fingerprint(text: &str) -> Result<[u8; 32]> {
    let invalid = || Error::ParseError(ParseError::InvalidFingerprint(String::from(text)));

    let digits: String = text.chars().filter(|c| *c != ':').collect();
    if digits.len() != 64 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let mut out = [0u8; 32];
    for (i, byte) in out.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&digits[2 * i..2 * i + 2], 16).map_err(|_| invalid())?;
    }
    Ok(out)
}

/// Upper-case hex rendering of a fingerprint.
pub fn fingerprint_hex(fp: &[u8; 32]) -> String {
    fp.iter().map(|b| format!("{:02X}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FP: &str = "FF856A2D251DCD88D36656F450126798CFABAADE40799C722DE4D2B5DB36A73A";

    #[test]
    fn test_parse_fingerprint_forms() {
        let plain = parse_fingerprint(FP).unwrap();
        assert_eq!(plain[0], 0xFF);
        assert_eq!(plain[31], 0x3A);

        let lower = parse_fingerprint(&FP.to_ascii_lowercase()).unwrap();
        assert_eq!(lower, plain);

        let colons: String = FP
            .as_bytes()
            .chunks(2)
            .map(|c| core::str::from_utf8(c).unwrap())
            .collect::<alloc::vec::Vec<_>>()
            .join(":");
        assert_eq!(parse_fingerprint(&colons).unwrap(), plain);
        assert_eq!(fingerprint_hex(&plain), FP);
    }

    #[test]
    fn test_parse_fingerprint_rejects_garbage() {
        assert!(parse_fingerprint("abcd").is_err());
        assert!(parse_fingerprint(&FP.replace('F', "G")).is_err());
    }

    #[test]
    fn test_parse_list() {
        let text = alloc::format!("# untrusted\n{},\n\n{}  # dup\n", FP, FP.to_lowercase());
        let list = Blocklist::parse(&text).unwrap();
        assert_eq!(list.len(), 1);
        assert!(Blocklist::parse("").unwrap().is_empty());
        assert!(Blocklist::parse("nothex").is_err());
    }

    #[cfg(feature = "ring-backend")]
    #[test]
    fn test_check_hit() {
        use crate::test_util::CertBuilder;

        let cert = CertBuilder::leaf("Blocked").self_signed();
        let other = CertBuilder::leaf("Fine").self_signed();
        let mut list = Blocklist::new();
        assert!(list.check(&cert).is_ok());

        list.insert(cert.fingerprint_sha256().unwrap());
        let err = list.check(&cert).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::UntrustedCertificate));
        assert!(err.certificate().is_some());
        assert!(list.check(&other).is_ok());
    }
}
