// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Trust anchor set.
//!
//! The set is immutable once built. Two indexes are derived at construction:
//! the DER encodings for membership tests, and a multimap from canonical
//! subject name to every anchor carrying that subject (re-issued anchors
//! share a name but not a key).

extern crate alloc;

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::String;
use alloc::vec::Vec;

use crate::certificate::name::Name;
use crate::certificate::Certificate;
use crate::error::Result;

#[derive(Debug, Clone, Default)]
pub struct TrustAnchors {
    certs: Vec<Certificate>,
    encodings: BTreeSet<Vec<u8>>,
    by_subject: BTreeMap<String, Vec<usize>>,
}

impl TrustAnchors {
    /// Build the set and its indexes. Duplicate encodings are kept once.
    pub fn new(certs: Vec<Certificate>) -> Result<Self> {
        let mut anchors = TrustAnchors::default();
        for cert in certs {
            let der = cert.to_der()?;
            if !anchors.encodings.insert(der) {
                log::debug!("Skipping duplicate trust anchor {}", cert.subject());
                continue;
            }
            anchors
                .by_subject
                .entry(cert.subject().canonical_key())
                .or_default()
                .push(anchors.certs.len());
            anchors.certs.push(cert);
        }
        log::trace!("Loaded {} trust anchors", anchors.certs.len());
        Ok(anchors)
    }

    /// Load every certificate of a PEM bundle as an anchor.
    pub fn from_pem_bundle(bundle: &str) -> Result<Self> {
        Self::new(Certificate::from_pem_bundle(bundle)?)
    }

    /// Exact (encoding) membership.
    pub fn contains(&self, cert: &Certificate) -> bool {
        match cert.to_der() {
            Ok(der) => self.encodings.contains(&der),
            Err(_) => false,
        }
    }

    /// Anchors whose subject matches `name`, in load order.
    pub fn find_by_subject(&self, name: &Name) -> Vec<&Certificate> {
        self.by_subject
            .get(&name.canonical_key())
            .map(|idxs| idxs.iter().map(|&i| &self.certs[i]).collect())
            .unwrap_or_default()
    }

    pub fn has_subject(&self, name: &Name) -> bool {
        self.by_subject.contains_key(&name.canonical_key())
    }

    /// The anchor `cert` stands for, if any.
    ///
    /// Either `cert` itself, or an anchor with the same subject, issuer and
    /// public key (a re-issued anchor, e.g. with a stronger signature).
    pub fn trusted_match(&self, cert: &Certificate) -> Option<&Certificate> {
        if self.contains(cert) {
            return self.find_by_subject(cert.subject()).into_iter().find(|a| *a == cert);
        }
        self.find_by_subject(cert.subject())
            .into_iter()
            .find(|a| a.issuer().matches(cert.issuer()) && a.same_public_key(cert))
    }

    /// Some anchor shares `cert`'s subject and public key.
    pub fn has_subject_key(&self, cert: &Certificate) -> bool {
        self.find_by_subject(cert.subject())
            .iter()
            .any(|a| a.same_public_key(cert))
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Certificate> {
        self.certs.iter()
    }

    pub fn len(&self) -> usize {
        self.certs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.certs.is_empty()
    }
}
