// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Resolved certificate chains.

extern crate alloc;

use alloc::vec::Vec;

use crate::certificate::Certificate;

/// A validated chain, leaf first and trust anchor last.
///
/// May be shorter than the chain submitted for validation when a trusted
/// certificate was found part way up, and a single certificate when the
/// leaf itself is trusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateChain {
    pub certificates: Vec<Certificate>,
}

impl CertificateChain {
    pub fn new(certificates: Vec<Certificate>) -> Self {
        Self { certificates }
    }

    pub fn leaf(&self) -> Option<&Certificate> {
        self.certificates.first()
    }

    /// The trust anchor the chain ends at
    pub fn root(&self) -> Option<&Certificate> {
        self.certificates.last()
    }

    /// Whether the leaf is itself the anchor.
    pub fn is_trusted_leaf(&self) -> bool {
        self.certificates.len() == 1
    }

    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Certificate> {
        self.certificates.iter()
    }

    pub fn into_vec(self) -> Vec<Certificate> {
        self.certificates
    }
}

impl IntoIterator for CertificateChain {
    type Item = Certificate;
    type IntoIter = alloc::vec::IntoIter<Certificate>;

    fn into_iter(self) -> Self::IntoIter {
        self.certificates.into_iter()
    }
}

impl<'a> IntoIterator for &'a CertificateChain {
    type Item = &'a Certificate;
    type IntoIter = core::slice::Iter<'a, Certificate>;

    fn into_iter(self) -> Self::IntoIter {
        self.certificates.iter()
    }
}
