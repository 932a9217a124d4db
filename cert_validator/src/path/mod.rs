// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Path validation collaborators.
//!
//! The trust-anchor-aware validator does not walk chains itself. It prepares
//! [`PathParameters`] and hands a chain to a [`PathValidator`] when the
//! chain is already ordered and anchored, or to a [`PathBuilder`] when a
//! path has to be searched for. Revocation status is delegated to a
//! [`RevocationChecker`].

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::anchors::TrustAnchors;
use crate::certificate::Certificate;
use crate::error::Result;
use crate::time::Time;
use crate::validator::Variant;
use crate::x509::constraints::SharedConstraints;

pub mod builder;
pub mod validator;

pub use builder::{Budget, DfsPathBuilder};
pub use validator::PkixPathValidator;

/// Checks a chain that is known to be ordered leaf first and to end just
/// below a trust anchor.
pub trait PathValidator: Send + Sync {
    /// Validate `path` (which excludes the anchor) and return the anchor
    /// it chains to.
    fn validate(&self, path: &[Certificate], params: &PathParameters) -> Result<Certificate>;

    /// Whether every critical extension of every certificate, the leaf
    /// included, is rejected unless recognized.
    fn checks_critical_extensions(&self) -> bool;
}

/// A path found by a [`PathBuilder`].
#[derive(Debug, Clone)]
pub struct BuiltPath {
    /// Leaf first, anchor excluded
    pub path: Vec<Certificate>,
    pub anchor: Certificate,
}

impl BuiltPath {
    /// The path followed by its anchor.
    pub fn into_chain(self) -> Vec<Certificate> {
        let mut chain = self.path;
        chain.push(self.anchor);
        chain
    }
}

/// Searches a certificate pool for a valid path from `target` to an anchor.
pub trait PathBuilder: Send + Sync {
    fn build(
        &self,
        target: &Certificate,
        pool: &[Certificate],
        params: &PathParameters,
    ) -> Result<BuiltPath>;

    fn checks_critical_extensions(&self) -> bool;
}

/// Revocation status of one certificate.
pub trait RevocationChecker: Send + Sync {
    /// `stapled` is out-of-band evidence supplied with the chain, if any.
    fn check(
        &self,
        cert: &Certificate,
        issuer: &Certificate,
        stapled: Option<&[u8]>,
        at: &Time,
    ) -> Result<()>;
}

/// Base configuration of a path validation.
///
/// A validator keeps one instance and clones it per call before adding the
/// per-call constraints and stapled evidence.
#[derive(Clone)]
pub struct PathParameters {
    anchors: Arc<TrustAnchors>,
    variant: Variant,
    date: Option<Time>,
    revocation_enabled: bool,
    revocation_checker: Option<Arc<dyn RevocationChecker>>,
    stapled_responses: BTreeMap<Vec<u8>, Vec<u8>>,
    algorithm_constraints: Vec<SharedConstraints>,
    max_path_length: usize,
}

impl PathParameters {
    pub fn new(anchors: Arc<TrustAnchors>, variant: Variant) -> Self {
        Self {
            anchors,
            variant,
            date: None,
            revocation_enabled: false,
            revocation_checker: None,
            stapled_responses: BTreeMap::new(),
            algorithm_constraints: Vec::new(),
            max_path_length: crate::config::DEFAULT_MAX_CHAIN_DEPTH,
        }
    }

    pub fn with_date(mut self, date: Time) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_revocation_enabled(mut self, enabled: bool) -> Self {
        self.revocation_enabled = enabled;
        self
    }

    pub fn with_revocation_checker(mut self, checker: Arc<dyn RevocationChecker>) -> Self {
        self.revocation_checker = Some(checker);
        self
    }

    pub fn with_max_path_length(mut self, max: usize) -> Self {
        self.max_path_length = max;
        self
    }

    pub fn with_constraints(mut self, constraints: SharedConstraints) -> Self {
        self.add_constraints(constraints);
        self
    }

    /// Stapled evidence for `cert`, unless some is already recorded.
    pub fn with_stapled_response(mut self, cert: &Certificate, response: Vec<u8>) -> Result<Self> {
        self.attach_stapled_response(cert, response)?;
        Ok(self)
    }

    pub fn set_date(&mut self, date: Time) {
        self.date = Some(date);
    }

    pub fn add_constraints(&mut self, constraints: SharedConstraints) {
        self.algorithm_constraints.push(constraints);
    }

    /// Record `response` for `cert`. Existing evidence is never replaced.
    pub fn attach_stapled_response(&mut self, cert: &Certificate, response: Vec<u8>) -> Result<()> {
        self.stapled_responses
            .entry(cert.to_der()?)
            .or_insert(response);
        Ok(())
    }

    pub fn anchors(&self) -> &TrustAnchors {
        &self.anchors
    }

    pub fn shared_anchors(&self) -> Arc<TrustAnchors> {
        self.anchors.clone()
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn date(&self) -> Option<&Time> {
        self.date.as_ref()
    }

    pub fn revocation_enabled(&self) -> bool {
        self.revocation_enabled
    }

    pub fn revocation_checker(&self) -> Option<&Arc<dyn RevocationChecker>> {
        self.revocation_checker.as_ref()
    }

    pub fn stapled_response(&self, cert: &Certificate) -> Option<&[u8]> {
        let der = cert.to_der().ok()?;
        self.stapled_responses.get(&der).map(|v| v.as_slice())
    }

    pub fn stapled_count(&self) -> usize {
        self.stapled_responses.len()
    }

    pub fn algorithm_constraints(&self) -> &[SharedConstraints] {
        &self.algorithm_constraints
    }

    pub fn max_path_length(&self) -> usize {
        self.max_path_length
    }
}

impl fmt::Debug for PathParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathParameters")
            .field("anchors", &self.anchors.len())
            .field("variant", &self.variant)
            .field("date", &self.date)
            .field("revocation_enabled", &self.revocation_enabled)
            .field("revocation_checker", &self.revocation_checker.is_some())
            .field("stapled_responses", &self.stapled_responses.len())
            .field("algorithm_constraints", &self.algorithm_constraints.len())
            .field("max_path_length", &self.max_path_length)
            .finish()
    }
}
