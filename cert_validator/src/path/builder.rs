// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Depth-first path building over an unordered certificate pool.

extern crate alloc;

use alloc::format;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;

use crate::certificate::Certificate;
use crate::error::{Error, ErrorKind, Result};
use crate::path::{BuiltPath, PathBuilder, PathParameters, PathValidator};

/// Searches issuer-by-name from the target towards any trust anchor,
/// handing each candidate path to a [`PathValidator`].
///
/// Every candidate is fully validated, so the first path returned is a
/// valid one. Pool certificates are used at most once per path. The search
/// is bounded by a [`Budget`]; running out fails with `PathBuildingFailed`.
#[derive(Clone)]
pub struct DfsPathBuilder {
    validator: Arc<dyn PathValidator>,
    budget: Budget,
}

impl core::fmt::Debug for DfsPathBuilder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DfsPathBuilder")
            .field("budget", &self.budget)
            .finish_non_exhaustive()
    }
}

/// Work limits for one `build` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budget {
    /// Candidate paths handed to the path validator
    pub validations: usize,
    /// Search nodes visited
    pub build_calls: usize,
}

impl Budget {
    fn consume_validation(&mut self, target: &Certificate) -> Result<()> {
        self.validations = self
            .validations
            .checked_sub(1)
            .ok_or_else(|| exhausted(target, "maximum path validations exceeded"))?;
        Ok(())
    }

    fn consume_build_call(&mut self, target: &Certificate) -> Result<()> {
        self.build_calls = self
            .build_calls
            .checked_sub(1)
            .ok_or_else(|| exhausted(target, "maximum path build calls exceeded"))?;
        Ok(())
    }
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            validations: 100,
            build_calls: 200_000,
        }
    }
}

fn exhausted(target: &Certificate, msg: &str) -> Error {
    log::error!("dfs: {} building from {}", msg, target.subject());
    Error::validation_for(ErrorKind::PathBuildingFailed, msg, target)
}

struct Search<'a> {
    pool: &'a [Certificate],
    params: &'a PathParameters,
    validator: &'a dyn PathValidator,
    budget: Budget,
    used: Vec<bool>,
    path: Vec<Certificate>,
    last_err: Option<Error>,
}

impl Search<'_> {
    /// `Ok(None)` backtracks, `Err` aborts the whole search.
    fn extend(&mut self) -> Result<Option<Certificate>> {
        let current = match self.path.last() {
            Some(cert) => cert.clone(),
            None => return Ok(None),
        };
        self.budget.consume_build_call(&self.path[0])?;

        if self.params.anchors().has_subject(current.issuer()) {
            self.budget.consume_validation(&self.path[0])?;
            match self.validator.validate(&self.path, self.params) {
                Ok(anchor) => return Ok(Some(anchor)),
                Err(e) => {
                    log::debug!("dfs: candidate of length {} rejected: {}", self.path.len(), e);
                    self.last_err = Some(e);
                }
            }
        }

        if self.path.len() >= self.params.max_path_length() {
            return Ok(None);
        }

        for idx in 0..self.pool.len() {
            if self.used[idx] {
                continue;
            }
            let candidate = &self.pool[idx];
            if !candidate.subject().matches(current.issuer()) || *candidate == current {
                continue;
            }

            self.used[idx] = true;
            self.path.push(candidate.clone());
            if let Some(anchor) = self.extend()? {
                return Ok(Some(anchor));
            }
            self.path.pop();
            self.used[idx] = false;
        }
        Ok(None)
    }
}

impl DfsPathBuilder {
    pub fn new(validator: Arc<dyn PathValidator>) -> Self {
        Self {
            validator,
            budget: Budget::default(),
        }
    }

    pub fn with_budget(mut self, budget: Budget) -> Self {
        self.budget = budget;
        self
    }
}

impl PathBuilder for DfsPathBuilder {
    fn build(
        &self,
        target: &Certificate,
        pool: &[Certificate],
        params: &PathParameters,
    ) -> Result<BuiltPath> {
        let mut search = Search {
            pool,
            params,
            validator: self.validator.as_ref(),
            budget: self.budget,
            used: vec![false; pool.len()],
            path: vec![target.clone()],
            last_err: None,
        };

        match search.extend()? {
            Some(anchor) => {
                log::trace!("dfs: built path of length {}", search.path.len());
                Ok(BuiltPath {
                    path: search.path,
                    anchor,
                })
            }
            None => Err(search.last_err.unwrap_or_else(|| {
                Error::validation_for(
                    ErrorKind::NoTrustAnchor,
                    format!("no path from {} to a trust anchor", target.subject()),
                    target,
                )
            })),
        }
    }

    fn checks_critical_extensions(&self) -> bool {
        self.validator.checks_critical_extensions()
    }
}
