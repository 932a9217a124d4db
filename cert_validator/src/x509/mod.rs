// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! X.509 extensions, object identifiers, algorithm constraints and the
//! per-certificate checks shared by both chain algorithms.

pub mod constraints;
pub mod extensions;
pub mod oids;
pub mod verify;

pub use constraints::{AlgorithmConstraints, DefaultAlgorithmConstraints, SharedConstraints};
pub use extensions::*;
pub use verify::{check_signature_algorithm, check_validity, verify_signed_by};
