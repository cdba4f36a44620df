// Copyright 2025 the PK Tools Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Built-in backends.

mod flatvec;
#[cfg(feature = "backend_rtree")]
mod rtree;

pub use flatvec::FlatVec;
#[cfg(feature = "backend_rtree")]
pub use rtree::RTreeBackend;
