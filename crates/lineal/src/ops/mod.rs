//! Representation-aware operation kernels.
//!
//! [`Matrix`](crate::Matrix) validates shapes and resolves result
//! representations, then delegates here. Each kernel matches on the
//! operands' storage variants to pick a fast path and falls back to a
//! generic index-based implementation for the remaining combinations, so
//! every pairing of representations is defined.
//!
//! Kernels never write a partial result into a caller-visible container:
//! they compute into fresh buffers and move them in at the end.

pub mod arithmetic;
pub mod convert;
pub mod multiply;
pub mod norm;
pub mod pointwise;
pub mod power;
pub mod triangular;
