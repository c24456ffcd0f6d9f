//! Character-level Markov models for speaker attribution.
//!
//! This crate provides a small statistical attribution system including:
//! - An open-addressing associative table with lazy tombstone deletion
//! - Character-level k-order Markov models with log-probability scoring
//! - A two-way speaker identification comparison
//!
//! Only the high-level API is exposed publicly. The table is public as well,
//! since it is part of the documented programmatic surface.

/// Markov models and the speaker identification entry point.
///
/// This module exposes the model construction and scoring interface
/// together with the two-way comparison rule.
pub mod model;

/// Open-addressing associative table used as the storage substrate.
///
/// Grows automatically past a load factor of 0.5 and removes entries
/// lazily through tombstones.
pub mod table;

/// I/O utilities (whole-file text loading).
///
/// Used by thin drivers feeding reference and query texts into the core.
pub mod io;
