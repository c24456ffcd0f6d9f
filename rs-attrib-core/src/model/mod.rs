//! Top-level module for the speaker attribution system.
//!
//! This module provides a character-level attribution pipeline, including:
//! - k-order Markov models over character sequences (`CharModel`)
//! - Log-probability scoring of candidate passages
//! - A two-way identification rule (`identify_speaker`)

/// Character-level k-order Markov model.
///
/// Accumulates per-context transition counts during construction and
/// scores passages with add-one smoothed log-probabilities.
pub mod char_model;

/// Two-way speaker identification.
///
/// Builds one model per reference text and compares length-normalized
/// log-probabilities of the unknown passage.
pub mod identifier;
