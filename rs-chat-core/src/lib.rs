//! Graph-based toy sentence generation library.
//!
//! This crate builds a directed word-transition graph from a small
//! role-tagged vocabulary and synthesizes replies by walking that graph:
//! - Vocabulary ingestion from `text,frequency,role` lexicon records
//! - Graph assembly driven by a fixed catalog of sentence templates
//! - Prompt-driven frequency boosting with an exact revert
//! - Greedy best-scoring traversal with deterministic hash variation
//!
//! Only the high-level API is meant for embedding; the word, dictionary
//! and graph modules stay public for inspection and tests.

/// Core vocabulary model and generation logic.
///
/// This module exposes the generator interface together with the data
/// model it operates on (words, role groups, the transition graph).
pub mod model;

/// I/O utilities (file loading, path helpers).
///
/// Public because the server binary lists and names lexicon files
/// through it.
pub mod io;
