//! Top-level module for the sentence generation system.
//!
//! The pipeline is load → build → (per exchange) boost → generate → reset:
//! - Role-tagged vocabulary entries (`Word`, `WordRole`)
//! - Role-grouped vocabulary parsed from lexicon files (`Dictionary`)
//! - The directed transition graph and its template catalog (`WordGraph`)
//! - Prompt analysis and greedy sentence synthesis (`Generator`)

/// Vocabulary entries and their grammatical roles.
///
/// Word identity is the surface text alone; role and frequency are
/// payload. Edge deduplication and canonical lookup rely on this.
pub mod word;

/// Role-grouped vocabulary loader.
///
/// Parses `text,frequency,role` records with a strict abort-on-error
/// policy, caches parsed lexicons in binary form, and preserves record
/// order within each role group.
pub mod dictionary;

/// Directed word-transition graph and the sentence template catalog.
///
/// Built once per vocabulary; after that only entry frequencies mutate
/// (the boost/reset cycle). Edges are build-time snapshots.
pub mod graph;

/// High-level interface for generating replies.
///
/// Tokenizes prompts, applies and reverts frequency boosts, and walks
/// the graph greedily along one template per reply.
pub mod generator;
