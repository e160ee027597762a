//! `hearth-family` – The Household Graph.
//!
//! Holds the fixed set of family members and answers the structural
//! questions the presentation layer asks about them.
//!
//! # Modules
//!
//! - [`graph`] – [`FamilyGraph`][graph::FamilyGraph]: insertion-ordered
//!   member registry with spouse, children and parent lookups, plus an
//!   opt-in relationship audit.
//! - [`household`] – [`sample_family`][household::sample_family]: the
//!   hand-seeded three-generation household.

pub mod graph;
pub mod household;

pub use graph::{FamilyGraph, IntegrityIssue};
pub use household::sample_family;
