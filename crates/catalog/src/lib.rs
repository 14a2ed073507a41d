//! Skill catalog: discovery, indexing, and state reconciliation.
//!
//! Skills are directories containing a `SKILL.md` file (three case variants
//! accepted) with YAML frontmatter. Configured repositories are cloned into a
//! local library, scanned for skills under one of several layout conventions,
//! and merged into a single persisted index. At read time the index is
//! reconciled with favorites and the installed set to produce the view
//! consumed by the operations boundary.

pub mod build;
pub mod favorites;
pub mod index;
pub mod installed;
pub mod locate;
pub mod parse;
pub mod reconcile;
pub mod settings;
pub mod sources;
pub mod sync;
pub mod types;
