// SPDX-License-Identifier: PMPL-1.0-or-later

//! transcat — Qt Linguist translation catalog loader and resolver.
//!
//! Loads `.ts` catalogs into an immutable in-memory model and resolves
//! (context, source, disambiguation, count) lookups into locale-specific
//! strings, selecting plural forms via locale-dependent cardinal rules.
//!
//! PILLARS:
//! 1. **ts**: TS XML loading with forward-compatible element skipping.
//! 2. **resolver**: never-fails lookup — missing or unfinished entries
//!    degrade to the source text, plural lookups fail over to the last
//!    category, and degradations are reported through an observer hook.
//! 3. **report**: translator QA — placeholder cardinality validation and
//!    coverage rollups, serializable for tooling.

pub mod placeholder;
pub mod plural;
pub mod report;
pub mod resolver;
pub mod ts;
pub mod types;
