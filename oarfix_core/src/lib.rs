//! `oarfix_core` is the core library for the [oarfix](https://github.com/oarfix/oarfix)
//! conditions fixer. After a Skyrim plugin merge, Open Animation Replacer /
//! Dynamic Animation Replacer conditions files still reference the
//! merged-away `.esp` plugins and their old FormIDs; this crate locates
//! those references and rewrites them against a merge map, preserving every
//! other byte of the file exactly.
//!
//! ## Processing Pipeline
//!
//! ```text
//! merge-map.json
//!   → RemapTable (plugin → merged plugin, plugin → FormID remappings)
//!
//! conditions file (config.json)
//!   → Scanner (walks the input tree, collects candidate files)
//!   → Rewrite engine (per-line scan, plugin substitution, FormID lookahead)
//!   → Rewrite (changed flag + output lines + per-line substitutions)
//! ```
//!
//! The rewrite engine is deliberately *not* a JSON parser: conditions files
//! are consumed as raw text so that formatting survives untouched. It scans
//! line by line for a quoted literal ending in `.esp`, substitutes it when
//! the merge map knows the plugin, and — only then — consumes the next line
//! looking for the dependent `"formID"` field to remap.
//!
//! ## Key Types
//!
//! - [`RemapTable`] — the read-only plugin / FormID remapping, built from a
//!   merge map file.
//! - [`Rewrite`] — the outcome of rewriting one document: changed flag,
//!   output lines, and per-line [`Substitution`] diagnostics.
//! - [`FormId`] — a plugin-local FormID with canonical (six-digit) and
//!   compact hex renderings.
//! - [`OarfixConfig`] — configuration loaded from `oarfix.toml`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use oarfix_core::RemapTable;
//! use oarfix_core::rewrite_content;
//!
//! # fn main() -> oarfix_core::OarfixResult<()> {
//! let table = RemapTable::load(Path::new("merge-map.json"))?;
//! let content = std::fs::read_to_string("config.json")?;
//! let rewrite = rewrite_content(&content, &table)?;
//! if rewrite.changed {
//! 	std::fs::write("patched/config.json", rewrite.lines.join("\n"))?;
//! }
//! # Ok(())
//! # }
//! ```

pub use config::*;
pub use error::*;
pub use form_id::*;
pub use remap::*;
pub use rewrite::*;
pub use scanner::*;

pub mod config;
mod error;
mod form_id;
pub mod remap;
mod rewrite;
pub mod scanner;
