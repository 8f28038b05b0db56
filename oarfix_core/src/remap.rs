use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::OarfixError;
use crate::OarfixResult;
use crate::form_id::FormId;

/// Default merge map file name, relative to the project root.
pub const DEFAULT_MERGE_MAP: &str = "merge-map.json";

/// On-disk representation of a merge map.
///
/// ```json
/// {
///   "plugins": { "foo.esp": "merged.esp" },
///   "formIds": { "foo.esp": { "00001A": "2B" } }
/// }
/// ```
///
/// `plugins` maps each merged-away plugin to the plugin that absorbed it.
/// `formIds` is keyed by the *original* plugin name and maps old FormIDs to
/// their renumbered values. FormID keys may be written with or without
/// zero-padding; they are canonicalized on load.
#[derive(Debug, Default, Deserialize)]
pub struct MergeMap {
	#[serde(default)]
	pub plugins: HashMap<String, String>,
	#[serde(default, rename = "formIds")]
	pub form_ids: HashMap<String, HashMap<String, String>>,
}

/// The read-only remap table consumed by the rewrite engine.
///
/// Built once per run, then shared immutably — the engine never mutates it,
/// so `&RemapTable` can be handed to any number of per-file rewrites (or
/// threads) without synchronization.
#[derive(Debug, Default, Clone)]
pub struct RemapTable {
	/// Original plugin name → merged plugin name. Case-sensitive, exact.
	plugins: HashMap<String, String>,
	/// Original plugin name → (canonical FormID → replacement hex value).
	/// Replacement values are stored verbatim and validated at use time, so
	/// a corrupt value surfaces from the engine as a hard error.
	form_ids: HashMap<String, HashMap<String, String>>,
}

impl RemapTable {
	/// Read and parse a merge map file, then build the table from it.
	pub fn load(path: &Path) -> OarfixResult<Self> {
		let content = std::fs::read_to_string(path)?;
		let map: MergeMap =
			serde_json::from_str(&content).map_err(|e| {
				OarfixError::MergeMapParse {
					path: path.display().to_string(),
					reason: e.to_string(),
				}
			})?;
		Self::from_merge_map(map)
	}

	/// Build the table from a parsed [`MergeMap`], canonicalizing FormID
	/// keys. A key that is not valid hex, or two keys that collapse to the
	/// same canonical FormID, are load errors.
	pub fn from_merge_map(map: MergeMap) -> OarfixResult<Self> {
		let mut table = Self {
			plugins: map.plugins,
			form_ids: HashMap::new(),
		};

		for (plugin, mappings) in map.form_ids {
			for (key, value) in mappings {
				table.insert_form_id(&plugin, &key, value)?;
			}
		}

		tracing::debug!(
			plugins = table.plugins.len(),
			form_id_tables = table.form_ids.len(),
			"remap table built"
		);
		Ok(table)
	}

	/// Insert a plugin mapping. Later inserts overwrite earlier ones.
	pub fn insert_plugin(&mut self, original: impl Into<String>, merged: impl Into<String>) {
		self.plugins.insert(original.into(), merged.into());
	}

	/// Insert a FormID mapping under `plugin`, canonicalizing the key.
	pub fn insert_form_id(
		&mut self,
		plugin: &str,
		key: &str,
		value: impl Into<String>,
	) -> OarfixResult<()> {
		let Some(form_id) = FormId::parse(key) else {
			return Err(OarfixError::InvalidFormIdKey {
				plugin: plugin.to_string(),
				key: key.to_string(),
			});
		};

		let canonical = form_id.canonical();
		let mappings = self.form_ids.entry(plugin.to_string()).or_default();
		if mappings.contains_key(&canonical) {
			return Err(OarfixError::DuplicateFormId {
				plugin: plugin.to_string(),
				form_id: canonical,
			});
		}
		mappings.insert(canonical, value.into());

		Ok(())
	}

	/// Look up the merged replacement for a plugin name. Exact,
	/// case-sensitive match.
	pub fn lookup_plugin(&self, name: &str) -> Option<&str> {
		self.plugins.get(name).map(String::as_str)
	}

	/// Look up the replacement FormID for `plugin`, keyed by the canonical
	/// six-digit form. The plugin key is the *original* name, not the merged
	/// one.
	pub fn lookup_form_id(&self, plugin: &str, canonical: &str) -> Option<&str> {
		self.form_ids
			.get(plugin)
			.and_then(|mappings| mappings.get(canonical))
			.map(String::as_str)
	}

	/// Whether `plugin` has any FormID mappings at all. When it does not,
	/// the engine skips the FormID lookahead entirely.
	pub fn has_form_ids(&self, plugin: &str) -> bool {
		self.form_ids.contains_key(plugin)
	}

	/// Number of plugin mappings.
	pub fn plugin_count(&self) -> usize {
		self.plugins.len()
	}

	/// True when the table contains no plugin mappings.
	pub fn is_empty(&self) -> bool {
		self.plugins.is_empty()
	}

	/// Iterate over plugin mappings (original → merged), unordered.
	pub fn plugins(&self) -> impl Iterator<Item = (&str, &str)> {
		self.plugins
			.iter()
			.map(|(original, merged)| (original.as_str(), merged.as_str()))
	}
}
