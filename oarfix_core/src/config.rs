use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::OarfixError;
use crate::OarfixResult;
use crate::remap::DEFAULT_MERGE_MAP;

/// Default maximum file size in bytes (10 MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["oarfix.toml", ".oarfix.toml", ".config/oarfix.toml"];

/// Configuration loaded from an `oarfix.toml` file.
///
/// ```toml
/// merge_map = "merge-map.json"
/// output = "patched"
///
/// [files]
/// patterns = ["**/config.json"]
///
/// [exclude]
/// patterns = ["backup/", "*.orig"]
///
/// disable_gitignore = false
/// ```
#[derive(Debug, Deserialize)]
pub struct OarfixConfig {
	/// Path to the merge map JSON file, relative to the project root.
	#[serde(default = "default_merge_map")]
	pub merge_map: PathBuf,
	/// Folder where rewritten files are written, mirroring the input tree.
	/// Unchanged files are never written.
	#[serde(default = "default_output")]
	pub output: PathBuf,
	/// Which files are candidate conditions files.
	#[serde(default)]
	pub files: FilesConfig,
	/// Exclusion configuration using gitignore-style patterns.
	#[serde(default)]
	pub exclude: ExcludeConfig,
	/// Maximum file size in bytes to scan. Files larger than this are
	/// rejected. Defaults to 10 MB.
	#[serde(default = "default_max_file_size")]
	pub max_file_size: u64,
	/// When true, `.gitignore` files are not used for filtering.
	#[serde(default)]
	pub disable_gitignore: bool,
}

impl Default for OarfixConfig {
	fn default() -> Self {
		Self {
			merge_map: default_merge_map(),
			output: default_output(),
			files: FilesConfig::default(),
			exclude: ExcludeConfig::default(),
			max_file_size: DEFAULT_MAX_FILE_SIZE,
			disable_gitignore: false,
		}
	}
}

/// Glob patterns selecting candidate conditions files.
///
/// OAR keeps its conditions in `config.json` files scattered through the
/// animations tree, which is the default. DAR-style setups can widen the
/// patterns.
#[derive(Debug, Deserialize)]
pub struct FilesConfig {
	#[serde(default = "default_file_patterns")]
	pub patterns: Vec<String>,
}

impl Default for FilesConfig {
	fn default() -> Self {
		Self {
			patterns: default_file_patterns(),
		}
	}
}

/// Gitignore-style patterns for files and directories to skip during
/// scanning, applied on top of any `.gitignore` rules.
#[derive(Debug, Default, Deserialize)]
pub struct ExcludeConfig {
	#[serde(default)]
	pub patterns: Vec<String>,
}

impl OarfixConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> OarfixResult<Option<Self>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config: Self =
			toml::from_str(&content).map_err(|e| OarfixError::ConfigParse(e.to_string()))?;

		Ok(Some(config))
	}

	/// Absolute path of the merge map file.
	pub fn merge_map_path(&self, root: &Path) -> PathBuf {
		root.join(&self.merge_map)
	}

	/// Absolute path of the output folder.
	pub fn output_path(&self, root: &Path) -> PathBuf {
		root.join(&self.output)
	}
}

fn default_merge_map() -> PathBuf {
	PathBuf::from(DEFAULT_MERGE_MAP)
}

fn default_output() -> PathBuf {
	PathBuf::from("patched")
}

fn default_file_patterns() -> Vec<String> {
	vec!["**/config.json".to_string()]
}

fn default_max_file_size() -> u64 {
	DEFAULT_MAX_FILE_SIZE
}
