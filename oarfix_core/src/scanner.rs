use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use globset::Glob;
use globset::GlobSet;
use globset::GlobSetBuilder;
use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;

use crate::OarfixError;
use crate::OarfixResult;
use crate::config::DEFAULT_MAX_FILE_SIZE;
use crate::config::OarfixConfig;

/// Options for controlling how the input tree is scanned for candidate
/// conditions files.
#[derive(Debug, Clone)]
pub struct ScanOptions {
	/// Glob patterns selecting candidate files (default `**/config.json`).
	pub patterns: Vec<String>,
	/// Gitignore-style patterns to exclude from scanning.
	pub exclude_patterns: Vec<String>,
	/// Maximum file size to process in bytes.
	pub max_file_size: u64,
	/// Whether to disable `.gitignore` integration.
	pub disable_gitignore: bool,
}

impl Default for ScanOptions {
	fn default() -> Self {
		Self {
			patterns: vec!["**/config.json".to_string()],
			exclude_patterns: Vec::new(),
			max_file_size: DEFAULT_MAX_FILE_SIZE,
			disable_gitignore: false,
		}
	}
}

impl ScanOptions {
	/// Construct [`ScanOptions`] from an [`OarfixConfig`].
	pub fn from_config(config: Option<&OarfixConfig>) -> Self {
		let Some(config) = config else {
			return Self::default();
		};

		Self {
			patterns: config.files.patterns.clone(),
			exclude_patterns: config.exclude.patterns.clone(),
			max_file_size: config.max_file_size,
			disable_gitignore: config.disable_gitignore,
		}
	}
}

/// Collect candidate conditions files under `root`, sorted for deterministic
/// ordering.
///
/// When `disable_gitignore` is false (the default), files matched by the
/// project's `.gitignore` are skipped. Exclude patterns follow gitignore
/// syntax and are always applied on top. Files larger than the configured
/// limit are an error rather than silently skipped — a conditions file that
/// big means something is wrong.
pub fn collect_conditions_files(root: &Path, options: &ScanOptions) -> OarfixResult<Vec<PathBuf>> {
	let candidate_set = build_glob_set(&options.patterns);
	let gitignore = if options.disable_gitignore {
		Gitignore::empty()
	} else {
		build_gitignore(root)
	};
	let custom_exclude = build_exclude_matcher(root, &options.exclude_patterns)?;

	let mut files = Vec::new();
	let mut visited_dirs = HashSet::new();
	walk_dir(
		root,
		root,
		&candidate_set,
		&gitignore,
		&custom_exclude,
		options.max_file_size,
		&mut files,
		&mut visited_dirs,
	)?;

	files.sort();
	tracing::debug!(count = files.len(), "candidate conditions files collected");
	Ok(files)
}

/// Map an input file to its location under the output folder, preserving the
/// path relative to the input root. The caller creates parent directories
/// before writing.
pub fn output_path(input_root: &Path, file: &Path, output_root: &Path) -> OarfixResult<PathBuf> {
	let relative = file
		.strip_prefix(input_root)
		.map_err(|_| {
			OarfixError::OutsideRoot {
				path: file.display().to_string(),
				root: input_root.display().to_string(),
			}
		})?;
	Ok(output_root.join(relative))
}

/// Build a `GlobSet` from a list of glob pattern strings.
fn build_glob_set(patterns: &[String]) -> GlobSet {
	let mut builder = GlobSetBuilder::new();
	for pattern in patterns {
		if let Ok(glob) = Glob::new(pattern) {
			builder.add(glob);
		}
	}
	builder.build().unwrap_or_else(|_| GlobSet::empty())
}

/// Build a `Gitignore` matcher from exclude patterns specified in
/// `oarfix.toml` `[exclude]`. These follow `.gitignore` syntax and are
/// applied on top of any `.gitignore` rules.
fn build_exclude_matcher(root: &Path, patterns: &[String]) -> OarfixResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(root);
	for pattern in patterns {
		builder.add_line(None, pattern).map_err(|e| {
			OarfixError::ConfigParse(format!("invalid exclude pattern `{pattern}`: {e}"))
		})?;
	}
	builder
		.build()
		.map_err(|e| OarfixError::ConfigParse(format!("failed to build exclude rules: {e}")))
}

/// Build a `Gitignore` matcher from the project's `.gitignore` file (if any).
fn build_gitignore(root: &Path) -> Gitignore {
	let mut builder = GitignoreBuilder::new(root);
	let gitignore_path = root.join(".gitignore");
	if gitignore_path.exists() {
		let _ = builder.add(gitignore_path);
	}
	builder.build().unwrap_or_else(|_| Gitignore::empty())
}

fn is_ignored_directory_name(name: &str) -> bool {
	name.starts_with('.') || name == "node_modules" || name == "target"
}

#[allow(clippy::too_many_arguments)]
fn walk_dir(
	root: &Path,
	dir: &Path,
	candidate_set: &GlobSet,
	gitignore: &Gitignore,
	custom_exclude: &Gitignore,
	max_file_size: u64,
	files: &mut Vec<PathBuf>,
	visited_dirs: &mut HashSet<PathBuf>,
) -> OarfixResult<()> {
	if !dir.is_dir() {
		return Ok(());
	}

	// Detect symlink cycles by tracking canonical paths.
	let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
	if !visited_dirs.insert(canonical) {
		return Err(OarfixError::SymlinkCycle {
			path: dir.display().to_string(),
		});
	}

	for entry in std::fs::read_dir(dir)? {
		let entry = entry?;
		let path = entry.path();

		// Skip hidden directories and common non-content directories.
		if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
			if is_ignored_directory_name(name) {
				continue;
			}
		}

		let is_dir = path.is_dir();

		if gitignore.matched(&path, is_dir).is_ignore() {
			continue;
		}
		if custom_exclude.matched(&path, is_dir).is_ignore() {
			continue;
		}

		if is_dir {
			walk_dir(
				root,
				&path,
				candidate_set,
				gitignore,
				custom_exclude,
				max_file_size,
				files,
				visited_dirs,
			)?;
			continue;
		}

		// Candidate patterns match against the path relative to the root.
		let relative = path.strip_prefix(root).unwrap_or(&path);
		if !candidate_set.is_match(relative) {
			continue;
		}

		let metadata = entry.metadata()?;
		if metadata.len() > max_file_size {
			return Err(OarfixError::FileTooLarge {
				path: path.display().to_string(),
				size: metadata.len(),
				limit: max_file_size,
			});
		}

		files.push(path);
	}

	Ok(())
}
