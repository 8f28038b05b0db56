use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum OarfixError {
	#[error(transparent)]
	#[diagnostic(code(oarfix::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(oarfix::config_parse),
		help("check that oarfix.toml is valid TOML with [files] and/or [exclude] sections")
	)]
	ConfigParse(String),

	#[error("failed to load merge map `{path}`: {reason}")]
	#[diagnostic(
		code(oarfix::merge_map),
		help("the merge map must be JSON with `plugins` and optional `formIds` objects")
	)]
	MergeMapParse { path: String, reason: String },

	#[error("invalid FormID key `{key}` for plugin `{plugin}` in merge map")]
	#[diagnostic(
		code(oarfix::invalid_form_id_key),
		help("FormID keys must be hexadecimal, e.g. `00001A`")
	)]
	InvalidFormIdKey { plugin: String, key: String },

	#[error("duplicate FormID `{form_id}` for plugin `{plugin}` in merge map")]
	#[diagnostic(
		code(oarfix::duplicate_form_id),
		help("keys like `1A` and `00001A` canonicalize to the same FormID; remove one")
	)]
	DuplicateFormId { plugin: String, form_id: String },

	#[error("remap target `{value}` for plugin `{plugin}` FormID `{form_id}` is not valid hex")]
	#[diagnostic(
		code(oarfix::invalid_remap_target),
		help("the merge map is corrupt; replacement FormIDs must be hexadecimal")
	)]
	InvalidRemapTarget {
		plugin: String,
		form_id: String,
		value: String,
	},

	#[error("file too large: `{path}` is {size} bytes (limit: {limit} bytes)")]
	#[diagnostic(
		code(oarfix::file_too_large),
		help("increase the file size limit in oarfix.toml or exclude this file")
	)]
	FileTooLarge { path: String, size: u64, limit: u64 },

	#[error("symlink cycle detected at: `{path}`")]
	#[diagnostic(
		code(oarfix::symlink_cycle),
		help("remove the circular symlink or exclude this path")
	)]
	SymlinkCycle { path: String },

	#[error("file `{path}` is not under the input folder `{root}`")]
	#[diagnostic(code(oarfix::outside_root))]
	OutsideRoot { path: String, root: String },
}

pub type OarfixResult<T> = Result<T, OarfixError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
