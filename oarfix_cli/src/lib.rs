use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Redirect merged-plugin references in OAR/DAR conditions files.",
	long_about = "oarfix repairs Open Animation Replacer / Dynamic Animation Replacer conditions \
	              files after a Skyrim plugin merge.\n\nA merge folds several .esp plugins into \
	              one and renumbers their FormIDs; conditions files that still name the old \
	              plugins silently stop matching. oarfix rewrites those references against a \
	              merge map while preserving every other byte of the file.\n\nQuick start:\n  \
	              oarfix list   Show candidate files and the loaded merge map\n  oarfix check  \
	              Report files that still reference merged plugins\n  oarfix fix    Write \
	              patched copies to the output folder"
)]
pub struct OarfixCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the input folder (the animations tree to scan).
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Path to the merge map JSON file. Overrides the config file.
	#[arg(long, global = true)]
	pub merge_map: Option<PathBuf>,

	/// Output folder for patched files. Overrides the config file.
	#[arg(long, short, global = true)]
	pub output: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Report conditions files that still reference merged plugins.
	///
	/// Scans candidate files and runs the rewrite engine without writing
	/// anything. Exits with a non-zero status code when any file would
	/// change, making this suitable for verifying a finished merge.
	Check {
		/// Show a unified diff for each file that would change.
		#[arg(long, default_value_t = false)]
		diff: bool,

		/// Output format. Use `text` for human-readable output or `json`
		/// for programmatic consumption.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Rewrite stale references and write patched files.
	///
	/// Rewritten files are placed under the output folder at the same
	/// relative path as under the input folder; unchanged files are not
	/// written. Every substituted line is logged with its line number.
	Fix {
		/// Preview changes without writing files.
		#[arg(long, default_value_t = false)]
		dry_run: bool,
	},
	/// List candidate conditions files and the loaded merge map.
	///
	/// Shows every file the scanner would consider together with a summary
	/// of the plugin mappings in the merge map. Useful for auditing scan
	/// patterns before running `fix`.
	List,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption. Each entry includes the
	/// file path and its per-line substitutions.
	Json,
}
