use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use oarfix_cli::Commands;
use oarfix_cli::OarfixCli;
use oarfix_cli::OutputFormat;
use oarfix_core::AnyEmptyResult;
use oarfix_core::AnyResult;
use oarfix_core::OarfixConfig;
use oarfix_core::RemapTable;
use oarfix_core::Rewrite;
use oarfix_core::ScanOptions;
use oarfix_core::collect_conditions_files;
use oarfix_core::output_path;
use oarfix_core::rewrite_content;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = OarfixCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	if args.verbose {
		tracing_subscriber::fmt()
			.with_env_filter(
				tracing_subscriber::EnvFilter::try_from_default_env()
					.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("oarfix_core=debug")),
			)
			.with_writer(std::io::stderr)
			.init();
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match args.command {
		Some(Commands::Check { diff, format }) => run_check(&args, diff, format),
		Some(Commands::Fix { dry_run }) => run_fix(&args, dry_run),
		Some(Commands::List) => run_list(&args),
		None => {
			eprintln!("No subcommand specified. Run `oarfix --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<oarfix_core::OarfixError>() {
			Ok(oarfix_err) => {
				let report: miette::Report = (*oarfix_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Resolved run settings: CLI flags take precedence over `oarfix.toml`,
/// which takes precedence over built-in defaults.
struct Settings {
	root: PathBuf,
	merge_map: PathBuf,
	output: PathBuf,
	options: ScanOptions,
}

fn resolve_root(args: &OarfixCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn resolve_settings(args: &OarfixCli) -> AnyResult<Settings> {
	let root = resolve_root(args);
	let config = OarfixConfig::load(&root)?.unwrap_or_default();

	let merge_map = args
		.merge_map
		.clone()
		.unwrap_or_else(|| config.merge_map_path(&root));
	let output = args
		.output
		.clone()
		.unwrap_or_else(|| config.output_path(&root));
	let options = ScanOptions::from_config(Some(&config));

	Ok(Settings {
		root,
		merge_map,
		output,
		options,
	})
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}

/// The per-file outcome of a scan-and-rewrite pass.
struct FileRewrite {
	file: PathBuf,
	content: String,
	rewrite: Rewrite,
}

/// Rewrite every candidate file under the input root. Files that fail with
/// corrupt remap data are reported and skipped so that one bad table entry
/// does not hide the remaining results; the caller decides how to surface
/// the failure.
fn rewrite_all(settings: &Settings, table: &RemapTable) -> AnyResult<(Vec<FileRewrite>, usize)> {
	let files = collect_conditions_files(&settings.root, &settings.options)?;
	let mut rewrites = Vec::new();
	let mut failures = 0;

	for file in files {
		let content = std::fs::read_to_string(&file)?;
		match rewrite_content(&content, table) {
			Ok(rewrite) => {
				rewrites.push(FileRewrite {
					file,
					content,
					rewrite,
				});
			}
			Err(e) => {
				failures += 1;
				eprintln!(
					"{} {}: {e}",
					colored!("error:", red),
					make_relative(&file, &settings.root)
				);
			}
		}
	}

	Ok((rewrites, failures))
}

/// Join output lines back into file content, keeping the original line
/// terminator style and trailing newline (or its absence) intact.
fn assemble_content(rewrite: &Rewrite, original: &str) -> String {
	let newline = if original.contains("\r\n") { "\r\n" } else { "\n" };
	let mut content = rewrite.lines.join(newline);
	if original.ends_with('\n') {
		content.push_str(newline);
	}
	content
}

fn run_check(args: &OarfixCli, show_diff: bool, format: OutputFormat) -> AnyEmptyResult {
	let settings = resolve_settings(args)?;
	let table = RemapTable::load(&settings.merge_map)?;
	let (rewrites, failures) = rewrite_all(&settings, &table)?;

	let changed: Vec<&FileRewrite> = rewrites.iter().filter(|entry| entry.rewrite.changed).collect();

	match format {
		OutputFormat::Json => {
			let entries: Vec<serde_json::Value> = changed
				.iter()
				.map(|entry| {
					let substitutions: Vec<serde_json::Value> = entry
						.rewrite
						.substitutions
						.iter()
						.map(|s| {
							serde_json::json!({
								"line": s.line,
								"original": s.original,
								"replacement": s.replacement,
							})
						})
						.collect();
					serde_json::json!({
						"file": make_relative(&entry.file, &settings.root),
						"substitutions": substitutions,
					})
				})
				.collect();
			println!(
				"{}",
				serde_json::json!({ "ok": changed.is_empty() && failures == 0, "files": entries })
			);
		}
		OutputFormat::Text => {
			if changed.is_empty() && failures == 0 {
				println!("Check passed: no conditions files reference merged plugins.");
			} else {
				for entry in &changed {
					println!(
						"{} {} ({} line(s))",
						colored!("would update", yellow),
						make_relative(&entry.file, &settings.root),
						entry.rewrite.substitutions.len()
					);
					if show_diff {
						print_diff(&entry.content, &assemble_content(&entry.rewrite, &entry.content));
					}
				}
				println!(
					"\n{} file(s) would be updated. Run `oarfix fix` to write them.",
					changed.len()
				);
			}
		}
	}

	if !changed.is_empty() || failures > 0 {
		process::exit(1);
	}
	Ok(())
}

fn run_fix(args: &OarfixCli, dry_run: bool) -> AnyEmptyResult {
	let settings = resolve_settings(args)?;
	let table = RemapTable::load(&settings.merge_map)?;
	let (rewrites, failures) = rewrite_all(&settings, &table)?;

	let mut updated = 0;
	for entry in &rewrites {
		if !entry.rewrite.changed {
			continue;
		}
		updated += 1;

		println!(
			"---- conditions file {}",
			make_relative(&entry.file, &settings.root)
		);
		for substitution in &entry.rewrite.substitutions {
			println!(
				"{:4} '{}' converted to '{}'",
				substitution.line, substitution.original, substitution.replacement
			);
		}

		let destination = output_path(&settings.root, &entry.file, &settings.output)?;
		if dry_run {
			println!(
				"---- {} {}",
				destination.display(),
				colored!("would be written (dry run)", yellow)
			);
			continue;
		}

		if let Some(parent) = destination.parent() {
			std::fs::create_dir_all(parent)?;
		}
		std::fs::write(&destination, assemble_content(&entry.rewrite, &entry.content))?;
		println!("---- {} {}", destination.display(), colored!("written", green));
	}

	if updated == 0 {
		println!("No conditions files reference merged plugins; nothing to write.");
	} else if dry_run {
		println!("\n{updated} file(s) would be updated.");
	} else {
		println!("\n{} {updated} file(s).", colored!("Updated", bold));
	}

	if failures > 0 {
		process::exit(2);
	}
	Ok(())
}

fn run_list(args: &OarfixCli) -> AnyEmptyResult {
	let settings = resolve_settings(args)?;
	let table = RemapTable::load(&settings.merge_map)?;
	let files = collect_conditions_files(&settings.root, &settings.options)?;

	println!("{}", colored!("Merge map", bold));
	let mut plugins: Vec<(&str, &str)> = table.plugins().collect();
	plugins.sort_unstable();
	for (original, merged) in plugins {
		println!("  {original} -> {merged}");
	}
	println!("  {} plugin mapping(s)", table.plugin_count());

	println!();
	println!("{}", colored!("Candidate conditions files", bold));
	for file in &files {
		println!("  {}", make_relative(file, &settings.root));
	}
	println!("  {} file(s)", files.len());

	Ok(())
}

/// Print a line diff between the current and rewritten content.
fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				print!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				print!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				print!("   {change}");
			}
		}
	}
}
