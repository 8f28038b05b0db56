use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub fn oarfix_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("oarfix"));
	cmd.env("NO_COLOR", "1");
	cmd
}

/// Lay out a small animations tree with a merge map, one stale conditions
/// file, and one file with nothing to rewrite.
pub fn write_sample_project(root: &Path) -> std::io::Result<()> {
	std::fs::write(
		root.join("merge-map.json"),
		r#"{ "plugins": { "foo.esp": "merged.esp" }, "formIds": { "foo.esp": { "00001A": "2B" } } }"#,
	)?;

	std::fs::create_dir_all(root.join("anim/stale"))?;
	std::fs::write(
		root.join("anim/stale/config.json"),
		"{\n    \"pluginName\": \"foo.esp\",\n    \"formID\": \"1A\"\n}\n",
	)?;

	std::fs::create_dir_all(root.join("anim/clean"))?;
	std::fs::write(
		root.join("anim/clean/config.json"),
		"{\n    \"pluginName\": \"Skyrim.esm\",\n    \"formID\": \"13BAB\"\n}\n",
	)?;

	Ok(())
}
