mod common;

use oarfix_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;
use serde_json::Value;

#[test]
fn check_passes_when_nothing_to_rewrite() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("merge-map.json"),
		r#"{ "plugins": { "foo.esp": "merged.esp" } }"#,
	)?;
	std::fs::create_dir_all(tmp.path().join("anim"))?;
	std::fs::write(
		tmp.path().join("anim/config.json"),
		"{\n    \"pluginName\": \"Skyrim.esm\"\n}\n",
	)?;

	let mut cmd = common::oarfix_cmd();
	cmd.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Check passed"));

	Ok(())
}

#[test]
fn check_fails_when_files_would_change() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_sample_project(tmp.path())?;

	let mut cmd = common::oarfix_cmd();
	cmd.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.failure()
		.code(1)
		.stdout(
			predicates::str::contains("would update")
				.and(predicates::str::contains("anim/stale/config.json")),
		);

	Ok(())
}

#[test]
fn check_diff_shows_rewritten_lines() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_sample_project(tmp.path())?;

	let mut cmd = common::oarfix_cmd();
	cmd.arg("check")
		.arg("--diff")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.failure()
		.stdout(
			predicates::str::contains("-    \"pluginName\": \"foo.esp\",")
				.and(predicates::str::contains("+    \"pluginName\": \"merged.esp\",")),
		);

	Ok(())
}

#[test]
fn check_json_reports_substitutions() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_sample_project(tmp.path())?;

	let mut cmd = common::oarfix_cmd();
	let assert = cmd
		.arg("check")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.failure()
		.code(1);

	let output: Value = serde_json::from_slice(&assert.get_output().stdout)?;
	assert_eq!(output["ok"], Value::Bool(false));
	let files = output["files"].as_array().expect("files array");
	assert_eq!(files.len(), 1);
	assert_eq!(files[0]["file"], "anim/stale/config.json");
	let substitutions = files[0]["substitutions"].as_array().expect("substitutions");
	assert_eq!(substitutions.len(), 2);
	assert_eq!(substitutions[0]["line"], 2);
	assert_eq!(substitutions[1]["replacement"], "    \"formID\": \"2B\"");

	Ok(())
}
