mod common;

use oarfix_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;

#[test]
fn list_shows_merge_map_and_candidate_files() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_sample_project(tmp.path())?;

	let mut cmd = common::oarfix_cmd();
	cmd.arg("list")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(
			predicates::str::contains("foo.esp -> merged.esp")
				.and(predicates::str::contains("1 plugin mapping(s)"))
				.and(predicates::str::contains("anim/clean/config.json"))
				.and(predicates::str::contains("anim/stale/config.json"))
				.and(predicates::str::contains("2 file(s)")),
		);

	Ok(())
}

#[test]
fn missing_merge_map_is_a_hard_error() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	let mut cmd = common::oarfix_cmd();
	cmd.arg("list")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.failure()
		.code(2);

	Ok(())
}
