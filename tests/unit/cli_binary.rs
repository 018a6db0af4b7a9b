//! Unit tests for the CLI binary surface

use assert_cmd::Command;

#[test]
fn test_regions_lists_all_shards() {
    let mut cmd = Command::cargo_bin("riot-match-downloader").unwrap();
    let assert = cmd.arg("regions").assert().success();

    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    for shard in ["NA", "EUW", "KR", "OCE", "VN2"] {
        assert!(output.contains(shard), "missing shard {shard} in:\n{output}");
    }
    assert!(output.contains("europe.api.riotgames.com"));
    assert!(output.contains("na1.api.riotgames.com"));
}

#[test]
fn test_regions_json_format() {
    let mut cmd = Command::cargo_bin("riot-match-downloader").unwrap();
    let assert = cmd.args(["regions", "--format", "json"]).assert().success();

    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 15);
}

#[test]
fn test_fetch_rejects_malformed_riot_id() {
    let mut cmd = Command::cargo_bin("riot-match-downloader").unwrap();
    cmd.env("RIOT_API_KEY", "RGAPI-test")
        .args(["fetch", "NoTagLine", "--region", "NA", "--count", "1"])
        .assert()
        .failure();
}

#[test]
fn test_fetch_rejects_out_of_range_count() {
    let mut cmd = Command::cargo_bin("riot-match-downloader").unwrap();
    cmd.args(["fetch", "Name#Tag", "--region", "NA", "--count", "101"])
        .assert()
        .failure();
}

#[test]
fn test_fetch_rejects_unknown_region() {
    let mut cmd = Command::cargo_bin("riot-match-downloader").unwrap();
    cmd.args(["fetch", "Name#Tag", "--region", "ATLANTIS"])
        .assert()
        .failure();
}
