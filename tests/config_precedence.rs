//! XML config vs CLI flag precedence, end to end.

use assert_cmd::cargo;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn write_cfg_with_huge_buffer(path: &Path) {
    // A safety buffer no volume can satisfy, so the config alone blocks.
    let xml = "<config>\n  <log_level>quiet</log_level>\n  <safety_buffer_bytes>9223372036854775807</safety_buffer_bytes>\n</config>\n";
    fs::write(path, xml).unwrap();
}

#[test]
fn xml_safety_buffer_applies() {
    let td = tempdir().unwrap();
    let base = fs::canonicalize(td.path()).unwrap();
    let cfg_path = base.join("config.xml");
    write_cfg_with_huge_buffer(&cfg_path);
    let dest = base.join("backups");
    fs::create_dir_all(&dest).unwrap();

    let me = cargo::cargo_bin!("backup_preflight");
    let out = Command::new(me)
        .env("BACKUP_PREFLIGHT_CONFIG", &cfg_path)
        .arg(&dest)
        .args(["--required-bytes", "1"])
        .output()
        .expect("spawn binary");

    assert!(
        !out.status.success(),
        "huge configured buffer must block: {out:?}"
    );
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("insufficient space"), "stderr: {stderr}");
}

#[test]
fn cli_buffer_overrides_xml_buffer() {
    let td = tempdir().unwrap();
    let base = fs::canonicalize(td.path()).unwrap();
    let cfg_path = base.join("config.xml");
    write_cfg_with_huge_buffer(&cfg_path);
    let dest = base.join("backups");
    fs::create_dir_all(&dest).unwrap();

    let me = cargo::cargo_bin!("backup_preflight");
    let out = Command::new(me)
        .env("BACKUP_PREFLIGHT_CONFIG", &cfg_path)
        .arg(&dest)
        .args(["--required-bytes", "1", "--buffer", "0"])
        .output()
        .expect("spawn binary");

    assert!(
        out.status.success(),
        "CLI --buffer should win over XML: {out:?}"
    );
}

#[test]
fn env_pointing_at_missing_file_falls_back_to_defaults() {
    let td = tempdir().unwrap();
    let base = fs::canonicalize(td.path()).unwrap();
    let dest = base.join("backups");
    fs::create_dir_all(&dest).unwrap();

    let me = cargo::cargo_bin!("backup_preflight");
    let out = Command::new(me)
        .env("BACKUP_PREFLIGHT_CONFIG", base.join("absent.xml"))
        .arg(&dest)
        .args(["--required-bytes", "1", "--log-level", "quiet"])
        .output()
        .expect("spawn binary");

    assert!(out.status.success(), "defaults should apply: {out:?}");
}
