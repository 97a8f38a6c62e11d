use std::fs;
use std::time::Duration;

use assert_matches::assert_matches;
use camino::Utf8PathBuf;

use kira_entrez_batch::config::{Config, ConfigLoader, Settings};
use kira_entrez_batch::error::KiraError;

#[test]
fn overrides_replace_defaults() {
    let config: Config = serde_json::from_str(
        r#"{"database": "protein", "format": "fasta_cds_aa", "output_dir": "downloads", "command_log": "run.txt", "timeout_secs": 5}"#,
    )
    .unwrap();
    let settings = Settings::from_config("accessions.csv", config);
    assert_eq!(settings.database, "protein");
    assert_eq!(settings.format, "fasta_cds_aa");
    assert_eq!(settings.command_log, Utf8PathBuf::from("downloads/run.txt"));
    assert_eq!(settings.timeout, Duration::from_secs(5));
    assert_eq!(settings.search_program, "esearch");
}

#[test]
fn unknown_field_is_rejected() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("kira-eb.json");
    fs::write(&path, r#"{"databse": "protein"}"#).unwrap();
    let err = ConfigLoader::load(Some(path.to_str().unwrap())).unwrap_err();
    assert_matches!(err, KiraError::ConfigParse(_));
}

#[test]
fn explicit_missing_config_is_read_error() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("absent.json");
    let err = ConfigLoader::load(Some(path.to_str().unwrap())).unwrap_err();
    assert_matches!(err, KiraError::ConfigRead(_));
}
