use std::fs;
use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};

use camino::Utf8Path;

use crate::error::KiraError;

/// Polls until `path` exists. Fails with `OutputTimeout` once `timeout` has elapsed.
pub fn wait_for_file(
    path: &Utf8Path,
    poll_interval: Duration,
    timeout: Duration,
) -> Result<Duration, KiraError> {
    let start = Instant::now();
    loop {
        if path.as_std_path().exists() {
            return Ok(start.elapsed());
        }
        let waited = start.elapsed();
        if waited >= timeout {
            return Err(KiraError::OutputTimeout {
                path: path.as_std_path().to_path_buf(),
                waited_secs: waited.as_secs(),
            });
        }
        tracing::debug!(path = %path, "waiting for output file");
        thread::sleep(poll_interval.min(timeout - waited));
    }
}

/// Writes `contents` to a temp file beside `dest`, then renames it over `dest`.
pub fn replace_file_atomic(dest: &Utf8Path, contents: &[u8]) -> Result<(), KiraError> {
    let parent = match dest.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let mut temp = tempfile::Builder::new()
        .prefix(".kira-eb-file")
        .tempfile_in(parent.as_std_path())
        .map_err(|err| KiraError::Filesystem(err.to_string()))?;
    temp.write_all(contents)
        .map_err(|err| KiraError::Filesystem(format!("write {dest}: {err}")))?;
    temp.as_file()
        .sync_all()
        .map_err(|err| KiraError::Filesystem(err.to_string()))?;
    temp.persist(dest.as_std_path())
        .map_err(|err| KiraError::Filesystem(err.to_string()))?;
    Ok(())
}

pub fn read_file(path: &Utf8Path) -> Result<Vec<u8>, KiraError> {
    fs::read(path.as_std_path()).map_err(|err| KiraError::Filesystem(format!("read {path}: {err}")))
}
