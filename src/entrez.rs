use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use crate::command::RetrievalCommand;
use crate::error::KiraError;

pub trait EntrezClient {
    /// Runs `search | fetch > output` to completion.
    fn retrieve(&self, command: &RetrievalCommand) -> Result<(), KiraError>;
}

/// Spawns the Entrez Direct programs directly, wiring search stdout into fetch stdin.
#[derive(Debug, Clone, Default)]
pub struct SystemEntrezClient;

impl SystemEntrezClient {
    pub fn new() -> Self {
        Self
    }
}

impl EntrezClient for SystemEntrezClient {
    fn retrieve(&self, command: &RetrievalCommand) -> Result<(), KiraError> {
        let search_program = resolve_program(&command.search.program)?;
        let fetch_program = resolve_program(&command.fetch.program)?;

        let output = File::create(command.output_path.as_std_path()).map_err(|err| {
            KiraError::Filesystem(format!("create {}: {err}", command.output_path))
        })?;
        // search stderr goes to a file so a full pipe cannot stall the pipeline
        let mut search_stderr =
            tempfile::tempfile().map_err(|err| KiraError::Filesystem(err.to_string()))?;
        let search_stderr_handle = search_stderr
            .try_clone()
            .map_err(|err| KiraError::Filesystem(err.to_string()))?;

        let mut search = Command::new(&search_program)
            .args(&command.search.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::from(search_stderr_handle))
            .spawn()
            .map_err(|err| spawn_failed(&command.search.program, err))?;
        let Some(search_stdout) = search.stdout.take() else {
            let _ = search.kill();
            let _ = search.wait();
            return Err(KiraError::Filesystem(
                "search process stdout unavailable".to_string(),
            ));
        };

        let fetch = Command::new(&fetch_program)
            .args(&command.fetch.args)
            .stdin(Stdio::from(search_stdout))
            .stdout(Stdio::from(output))
            .stderr(Stdio::piped())
            .spawn();
        let fetch = match fetch {
            Ok(child) => child,
            Err(err) => {
                let _ = search.kill();
                let _ = search.wait();
                return Err(spawn_failed(&command.fetch.program, err));
            }
        };

        let fetch_output = fetch
            .wait_with_output()
            .map_err(|err| spawn_failed(&command.fetch.program, err))?;
        let search_status = search
            .wait()
            .map_err(|err| spawn_failed(&command.search.program, err))?;

        // rightmost failure wins: a dead fetch usually takes search down with SIGPIPE
        if !fetch_output.status.success() {
            let stderr = String::from_utf8_lossy(&fetch_output.stderr);
            return Err(command_failed(
                &command.fetch.program,
                fetch_output.status,
                &stderr,
            ));
        }
        if !search_status.success() {
            let mut stderr = String::new();
            search_stderr
                .seek(SeekFrom::Start(0))
                .and_then(|_| search_stderr.read_to_string(&mut stderr))
                .map_err(|err| KiraError::Filesystem(err.to_string()))?;
            return Err(command_failed(
                &command.search.program,
                search_status,
                &stderr,
            ));
        }
        Ok(())
    }
}

fn spawn_failed(program: &str, err: std::io::Error) -> KiraError {
    KiraError::CommandFailed {
        program: program.to_string(),
        status: "spawn error".to_string(),
        message: err.to_string(),
    }
}

fn command_failed(program: &str, status: ExitStatus, stderr: &str) -> KiraError {
    let status = status
        .code()
        .map(|code| code.to_string())
        .unwrap_or_else(|| "signal".to_string());
    let stderr = stderr.trim();
    let message = if stderr.is_empty() {
        format!("command failed: {program}")
    } else {
        stderr.to_string()
    };
    KiraError::CommandFailed {
        program: program.to_string(),
        status,
        message,
    }
}

fn resolve_program(name: &str) -> Result<PathBuf, KiraError> {
    let candidate = Path::new(name);
    if candidate.is_absolute() || candidate.components().count() > 1 {
        if candidate.exists() {
            return Ok(candidate.to_path_buf());
        }
        return Err(KiraError::MissingTool(name.to_string()));
    }
    find_in_path(name).ok_or_else(|| KiraError::MissingTool(name.to_string()))
}

fn find_in_path(name: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    for path in std::env::split_paths(&path_var) {
        let exe = path.join(format!("{name}.exe"));
        if exe.is_file() {
            return Some(exe);
        }
        let plain = path.join(name);
        if plain.is_file() {
            return Some(plain);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn missing_tool_is_reported() {
        let err = resolve_program("kira-eb-no-such-tool").unwrap_err();
        assert_matches!(err, KiraError::MissingTool(ref name) if name == "kira-eb-no-such-tool");
    }

    #[test]
    fn explicit_path_must_exist() {
        let err = resolve_program("/nonexistent/bin/efetch").unwrap_err();
        assert_matches!(err, KiraError::MissingTool(_));
    }

    #[cfg(unix)]
    #[test]
    fn empty_stderr_gets_generic_message() {
        let status = Command::new("sh")
            .args(["-c", "exit 4"])
            .status()
            .unwrap();
        let err = command_failed("efetch", status, "  ");
        assert_matches!(
            err,
            KiraError::CommandFailed { ref status, ref message, .. }
                if status == "4" && message == "command failed: efetch"
        );
    }
}
