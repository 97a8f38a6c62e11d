use std::fmt;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};

use crate::config::Settings;
use crate::domain::AccessionRecord;
use crate::error::KiraError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", shell_quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", shell_quote(arg))?;
        }
        Ok(())
    }
}

/// `search | fetch > output`, executed without a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalCommand {
    pub search: Invocation,
    pub fetch: Invocation,
    pub output_filename: String,
    pub output_path: Utf8PathBuf,
}

impl RetrievalCommand {
    pub fn for_record(record: &AccessionRecord, settings: &Settings) -> Self {
        let search = Invocation::new(
            settings.search_program.as_str(),
            &[
                "-db",
                settings.database.as_str(),
                "-query",
                record.accession(),
            ],
        );
        let fetch = Invocation::new(
            settings.fetch_program.as_str(),
            &["-format", settings.format.as_str()],
        );
        Self {
            search,
            fetch,
            output_filename: record.output_filename().to_string(),
            output_path: settings.output_path(record.output_filename()),
        }
    }

    /// Shell-equivalent line for the audit log.
    pub fn render(&self) -> String {
        format!(
            "{} | {} > {}",
            self.search,
            self.fetch,
            shell_quote(&self.output_filename)
        )
    }
}

pub fn synthesize(records: &[AccessionRecord], settings: &Settings) -> Vec<RetrievalCommand> {
    records
        .iter()
        .map(|record| RetrievalCommand::for_record(record, settings))
        .collect()
}

pub fn write_command_log(path: &Utf8Path, commands: &[RetrievalCommand]) -> Result<(), KiraError> {
    let mut content = String::new();
    for command in commands {
        content.push_str(&command.render());
        content.push('\n');
    }
    if let Some(parent) = path.parent().filter(|parent| !parent.as_str().is_empty()) {
        fs::create_dir_all(parent.as_std_path())
            .map_err(|err| KiraError::Filesystem(format!("create {parent}: {err}")))?;
    }
    fs::write(path.as_std_path(), content)
        .map_err(|err| KiraError::Filesystem(format!("write {path}: {err}")))?;
    tracing::info!(path = %path, count = commands.len(), "wrote command log");
    Ok(())
}

fn shell_quote(value: &str) -> String {
    let safe = !value.is_empty()
        && value
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || "_-.,:/=+@%".contains(ch));
    if safe {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}
