use std::fs;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::command::{self, RetrievalCommand};
use crate::config::Settings;
use crate::domain::AccessionRecord;
use crate::entrez::EntrezClient;
use crate::error::KiraError;
use crate::fasta::{self, HeaderRewrite};
use crate::fs_util;
use crate::input;

#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    pub command_log: String,
    pub items: Vec<BatchItemResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchItemResult {
    pub accession: String,
    pub output_path: String,
    pub header: HeaderRewrite,
    pub bytes: u64,
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
    pub elapsed: Option<Duration>,
}

impl ProgressEvent {
    fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            elapsed: None,
        }
    }
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

pub struct App<C: EntrezClient> {
    settings: Settings,
    client: C,
}

impl<C: EntrezClient> App<C> {
    pub fn new(settings: Settings, client: C) -> Self {
        Self { settings, client }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Loads the input CSV and runs the whole batch.
    pub fn execute(&self, sink: &dyn ProgressSink) -> Result<BatchResult, KiraError> {
        let records = input::load_records(self.settings.input.as_std_path())?;
        self.run(&records, sink)
    }

    pub fn run(
        &self,
        records: &[AccessionRecord],
        sink: &dyn ProgressSink,
    ) -> Result<BatchResult, KiraError> {
        fs::create_dir_all(self.settings.output_dir.as_std_path()).map_err(|err| {
            KiraError::Filesystem(format!("create {}: {err}", self.settings.output_dir))
        })?;

        let commands = command::synthesize(records, &self.settings);
        command::write_command_log(&self.settings.command_log, &commands)?;
        sink.event(ProgressEvent::message(format!(
            "Commands generated in '{}'.",
            self.settings.command_log
        )));

        let total = commands.len();
        let mut items = Vec::with_capacity(total);
        for (index, (record, command)) in records.iter().zip(&commands).enumerate() {
            items.push(self.run_one(index + 1, total, record, command, sink)?);
        }

        sink.event(ProgressEvent::message(format!(
            "Fasta files downloaded. All {total} commands executed successfully!"
        )));
        Ok(BatchResult {
            command_log: self.settings.command_log.to_string(),
            items,
        })
    }

    fn run_one(
        &self,
        index: usize,
        total: usize,
        record: &AccessionRecord,
        command: &RetrievalCommand,
        sink: &dyn ProgressSink,
    ) -> Result<BatchItemResult, KiraError> {
        let line = command.render();
        sink.event(ProgressEvent::message(format!(
            "Running ({index}/{total}): {line}"
        )));
        tracing::info!(accession = record.accession(), index, total, "running retrieval");

        let start = Instant::now();
        self.client.retrieve(command)?;
        fs_util::wait_for_file(
            &command.output_path,
            self.settings.poll_interval,
            self.settings.timeout,
        )?;
        sink.event(ProgressEvent {
            message: format!(
                "Completed ({index}/{total}): {} downloaded.",
                command.output_filename
            ),
            elapsed: Some(start.elapsed()),
        });

        let header = fasta::rewrite_header(&command.output_path, record.stem())?;
        let message = match header {
            HeaderRewrite::Replaced => {
                format!("Updated FASTA header in '{}'.", command.output_filename)
            }
            HeaderRewrite::NoHeader => format!(
                "No FASTA header in '{}'; left unchanged.",
                command.output_filename
            ),
            HeaderRewrite::Empty => {
                format!("'{}' is empty; left unchanged.", command.output_filename)
            }
        };
        sink.event(ProgressEvent::message(message));

        let bytes = fs::metadata(command.output_path.as_std_path())
            .map(|meta| meta.len())
            .map_err(|err| KiraError::Filesystem(err.to_string()))?;
        Ok(BatchItemResult {
            accession: record.accession().to_string(),
            output_path: command.output_path.to_string(),
            header,
            bytes,
        })
    }
}
