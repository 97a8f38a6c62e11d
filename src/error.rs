use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum KiraError {
    #[error("failed to read input file at {0}")]
    InputRead(PathBuf),

    #[error("failed to parse input CSV: {0}")]
    InputParse(String),

    #[error("input CSV is missing required column: {0}")]
    #[diagnostic(help("the header row must contain `accession` and `id` columns"))]
    MissingColumn(String),

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),

    #[error("required tool not found: {0}")]
    #[diagnostic(help("install Entrez Direct and make sure it is on PATH"))]
    MissingTool(String),

    #[error("{program} exited with {status}: {message}")]
    CommandFailed {
        program: String,
        status: String,
        message: String,
    },

    #[error("output file {path} did not appear within {waited_secs}s")]
    OutputTimeout { path: PathBuf, waited_secs: u64 },
}
