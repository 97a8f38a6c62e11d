use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

pub const FASTA_EXTENSION: &str = "fasta";

static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9_]").expect("static pattern"));

/// Spaces become underscores, then anything outside `[A-Za-z0-9_]` becomes a hyphen.
pub fn sanitize_identifier(value: &str) -> String {
    let underscored = value.replace(' ', "_");
    DISALLOWED.replace_all(&underscored, "-").into_owned()
}

/// One accession/identifier pair from the input CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessionRecord {
    accession: String,
    identifier: String,
    output_filename: String,
}

impl AccessionRecord {
    /// Returns `None` when either field is empty after trimming.
    pub fn new(accession: &str, identifier: &str) -> Option<Self> {
        let accession = accession.trim();
        let identifier = sanitize_identifier(identifier.trim());
        if accession.is_empty() || identifier.is_empty() {
            return None;
        }
        let output_filename = format!("{accession}_{identifier}.{FASTA_EXTENSION}");
        Some(Self {
            accession: accession.to_string(),
            identifier,
            output_filename,
        })
    }

    pub fn accession(&self) -> &str {
        &self.accession
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn output_filename(&self) -> &str {
        &self.output_filename
    }

    /// Output filename without the `.fasta` extension; used as the new header.
    pub fn stem(&self) -> &str {
        let suffix_len = FASTA_EXTENSION.len() + 1;
        &self.output_filename[..self.output_filename.len() - suffix_len]
    }
}

impl fmt::Display for AccessionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.accession, self.identifier)
    }
}
