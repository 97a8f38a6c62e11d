use std::fmt;

use camino::Utf8Path;
use serde::Serialize;

use crate::error::KiraError;
use crate::fs_util;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderRewrite {
    Replaced,
    NoHeader,
    Empty,
}

impl fmt::Display for HeaderRewrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderRewrite::Replaced => write!(f, "replaced"),
            HeaderRewrite::NoHeader => write!(f, "noheader"),
            HeaderRewrite::Empty => write!(f, "empty"),
        }
    }
}

/// Replaces the first line with `>` + `stem` when it starts with `>`.
/// Returns `None` when the input should be left untouched.
pub fn rename_header(contents: &[u8], stem: &str) -> Option<Vec<u8>> {
    if !contents.starts_with(b">") {
        return None;
    }
    let rest = match contents.iter().position(|&byte| byte == b'\n') {
        Some(pos) => &contents[pos + 1..],
        None => &[][..],
    };
    let mut out = Vec::with_capacity(stem.len() + 2 + rest.len());
    out.push(b'>');
    out.extend_from_slice(stem.as_bytes());
    out.push(b'\n');
    out.extend_from_slice(rest);
    Some(out)
}

pub fn rewrite_header(path: &Utf8Path, stem: &str) -> Result<HeaderRewrite, KiraError> {
    let contents = fs_util::read_file(path)?;
    if contents.is_empty() {
        tracing::warn!(path = %path, "downloaded file is empty");
        return Ok(HeaderRewrite::Empty);
    }
    match rename_header(&contents, stem) {
        Some(updated) => {
            fs_util::replace_file_atomic(path, &updated)?;
            Ok(HeaderRewrite::Replaced)
        }
        None => {
            tracing::warn!(path = %path, "first line is not a FASTA header; left unchanged");
            Ok(HeaderRewrite::NoHeader)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_only_first_line() {
        let input = b">old_header description\nACGT\n>second\nTTTT\n";
        let output = rename_header(input, "MN908947.3_Wuhan").unwrap();
        assert_eq!(output, b">MN908947.3_Wuhan\nACGT\n>second\nTTTT\n");
    }

    #[test]
    fn crlf_first_line_is_replaced_whole() {
        let output = rename_header(b">old\r\nACGT\r\n", "stem").unwrap();
        assert_eq!(output, b">stem\nACGT\r\n");
    }

    #[test]
    fn header_only_file_gains_newline() {
        assert_eq!(rename_header(b">old", "stem").unwrap(), b">stem\n");
    }

    #[test]
    fn outcome_serializes_lowercase() {
        let json = serde_json::to_string(&[HeaderRewrite::Replaced, HeaderRewrite::NoHeader]).unwrap();
        assert_eq!(json, r#"["replaced","noheader"]"#);
    }

    #[test]
    fn non_header_is_untouched() {
        assert!(rename_header(b"ACGT\n>late\n", "stem").is_none());
        assert!(rename_header(b"", "stem").is_none());
    }
}
