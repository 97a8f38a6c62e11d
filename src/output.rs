use std::io::{self, Write};

use crate::app::{BatchResult, ProgressEvent, ProgressSink};
use crate::fasta::HeaderRewrite;

/// Prints progress lines on stdout.
pub struct ConsoleOutput;

impl ProgressSink for ConsoleOutput {
    fn event(&self, event: ProgressEvent) {
        let mut stdout = io::stdout().lock();
        let _ = match event.elapsed {
            Some(elapsed) => writeln!(
                stdout,
                " {} ({:.1}s)",
                event.message,
                elapsed.as_secs_f64()
            ),
            None => writeln!(stdout, " {}", event.message),
        };
    }
}

impl ConsoleOutput {
    /// Best effort: a closed stdout (e.g. piped into `head`) is not an error.
    pub fn print_summary(result: &BatchResult) {
        let _ = Self::write_summary(&mut io::stdout().lock(), result);
    }

    pub fn write_summary<W: Write>(out: &mut W, result: &BatchResult) -> io::Result<()> {
        let green = "\x1b[32m";
        let yellow = "\x1b[33m";
        let cyan = "\x1b[36m";
        let reset = "\x1b[0m";

        writeln!(out, "{cyan}KIRA-EB summary{reset}")?;
        writeln!(out, "{green}Downloaded files: {}{reset}", result.items.len())?;
        writeln!(out, "{cyan}Command log: {}{reset}", result.command_log)?;
        for item in &result.items {
            let color = if item.header == HeaderRewrite::Replaced {
                green
            } else {
                yellow
            };
            writeln!(
                out,
                "{color}  {} -> {} ({}, {} bytes){reset}",
                item.accession, item.output_path, item.header, item.bytes
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::BatchItemResult;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn sample() -> BatchResult {
        BatchResult {
            command_log: "out/commands.txt".to_string(),
            items: vec![BatchItemResult {
                accession: "MN908947.3".to_string(),
                output_path: "out/MN908947.3_Wuhan.fasta".to_string(),
                header: HeaderRewrite::NoHeader,
                bytes: 12,
            }],
        }
    }

    #[test]
    fn summary_lists_each_item() {
        let mut out = Vec::new();
        ConsoleOutput::write_summary(&mut out, &sample()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("MN908947.3 -> out/MN908947.3_Wuhan.fasta (noheader, 12 bytes)"));
    }

    #[test]
    fn summary_on_closed_pipe_returns_error() {
        let err = ConsoleOutput::write_summary(&mut ClosedPipe, &sample()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
