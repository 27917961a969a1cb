//! Output destinations for record emission
//!
//! The sink abstracts over standard output and a user-specified file so
//! the rest of the pipeline writes through one handle, opened once and
//! passed by reference.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, SeqfetchError};

/// Output destination for emitted records
#[derive(Debug, Clone)]
pub enum OutputSink {
    /// Write to standard output (the default).
    Stdout,
    /// Write to a local file path.
    File(PathBuf),
}

impl OutputSink {
    /// Create a sink from an optional `--output` argument.
    pub fn from_arg(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => Self::File(path),
            None => Self::Stdout,
        }
    }

    /// Open the sink for writing.
    ///
    /// A file sink must not name the input sequence file; the check is a
    /// direct path-string comparison, performed before anything is
    /// created. File sinks are buffered and closed on drop; stdout is
    /// locked for the duration of the run and left open.
    pub fn open(&self, input: &Path) -> Result<Box<dyn Write>> {
        match self {
            Self::Stdout => Ok(Box::new(io::stdout().lock())),
            Self::File(path) => {
                if path.as_os_str() == input.as_os_str() {
                    return Err(SeqfetchError::OutputAliasesInput(path.clone()));
                }
                let file = File::create(path).map_err(|source| SeqfetchError::CreateOutput {
                    path: path.clone(),
                    source,
                })?;
                Ok(Box::new(BufWriter::new(file)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_arg() {
        assert!(matches!(OutputSink::from_arg(None), OutputSink::Stdout));
        match OutputSink::from_arg(Some(PathBuf::from("out.fa"))) {
            OutputSink::File(path) => assert_eq!(path, PathBuf::from("out.fa")),
            OutputSink::Stdout => panic!("expected File variant"),
        }
    }

    #[test]
    fn test_open_rejects_input_alias() {
        let sink = OutputSink::File(PathBuf::from("genome.fa"));
        let result = sink.open(Path::new("genome.fa"));
        assert!(matches!(
            result,
            Err(SeqfetchError::OutputAliasesInput(_))
        ));
    }

    #[test]
    fn test_open_writes_to_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.fa");
        let sink = OutputSink::File(path.clone());

        let mut out = sink.open(Path::new("genome.fa")).unwrap();
        out.write_all(b">x\nACGT\n").unwrap();
        out.flush().unwrap();
        drop(out);

        assert_eq!(std::fs::read(&path).unwrap(), b">x\nACGT\n");
    }
}
