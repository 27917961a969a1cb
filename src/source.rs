//! Region token sources
//!
//! Region tokens come either from positional command arguments or from a
//! region-list file, one token per line. The file variant is a single-pass
//! iterator; the line buffer is reused between reads and line terminators
//! are stripped. Tokens are not validated here: a malformed line surfaces
//! later as a not-found outcome from the index.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Result, SeqfetchError};

/// Iterator over region tokens read line-by-line from a region-list file.
pub struct RegionLines<R: BufRead> {
    reader: R,
    buf: String,
}

impl RegionLines<BufReader<File>> {
    /// Open a region-list file.
    ///
    /// Failure to open is fatal and reported before any extraction begins.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(|source| SeqfetchError::RegionFile {
            path: path.as_ref().to_path_buf(),
            source,
        })?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> RegionLines<R> {
    /// Wrap any buffered reader; useful for in-memory sources in tests.
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader,
            buf: String::with_capacity(128),
        }
    }
}

impl<R: BufRead> Iterator for RegionLines<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_line(&mut self.buf) {
            Ok(0) => None,
            Ok(_) => Some(Ok(self.buf.trim_end_matches(['\n', '\r']).to_string())),
            Err(e) => Some(Err(SeqfetchError::Io(e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn collect(data: &[u8]) -> Vec<String> {
        RegionLines::from_reader(BufReader::new(Cursor::new(data.to_vec())))
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_lines_in_order_terminators_stripped() {
        let tokens = collect(b"chr1\nchr2:100-200\nchr3\n");
        assert_eq!(tokens, ["chr1", "chr2:100-200", "chr3"]);
    }

    #[test]
    fn test_crlf_terminators() {
        let tokens = collect(b"chr1\r\nchr2\r\n");
        assert_eq!(tokens, ["chr1", "chr2"]);
    }

    #[test]
    fn test_missing_final_newline() {
        let tokens = collect(b"chr1\nchr2");
        assert_eq!(tokens, ["chr1", "chr2"]);
    }

    #[test]
    fn test_blank_lines_are_kept() {
        // No blank-line skipping: an empty token is handed to the fetch
        // and resolves as not found.
        let tokens = collect(b"chr1\n\nchr2\n");
        assert_eq!(tokens, ["chr1", "", "chr2"]);
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let result = RegionLines::from_path("definitely/not/here.txt");
        assert!(matches!(result, Err(SeqfetchError::RegionFile { .. })));
    }
}
