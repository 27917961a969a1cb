//! Error types for seqfetch

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for seqfetch operations
pub type Result<T> = std::result::Result<T, SeqfetchError>;

/// Error types that can occur in seqfetch
#[derive(Debug, Error)]
pub enum SeqfetchError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed entry in an FAI index file
    #[error("invalid index entry at line {line}: {msg}")]
    InvalidIndex {
        /// Line number in the index file
        line: usize,
        /// Error message
        msg: String,
    },

    /// Invalid FASTA format encountered while building an index
    #[error("invalid FASTA format at line {line}: {msg}")]
    InvalidFasta {
        /// Line number where the error occurred
        line: usize,
        /// Error message
        msg: String,
    },

    /// Invalid FASTQ format encountered while building an index
    #[error("invalid FASTQ format at line {line}: {msg}")]
    InvalidFastq {
        /// Line number where the error occurred
        line: usize,
        /// Error message
        msg: String,
    },

    /// Index construction failed
    #[error("could not build index {}.fai", .path.display())]
    BuildIndex {
        /// Sequence file the index was built for
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: Box<SeqfetchError>,
    },

    /// Index load failed
    #[error("could not load index of {}", .path.display())]
    LoadIndex {
        /// Sequence file whose index could not be loaded
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: Box<SeqfetchError>,
    },

    /// A region could not be fetched and the run cannot continue
    #[error("failed to fetch sequence in {region}: {reason}")]
    Fetch {
        /// The offending region token
        region: String,
        /// Why the fetch failed
        reason: String,
    },

    /// Output destination names the input sequence file
    #[error("same input and output path: {}", .0.display())]
    OutputAliasesInput(PathBuf),

    /// Output destination could not be opened for writing
    #[error("cannot open {} for writing", .path.display())]
    CreateOutput {
        /// The destination path
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },

    /// Region-list file could not be opened for reading
    #[error("failed to open {} for reading", .path.display())]
    RegionFile {
        /// The region-list path
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },

    /// Writing an output record failed
    #[error("failed to write output")]
    WriteOutput {
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },

    /// Flushing the output sink failed
    #[error("failed to flush output")]
    FlushOutput {
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },
}
