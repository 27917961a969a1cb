//! Common types used throughout seqfetch

/// Sequence file format handled by an index and its reader.
///
/// Selected once at startup (by the tool persona, or the FASTA persona's
/// `--fastq` override) and fixed for the remainder of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// FASTA: `>` headers, sequence data only.
    Fasta,
    /// FASTQ: `@` headers, sequence plus `+`-separated quality string.
    Fastq,
}

impl Format {
    /// Header prefix for emitted records: `>` for FASTA, `@` for FASTQ.
    pub fn header_prefix(self) -> char {
        match self {
            Format::Fasta => '>',
            Format::Fastq => '@',
        }
    }
}

/// Policy for regions the index cannot resolve.
///
/// Governs only the not-found case. Hard fetch failures (format mismatch,
/// I/O errors) abort the run regardless of policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingPolicy {
    /// A missing region aborts the run (the default).
    #[default]
    Fail,
    /// A missing region is reported and skipped; the run continues.
    Skip,
}
