//! Record emission: fetch classification, framing and line wrapping
//!
//! One emitted record is a header line (`>` or `@` plus the region token),
//! the sequence wrapped at the configured width, and for FASTQ a `+`
//! separator followed by the quality string wrapped the same way.
//!
//! Classification happens before anything is written, so a region that is
//! skipped or fatal leaves no partial record behind.

use std::io::{self, Write};

use log::warn;

use crate::error::{Result, SeqfetchError};
use crate::fai::FetchOutcome;
use crate::region;
use crate::types::{Format, MissingPolicy};

/// Default number of bases per output body line
pub const DEFAULT_LINE_WIDTH: usize = 60;

/// Effective wrap width for a user-supplied value.
///
/// Any non-positive width is replaced by [`DEFAULT_LINE_WIDTH`] with a
/// warning rather than rejected.
pub fn effective_line_width(requested: i64) -> usize {
    if requested < 1 {
        warn!(
            "bad line length {}, using default: {}",
            requested, DEFAULT_LINE_WIDTH
        );
        DEFAULT_LINE_WIDTH
    } else {
        requested as usize
    }
}

/// What became of one region token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitStatus {
    /// A record was written.
    Written,
    /// The region was missing and tolerated; nothing was written.
    Skipped,
}

/// Classify fetch outcomes for one region and write its record.
///
/// `quality` must be supplied for FASTQ and is wrapped with the same rule
/// as the sequence. A missing region is skipped (nothing written) under
/// [`MissingPolicy::Skip`] and fatal otherwise; hard fetch failures are
/// always fatal. Zero-length and truncated fetches warn but still emit.
pub fn emit_record<W: Write>(
    out: &mut W,
    name: &str,
    sequence: &FetchOutcome,
    quality: Option<&FetchOutcome>,
    line_width: usize,
    format: Format,
    missing: MissingPolicy,
) -> Result<EmitStatus> {
    let seq = match classify(name, sequence, missing)? {
        Some(bytes) => bytes,
        None => return Ok(EmitStatus::Skipped),
    };
    let qual = match quality {
        Some(outcome) => match classify(name, outcome, missing)? {
            Some(bytes) => Some(bytes),
            None => return Ok(EmitStatus::Skipped),
        },
        None => None,
    };

    if seq.is_empty() {
        warn!("zero length sequence: {}", name);
    } else if let Some(span) = region::parse(name).and_then(|r| r.span()) {
        if span != seq.len() as u64 {
            warn!("truncated sequence: {}", name);
        }
    }

    write_frame(out, name, seq, qual, line_width, format)
        .map_err(|source| SeqfetchError::WriteOutput { source })?;
    Ok(EmitStatus::Written)
}

fn classify<'a>(
    name: &str,
    outcome: &'a FetchOutcome,
    missing: MissingPolicy,
) -> Result<Option<&'a [u8]>> {
    match outcome {
        FetchOutcome::Found(bytes) => Ok(Some(bytes)),
        FetchOutcome::NotFound => match missing {
            MissingPolicy::Skip => {
                warn!("failed to fetch sequence in {}", name);
                Ok(None)
            }
            MissingPolicy::Fail => Err(SeqfetchError::Fetch {
                region: name.to_string(),
                reason: "not found in index".to_string(),
            }),
        },
        FetchOutcome::Failed(reason) => Err(SeqfetchError::Fetch {
            region: name.to_string(),
            reason: reason.clone(),
        }),
    }
}

fn write_frame<W: Write>(
    out: &mut W,
    name: &str,
    seq: &[u8],
    qual: Option<&[u8]>,
    line_width: usize,
    format: Format,
) -> io::Result<()> {
    writeln!(out, "{}{}", format.header_prefix(), name)?;
    write_wrapped(out, seq, line_width)?;
    if format == Format::Fastq {
        out.write_all(b"+\n")?;
        if let Some(qual) = qual {
            write_wrapped(out, qual, line_width)?;
        }
    }
    Ok(())
}

/// Write `bytes` as consecutive newline-terminated chunks of at most
/// `width` bytes. Empty input writes no lines.
pub fn write_wrapped<W: Write>(out: &mut W, bytes: &[u8], width: usize) -> io::Result<()> {
    for chunk in bytes.chunks(width.max(1)) {
        out.write_all(chunk)?;
        out.write_all(b"\n")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emit_to_string(
        name: &str,
        sequence: FetchOutcome,
        quality: Option<FetchOutcome>,
        width: usize,
        format: Format,
        missing: MissingPolicy,
    ) -> Result<(EmitStatus, String)> {
        let mut out = Vec::new();
        let status = emit_record(
            &mut out,
            name,
            &sequence,
            quality.as_ref(),
            width,
            format,
            missing,
        )?;
        Ok((status, String::from_utf8(out).unwrap()))
    }

    #[test]
    fn test_fasta_record_wrapped() {
        let (status, text) = emit_to_string(
            "seq1",
            FetchOutcome::Found(b"ACGTACGTAC".to_vec()),
            None,
            4,
            Format::Fasta,
            MissingPolicy::Fail,
        )
        .unwrap();
        assert_eq!(status, EmitStatus::Written);
        assert_eq!(text, ">seq1\nACGT\nACGT\nAC\n");
    }

    #[test]
    fn test_fastq_record_with_quality() {
        let (status, text) = emit_to_string(
            "seq1",
            FetchOutcome::Found(b"ACGTACGTAC".to_vec()),
            Some(FetchOutcome::Found(b"IIIIIIIIII".to_vec())),
            5,
            Format::Fastq,
            MissingPolicy::Fail,
        )
        .unwrap();
        assert_eq!(status, EmitStatus::Written);
        assert_eq!(text, "@seq1\nACGTA\nCGTAC\n+\nIIIII\nIIIII\n");
    }

    #[test]
    fn test_zero_length_still_writes_header() {
        let (status, text) = emit_to_string(
            "seq1:999-1000",
            FetchOutcome::Found(Vec::new()),
            None,
            60,
            Format::Fasta,
            MissingPolicy::Fail,
        )
        .unwrap();
        assert_eq!(status, EmitStatus::Written);
        assert_eq!(text, ">seq1:999-1000\n");
    }

    #[test]
    fn test_empty_fastq_record_keeps_separator() {
        let (_, text) = emit_to_string(
            "seq1",
            FetchOutcome::Found(Vec::new()),
            Some(FetchOutcome::Found(Vec::new())),
            60,
            Format::Fastq,
            MissingPolicy::Fail,
        )
        .unwrap();
        assert_eq!(text, "@seq1\n+\n");
    }

    #[test]
    fn test_not_found_skipped_writes_nothing() {
        let (status, text) = emit_to_string(
            "ghost",
            FetchOutcome::NotFound,
            None,
            60,
            Format::Fasta,
            MissingPolicy::Skip,
        )
        .unwrap();
        assert_eq!(status, EmitStatus::Skipped);
        assert_eq!(text, "");
    }

    #[test]
    fn test_not_found_fatal_by_default() {
        let result = emit_to_string(
            "ghost",
            FetchOutcome::NotFound,
            None,
            60,
            Format::Fasta,
            MissingPolicy::Fail,
        );
        assert!(matches!(result, Err(SeqfetchError::Fetch { .. })));
    }

    #[test]
    fn test_hard_failure_fatal_even_when_skipping() {
        let result = emit_to_string(
            "ghost",
            FetchOutcome::Failed("format mismatch".to_string()),
            None,
            60,
            Format::Fasta,
            MissingPolicy::Skip,
        );
        assert!(matches!(result, Err(SeqfetchError::Fetch { .. })));
    }

    #[test]
    fn test_exact_span_emits_without_truncation_warning() {
        // 10 bases for an explicit 10-base span; output must be complete
        // either way, the warning is only a diagnostic.
        let (status, text) = emit_to_string(
            "seq1:1-10",
            FetchOutcome::Found(b"ACGTACGTAC".to_vec()),
            None,
            60,
            Format::Fasta,
            MissingPolicy::Fail,
        )
        .unwrap();
        assert_eq!(status, EmitStatus::Written);
        assert_eq!(text, ">seq1:1-10\nACGTACGTAC\n");
    }

    #[test]
    fn test_truncated_span_still_emits() {
        let (status, text) = emit_to_string(
            "seq1:1-100",
            FetchOutcome::Found(b"ACGT".to_vec()),
            None,
            60,
            Format::Fasta,
            MissingPolicy::Fail,
        )
        .unwrap();
        assert_eq!(status, EmitStatus::Written);
        assert_eq!(text, ">seq1:1-100\nACGT\n");
    }

    #[test]
    fn test_effective_line_width() {
        assert_eq!(effective_line_width(60), 60);
        assert_eq!(effective_line_width(1), 1);
        assert_eq!(effective_line_width(0), DEFAULT_LINE_WIDTH);
        assert_eq!(effective_line_width(-7), DEFAULT_LINE_WIDTH);
    }

    // Property-based tests
    use proptest::prelude::*;

    proptest! {
        /// Wrapping produces ceil(len/width) lines of at most `width`
        /// bytes, and stripping the newlines reconstructs the input.
        #[test]
        fn test_wrap_reconstructs_input(
            bytes in proptest::collection::vec(33u8..=126, 0..500),
            width in 1usize..80,
        ) {
            let mut out = Vec::new();
            write_wrapped(&mut out, &bytes, width).unwrap();

            let lines: Vec<&[u8]> = if out.is_empty() {
                Vec::new()
            } else {
                out.strip_suffix(b"\n").unwrap().split(|&b| b == b'\n').collect()
            };

            let expected_lines = bytes.len().div_ceil(width);
            prop_assert_eq!(lines.len(), expected_lines);
            for (i, line) in lines.iter().enumerate() {
                if i + 1 < lines.len() {
                    prop_assert_eq!(line.len(), width);
                } else {
                    prop_assert!(line.len() <= width);
                }
            }

            let rejoined: Vec<u8> = lines.concat();
            prop_assert_eq!(rejoined, bytes);
        }
    }
}
