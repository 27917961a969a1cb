//! Extraction driver
//!
//! Walks a region source, fetches each token from the index and hands the
//! outcomes to the emitter. One region is fully resolved and emitted
//! before the next is read; no fetch buffer is held across iterations.

use std::io::Write;

use crate::emit;
use crate::error::Result;
use crate::fai::IndexedReader;
use crate::types::{Format, MissingPolicy};

/// Settings for one extraction run, fixed before the first fetch.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Bases per output body line.
    pub line_width: usize,
    /// Output record format.
    pub format: Format,
    /// What to do when a region is not in the index.
    pub missing: MissingPolicy,
}

/// Fetch and emit every region produced by `regions`.
///
/// Stops at the first fatal outcome; tolerated missing regions are skipped
/// and iteration continues. The sink is not flushed here — the caller
/// flushes once at end of run.
pub fn extract_regions<W, I>(
    reader: &IndexedReader,
    regions: I,
    out: &mut W,
    opts: &ExtractOptions,
) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = Result<String>>,
{
    for token in regions {
        let token = token?;
        let sequence = reader.fetch_sequence(&token);
        let quality = match opts.format {
            Format::Fastq if sequence.is_found() => Some(reader.fetch_quality(&token)),
            _ => None,
        };
        emit::emit_record(
            out,
            &token,
            &sequence,
            quality.as_ref(),
            opts.line_width,
            opts.format,
            opts.missing,
        )?;
    }
    Ok(())
}
