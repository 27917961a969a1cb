//! Command-line surface shared by the `seqfetch` and `fqfetch` binaries
//!
//! The two personas differ only in their default format and in whether
//! the `--fastq` override is offered. All options live in a common
//! argument struct flattened into one parser per persona; the binaries
//! call [`run_fasta`] or [`run_fastq`].

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser};

use crate::emit;
use crate::error::{Result, SeqfetchError};
use crate::extract::{extract_regions, ExtractOptions};
use crate::fai::{fai_path_for, FaiIndex, IndexedReader};
use crate::sink::OutputSink;
use crate::source::RegionLines;
use crate::types::{Format, MissingPolicy};

/// Options common to both personas.
#[derive(Debug, clap::Args)]
pub struct CommonArgs {
    /// Write output to FILE instead of standard output.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Length of output sequence lines.
    #[arg(
        short = 'n',
        long = "length",
        value_name = "INT",
        default_value_t = emit::DEFAULT_LINE_WIDTH as i64,
        allow_negative_numbers = true
    )]
    pub length: i64,

    /// Continue after trying to retrieve a missing region.
    #[arg(short = 'c', long = "continue")]
    pub continue_on_missing: bool,

    /// File of regions. Format is name:from-to, one per line.
    #[arg(short = 'r', long, value_name = "FILE")]
    pub region_file: Option<PathBuf>,

    /// Indexed sequence file.
    #[arg(value_name = "FILE")]
    pub path: Option<PathBuf>,

    /// Regions to extract, `name` or `name:start-end`.
    #[arg(value_name = "REGION")]
    pub regions: Vec<String>,
}

/// FASTA persona: `seqfetch <file.fa> [region...]`.
#[derive(Debug, Parser)]
#[command(
    name = "seqfetch",
    version,
    about = "Extract regions from an indexed FASTA file"
)]
pub struct FastaArgs {
    #[command(flatten)]
    #[allow(missing_docs)]
    pub common: CommonArgs,

    /// File and index are in FASTQ format.
    #[arg(short = 'f', long)]
    pub fastq: bool,
}

/// FASTQ persona: `fqfetch <file.fq> [region...]`.
#[derive(Debug, Parser)]
#[command(
    name = "fqfetch",
    version,
    about = "Extract regions from an indexed FASTQ file"
)]
pub struct FastqArgs {
    #[command(flatten)]
    #[allow(missing_docs)]
    pub common: CommonArgs,
}

/// How a run uses the index: build it and stop, or load it and extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Build the index for the path argument; no extraction.
    Build,
    /// Load the index and extract the requested regions.
    Extract,
}

impl Mode {
    /// Build only when nothing asked for extraction: a bare path with no
    /// region tokens and no region file.
    pub fn select(has_region_file: bool, region_count: usize) -> Self {
        if !has_region_file && region_count == 0 {
            Mode::Build
        } else {
            Mode::Extract
        }
    }
}

/// Entry point for the FASTA persona.
pub fn run_fasta() -> Result<()> {
    let args = FastaArgs::parse();
    let Some(path) = args.common.path.clone() else {
        return print_usage::<FastaArgs>();
    };
    let format = if args.fastq {
        Format::Fastq
    } else {
        Format::Fasta
    };
    run(&path, args.common, format)
}

/// Entry point for the FASTQ persona.
pub fn run_fastq() -> Result<()> {
    let args = FastqArgs::parse();
    let Some(path) = args.common.path.clone() else {
        return print_usage::<FastqArgs>();
    };
    run(&path, args.common, Format::Fastq)
}

// Invoked with no path argument: usage goes to stdout and the run ends
// neutrally, matching `--help`.
fn print_usage<T: CommandFactory>() -> Result<()> {
    T::command().print_help()?;
    Ok(())
}

/// Execute one run against a path under the selected format.
pub fn run(path: &Path, args: CommonArgs, format: Format) -> Result<()> {
    match Mode::select(args.region_file.is_some(), args.regions.len()) {
        Mode::Build => build_index(path),
        Mode::Extract => extract(path, args, format),
    }
}

fn build_index(path: &Path) -> Result<()> {
    let wrap = |source: SeqfetchError| SeqfetchError::BuildIndex {
        path: path.to_path_buf(),
        source: Box::new(source),
    };
    let index = FaiIndex::build(path).map_err(wrap)?;
    index.write_to(fai_path_for(path)).map_err(wrap)?;
    Ok(())
}

fn extract(path: &Path, args: CommonArgs, format: Format) -> Result<()> {
    let reader = IndexedReader::load(path, format).map_err(|source| SeqfetchError::LoadIndex {
        path: path.to_path_buf(),
        source: Box::new(source),
    })?;

    let sink = OutputSink::from_arg(args.output);
    let mut out = sink.open(path)?;

    let opts = ExtractOptions {
        line_width: emit::effective_line_width(args.length),
        format,
        missing: if args.continue_on_missing {
            MissingPolicy::Skip
        } else {
            MissingPolicy::Fail
        },
    };

    // Regions from the list file come first, then any positional tokens,
    // against the same reader and sink.
    if let Some(region_file) = &args.region_file {
        let lines = RegionLines::from_path(region_file)?;
        extract_regions(&reader, lines, &mut out, &opts)?;
    }
    extract_regions(&reader, args.regions.into_iter().map(Ok), &mut out, &opts)?;

    out.flush()
        .map_err(|source| SeqfetchError::FlushOutput { source })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_selection() {
        assert_eq!(Mode::select(false, 0), Mode::Build);
        assert_eq!(Mode::select(false, 1), Mode::Extract);
        assert_eq!(Mode::select(true, 0), Mode::Extract);
        assert_eq!(Mode::select(true, 3), Mode::Extract);
    }

    #[test]
    fn test_parse_fasta_persona() {
        let args = FastaArgs::try_parse_from([
            "seqfetch", "-c", "-n", "80", "-o", "out.fa", "genome.fa", "chr1", "chr2:1-100",
        ])
        .unwrap();

        assert!(args.common.continue_on_missing);
        assert_eq!(args.common.length, 80);
        assert_eq!(args.common.output, Some(PathBuf::from("out.fa")));
        assert_eq!(args.common.path, Some(PathBuf::from("genome.fa")));
        assert_eq!(args.common.regions, ["chr1", "chr2:1-100"]);
        assert!(!args.fastq);
    }

    #[test]
    fn test_fastq_persona_rejects_override_flag() {
        assert!(FastqArgs::try_parse_from(["fqfetch", "-f", "reads.fq"]).is_err());
    }

    #[test]
    fn test_unknown_option_is_an_error() {
        assert!(FastaArgs::try_parse_from(["seqfetch", "--bogus", "genome.fa"]).is_err());
    }

    #[test]
    fn test_length_default() {
        let args = FastaArgs::try_parse_from(["seqfetch", "genome.fa"]).unwrap();
        assert_eq!(args.common.length, 60);
    }
}
