//! seqfetch: indexed FASTA/FASTQ region extraction
//!
//! # Overview
//!
//! seqfetch pulls named or coordinate-bounded subsequences out of a large
//! sequence file through an FAI index and emits them as framed,
//! line-wrapped FASTA/FASTQ records. It ships as a library plus two thin
//! binaries, `seqfetch` (FASTA) and `fqfetch` (FASTQ), sharing one core.
//!
//! ## Quick Start
//!
//! ```no_run
//! use seqfetch::{Format, IndexedReader};
//! use seqfetch::fai::FetchOutcome;
//!
//! # fn main() -> seqfetch::Result<()> {
//! // Load genome.fa.fai, building it first if absent.
//! let reader = IndexedReader::load("genome.fa", Format::Fasta)?;
//!
//! if let FetchOutcome::Found(bases) = reader.fetch_sequence("chr1:1-1000") {
//!     println!("{} bp", bases.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`fai`]: FAI index build/load/write and random-access fetching
//! - [`region`]: `name[:start-end]` specifier parsing
//! - [`source`]: region token sources (positional, region-list file)
//! - [`emit`]: record framing and line wrapping
//! - [`extract`]: the fetch-and-emit driver
//! - [`sink`]: output destinations
//! - [`cli`]: the command-line surface of both binaries

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod cli;
pub mod emit;
pub mod error;
pub mod extract;
pub mod fai;
pub mod region;
pub mod sink;
pub mod source;
pub mod types;

// Re-export commonly used types
pub use error::{Result, SeqfetchError};
pub use fai::{FaiEntry, FaiIndex, FetchOutcome, IndexedReader};
pub use types::{Format, MissingPolicy};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
