//! FAI index support for random access to FASTA/FASTQ sequences.
//!
//! This module provides the index provider behind region extraction:
//! building, loading and writing FAI index files, and fetching sequence
//! (and, for FASTQ, quality) bytes for a region token.
//!
//! # Format
//!
//! FAI files are tab-delimited text with 5 columns (FASTA) or 6 columns
//! (FASTQ):
//!
//! 1. **NAME**: Sequence name (first word after `>` or `@`)
//! 2. **LENGTH**: Total sequence length in bases
//! 3. **OFFSET**: Byte offset of the first base (after the header newline)
//! 4. **LINEBASES**: Number of bases per line
//! 5. **LINEWIDTH**: Number of bytes per line (including the newline)
//! 6. **QUALOFFSET**: (FASTQ only) Byte offset of the first quality score
//!
//! Quality strings share the sequence's line geometry; the format has a
//! single LINEBASES/LINEWIDTH pair per entry.
//!
//! # Example
//!
//! For a FASTA file:
//! ```text
//! >chr1
//! ACGTACGTACGTACGTACGTACGTACGT
//! TGCATGCATGCATGCA
//! >chr2
//! GGGGCCCCAAAATTTT
//! ```
//!
//! The corresponding FAI index:
//! ```text
//! chr1	44	6	28	29
//! chr2	16	58	16	17
//! ```
//!
//! # Fetching regions
//!
//! ```no_run
//! use seqfetch::fai::{FetchOutcome, IndexedReader};
//! use seqfetch::types::Format;
//!
//! # fn main() -> seqfetch::Result<()> {
//! // Loads genome.fa.fai, building it first if absent.
//! let reader = IndexedReader::load("genome.fa", Format::Fasta)?;
//!
//! match reader.fetch_sequence("chr1:1000-2000") {
//!     FetchOutcome::Found(bases) => println!("{} bp", bases.len()),
//!     FetchOutcome::NotFound => eprintln!("no such sequence"),
//!     FetchOutcome::Failed(reason) => eprintln!("fetch failed: {}", reason),
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use log::info;

use crate::error::{Result, SeqfetchError};
use crate::region;
use crate::types::Format;

/// A single entry in an FAI index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaiEntry {
    /// Sequence name (first word of the record header)
    pub name: String,
    /// Total sequence length in bases
    pub length: u64,
    /// Byte offset of the first base (after the header line)
    pub offset: u64,
    /// Number of bases per line
    pub line_bases: u32,
    /// Number of bytes per line (including the newline)
    pub line_width: u32,
    /// Byte offset of the first quality score (FASTQ only)
    pub qual_offset: Option<u64>,
}

impl FaiEntry {
    /// Parse a single FAI entry from a line.
    ///
    /// Format: `NAME\tLENGTH\tOFFSET\tLINEBASES\tLINEWIDTH[\tQUALOFFSET]`
    pub fn from_line(line: &str) -> Result<Self> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 5 {
            return Err(SeqfetchError::InvalidIndex {
                line: 0,
                msg: format!("expected at least 5 tab-separated fields, got {}", fields.len()),
            });
        }

        let qual_offset = if fields.len() > 5 {
            Some(parse_field(fields[5], "QUALOFFSET")?)
        } else {
            None
        };

        Ok(FaiEntry {
            name: fields[0].to_string(),
            length: parse_field(fields[1], "LENGTH")?,
            offset: parse_field(fields[2], "OFFSET")?,
            line_bases: parse_field(fields[3], "LINEBASES")?,
            line_width: parse_field(fields[4], "LINEWIDTH")?,
            qual_offset,
        })
    }

    /// Format the entry as an FAI line.
    pub fn to_line(&self) -> String {
        match self.qual_offset {
            Some(qual_offset) => format!(
                "{}\t{}\t{}\t{}\t{}\t{}",
                self.name, self.length, self.offset, self.line_bases, self.line_width, qual_offset
            ),
            None => format!(
                "{}\t{}\t{}\t{}\t{}",
                self.name, self.length, self.offset, self.line_bases, self.line_width
            ),
        }
    }

    /// Byte offset of a 0-based base position, accounting for line
    /// wrapping. `data_offset` is either the sequence or the quality
    /// offset; both share the entry's line geometry.
    fn byte_offset(&self, base: u64, data_offset: u64) -> u64 {
        if self.line_bases == 0 {
            return data_offset;
        }
        let line_bases = u64::from(self.line_bases);
        let line_width = u64::from(self.line_width);
        data_offset + (base / line_bases) * line_width + base % line_bases
    }

    /// Number of raw file bytes covering `[begin, end)`, newlines included.
    fn span_bytes(&self, begin: u64, end: u64, data_offset: u64) -> u64 {
        if begin >= end {
            return 0;
        }
        self.byte_offset(end - 1, data_offset) - self.byte_offset(begin, data_offset) + 1
    }
}

fn parse_field<T: std::str::FromStr>(text: &str, what: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    text.parse().map_err(|e| SeqfetchError::InvalidIndex {
        line: 0,
        msg: format!("invalid {} field: {}", what, e),
    })
}

/// Path of the FAI index file belonging to a sequence file: `{path}.fai`.
pub fn fai_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".fai");
    PathBuf::from(name)
}

/// FAI index over a FASTA or FASTQ file
///
/// Entries are addressable by name; the original file order is preserved
/// for writing the index back out.
#[derive(Debug, Clone, Default)]
pub struct FaiIndex {
    entries: HashMap<String, FaiEntry>,
    names: Vec<String>,
}

impl FaiIndex {
    /// Load an FAI index from a file.
    ///
    /// Blank lines and `#` comments are skipped.
    pub fn read_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        let mut index = Self::default();

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let entry = FaiEntry::from_line(&line).map_err(|e| match e {
                SeqfetchError::InvalidIndex { msg, .. } => SeqfetchError::InvalidIndex {
                    line: line_no + 1,
                    msg,
                },
                other => other,
            })?;
            index.insert(entry);
        }

        Ok(index)
    }

    /// Build an index by scanning a sequence file once.
    ///
    /// The format is detected from the first record byte: `>` for FASTA,
    /// `@` for FASTQ.
    pub fn build<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);

        let first = match reader.fill_buf()?.first() {
            Some(&b) => b,
            None => {
                return Err(SeqfetchError::InvalidFasta {
                    line: 1,
                    msg: "empty sequence file".to_string(),
                })
            }
        };

        match first {
            b'>' => build_fasta(reader),
            b'@' => build_fastq(reader),
            _ => Err(SeqfetchError::InvalidFasta {
                line: 1,
                msg: "expected '>' (FASTA) or '@' (FASTQ) at start of file".to_string(),
            }),
        }
    }

    /// Write the index to a file, entries in original order.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = File::create(path)?;
        for name in &self.names {
            if let Some(entry) = self.entries.get(name) {
                writeln!(file, "{}", entry.to_line())?;
            }
        }
        Ok(())
    }

    /// Get the entry for a sequence by name.
    pub fn get(&self, name: &str) -> Option<&FaiEntry> {
        self.entries.get(name)
    }

    /// Sequence names in index order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of sequences in the index.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no sequences.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, entry: FaiEntry) {
        self.names.push(entry.name.clone());
        self.entries.insert(entry.name.clone(), entry);
    }
}

/// Index entry under construction during a build scan.
struct PartialEntry {
    name: String,
    length: u64,
    offset: u64,
    line_bases: u32,
    line_width: u32,
    qual_offset: Option<u64>,
    // A short or blank line closes the body; further bases are an error.
    closed: bool,
}

impl PartialEntry {
    fn new(name: String, offset: u64) -> Self {
        Self {
            name,
            length: 0,
            offset,
            line_bases: 0,
            line_width: 0,
            qual_offset: None,
            closed: false,
        }
    }

    fn add_line(&mut self, bases: u64, width: u64) -> std::result::Result<(), String> {
        if self.closed {
            return Err("inconsistent sequence line length".to_string());
        }
        if self.line_bases == 0 {
            self.line_bases = bases as u32;
            self.line_width = width as u32;
        } else if bases > u64::from(self.line_bases) {
            return Err("sequence line longer than the first line".to_string());
        }
        if bases < u64::from(self.line_bases) {
            self.closed = true;
        }
        self.length += bases;
        Ok(())
    }

    fn into_entry(self) -> FaiEntry {
        FaiEntry {
            name: self.name,
            length: self.length,
            offset: self.offset,
            line_bases: self.line_bases,
            line_width: self.line_width,
            qual_offset: self.qual_offset,
        }
    }
}

fn header_name(header: &str) -> Option<String> {
    header.split_whitespace().next().map(str::to_string)
}

fn build_fasta<R: BufRead>(mut reader: R) -> Result<FaiIndex> {
    let mut index = FaiIndex::default();
    let mut line = String::new();
    let mut pos: u64 = 0;
    let mut line_no = 0usize;
    let mut current: Option<PartialEntry> = None;

    loop {
        line.clear();
        let n = reader.read_line(&mut line)?;
        if n == 0 {
            if let Some(entry) = current.take() {
                index.insert(entry.into_entry());
            }
            break;
        }
        line_no += 1;

        if line.starts_with('>') {
            if let Some(entry) = current.take() {
                index.insert(entry.into_entry());
            }
            let name = header_name(&line[1..]).ok_or_else(|| SeqfetchError::InvalidFasta {
                line: line_no,
                msg: "empty sequence name".to_string(),
            })?;
            if index.get(&name).is_some() {
                return Err(SeqfetchError::InvalidFasta {
                    line: line_no,
                    msg: format!("duplicate sequence name: {}", name),
                });
            }
            current = Some(PartialEntry::new(name, pos + n as u64));
        } else {
            let bases = line.trim_end().len() as u64;
            match current.as_mut() {
                Some(entry) if bases > 0 => {
                    entry
                        .add_line(bases, n as u64)
                        .map_err(|msg| SeqfetchError::InvalidFasta { line: line_no, msg })?;
                }
                Some(entry) => {
                    if entry.line_bases > 0 {
                        entry.closed = true;
                    }
                }
                None => {
                    return Err(SeqfetchError::InvalidFasta {
                        line: line_no,
                        msg: "sequence data before first header".to_string(),
                    })
                }
            }
        }

        pos += n as u64;
    }

    Ok(index)
}

fn build_fastq<R: BufRead>(mut reader: R) -> Result<FaiIndex> {
    let mut index = FaiIndex::default();
    let mut line = String::new();
    let mut pos: u64 = 0;
    let mut line_no = 0usize;

    loop {
        line.clear();
        let n = reader.read_line(&mut line)?;
        if n == 0 {
            break;
        }
        line_no += 1;
        if line.trim().is_empty() {
            pos += n as u64;
            continue;
        }
        if !line.starts_with('@') {
            return Err(SeqfetchError::InvalidFastq {
                line: line_no,
                msg: format!("expected '@' at start of header, got: {}", line.trim_end()),
            });
        }
        let name = header_name(&line[1..]).ok_or_else(|| SeqfetchError::InvalidFastq {
            line: line_no,
            msg: "empty sequence name".to_string(),
        })?;
        if index.get(&name).is_some() {
            return Err(SeqfetchError::InvalidFastq {
                line: line_no,
                msg: format!("duplicate sequence name: {}", name),
            });
        }
        pos += n as u64;
        let mut entry = PartialEntry::new(name, pos);

        // Sequence lines run until the '+' separator.
        loop {
            line.clear();
            let n = reader.read_line(&mut line)?;
            if n == 0 {
                return Err(SeqfetchError::InvalidFastq {
                    line: line_no,
                    msg: "unexpected end of file before '+' separator".to_string(),
                });
            }
            line_no += 1;
            pos += n as u64;
            if line.starts_with('+') {
                break;
            }
            let bases = line.trim_end().len() as u64;
            if bases == 0 {
                return Err(SeqfetchError::InvalidFastq {
                    line: line_no,
                    msg: "blank line inside record".to_string(),
                });
            }
            entry
                .add_line(bases, n as u64)
                .map_err(|msg| SeqfetchError::InvalidFastq { line: line_no, msg })?;
        }

        entry.qual_offset = Some(pos);

        // Quality lines run until they cover the sequence length.
        let mut qual_len: u64 = 0;
        while qual_len < entry.length {
            line.clear();
            let n = reader.read_line(&mut line)?;
            if n == 0 {
                return Err(SeqfetchError::InvalidFastq {
                    line: line_no,
                    msg: "quality string shorter than sequence".to_string(),
                });
            }
            line_no += 1;
            pos += n as u64;
            qual_len += line.trim_end().len() as u64;
        }
        if qual_len > entry.length {
            return Err(SeqfetchError::InvalidFastq {
                line: line_no,
                msg: format!(
                    "quality length ({}) != sequence length ({})",
                    qual_len, entry.length
                ),
            });
        }

        index.insert(entry.into_entry());
    }

    Ok(index)
}

/// Result of fetching a region from an [`IndexedReader`].
///
/// Replaces the length-sign error channel of C faidx implementations with
/// an explicit tagged result; callers never inspect raw lengths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The region resolved; the bytes may be empty for an out-of-range or
    /// zero-length region.
    Found(Vec<u8>),
    /// The region names no sequence in the index.
    NotFound,
    /// The fetch failed hard: format mismatch or I/O error.
    Failed(String),
}

impl FetchOutcome {
    /// Whether the fetch produced bytes.
    pub fn is_found(&self) -> bool {
        matches!(self, FetchOutcome::Found(_))
    }
}

/// Random-access reader over an indexed sequence file
///
/// Holds the parsed index; each fetch opens the sequence file, seeks to
/// the computed byte offset and strips line terminators from the raw span.
#[derive(Debug)]
pub struct IndexedReader {
    path: PathBuf,
    index: FaiIndex,
    format: Format,
}

enum FetchKind {
    Sequence,
    Quality,
}

impl IndexedReader {
    /// Load the index for `path` under the declared format.
    ///
    /// Reads `{path}.fai` if it exists; otherwise builds the index from
    /// the sequence file and writes it alongside.
    pub fn load<P: AsRef<Path>>(path: P, format: Format) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let fai_path = fai_path_for(&path);
        let index = if fai_path.exists() {
            FaiIndex::read_from(&fai_path)?
        } else {
            info!("index {} does not exist, building it", fai_path.display());
            let index = FaiIndex::build(&path)?;
            index.write_to(&fai_path)?;
            index
        };
        Ok(Self { path, index, format })
    }

    /// The loaded index.
    pub fn index(&self) -> &FaiIndex {
        &self.index
    }

    /// The declared format of the underlying file.
    pub fn format(&self) -> Format {
        self.format
    }

    /// Fetch the sequence bytes for a region token.
    pub fn fetch_sequence(&self, token: &str) -> FetchOutcome {
        self.fetch(token, FetchKind::Sequence)
    }

    /// Fetch the quality bytes for a region token (FASTQ only).
    pub fn fetch_quality(&self, token: &str) -> FetchOutcome {
        if self.format != Format::Fastq {
            return FetchOutcome::Failed("quality requested from a FASTA reader".to_string());
        }
        self.fetch(token, FetchKind::Quality)
    }

    fn fetch(&self, token: &str, kind: FetchKind) -> FetchOutcome {
        let (entry, begin, end) = match self.resolve(token) {
            Some(resolved) => resolved,
            None => return FetchOutcome::NotFound,
        };

        let data_offset = match kind {
            FetchKind::Sequence => entry.offset,
            FetchKind::Quality => match entry.qual_offset {
                Some(offset) => offset,
                None => {
                    return FetchOutcome::Failed(format!(
                        "no quality data indexed for {}",
                        entry.name
                    ))
                }
            },
        };

        match self.read_span(entry, data_offset, begin, end) {
            Ok(bytes) => FetchOutcome::Found(bytes),
            Err(e) => FetchOutcome::Failed(e.to_string()),
        }
    }

    /// Resolve a region token against the index.
    ///
    /// A whole-token name match wins (names may contain `:`); otherwise
    /// the token is parsed as `name[:start[-end]]` and coordinates are
    /// clamped to the sequence, so an out-of-range start yields an empty
    /// span and an oversized end a shortened one.
    fn resolve(&self, token: &str) -> Option<(&FaiEntry, u64, u64)> {
        if let Some(entry) = self.index.get(token) {
            return Some((entry, 0, entry.length));
        }
        let region = region::parse(token)?;
        let entry = self.index.get(region.name)?;
        let begin = region.begin.min(entry.length);
        let end = region.end.min(entry.length).max(begin);
        Some((entry, begin, end))
    }

    fn read_span(&self, entry: &FaiEntry, data_offset: u64, begin: u64, end: u64) -> Result<Vec<u8>> {
        let count = (end - begin) as usize;
        if count == 0 {
            return Ok(Vec::new());
        }

        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(entry.byte_offset(begin, data_offset)))?;

        let raw_len = entry.span_bytes(begin, end, data_offset) as usize;
        let mut raw = vec![0u8; raw_len];
        file.read_exact(&mut raw)?;

        raw.retain(|&b| b != b'\n' && b != b'\r');
        raw.truncate(count);
        Ok(raw)
    }
}
