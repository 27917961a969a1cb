//! Region specifier parsing
//!
//! A region token names a sequence, optionally suffixed with a 1-based
//! inclusive coordinate range:
//!
//! ```text
//! chr1            whole sequence
//! chr1:100        single base
//! chr1:100-200    closed span
//! chr1:100-       open-ended span
//! ```
//!
//! Digit groups may contain `,` separators (`chr1:1,000-2,000`).
//!
//! Parsing is deliberately forgiving: a token that does not match the
//! grammar is not an error, it simply denotes a whole-sequence region.
//! Coordinates are converted to 0-based, half-open form; an unspecified or
//! open end becomes the [`OPEN_END`] sentinel so that callers can tell an
//! explicit closed span apart from "to the end of the sequence".

/// Sentinel end coordinate for open-ended ranges.
pub const OPEN_END: u64 = u64::MAX;

/// A parsed region specifier: sequence name plus a 0-based, half-open
/// coordinate interval `[begin, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region<'a> {
    /// Sequence name (everything before the final `:`).
    pub name: &'a str,
    /// Start position, 0-based inclusive.
    pub begin: u64,
    /// End position, 0-based exclusive, or [`OPEN_END`] for open ranges.
    pub end: u64,
}

impl Region<'_> {
    /// Number of bases an explicit closed span covers, or `None` for an
    /// open-ended range.
    pub fn span(&self) -> Option<u64> {
        (self.end != OPEN_END).then(|| self.end - self.begin)
    }
}

/// Parse a region token of the form `name:start[-[end]]`.
///
/// Returns `None` when the token carries no parseable coordinate range:
/// no `:`, an empty name, a zero or non-numeric coordinate, or `end`
/// before `start`. Callers treat `None` as a whole-sequence region.
pub fn parse(token: &str) -> Option<Region<'_>> {
    let (name, range) = token.rsplit_once(':')?;
    if name.is_empty() {
        return None;
    }

    let (start_text, end_text) = match range.split_once('-') {
        Some((s, e)) => (s, Some(e)),
        None => (range, None),
    };

    let start = parse_coord(start_text)?;
    if start == 0 {
        return None;
    }

    let end = match end_text {
        // `name:start` selects the single base at `start`.
        None => start,
        Some("") => OPEN_END,
        Some(text) => {
            let end = parse_coord(text)?;
            if end < start {
                return None;
            }
            end
        }
    };

    Some(Region {
        name,
        begin: start - 1,
        end,
    })
}

fn parse_coord(text: &str) -> Option<u64> {
    let mut value: u64 = 0;
    let mut digits = 0usize;
    for c in text.chars() {
        match c {
            '0'..='9' => {
                value = value
                    .checked_mul(10)?
                    .checked_add(c as u64 - '0' as u64)?;
                digits += 1;
            }
            ',' => {}
            _ => return None,
        }
    }
    (digits > 0).then_some(value)
}
