// Span resolution
//
//  Copyright (C) 2014-2023 Ryan Specialty, LLC.
//
//  This file is part of sldyaml.
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Resolve [`Span`]s into line:column source locations.
//!
//! A [`Span`] holds only raw byte offsets gathered during the transform.
//! Those offsets are resolved by reading the source document a second
//!   time,
//!     which is only done when a diagnostic is rendered.
//! This means that the source must be able to be read again;
//!   input that was piped in cannot be resolved and the report falls
//!   back to raw offsets.

use crate::span::Span;
use std::{
    error::Error,
    fmt::{self, Display},
    fs,
    io::{self, BufRead, BufReader, Seek},
    num::NonZeroU32,
    path::{Path, PathBuf},
};
use unicode_width::UnicodeWidthChar;

/// Resolves [`Span`]s into line:column source locations.
pub trait SpanResolver {
    /// Human-readable name of the document that spans refer to,
    ///   used in report headings.
    fn context(&self) -> &str;

    /// Resolve the provided [`Span`] into a line:column source location.
    fn resolve(&mut self, span: Span) -> Result<ResolvedSpan, SpanResolverError>;
}

/// Source column offsets.
///
/// A "column" is a terminal cell;
///   wide characters occupy more than one and combining characters none.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Column {
    /// Inclusive first and last columns of a non-empty span.
    Endpoints(NonZeroU32, NonZeroU32),

    /// The span is empty and lies immediately before this column.
    Before(NonZeroU32),
}

impl Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Coerces to a single column number.
            Self::Endpoints(at, _) | Self::Before(at) => Display::fmt(at, f),
        }
    }
}

/// A [`Span`] resolved to its source location.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ResolvedSpan {
    pub span: Span,
    pub line_num: NonZeroU32,

    /// Column(s) of the span on its first line,
    ///   or [`None`] if the line is not valid UTF-8.
    pub col: Option<Column>,
}

/// Resolve spans by reading from any seekable buffered source.
///
/// The source is rewound for each resolution.
#[derive(Debug)]
pub struct BufSpanResolver<R: BufRead + Seek> {
    name: String,
    reader: R,
}

impl<R: BufRead + Seek> BufSpanResolver<R> {
    pub fn new<S: Into<String>>(name: S, reader: R) -> Self {
        Self {
            name: name.into(),
            reader,
        }
    }
}

impl<R: BufRead + Seek> SpanResolver for BufSpanResolver<R> {
    fn context(&self) -> &str {
        &self.name
    }

    fn resolve(&mut self, span: Span) -> Result<ResolvedSpan, SpanResolverError> {
        self.reader.rewind()?;

        let offset = u64::from(span.offset());
        let mut buf = Vec::new();
        let mut line_start = 0u64;
        let mut num = 0u32;

        loop {
            buf.clear();
            let n = self.reader.read_until(b'\n', &mut buf)?;
            num = num.saturating_add(1);

            let line_end = line_start + n as u64;

            // A span at EOF belongs to the final line.
            let at_eof = offset == line_end && !buf.ends_with(b"\n");

            if offset < line_end || at_eof {
                let rel = (offset - line_start) as usize;
                let rel_end = (u64::from(span.end()) - line_start) as usize;

                return Ok(ResolvedSpan {
                    span,
                    line_num: NonZeroU32::MIN.saturating_add(num - 1),
                    col: column(trim_eol(&buf), rel, rel_end),
                });
            }

            if n == 0 {
                return Err(SpanResolverError::OutOfRange(line_start));
            }

            line_start = line_end;
        }
    }
}

/// Resolve spans by re-opening a file on the filesystem.
#[derive(Debug)]
pub struct FsSpanResolver {
    path: PathBuf,
    name: String,
}

impl FsSpanResolver {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            name: path.as_ref().display().to_string(),
        }
    }
}

impl SpanResolver for FsSpanResolver {
    fn context(&self) -> &str {
        &self.name
    }

    fn resolve(&mut self, span: Span) -> Result<ResolvedSpan, SpanResolverError> {
        let file = BufReader::new(fs::File::open(&self.path)?);
        BufSpanResolver::new(self.name.as_str(), file).resolve(span)
    }
}

fn trim_eol(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Compute the columns of the line-relative byte interval `rel..rel_end`.
fn column(line: &[u8], rel: usize, rel_end: usize) -> Option<Column> {
    let rel = rel.min(line.len());
    let rel_end = rel_end.clamp(rel, line.len());

    let start = width(line.get(..rel)?)?;
    let first = NonZeroU32::MIN.saturating_add(start);

    if rel_end == rel {
        return Some(Column::Before(first));
    }

    let end = width(line.get(..rel_end)?)?;
    let last = NonZeroU32::MIN.saturating_add(end.saturating_sub(1));

    Some(Column::Endpoints(first, last.max(first)))
}

fn width(bytes: &[u8]) -> Option<u32> {
    let s = std::str::from_utf8(bytes).ok()?;
    let cells: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();

    u32::try_from(cells).ok()
}

/// Failure to resolve a [`Span`].
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum SpanResolverError {
    Io(io::ErrorKind),

    /// The [`Span`] begins beyond the end of the source.
    ///
    /// The provided value is the length of the source in bytes.
    OutOfRange(u64),
}

impl From<io::Error> for SpanResolverError {
    fn from(e: io::Error) -> Self {
        Self::Io(e.kind())
    }
}

impl Display for SpanResolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(kind) => write!(f, "I/O error: {kind}"),
            Self::OutOfRange(eof) => {
                write!(f, "span exceeds the end of the source at byte {eof}")
            }
        }
    }
}

impl Error for SpanResolverError {}
