// YAML block writer
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

//! Lower a [`YamlEvent`] stream into block-style YAML via [`Write`].
//!
//! The writer is a finite state machine;
//!   [`WriterState`] tracks where the cursor sits relative to the last
//!     thing written so that no lookahead is required.
//! Nesting is tracked by a stack of frames that know their indentation
//!   and whether a mapping is awaiting a key or a value.
//!
//! Layout conventions:
//!
//!   - A mapping that is the value of a key is indented two columns
//!       deeper than that key.
//!   - A sequence that is the value of a key is _not_ indented;
//!       its dashes align with the key.
//!   - A collection that is an item of a sequence begins on the line of
//!       its dash.
//!   - Empty collections are written in flow style as `{}` and `[]`.

use super::{Emitter, YamlEvent};
use fxhash::FxHashSet;
use memchr::memmem;
use std::{
    borrow::Cow,
    fmt::{self, Display},
    io::{Error as IoError, Write},
    result,
};

pub type Result<T = ()> = result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Io(IoError),
    UnexpectedEvent(YamlEvent, WriterState),

    /// A mapping received the same key twice.
    DuplicateKey(String),

    /// The document ended with this many collections still open.
    Unbalanced(usize),
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => e.fmt(f),
            Self::UnexpectedEvent(ev, state) => {
                write!(f, "unexpected {ev} while YAML writer is {state}")
            }
            Self::DuplicateKey(key) => {
                write!(f, "duplicate key `{key}` in YAML mapping")
            }
            Self::Unbalanced(n) => {
                write!(f, "YAML document ended with {n} unclosed collection(s)")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Self::Io(e)
    }
}

/// Position of the cursor relative to previous output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriterState {
    /// No document has been started.
    #[default]
    DocumentExpected,
    /// Cursor is at the beginning of an empty line.
    LineStart,
    /// Cursor is adjacent to `key:` and a value is expected.
    AfterKey,
    /// Cursor is adjacent to `- ` and an item is expected.
    AfterDash,
    /// The document has ended and nothing more may be written.
    DocumentEnded,
}

impl Display for WriterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DocumentExpected => write!(f, "awaiting a document"),
            Self::LineStart => write!(f, "at the start of a line"),
            Self::AfterKey => write!(f, "awaiting a mapping value"),
            Self::AfterDash => write!(f, "awaiting a sequence item"),
            Self::DocumentEnded => write!(f, "past the end of the document"),
        }
    }
}

#[derive(Debug)]
enum Frame {
    Mapping {
        indent: usize,
        keys: FxHashSet<String>,
        /// A key has been written and its value is expected.
        value_pending: bool,
    },
    Sequence {
        indent: usize,
        len: usize,
    },
}

/// Write a block-style YAML representation of a [`YamlEvent`] stream.
pub struct YamlWriter<W: Write> {
    sink: W,
    state: WriterState,
    frames: Vec<Frame>,

    /// Whether the root node of the document has been written.
    root: bool,
}

impl<W: Write> YamlWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            state: WriterState::default(),
            frames: Vec::new(),
            root: false,
        }
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    /// Move the cursor to where a new node belongs,
    ///   returning the indentation for the children of a collection
    ///   beginning at that node.
    ///
    /// If the node is a key,
    ///   it is written here and [`None`] is returned.
    fn place(&mut self, ev: &YamlEvent) -> Result<Option<usize>> {
        let state = self.state;

        match self.frames.last_mut() {
            None if self.root => Err(Error::UnexpectedEvent(ev.clone(), state)),
            None => {
                self.root = true;
                Ok(Some(0))
            }

            Some(Frame::Mapping {
                indent,
                value_pending: true,
                ..
            }) => Ok(Some(match ev {
                // Indentless.
                YamlEvent::SequenceStart => *indent,
                _ => *indent + 2,
            })),

            Some(Frame::Mapping {
                indent,
                keys,
                value_pending,
            }) => {
                let key = match ev {
                    YamlEvent::Scalar(key) => key,
                    _ => return Err(Error::UnexpectedEvent(ev.clone(), state)),
                };

                if !keys.insert(key.clone()) {
                    return Err(Error::DuplicateKey(key.clone()));
                }

                *value_pending = true;
                let indent = *indent;

                self.newline_indent(indent)?;
                write!(self.sink, "{}:", quote(key))?;
                self.state = WriterState::AfterKey;

                Ok(None)
            }

            Some(Frame::Sequence { indent, len }) => {
                *len += 1;
                let indent = *indent;

                self.newline_indent(indent)?;
                self.sink.write_all(b"- ")?;
                self.state = WriterState::AfterDash;

                Ok(Some(indent + 2))
            }
        }
    }

    /// Begin a line at the given indentation unless the cursor is already
    ///   positioned after a dash,
    ///     where a collection's first entry is written inline.
    fn newline_indent(&mut self, indent: usize) -> Result {
        match self.state {
            WriterState::AfterKey => {
                write!(self.sink, "\n{:indent$}", "")?;
            }
            WriterState::LineStart => {
                write!(self.sink, "{:indent$}", "")?;
            }
            _ => (),
        }

        Ok(())
    }

    /// Note that the value of the current collection entry is complete.
    fn complete(&mut self) {
        if let Some(Frame::Mapping { value_pending, .. }) = self.frames.last_mut()
        {
            *value_pending = false;
        }
    }

    fn scalar(&mut self, ev: YamlEvent) -> Result {
        if self.place(&ev)?.is_none() {
            return Ok(());
        }

        let YamlEvent::Scalar(value) = &ev else {
            return Err(Error::UnexpectedEvent(ev, self.state));
        };

        match self.state {
            WriterState::AfterKey => write!(self.sink, " {}\n", quote(value))?,
            _ => write!(self.sink, "{}\n", quote(value))?,
        }

        self.state = WriterState::LineStart;
        self.complete();

        Ok(())
    }

    fn open(&mut self, ev: YamlEvent) -> Result {
        // Collections cannot be keys,
        //   so `place` will have rejected them before writing anything.
        let Some(indent) = self.place(&ev)? else {
            return Err(Error::UnexpectedEvent(ev, self.state));
        };

        self.frames.push(match ev {
            YamlEvent::MappingStart => Frame::Mapping {
                indent,
                keys: FxHashSet::default(),
                value_pending: false,
            },
            _ => Frame::Sequence { indent, len: 0 },
        });

        Ok(())
    }

    fn close(&mut self, ev: YamlEvent) -> Result {
        let empty = match (&ev, self.frames.last()) {
            (
                YamlEvent::MappingEnd,
                Some(Frame::Mapping {
                    keys,
                    value_pending: false,
                    ..
                }),
            ) => keys.is_empty().then_some("{}"),
            (YamlEvent::SequenceEnd, Some(Frame::Sequence { len, .. })) => {
                (*len == 0).then_some("[]")
            }
            _ => return Err(Error::UnexpectedEvent(ev, self.state)),
        };

        self.frames.pop();

        if let Some(flow) = empty {
            match self.state {
                WriterState::AfterKey => write!(self.sink, " {flow}\n")?,
                _ => write!(self.sink, "{flow}\n")?,
            }

            self.state = WriterState::LineStart;
        }

        self.complete();

        Ok(())
    }
}

impl<W: Write> Emitter for YamlWriter<W> {
    fn emit(&mut self, ev: YamlEvent) -> Result {
        use WriterState::*;

        match (self.state, ev) {
            (DocumentExpected, YamlEvent::DocumentStart) => {
                self.state = LineStart;
                Ok(())
            }

            (state @ (DocumentExpected | DocumentEnded), ev)
            | (state, ev @ YamlEvent::DocumentStart) => {
                Err(Error::UnexpectedEvent(ev, state))
            }

            (_, YamlEvent::DocumentEnd) => {
                if !self.frames.is_empty() {
                    return Err(Error::Unbalanced(self.frames.len()));
                }

                self.state = DocumentEnded;
                self.sink.flush()?;

                Ok(())
            }

            (_, ev @ YamlEvent::Scalar(_)) => self.scalar(ev),

            (_, ev @ (YamlEvent::MappingStart | YamlEvent::SequenceStart)) => {
                self.open(ev)
            }

            (_, ev @ (YamlEvent::MappingEnd | YamlEvent::SequenceEnd)) => {
                self.close(ev)
            }
        }
    }
}

/// Characters that may not begin a plain scalar.
const INDICATORS: &[u8] = b"-?:,[]{}#&*!|>'\"%@`";

/// Represent a scalar in the least noisy style that preserves its value.
///
/// Plain style is used when the text cannot be confused with YAML
///   syntax;
///     otherwise single quotes,
///     or double quotes with escapes if the text contains control
///       characters
///       (including line breaks).
/// No attempt is made to preserve type;
///   a string `6` is written plain and will read back as an integer,
///     which is the intent for style values.
pub fn quote(s: &str) -> Cow<str> {
    if s.chars().any(char::is_control) {
        return Cow::Owned(double_quote(s));
    }

    if is_plain_safe(s.as_bytes()) {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(format!("'{}'", s.replace('\'', "''")))
    }
}

fn is_plain_safe(bytes: &[u8]) -> bool {
    let (first, last) = match (bytes.first(), bytes.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return false,
    };

    if first == b' ' || last == b' ' || last == b':' {
        return false;
    }

    if INDICATORS.contains(&first) {
        // `-5` and `?x` are plain;
        //   `- x` begins a sequence entry.
        let lone = matches!(first, b'-' | b'?' | b':')
            && bytes.get(1).map_or(false, |next| *next != b' ');

        if !lone {
            return false;
        }
    }

    memmem::find(bytes, b": ").is_none() && memmem::find(bytes, b" #").is_none()
}

fn double_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');

    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() && (c as u32) < 0x100 => {
                out.push_str(&format!("\\x{:02X}", c as u32))
            }
            c if c.is_control() => {
                out.push_str(&format!("\\u{:04X}", c as u32))
            }
            c => out.push(c),
        }
    }

    out.push('"');
    out
}
