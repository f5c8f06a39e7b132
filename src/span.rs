// Source spans
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

//! Mapping to source input byte intervals.
//!
//! A [`Span`] is a byte interval within the document being transformed,
//!   representing where some event or error originated.
//! Spans are resolved to line and column numbers only when a diagnostic
//!   is actually rendered;
//!     see [`crate::diagnose`].
//!
//! Since a transformation operates on a single document,
//!   a span does not carry a reference to its source;
//!     the [`SpanResolver`](crate::diagnose::SpanResolver) is told which
//!     document it is reading.

use std::fmt::{self, Display};

/// A byte interval within the input document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    offset: u32,
    len: u32,
}

const_assert!(std::mem::size_of::<Span>() <= std::mem::size_of::<u64>());

/// A span that does not correspond to any meaningful location.
///
/// This is used when a location is not known,
///   such as for errors raised after the input has been exhausted.
pub const UNKNOWN_SPAN: Span = Span { offset: 0, len: 0 };

impl Span {
    pub const fn new(offset: u32, len: u32) -> Self {
        Self { offset, len }
    }

    /// Create a span from a pair of byte positions as reported by the
    ///   XML reader.
    ///
    /// Positions beyond what can be represented are saturated rather than
    ///   wrapped,
    ///     so that a diagnostic will at worst point to the wrong place
    ///     near the end of an enormous document.
    pub fn from_positions(start: usize, end: usize) -> Self {
        let offset = u32::try_from(start).unwrap_or(u32::MAX);
        let len = u32::try_from(end.saturating_sub(start)).unwrap_or(u32::MAX);

        Self { offset, len }
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Byte offset immediately following the span.
    pub fn end(&self) -> u32 {
        self.offset.saturating_add(self.len)
    }
}

impl From<&Span> for Span {
    fn from(span: &Span) -> Self {
        *span
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}-{}]", self.offset, self.end())
    }
}
