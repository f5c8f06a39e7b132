// YAML structural events
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

//! Structural events produced by the transformer.
//!
//! The transformer never builds a YAML tree;
//!   it emits a stream of [`YamlEvent`]s to an [`Emitter`],
//!     which is responsible for serialization.
//! See [`writer::YamlWriter`] for block-style text output.
//!
//! Events must nest properly:
//!   every [`YamlEvent::MappingStart`] and [`YamlEvent::SequenceStart`]
//!   must be closed by its respective end event,
//!     and mappings alternate between keys and values.

pub mod writer;

pub use writer::{Error, WriterState, YamlWriter};

use std::fmt::{self, Display};

/// An instruction to a YAML serializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YamlEvent {
    DocumentStart,
    DocumentEnd,
    MappingStart,
    MappingEnd,
    SequenceStart,
    SequenceEnd,
    Scalar(String),
}

impl Display for YamlEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DocumentStart => write!(f, "start of document"),
            Self::DocumentEnd => write!(f, "end of document"),
            Self::MappingStart => write!(f, "start of mapping"),
            Self::MappingEnd => write!(f, "end of mapping"),
            Self::SequenceStart => write!(f, "start of sequence"),
            Self::SequenceEnd => write!(f, "end of sequence"),
            Self::Scalar(s) => write!(f, "scalar `{s}`"),
        }
    }
}

/// Sink for [`YamlEvent`]s.
pub trait Emitter {
    fn emit(&mut self, ev: YamlEvent) -> Result<(), Error>;
}

/// Record events in memory.
///
/// This performs no validation and never fails.
impl Emitter for Vec<YamlEvent> {
    fn emit(&mut self, ev: YamlEvent) -> Result<(), Error> {
        self.push(ev);
        Ok(())
    }
}

impl<E: Emitter + ?Sized> Emitter for &mut E {
    fn emit(&mut self, ev: YamlEvent) -> Result<(), Error> {
        (**self).emit(ev)
    }
}
