// SLD to YSLD transformation
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

//! Streaming transformation of SLD markup into YSLD.
//!
//! The transformation is a pushdown automaton.
//! Each construct of the source style
//!   (a rule, a symbolizer, a fill, and so on)
//!   is represented by a [`Handler`] that is pushed onto a
//!   [`HandlerStack`] when the construct opens and popped when it
//!   closes.
//! Only the handler atop the stack observes the next
//!   [`Event`](crate::xml::Event);
//!     it reacts by emitting [`YamlEvent`]s to the sink and by pushing or
//!     popping handlers through its [`Context`].
//!
//! No tree of either document is ever materialized;
//!   output is emitted as soon as the input that determines it has been
//!   read.
//! Consequently,
//!   the order of keys in the output follows the order of elements in the
//!   input.
//!
//! Handlers communicate with one-another only through the stack:
//!   a handler may [`Context::capture`] a value for the handler beneath
//!   it rather than emitting it,
//!     which is how a parent combines several child values into a single
//!     scalar
//!       (see [`Then`]).
//!
//! Elements that the handler atop the stack does not recognize are
//!   ignored without pushing anything.
//! This means that the content of an unrecognized element is observed by
//!   that same handler,
//!     which is generally harmless since handlers key off of specific
//!     element names,
//!       but does mean that a recognized name nested within an unknown
//!       element will be acted upon.

mod error;
mod expr;
mod filter;
mod graphic;
mod raster;
mod stack;
mod style;
mod symbolizer;
mod text;
mod trace;

pub use error::TransformError;
pub use stack::{Context, HandlerStack};
pub use style::RootHandler;

use crate::{
    filter::Dialect,
    span::Span,
    xml::{self, reader::XmlEventReader, Element, EndTag, Event},
    yaml::{Emitter, YamlEvent, YamlWriter},
};
use std::{
    fmt::Debug,
    io::{BufRead, Write},
};

/// Reaction to events for a single active construct.
///
/// Every reaction is optional;
///   events that a handler does not care about are ignored by default.
pub trait Handler: Debug {
    fn element(
        &mut self,
        _el: &Element,
        _cx: &mut Context,
    ) -> Result<(), TransformError> {
        Ok(())
    }

    fn characters(
        &mut self,
        _text: &str,
        _span: Span,
        _cx: &mut Context,
    ) -> Result<(), TransformError> {
        Ok(())
    }

    fn end_element(
        &mut self,
        _end: &EndTag,
        _cx: &mut Context,
    ) -> Result<(), TransformError> {
        Ok(())
    }

    /// Receive a value captured by the handler that was atop this one.
    ///
    /// This is invoked after that handler has popped,
    ///   before the next event is dispatched.
    fn capture(&mut self, _slot: Slot, _value: String) {}
}

/// Where a value captured by a child belongs in its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    First,
    Second,
}

/// What a value-producing handler does with its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Then {
    /// Emit the value as a scalar.
    Scalar,

    /// Deliver the value to the handler beneath via [`Handler::capture`].
    Capture(Slot),
}

/// Transform a stream of markup events into YAML events.
///
/// The source must begin with [`Event::DocumentStart`],
///   as produced by [`XmlEventReader`].
/// The document boundary events of the sink are emitted here;
///   handlers never see them.
///
/// The first error terminates the transformation;
///   events already emitted to the sink remain emitted.
pub fn run<I, E>(source: I, sink: &mut E) -> Result<(), TransformError>
where
    I: IntoIterator<Item = Result<Event, xml::Error>>,
    E: Emitter,
{
    sink.emit(YamlEvent::DocumentStart)?;

    let mut stack = HandlerStack::new(Box::new(RootHandler::default()));
    let mut frozen = false;

    for ev in source {
        let ev = ev?;

        if let (Event::ElementStart(el), false) = (&ev, frozen) {
            stack.set_dialect(Dialect::from_version(el.attr("version")));
            frozen = true;
        }

        stack.dispatch(&ev, sink)?;
    }

    sink.emit(YamlEvent::DocumentEnd)?;

    Ok(())
}

/// Transform an SLD document into YSLD text.
///
/// The output is returned so that the caller may recover it
///   (for example,
///     to inspect a buffer).
pub fn transform<R: BufRead, W: Write>(
    input: R,
    output: W,
) -> Result<W, TransformError> {
    let mut writer = YamlWriter::new(output);
    run(XmlEventReader::new(input), &mut writer)?;

    Ok(writer.into_inner())
}

#[cfg(test)]
mod test;
