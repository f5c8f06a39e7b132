// Filter delegate
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

//! Delegation of embedded filters to a [`FilterEngine`].

use super::{Context, Handler, TransformError};
use crate::{
    filter::{cql, EngineStatus, FilterEngine},
    span::Span,
    xml::{Element, EndTag},
};

type Result<T = ()> = std::result::Result<T, TransformError>;

/// Forwards a filter to the engine for the document's dialect and emits
///   its ECQL rendering as a single scalar.
///
/// This handler must be pushed with the event that opens the filter root
///   forwarded to it,
///     since the engine must see that element.
#[derive(Debug, Default)]
pub struct FilterHandler {
    state: FilterState,
}

#[derive(Debug, Default)]
enum FilterState {
    /// Awaiting the filter root.
    #[default]
    Idle,

    /// Forwarding all events to the engine.
    Delegating(Box<dyn FilterEngine>),

    /// The filter has been emitted.
    Done,
}

impl FilterHandler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Handler for FilterHandler {
    fn element(&mut self, el: &Element, cx: &mut Context) -> Result {
        if matches!(self.state, FilterState::Idle) {
            let mut engine = cx.dialect().engine();
            engine.start(el)?;

            self.state = FilterState::Delegating(engine);
        } else if let FilterState::Delegating(engine) = &mut self.state {
            engine.start(el)?;
        }

        Ok(())
    }

    fn characters(&mut self, text: &str, span: Span, _: &mut Context) -> Result {
        if let FilterState::Delegating(engine) = &mut self.state {
            engine.characters(text, span)?;
        }

        Ok(())
    }

    fn end_element(&mut self, end: &EndTag, cx: &mut Context) -> Result {
        let FilterState::Delegating(engine) = &mut self.state else {
            return Ok(());
        };

        if let EngineStatus::Done(filter) = engine.end(end)? {
            cx.scalar(cql::encode(&filter))?.pop();
            self.state = FilterState::Done;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        filter::{Dialect, FilterError},
        span::UNKNOWN_SPAN,
        transform::{Context, Handler},
        xml::{Element, EndTag},
        yaml::YamlEvent,
    };

    fn el(name: &str) -> Element {
        Element::new(name, UNKNOWN_SPAN)
    }

    fn end(name: &str) -> EndTag {
        EndTag::new(name, UNKNOWN_SPAN)
    }

    #[test]
    fn delegates_until_root_closes() {
        let mut sink: Vec<YamlEvent> = Vec::new();
        let mut sut = FilterHandler::new();

        let mut cx =
            Context::new(&mut sink, Dialect::Filter10, UNKNOWN_SPAN, None);

        sut.element(&el("Filter"), &mut cx).unwrap();
        sut.element(&el("PropertyIsNull"), &mut cx).unwrap();
        sut.element(&el("PropertyName"), &mut cx).unwrap();
        sut.characters("name", UNKNOWN_SPAN, &mut cx).unwrap();
        sut.end_element(&end("PropertyName"), &mut cx).unwrap();
        sut.end_element(&end("PropertyIsNull"), &mut cx).unwrap();

        assert!(!cx.into_effects().is_pop());

        let mut cx =
            Context::new(&mut sink, Dialect::Filter10, UNKNOWN_SPAN, None);
        sut.end_element(&end("Filter"), &mut cx).unwrap();

        assert!(cx.into_effects().is_pop());
        assert_eq!(vec![YamlEvent::Scalar("name IS NULL".into())], sink);
    }

    #[test]
    fn engine_uses_context_dialect() {
        let mut sink: Vec<YamlEvent> = Vec::new();
        let mut sut = FilterHandler::new();

        let mut cx =
            Context::new(&mut sink, Dialect::Filter10, UNKNOWN_SPAN, None);

        sut.element(&el("Filter"), &mut cx).unwrap();

        // Envelopes are only understood by the newer dialect.
        assert!(matches!(
            sut.element(&el("Envelope"), &mut cx),
            Err(TransformError::Filter(FilterError::UnknownElement {
                dialect: Dialect::Filter10,
                ..
            }))
        ));
    }
}
