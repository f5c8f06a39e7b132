// Handler stack
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

//! The pushdown machine driving the transformation.
//!
//! Handlers never manipulate the stack directly.
//! Each reaction instead records its effects on a [`Context`],
//!   which are applied by [`HandlerStack::dispatch`] once the reaction
//!   returns.
//! This allows the handler atop the stack to be taken off of it for the
//!   duration of its reaction,
//!     so that it may be borrowed mutably alongside the sink,
//!     without any sort of shared ownership.

use super::{
    trace::{DefaultTrace, HandlerTrace},
    Handler, Slot, Then, TransformError,
};
use crate::{
    filter::Dialect,
    global,
    span::Span,
    xml::Event,
    yaml::{Emitter, YamlEvent},
};
use arrayvec::ArrayVec;

type Result<T> = std::result::Result<T, TransformError>;

/// Stack of active [`Handler`]s.
///
/// The stack is seeded with a root handler that must never pop;
///   doing so is an error.
/// Depth is bounded by [`global::MAX_HANDLER_DEPTH`],
///   which is far beyond the nesting depth of any SLD construct.
pub struct HandlerStack<T: HandlerTrace = DefaultTrace> {
    handlers: ArrayVec<Box<dyn Handler>, { global::MAX_HANDLER_DEPTH }>,

    /// The most recently popped handler,
    ///   observable by the new top for a single step.
    last_popped: Option<Box<dyn Handler>>,

    dialect: Dialect,
    trace: T,
}

impl HandlerStack<DefaultTrace> {
    pub fn new(root: Box<dyn Handler>) -> Self {
        Self::with_trace(root, DefaultTrace::default())
    }
}

impl<T: HandlerTrace> HandlerStack<T> {
    pub fn with_trace(root: Box<dyn Handler>, trace: T) -> Self {
        let mut handlers = ArrayVec::new();
        handlers.push(root);

        Self {
            handlers,
            last_popped: None,
            dialect: Dialect::default(),
            trace,
        }
    }

    /// Filter dialect made available to handlers.
    pub fn set_dialect(&mut self, dialect: Dialect) {
        self.dialect = dialect;
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn depth(&self) -> usize {
        self.handlers.len()
    }

    /// Route an event to the handler atop the stack and apply the effects
    ///   of its reaction.
    ///
    /// Effects are applied in this order:
    ///
    ///   1. A captured value is delivered to the handler beneath;
    ///   2. The handler is popped or returned to the top of the stack;
    ///   3. Pushed handlers are installed in the order they were pushed;
    ///        and
    ///   4. If the handler asked to forward the event and the top of the
    ///        stack has changed,
    ///          the same event is dispatched again to the new top.
    ///
    /// Document boundary events are not delivered to handlers.
    pub fn dispatch(
        &mut self,
        ev: &Event,
        sink: &mut dyn Emitter,
    ) -> Result<()> {
        let span = ev.span();

        loop {
            let mut top = self
                .handlers
                .pop()
                .ok_or(TransformError::StackUnderflow(span))?;

            let last_popped = self.last_popped.take();

            self.trace.trace_begin(&*top, ev, self.handlers.len() + 1);

            let mut cx = Context::new(
                &mut *sink,
                self.dialect,
                span,
                last_popped.as_deref(),
            );

            let result = match ev {
                Event::ElementStart(el) => top.element(el, &mut cx),
                Event::Characters(text, text_span) => {
                    top.characters(text, *text_span, &mut cx)
                }
                Event::ElementEnd(end) => top.end_element(end, &mut cx),
                Event::DocumentStart | Event::DocumentEnd => Ok(()),
            };

            let effects = cx.into_effects();
            self.trace.trace_end(&effects, &result);
            result?;

            let Effects {
                pushed,
                pop,
                forward,
                captured,
            } = effects;

            if let Some((slot, value)) = captured {
                self.handlers
                    .last_mut()
                    .ok_or(TransformError::StackUnderflow(span))?
                    .capture(slot, value);
            }

            let retopped = pop || !pushed.is_empty();

            if pop {
                if self.handlers.is_empty() {
                    return Err(TransformError::StackUnderflow(span));
                }

                self.last_popped = Some(top);
            } else {
                self.push(top, span)?;
            }

            for handler in pushed {
                self.push(handler, span)?;
            }

            // Forwarding without changing the top would dispatch to the
            //   same handler forever.
            if !(forward && retopped) {
                return Ok(());
            }
        }
    }

    /// Install a handler directly,
    ///   as if it had been pushed by the handler atop the stack.
    #[cfg(test)]
    pub fn install(&mut self, handler: Box<dyn Handler>) {
        self.handlers.push(handler);
    }

    fn push(&mut self, handler: Box<dyn Handler>, span: Span) -> Result<()> {
        self.handlers
            .try_push(handler)
            .map_err(|_| TransformError::DepthExceeded(span))
    }
}

/// Changes to the stack requested by a handler during a single reaction.
#[derive(Debug, Default)]
pub struct Effects {
    pushed: Vec<Box<dyn Handler>>,
    pop: bool,
    forward: bool,
    captured: Option<(Slot, String)>,
}

impl Effects {
    pub fn pushed(&self) -> &[Box<dyn Handler>] {
        &self.pushed
    }

    pub fn is_pop(&self) -> bool {
        self.pop
    }

    pub fn is_forward(&self) -> bool {
        self.forward
    }

    pub fn captured(&self) -> Option<&(Slot, String)> {
        self.captured.as_ref()
    }
}

/// Operations available to a [`Handler`] while it reacts to an event.
///
/// Emission is immediate;
///   stack operations take effect after the reaction returns
///     (see [`HandlerStack::dispatch`]).
/// Emission methods return `&mut Self` so that they may be chained with
///   `?`.
pub struct Context<'s> {
    sink: &'s mut dyn Emitter,
    dialect: Dialect,
    span: Span,
    last_popped: Option<&'s dyn Handler>,
    effects: Effects,
}

impl<'s> Context<'s> {
    pub fn new(
        sink: &'s mut dyn Emitter,
        dialect: Dialect,
        span: Span,
        last_popped: Option<&'s dyn Handler>,
    ) -> Self {
        Self {
            sink,
            dialect,
            span,
            last_popped,
            effects: Effects::default(),
        }
    }

    pub fn into_effects(self) -> Effects {
        self.effects
    }

    /// Filter dialect of the document being transformed.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Span of the event being dispatched.
    pub fn span(&self) -> Span {
        self.span
    }

    /// The handler that popped in the previous step,
    ///   if any.
    pub fn last_popped(&self) -> Option<&dyn Handler> {
        self.last_popped
    }

    fn emit(&mut self, ev: YamlEvent) -> Result<&mut Self> {
        self.sink.emit(ev)?;
        Ok(self)
    }

    pub fn mapping(&mut self) -> Result<&mut Self> {
        self.emit(YamlEvent::MappingStart)
    }

    pub fn end_mapping(&mut self) -> Result<&mut Self> {
        self.emit(YamlEvent::MappingEnd)
    }

    pub fn sequence(&mut self) -> Result<&mut Self> {
        self.emit(YamlEvent::SequenceStart)
    }

    pub fn end_sequence(&mut self) -> Result<&mut Self> {
        self.emit(YamlEvent::SequenceEnd)
    }

    pub fn scalar<S: Into<String>>(&mut self, value: S) -> Result<&mut Self> {
        self.emit(YamlEvent::Scalar(value.into()))
    }

    /// Emit a key and its scalar value.
    pub fn entry<K: Into<String>, V: Into<String>>(
        &mut self,
        key: K,
        value: V,
    ) -> Result<&mut Self> {
        self.scalar(key)?.scalar(value)
    }

    /// Emit two values as a single parenthesized pair,
    ///   as used for ranges and points.
    pub fn tuple(&mut self, a: &str, b: &str) -> Result<&mut Self> {
        self.scalar(format!("({a},{b})"))
    }

    /// Emit or capture a value produced by this handler.
    pub fn then(&mut self, then: Then, value: String) -> Result<&mut Self> {
        match then {
            Then::Scalar => self.scalar(value),
            Then::Capture(slot) => Ok(self.capture(slot, value)),
        }
    }

    /// Install a handler atop this one.
    pub fn push<H: Handler + 'static>(&mut self, handler: H) -> &mut Self {
        self.effects.pushed.push(Box::new(handler));
        self
    }

    /// Remove this handler from the stack.
    pub fn pop(&mut self) -> &mut Self {
        self.effects.pop = true;
        self
    }

    /// Dispatch the current event again to whatever handler is atop the
    ///   stack after this reaction.
    pub fn forward(&mut self) -> &mut Self {
        self.effects.forward = true;
        self
    }

    /// Deliver a value to the handler beneath this one.
    pub fn capture(&mut self, slot: Slot, value: String) -> &mut Self {
        self.effects.captured = Some((slot, value));
        self
    }
}
