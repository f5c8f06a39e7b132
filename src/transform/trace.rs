// Handler stack tracing
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

//! Tracing for handler dispatch.
//!
//! This provides human-readable traces on standard error any time an
//!   event is dispatched to a handler.
//! These traces are provided automatically when `cfg(test)`,
//!   which means that they are automatically included in the output of any
//!   test failure.
//!
//! Outside of tests,
//!   this can be enabled at build time using the
//!   `transform-trace-stderr` feature flag
//!     (`cargo build --features transform-trace-stderr`).
//!
//! _These traces are not meant to be machine-readable!_
//! The format is subject to change without notice.

use super::{stack::Effects, Handler, TransformError};
use crate::xml::Event;

#[cfg(not(any(test, feature = "transform-trace-stderr")))]
pub type DefaultTrace = VoidTrace;

#[cfg(any(test, feature = "transform-trace-stderr"))]
pub type DefaultTrace = HumanReadableTrace;

pub trait HandlerTrace: Default {
    /// Output the upper portion of a dispatch trace,
    ///   describing the handler and the event it is about to receive.
    ///
    /// There is no means to return an error and a failure to output the
    ///   trace should not interrupt processing.
    fn trace_begin(&mut self, handler: &dyn Handler, ev: &Event, depth: usize);

    /// Output the lower portion of a dispatch trace,
    ///   describing the effects of the reaction.
    fn trace_end(
        &mut self,
        effects: &Effects,
        result: &Result<(), TransformError>,
    );
}

/// Perform no tracing.
///
/// This should be used by default for non-test builds,
///   since tracing can incur a significant performance cost.
#[derive(Debug, PartialEq, Default)]
pub struct VoidTrace;

impl HandlerTrace for VoidTrace {
    fn trace_begin(
        &mut self,
        _handler: &dyn Handler,
        _ev: &Event,
        _depth: usize,
    ) {
        // Do nothing at all.
    }

    fn trace_end(
        &mut self,
        _effects: &Effects,
        _result: &Result<(), TransformError>,
    ) {
        // Do nothing at all.
    }
}

/// Human-readable [`HandlerTrace`].
///
/// See [module-level](super) documentation for more information.
#[derive(Debug, PartialEq, Default)]
pub struct HumanReadableTrace;

impl HandlerTrace for HumanReadableTrace {
    fn trace_begin(&mut self, handler: &dyn Handler, ev: &Event, depth: usize) {
        eprint!(
            "\
[HandlerStack::dispatch] (depth {depth})
| ==> Handler: {handler:?}
|
| ==> Event: {ev}
|\n",
        );
    }

    fn trace_end(
        &mut self,
        effects: &Effects,
        result: &Result<(), TransformError>,
    ) {
        for pushed in effects.pushed() {
            eprint!("| ==> Push: {pushed:?}\n");
        }

        if effects.is_pop() {
            eprint!("| ==> Pop\n");
        }

        if let Some((slot, value)) = effects.captured() {
            eprint!("| ==> Capture {slot:?}: {value:?}\n");
        }

        if effects.is_forward() {
            eprint!("| ==> Forward\n");
        }

        if let Err(err) = result {
            eprint!(
                "\
|
| ==> !!! error: {err}.
|  |  {err:?}\n",
            );
        }

        #[allow(unused_variables)]
        let cfg = ""; // so that this compiles without matching cfg
        #[cfg(feature = "transform-trace-stderr")]
        #[allow(unused_variables)]
        let cfg = "feature = \"transform-trace-stderr\"";
        #[cfg(test)] // takes precedence if both are set
        let cfg = "test";
        eprint!(
            "= note: this trace was output as a debugging aid \
                because `cfg({cfg})`.\n\n",
        );
    }
}
