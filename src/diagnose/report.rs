// Diagnostic report rendering
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

//! Rendering of diagnostic information.

// NB: `write!` together with `\n` is preferred to `writeln!` so that there
//   is only a single sequence of characters to search for while tracking
//   down newlines,
//     rather than using both.

use super::{
    resolver::{ResolvedSpan, SpanResolver, SpanResolverError},
    AnnotatedSpan, Diagnostic, Level,
};
use crate::span::Span;
use std::fmt::{self, Display};

pub trait Reporter {
    /// Render diagnostic report.
    ///
    /// The provided [`Report`] implements [`Display`].
    /// If rendering to standard out or standard error,
    ///   it is a good idea to render the entire report to a string before
    ///   writing it so that it is not interleaved with other output.
    ///
    /// This method _does not return [`Result`]_ and should never fail.
    /// The report absorbs errors during span resolution and renders those
    ///   errors to the report itself,
    ///     ensuring both that the user is made aware of the problem
    ///     and that the actual diagnostic is never suppressed.
    fn render<'d, D: Diagnostic>(&mut self, diagnostic: &'d D)
        -> Report<'d, D>;
}

/// Render diagnostic report in a highly visual way.
///
/// This report is modeled after Rust's default error reporting:
///   a heading with the severity and message,
///     followed by a section for each span locating it in the source and
///     listing its labels.
pub struct VisualReporter<R: SpanResolver> {
    resolver: R,
}

impl<R: SpanResolver> VisualReporter<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }
}

impl<R: SpanResolver> Reporter for VisualReporter<R> {
    fn render<'d, D: Diagnostic>(
        &mut self,
        diagnostic: &'d D,
    ) -> Report<'d, D> {
        let mut report = Report::empty(diagnostic);

        for AnnotatedSpan(span, level, olabel) in diagnostic.describe() {
            let heading = match self.resolver.resolve(span) {
                Ok(rspan) => {
                    SpanHeading::Resolved(self.resolver.context().into(), rspan)
                }
                Err(e) => SpanHeading::Unresolved(
                    self.resolver.context().into(),
                    span,
                    e,
                ),
            };

            let label = olabel.map(|label| SpanLabel(level, label.to_string()));
            report.push(Section::new(span, heading, level, label));
        }

        report
    }
}

/// A rendered diagnostic.
#[derive(Debug)]
pub struct Report<'d, D: Diagnostic> {
    msg: &'d D,
    secs: Vec<Section>,
    level: Level,
}

impl<'d, D: Diagnostic> Report<'d, D> {
    fn empty(msg: &'d D) -> Self {
        Self {
            msg,
            secs: Vec::new(),
            level: Level::default(),
        }
    }

    /// Severity of the most severe section of this report.
    pub fn level(&self) -> Level {
        self.level
    }

    /// Add a section,
    ///   squashing it into the previous section if both describe the same
    ///   [`Span`].
    fn push(&mut self, sec: Section) {
        self.level = self.level.min(sec.level);

        match self.secs.last_mut() {
            Some(prev) if prev.span == sec.span => {
                prev.labels.extend(sec.labels);
            }
            _ => self.secs.push(sec),
        }
    }
}

impl<'d, D: Diagnostic> Display for Report<'d, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{level}: {msg}\n", level = self.level, msg = self.msg)?;
        self.secs.iter().try_for_each(|sec| sec.fmt(f))
    }
}

/// A section of a [`Report`] describing a [`Span`].
#[derive(Debug)]
struct Section {
    span: Span,
    heading: SpanHeading,
    labels: Vec<SpanLabel>,
    level: Level,
}

impl Section {
    fn new(
        span: Span,
        heading: SpanHeading,
        level: Level,
        label: Option<SpanLabel>,
    ) -> Self {
        // We should never mask an error with our own;
        //   a failure to resolve is reported alongside the user's label.
        let mut labels = match &heading {
            SpanHeading::Unresolved(_, _, e) => vec![SpanLabel(
                Level::Help,
                format!(
                    "an error occurred while trying to look up \
                     information about this span: {e}"
                ),
            )],
            SpanHeading::Resolved(_, rspan) if rspan.col.is_none() => {
                vec![SpanLabel(
                    Level::Help,
                    "unable to calculate columns because the line is \
                        not a valid UTF-8 string"
                        .into(),
                )]
            }
            _ => vec![],
        };

        labels.extend(label);

        Self {
            span,
            heading,
            labels,
            level,
        }
    }
}

impl Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  {heading}\n", heading = self.heading)?;

        for label in self.labels.iter() {
            write!(f, "{label}\n")?;
        }

        Ok(())
    }
}

/// Heading describing the context of a (hopefully resolved) span.
#[derive(Debug)]
enum SpanHeading {
    Resolved(String, ResolvedSpan),
    Unresolved(String, Span, SpanResolverError),
}

impl Display for SpanHeading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved(ctx, rspan) => match rspan.col {
                Some(col) => write!(f, "--> {ctx}:{}:{col}", rspan.line_num),
                None => write!(f, "--> {ctx}:{}", rspan.line_num),
            },

            // This is not ideal,
            //   but the user still has enough information to find the
            //   problem.
            Self::Unresolved(ctx, span, _) => write!(
                f,
                "--> {ctx} offset {}--{}",
                span.offset(),
                span.end()
            ),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
struct SpanLabel(Level, String);

impl Display for SpanLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self(level, label) = self;
        write!(f, "      {level}: {label}")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::diagnose::{Annotate, BufSpanResolver};
    use std::{error::Error, fmt, io::Cursor};

    #[derive(Debug)]
    struct StubError(Vec<AnnotatedSpan<'static>>);

    impl Display for StubError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "stub failure")
        }
    }

    impl Error for StubError {}

    impl Diagnostic for StubError {
        fn describe(&self) -> Vec<AnnotatedSpan> {
            self.0.clone()
        }
    }

    fn render(src: &'static str, err: &StubError) -> String {
        let resolver = BufSpanResolver::new("style.sld", Cursor::new(src));
        VisualReporter::new(resolver).render(err).to_string()
    }

    #[test]
    fn message_only_without_spans() {
        assert_eq!("error: stub failure\n", render("", &StubError(vec![])));
    }

    #[test]
    fn resolved_section_with_label() {
        let err = StubError(vec![Span::new(4, 3).error("bad element")]);

        assert_eq!(
            "error: stub failure\n  \
               --> style.sld:2:1\n      \
                   error: bad element\n",
            render("<a>\n<b/>\n</a>", &err),
        );
    }

    #[test]
    fn adjacent_sections_for_same_span_are_squashed() {
        let span = Span::new(0, 3);
        let err = StubError(span.error("first").with_help("second").to_vec());

        assert_eq!(
            "error: stub failure\n  \
               --> style.sld:1:1\n      \
                   error: first\n      \
                   help: second\n",
            render("<a/>", &err),
        );
    }

    #[test]
    fn unresolved_span_falls_back_to_offsets() {
        let err = StubError(vec![Span::new(40, 2).mark_error()]);
        let out = render("<a/>", &err);

        assert!(out.contains("--> style.sld offset 40--42\n"), "{out}");
        assert!(out.contains("help: an error occurred"), "{out}");
    }

    #[test]
    fn report_level_is_most_severe() {
        let err = StubError(vec![
            Span::new(0, 1).note("context"),
            Span::new(1, 1).internal_error("broken"),
        ]);
        let resolver = BufSpanResolver::new("x", Cursor::new("<a/>"));
        let mut reporter = VisualReporter::new(resolver);

        assert_eq!(Level::InternalError, reporter.render(&err).level());
    }
}
