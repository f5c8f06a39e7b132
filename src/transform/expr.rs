// Expression handlers
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

//! Handlers producing a single textual value.
//!
//! [`ExpressionHandler`] renders an OGC expression
//!   (literals, property names, function calls and mixed text)
//!   as inline YSLD expression text:
//!
//!   - a literal is its trimmed text;
//!   - a property name `area` becomes `${area}`;
//!   - a function `buffer` with a literal argument `2` becomes
//!       `buffer(2)`; and
//!   - arithmetic places its operator between its operands,
//!       as in `${a}*2`,
//!       parenthesized when it is itself an operand of arithmetic.
//!
//! [`TextHandler`] instead collects all descendant text verbatim,
//!   and [`SkipHandler`] discards a subtree entirely.
//!
//! Value-producing handlers are pushed for the element that contains the
//!   value and pop when that element closes,
//!     handing the value to their [`Then`] continuation.

use super::{Context, Handler, Then, TransformError};
use crate::{
    span::Span,
    xml::{Element, EndTag},
};

type Result<T = ()> = std::result::Result<T, TransformError>;

/// Emit `key` followed by the expression held by the current element.
pub fn expr_entry(cx: &mut Context, key: &str) -> Result {
    cx.scalar(key)?.push(ExpressionHandler::new(Then::Scalar));
    Ok(())
}

/// Emit `key` followed by the text of the current element.
pub fn text_entry(cx: &mut Context, key: &str) -> Result {
    cx.scalar(key)?.push(TextHandler::new(Then::Scalar));
    Ok(())
}

/// Renders an expression into a single buffer.
///
/// Nested expressions are tracked by an internal stack of [`Frame`]s
///   rather than by pushing further handlers,
///     since every level writes into the same buffer.
#[derive(Debug)]
pub struct ExpressionHandler {
    then: Then,
    buf: String,
    frames: Vec<Frame>,
}

/// An open element within an expression.
///
/// Literal and property frames hold the buffer offset at which their text
///   begins so that it can be trimmed when they close.
#[derive(Debug)]
enum Frame {
    Literal(usize),
    Property(usize),
    Function,
    Arith { op: char, nested: bool },
    Other,
}

impl ExpressionHandler {
    pub fn new(then: Then) -> Self {
        Self {
            then,
            buf: String::new(),
            frames: Vec::new(),
        }
    }

    /// Whether the innermost open element takes operands,
    ///   between which whitespace is insignificant.
    fn in_operands(&self) -> bool {
        matches!(
            self.frames.last(),
            Some(Frame::Function | Frame::Arith { .. })
        )
    }

    /// Trim the text written since `start`.
    fn trim_from(&mut self, start: usize) {
        let trimmed = self.buf[start..].trim().to_string();

        self.buf.truncate(start);
        self.buf.push_str(&trimmed);
    }
}

impl Handler for ExpressionHandler {
    fn element(&mut self, el: &Element, _cx: &mut Context) -> Result {
        let frame = match el.name.as_str() {
            "Literal" => Frame::Literal(self.buf.len()),

            "PropertyName" => {
                self.buf.push_str("${");
                Frame::Property(self.buf.len())
            }

            "Function" => {
                let name =
                    el.attr("name").ok_or_else(|| TransformError::MissingAttr {
                        attr: "name",
                        el: el.name.clone(),
                        span: el.span,
                    })?;

                self.buf.push_str(name.trim());
                self.buf.push('(');
                Frame::Function
            }

            "Add" | "Sub" | "Mul" | "Div" => {
                let nested =
                    matches!(self.frames.last(), Some(Frame::Arith { .. }));

                if nested {
                    self.buf.push('(');
                }

                Frame::Arith {
                    op: arith_symbol(&el.name),
                    nested,
                }
            }

            _ => Frame::Other,
        };

        self.frames.push(frame);
        Ok(())
    }

    fn characters(&mut self, text: &str, _: Span, _: &mut Context) -> Result {
        // Whitespace between arguments is not part of any argument.
        if !(self.in_operands() && text.trim().is_empty()) {
            self.buf.push_str(text);
        }

        Ok(())
    }

    fn end_element(&mut self, _: &EndTag, cx: &mut Context) -> Result {
        match self.frames.pop() {
            None => {
                let value = self.buf.trim().to_string();
                cx.then(self.then, value)?.pop();

                return Ok(());
            }

            Some(Frame::Literal(start)) => self.trim_from(start),

            Some(Frame::Property(start)) => {
                self.trim_from(start);
                self.buf.push('}');
            }

            Some(Frame::Function) => {
                if self.buf.ends_with(',') {
                    self.buf.pop();
                }

                self.buf.push(')');
            }

            Some(Frame::Arith { op, nested }) => {
                if self.buf.ends_with(op) {
                    self.buf.pop();
                }

                if nested {
                    self.buf.push(')');
                }
            }

            Some(Frame::Other) => return Ok(()),
        }

        // Each operand is followed by a separator;
        //   the last is stripped when its parent closes.
        match self.frames.last() {
            Some(Frame::Function) => self.buf.push(','),
            Some(Frame::Arith { op, .. }) => self.buf.push(*op),
            _ => (),
        }

        Ok(())
    }
}

fn arith_symbol(name: &str) -> char {
    match name {
        "Add" => '+',
        "Sub" => '-',
        "Mul" => '*',
        _ => '/',
    }
}

/// Collects all descendant text as one trimmed string.
#[derive(Debug)]
pub struct TextHandler {
    then: Then,
    buf: String,
    depth: usize,
}

impl TextHandler {
    pub fn new(then: Then) -> Self {
        Self {
            then,
            buf: String::new(),
            depth: 0,
        }
    }
}

impl Handler for TextHandler {
    fn element(&mut self, _: &Element, _: &mut Context) -> Result {
        self.depth += 1;
        Ok(())
    }

    fn characters(&mut self, text: &str, _: Span, _: &mut Context) -> Result {
        self.buf.push_str(text);
        Ok(())
    }

    fn end_element(&mut self, _: &EndTag, cx: &mut Context) -> Result {
        match self.depth {
            0 => {
                let value = self.buf.trim().to_string();
                cx.then(self.then, value)?.pop();
            }
            _ => self.depth -= 1,
        }

        Ok(())
    }
}

/// Discards an element and everything within it.
#[derive(Debug, Default)]
pub struct SkipHandler {
    depth: usize,
}

impl Handler for SkipHandler {
    fn element(&mut self, _: &Element, _: &mut Context) -> Result {
        self.depth += 1;
        Ok(())
    }

    fn end_element(&mut self, _: &EndTag, cx: &mut Context) -> Result {
        match self.depth {
            0 => {
                cx.pop();
            }
            _ => self.depth -= 1,
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        span::UNKNOWN_SPAN,
        transform::{trace::VoidTrace, HandlerStack, Slot},
        xml::Event,
        yaml::YamlEvent,
    };

    /// Records every captured value as a scalar.
    #[derive(Debug, Default)]
    struct Root {
        captured: Vec<(Slot, String)>,
    }

    impl Handler for Root {
        fn capture(&mut self, slot: Slot, value: String) {
            self.captured.push((slot, value));
        }
    }

    fn start(name: &str) -> Event {
        Event::ElementStart(Element::new(name, UNKNOWN_SPAN))
    }

    fn end(name: &str) -> Event {
        Event::ElementEnd(EndTag::new(name, UNKNOWN_SPAN))
    }

    fn text(s: &str) -> Event {
        Event::Characters(s.into(), UNKNOWN_SPAN)
    }

    fn func(name: &str) -> Event {
        Event::ElementStart(
            Element::new("Function", UNKNOWN_SPAN).with_attr("name", name),
        )
    }

    /// Run `events` through `handler` atop a root,
    ///   where `events` is the content of the element `handler` was
    ///   pushed for followed by its closing.
    fn run<H: Handler + 'static>(
        handler: H,
        events: Vec<Event>,
    ) -> Vec<YamlEvent> {
        let mut stack =
            HandlerStack::with_trace(Box::new(Root::default()), VoidTrace);
        let mut sink = Vec::new();

        stack.install(Box::new(handler));

        for ev in events {
            stack.dispatch(&ev, &mut sink).unwrap();
        }

        assert_eq!(1, stack.depth(), "handler did not pop");
        sink
    }

    fn scalar(s: &str) -> Vec<YamlEvent> {
        vec![YamlEvent::Scalar(s.into())]
    }

    #[test]
    fn literal_is_trimmed() {
        assert_eq!(
            scalar("3"),
            run(
                ExpressionHandler::new(Then::Scalar),
                vec![
                    start("Literal"),
                    text(" 3\n"),
                    end("Literal"),
                    end("Size"),
                ],
            )
        );
    }

    #[test]
    fn bare_text_is_a_literal() {
        assert_eq!(
            scalar("6"),
            run(
                ExpressionHandler::new(Then::Scalar),
                vec![text("\n  6  "), end("Size")],
            )
        );
    }

    #[test]
    fn property_reference() {
        assert_eq!(
            scalar("${area}"),
            run(
                ExpressionHandler::new(Then::Scalar),
                vec![
                    text("\n  "),
                    start("PropertyName"),
                    text("area"),
                    end("PropertyName"),
                    text("\n"),
                    end("Geometry"),
                ],
            )
        );
    }

    #[test]
    fn function_call() {
        assert_eq!(
            scalar("buffer(2)"),
            run(
                ExpressionHandler::new(Then::Scalar),
                vec![
                    func("buffer"),
                    text("\n  "),
                    start("Literal"),
                    text("2"),
                    end("Literal"),
                    text("\n"),
                    end("Function"),
                    end("Geometry"),
                ],
            )
        );
    }

    #[test]
    fn nested_function_arguments() {
        assert_eq!(
            scalar("Concatenate(${name},strToUpperCase(${kind}),x)"),
            run(
                ExpressionHandler::new(Then::Scalar),
                vec![
                    func("Concatenate"),
                    start("PropertyName"),
                    text("name"),
                    end("PropertyName"),
                    func("strToUpperCase"),
                    start("PropertyName"),
                    text("kind"),
                    end("PropertyName"),
                    end("Function"),
                    start("Literal"),
                    text("x"),
                    end("Literal"),
                    end("Function"),
                    end("Label"),
                ],
            )
        );
    }

    #[test]
    fn mixed_content_label() {
        assert_eq!(
            scalar("Name: ${name}"),
            run(
                ExpressionHandler::new(Then::Scalar),
                vec![
                    text("Name: "),
                    start("PropertyName"),
                    text("name"),
                    end("PropertyName"),
                    end("Label"),
                ],
            )
        );
    }

    #[test]
    fn function_without_name() {
        let mut stack =
            HandlerStack::with_trace(Box::new(Root::default()), VoidTrace);
        stack.install(Box::new(ExpressionHandler::new(Then::Scalar)));

        assert!(matches!(
            stack.dispatch(&start("Function"), &mut Vec::<YamlEvent>::new()),
            Err(TransformError::MissingAttr { attr: "name", .. })
        ));
    }

    #[test]
    fn text_handler_collects_descendants() {
        assert_eq!(
            scalar("a b"),
            run(
                TextHandler::new(Then::Scalar),
                vec![
                    text(" a "),
                    start("x"),
                    text("b "),
                    end("x"),
                    end("Title"),
                ],
            )
        );
    }

    #[test]
    fn arithmetic_operator_between_operands() {
        assert_eq!(
            scalar("${a}*2"),
            run(
                ExpressionHandler::new(Then::Scalar),
                vec![
                    start("Mul"),
                    text("\n  "),
                    start("PropertyName"),
                    text("a"),
                    end("PropertyName"),
                    text("\n  "),
                    start("Literal"),
                    text("2"),
                    end("Literal"),
                    text("\n"),
                    end("Mul"),
                    end("Size"),
                ],
            )
        );
    }

    #[test]
    fn nested_arithmetic_is_parenthesized() {
        assert_eq!(
            scalar("sqrt((${a}+1)/${b})"),
            run(
                ExpressionHandler::new(Then::Scalar),
                vec![
                    func("sqrt"),
                    start("Div"),
                    start("Add"),
                    start("PropertyName"),
                    text("a"),
                    end("PropertyName"),
                    start("Literal"),
                    text("1"),
                    end("Literal"),
                    end("Add"),
                    start("PropertyName"),
                    text("b"),
                    end("PropertyName"),
                    end("Div"),
                    end("Function"),
                    end("Size"),
                ],
            )
        );
    }

    #[test]
    fn subtraction() {
        assert_eq!(
            scalar("${a}-${b}"),
            run(
                ExpressionHandler::new(Then::Scalar),
                vec![
                    start("Sub"),
                    start("PropertyName"),
                    text("a"),
                    end("PropertyName"),
                    start("PropertyName"),
                    text("b"),
                    end("PropertyName"),
                    end("Sub"),
                    end("Rotation"),
                ],
            )
        );
    }

    #[test]
    fn capture_emits_nothing() {
        let mut stack =
            HandlerStack::with_trace(Box::new(Root::default()), VoidTrace);
        let mut sink = Vec::new();

        stack.install(Box::new(TextHandler::new(Then::Capture(
            Slot::Second,
        ))));

        for ev in [text("100"), end("MaxScaleDenominator")] {
            stack.dispatch(&ev, &mut sink).unwrap();
        }

        assert_eq!(Vec::<YamlEvent>::new(), sink);
        assert_eq!(1, stack.depth());
    }

    #[test]
    fn skip_discards_subtree() {
        assert_eq!(
            Vec::<YamlEvent>::new(),
            run(
                SkipHandler::default(),
                vec![
                    start("Name"),
                    text("ignored"),
                    end("Name"),
                    end("UserStyle"),
                ],
            )
        );
    }
}
