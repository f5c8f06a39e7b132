// Tests for XML event reader
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

use super::*;
use crate::xml::{NS_GML, NS_XLINK};

const NS_SLD: &str = "http://www.opengis.net/sld";

fn read(src: &str) -> Vec<Event> {
    XmlEventReader::new(src.as_bytes())
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

/// Reduce events to a compact form that ignores spans.
fn shape(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .map(|ev| match ev {
            Event::DocumentStart => "doc(".into(),
            Event::ElementStart(el) => format!("<{}", el.name),
            Event::Characters(text, _) => format!("{text:?}"),
            Event::ElementEnd(end) => format!("{}>", end.name),
            Event::DocumentEnd => ")doc".into(),
        })
        .collect()
}

#[test]
fn document_boundaries_surround_elements() {
    assert_eq!(
        vec!["doc(", "<a", "a>", ")doc"],
        shape(&read("<a></a>"))
    );
}

#[test]
fn empty_element_is_expanded() {
    assert_eq!(
        vec!["doc(", "<a", "<b", "b>", "a>", ")doc"],
        shape(&read("<a><b/></a>"))
    );
}

#[test]
fn declaration_and_comments_are_dropped() {
    let src = "<?xml version=\"1.0\"?>\n<!-- hi --><a><!-- there --></a>";

    assert_eq!(
        vec!["doc(", "\"\\n\"", "<a", "a>", ")doc"],
        shape(&read(src))
    );
}

#[test]
fn text_is_unescaped_and_whitespace_retained() {
    let events = read("<a> x &lt; y </a>");

    assert_eq!(
        Event::Characters(" x < y ".into(), Span::new(3, 10)),
        events[2]
    );
}

#[test]
fn cdata_is_characters() {
    assert_eq!(
        vec!["doc(", "<a", "\"<b>\"", "a>", ")doc"],
        shape(&read("<a><![CDATA[<b>]]></a>"))
    );
}

#[test]
fn element_namespace_and_span() {
    let src = r#"<sld:Rule xmlns:sld="http://www.opengis.net/sld"/>"#;
    let events = read(src);

    match &events[1] {
        Event::ElementStart(el) => {
            assert_eq!("Rule", el.name);
            assert_eq!(Some(NS_SLD), el.ns.as_deref());
            assert_eq!(Span::new(0, src.len() as u32), el.span);
            // The namespace declaration is not an attribute.
            assert!(el.attrs.is_empty());
        }
        other => panic!("unexpected {other:?}"),
    }

    match &events[2] {
        Event::ElementEnd(end) => {
            assert_eq!("Rule", end.name);
            assert_eq!(Some(NS_SLD), end.ns.as_deref());
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn default_namespace_applies_to_elements() {
    let events = read(r#"<Rule xmlns="http://www.opengis.net/sld"><Name/></Rule>"#);

    match &events[2] {
        Event::ElementStart(el) => {
            assert_eq!("Name", el.name);
            assert_eq!(Some(NS_SLD), el.ns.as_deref());
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn attributes_are_resolved_and_unescaped() {
    let src = r#"<OnlineResource
        xmlns:xlink="http://www.w3.org/1999/xlink"
        xmlns:gml="http://www.opengis.net/gml"
        xlink:href="a.png?x=1&amp;y=2" gml:id="g1" type="simple"/>"#;

    match &read(src)[1] {
        Event::ElementStart(el) => {
            assert_eq!(Some("a.png?x=1&y=2"), el.attr_ns(NS_XLINK, "href"));
            assert_eq!(Some("a.png?x=1&y=2"), el.attr("href"));
            assert_eq!(Some("g1"), el.attr_ns(NS_GML, "id"));
            assert_eq!(None, el.attr_ns(NS_GML, "type"));
            assert_eq!(Some("simple"), el.attr("type"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn unclosed_element_at_eof() {
    let result = XmlEventReader::new("<a><b>".as_bytes())
        .collect::<Result<Vec<_>, _>>();

    match result {
        Err(Error::UnclosedElement(name, span)) => {
            assert_eq!("b", name);
            assert_eq!(Span::new(3, 3), span);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn unbound_prefix() {
    let result = XmlEventReader::new("<ogc:Filter/>".as_bytes())
        .collect::<Result<Vec<_>, _>>();

    match result {
        Err(Error::UnboundPrefix(prefix, _)) => assert_eq!("ogc", prefix),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn mismatched_end_is_error_and_reader_is_fused() {
    let mut reader = XmlEventReader::new("<a></b>".as_bytes());

    assert!(matches!(reader.next(), Some(Ok(Event::DocumentStart))));
    assert!(matches!(reader.next(), Some(Ok(Event::ElementStart(_)))));
    assert!(matches!(reader.next(), Some(Err(Error::QuickXml(..)))));
    assert!(reader.next().is_none());
}
