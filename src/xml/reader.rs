// XML event reader
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

//! Parse XML documents into an [`Event`] stream.
//!
//! This uses [`quick_xml`] as the parser,
//!   which performs namespace resolution for us.
//! Events are produced lazily one at a time as the iterator is pulled;
//!   the document is never held in memory.

use super::{Attr, Element, EndTag, Error, Event};
use crate::span::Span;
use quick_xml::{
    events::{attributes::Attribute, BytesStart, Event as QuickEvent},
    name::{Namespace, ResolveResult},
    NsReader,
};
use std::io::BufRead;

/// Progress through the document.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum ReaderState {
    /// [`Event::DocumentStart`] has not yet been yielded.
    Start,
    Reading,
    /// The document has ended or an error occurred;
    ///   the iterator is fused.
    Done,
}

/// Parse XML into an [`Event`] stream.
///
/// The first event is always [`Event::DocumentStart`] and,
///   if the document is well-formed,
///   the last is always [`Event::DocumentEnd`].
/// Empty elements are expanded into a start and end event pair and
///   whitespace is delivered verbatim.
pub struct XmlEventReader<B: BufRead> {
    reader: NsReader<B>,

    /// Buffer reused by the underlying parser for each read.
    readbuf: Vec<u8>,

    /// Elements that are presently open,
    ///   used to report unclosed elements at the end of input.
    open: Vec<(String, Span)>,

    state: ReaderState,
}

impl<B: BufRead> XmlEventReader<B> {
    pub fn new(reader: B) -> Self {
        let mut reader = NsReader::from_reader(reader);

        reader
            .expand_empty_elements(true)
            .check_end_names(true)
            .trim_text(false);

        Self {
            reader,
            readbuf: Vec::with_capacity(1024),
            open: Vec::new(),
            state: ReaderState::Start,
        }
    }

    /// Read the next event that is of interest to the transformer,
    ///   or [`None`] at the end of the document.
    fn read_next(&mut self) -> Result<Option<Event>, Error> {
        loop {
            self.readbuf.clear();

            let start = self.reader.buffer_position();
            let result = self.reader.read_resolved_event_into(&mut self.readbuf);

            let (resolved, ev) = match result {
                Ok(x) => x,
                Err(e) => {
                    let end = self.reader.buffer_position();
                    return Err(Error::QuickXml(
                        e,
                        Span::from_positions(start, end),
                    ));
                }
            };

            let ns = resolve(resolved, || Span::from_positions(start, start))?;
            let span = Span::from_positions(start, self.reader.buffer_position());
            let decoder = self.reader.decoder();

            let decode = |bytes: &[u8]| {
                decoder
                    .decode(bytes)
                    .map(|s| s.into_owned())
                    .map_err(|e| Error::QuickXml(e, span))
            };

            return match ev {
                QuickEvent::Start(ele) => {
                    let el = element(&self.reader, &ele, ns, span)?;
                    self.open.push((el.name.clone(), span));

                    Ok(Some(Event::ElementStart(el)))
                }

                QuickEvent::End(ele) => {
                    self.open.pop();

                    Ok(Some(Event::ElementEnd(EndTag {
                        name: decode(ele.local_name().as_ref())?,
                        ns,
                        span,
                    })))
                }

                QuickEvent::Text(text) => {
                    let text = text
                        .unescape()
                        .map_err(|e| Error::QuickXml(e, span))?
                        .into_owned();

                    Ok(Some(Event::Characters(text, span)))
                }

                QuickEvent::CData(cdata) => {
                    Ok(Some(Event::Characters(decode(&*cdata)?, span)))
                }

                QuickEvent::Eof => match self.open.pop() {
                    Some((name, open_span)) => {
                        Err(Error::UnclosedElement(name, open_span))
                    }
                    None => Ok(None),
                },

                // Empty elements are expanded by the parser configuration.
                QuickEvent::Empty(_)
                | QuickEvent::Comment(_)
                | QuickEvent::Decl(_)
                | QuickEvent::PI(_)
                | QuickEvent::DocType(_) => continue,
            };
        }
    }
}

/// Produce an [`Element`] from a start tag with its attributes resolved.
fn element<B: BufRead>(
    reader: &NsReader<B>,
    ele: &BytesStart,
    ns: Option<String>,
    span: Span,
) -> Result<Element, Error> {
    let decoder = reader.decoder();
    let local_name = ele.local_name();
    let local = decoder
        .decode(local_name.as_ref())
        .map_err(|e| Error::QuickXml(e, span))?;

    let mut attrs = Vec::new();

    for attr in ele.attributes() {
        let attr: Attribute =
            attr.map_err(|e| Error::QuickXml(e.into(), span))?;

        // Namespace declarations were consumed by the resolver.
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }

        let (resolved, name) = reader.resolve_attribute(attr.key);
        let ns = resolve(resolved, || span)?;

        attrs.push(Attr {
            ns,
            name: decoder
                .decode(name.as_ref())
                .map_err(|e| Error::QuickXml(e, span))?
                .into_owned(),
            value: attr
                .unescape_value()
                .map_err(|e| Error::QuickXml(e, span))?
                .into_owned(),
        });
    }

    Ok(Element {
        name: local.into_owned(),
        ns,
        attrs,
        span,
    })
}

/// Convert a namespace resolution into an owned namespace URI.
fn resolve<F: FnOnce() -> Span>(
    resolved: ResolveResult,
    span: F,
) -> Result<Option<String>, Error> {
    match resolved {
        ResolveResult::Bound(Namespace(uri)) => {
            Ok(Some(String::from_utf8_lossy(uri).into_owned()))
        }
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(Error::UnboundPrefix(
            String::from_utf8_lossy(&prefix).into_owned(),
            span(),
        )),
    }
}

impl<B: BufRead> Iterator for XmlEventReader<B> {
    type Item = Result<Event, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            ReaderState::Start => {
                self.state = ReaderState::Reading;
                Some(Ok(Event::DocumentStart))
            }

            ReaderState::Reading => match self.read_next() {
                Ok(Some(ev)) => Some(Ok(ev)),
                Ok(None) => {
                    self.state = ReaderState::Done;
                    Some(Ok(Event::DocumentEnd))
                }
                Err(e) => {
                    self.state = ReaderState::Done;
                    Some(Err(e))
                }
            },

            ReaderState::Done => None,
        }
    }
}

#[cfg(test)]
mod test;
