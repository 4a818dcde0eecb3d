use std::io;

use quick_xml::Writer;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::RenderError;

const INDENT: &str = "  ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: &'static str,
    pub attributes: Vec<(&'static str, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.attributes.push((key, markup_chars(&value.into())));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.push(child);
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.push_text(text);
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let text = markup_chars(text);
        if let Some(Node::Text(previous)) = self.children.last_mut() {
            previous.push_str(&text);
        } else {
            self.children.push(Node::Text(text));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

fn markup_chars(text: &str) -> String {
    text.chars()
        .map(|ch| match ch {
            '\t' | '\n' | '\r' => ch,
            '\u{0}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}' => ' ',
            _ => ch,
        })
        .collect()
}

/// Serialize `roots` one after another, separated by newlines.
///
/// An element whose children are all elements is laid out one child per line,
/// indented by two spaces. An element holding any text is written on one
/// line together with everything below it. Childless elements self-close.
pub fn write_markup(roots: &[Element], declaration: bool) -> Result<String, RenderError> {
    let mut writer = Writer::new(Vec::new());

    if declaration {
        emit(
            &mut writer,
            Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
        )?;
        emit_raw(&mut writer, "\n")?;
    }

    for (index, root) in roots.iter().enumerate() {
        if index > 0 {
            emit_raw(&mut writer, "\n")?;
        }
        write_element(&mut writer, root, 0, false)?;
    }

    if declaration {
        emit_raw(&mut writer, "\n")?;
    }

    Ok(String::from_utf8(writer.into_inner())?)
}

fn write_element(
    writer: &mut Writer<Vec<u8>>,
    element: &Element,
    depth: usize,
    inline: bool,
) -> Result<(), RenderError> {
    let mut start = BytesStart::new(element.name);
    for (key, value) in &element.attributes {
        start.push_attribute((*key, value.as_str()));
    }

    if element.children.is_empty() {
        return emit(writer, Event::Empty(start));
    }
    emit(writer, Event::Start(start))?;

    let inline = inline
        || element
            .children
            .iter()
            .any(|child| matches!(child, Node::Text(_)));

    for child in &element.children {
        if !inline {
            emit_raw(writer, &indentation(depth + 1))?;
        }
        match child {
            Node::Element(child) => write_element(writer, child, depth + 1, inline)?,
            Node::Text(text) => emit(
                writer,
                Event::Text(BytesText::from_escaped(partial_escape(text.as_str()))),
            )?,
        }
    }

    if !inline {
        emit_raw(writer, &indentation(depth))?;
    }
    emit(writer, Event::End(BytesEnd::new(element.name)))
}

fn indentation(depth: usize) -> String {
    format!("\n{}", INDENT.repeat(depth))
}

fn emit_raw(writer: &mut Writer<Vec<u8>>, text: &str) -> Result<(), RenderError> {
    emit(writer, Event::Text(BytesText::from_escaped(text)))
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), RenderError> {
    writer
        .write_event(event)
        .map_err(|err| RenderError::Write(io::Error::other(err)))
}
