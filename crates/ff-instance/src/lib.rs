//! Default-value merging for form models.
//!
//! Projects launch defaults onto a model's data root before the rendering
//! engine takes over: each own entry whose locator resolves to a node gets
//! its text content replaced, everything else in the model is left alone.

use ff_api_types::DefaultValues;
use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InstanceError {
    #[error("malformed model XML: {0}")]
    Parse(String),
    #[error("model has no data root element")]
    MissingDataRoot,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
struct Element {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
}

/// Merge the own entries of `defaults` into `model_xml`.
///
/// Returns `Ok(None)` when there is nothing to merge — no own entries, or
/// none of them resolve to a node — which tells the caller to hand the model
/// to the engine as-is. Otherwise returns the serialized data root (the
/// first element child of the document root) with the resolved entries'
/// text content replaced. Locators may carry leading slashes and the
/// document-root / data-root segments; unresolvable locators are skipped.
pub fn prepare_instance(
    model_xml: &str,
    defaults: &DefaultValues,
) -> Result<Option<String>, InstanceError> {
    if !defaults.has_own_entries() {
        return Ok(None);
    }

    let document = parse_document(model_xml)?;
    let mut data_root = document
        .children
        .iter()
        .find_map(|node| match node {
            Node::Element(el) => Some(el.clone()),
            Node::Text(_) => None,
        })
        .ok_or(InstanceError::MissingDataRoot)?;

    let mut applied = 0;
    for (path, value) in defaults.own_entries() {
        if let Some(node) = resolve_path_mut(&mut data_root, &document.name, path) {
            node.children = vec![Node::Text(value.to_string())];
            applied += 1;
        }
    }

    if applied == 0 {
        return Ok(None);
    }
    Ok(Some(serialize_element(&data_root)))
}

/// Walk `path` from the data root. The document-root and data-root names
/// are accepted as leading segments and skipped, so `//instance/data/el`,
/// `/data/el`, and `el` all address the same node. An empty remainder does
/// not address anything (the data root itself is never a merge target).
fn resolve_path_mut<'a>(
    data_root: &'a mut Element,
    document_root_name: &str,
    path: &str,
) -> Option<&'a mut Element> {
    let segments: Vec<&str> = path
        .split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    let mut idx = 0;
    if segments.get(idx).copied() == Some(document_root_name) {
        idx += 1;
    }
    if segments.get(idx).copied() == Some(data_root.name.as_str()) {
        idx += 1;
    }
    if idx >= segments.len() {
        return None;
    }

    let mut current = data_root;
    for segment in &segments[idx..] {
        current = current.children.iter_mut().find_map(|node| match node {
            Node::Element(el) if el.name == *segment => Some(el),
            _ => None,
        })?;
    }
    Some(current)
}

fn parse_document(xml: &str) -> Result<Element, InstanceError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|err| InstanceError::Parse(err.to_string()))?;
        match event {
            Event::Start(start) => {
                stack.push(element_from_start(&start)?);
            }
            Event::Empty(start) => {
                let element = element_from_start(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| InstanceError::Parse("unexpected closing tag".into()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|err| InstanceError::Parse(err.to_string()))?;
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(Node::Text(text.into_owned()));
                }
                // Text outside the root (prolog whitespace) is dropped.
            }
            Event::CData(data) => {
                if let Some(parent) = stack.last_mut() {
                    parent
                        .children
                        .push(Node::Text(String::from_utf8_lossy(&data).into_owned()));
                }
            }
            Event::Eof => break,
            // Declarations, comments, and processing instructions carry no
            // answer values.
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(InstanceError::Parse("unclosed element".into()));
    }
    root.ok_or_else(|| InstanceError::Parse("document has no root element".into()))
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element, InstanceError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attrs = Vec::new();
    for attr in start.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| InstanceError::Parse(err.to_string()))?
            .into_owned();
        attrs.push((key, value));
    }
    Ok(Element {
        name,
        attrs,
        children: Vec::new(),
    })
}

fn attach(
    stack: &mut Vec<Element>,
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), InstanceError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(Node::Element(element));
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(InstanceError::Parse(
            "content after the document root".into(),
        )),
    }
}

fn serialize_element(element: &Element) -> String {
    let mut out = String::new();
    write_element(&mut out, element);
    out
}

fn write_element(out: &mut String, element: &Element) {
    out.push('<');
    out.push_str(&element.name);
    for (key, value) in &element.attrs {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape(value.as_str()));
        out.push('"');
    }
    if element.children.is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    for child in &element.children {
        match child {
            Node::Element(el) => write_element(out, el),
            Node::Text(text) => out.push_str(&escape(text.as_str())),
        }
    }
    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}
