//! Markup document model and the typed attribute accessor.
//!
//! Documents are read with `quick-xml` into a small owned [`Element`] tree.
//! Widget parsers never touch the reader; they only ask an element for
//! "attribute X as type T, or default D".

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::UiError;

/// One node of a markup document: tag, attributes, child elements and the
/// concatenated text content.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Element {
    pub tag: String,
    attrs: Vec<(String, String)>,
    pub children: Vec<Element>,
    pub text: String,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Parses a whole document and returns its root element.
    pub fn parse_document(xml: &str) -> Result<Element, UiError> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let event = reader.read_event().map_err(|e| {
                UiError::Markup(format!("at byte {}: {}", reader.buffer_position(), e))
            })?;
            match event {
                Event::Start(ref e) => stack.push(Self::open(e)?),
                Event::Empty(ref e) => {
                    let el = Self::open(e)?;
                    Self::close(&mut stack, &mut root, el)?;
                }
                Event::End(_) => {
                    let el = stack
                        .pop()
                        .ok_or_else(|| UiError::Markup("unbalanced closing tag".into()))?;
                    Self::close(&mut stack, &mut root, el)?;
                }
                Event::Text(ref t) => {
                    if let Some(top) = stack.last_mut() {
                        let text = t.unescape().map_err(|e| UiError::Markup(e.to_string()))?;
                        top.text.push_str(&text);
                    }
                }
                Event::CData(ref t) => {
                    if let Some(top) = stack.last_mut() {
                        top.text
                            .push_str(&String::from_utf8_lossy(&t.clone().into_inner()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(UiError::Markup(format!(
                "unclosed element <{}>",
                stack[stack.len() - 1].tag
            )));
        }
        root.ok_or_else(|| UiError::Markup("empty document".into()))
    }

    fn open(e: &BytesStart) -> Result<Element, UiError> {
        let mut el = Element::new(String::from_utf8_lossy(e.name().as_ref()).into_owned());
        for attr in e.attributes() {
            let attr = attr.map_err(|e| UiError::Markup(e.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| UiError::Markup(e.to_string()))?
                .into_owned();
            el.attrs.push((key, value));
        }
        Ok(el)
    }

    fn close(
        stack: &mut [Element],
        root: &mut Option<Element>,
        el: Element,
    ) -> Result<(), UiError> {
        match stack.last_mut() {
            Some(parent) => parent.children.push(el),
            None if root.is_none() => *root = Some(el),
            None => return Err(UiError::Markup("multiple root elements".into())),
        }
        Ok(())
    }

    pub fn has(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn str_or(&self, name: &str, default: &str) -> String {
        self.attr(name).unwrap_or(default).to_string()
    }

    /// Handler names are optional; an empty attribute means "no handler".
    pub fn handler(&self, name: &str) -> Option<String> {
        self.attr(name)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// Strict integer read: `Ok(None)` when absent, an error when malformed.
    pub fn try_int(&self, name: &str) -> Result<Option<i32>, UiError> {
        match self.attr(name) {
            None => Ok(None),
            Some(v) => v.trim().parse::<i32>().map(Some).map_err(|_| {
                UiError::InvalidArgument(format!("attribute '{name}' must be an integer"))
            }),
        }
    }

    pub fn int_or(&self, name: &str, default: i32) -> i32 {
        self.coerce(name, default, |v| v.parse::<i32>().ok())
    }

    pub fn float_or(&self, name: &str, default: f64) -> f64 {
        self.coerce(name, default, |v| v.parse::<f64>().ok().filter(|f| f.is_finite()))
    }

    pub fn bool_or(&self, name: &str, default: bool) -> bool {
        self.coerce(name, default, |v| match v {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        })
    }

    /// Comma separated integers, exactly `len` of them.
    pub fn int_list(&self, name: &str, len: usize) -> Option<Vec<i32>> {
        let raw = self.attr(name)?;
        let values: Option<Vec<i32>> = raw.split(',').map(|s| s.trim().parse().ok()).collect();
        match values {
            Some(v) if v.len() == len => Some(v),
            _ => {
                log::warn!("attribute '{name}' of <{}> ignored: {raw:?}", self.tag);
                None
            }
        }
    }

    /// Reads a value that may be one of several keywords.
    pub fn keyword_or<T: Copy>(&self, name: &str, default: T, table: &[(&str, T)]) -> T {
        self.coerce(name, default, |v| {
            table.iter().find(|(k, _)| *k == v).map(|(_, t)| *t)
        })
    }

    fn coerce<T>(&self, name: &str, default: T, parse: impl FnOnce(&str) -> Option<T>) -> T {
        match self.attr(name) {
            None => default,
            Some(raw) => match parse(raw.trim()) {
                Some(v) => v,
                None => {
                    log::debug!(
                        "attribute '{name}' of <{}> has malformed value {raw:?}; using default",
                        self.tag
                    );
                    default
                }
            },
        }
    }

    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.tag == tag)
    }
}
