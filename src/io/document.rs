use crate::types::{FeatureError, FeatureResult};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::borrow::Cow;

/// Percent-decode a raw product payload.
///
/// Only `%XX` escapes are decoded; `+` is kept as-is.
pub fn decode_input(raw: &str) -> FeatureResult<Cow<'_, str>> {
    urlencoding::decode(raw).map_err(|e| {
        FeatureError::MalformedInput(format!("Payload is not valid UTF-8 once decoded: {}", e))
    })
}

/// One element of a parsed product document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    name: String,
    text: String,
    children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Local name, without namespace prefix
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Trimmed text content directly under this element
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    /// Pre-order walk starting at this element
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// First element named `name` in document order, this element included
    pub fn find_first(&self, name: &str) -> Option<&XmlElement> {
        self.descendants().find(|e| e.name == name)
    }

    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.descendants().filter(move |e| e.name == name)
    }

    /// Text of the first descendant named `name`, `None` if absent or blank
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.find_first(name)
            .map(XmlElement::text)
            .filter(|t| !t.is_empty())
    }
}

pub struct Descendants<'a> {
    stack: Vec<&'a XmlElement>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlElement;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        self.stack.extend(element.children.iter().rev());
        Some(element)
    }
}

/// Parsed product XML
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    root: XmlElement,
}

impl XmlDocument {
    /// Parse well-formed XML into an element tree
    pub fn parse(xml: &str) -> FeatureResult<Self> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut open: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            let position = reader.buffer_position();
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    if root.is_some() {
                        return Err(malformed(position, "content after the root element"));
                    }
                    open.push(XmlElement::new(local_name(e.local_name().as_ref())));
                }
                Ok(Event::Empty(e)) => {
                    let element = XmlElement::new(local_name(e.local_name().as_ref()));
                    close_element(&mut open, &mut root, element, position)?;
                }
                Ok(Event::End(_)) => {
                    let element = open
                        .pop()
                        .ok_or_else(|| malformed(position, "closing tag without opening tag"))?;
                    close_element(&mut open, &mut root, element, position)?;
                }
                Ok(Event::Text(t)) => {
                    let text = t
                        .unescape()
                        .map_err(|e| malformed(position, &e.to_string()))?;
                    append_text(&mut open, &text, position)?;
                }
                Ok(Event::CData(c)) => {
                    let bytes = c.into_inner();
                    append_text(&mut open, &String::from_utf8_lossy(&bytes), position)?;
                }
                Ok(Event::Eof) => break,
                // Declarations, comments, processing instructions, doctype
                Ok(_) => {}
                Err(e) => return Err(malformed(reader.buffer_position(), &e.to_string())),
            }
        }

        if let Some(unclosed) = open.last() {
            return Err(malformed(
                reader.buffer_position(),
                &format!("element <{}> is never closed", unclosed.name),
            ));
        }

        let root = root.ok_or_else(|| {
            FeatureError::MalformedInput("Document has no root element".to_string())
        })?;
        log::debug!("Parsed product document with root <{}>", root.name);

        Ok(Self { root })
    }

    /// Decode (when asked) and parse a raw product payload
    pub fn from_payload(raw: &str, percent_decode: bool) -> FeatureResult<Self> {
        if percent_decode {
            Self::parse(&decode_input(raw)?)
        } else {
            Self::parse(raw)
        }
    }

    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    pub fn find_first(&self, name: &str) -> Option<&XmlElement> {
        self.root.find_first(name)
    }

    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.root.find_all(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find_first(name).is_some()
    }

    /// Text of the first element named `name` anywhere in the document
    pub fn text_of(&self, name: &str) -> Option<&str> {
        self.root.child_text(name)
    }
}

fn local_name(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn malformed(position: usize, reason: &str) -> FeatureError {
    FeatureError::MalformedInput(format!("XML error at byte {}: {}", position, reason))
}

fn close_element(
    open: &mut Vec<XmlElement>,
    root: &mut Option<XmlElement>,
    element: XmlElement,
    position: usize,
) -> FeatureResult<()> {
    match open.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(malformed(position, "more than one root element")),
    }
    Ok(())
}

fn append_text(open: &mut [XmlElement], text: &str, position: usize) -> FeatureResult<()> {
    match open.last_mut() {
        Some(element) => {
            element.text.push_str(text);
            Ok(())
        }
        None => Err(malformed(position, "text outside the root element")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_document() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
        <product>
            <adsHeader>
                <missionId>S1A</missionId>
            </adsHeader>
            <title><![CDATA[S1A_IW_GRDH]]></title>
            <empty/>
        </product>"#;

        let doc = XmlDocument::parse(xml).unwrap();
        assert_eq!(doc.root().name(), "product");
        assert_eq!(doc.text_of("missionId"), Some("S1A"));
        assert_eq!(doc.text_of("title"), Some("S1A_IW_GRDH"));
        assert!(doc.contains("empty"));
        assert_eq!(doc.text_of("empty"), None);
        assert!(!doc.contains("footprint"));
    }

    #[test]
    fn test_first_occurrence_in_document_order() {
        let xml = "<a><b><c>deep</c></b><c>shallow</c></a>";
        let doc = XmlDocument::parse(xml).unwrap();
        assert_eq!(doc.text_of("c"), Some("deep"));
        assert_eq!(doc.find_all("c").count(), 2);
    }

    #[test]
    fn test_namespace_prefix_is_dropped() {
        let doc = XmlDocument::parse("<s1:product xmlns:s1=\"urn:s1\"><s1:title>x</s1:title></s1:product>")
            .unwrap();
        assert_eq!(doc.text_of("title"), Some("x"));
    }

    #[test]
    fn test_entities_are_unescaped() {
        let doc = XmlDocument::parse("<p><t>VV &amp; VH</t></p>").unwrap();
        assert_eq!(doc.text_of("t"), Some("VV & VH"));
    }

    #[test]
    fn test_malformed_documents_are_rejected() {
        let cases = [
            "<product><title>x</product>",
            "<product><title>x</title>",
            "</product>",
            "<a></a><b></b>",
            "",
            "just text",
        ];

        for xml in cases {
            match XmlDocument::parse(xml) {
                Err(FeatureError::MalformedInput(_)) => {}
                other => panic!("expected malformed input for {:?}, got {:?}", xml, other),
            }
        }
    }

    #[test]
    fn test_percent_encoded_payload() {
        let raw = "%3Cproduct%3E%3Cmode%3EIW%3C%2Fmode%3E%3C%2Fproduct%3E";
        let doc = XmlDocument::from_payload(raw, true).unwrap();
        assert_eq!(doc.text_of("mode"), Some("IW"));

        assert!(matches!(
            XmlDocument::from_payload(raw, false),
            Err(FeatureError::MalformedInput(_))
        ));
    }
}
