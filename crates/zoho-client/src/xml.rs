//! Outgoing XML payloads.
//!
//! Zoho write operations carry an XML document in a form parameter, e.g.
//! `<Leads><row no="1"><FL val="First Name">John</FL></row></Leads>`.
//! [`Element`] is the owned tree callers build for
//! [`do_xml_call`](crate::ZohoClient::do_xml_call); escaping is handled
//! by `quick-xml` during serialization.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{Error, ErrorKind, Result};

/// One element of an outgoing XML document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    /// Create an element with the given tag name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add an attribute.
    pub fn attr(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.attributes.push((key.into(), value.to_string()));
        self
    }

    /// Set the text content.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Append a child element.
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// The tag name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Serialize the tree to its textual form.
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        self.write_into(&mut writer)?;
        String::from_utf8(writer.into_inner())
            .map_err(|e| Error::with_source(ErrorKind::Xml("non-UTF-8 output".to_string()), e))
    }

    fn write_into(&self, writer: &mut Writer<Vec<u8>>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.text.is_none() && self.children.is_empty() {
            write_event(writer, Event::Empty(start))?;
            return Ok(());
        }

        write_event(writer, Event::Start(start))?;
        if let Some(ref text) = self.text {
            write_event(writer, Event::Text(BytesText::new(text)))?;
        }
        for child in &self.children {
            child.write_into(writer)?;
        }
        write_event(writer, Event::End(BytesEnd::new(self.name.as_str())))?;
        Ok(())
    }
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| Error::with_source(ErrorKind::Xml(e.to_string()), e))
}
