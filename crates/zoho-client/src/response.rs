//! Response interpreters.
//!
//! Stateless functions over the raw body returned by
//! [`ZohoClient::do_call`](crate::ZohoClient::do_call). Each one parses the
//! XML or JSON reply, surfaces a service-reported error as
//! [`ErrorKind::Service`], and extracts one record shape.

use std::collections::BTreeMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, ErrorKind, Result};

/// One row of CRM data: field name to field value.
pub type Record = BTreeMap<String, String>;

/// Check an XML response for a service-reported error.
///
/// For every `error` element under the root, the first nested `message`
/// text is raised as [`ErrorKind::Service`], in document order. An `error`
/// element without a `message` child is ignored, matching the service's
/// contract that errors always carry one.
///
/// ```text
/// <response uri="..."><error><code>4401</code><message>...</message></error></response>
/// ```
pub fn check_successful_xml(response: &str) -> Result<()> {
    let mut reader = Reader::from_str(response);
    let mut error_depth: Option<usize> = None;
    let mut message: Option<String> = None;
    let mut depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                if e.name().as_ref() == b"error" && error_depth.is_none() {
                    error_depth = Some(depth);
                }
                if error_depth.is_some() && e.name().as_ref() == b"message" {
                    message = Some(String::new());
                }
            }
            Event::Text(t) => {
                if let Some(ref mut buf) = message {
                    buf.push_str(&t.unescape()?);
                }
            }
            Event::End(e) => {
                if e.name().as_ref() == b"message" {
                    if let Some(text) = message.take() {
                        return Err(Error::new(ErrorKind::Service { message: text }));
                    }
                }
                if error_depth == Some(depth) {
                    error_depth = None;
                }
                depth -= 1;
            }
            Event::Eof => return Ok(()),
            _ => {}
        }
    }
}

/// Extract the Contact/Account mapping produced by a lead conversion.
///
/// Expects one `Contact` and one `Account` element as direct children of
/// the root, each keyed by its `param` attribute. A missing element or
/// attribute is [`ErrorKind::MissingElement`] rather than a partial result.
pub fn get_converted_records(response: &str) -> Result<Record> {
    let mut reader = Reader::from_str(response);
    let mut record = Record::new();
    let mut pending: Option<(String, String)> = None;
    let mut depth = 0usize;
    let mut seen_contact = false;
    let mut seen_account = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                // Direct children of the root element sit at depth 2
                if depth == 2 {
                    if let Some(name) = conversion_element(&e) {
                        match name {
                            "Contact" => seen_contact = true,
                            _ => seen_account = true,
                        }
                        let key = require_param(&e, name)?;
                        pending = Some((key, String::new()));
                    }
                }
            }
            Event::Empty(e) => {
                if depth == 1 {
                    if let Some(name) = conversion_element(&e) {
                        match name {
                            "Contact" => seen_contact = true,
                            _ => seen_account = true,
                        }
                        let key = require_param(&e, name)?;
                        record.insert(key, String::new());
                    }
                }
            }
            Event::Text(t) => {
                if let Some((_, ref mut buf)) = pending {
                    buf.push_str(&t.unescape()?);
                }
            }
            Event::End(_) => {
                if depth == 2 {
                    if let Some((key, value)) = pending.take() {
                        record.insert(key, value);
                    }
                }
                depth -= 1;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_contact {
        return Err(Error::new(ErrorKind::MissingElement("Contact".to_string())));
    }
    if !seen_account {
        return Err(Error::new(ErrorKind::MissingElement("Account".to_string())));
    }
    Ok(record)
}

fn conversion_element(e: &BytesStart<'_>) -> Option<&'static str> {
    match e.name().as_ref() {
        b"Contact" => Some("Contact"),
        b"Account" => Some("Account"),
        _ => None,
    }
}

fn require_param(e: &BytesStart<'_>, element: &str) -> Result<String> {
    let attr = e
        .try_get_attribute("param")
        .map_err(|err| Error::with_source(ErrorKind::Xml(err.to_string()), err))?
        .ok_or_else(|| {
            Error::new(ErrorKind::MissingElement(format!(
                "param attribute on {element}"
            )))
        })?;
    Ok(attr.unescape_value()?.into_owned())
}

/// Extract the records created by an insert call.
///
/// One [`Record`] per `recorddetail` element, in document order, mapping
/// each `FL` element's `val` attribute to its text. An input without
/// matching elements yields an empty vec.
///
/// ```text
/// <response uri="...">
///   <result>
///     <message>Record(s) added successfully</message>
///     <recorddetail>
///       <FL val="Id">177376000000142007</FL>
///       <FL val="Created Time">2010-06-27 21:37:20</FL>
///     </recorddetail>
///   </result>
/// </response>
/// ```
pub fn get_inserted_records(response: &str) -> Result<Vec<Record>> {
    let mut reader = Reader::from_str(response);
    let mut records = Vec::new();
    let mut current: Option<Record> = None;
    let mut field: Option<(String, String)> = None;
    let mut stack: Vec<Vec<u8>> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.name().as_ref().to_vec();
                if name == b"recorddetail" && in_result(&stack) {
                    current = Some(Record::new());
                } else if name == b"FL" && current.is_some() {
                    field = Some((field_name(&e)?, String::new()));
                }
                stack.push(name);
            }
            Event::Empty(e) => {
                if e.name().as_ref() == b"FL" {
                    if let Some(ref mut record) = current {
                        record.insert(field_name(&e)?, String::new());
                    }
                } else if e.name().as_ref() == b"recorddetail" && in_result(&stack) {
                    records.push(Record::new());
                }
            }
            Event::Text(t) => {
                if let Some((_, ref mut buf)) = field {
                    buf.push_str(&t.unescape()?);
                }
            }
            Event::End(e) => {
                stack.pop();
                match e.name().as_ref() {
                    b"FL" => {
                        if let (Some(record), Some((name, value))) = (current.as_mut(), field.take())
                        {
                            record.insert(name, value);
                        }
                    }
                    b"recorddetail" => {
                        if let Some(record) = current.take() {
                            records.push(record);
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(records)
}

/// True when the open-element stack is `<root>/<result>`.
fn in_result(stack: &[Vec<u8>]) -> bool {
    stack.len() == 2 && stack[1] == b"result"
}

fn field_name(e: &BytesStart<'_>) -> Result<String> {
    let attr = e
        .try_get_attribute("val")
        .map_err(|err| Error::with_source(ErrorKind::Xml(err.to_string()), err))?
        .ok_or_else(|| {
            Error::new(ErrorKind::MissingElement("val attribute on FL".to_string()))
        })?;
    Ok(attr.unescape_value()?.into_owned())
}

/// Decode a JSON response body, surfacing a service-reported error.
///
/// ```text
/// {"response": {"uri": "...", "error": {"code": 4500, "message": "..."}}}
/// ```
pub fn decode_json(json_data: &str) -> Result<serde_json::Value> {
    let data: serde_json::Value = serde_json::from_str(json_data)?;

    if let Some(error) = data.get("response").and_then(|r| r.get("error")) {
        return Err(Error::new(ErrorKind::Service {
            message: error.to_string(),
        }));
    }

    Ok(data)
}
