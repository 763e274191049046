//! Line-oriented ticket response parsing.

use std::collections::BTreeMap;

use zoho_api_client::{Error, ErrorKind, Result};

/// Parse the accounts endpoint's newline-delimited `KEY=VALUE` body.
///
/// Comment lines (leading `#`) and blank lines are skipped; any other
/// line without `=` fails with [`ErrorKind::TicketResponse`].
///
/// Example response:
///
/// ```text
/// #
/// #Sun Jun 27 20:10:30 PDT 2010
/// GETUSERNAME=null
/// WARNING=null
/// PASS_EXPIRY=-1
/// TICKET=3bc26b16d97473a1245dbf93a5dcd153
/// RESULT=TRUE
/// ```
pub(crate) fn parse_ticket_body(body: &str) -> Result<BTreeMap<String, String>> {
    let mut fields = BTreeMap::new();

    for line in body.lines() {
        if line.starts_with('#') {
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }
        let (key, value) = line.split_once('=').ok_or_else(|| {
            Error::new(ErrorKind::TicketResponse(format!(
                "line without '=': {line}"
            )))
        })?;
        fields.insert(key.to_string(), value.to_string());
    }

    Ok(fields)
}
