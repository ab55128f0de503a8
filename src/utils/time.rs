use crate::err::{DcpError, DocumentKind, Result};

use jiff::Timestamp;

/// Parses an `IssueDate` element (`xs:dateTime`, e.g. `2012-09-28T03:40:08+00:00`).
///
/// A missing or empty element yields `None`.
pub(crate) fn parse_issue_date(
    document: DocumentKind,
    issue_date: Option<&str>,
) -> Result<Option<Timestamp>> {
    match issue_date.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse::<Timestamp>().map(Some).map_err(|e| {
            DcpError::malformed(document, format!("invalid IssueDate `{value}`: {e}"))
        }),
    }
}
