use crate::err::{DcpError, DocumentKind, Result};

use serde::de::DeserializeOwned;

/// Decodes a whole XML document into its raw serde mirror.
pub(crate) fn decode_document<T: DeserializeOwned>(
    document: DocumentKind,
    bytes: &[u8],
) -> Result<T> {
    let text = std::str::from_utf8(bytes).map_err(|e| DcpError::malformed(document, e))?;
    let text = text.trim_start_matches('\u{feff}');

    quick_xml::de::from_str(text).map_err(|e| DcpError::malformed(document, e))
}
