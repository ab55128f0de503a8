mod time;
mod xml;

pub(crate) use self::time::parse_issue_date;
pub(crate) use self::xml::decode_document;
