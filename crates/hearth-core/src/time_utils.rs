use chrono::{SecondsFormat, Utc};

/// Returns the current UTC instant formatted as an RFC 3339 string.
///
/// The backend stamps every message it produces; the client stamps only the
/// optimistic user messages it inserts ahead of a send.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
