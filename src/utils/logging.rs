use serde::Serialize;

/// Emits `value` as pretty JSON at DEBUG, skipping serialization entirely when
/// DEBUG is filtered out.
pub(crate) fn debug_pretty_json<T>(what: &str, value: &T)
where
    T: Serialize,
{
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }

    match serde_json::to_string_pretty(value) {
        Ok(pretty) => tracing::debug!(body = %pretty, "{what}"),
        Err(error) => tracing::debug!(%error, "{what} (pretty serialize failed)"),
    }
}

/// First `max_chars` characters of a response body, for log lines.
pub(crate) fn body_preview(bytes: &[u8], max_chars: usize) -> String {
    let raw = String::from_utf8_lossy(bytes);
    format!("{raw:.max_chars$}")
}
