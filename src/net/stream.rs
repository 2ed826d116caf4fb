//! Server-sent-events reader for streamed generation responses.
//!
//! The backend answers `streamGenerateContent?alt=sse` with one `data:` line
//! per partial response. Each event's text is handed to the caller in
//! arrival order; nothing is buffered across events.

use std::io::BufRead;

use super::error::AdvisorError;
use super::wire::GenerateResponse;

/// Read events from `reader` until end of stream, calling `on_chunk` once per
/// non-empty text fragment. Returns the number of fragments delivered.
///
/// Blank lines, `:` comments, non-data fields and a `[DONE]` sentinel are
/// skipped. An event that fails to parse or carries an `error` object ends
/// the stream with an error; fragments delivered before it stand.
pub fn read_sse_chunks<R, F>(reader: R, mut on_chunk: F) -> Result<usize, AdvisorError>
where
    R: BufRead,
    F: FnMut(&str),
{
    let mut delivered = 0;
    for line in reader.lines() {
        let line = line.map_err(|e| AdvisorError::Request(format!("stream read: {}", e)))?;
        let Some(payload) = data_payload(&line) else {
            continue;
        };
        if payload.is_empty() || payload == "[DONE]" {
            continue;
        }

        let event: GenerateResponse = serde_json::from_str(payload)?;
        if let Some(err) = event.error {
            return Err(AdvisorError::Backend(match err.code {
                Some(code) => format!("{} ({})", err.message, code),
                None => err.message,
            }));
        }

        let text = event.text();
        if !text.is_empty() {
            on_chunk(&text);
            delivered += 1;
        }
    }
    Ok(delivered)
}

/// Payload of a `data:` field, without the optional single leading space.
fn data_payload(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("data:")?;
    let rest = rest.strip_prefix(' ').unwrap_or(rest);
    Some(rest.trim_end_matches('\r'))
}
