//! Google `multipart/mixed` batch wire format.
//!
//! Every sub-request is an `application/http` part tagged with
//! `Content-ID: <item-N>`. The server answers with one part per sub-request,
//! tagged `<response-item-N>`, in no particular order.

use std::fmt::Write as _;

use log::warn;
use mailparse::MailHeaderMap;
use serde::Deserialize;

use super::{Error, Message, Result};

/// One embedded HTTP response taken from a batch reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BatchPart {
    pub index: usize,
    pub status: u16,
    pub body: String,
}

impl BatchPart {
    pub fn into_message(self) -> Result<Message> {
        if (200..300).contains(&self.status) {
            Ok(serde_json::from_str(&self.body)?)
        } else {
            Err(api_error(self.status, &self.body))
        }
    }
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Build an [`Error::Api`] from a status and a (possibly JSON) error body.
pub(crate) fn api_error(status: u16, body: &str) -> Error {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    Error::Api { status, message }
}

/// Serialize GET sub-requests (path + query, relative to the API host).
pub(crate) fn encode(boundary: &str, paths: &[String]) -> String {
    let mut body = String::new();
    for (i, path) in paths.iter().enumerate() {
        // writing into a String cannot fail
        let _ = write!(
            body,
            "--{boundary}\r\n\
             Content-Type: application/http\r\n\
             Content-ID: <item-{i}>\r\n\
             \r\n\
             GET {path}\r\n\
             \r\n"
        );
    }
    let _ = write!(body, "--{boundary}--\r\n");
    body
}

/// Split a batch reply into its parts. `content_type` is the reply's
/// `Content-Type` header, which carries the boundary.
pub(crate) fn decode(content_type: &str, body: &[u8]) -> Result<Vec<BatchPart>> {
    let mut raw = format!("Content-Type: {content_type}\r\n\r\n").into_bytes();
    raw.extend_from_slice(body);

    let parsed = mailparse::parse_mail(&raw).map_err(|e| Error::Batch(e.to_string()))?;
    if !parsed.ctype.mimetype.eq_ignore_ascii_case("multipart/mixed") {
        return Err(Error::Batch(format!(
            "expected multipart/mixed, got {}",
            parsed.ctype.mimetype
        )));
    }

    let mut parts = Vec::with_capacity(parsed.subparts.len());
    for sub in &parsed.subparts {
        let Some(index) = sub
            .headers
            .get_first_value("Content-ID")
            .and_then(|id| parse_content_id(&id))
        else {
            warn!("skipping batch part without a usable Content-ID");
            continue;
        };

        let raw_http = sub
            .get_body_raw()
            .map_err(|e| Error::Batch(e.to_string()))?;
        let text = String::from_utf8_lossy(&raw_http);
        match split_http_response(&text) {
            Some((status, body)) => parts.push(BatchPart {
                index,
                status,
                body: body.to_string(),
            }),
            None => warn!("batch part {index} holds no HTTP response"),
        }
    }
    Ok(parts)
}

/// Place decoded parts back in submission order. Items the server did not
/// answer become [`Error::MissingItem`].
pub(crate) fn collect_results(expected: usize, parts: Vec<BatchPart>) -> Vec<Result<Message>> {
    let mut slots: Vec<Option<BatchPart>> = (0..expected).map(|_| None).collect();
    for part in parts {
        match slots.get_mut(part.index) {
            Some(slot @ None) => *slot = Some(part),
            Some(Some(_)) => warn!("duplicate batch part for item {}", part.index),
            None => warn!("batch part index {} out of range", part.index),
        }
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(i, slot)| match slot {
            Some(part) => part.into_message(),
            None => Err(Error::MissingItem(i)),
        })
        .collect()
}

/// `<response-item-12>` or `<item-12>` -> 12
fn parse_content_id(value: &str) -> Option<usize> {
    let id = value.trim().trim_start_matches('<').trim_end_matches('>');
    let id = id.strip_prefix("response-").unwrap_or(id);
    id.strip_prefix("item-")?.parse().ok()
}

/// Status code and body of an embedded `HTTP/1.1 200 OK ...` response.
fn split_http_response(text: &str) -> Option<(u16, &str)> {
    let text = text.trim_start();
    let status_line = text.lines().next()?;
    let mut fields = status_line.split_whitespace();
    if !fields.next()?.starts_with("HTTP/") {
        return None;
    }
    let status = fields.next()?.parse().ok()?;

    let body = match (text.find("\r\n\r\n"), text.find("\n\n")) {
        (Some(crlf), Some(lf)) if lf < crlf => &text[lf + 2..],
        (Some(crlf), _) => &text[crlf + 4..],
        (None, Some(lf)) => &text[lf + 2..],
        (None, None) => "",
    };
    Some((status, body))
}
