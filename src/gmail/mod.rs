//! Gmail REST API boundary: wire types, errors and the [`GmailApi`] trait.

mod batch;
mod client;

pub use client::GmailClient;

#[cfg(test)]
use mockall::automock;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_API_BASE_URL: &str = "https://gmail.googleapis.com";

/// Errors raised while talking to the Gmail API.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Connection error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Gmail API error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Encoding/Decoding error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Malformed batch response: {0}")]
    Batch(String),
    #[error("Batch response carried no result for item {0}")]
    MissingItem(usize),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Entry of a `messages.list` page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRef {
    pub id: String,
    #[serde(default)]
    pub thread_id: String,
}

/// One page of `messages.list`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageList {
    #[serde(default)]
    pub messages: Vec<MessageRef>,
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub result_size_estimate: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Payload {
    #[serde(default)]
    pub headers: Vec<Header>,
}

/// A message resource, as returned by `messages.get` in `metadata` or `full` format.
/// Body parts of `full` responses are not modelled.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    #[serde(default)]
    pub thread_id: String,
    #[serde(default)]
    pub label_ids: Vec<String>,
    #[serde(default)]
    pub payload: Payload,
}

impl Message {
    /// First header whose name matches `name` exactly.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.payload
            .headers
            .iter()
            .find(|h| h.name == name)
            .map(|h| h.value.as_str())
    }

    /// First header whose name matches `name` ignoring ASCII case.
    pub fn header_ignore_case(&self, name: &str) -> Option<&str> {
        self.payload
            .headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }
}

/// Parameters of a `messages.list` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub label_id: String,
    pub page_token: Option<String>,
}

/// The subset of the Gmail API the analyzer needs.
#[cfg_attr(test, automock)]
pub trait GmailApi {
    fn list_messages(&self, user_id: &str, query: &ListQuery) -> Result<MessageList>;

    /// Fetch metadata for every id in a single batch call. The returned vector
    /// has exactly one entry per id, in the order of `ids`.
    fn batch_get_metadata(
        &self,
        user_id: &str,
        ids: &[String],
        headers: &[String],
    ) -> Vec<Result<Message>>;

    fn get_message_full(&self, user_id: &str, id: &str) -> Result<Message>;
}
