use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, warn};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;

use super::batch;
use super::{Error, GmailApi, ListQuery, Message, MessageList, Result};

/// Blocking Gmail REST client authenticated with a bearer token.
///
/// Holds no mutable state, so one instance is shared by every stage of a run.
pub struct GmailClient {
    http: Client,
    base_url: String,
    access_token: String,
}

impl GmailClient {
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("gmail_analyzer/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        })
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.http
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.access_token)
    }

    fn send_batch(&self, paths: &[String]) -> Result<Vec<Result<Message>>> {
        let boundary = new_boundary();
        let body = batch::encode(&boundary, paths);

        let resp = self
            .http
            .post(format!("{}/batch/gmail/v1", self.base_url))
            .bearer_auth(&self.access_token)
            .header(
                CONTENT_TYPE,
                format!("multipart/mixed; boundary={boundary}"),
            )
            .body(body)
            .send()?;

        let status = resp.status();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = resp.bytes()?;

        if !status.is_success() {
            return Err(batch::api_error(
                status.as_u16(),
                &String::from_utf8_lossy(&bytes),
            ));
        }
        let content_type =
            content_type.ok_or_else(|| Error::Batch("reply has no Content-Type".to_string()))?;

        let parts = batch::decode(&content_type, &bytes)?;
        debug!("batch reply: {} parts for {} requests", parts.len(), paths.len());
        Ok(batch::collect_results(paths.len(), parts))
    }
}

fn messages_path(user_id: &str) -> String {
    format!("/gmail/v1/users/{user_id}/messages")
}

fn metadata_path(user_id: &str, id: &str, headers: &[String]) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    query.append_pair("format", "metadata");
    for h in headers {
        query.append_pair("metadataHeaders", h);
    }
    format!("{}/{id}?{}", messages_path(user_id), query.finish())
}

fn new_boundary() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("batch_{nanos:x}")
}

fn read_json<T: DeserializeOwned>(resp: reqwest::blocking::Response) -> Result<T> {
    let status = resp.status();
    let text = resp.text()?;
    if !status.is_success() {
        return Err(batch::api_error(status.as_u16(), &text));
    }
    Ok(serde_json::from_str(&text)?)
}

impl GmailApi for GmailClient {
    fn list_messages(&self, user_id: &str, query: &ListQuery) -> Result<MessageList> {
        let mut req = self
            .get(&messages_path(user_id))
            .query(&[("labelIds", query.label_id.as_str())]);
        if let Some(token) = &query.page_token {
            req = req.query(&[("pageToken", token.as_str())]);
        }
        read_json(req.send()?)
    }

    fn batch_get_metadata(
        &self,
        user_id: &str,
        ids: &[String],
        headers: &[String],
    ) -> Vec<Result<Message>> {
        let paths: Vec<String> = ids
            .iter()
            .map(|id| metadata_path(user_id, id, headers))
            .collect();

        match self.send_batch(&paths) {
            Ok(results) => results,
            Err(e) => {
                warn!("batch of {} requests failed as a whole: {e}", ids.len());
                let reason = e.to_string();
                ids.iter()
                    .map(|_| Err(Error::Batch(reason.clone())))
                    .collect()
            }
        }
    }

    fn get_message_full(&self, user_id: &str, id: &str) -> Result<Message> {
        let path = format!("{}/{id}", messages_path(user_id));
        read_json(self.get(&path).query(&[("format", "full")]).send()?)
    }
}
