use log::{debug, warn};

use crate::domain::UnsubscribeOutcome;
use crate::gmail::GmailApi;
use crate::headers::bracketed_http_links;

pub const UNSUBSCRIBE_HEADER: &str = "list-unsubscribe";

/// Looks up the unsubscribe mechanism advertised by a message.
pub struct UnsubscribeResolver<'a> {
    api: &'a dyn GmailApi,
    user_id: &'a str,
}

impl<'a> UnsubscribeResolver<'a> {
    pub fn new(api: &'a dyn GmailApi, user_id: &'a str) -> Self {
        Self { api, user_id }
    }

    /// Fetch the full message and classify its `List-Unsubscribe` header.
    /// Fetch errors come back as [`UnsubscribeOutcome::Error`].
    pub fn resolve(&self, message_id: &str) -> UnsubscribeOutcome {
        let message = match self.api.get_message_full(self.user_id, message_id) {
            Ok(m) => m,
            Err(e) => {
                warn!("could not fetch message {message_id}: {e}");
                return UnsubscribeOutcome::Error(e.to_string());
            }
        };

        match message.header_ignore_case(UNSUBSCRIBE_HEADER) {
            Some(value) => {
                debug!("{message_id}: List-Unsubscribe: {value}");
                classify(value)
            }
            None => UnsubscribeOutcome::NotFound,
        }
    }
}

/// Classify a `List-Unsubscribe` value. HTTP links win over `mailto:`, since
/// following a link needs no mail-sending permission.
pub fn classify(value: &str) -> UnsubscribeOutcome {
    if value.contains("<http") {
        let links = bracketed_http_links(value);
        if links.is_empty() {
            UnsubscribeOutcome::NotFound
        } else {
            UnsubscribeOutcome::Resolved(links)
        }
    } else if value.contains("<mailto:") {
        UnsubscribeOutcome::MailtoOnly
    } else {
        UnsubscribeOutcome::NotFound
    }
}
