use log::{debug, info};

use crate::domain::MessageRef;
use crate::gmail::{GmailApi, ListQuery, MessageList, Result};

/// Upper bound on messages examined per run.
pub const MAX_LISTED_MESSAGES: usize = 300;

/// Page through `messages.list` for one label until pagination ends or
/// [`MAX_LISTED_MESSAGES`] refs are collected. Any failed page aborts the
/// listing, since the next page depends on its token.
pub fn list_messages(
    api: &dyn GmailApi,
    user_id: &str,
    label_id: &str,
) -> Result<Vec<MessageRef>> {
    let mut query = ListQuery {
        label_id: label_id.to_string(),
        page_token: None,
    };

    let MessageList {
        messages: mut refs,
        next_page_token: mut next,
        result_size_estimate,
    } = api.list_messages(user_id, &query)?;
    info!("listing {label_id}: provider estimates {result_size_estimate} messages");

    while let Some(token) = next {
        if refs.len() >= MAX_LISTED_MESSAGES {
            break;
        }
        query.page_token = Some(token);
        let page = api.list_messages(user_id, &query)?;
        debug!("page of {} refs ({} so far)", page.messages.len(), refs.len());
        refs.extend(page.messages);
        next = page.next_page_token;
    }

    refs.truncate(MAX_LISTED_MESSAGES);
    Ok(refs)
}
