use log::{debug, info, warn};

use crate::domain::{FailureRef, MessageMetadata, MessageRef, MetadataFields};
use crate::gmail::{GmailApi, Message};

/// Largest batch the Gmail API accepts for `messages.get`.
pub const MAX_BATCH_SIZE: usize = 100;

/// Headers requested for every message.
pub const METADATA_HEADERS: [&str; 4] = ["From", "To", "Date", "Subject"];

/// Metadata fetched for a run, split by per-item outcome.
#[derive(Debug, Default)]
pub struct MetadataBatch {
    pub success: Vec<MessageMetadata>,
    pub failed: Vec<FailureRef>,
}

/// Fetch metadata for `refs`, one batch call per [`MAX_BATCH_SIZE`] chunk.
///
/// Chunks are sent one after another and results are kept in submission
/// order, so the output order only depends on `refs`. A failed item is
/// recorded in `failed` and never stops the run.
pub fn fetch_metadata(api: &dyn GmailApi, user_id: &str, refs: &[MessageRef]) -> MetadataBatch {
    let headers: Vec<String> = METADATA_HEADERS.iter().map(|h| h.to_string()).collect();
    let total = refs.len().div_ceil(MAX_BATCH_SIZE);
    let mut out = MetadataBatch::default();

    for (n, chunk) in refs.chunks(MAX_BATCH_SIZE).enumerate() {
        let ids: Vec<String> = chunk.iter().map(|r| r.id.clone()).collect();
        let results = api.batch_get_metadata(user_id, &ids, &headers);
        if results.len() != ids.len() {
            warn!(
                "batch {}: {} results for {} requests",
                n + 1,
                results.len(),
                ids.len()
            );
        }

        let failed_before = out.failed.len();
        let mut results = results.into_iter();
        for id in ids {
            match results.next() {
                Some(Ok(message)) => out.success.push(into_metadata(message)),
                Some(Err(e)) => {
                    debug!("metadata for {id} failed: {e}");
                    out.failed.push(FailureRef {
                        message_id: id,
                        reason: e.to_string(),
                    });
                }
                None => out.failed.push(FailureRef {
                    message_id: id,
                    reason: "no result returned".to_string(),
                }),
            }
        }

        info!(
            "metadata batch {}/{total}: {} messages, {} failed",
            n + 1,
            chunk.len(),
            out.failed.len() - failed_before
        );
    }

    out
}

fn into_metadata(message: Message) -> MessageMetadata {
    let fields = MetadataFields {
        from: message.header("From").map(str::to_string),
        date: message.header("Date").map(str::to_string),
    };
    MessageMetadata {
        id: message.id,
        labels: message.label_ids.into_iter().collect(),
        fields,
    }
}
