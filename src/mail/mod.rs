//! The newsletter pipeline: list, fetch metadata, aggregate by sender, resolve
//! unsubscribe links.

pub mod aggregator;
pub mod batcher;
pub mod lister;
pub mod orchestrator;
pub mod resolver;

#[cfg(test)]
pub(crate) mod testing;

use log::info;

use crate::domain::Newsletter;
use crate::gmail::{self, GmailApi};

pub use aggregator::aggregate;
pub use batcher::{MetadataBatch, fetch_metadata};
pub use lister::list_messages;
pub use orchestrator::SubscriptionOrchestrator;
pub use resolver::UnsubscribeResolver;

/// Everything the `analyze` and `subscriptions` commands start from.
#[derive(Debug, Default)]
pub struct Scan {
    pub listed: usize,
    pub metadata: MetadataBatch,
    pub newsletters: Vec<Newsletter>,
}

/// Run lister, batcher and aggregator for one category. Only a listing
/// failure is returned as an error.
pub fn scan(api: &dyn GmailApi, user_id: &str, label_id: &str) -> gmail::Result<Scan> {
    let refs = list_messages(api, user_id, label_id)?;
    let metadata = fetch_metadata(api, user_id, &refs);
    let newsletters = aggregate(&metadata.success);
    info!(
        "{} messages listed, {} fetched, {} failed, {} senders",
        refs.len(),
        metadata.success.len(),
        metadata.failed.len(),
        newsletters.len()
    );
    Ok(Scan {
        listed: refs.len(),
        metadata,
        newsletters,
    })
}
