use std::collections::BTreeSet;

pub use crate::gmail::MessageRef;

/// Header values kept from a metadata fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataFields {
    pub from: Option<String>,
    pub date: Option<String>,
}

/// Result of one successful metadata fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageMetadata {
    pub id: String,
    pub labels: BTreeSet<String>,
    pub fields: MetadataFields,
}

/// A metadata sub-request that did not produce a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRef {
    pub message_id: String,
    pub reason: String,
}
