pub mod message;
pub mod newsletter;

pub use message::{FailureRef, MessageMetadata, MessageRef, MetadataFields};
pub use newsletter::{Newsletter, RunTally, UnsubscribeOutcome};
