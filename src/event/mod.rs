//! Storage event handling
//!
//! Parses object-created notifications and shapes the ingestion receipt
//! returned to the caller.

mod types;

pub use types::{
    EventBucket, EventObject, EventRecord, EventS3, IngestReceipt, ReceiptBody, StorageEvent,
};

#[cfg(test)]
mod tests;
