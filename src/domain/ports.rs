use super::conversation::ConversationState;
use super::review::{NewReview, ReviewRecord, ReviewStatus};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Keeps each sender's in-flight conversation between turns.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn load(&self, sender_id: &str) -> Result<Option<ConversationState>>;
    async fn save(&self, sender_id: &str, state: ConversationState) -> Result<()>;
    async fn remove(&self, sender_id: &str) -> Result<()>;
    async fn senders(&self) -> Result<Vec<String>>;
    async fn clear(&self) -> Result<()>;
}

/// Durable storage for completed reviews.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Persists `review`, assigning its id, creation time and "pending" status.
    async fn create(&self, review: NewReview) -> Result<ReviewRecord>;
    /// All stored reviews, newest first.
    async fn list(&self) -> Result<Vec<ReviewRecord>>;
    /// Moves every record at `from` to `to`, returning how many changed.
    async fn bulk_update_status(&self, from: &ReviewStatus, to: &ReviewStatus) -> Result<usize>;
}

pub type ConversationStoreBox = Box<dyn ConversationStore>;
pub type ReviewStoreHandle = Arc<dyn ReviewStore>;
