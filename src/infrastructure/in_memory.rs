use crate::domain::conversation::ConversationState;
use crate::domain::ports::{ConversationStore, ReviewStore};
use crate::domain::review::{NewReview, ReviewRecord, ReviewStatus};
use crate::error::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory map from sender identity to conversation state.
///
/// Uses `Arc<RwLock<HashMap<String, ConversationState>>>` so clones share the
/// same conversations. State is lost when the process exits.
#[derive(Default, Clone)]
pub struct InMemoryConversationStore {
    conversations: Arc<RwLock<HashMap<String, ConversationState>>>,
}

impl InMemoryConversationStore {
    /// Creates a new, empty conversation store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn load(&self, sender_id: &str) -> Result<Option<ConversationState>> {
        let conversations = self.conversations.read().await;
        Ok(conversations.get(sender_id).cloned())
    }

    async fn save(&self, sender_id: &str, state: ConversationState) -> Result<()> {
        let mut conversations = self.conversations.write().await;
        conversations.insert(sender_id.to_string(), state);
        Ok(())
    }

    async fn remove(&self, sender_id: &str) -> Result<()> {
        let mut conversations = self.conversations.write().await;
        conversations.remove(sender_id);
        Ok(())
    }

    async fn senders(&self) -> Result<Vec<String>> {
        let conversations = self.conversations.read().await;
        let mut senders: Vec<String> = conversations.keys().cloned().collect();
        senders.sort();
        Ok(senders)
    }

    async fn clear(&self) -> Result<()> {
        self.conversations.write().await.clear();
        Ok(())
    }
}

/// A thread-safe in-memory review store.
///
/// Records live in insertion order; ids are assigned sequentially from 1.
#[derive(Default, Clone)]
pub struct InMemoryReviewStore {
    records: Arc<RwLock<Vec<ReviewRecord>>>,
}

impl InMemoryReviewStore {
    /// Creates a new, empty review store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReviewStore for InMemoryReviewStore {
    async fn create(&self, review: NewReview) -> Result<ReviewRecord> {
        let mut records = self.records.write().await;
        let id = records.last().map_or(1, |last| last.id + 1);
        let record = ReviewRecord::from_new(id, review, Utc::now());
        records.push(record.clone());
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<ReviewRecord>> {
        let mut records = self.records.read().await.clone();
        records.sort_by(ReviewRecord::newest_first);
        Ok(records)
    }

    async fn bulk_update_status(&self, from: &ReviewStatus, to: &ReviewStatus) -> Result<usize> {
        let mut records = self.records.write().await;
        let mut updated = 0;
        for record in records.iter_mut().filter(|r| &r.status == from) {
            record.status = to.clone();
            updated += 1;
        }
        Ok(updated)
    }
}
