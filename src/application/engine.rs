use super::locks::SenderLocks;
use crate::domain::conversation::{ConversationState, Turn};
use crate::domain::ports::{ConversationStore, ConversationStoreBox, ReviewStoreHandle};
use crate::domain::review::ReviewRecord;
use crate::error::Result;

/// What the engine sends back for one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    /// Set only on the turn that completed a conversation.
    pub record: Option<ReviewRecord>,
}

/// Drives the review conversation for every sender.
///
/// `ConversationEngine` owns the in-flight conversation store and a handle to
/// the review store. Turns for one sender are serialized; turns for different
/// senders run concurrently.
pub struct ConversationEngine {
    conversations: ConversationStoreBox,
    reviews: ReviewStoreHandle,
    locks: SenderLocks,
}

impl ConversationEngine {
    /// Creates a new `ConversationEngine` instance.
    ///
    /// # Arguments
    ///
    /// * `conversations` - Where each sender's in-flight state is kept between turns.
    /// * `reviews` - Where completed reviews are persisted.
    pub fn new(conversations: ConversationStoreBox, reviews: ReviewStoreHandle) -> Self {
        Self {
            conversations,
            reviews,
            locks: SenderLocks::new(),
        }
    }

    /// Applies one inbound message from `sender_id` and returns the reply.
    ///
    /// The text is trimmed and otherwise accepted as-is. On the final turn the
    /// review is persisted first and the sender's state is dropped only if that
    /// succeeds; a storage error leaves the conversation where it was.
    pub async fn handle_message(&self, sender_id: &str, text: &str) -> Result<Reply> {
        let _turn = self.locks.lock(sender_id).await;

        let state = self
            .conversations
            .load(sender_id)
            .await?
            .unwrap_or_default();
        let stage = state.stage;

        match state.advance(sender_id, text.trim()) {
            Turn::Continue { state, reply } => {
                tracing::debug!(
                    sender = sender_id,
                    from = ?stage,
                    to = ?state.stage,
                    "Conversation advanced"
                );
                self.conversations.save(sender_id, state).await?;
                Ok(Reply {
                    text: reply,
                    record: None,
                })
            }
            Turn::Restart { state, reply } => {
                tracing::warn!(
                    sender = sender_id,
                    stage = ?stage,
                    "Inconsistent conversation state, starting over"
                );
                self.conversations.save(sender_id, state).await?;
                Ok(Reply {
                    text: reply,
                    record: None,
                })
            }
            Turn::Complete { review, reply } => {
                let record = self.reviews.create(review).await.inspect_err(|e| {
                    tracing::error!(sender = sender_id, error = %e, "Failed to persist review");
                })?;
                self.conversations.remove(sender_id).await?;
                tracing::info!(
                    sender = sender_id,
                    id = record.id,
                    product = %record.product_name,
                    "Review recorded"
                );
                Ok(Reply {
                    text: reply,
                    record: Some(record),
                })
            }
        }
    }

    /// The in-flight conversation store, for inspection.
    pub fn conversations(&self) -> &dyn ConversationStore {
        self.conversations.as_ref()
    }

    /// Current state for `sender_id`, if a conversation is in flight.
    pub async fn conversation(&self, sender_id: &str) -> Result<Option<ConversationState>> {
        self.conversations.load(sender_id).await
    }

    pub fn reviews(&self) -> &ReviewStoreHandle {
        &self.reviews
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::{
        Collected, NAME_PROMPT, OPENING_PROMPT, RESTART_PROMPT, Stage,
    };
    use crate::domain::ports::ReviewStore;
    use crate::domain::review::{NewReview, ReviewStatus};
    use crate::error::ReviewError;
    use crate::infrastructure::in_memory::{InMemoryConversationStore, InMemoryReviewStore};
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn engine() -> ConversationEngine {
        ConversationEngine::new(
            Box::new(InMemoryConversationStore::new()),
            Arc::new(InMemoryReviewStore::new()),
        )
    }

    /// Fails every `create` while `failing` is set.
    #[derive(Default)]
    struct FlakyReviewStore {
        failing: AtomicBool,
        inner: InMemoryReviewStore,
    }

    #[async_trait]
    impl ReviewStore for FlakyReviewStore {
        async fn create(&self, review: NewReview) -> Result<ReviewRecord> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(ReviewError::StorageError("disk full".to_string()));
            }
            self.inner.create(review).await
        }

        async fn list(&self) -> Result<Vec<ReviewRecord>> {
            self.inner.list().await
        }

        async fn bulk_update_status(
            &self,
            from: &ReviewStatus,
            to: &ReviewStatus,
        ) -> Result<usize> {
            self.inner.bulk_update_status(from, to).await
        }
    }

    #[tokio::test]
    async fn test_first_contact_opens_conversation() {
        let engine = engine();
        let reply = engine.handle_message("+15550100", "hello?").await.unwrap();

        assert_eq!(reply.text, OPENING_PROMPT);
        assert!(reply.record.is_none());
        let state = engine.conversation("+15550100").await.unwrap().unwrap();
        assert_eq!(state, ConversationState::at(Stage::AwaitingProduct));
    }

    #[tokio::test]
    async fn test_full_conversation_records_review() {
        let engine = engine();
        let sender = "whatsapp:+15550100";

        engine.handle_message(sender, "hi").await.unwrap();
        let reply = engine.handle_message(sender, "Widget").await.unwrap();
        assert_eq!(reply.text, NAME_PROMPT);
        let reply = engine.handle_message(sender, "Alice").await.unwrap();
        assert_eq!(reply.text, "Please send your review for Widget.");
        let reply = engine
            .handle_message(sender, "  Great product!  ")
            .await
            .unwrap();

        assert_eq!(
            reply.text,
            "Thanks Alice -- your review for Widget has been recorded."
        );
        let record = reply.record.unwrap();
        assert_eq!(record.contact_number, sender);
        assert_eq!(record.product_name, "Widget");
        assert_eq!(record.user_name, "Alice");
        assert_eq!(record.product_review, "Great product!");
        assert!(record.status.is_pending());

        assert_eq!(engine.reviews().list().await.unwrap(), vec![record]);
        assert!(engine.conversation(sender).await.unwrap().is_none());
        assert!(engine.conversations().senders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fifth_message_starts_fresh_cycle() {
        let engine = engine();
        for text in ["hi", "Widget", "Alice", "Great product!"] {
            engine.handle_message("s", text).await.unwrap();
        }

        let reply = engine.handle_message("s", "Widget").await.unwrap();
        assert_eq!(reply.text, OPENING_PROMPT);
        assert_eq!(
            engine.conversation("s").await.unwrap(),
            Some(ConversationState::at(Stage::AwaitingProduct))
        );
        assert_eq!(engine.reviews().list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_whitespace_only_answers_advance() {
        let engine = engine();
        for text in ["   ", "\t", " \n "] {
            engine.handle_message("s", text).await.unwrap();
        }
        let state = engine.conversation("s").await.unwrap().unwrap();
        assert_eq!(state.stage, Stage::AwaitingReview);
        assert_eq!(state.collected.product_name.as_deref(), Some(""));
        assert_eq!(state.collected.user_name.as_deref(), Some(""));

        let reply = engine.handle_message("s", "  ").await.unwrap();
        assert_eq!(reply.record.unwrap().product_review, "");
    }

    #[tokio::test]
    async fn test_interleaved_senders_stay_independent() {
        let engine = engine();
        engine.handle_message("a", "hi").await.unwrap();
        engine.handle_message("b", "hi").await.unwrap();
        engine.handle_message("a", "Widget").await.unwrap();
        engine.handle_message("b", "Gadget").await.unwrap();
        engine.handle_message("b", "Bob").await.unwrap();
        engine.handle_message("a", "Alice").await.unwrap();

        let a = engine.handle_message("a", "good").await.unwrap();
        let b = engine.handle_message("b", "bad").await.unwrap();

        let a = a.record.unwrap();
        let b = b.record.unwrap();
        assert_eq!(
            (a.product_name.as_str(), a.user_name.as_str()),
            ("Widget", "Alice")
        );
        assert_eq!(
            (b.product_name.as_str(), b.user_name.as_str()),
            ("Gadget", "Bob")
        );
    }

    #[tokio::test]
    async fn test_corrupt_state_restarts() {
        let engine = engine();
        engine
            .conversations()
            .save(
                "s",
                ConversationState {
                    stage: Stage::AwaitingReview,
                    collected: Collected {
                        product_name: None,
                        user_name: Some("Alice".to_string()),
                    },
                },
            )
            .await
            .unwrap();

        let reply = engine.handle_message("s", "my review").await.unwrap();
        assert_eq!(reply.text, RESTART_PROMPT);
        assert!(reply.record.is_none());
        assert_eq!(
            engine.conversation("s").await.unwrap(),
            Some(ConversationState::at(Stage::AwaitingProduct))
        );
        assert!(engine.reviews().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_persistence_failure_preserves_state() {
        let reviews = Arc::new(FlakyReviewStore::default());
        let engine = ConversationEngine::new(
            Box::new(InMemoryConversationStore::new()),
            reviews.clone(),
        );
        for text in ["hi", "Widget", "Alice"] {
            engine.handle_message("s", text).await.unwrap();
        }
        let before = engine.conversation("s").await.unwrap();

        reviews.failing.store(true, Ordering::SeqCst);
        let err = engine.handle_message("s", "Great").await.unwrap_err();
        assert!(matches!(err, ReviewError::StorageError(_)));
        assert_eq!(engine.conversation("s").await.unwrap(), before);

        reviews.failing.store(false, Ordering::SeqCst);
        let reply = engine.handle_message("s", "Great").await.unwrap();
        assert_eq!(reply.record.unwrap().product_review, "Great");
        assert!(engine.conversation("s").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_same_sender_turns_never_duplicate() {
        let engine = Arc::new(engine());

        let mut handles = Vec::new();
        for i in 0..40 {
            let engine = engine.clone();
            handles.push(tokio::spawn(async move {
                engine.handle_message("s", &format!("msg {i}")).await.unwrap()
            }));
        }
        let mut completed = 0;
        for handle in handles {
            if handle.await.unwrap().record.is_some() {
                completed += 1;
            }
        }

        // 40 turns serialized is exactly 10 full cycles of four messages.
        assert_eq!(completed, 10);
        assert_eq!(engine.reviews().list().await.unwrap().len(), 10);
        assert!(engine.conversation("s").await.unwrap().is_none());
    }
}
