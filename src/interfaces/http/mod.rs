//! HTTP surface: the messaging webhook, the delivery-status callback and the
//! read-only review listing.

mod handlers;
pub mod twiml;

pub use handlers::create_router;

use crate::application::delivery::DeliveryStatusRelay;
use crate::application::engine::ConversationEngine;
use crate::domain::ports::{ConversationStoreBox, ReviewStoreHandle};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ConversationEngine>,
    pub relay: Arc<DeliveryStatusRelay>,
    pub reviews: ReviewStoreHandle,
}

impl AppState {
    pub fn new(conversations: ConversationStoreBox, reviews: ReviewStoreHandle) -> Self {
        Self {
            engine: Arc::new(ConversationEngine::new(conversations, reviews.clone())),
            relay: Arc::new(DeliveryStatusRelay::new(reviews.clone())),
            reviews,
        }
    }
}
