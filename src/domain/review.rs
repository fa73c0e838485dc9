use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Delivery-state label carried by a stored review.
///
/// New records start as `"pending"`; only the delivery-status relay moves them on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewStatus(String);

impl ReviewStatus {
    pub const PENDING: &'static str = "pending";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn pending() -> Self {
        Self::new(Self::PENDING)
    }

    pub fn is_pending(&self) -> bool {
        self.0 == Self::PENDING
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ReviewStatus {
    fn default() -> Self {
        Self::pending()
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A completed conversation, ready to be handed to a `ReviewStore`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReview {
    pub contact_number: String,
    pub user_name: String,
    pub product_name: String,
    pub product_review: String,
}

/// A review as persisted by a `ReviewStore`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub id: u64,
    pub contact_number: String,
    pub user_name: String,
    pub product_name: String,
    pub product_review: String,
    pub status: ReviewStatus,
    pub created_at: DateTime<Utc>,
}

impl ReviewRecord {
    /// Builds the stored form of `review` with the default "pending" status.
    pub fn from_new(id: u64, review: NewReview, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            contact_number: review.contact_number,
            user_name: review.user_name,
            product_name: review.product_name,
            product_review: review.product_review,
            status: ReviewStatus::pending(),
            created_at,
        }
    }

    /// Ordering used by listings: newest first, higher id first on equal timestamps.
    pub fn newest_first(a: &Self, b: &Self) -> std::cmp::Ordering {
        b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id))
    }
}

/// A delivery-status callback from the messaging provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeliveryStatusUpdate {
    #[serde(rename = "MessageSid")]
    pub message_sid: String,
    #[serde(rename = "MessageStatus")]
    pub status: String,
}
