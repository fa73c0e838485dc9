use crate::domain::ports::ReviewStoreHandle;
use crate::domain::review::{DeliveryStatusUpdate, ReviewStatus};
use crate::error::Result;

/// Applies delivery-status callbacks from the messaging provider to stored reviews.
///
/// Callbacks are not correlated with a conversation: every review still
/// "pending" takes the reported status, whichever message the callback was for.
pub struct DeliveryStatusRelay {
    reviews: ReviewStoreHandle,
}

impl DeliveryStatusRelay {
    pub fn new(reviews: ReviewStoreHandle) -> Self {
        Self { reviews }
    }

    /// Returns the number of reviews whose status changed.
    pub async fn apply(&self, update: &DeliveryStatusUpdate) -> Result<usize> {
        let to = ReviewStatus::new(update.status.as_str());
        let updated = self
            .reviews
            .bulk_update_status(&ReviewStatus::pending(), &to)
            .await?;

        tracing::info!(
            message_sid = %update.message_sid,
            status = %to,
            updated,
            "Applied delivery status"
        );
        Ok(updated)
    }
}
