use super::review::NewReview;
use serde::{Deserialize, Serialize};

pub const OPENING_PROMPT: &str = "Which product is this review for?";
pub const NAME_PROMPT: &str = "Okay, got it. What's your name?";
pub const RESTART_PROMPT: &str = "Let's start over. Which product is this review for?";

pub fn review_prompt(product_name: &str) -> String {
    format!("Please send your review for {product_name}.")
}

pub fn completion_reply(user_name: &str, product_name: &str) -> String {
    format!("Thanks {user_name} -- your review for {product_name} has been recorded.")
}

/// The question a sender still owes an answer to.
///
/// Stages are named after the outstanding question, so `AwaitingProduct` is the
/// stage in which the next inbound message is taken as the product name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Start,
    AwaitingProduct,
    AwaitingName,
    AwaitingReview,
}

/// Answers gathered so far in one conversation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Collected {
    pub product_name: Option<String>,
    pub user_name: Option<String>,
}

/// Per-sender conversation progress, held in memory between turns.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConversationState {
    pub stage: Stage,
    pub collected: Collected,
}

/// Outcome of applying one inbound answer to a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    /// The conversation goes on; `state` replaces the stored one.
    Continue {
        state: ConversationState,
        reply: String,
    },
    /// The final answer arrived. `review` must be persisted before the
    /// sender's state is dropped.
    Complete { review: NewReview, reply: String },
    /// The stored state was inconsistent and has been replaced by a fresh one.
    Restart {
        state: ConversationState,
        reply: String,
    },
}

impl Turn {
    pub fn reply(&self) -> &str {
        match self {
            Turn::Continue { reply, .. }
            | Turn::Complete { reply, .. }
            | Turn::Restart { reply, .. } => reply,
        }
    }
}

impl ConversationState {
    pub fn at(stage: Stage) -> Self {
        Self {
            stage,
            collected: Collected::default(),
        }
    }

    /// Applies an already-trimmed answer and returns what the engine should do next.
    ///
    /// Pure: it never touches storage. Any answer is accepted, including an
    /// empty one.
    pub fn advance(self, sender_id: &str, answer: &str) -> Turn {
        let Self { stage, collected } = self;

        match (stage, collected) {
            (Stage::Start, _) => Turn::Continue {
                state: Self::at(Stage::AwaitingProduct),
                reply: OPENING_PROMPT.to_string(),
            },
            (Stage::AwaitingProduct, mut collected) => {
                collected.product_name = Some(answer.to_string());
                Turn::Continue {
                    state: Self {
                        stage: Stage::AwaitingName,
                        collected,
                    },
                    reply: NAME_PROMPT.to_string(),
                }
            }
            (
                Stage::AwaitingName,
                Collected {
                    product_name: Some(product_name),
                    ..
                },
            ) => Turn::Continue {
                reply: review_prompt(&product_name),
                state: Self {
                    stage: Stage::AwaitingReview,
                    collected: Collected {
                        product_name: Some(product_name),
                        user_name: Some(answer.to_string()),
                    },
                },
            },
            (
                Stage::AwaitingReview,
                Collected {
                    product_name: Some(product_name),
                    user_name: Some(user_name),
                },
            ) => Turn::Complete {
                reply: completion_reply(&user_name, &product_name),
                review: NewReview {
                    contact_number: sender_id.to_string(),
                    user_name,
                    product_name,
                    product_review: answer.to_string(),
                },
            },
            (Stage::AwaitingName | Stage::AwaitingReview, _) => Turn::Restart {
                state: Self::at(Stage::AwaitingProduct),
                reply: RESTART_PROMPT.to_string(),
            },
        }
    }
}
