//! Application layer containing the conversation orchestration.
//!
//! This module defines the `ConversationEngine`, the entry point for inbound
//! messages, and the `DeliveryStatusRelay` that applies provider callbacks.
//! Per-sender exclusivity is handled by `SenderLocks`, so callers may dispatch
//! messages with unbounded parallelism.

pub mod delivery;
pub mod engine;
pub mod locks;
