//! CSV adapters used by the command-line replay and export modes.

pub mod message_reader;
pub mod reply_writer;
pub mod review_writer;
