use crate::error::{Result, ReviewError};
use serde::Deserialize;
use std::io::Read;

/// One inbound message as it appears in a replay file.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct InboundMessage {
    pub sender: String,
    pub body: String,
}

/// Reads inbound messages from a CSV source with a `sender,body` header.
///
/// This reader wraps `csv::Reader` and provides an iterator over `Result<InboundMessage>`.
/// Whitespace is left alone; the engine trims message bodies itself.
pub struct MessageReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> MessageReader<R> {
    /// Creates a new `MessageReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes messages in file order.
    pub fn messages(self) -> impl Iterator<Item = Result<InboundMessage>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(ReviewError::from))
    }
}
