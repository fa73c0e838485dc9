use crate::domain::review::ReviewRecord;
use crate::error::Result;
use std::io::Write;

/// Writes stored reviews as CSV, one row per record in the order given.
pub struct ReviewWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ReviewWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    /// Serializes every record and flushes. The header comes from the record's
    /// field names, so an empty listing still produces one.
    pub fn write_reviews(&mut self, reviews: impl IntoIterator<Item = ReviewRecord>) -> Result<()> {
        let mut wrote_any = false;
        for review in reviews {
            self.writer.serialize(&review)?;
            wrote_any = true;
        }
        if !wrote_any {
            self.writer.write_record([
                "id",
                "contact_number",
                "user_name",
                "product_name",
                "product_review",
                "status",
                "created_at",
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
