use crate::error::Result;
use std::io::Write;

/// Writes engine replies as `sender,reply` CSV rows.
pub struct ReplyWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ReplyWriter<W> {
    /// Creates a writer and emits the header row.
    pub fn new(sink: W) -> Result<Self> {
        let mut writer = csv::Writer::from_writer(sink);
        writer.write_record(["sender", "reply"])?;
        Ok(Self { writer })
    }

    pub fn write_reply(&mut self, sender: &str, reply: &str) -> Result<()> {
        self.writer.write_record([sender, reply])?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
