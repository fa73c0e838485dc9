use rand::Rng;
use std::fs::File;
use std::io::Error;
use std::path::Path;

pub const SCRIPT: [&str; 4] = ["hi", "Widget", "Alice", "Great product!"];

/// Writes one complete conversation per sender, each sender's turns in order
/// but the senders randomly interleaved with one another.
pub fn generate_conversations(path: &Path, senders: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);
    wtr.write_record(["sender", "body"])?;

    let mut rng = rand::thread_rng();
    let mut next_turn = vec![0usize; senders];
    let mut remaining: Vec<usize> = (0..senders).collect();

    while !remaining.is_empty() {
        let pick = rng.gen_range(0..remaining.len());
        let sender = remaining[pick];
        let body = match next_turn[sender] {
            1 => format!("Widget {sender}"),
            2 => format!("User {sender}"),
            turn => SCRIPT[turn].to_string(),
        };
        wtr.write_record([format!("+1555{sender:07}"), body])?;

        next_turn[sender] += 1;
        if next_turn[sender] == SCRIPT.len() {
            remaining.swap_remove(pick);
        }
    }

    wtr.flush()?;
    Ok(())
}
