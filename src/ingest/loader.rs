//! Bulk-load file handling: newline-delimited JSON bet records.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use chrono::Utc;
use rand::Rng;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{Bet, Outcome};
use crate::error::{Error, Result};

/// One record in this many goes to a single hot user, so anomaly queries
/// have signal in synthetic data.
const HOT_USER_SHARE: usize = 5;

/// Read bets from a newline-delimited JSON file.
///
/// Every record must parse and satisfy the bet invariants; a malformed or
/// invalid line fails the whole load with its line number. Blank lines are
/// skipped.
///
/// # Errors
/// Returns an error if the file cannot be read or any line is not a valid
/// bet record.
pub fn load_bets<P: AsRef<Path>>(path: P) -> Result<Vec<Bet>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut bets = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let bet: Bet = serde_json::from_str(&line)
            .map_err(|e| Error::Parse(format!("line {}: {e}", index + 1)))?;
        bet.validate()
            .map_err(|e| Error::Parse(format!("line {}: {e}", index + 1)))?;

        bets.push(bet);
    }

    Ok(bets)
}

/// Write `records` synthetic bets to `path`, one JSON object per line.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn generate_bets<P: AsRef<Path>>(path: P, records: usize) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let mut rng = rand::thread_rng();

    let hot_user = Uuid::new_v4().to_string();

    for i in 0..records {
        let (user_id, outcome) = if i % HOT_USER_SHARE == 0 {
            (hot_user.clone(), Outcome::Win)
        } else {
            let outcome = if rng.gen_bool(0.5) {
                Outcome::Win
            } else {
                Outcome::Lose
            };
            (Uuid::new_v4().to_string(), outcome)
        };

        let bet = Bet {
            bet_id: Uuid::new_v4().to_string(),
            user_id,
            // 1.00..=100.00 stake at 1.01..=10.00 odds
            amount: Decimal::new(rng.gen_range(100..=10_000), 2),
            odds: Decimal::new(rng.gen_range(101..=1_000), 2),
            outcome,
            placed_at: Utc::now(),
        };

        serde_json::to_writer(&mut writer, &bet)?;
        writer.write_all(b"\n")?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    #[test]
    fn generate_then_load_round_trips() {
        let file = NamedTempFile::new().unwrap();

        generate_bets(file.path(), 50).unwrap();
        let bets = load_bets(file.path()).unwrap();

        assert_eq!(bets.len(), 50);
        for bet in &bets {
            assert!(bet.validate().is_ok());
        }

        // Every fifth record belongs to the same hot user.
        let hot_user = &bets[0].user_id;
        let hot_count = bets.iter().filter(|b| &b.user_id == hot_user).count();
        assert_eq!(hot_count, 10);
    }

    #[test]
    fn malformed_line_reports_its_number() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "{}",
            concat!(
                "{\"bet_id\":\"b1\",\"user_id\":\"u1\",\"amount\":\"10\",",
                "\"odds\":\"2.0\",\"outcome\":\"win\",",
                "\"timestamp\":\"2026-07-01T12:00:00Z\"}"
            )
        )
        .unwrap();
        writeln!(file, "not json").unwrap();
        file.flush().unwrap();

        let result = load_bets(file.path());
        assert!(matches!(result, Err(Error::Parse(ref msg)) if msg.starts_with("line 2")));
    }

    #[test]
    fn invalid_record_fails_the_load() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "{}",
            concat!(
                "{\"bet_id\":\"b1\",\"user_id\":\"u1\",\"amount\":\"-5\",",
                "\"odds\":\"2.0\",\"outcome\":\"win\",",
                "\"timestamp\":\"2026-07-01T12:00:00Z\"}"
            )
        )
        .unwrap();
        file.flush().unwrap();

        let result = load_bets(file.path());
        assert!(matches!(result, Err(Error::Parse(ref msg)) if msg.contains("amount")));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "{}",
            concat!(
                "{\"bet_id\":\"b1\",\"user_id\":\"u1\",\"amount\":\"10\",",
                "\"odds\":\"2.0\",\"outcome\":\"win\",",
                "\"timestamp\":\"2026-07-01T12:00:00Z\"}"
            )
        )
        .unwrap();
        writeln!(file).unwrap();
        file.flush().unwrap();

        let bets = load_bets(file.path()).unwrap();
        assert_eq!(bets.len(), 1);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = load_bets("/nonexistent/bets.ndjson");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
