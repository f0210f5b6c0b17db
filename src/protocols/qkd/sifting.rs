//! Sifting of recorded detection events.
//!
//! Each party logs one record per time slot: `ROW;BASIS;BITVALUE;DET?`.
//! Sifting keeps the slots where both detectors clicked and both parties used
//! the same basis; the QBER is the fraction of those slots whose bits differ.

use crate::core::errors::DetectionLogError;
use std::collections::HashMap;

/// One detection slot of one party.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetectionRecord {
    pub row: u64,
    /// Basis label as recorded (compared verbatim between parties).
    pub basis: String,
    pub bit: bool,
    pub detected: bool,
}

/// Sifting results
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SiftResult {
    /// Slots kept after detection and basis matching.
    pub total_bits: usize,
    pub error_bits: usize,
    /// Error rate in percent; 0.0 when no slot survives sifting.
    pub qber: f64,
}

/// Parses a semicolon separated detection log. The first line is a header.
pub fn parse_detection_log(text: &str) -> Result<Vec<DetectionRecord>, DetectionLogError> {
    text.lines()
        .enumerate()
        .skip(1)
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| parse_record(i + 1, line))
        .collect()
}

fn parse_record(line: usize, text: &str) -> Result<DetectionRecord, DetectionLogError> {
    let mut fields = text.split(';').map(str::trim);
    let mut next = |field: &'static str| {
        fields
            .next()
            .ok_or(DetectionLogError::MissingField { line, field })
    };

    let row_text = next("ROW")?;
    let basis = next("BASIS")?;
    let bit_text = next("BITVALUE")?;
    let detected_text = next("DET?")?;

    let row = row_text
        .parse::<u64>()
        .map_err(|_| DetectionLogError::InvalidRow {
            line,
            value: row_text.to_string(),
        })?;

    let bit = match bit_text {
        "0" => false,
        "1" => true,
        other => {
            return Err(DetectionLogError::InvalidBit {
                line,
                value: other.to_string(),
            });
        }
    };

    let detected = match detected_text {
        "Y" | "y" => true,
        "N" | "n" => false,
        other => {
            return Err(DetectionLogError::InvalidDetectionFlag {
                line,
                value: other.to_string(),
            });
        }
    };

    Ok(DetectionRecord {
        row,
        basis: basis.to_string(),
        bit,
        detected,
    })
}

/// Sifts Alice's and Bob's records of one trial.
///
/// Records are joined on their row number; a row present several times on
/// both sides is paired every way.
pub fn sift(alice: &[DetectionRecord], bob: &[DetectionRecord]) -> SiftResult {
    let mut bob_by_row: HashMap<u64, Vec<&DetectionRecord>> = HashMap::new();
    for record in bob.iter().filter(|r| r.detected) {
        bob_by_row.entry(record.row).or_default().push(record);
    }

    let mut total_bits = 0;
    let mut error_bits = 0;

    for a in alice.iter().filter(|r| r.detected) {
        let Some(matches) = bob_by_row.get(&a.row) else {
            continue;
        };
        for b in matches.iter().filter(|b| b.basis == a.basis) {
            total_bits += 1;
            if a.bit != b.bit {
                error_bits += 1;
            }
        }
    }

    let qber = if total_bits > 0 {
        (error_bits as f64 / total_bits as f64) * 100.0
    } else {
        tracing::warn!("no detection slots survived sifting");
        0.0
    };

    SiftResult {
        total_bits,
        error_bits,
        qber,
    }
}

/// QBER percentage of every (alice, bob) trial, in order.
pub fn trial_qbers(trials: &[(Vec<DetectionRecord>, Vec<DetectionRecord>)]) -> Vec<f64> {
    trials
        .iter()
        .map(|(alice, bob)| sift(alice, bob).qber)
        .collect()
}
