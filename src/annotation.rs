use crate::error::ClockError;
use chrono::TimeDelta;

/// Appended to the eval column of games that end in checkmate.
pub const MATE_MARKER: &str = "#";

fn digits(bytes: &[u8]) -> Option<i64> {
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    bytes
        .iter()
        .try_fold(0i64, |acc, b| acc.checked_mul(10)?.checked_add(i64::from(b - b'0')))
}

/// `H:MM:SS` with a single-digit hour, the shape Lichess writes for every clock.
fn parse_fixed_width(raw: &str) -> Option<i64> {
    let bytes = raw.as_bytes();
    if bytes.len() != 7 || bytes[1] != b':' || bytes[4] != b':' {
        return None;
    }
    let hours = digits(&bytes[0..1])?;
    let minutes = digits(&bytes[2..4])?;
    let seconds = digits(&bytes[5..7])?;
    Some(hours * 3600 + minutes * 60 + seconds)
}

fn parse_triple(raw: &str) -> Option<i64> {
    let mut parts = raw.split(':');
    let hours = digits(parts.next()?.as_bytes())?;
    let minutes = digits(parts.next()?.as_bytes())?;
    let seconds = digits(parts.next()?.as_bytes())?;
    if parts.next().is_some() {
        return None;
    }
    hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)
}

/// Decodes a clock or time-of-day string into the elapsed time it denotes.
pub fn decode_clock(raw: &str) -> Result<TimeDelta, ClockError> {
    parse_fixed_width(raw)
        .or_else(|| parse_triple(raw))
        .and_then(TimeDelta::try_seconds)
        .ok_or_else(|| ClockError {
            raw: raw.to_string(),
        })
}

pub fn clock_seconds(raw: &str) -> Result<i64, ClockError> {
    decode_clock(raw).map(|delta| delta.num_seconds())
}

/// Space-joined seconds for each clock value.
pub fn join_clocks<S: AsRef<str>>(clocks: &[S]) -> Result<String, ClockError> {
    let mut out = String::with_capacity(clocks.len() * 4);
    for clock in clocks {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&clock_seconds(clock.as_ref())?.to_string());
    }
    Ok(out)
}

/// Space-joined eval values, with [`MATE_MARKER`] appended for mating games that had evals.
pub fn join_evals<S: AsRef<str>>(evals: &[S], mate: bool) -> String {
    let mut out = evals
        .iter()
        .map(|eval| eval.as_ref())
        .collect::<Vec<&str>>()
        .join(" ");
    if mate && !evals.is_empty() {
        out.push(' ');
        out.push_str(MATE_MARKER);
    }
    out
}
