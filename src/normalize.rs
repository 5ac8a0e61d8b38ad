//! Pure mappings from raw tag values to the compact record fields.

use crate::annotation::clock_seconds;
use crate::error::ClockError;
use crate::openings::OpeningTable;
use crate::{SEP, SEP_STR};
use std::borrow::Cow;

/// Written in place of an opening code when the table has no entry for the game.
pub const UNKNOWN_OPENING: &str = "?";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    WhiteWins,
    BlackWins,
    Draw,
    Unknown,
}

impl Outcome {
    pub fn from_tag(raw: &str) -> Self {
        match raw {
            "1-0" => Self::WhiteWins,
            "0-1" => Self::BlackWins,
            "1/2-1/2" => Self::Draw,
            _ => Self::Unknown,
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::WhiteWins => "W",
            Self::BlackWins => "B",
            Self::Draw => "D",
            Self::Unknown => "*",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Termination {
    Normal,
    TimeForfeit,
    Abandoned,
    Unterminated,
    RulesInfraction,
    Unknown,
}

impl Termination {
    pub fn from_tag(raw: &str) -> Self {
        match raw {
            "Normal" => Self::Normal,
            "Time forfeit" => Self::TimeForfeit,
            "Abandoned" => Self::Abandoned,
            "Unterminated" => Self::Unterminated,
            "Rules infraction" => Self::RulesInfraction,
            _ => Self::Unknown,
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Normal => "N",
            Self::TimeForfeit => "T",
            Self::Abandoned => "A",
            Self::Unterminated => "U",
            Self::RulesInfraction => "R",
            Self::Unknown => "*",
        }
    }
}

/// Last path segment of the `Site` URL.
pub fn game_id(site: Option<&str>) -> &str {
    match site {
        Some(site) => site.rsplit_once('/').map_or(site, |(_, id)| id),
        None => "",
    }
}

/// Removes every separator from a free-text value so it cannot split a record.
pub fn strip_separator(value: &str) -> Cow<'_, str> {
    if value.contains(SEP) {
        Cow::Owned(value.replace(SEP, ""))
    } else {
        Cow::Borrowed(value)
    }
}

/// Compact opening code for `ECO` + `Opening`.
///
/// Without a table the raw ECO code is used; with one, a missing key maps to
/// [`UNKNOWN_OPENING`].
pub fn opening_code(
    eco: Option<&str>,
    opening: Option<&str>,
    table: Option<&OpeningTable>,
) -> String {
    let eco = eco.unwrap_or_default();
    match table {
        Some(table) => table
            .lookup(eco, opening.unwrap_or_default())
            .unwrap_or(UNKNOWN_OPENING)
            .to_string(),
        None => eco.to_string(),
    }
}

/// Seconds since midnight for a `UTCTime` value; `None` when the tag is absent.
pub fn time_seconds(utc_time: Option<&str>) -> Result<Option<i64>, ClockError> {
    utc_time.map(clock_seconds).transpose()
}

/// Composite opening-table key: ECO code and opening name joined by the separator.
pub fn opening_key(eco: &str, opening: &str) -> String {
    let mut key = String::with_capacity(eco.len() + SEP_STR.len() + opening.len());
    key.push_str(eco);
    key.push(SEP);
    key.push_str(opening);
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_mapping_is_total() {
        assert_eq!(Outcome::from_tag("1-0").code(), "W");
        assert_eq!(Outcome::from_tag("0-1").code(), "B");
        assert_eq!(Outcome::from_tag("1/2-1/2").code(), "D");
        for raw in ["*", "", "1-0 ", "½-½", "0-0"] {
            assert_eq!(Outcome::from_tag(raw), Outcome::Unknown);
            assert_eq!(Outcome::from_tag(raw).code(), "*");
        }
    }

    #[test]
    fn test_termination_mapping() {
        let cases = [
            ("Normal", "N"),
            ("Time forfeit", "T"),
            ("Abandoned", "A"),
            ("Unterminated", "U"),
            ("Rules infraction", "R"),
            ("time forfeit", "*"),
            ("", "*"),
        ];
        for (raw, code) in cases {
            assert_eq!(Termination::from_tag(raw).code(), code, "{raw}");
        }
    }

    #[test]
    fn test_game_id_from_site() {
        assert_eq!(game_id(Some("https://lichess.org/abcd1234")), "abcd1234");
        assert_eq!(game_id(Some("abcd1234")), "abcd1234");
        assert_eq!(game_id(Some("https://lichess.org/")), "");
        assert_eq!(game_id(None), "");
    }

    #[test]
    fn test_strip_separator() {
        assert!(matches!(strip_separator("alice"), Cow::Borrowed("alice")));
        assert_eq!(strip_separator("a│li│ce"), "alice");
        assert!(!strip_separator("│││").contains(SEP));
    }

    #[test]
    fn test_opening_code_without_table_uses_eco() {
        assert_eq!(opening_code(Some("C20"), Some("King's Pawn Game"), None), "C20");
        assert_eq!(opening_code(None, None, None), "");
    }

    #[test]
    fn test_opening_code_with_table() {
        let table: OpeningTable = [(opening_key("C20", "King's Pawn Game"), "C20a00".to_string())]
            .into_iter()
            .collect();

        assert_eq!(
            opening_code(Some("C20"), Some("King's Pawn Game"), Some(&table)),
            "C20a00"
        );
        assert_eq!(
            opening_code(Some("C20"), Some("Unknown Line"), Some(&table)),
            UNKNOWN_OPENING
        );
        assert_eq!(opening_code(None, None, Some(&table)), UNKNOWN_OPENING);
    }

    #[test]
    fn test_time_seconds() {
        assert_eq!(time_seconds(Some("12:00:00")), Ok(Some(43200)));
        assert_eq!(time_seconds(Some("1:02:03")), Ok(Some(3723)));
        assert_eq!(time_seconds(None), Ok(None));
        assert!(time_seconds(Some("noon")).is_err());
    }

    #[test]
    fn test_opening_key_uses_separator() {
        assert_eq!(opening_key("B01", "Scandinavian Defense"), "B01│Scandinavian Defense");
    }
}
