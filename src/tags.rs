use crate::error::HeaderError;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static HEADER_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r#"^\[([A-Za-z0-9_]+) "(.*)"\]\s*$"#).expect("valid header line regex")
});

/// Tag values of one game block.
///
/// The tags the record layout reads are typed fields; anything else lands in `other`.
/// A repeated tag overwrites the earlier value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagMap {
    pub event: Option<String>,
    pub site: Option<String>,
    pub utc_date: Option<String>,
    pub utc_time: Option<String>,
    pub result: Option<String>,
    pub termination: Option<String>,
    pub eco: Option<String>,
    pub opening: Option<String>,
    pub time_control: Option<String>,
    pub white: Option<String>,
    pub white_elo: Option<String>,
    pub white_rating_diff: Option<String>,
    pub white_title: Option<String>,
    pub black: Option<String>,
    pub black_elo: Option<String>,
    pub black_rating_diff: Option<String>,
    pub black_title: Option<String>,
    pub other: BTreeMap<String, String>,
}

impl TagMap {
    pub const KNOWN: [&'static str; 17] = [
        "Event",
        "Site",
        "UTCDate",
        "UTCTime",
        "Result",
        "Termination",
        "ECO",
        "Opening",
        "TimeControl",
        "White",
        "WhiteElo",
        "WhiteRatingDiff",
        "WhiteTitle",
        "Black",
        "BlackElo",
        "BlackRatingDiff",
        "BlackTitle",
    ];

    fn known_slot(&mut self, name: &str) -> Option<&mut Option<String>> {
        let slot = match name {
            "Event" => &mut self.event,
            "Site" => &mut self.site,
            "UTCDate" => &mut self.utc_date,
            "UTCTime" => &mut self.utc_time,
            "Result" => &mut self.result,
            "Termination" => &mut self.termination,
            "ECO" => &mut self.eco,
            "Opening" => &mut self.opening,
            "TimeControl" => &mut self.time_control,
            "White" => &mut self.white,
            "WhiteElo" => &mut self.white_elo,
            "WhiteRatingDiff" => &mut self.white_rating_diff,
            "WhiteTitle" => &mut self.white_title,
            "Black" => &mut self.black,
            "BlackElo" => &mut self.black_elo,
            "BlackRatingDiff" => &mut self.black_rating_diff,
            "BlackTitle" => &mut self.black_title,
            _ => return None,
        };
        Some(slot)
    }

    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.known_slot(name) {
            Some(slot) => *slot = Some(value),
            None => {
                self.other.insert(name.to_string(), value);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        let slot = match name {
            "Event" => &self.event,
            "Site" => &self.site,
            "UTCDate" => &self.utc_date,
            "UTCTime" => &self.utc_time,
            "Result" => &self.result,
            "Termination" => &self.termination,
            "ECO" => &self.eco,
            "Opening" => &self.opening,
            "TimeControl" => &self.time_control,
            "White" => &self.white,
            "WhiteElo" => &self.white_elo,
            "WhiteRatingDiff" => &self.white_rating_diff,
            "WhiteTitle" => &self.white_title,
            "Black" => &self.black,
            "BlackElo" => &self.black_elo,
            "BlackRatingDiff" => &self.black_rating_diff,
            "BlackTitle" => &self.black_title,
            _ => return self.other.get(name).map(String::as_str),
        };
        slot.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.other.is_empty() && Self::KNOWN.iter().all(|name| self.get(name).is_none())
    }

    /// All present tags as a JSON object, used for malformed-game diagnostics.
    pub fn to_json(&self) -> String {
        let mut object = serde_json::Map::new();
        for name in Self::KNOWN {
            if let Some(value) = self.get(name) {
                object.insert(name.to_string(), serde_json::Value::from(value));
            }
        }
        for (name, value) in &self.other {
            object.insert(name.clone(), serde_json::Value::from(value.as_str()));
        }
        serde_json::Value::Object(object).to_string()
    }
}

/// Splits a `[Name "value"]` header line into its tag name and raw value.
pub fn parse_header_line(line: &str) -> Result<(&str, &str), HeaderError> {
    if let Some(caps) = HEADER_RE.captures(line)
        && let (Some(name), Some(value)) = (caps.get(1), caps.get(2))
    {
        return Ok((name.as_str(), value.as_str()));
    }

    let trimmed = line.trim_end();
    let Some(inner) = trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    else {
        return Err(HeaderError::MissingBracket(line.to_string()));
    };
    let Some((name, value)) = inner.split_once(" \"") else {
        return Err(HeaderError::MissingSeparator(line.to_string()));
    };
    if !value.ends_with('"') {
        return Err(HeaderError::MissingQuote(line.to_string()));
    }
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
        return Err(HeaderError::InvalidName(line.to_string()));
    }

    // Only reachable for shapes the regex rejects but the manual split accepts.
    Err(HeaderError::MissingSeparator(line.to_string()))
}
