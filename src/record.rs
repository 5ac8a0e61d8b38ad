use crate::annotation::{join_clocks, join_evals};
use crate::error::ErrorAccumulator;
use crate::movetext::Movetext;
use crate::normalize::{self, Outcome, Termination};
use crate::openings::OpeningTable;
use crate::tags::TagMap;
use crate::{SEP, SEP_STR};
use std::borrow::Cow;
use std::fmt;

pub const RECORD_FIELD_COUNT: usize = 23;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Player {
    /// Separator-free display name.
    pub name: String,
    pub elo: String,
    pub rating_diff: String,
    pub title: String,
}

/// One normalized game, ready to be written as a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub id: String,
    pub date: String,
    pub time: String,
    pub time_seconds: Option<i64>,
    pub result: Outcome,
    pub termination: Termination,
    pub mate: bool,
    pub has_eval: bool,
    pub has_clock: bool,
    pub move_count: usize,
    pub opening: String,
    pub time_control: String,
    pub white: Player,
    pub black: Player,
    pub moves: String,
    pub evals: String,
    pub clocks: String,
}

const fn flag(value: bool) -> &'static str {
    if value { "Y" } else { "N" }
}

impl GameRecord {
    /// Normalizes one finished game block.
    ///
    /// Fields that fail to decode are left empty and described in `diagnostics`;
    /// callers decide whether a record with diagnostics is emitted.
    pub fn build(
        mut tags: TagMap,
        movetext: &Movetext,
        openings: Option<&OpeningTable>,
        diagnostics: &mut ErrorAccumulator,
    ) -> Self {
        let time_seconds = match normalize::time_seconds(tags.utc_time.as_deref()) {
            Ok(seconds) => seconds,
            Err(e) => {
                diagnostics.push(format!("UTCTime: {e}"));
                None
            }
        };

        let clocks = match join_clocks(&movetext.clocks) {
            Ok(clocks) => clocks,
            Err(e) => {
                diagnostics.push(format!("clock annotation: {e}"));
                String::new()
            }
        };
        for token in &movetext.truncated {
            diagnostics.push(format!("truncated annotation '{token}'"));
        }

        let mate = movetext.is_mate();
        let player = |name: Option<String>,
                      elo: Option<String>,
                      rating_diff: Option<String>,
                      title: Option<String>| Player {
            name: name
                .map(|n| normalize::strip_separator(&n).into_owned())
                .unwrap_or_default(),
            elo: elo.unwrap_or_default(),
            rating_diff: rating_diff.unwrap_or_default(),
            title: title.unwrap_or_default(),
        };

        Self {
            id: normalize::game_id(tags.site.as_deref()).to_string(),
            result: Outcome::from_tag(tags.result.as_deref().unwrap_or_default()),
            termination: Termination::from_tag(tags.termination.as_deref().unwrap_or_default()),
            opening: normalize::opening_code(tags.eco.as_deref(), tags.opening.as_deref(), openings),
            date: tags.utc_date.take().unwrap_or_default(),
            time: tags.utc_time.take().unwrap_or_default(),
            time_seconds,
            mate,
            has_eval: !movetext.evals.is_empty(),
            has_clock: !movetext.clocks.is_empty(),
            move_count: movetext.moves.len(),
            time_control: tags.time_control.take().unwrap_or_default(),
            white: player(
                tags.white.take(),
                tags.white_elo.take(),
                tags.white_rating_diff.take(),
                tags.white_title.take(),
            ),
            black: player(
                tags.black.take(),
                tags.black_elo.take(),
                tags.black_rating_diff.take(),
                tags.black_title.take(),
            ),
            moves: movetext.moves.join(" "),
            evals: join_evals(&movetext.evals, mate),
            clocks,
        }
    }

    /// The field values in output order.
    pub fn fields(&self) -> [Cow<'_, str>; RECORD_FIELD_COUNT] {
        [
            Cow::Borrowed(self.id.as_str()),
            Cow::Borrowed(self.date.as_str()),
            Cow::Borrowed(self.time.as_str()),
            self.time_seconds
                .map_or(Cow::Borrowed(""), |s| Cow::Owned(s.to_string())),
            Cow::Borrowed(self.result.code()),
            Cow::Borrowed(self.termination.code()),
            Cow::Borrowed(flag(self.mate)),
            Cow::Borrowed(flag(self.has_eval)),
            Cow::Borrowed(flag(self.has_clock)),
            Cow::Owned(self.move_count.to_string()),
            Cow::Borrowed(self.opening.as_str()),
            Cow::Borrowed(self.time_control.as_str()),
            Cow::Borrowed(self.white.name.as_str()),
            Cow::Borrowed(self.white.elo.as_str()),
            Cow::Borrowed(self.white.rating_diff.as_str()),
            Cow::Borrowed(self.white.title.as_str()),
            Cow::Borrowed(self.black.name.as_str()),
            Cow::Borrowed(self.black.elo.as_str()),
            Cow::Borrowed(self.black.rating_diff.as_str()),
            Cow::Borrowed(self.black.title.as_str()),
            Cow::Borrowed(self.moves.as_str()),
            Cow::Borrowed(self.evals.as_str()),
            Cow::Borrowed(self.clocks.as_str()),
        ]
    }

}

impl fmt::Display for GameRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, field) in self.fields().iter().enumerate() {
            if idx > 0 {
                f.write_str(SEP_STR)?;
            }
            f.write_str(field)?;
        }
        Ok(())
    }
}

/// Splits an encoded line back into its fields; `None` if the field count is wrong.
pub fn split_fields(line: &str) -> Option<[&str; RECORD_FIELD_COUNT]> {
    let line = line.strip_suffix('\n').unwrap_or(line);
    let mut fields = [""; RECORD_FIELD_COUNT];
    let mut parts = line.split(SEP);
    for slot in &mut fields {
        *slot = parts.next()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(fields)
}
