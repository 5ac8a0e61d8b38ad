//! Streaming conversion of Lichess-style PGN dumps into compact `.cri` records.
//!
//! [`GameReader`] turns a line stream into [`GameRecord`]s, one per game block;
//! each record encodes to a single line of [`RECORD_FIELD_COUNT`] fields joined by
//! [`SEP`].

pub mod annotation;
pub mod batch;
pub mod error;
pub mod input;
pub mod log;
pub mod movetext;
pub mod normalize;
pub mod openings;
pub mod pipeline;
pub mod progress;
pub mod reader;
pub mod record;
pub mod tags;

/// Field separator of encoded records and of opening-table keys.
pub const SEP: char = '│';
pub const SEP_STR: &str = "│";

pub use error::{ErrorAccumulator, MalformedGame, PipelineError, ReadError};
pub use openings::OpeningTable;
pub use reader::GameReader;
pub use record::{GameRecord, RECORD_FIELD_COUNT};
