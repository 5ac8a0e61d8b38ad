use crate::error::{ErrorAccumulator, MalformedGame, ReadError};
use crate::log;
use crate::movetext::Movetext;
use crate::normalize;
use crate::openings::OpeningTable;
use crate::record::GameRecord;
use crate::tags::{TagMap, parse_header_line};
use std::io::{BufRead, ErrorKind};
use std::mem;

/// Blank lines that close one game block: one after the headers, one after the movetext.
const BLANK_LINES_PER_GAME: u8 = 2;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum LineKind {
    Header,
    Movetext,
    Blank,
    Other,
}

fn classify_line(line: &str) -> LineKind {
    match line.as_bytes().first() {
        None => LineKind::Blank,
        Some(b'[') => LineKind::Header,
        Some(b) if b.is_ascii_digit() => LineKind::Movetext,
        Some(_) => LineKind::Other,
    }
}

fn trim_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Working set for the game block currently being read.
#[derive(Debug, Default)]
struct GameState {
    tags: TagMap,
    movetext: Movetext,
    blank_lines: u8,
    /// First non-blank line of the block, 1-based.
    first_line: Option<usize>,
    /// A non-blank line arrived after the first counted blank.
    saw_body: bool,
    diagnostics: ErrorAccumulator,
}

impl GameState {
    fn mark_line(&mut self, line_number: usize) {
        self.first_line.get_or_insert(line_number);
    }

    fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.movetext.is_empty() && self.diagnostics.is_empty()
    }

    fn finish(
        mut self,
        openings: Option<&OpeningTable>,
        line_number: usize,
    ) -> Result<GameRecord, ReadError> {
        let tags_json = self.tags.to_json();
        let game_id = self
            .tags
            .site
            .as_deref()
            .map(|site| normalize::game_id(Some(site)).to_string());

        let record = GameRecord::build(self.tags, &self.movetext, openings, &mut self.diagnostics);

        match self.diagnostics.take() {
            None => Ok(record),
            Some(message) => Err(ReadError::Malformed(MalformedGame {
                line: self.first_line.unwrap_or(line_number),
                game_id,
                message,
                tags: tags_json,
            })),
        }
    }
}

/// Streams normalized game records out of a line-oriented game dump.
///
/// A game block is complete once two blank lines have been seen since the previous
/// block; blank lines are counted wherever they occur. A block with a malformed
/// header or annotation is consumed to its boundary and yielded as
/// [`ReadError::Malformed`]; reading then continues. An I/O failure is yielded once
/// and ends the iteration.
pub struct GameReader<'a, R> {
    input: R,
    openings: Option<&'a OpeningTable>,
    state: GameState,
    buffer: Vec<u8>,
    line_number: usize,
    strict: bool,
    finished: bool,
}

impl<'a, R: BufRead> GameReader<'a, R> {
    pub fn new(input: R, openings: Option<&'a OpeningTable>) -> Self {
        Self {
            input,
            openings,
            state: GameState::default(),
            buffer: Vec::with_capacity(1024),
            line_number: 0,
            strict: false,
            finished: false,
        }
    }

    /// Rejects blank lines before a block's first line and a closing blank line
    /// with no non-blank line since the first one. Rejected blanks are not counted.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    fn unexpected_blank(&self) -> bool {
        if !self.strict {
            return false;
        }
        match self.state.blank_lines {
            0 => self.state.first_line.is_none(),
            _ => !self.state.saw_body,
        }
    }

    fn route_line(&mut self, line: &str) -> Option<Result<GameRecord, ReadError>> {
        let line_number = self.line_number;
        let kind = classify_line(line);
        if kind != LineKind::Blank && self.state.blank_lines > 0 {
            self.state.saw_body = true;
        }
        match kind {
            LineKind::Header => {
                self.state.mark_line(line_number);
                match parse_header_line(line) {
                    Ok((name, value)) => self.state.tags.insert(name, value),
                    Err(e) => self.state.diagnostics.push(format!("line {line_number}: {e}")),
                }
            }
            LineKind::Movetext => {
                self.state.mark_line(line_number);
                self.state.movetext.push_line(line);
            }
            LineKind::Blank => {
                if self.unexpected_blank() {
                    log::warn(format!("Ignoring unexpected blank line {line_number}"));
                    return None;
                }
                self.state.blank_lines += 1;
                if self.state.blank_lines >= BLANK_LINES_PER_GAME {
                    return self.complete_block();
                }
            }
            LineKind::Other => {}
        }
        None
    }

    fn complete_block(&mut self) -> Option<Result<GameRecord, ReadError>> {
        let state = mem::take(&mut self.state);
        if state.is_empty() {
            return None;
        }
        Some(state.finish(self.openings, self.line_number))
    }

    fn discard_partial(&mut self) {
        let state = mem::take(&mut self.state);
        if !state.is_empty() {
            log::warn(format!(
                "Discarding incomplete game at end of input (started line {}): tags={}",
                state.first_line.unwrap_or(self.line_number),
                state.tags.to_json()
            ));
        }
    }
}

impl<R: BufRead> Iterator for GameReader<'_, R> {
    type Item = Result<GameRecord, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let mut buffer = mem::take(&mut self.buffer);
            buffer.clear();
            match self.input.read_until(b'\n', &mut buffer) {
                Ok(0) => {
                    self.finished = true;
                    self.discard_partial();
                    return None;
                }
                Ok(_) => {}
                Err(e) if e.kind() == ErrorKind::Interrupted => {
                    self.buffer = buffer;
                    continue;
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(ReadError::Io(e)));
                }
            }

            self.line_number += 1;
            let text = String::from_utf8_lossy(&buffer);
            let outcome = self.route_line(trim_line_ending(&text));
            drop(text);
            self.buffer = buffer;

            if outcome.is_some() {
                return outcome;
            }
        }
    }
}
