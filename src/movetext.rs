use smallvec::SmallVec;

pub type MoveList = SmallVec<[String; 128]>;
pub type AnnotationList = SmallVec<[String; 128]>;

/// Leading characters of SAN moves: pawn files, piece letters and the castle `O`.
const MOVE_LEADING_CHARS: &[u8] = b"abcdefghNBQRKO";
const CLOCK_MARKER: &str = "[%clk";
const EVAL_MARKER: &str = "[%eval";

/// Carried between tokens (and lines) of one game's movetext.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TokenState {
    #[default]
    Normal,
    ExpectClock,
    ExpectEval,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Token<'a> {
    Move(&'a str),
    /// Clock value with its closing bracket removed; `closed` is false when it had none.
    Clock { value: &'a str, closed: bool },
    Eval { value: &'a str, closed: bool },
    OpenClock,
    OpenEval,
    Ignored,
}

fn strip_annotation_close(token: &str) -> (&str, bool) {
    match token.strip_suffix(']') {
        Some(value) => (value, true),
        None => (token, false),
    }
}

/// Classifies one token given the state left by the previous one.
pub fn classify(state: TokenState, token: &str) -> (Token<'_>, TokenState) {
    match state {
        TokenState::ExpectClock => {
            let (value, closed) = strip_annotation_close(token);
            (Token::Clock { value, closed }, TokenState::Normal)
        }
        TokenState::ExpectEval => {
            let (value, closed) = strip_annotation_close(token);
            (Token::Eval { value, closed }, TokenState::Normal)
        }
        TokenState::Normal => match token.as_bytes().first() {
            Some(b) if MOVE_LEADING_CHARS.contains(b) => (Token::Move(token), TokenState::Normal),
            _ if token.starts_with(CLOCK_MARKER) => (Token::OpenClock, TokenState::ExpectClock),
            _ if token.starts_with(EVAL_MARKER) => (Token::OpenEval, TokenState::ExpectEval),
            _ => (Token::Ignored, TokenState::Normal),
        },
    }
}

/// Moves and raw annotation values accumulated from one game's movetext lines.
#[derive(Debug, Clone, Default)]
pub struct Movetext {
    pub moves: MoveList,
    pub clocks: AnnotationList,
    pub evals: AnnotationList,
    /// Annotation values that were missing their closing bracket.
    pub truncated: Vec<String>,
    state: TokenState,
}

impl Movetext {
    pub fn push_line(&mut self, line: &str) {
        for token in line.split_ascii_whitespace() {
            self.push_token(token);
        }
    }

    pub fn push_token(&mut self, token: &str) {
        let (kind, next) = classify(self.state, token);
        self.state = next;

        match kind {
            Token::Move(san) => self.moves.push(san.to_string()),
            Token::Clock { value, closed } => {
                if !closed {
                    self.truncated.push(token.to_string());
                }
                self.clocks.push(value.to_string());
            }
            Token::Eval { value, closed } => {
                if !closed {
                    self.truncated.push(token.to_string());
                }
                self.evals.push(value.to_string());
            }
            Token::OpenClock | Token::OpenEval | Token::Ignored => {}
        }
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty() && self.clocks.is_empty() && self.evals.is_empty()
    }

    /// True when the final move carries the checkmate marker.
    pub fn is_mate(&self) -> bool {
        self.moves.last().is_some_and(|san| san.ends_with('#'))
    }
}
