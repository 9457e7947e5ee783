//! Line-oriented parser for gesture scripts
//!
//! Each line holds at most one command. A bad line is reported and skipped
//! so that every error in a script is found in one pass.

use crate::error::ScriptError;
use crate::layout::{Point, Size};

use super::ast::{Command, Script, Spanned};
use super::lexer::{lex, Span, Token};

const COMMANDS: &[&str] = &["select", "down", "move", "up", "cancel", "resize", "wait"];

/// Parse a gesture script
pub fn parse(source: &str) -> Result<Script, Vec<ScriptError>> {
    let mut script = Script::default();
    let mut errors = Vec::new();

    let mut line: Vec<(Token, Span)> = Vec::new();
    let mut bad_line = false;
    for (token, span) in lex(source).chain(std::iter::once((Ok(Token::Newline), source.len()..source.len()))) {
        match token {
            Ok(Token::Newline) => {
                if !bad_line && !line.is_empty() {
                    match parse_line(&line) {
                        Ok(command) => script.commands.push(command),
                        Err(err) => errors.push(err),
                    }
                }
                line.clear();
                bad_line = false;
            }
            Ok(token) => line.push((token, span)),
            Err(()) => {
                if !bad_line {
                    errors.push(ScriptError::syntax(
                        span.clone(),
                        format!("Unexpected character '{}'", &source[span]),
                        &[],
                    ));
                }
                bad_line = true;
            }
        }
    }

    if errors.is_empty() {
        Ok(script)
    } else {
        Err(errors)
    }
}

/// Walks the tokens of one line
struct LineCursor<'a> {
    tokens: &'a [(Token, Span)],
    pos: usize,
}

impl<'a> LineCursor<'a> {
    fn next(&mut self) -> Option<&'a (Token, Span)> {
        let item = self.tokens.get(self.pos);
        self.pos += 1;
        item
    }

    /// Span just past the last token, for "missing argument" errors
    fn end_span(&self) -> Span {
        let end = self.tokens.last().map_or(0, |(_, span)| span.end);
        end..end
    }

    fn number(&mut self, what: &str) -> Result<(f64, Span), ScriptError> {
        match self.next() {
            Some((Token::Number(n), span)) => Ok((*n, span.clone())),
            Some((other, span)) => Err(ScriptError::syntax(
                span.clone(),
                format!("Unexpected {}, {} must be a number", other.describe(), what),
                &["number"],
            )),
            None => Err(ScriptError::syntax(
                self.end_span(),
                format!("Missing {}", what),
                &["number"],
            )),
        }
    }

    fn point(&mut self) -> Result<Point, ScriptError> {
        let (x, _) = self.number("x")?;
        let (y, _) = self.number("y")?;
        Ok(Point::new(x, y))
    }

    fn name(&mut self) -> Result<String, ScriptError> {
        match self.next() {
            Some((Token::Ident(name), _)) | Some((Token::String(name), _)) => Ok(name.clone()),
            Some((other, span)) => Err(ScriptError::syntax(
                span.clone(),
                format!("Unexpected {}, expected a field id or label", other.describe()),
                &["identifier", "string"],
            )),
            None => Err(ScriptError::syntax(
                self.end_span(),
                "Missing field name",
                &["identifier", "string"],
            )),
        }
    }
}

fn parse_line(tokens: &[(Token, Span)]) -> Result<Spanned<Command>, ScriptError> {
    let mut cursor = LineCursor { tokens, pos: 0 };
    let Some((keyword, start)) = cursor.next() else {
        return Err(ScriptError::syntax(0..0, "Empty command", COMMANDS));
    };

    let command = match keyword {
        Token::Select => Command::Select(cursor.name()?),
        Token::Down => Command::Down(cursor.point()?),
        Token::Move => Command::Move(cursor.point()?),
        Token::Up => Command::Up(cursor.point()?),
        Token::Cancel => Command::Cancel,
        Token::Resize => {
            let (width, w_span) = cursor.number("width")?;
            let (height, h_span) = cursor.number("height")?;
            if width <= 0.0 || height <= 0.0 {
                return Err(ScriptError::syntax(
                    w_span.start..h_span.end,
                    "Viewport size must be positive",
                    &[],
                ));
            }
            Command::Resize(Size::new(width, height))
        }
        Token::Wait => {
            let (ms, span) = cursor.number("duration")?;
            if ms < 0.0 || ms.fract() != 0.0 {
                return Err(ScriptError::syntax(
                    span,
                    "Duration must be a whole number of milliseconds",
                    &[],
                ));
            }
            Command::Wait(ms as u64)
        }
        other => {
            return Err(ScriptError::syntax(
                start.clone(),
                format!("Unexpected {}", other.describe()),
                COMMANDS,
            ))
        }
    };

    if let Some((extra, span)) = cursor.next() {
        return Err(ScriptError::syntax(
            span.clone(),
            format!("Unexpected {} after '{}'", extra.describe(), command.keyword()),
            &["end of line"],
        ));
    }

    let end = tokens.last().map_or(start.end, |(_, span)| span.end);
    Ok(Spanned::new(command, start.start..end))
}
