//! Syntax tree for gesture scripts

use crate::layout::{Point, Size};

use super::lexer::Span;

/// A node with its position in the script
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// A parsed script: one command per non-empty line
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Script {
    pub commands: Vec<Spanned<Command>>,
}

/// One host event. Positions and sizes are viewport pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `select <id or label>`
    Select(String),
    /// `down x y`
    Down(Point),
    /// `move x y`
    Move(Point),
    /// `up x y`
    Up(Point),
    /// `cancel`: the pointer capture was lost
    Cancel,
    /// `resize w h`: the viewport changed size
    Resize(Size),
    /// `wait ms`: let time pass
    Wait(u64),
}

impl Command {
    pub fn keyword(&self) -> &'static str {
        match self {
            Command::Select(_) => "select",
            Command::Down(_) => "down",
            Command::Move(_) => "move",
            Command::Up(_) => "up",
            Command::Cancel => "cancel",
            Command::Resize(_) => "resize",
            Command::Wait(_) => "wait",
        }
    }
}
