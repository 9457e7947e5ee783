//! Lexer for gesture scripts using logos

use logos::Logos;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+|#[^\n]*")]
pub enum Token {
    // Commands
    #[token("select")]
    Select,
    #[token("down")]
    Down,
    #[token("move")]
    Move,
    #[token("up")]
    Up,
    #[token("cancel")]
    Cancel,
    #[token("resize")]
    Resize,
    #[token("wait")]
    Wait,

    // Literals
    #[regex(r"-?[0-9]+(\.[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| {
        let s = lex.slice();
        s[1..s.len()-1].replace("\\\"", "\"").replace("\\\\", "\\")
    })]
    String(String),

    // Commands end at a line break
    #[token("\n")]
    Newline,
}

impl Token {
    /// Human-readable description for error messages
    pub fn describe(&self) -> String {
        match self {
            Token::Select => "keyword 'select'".to_string(),
            Token::Down => "keyword 'down'".to_string(),
            Token::Move => "keyword 'move'".to_string(),
            Token::Up => "keyword 'up'".to_string(),
            Token::Cancel => "keyword 'cancel'".to_string(),
            Token::Resize => "keyword 'resize'".to_string(),
            Token::Wait => "keyword 'wait'".to_string(),
            Token::Number(n) => format!("number {}", n),
            Token::Ident(s) => format!("identifier '{}'", s),
            Token::String(s) => format!("string \"{}\"", s),
            Token::Newline => "end of line".to_string(),
        }
    }
}

/// Tokenize a script. Unrecognized input comes back as `Err` with its span.
pub fn lex(input: &str) -> impl Iterator<Item = (Result<Token, ()>, Span)> + '_ {
    Token::lexer(input).spanned()
}
