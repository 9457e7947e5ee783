//! Gesture scripts: host events written down as text
//!
//! ```text
//! # draw the title box
//! select intitule
//! down 300 210
//! move 500 290
//! up 500 290
//! resize 1400 1100
//! wait 150
//! ```
//!
//! Positions and sizes are viewport pixels, as a host would report them.

pub mod ast;
pub mod lexer;
mod parser;
pub mod replay;

pub use ast::*;
pub use parser::parse;
pub use replay::{replay, run};
