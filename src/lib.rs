pub mod builtin;
pub mod env;
pub mod eval;
pub mod lex;
pub mod parse;
pub mod read;
pub mod repl;
pub mod value;

pub use builtin::Builtin;
pub use env::Environment;
pub use eval::{Interpreter, eval};
pub use lex::Lexer;
pub use parse::{Ast, Parser, Tag};
pub use read::read;
pub use repl::Repl;
pub use value::Value;
