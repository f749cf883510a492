pub mod derivative;
pub mod dot;
pub mod error;
pub mod eval;
pub mod latex;
pub mod parser;
pub mod prefix;
pub mod simplify;
pub mod token;
pub mod tree;
pub mod walk;

mod io;
mod macros;


pub use derivative::{derive, differentiate, symbolic_deriv};
pub use error::{ArithmeticError, Error};
pub use parser::{Parser, parse};
pub use prefix::parse_prefix;
pub use simplify::{DEFAULT_MAX_PASSES, simplify, simplify_until_stable};
pub use token::tokenize;
pub use tree::*;
