//! ClassAd Evaluation Engine
//!
//! Evaluates ClassAd expression trees against a chain of enclosing records.
//! Evaluation never fails: type errors, missing attributes and bad function
//! calls all produce Error or Undefined values, which propagate through the
//! rest of the expression.
//!
//! # Example
//!
//! ```ignore
//! use classad_eval::{Env, Evaluator};
//! use classad_parser::{parse_expression, parse_record};
//!
//! let ad = parse_record("[Memory = 2048; Big = Memory > 1024]").unwrap();
//! let evaluator = Evaluator::new();
//! let big = evaluator.evaluate(&parse_expression("Big").unwrap(), &mut Env::with_record(ad));
//! assert!(big.is_true());
//! ```
//!
//! # Architecture
//!
//! - [`Env`]: the scope chain; lookups truncate it to the defining record
//! - [`Evaluator`]: steps nodes until they are constants, records or lists
//! - [`operators`]: operator semantics, including the four-valued logic of
//!   `&&`, `||` and `!`
//! - [`FunctionRegistry`]: named functions, strict or not, fixed arity or
//!   variadic; [`builtins`] holds the standard library
//!
//! # Undefined and Error
//!
//! - Strict operators and functions return the first Error operand, then
//!   the first Undefined one
//! - `&&` and `||` return a left Error as it is. Otherwise `FALSE && x` is
//!   FALSE, and `x && FALSE` is FALSE unless `x` is an Error, even when the
//!   other side is Undefined; `||` does the same with TRUE
//! - `is` and `isnt` never fail and treat Undefined as an ordinary value

pub mod builtins;
pub mod engine;
pub mod env;
pub mod error;
pub mod operators;
pub mod registry;

pub use engine::Evaluator;
pub use env::Env;
pub use error::{EvalError, EvalResult};
pub use operators::{apply_binary, apply_unary};
pub use registry::{Arity, FunctionDefinition, FunctionRegistry, Implementation};
