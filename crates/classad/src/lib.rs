//! ClassAd expression language for Rust
//!
//! This crate gathers the ClassAd workspace behind one dependency:
//! - Parsing the canonical text syntax into expression trees
//! - Evaluating expressions against nested records, with Undefined and
//!   Error as ordinary results
//! - The standard function library
//! - Cedar packet streams and the legacy record transport
//! - Matching a pair of ads through their `requirements` and `rank`
//!
//! # Example
//!
//! ```ignore
//! use classad::{match_ads, parse_record};
//!
//! let job = parse_record(r#"[Requirements = other.Memory >= 1024; Rank = other.Memory]"#)?;
//! let machine = parse_record(r#"[Memory = 2048; Requirements = true; Rank = 0]"#)?;
//!
//! assert_eq!(match_ads(&job, &machine), Some((2048, 0)));
//! ```

pub use classad_ast as ast;
pub use classad_cedar as cedar;
pub use classad_diagnostics as diagnostics;
pub use classad_eval as eval;
pub use classad_parser as parser;
pub use classad_types as types;

mod matching;

// Convenience re-exports
pub use classad_ast::{AttrName, Expr, ExprRef, ListExpr, RecordExpr, Value};
pub use classad_diagnostics::{ClassAdError, Result};
pub use classad_eval::{Env, Evaluator, FunctionRegistry};
pub use classad_parser::{parse_expression, parse_record};
pub use matching::{bind, eval_attr, eval_in_context, eval_path, match_ads};
