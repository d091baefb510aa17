//! ClassAd expression tree
//!
//! This crate defines the nodes the parser builds and the evaluator walks:
//! - [`AttrName`]: interned, case-insensitive attribute names
//! - [`Expr`]: the closed set of node kinds, shared through [`ExprRef`]
//! - [`BinaryOp`] / [`UnaryOp`]: operators with precedence
//! - [`pool`]: the process-wide table of shared constant nodes
//!
//! `Display` on any node produces the canonical text form, e.g.
//! `[a=1;b=(a+2)]`.

mod attr_name;
mod expression;
mod operator;
pub mod pool;

pub use attr_name::{AttrName, is_identifier};
pub use expression::*;
pub use operator::*;

pub use classad_types::Value;
