//! Function registry for the evaluator
//!
//! Maps case-insensitive function names to their implementations. Each entry
//! declares its arity and whether it is strict: strict functions receive
//! their arguments already evaluated and never see Undefined or Error
//! arguments; non-strict functions receive the argument expressions and the
//! live scope chain and evaluate what they need themselves.

use crate::builtins;
use crate::engine::Evaluator;
use crate::env::Env;
use crate::error::EvalResult;
use classad_ast::{AttrName, ExprRef};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Implementation of a strict function, called with evaluated arguments
pub type StrictFn = Arc<dyn Fn(&Evaluator, &[ExprRef]) -> EvalResult<ExprRef> + Send + Sync>;

/// Implementation of a non-strict function, called with the argument
/// expressions and the caller's scope chain
pub type NonStrictFn =
    Arc<dyn Fn(&Evaluator, &mut Env, &[ExprRef]) -> EvalResult<ExprRef> + Send + Sync>;

/// Number of arguments a function accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Fixed(usize),
    /// Any number; the function checks its own arguments
    Variadic,
}

impl Arity {
    pub fn accepts(&self, n: usize) -> bool {
        match self {
            Self::Fixed(expected) => *expected == n,
            Self::Variadic => true,
        }
    }
}

#[derive(Clone)]
pub enum Implementation {
    Strict(StrictFn),
    NonStrict(NonStrictFn),
}

/// One registry entry
#[derive(Clone)]
pub struct FunctionDefinition {
    /// Name as registered, for diagnostics
    pub name: String,
    pub arity: Arity,
    pub implementation: Implementation,
}

impl FunctionDefinition {
    /// A strict function
    pub fn strict<F>(name: impl Into<String>, arity: Arity, f: F) -> Self
    where
        F: Fn(&Evaluator, &[ExprRef]) -> EvalResult<ExprRef> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            arity,
            implementation: Implementation::Strict(Arc::new(f)),
        }
    }

    /// A non-strict function
    pub fn non_strict<F>(name: impl Into<String>, arity: Arity, f: F) -> Self
    where
        F: Fn(&Evaluator, &mut Env, &[ExprRef]) -> EvalResult<ExprRef> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            arity,
            implementation: Implementation::NonStrict(Arc::new(f)),
        }
    }

    pub fn is_strict(&self) -> bool {
        matches!(self.implementation, Implementation::Strict(_))
    }
}

impl fmt::Debug for FunctionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDefinition")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("strict", &self.is_strict())
            .finish()
    }
}

/// Registry of callable functions
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, FunctionDefinition>,
}

impl FunctionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the standard library
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtins::register_standard(&mut registry);
        registry
    }

    /// Register a function
    ///
    /// The first registration of a name wins. A later definition with the
    /// same name (in any case) is ignored and `false` is returned.
    pub fn register(&mut self, def: FunctionDefinition) -> bool {
        let key = def.name.to_lowercase();
        if self.functions.contains_key(&key) {
            log::warn!("function {} is already registered; ignoring", def.name);
            return false;
        }
        self.functions.insert(key, def);
        true
    }

    /// Look up a function by the name used at a call site
    pub fn lookup(&self, name: &AttrName) -> Option<&FunctionDefinition> {
        self.functions.get(name.canonical())
    }

    /// Look up a function by name, in any case
    pub fn get(&self, name: &str) -> Option<&FunctionDefinition> {
        self.functions.get(&name.to_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Registered names, lowercased, in no particular order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use classad_ast::Expr;

    #[test]
    fn test_first_registration_wins() {
        let mut registry = FunctionRegistry::new();
        assert!(registry.register(FunctionDefinition::strict(
            "answer",
            Arity::Fixed(0),
            |_, _| Ok(Expr::integer(42)),
        )));
        assert!(!registry.register(FunctionDefinition::strict(
            "ANSWER",
            Arity::Fixed(1),
            |_, _| Ok(Expr::integer(0)),
        )));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("Answer").unwrap().arity, Arity::Fixed(0));
    }

    #[test]
    fn test_lookup_ignores_case() {
        let registry = FunctionRegistry::with_builtins();
        assert!(registry.lookup(&AttrName::new("StrCat")).is_some());
        assert!(registry.contains("ISUNDEFINED"));
        assert!(!registry.get("isUndefined").unwrap().is_strict());
        assert!(registry.get("strcat").unwrap().is_strict());
        assert!(registry.lookup(&AttrName::new("nosuch")).is_none());
    }

    #[test]
    fn test_arity() {
        assert!(Arity::Fixed(2).accepts(2));
        assert!(!Arity::Fixed(2).accepts(3));
        assert!(Arity::Variadic.accepts(0));
    }
}
