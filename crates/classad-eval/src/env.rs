//! Scope chains for attribute lookup
//!
//! An [`Env`] is a stack of enclosing records, innermost first. Scopes are
//! shared, immutable list nodes; the `Env` itself is only a cursor into the
//! list, so cloning it is cheap and gives an independent view that the
//! other copy's lookups cannot disturb.

use classad_ast::{AttrName, Expr, ExprRef};
use std::sync::Arc;

struct Scope {
    record: ExprRef,
    next: Option<Arc<Scope>>,
}

/// The chain of records an expression is evaluated in
#[derive(Clone, Default)]
pub struct Env {
    top: Option<Arc<Scope>>,
}

impl Env {
    /// An empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// A chain holding a single record
    pub fn with_record(record: ExprRef) -> Self {
        let mut env = Self::new();
        env.push(record);
        env
    }

    /// Enter `record`, which becomes the innermost scope
    pub fn push(&mut self, record: ExprRef) {
        let next = self.top.take();
        self.top = Some(Arc::new(Scope { record, next }));
    }

    /// Leave `n` scopes and return the record of the last one left, or
    /// `None` when fewer than `n` scopes remain (the chain is then empty)
    pub fn pop(&mut self, n: usize) -> Option<ExprRef> {
        let mut last = None;
        for _ in 0..n {
            let scope = self.top.take()?;
            self.top = scope.next.clone();
            last = Some(scope.record.clone());
        }
        last
    }

    /// Find the innermost definition of `name`
    ///
    /// Lookup is destructive: scopes that do not define `name` are dropped,
    /// so on success the defining record is innermost, and on failure the
    /// chain is empty.
    pub fn search(&mut self, name: &AttrName) -> Option<ExprRef> {
        while let Some(scope) = self.top.clone() {
            if let Some(def) = scope.record.as_record().and_then(|r| r.get(name)) {
                return Some(def.clone());
            }
            self.top = scope.next.clone();
        }
        None
    }

    /// Drop every scope
    pub fn clear(&mut self) {
        self.top = None;
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_none()
    }

    pub fn depth(&self) -> usize {
        std::iter::successors(self.top.as_deref(), |s| s.next.as_deref()).count()
    }

    /// The innermost record
    pub fn innermost(&self) -> Option<&ExprRef> {
        self.top.as_ref().map(|s| &s.record)
    }
}

impl std::fmt::Debug for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let records: Vec<&Expr> =
            std::iter::successors(self.top.as_deref(), |s| s.next.as_deref())
                .map(|s| s.record.as_ref())
                .collect();
        f.debug_list().entries(records).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use classad_ast::RecordExpr;

    fn record(pairs: &[(&str, i64)]) -> ExprRef {
        let mut r = RecordExpr::new();
        for (name, value) in pairs {
            r.set(name, Expr::integer(*value)).unwrap();
        }
        Expr::record(r)
    }

    #[test]
    fn test_search_truncates_to_defining_scope() {
        let outer = record(&[("a", 1)]);
        let inner = record(&[("b", 2)]);
        let mut env = Env::with_record(outer.clone());
        env.push(inner);
        assert_eq!(env.depth(), 2);

        let found = env.search(&AttrName::new("A")).unwrap();
        assert_eq!(found.to_string(), "1");
        assert_eq!(env.depth(), 1);
        assert!(Arc::ptr_eq(env.innermost().unwrap(), &outer));
    }

    #[test]
    fn test_failed_search_empties_chain() {
        let mut env = Env::with_record(record(&[("a", 1)]));
        assert!(env.search(&AttrName::new("missing")).is_none());
        assert!(env.is_empty());
    }

    #[test]
    fn test_copies_are_independent() {
        let mut env = Env::with_record(record(&[("a", 1)]));
        env.push(record(&[("b", 2)]));
        let mut copy = env.clone();
        copy.search(&AttrName::new("a")).unwrap();
        assert_eq!(copy.depth(), 1);
        assert_eq!(env.depth(), 2);
    }

    #[test]
    fn test_pop_returns_last_record_left() {
        let outer = record(&[("a", 1)]);
        let mut env = Env::with_record(outer.clone());
        env.push(record(&[("b", 2)]));
        let popped = env.pop(2).unwrap();
        assert!(Arc::ptr_eq(&popped, &outer));
        assert!(env.is_empty());
        assert!(env.pop(1).is_none());
    }
}
