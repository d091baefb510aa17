//! Expression tree nodes
//!
//! Trees are immutable once built and shared through [`ExprRef`]. Records,
//! lists and constants evaluate to themselves; every other node needs the
//! evaluator.

use crate::{AttrName, BinaryOp, UnaryOp, pool};
use classad_diagnostics::{CAD0008, ClassAdError, Result};
use classad_types::{AbsTime, RelTime, Value, parse_real};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Shared handle to an expression node
pub type ExprRef = Arc<Expr>;

/// All ClassAd expression kinds
#[derive(Debug, Clone)]
pub enum Expr {
    // === Self-evaluating ===
    /// Constant value
    Constant(Value),
    /// Record of named attributes (`[a = 1; b = 2]`)
    Record(RecordExpr),
    /// List (`{1, 2, 3}`)
    List(ListExpr),

    // === References ===
    /// Attribute reference, resolved through the scope chain
    AttrRef(AttrName),
    /// Selection (`base.attr`)
    Select(SelectExpr),
    /// Subscript (`base[index]`)
    Subscript(SubscriptExpr),

    // === Operators ===
    /// Conditional (`c ? t : f`)
    Cond(CondExpr),
    /// Binary operation
    Binary(BinaryExpr),
    /// Unary operation
    Unary(UnaryExpr),

    // === Functions ===
    /// Function call (`f(a, b)`)
    Call(CallExpr),
}

/// Selection expression
#[derive(Debug, Clone)]
pub struct SelectExpr {
    pub base: ExprRef,
    pub attr: AttrName,
}

/// Subscript expression
#[derive(Debug, Clone)]
pub struct SubscriptExpr {
    pub base: ExprRef,
    pub index: ExprRef,
}

/// Conditional expression
#[derive(Debug, Clone)]
pub struct CondExpr {
    pub condition: ExprRef,
    pub then_expr: ExprRef,
    pub else_expr: ExprRef,
}

/// Binary operation expression
#[derive(Debug, Clone)]
pub struct BinaryExpr {
    /// Left operand
    pub left: ExprRef,
    /// Operator
    pub op: BinaryOp,
    /// Right operand
    pub right: ExprRef,
}

/// Unary operation expression
#[derive(Debug, Clone)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: ExprRef,
}

/// Function call expression
#[derive(Debug, Clone)]
pub struct CallExpr {
    /// Function name, matched without regard to case
    pub name: AttrName,
    pub args: Vec<ExprRef>,
}

/// An ordered list of expressions
#[derive(Debug, Clone, Default)]
pub struct ListExpr {
    items: Vec<ExprRef>,
}

impl ListExpr {
    pub fn new(items: Vec<ExprRef>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[ExprRef] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&ExprRef> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExprRef> {
        self.items.iter()
    }
}

impl FromIterator<ExprRef> for ListExpr {
    fn from_iter<I: IntoIterator<Item = ExprRef>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ListExpr {
    type Item = &'a ExprRef;
    type IntoIter = std::slice::Iter<'a, ExprRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// A record: attribute definitions in insertion order
///
/// Re-defining an attribute replaces its expression but keeps its original
/// position and spelling.
#[derive(Debug, Clone, Default)]
pub struct RecordExpr {
    attrs: IndexMap<AttrName, ExprRef>,
}

impl RecordExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            attrs: IndexMap::with_capacity(n),
        }
    }

    /// Define `name`, replacing any previous definition
    ///
    /// Fails for `parent`, which always refers to the enclosing record.
    pub fn insert(&mut self, name: AttrName, expr: ExprRef) -> Result<()> {
        if name.is_parent() {
            return Err(ClassAdError::parse(
                CAD0008,
                "attribute name \"parent\" is reserved",
                name.raw(),
            ));
        }
        self.attrs.insert(name, expr);
        Ok(())
    }

    /// [`insert`](Self::insert) by raw name
    pub fn set(&mut self, name: &str, expr: ExprRef) -> Result<()> {
        self.insert(AttrName::new(name), expr)
    }

    pub fn get(&self, name: &AttrName) -> Option<&ExprRef> {
        self.attrs.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&ExprRef> {
        self.attrs.get(&AttrName::new(name))
    }

    pub fn contains(&self, name: &AttrName) -> bool {
        self.attrs.contains_key(name)
    }

    /// Remove a definition, keeping the order of the others
    pub fn remove(&mut self, name: &AttrName) -> Option<ExprRef> {
        self.attrs.shift_remove(name)
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, AttrName, ExprRef> {
        self.attrs.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &AttrName> {
        self.attrs.keys()
    }
}

impl<'a> IntoIterator for &'a RecordExpr {
    type Item = (&'a AttrName, &'a ExprRef);
    type IntoIter = indexmap::map::Iter<'a, AttrName, ExprRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.attrs.iter()
    }
}

impl Expr {
    // === Constants ===

    /// The shared constant node for `value`
    pub fn constant(value: impl Into<Value>) -> ExprRef {
        pool::intern(value.into())
    }

    pub fn integer(i: i64) -> ExprRef {
        pool::intern(Value::Integer(i))
    }

    pub fn real(d: f64) -> ExprRef {
        pool::intern(Value::Real(d))
    }

    pub fn string(s: impl Into<Arc<str>>) -> ExprRef {
        pool::intern(Value::String(s.into()))
    }

    pub fn boolean(b: bool) -> ExprRef {
        pool::boolean(b)
    }

    pub fn undefined(reason: impl Into<Arc<str>>) -> ExprRef {
        Arc::new(Self::Constant(Value::Undefined(reason.into())))
    }

    pub fn error(reason: impl Into<Arc<str>>) -> ExprRef {
        Arc::new(Self::Constant(Value::Error(reason.into())))
    }

    // === Compound nodes ===

    pub fn record(record: RecordExpr) -> ExprRef {
        Arc::new(Self::Record(record))
    }

    pub fn list(items: Vec<ExprRef>) -> ExprRef {
        Arc::new(Self::List(ListExpr::new(items)))
    }

    pub fn attr_ref(name: impl Into<AttrName>) -> ExprRef {
        Arc::new(Self::AttrRef(name.into()))
    }

    pub fn select(base: ExprRef, attr: impl Into<AttrName>) -> ExprRef {
        Arc::new(Self::Select(SelectExpr {
            base,
            attr: attr.into(),
        }))
    }

    pub fn subscript(base: ExprRef, index: ExprRef) -> ExprRef {
        Arc::new(Self::Subscript(SubscriptExpr { base, index }))
    }

    pub fn cond(condition: ExprRef, then_expr: ExprRef, else_expr: ExprRef) -> ExprRef {
        Arc::new(Self::Cond(CondExpr {
            condition,
            then_expr,
            else_expr,
        }))
    }

    pub fn binary(op: BinaryOp, left: ExprRef, right: ExprRef) -> ExprRef {
        Arc::new(Self::Binary(BinaryExpr { left, op, right }))
    }

    pub fn unary(op: UnaryOp, operand: ExprRef) -> ExprRef {
        Arc::new(Self::Unary(UnaryExpr { op, operand }))
    }

    /// A function call
    ///
    /// `relTime("...")`, `absTime("...")` and `real("...")` with a single
    /// string literal are folded into the constant they denote (or an Error
    /// constant when the text does not parse).
    pub fn call(name: impl Into<AttrName>, args: Vec<ExprRef>) -> ExprRef {
        let name = name.into();
        if let [arg] = args.as_slice() {
            if let Self::Constant(Value::String(s)) = arg.as_ref() {
                match name.canonical() {
                    "reltime" => {
                        return match RelTime::parse(s) {
                            Ok(t) => Self::constant(t),
                            Err(e) => Self::error(e.message()),
                        };
                    }
                    "abstime" => {
                        return match AbsTime::parse(s) {
                            Ok(t) => Self::constant(t),
                            Err(e) => Self::error(e.message()),
                        };
                    }
                    "real" => {
                        return match parse_real(s) {
                            Ok(d) => Self::real(d),
                            Err(e) => Self::error(e.message()),
                        };
                    }
                    _ => {}
                }
            }
        }
        Arc::new(Self::Call(CallExpr { name, args }))
    }

    // === Inspection ===

    /// Constants, records and lists evaluate to themselves
    pub fn is_self_evaluating(&self) -> bool {
        matches!(self, Self::Constant(_) | Self::Record(_) | Self::List(_))
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Constant(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&RecordExpr> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListExpr> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Constant(Value::Undefined(_)))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Constant(Value::Error(_)))
    }

    /// True only for the constant `true`
    pub fn is_true(&self) -> bool {
        matches!(self, Self::Constant(Value::Boolean(true)))
    }

    /// The type name used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Constant(v) => v.type_name(),
            Self::Record(_) => "record",
            Self::List(_) => "list",
            _ => "expression",
        }
    }

    /// Identity in the sense of `is`: equal constants of the same kind, or
    /// the very same list or record node
    pub fn identical(a: &ExprRef, b: &ExprRef) -> bool {
        match (a.as_ref(), b.as_ref()) {
            (Self::Constant(x), Self::Constant(y)) => x.is_identical(y),
            _ => Arc::ptr_eq(a, b),
        }
    }

    /// Deep structural equality
    ///
    /// Numbers compare by value across integer and real, other constants as
    /// with `is`. Records compare as sets of definitions, so attribute order
    /// does not matter.
    pub fn same_as(&self, other: &Expr) -> bool {
        match (self, other) {
            (Self::Constant(a), Self::Constant(b)) => {
                if a.is_numeric() && b.is_numeric() {
                    a.as_real().ok() == b.as_real().ok()
                } else {
                    a.is_identical(b)
                }
            }
            (Self::Record(a), Self::Record(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(name, x)| b.get(name).is_some_and(|y| x.same_as(y)))
            }
            (Self::List(a), Self::List(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.same_as(y))
            }
            (Self::AttrRef(a), Self::AttrRef(b)) => a == b,
            (Self::Select(a), Self::Select(b)) => a.attr == b.attr && a.base.same_as(&b.base),
            (Self::Subscript(a), Self::Subscript(b)) => {
                a.base.same_as(&b.base) && a.index.same_as(&b.index)
            }
            (Self::Cond(a), Self::Cond(b)) => {
                a.condition.same_as(&b.condition)
                    && a.then_expr.same_as(&b.then_expr)
                    && a.else_expr.same_as(&b.else_expr)
            }
            (Self::Binary(a), Self::Binary(b)) => {
                a.op == b.op && a.left.same_as(&b.left) && a.right.same_as(&b.right)
            }
            (Self::Unary(a), Self::Unary(b)) => a.op == b.op && a.operand.same_as(&b.operand),
            (Self::Call(a), Self::Call(b)) => {
                a.name == b.name
                    && a.args.len() == b.args.len()
                    && a.args.iter().zip(&b.args).all(|(x, y)| x.same_as(y))
            }
            _ => false,
        }
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Self::Constant(value)
    }
}

// === Canonical text ===

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(v) => write!(f, "{v}"),
            Self::Record(r) => write!(f, "{r}"),
            Self::List(l) => write!(f, "{l}"),
            Self::AttrRef(name) => write!(f, "{name}"),
            Self::Select(s) => write!(f, "{}.{}", s.base, s.attr),
            Self::Subscript(s) => write!(f, "{}[{}]", s.base, s.index),
            Self::Cond(c) => write!(f, "({}?{}:{})", c.condition, c.then_expr, c.else_expr),
            Self::Binary(b) => write!(f, "({}{}{})", b.left, b.op.infix(), b.right),
            Self::Unary(u) => write!(f, "({}{})", u.op.symbol(), u.operand),
            Self::Call(c) => {
                write!(f, "{}(", c.name)?;
                for (i, arg) in c.args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for ListExpr {
    /// `{a,b,c}`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{item}")?;
        }
        f.write_str("}")
    }
}

impl fmt::Display for RecordExpr {
    /// `[a=1;b=2]`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, (name, expr)) in self.attrs.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{name}={expr}")?;
        }
        f.write_str("]")
    }
}
