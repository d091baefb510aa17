//! Canonical constant instances
//!
//! Equal integers, reals, strings and times share one `Arc<Expr>` so that
//! repeated literals cost a pointer. The pool is process-wide, append-only
//! and guarded by a `parking_lot::Mutex`; entries live until [`reset`] or
//! process exit. Sharing is only an optimization: equality never depends on
//! it.

use crate::{Expr, ExprRef};
use classad_types::Value;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ConstKey {
    Integer(i64),
    Real(u64),
    String(Arc<str>),
    AbsTime(i64, i32),
    RelTime(i64),
}

static POOL: LazyLock<Mutex<HashMap<ConstKey, ExprRef>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

static TRUE: LazyLock<ExprRef> = LazyLock::new(|| Arc::new(Expr::Constant(Value::Boolean(true))));
static FALSE: LazyLock<ExprRef> =
    LazyLock::new(|| Arc::new(Expr::Constant(Value::Boolean(false))));

/// The shared node for `value`
///
/// Booleans map to the two static instances. Undefined and Error carry
/// their own diagnostic and are never shared.
pub fn intern(value: Value) -> ExprRef {
    let key = match &value {
        Value::Boolean(b) => return boolean(*b),
        Value::Undefined(_) | Value::Error(_) => return Arc::new(Expr::Constant(value)),
        Value::Integer(i) => ConstKey::Integer(*i),
        Value::Real(d) => ConstKey::Real(d.to_bits()),
        Value::String(s) => ConstKey::String(s.clone()),
        Value::AbsTime(t) => ConstKey::AbsTime(t.millis, t.offset_secs),
        Value::RelTime(t) => ConstKey::RelTime(t.millis),
    };
    POOL.lock()
        .entry(key)
        .or_insert_with(|| Arc::new(Expr::Constant(value)))
        .clone()
}

/// One of the two boolean constants
pub fn boolean(b: bool) -> ExprRef {
    if b { TRUE.clone() } else { FALSE.clone() }
}

/// Drop every pooled constant. Nodes already handed out stay valid.
///
/// Meant for tests that measure the pool.
pub fn reset() {
    POOL.lock().clear();
}
