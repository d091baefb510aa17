//! Evaluating and matching pairs of ads
//!
//! A pair is evaluated inside the record built by [`bind`]:
//!
//! ```text
//! [
//!     Ad1 = [other = Ad2.self; self = <ad1>];
//!     Ad2 = [other = Ad1.self; self = <ad2>]
//! ]
//! ```
//!
//! so that within either ad `self` names that ad and `other` names its
//! partner.

use classad_ast::{Expr, ExprRef, RecordExpr, Value};
use classad_eval::Evaluator;

/// Wrap `ad1` and `ad2` in a record defining `self` and `other` for each
pub fn bind(ad1: &ExprRef, ad2: &ExprRef) -> ExprRef {
    let mut env = RecordExpr::with_capacity(2);
    define(&mut env, "Ad1", side(ad1, "Ad2"));
    define(&mut env, "Ad2", side(ad2, "Ad1"));
    Expr::record(env)
}

fn side(ad: &ExprRef, partner: &str) -> ExprRef {
    let mut record = RecordExpr::with_capacity(2);
    define(&mut record, "other", Expr::select(Expr::attr_ref(partner), "self"));
    define(&mut record, "self", ad.clone());
    Expr::record(record)
}

fn define(record: &mut RecordExpr, name: &str, expr: ExprRef) {
    // Only `parent` is refused
    if let Err(e) = record.set(name, expr) {
        log::warn!("cannot define {name}: {e}");
    }
}

/// Evaluate `ad.attr`
pub fn eval_attr(ad: &ExprRef, attr: &str) -> ExprRef {
    eval_path(ad, &[attr])
}

/// Evaluate `ad.a.b.c` for the path `["a", "b", "c"]`
pub fn eval_path(ad: &ExprRef, path: &[&str]) -> ExprRef {
    let selection = path
        .iter()
        .fold(ad.clone(), |base, attr| Expr::select(base, *attr));
    Evaluator::new().evaluate_top(&selection)
}

/// Evaluate `attr` of `ad1` with `ad2` as its `other`
pub fn eval_in_context(ad1: &ExprRef, ad2: &ExprRef, attr: &str) -> ExprRef {
    eval_path(&bind(ad1, ad2), &["Ad1", "self", attr])
}

/// Match two ads
///
/// Both ads' `requirements` must be TRUE with each ad as the other's
/// `other`. The result is then both ads' `rank`, which must be integers.
/// Anything else, including either side not being a record, is no match.
pub fn match_ads(ad1: &ExprRef, ad2: &ExprRef) -> Option<(i64, i64)> {
    if ad1.as_record().is_none() || ad2.as_record().is_none() {
        return None;
    }
    let env = bind(ad1, ad2);
    let requirements = |side| eval_path(&env, &[side, "self", "requirements"]).is_true();
    if !requirements("Ad1") || !requirements("Ad2") {
        log::debug!("requirements not met");
        return None;
    }
    let rank = |side| match eval_path(&env, &[side, "self", "rank"]).value() {
        Some(Value::Integer(i)) => Some(*i),
        _ => None,
    };
    Some((rank("Ad1")?, rank("Ad2")?))
}
