//! ClassAd evaluation engine
//!
//! [`Evaluator::evaluate`] rewrites a node one step at a time until it
//! reaches a self-evaluating form: a constant, a record or a list. A step
//! may hand back another unevaluated node (an attribute reference steps to
//! the definition it names), and operands are evaluated by nested calls.
//!
//! Every node being stepped on a thread is kept on a stack together with
//! the innermost record it was reached in. Reaching a node that is already
//! on the stack in the same record means the definition depends on itself,
//! whether directly (`[a = b; b = a]`) or through an operand
//! (`[a = b + 1; b = a]`), and the result is Undefined. Nesting depth alone
//! never counts as a cycle; a separate bound refuses expressions nested
//! deeper than [`MAX_NESTING`] with an Error.

use crate::env::Env;
use crate::registry::{FunctionRegistry, Implementation};
use classad_ast::{
    AttrName, CallExpr, CondExpr, Expr, ExprRef, ListExpr, SelectExpr, SubscriptExpr, Value,
};
use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::sync::Arc;

/// Nested evaluations allowed on one thread before the expression is
/// refused as too deep
pub const MAX_NESTING: usize = 1000;

const CYCLIC: &str = "Cyclic attribute definition";
const TOO_DEEP: &str = "expression nested too deeply";

thread_local! {
    static DEPTH: Cell<usize> = const { Cell::new(0) };
    /// Nodes under evaluation, each with the innermost record it was reached in
    static ACTIVE: RefCell<SmallVec<[(ExprRef, Option<ExprRef>); 16]>> =
        const { RefCell::new(SmallVec::new_const()) };
}

/// One nested evaluation on this thread
///
/// Nodes marked while the frame is alive are released when it drops.
struct Frame {
    base: usize,
}

impl Frame {
    fn enter() -> Option<Self> {
        let depth = DEPTH.get();
        if depth >= MAX_NESTING {
            return None;
        }
        DEPTH.set(depth + 1);
        let base = ACTIVE.with_borrow(|active| active.len());
        Some(Self { base })
    }

    /// Whether `node` is already being evaluated in `scope`
    fn is_active(node: &ExprRef, scope: Option<&ExprRef>) -> bool {
        ACTIVE.with_borrow(|active| {
            active.iter().any(|(seen, seen_scope)| {
                Arc::ptr_eq(seen, node) && same_record(seen_scope.as_ref(), scope)
            })
        })
    }

    fn mark(&self, node: ExprRef, scope: Option<ExprRef>) {
        ACTIVE.with_borrow_mut(|active| active.push((node, scope)));
    }
}

impl Drop for Frame {
    fn drop(&mut self) {
        ACTIVE.with_borrow_mut(|active| active.truncate(self.base));
        DEPTH.set(DEPTH.get().saturating_sub(1));
    }
}

fn same_record(a: Option<&ExprRef>, b: Option<&ExprRef>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

/// The ClassAd evaluator
///
/// Holds the function table consulted by calls. Evaluation never fails:
/// problems surface as Undefined or Error values.
pub struct Evaluator {
    registry: FunctionRegistry,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    /// Create an evaluator with the standard library
    pub fn new() -> Self {
        Self {
            registry: FunctionRegistry::with_builtins(),
        }
    }

    /// Create an evaluator with a custom function table
    pub fn with_registry(registry: FunctionRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    /// Get a mutable reference to the registry
    pub fn registry_mut(&mut self) -> &mut FunctionRegistry {
        &mut self.registry
    }

    /// Evaluate `expr` with no enclosing records
    ///
    /// A bare attribute reference has nothing to resolve against and is
    /// Undefined straight away.
    pub fn evaluate_top(&self, expr: &ExprRef) -> ExprRef {
        if let Expr::AttrRef(name) = expr.as_ref() {
            return Expr::undefined(format!("attribute {name} not found"));
        }
        self.evaluate(expr, &mut Env::new())
    }

    /// Evaluate `expr` in the scope chain `env`
    ///
    /// `env` is consumed as lookups proceed; callers that need the chain
    /// afterwards pass a clone.
    pub fn evaluate(&self, expr: &ExprRef, env: &mut Env) -> ExprRef {
        if expr.is_self_evaluating() {
            return expr.clone();
        }

        let Some(frame) = Frame::enter() else {
            log::debug!("evaluation refused past {MAX_NESTING} nested levels at {expr}");
            env.clear();
            return Expr::error(TOO_DEEP);
        };

        let mut current = expr.clone();
        while !current.is_self_evaluating() {
            let scope = env.innermost().cloned();
            if Frame::is_active(&current, scope.as_ref()) {
                log::debug!("cyclic attribute definition reached at {current}");
                return Expr::undefined(CYCLIC);
            }
            log::trace!("step {current}");
            frame.mark(current.clone(), scope);
            current = self.step(&current, env);
        }
        current
    }

    /// One rewriting step
    fn step(&self, expr: &ExprRef, env: &mut Env) -> ExprRef {
        match expr.as_ref() {
            Expr::Constant(_) | Expr::Record(_) | Expr::List(_) => expr.clone(),
            Expr::AttrRef(name) => Self::resolve(name, env),
            Expr::Select(select) => self.eval_select(select, env),
            Expr::Subscript(subscript) => self.eval_subscript(subscript, env),
            Expr::Cond(cond) => self.eval_cond(cond, env),
            Expr::Binary(binary) => self.eval_binary(binary, env),
            Expr::Unary(unary) => self.eval_unary(unary, env),
            Expr::Call(call) => self.eval_call(call, env),
        }
    }

    /// An attribute reference steps to the definition it names
    fn resolve(name: &AttrName, env: &mut Env) -> ExprRef {
        if name.is_parent() {
            return env
                .pop(2)
                .unwrap_or_else(|| Expr::undefined("No parent record"));
        }
        env.search(name)
            .unwrap_or_else(|| Expr::undefined(format!("attribute {name} not found")))
    }

    /// The definition of `name` in `record`, falling back to the enclosing
    /// scopes; the record becomes the innermost scope on success
    ///
    /// `record.parent` is the record enclosing `record`.
    fn enter(record: &ExprRef, name: &AttrName, env: &mut Env) -> Option<ExprRef> {
        if name.is_parent() {
            env.push(record.clone());
            return env.pop(2);
        }
        let def = match record.as_record().and_then(|r| r.get(name)) {
            Some(def) => def.clone(),
            None => env.search(name)?,
        };
        env.push(record.clone());
        Some(def)
    }

    fn eval_select(&self, select: &SelectExpr, env: &mut Env) -> ExprRef {
        let base = self.evaluate(&select.base, env);
        match base.as_ref() {
            Expr::Constant(Value::Undefined(_) | Value::Error(_)) => {
                env.clear();
                base
            }
            Expr::Record(_) => Self::enter(&base, &select.attr, env).unwrap_or_else(|| {
                env.clear();
                Expr::undefined(format!(
                    "attribute {} not found in expression {}",
                    select.attr, select.base
                ))
            }),
            Expr::List(list) => {
                let result = self.select_each(list, &select.attr, env);
                env.clear();
                result
            }
            _ => {
                env.clear();
                Expr::error(format!(
                    "{}.{}: argument is not a record or list",
                    select.base, select.attr
                ))
            }
        }
    }

    /// `{a, b}.x` is `{a.x, b.x}`, each evaluated on its own
    fn select_each(&self, list: &ListExpr, attr: &AttrName, env: &Env) -> ExprRef {
        let items = list
            .iter()
            .map(|item| {
                let selected = Expr::select(item.clone(), attr.clone());
                self.evaluate(&selected, &mut env.clone())
            })
            .collect();
        Expr::list(items)
    }

    fn eval_subscript(&self, subscript: &SubscriptExpr, env: &mut Env) -> ExprRef {
        let index = self.evaluate(&subscript.index, &mut env.clone());
        let base = self.evaluate(&subscript.base, env);

        for operand in [&base, &index] {
            if operand.is_undefined() || operand.is_error() {
                env.clear();
                return operand.clone();
            }
        }

        match (base.as_ref(), index.value()) {
            (Expr::List(list), Some(Value::Integer(i))) => {
                let item = usize::try_from(*i).ok().and_then(|i| list.get(i));
                match item {
                    Some(item) => item.clone(),
                    None => {
                        env.clear();
                        Expr::error(format!("subscript {i} is out of bounds"))
                    }
                }
            }
            (Expr::Record(_), Some(Value::String(s))) => {
                let name = AttrName::new(s);
                Self::enter(&base, &name, env).unwrap_or_else(|| {
                    env.clear();
                    Expr::undefined(format!(
                        "attribute {name} not found in expression {}",
                        subscript.base
                    ))
                })
            }
            (Expr::List(_), _) => {
                env.clear();
                Expr::error(format!("List[{}]: type mismatch", index.type_name()))
            }
            (Expr::Record(_), _) => {
                env.clear();
                Expr::error(format!("Record[{}]: type mismatch", index.type_name()))
            }
            _ => {
                env.clear();
                Expr::error(format!("[] applied to {}", base.type_name()))
            }
        }
    }

    fn eval_cond(&self, cond: &CondExpr, env: &mut Env) -> ExprRef {
        let condition = self.evaluate(&cond.condition, &mut env.clone());
        match condition.value() {
            Some(Value::Boolean(true)) => self.evaluate(&cond.then_expr, env),
            Some(Value::Boolean(false)) => self.evaluate(&cond.else_expr, env),
            Some(Value::Undefined(_) | Value::Error(_)) => {
                env.clear();
                condition
            }
            _ => {
                env.clear();
                Expr::error(format!(
                    "type {} found where boolean expected in conditional expression",
                    condition.type_name()
                ))
            }
        }
    }

    fn eval_call(&self, call: &CallExpr, env: &mut Env) -> ExprRef {
        let Some(def) = self.registry.lookup(&call.name) else {
            return Expr::error(format!("unknown function {}", call.name));
        };
        if !def.arity.accepts(call.args.len()) {
            return Expr::error(format!("wrong number of args to {}", call.name));
        }

        let result = match &def.implementation {
            Implementation::NonStrict(f) => f(self, env, &call.args),
            Implementation::Strict(f) => {
                let args = self.evaluate_args(&call.args, env);
                if let Some(err) = args.iter().find(|a| a.is_error()) {
                    return err.clone();
                }
                if let Some(undefined) = args.iter().find(|a| a.is_undefined()) {
                    return undefined.clone();
                }
                f(self, &args)
            }
        };

        result.unwrap_or_else(|e| {
            log::trace!("{} failed: {e}", call.name);
            Expr::error(e.to_string())
        })
    }

    /// Evaluate arguments left to right, each but the last in a copy of the
    /// chain
    fn evaluate_args(&self, args: &[ExprRef], env: &mut Env) -> Vec<ExprRef> {
        let last = args.len().saturating_sub(1);
        args.iter()
            .enumerate()
            .map(|(i, arg)| {
                if i < last {
                    self.evaluate(arg, &mut env.clone())
                } else {
                    self.evaluate(arg, env)
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use classad_ast::{BinaryOp, RecordExpr};

    #[test]
    fn test_self_evaluating_nodes_are_returned_as_is() {
        let evaluator = Evaluator::new();
        let list = Expr::list(vec![Expr::attr_ref("x")]);
        let result = evaluator.evaluate_top(&list);
        assert!(Arc::ptr_eq(&result, &list));
    }

    #[test]
    fn test_top_level_reference_is_undefined() {
        let evaluator = Evaluator::new();
        let result = evaluator.evaluate_top(&Expr::attr_ref("Memory"));
        assert!(result.is_undefined());
        assert_eq!(
            result.value().and_then(Value::reason),
            Some("attribute Memory not found")
        );
    }

    #[test]
    fn test_self_reference_is_cyclic() {
        let mut record = RecordExpr::new();
        record.set("a", Expr::attr_ref("a")).unwrap();
        let ad = Expr::record(record);
        let evaluator = Evaluator::new();
        let result = evaluator.evaluate(&Expr::attr_ref("a"), &mut Env::with_record(ad));
        assert_eq!(
            result.value().and_then(Value::reason),
            Some("Cyclic attribute definition")
        );
    }

    #[test]
    fn test_cycle_through_operands_is_cut_off() {
        let mut record = RecordExpr::new();
        let b = Expr::attr_ref("b");
        record.set("a", Expr::binary(BinaryOp::Add, b.clone(), b)).unwrap();
        record.set("b", Expr::attr_ref("a")).unwrap();
        let ad = Expr::record(record);
        let evaluator = Evaluator::new();
        let result = evaluator.evaluate(&Expr::attr_ref("a"), &mut Env::with_record(ad));
        assert_eq!(
            result.value().and_then(Value::reason),
            Some("Cyclic attribute definition")
        );

        // Nothing stays marked once the outermost evaluation returns
        assert!(ACTIVE.with_borrow(|active| active.is_empty()));
        assert_eq!(DEPTH.get(), 0);
        let sum = Expr::binary(BinaryOp::Add, Expr::integer(1), Expr::integer(2));
        assert_eq!(evaluator.evaluate_top(&sum).value(), Some(&Value::integer(3)));
    }

    fn chain(op: BinaryOp, terms: usize) -> ExprRef {
        (1..terms).fold(Expr::integer(1), |acc, _| {
            Expr::binary(op, acc, Expr::integer(1))
        })
    }

    /// Run `f` on a thread with room for deeply nested evaluation
    fn on_large_stack<T: Send + 'static>(f: impl FnOnce() -> T + Send + 'static) -> T {
        std::thread::Builder::new()
            .stack_size(256 * 1024 * 1024)
            .spawn(f)
            .unwrap()
            .join()
            .unwrap()
    }

    #[test]
    fn test_deep_operator_chain_is_not_a_cycle() {
        let result = on_large_stack(|| {
            let sum = Evaluator::new().evaluate_top(&chain(BinaryOp::Add, 300));
            sum.value().cloned()
        });
        assert_eq!(result, Some(Value::integer(300)));
    }

    #[test]
    fn test_nesting_past_the_bound_is_an_error() {
        let (reason, depth_after) = on_large_stack(|| {
            let deep = chain(BinaryOp::Add, MAX_NESTING + 10);
            let reason = Evaluator::new()
                .evaluate_top(&deep)
                .value()
                .filter(|value| value.is_error())
                .and_then(Value::reason)
                .map(str::to_owned);
            (reason, DEPTH.get())
        });
        assert_eq!(reason.as_deref(), Some(TOO_DEEP));
        assert_eq!(depth_after, 0);
    }

    #[test]
    fn test_unknown_function() {
        let evaluator = Evaluator::with_registry(FunctionRegistry::new());
        let call = Expr::call("strcat", vec![Expr::attr_ref("never")]);
        let result = evaluator.evaluate_top(&call);
        assert_eq!(
            result.value().and_then(Value::reason),
            Some("unknown function strcat")
        );
    }
}
