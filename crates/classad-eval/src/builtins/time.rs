//! Time functions
//!
//! - `time()`: seconds since the epoch
//! - `interval(secs)`: `days+hh:mm:ss` text
//! - `absTime` and `relTime`: build timestamps and intervals
//! - `splitTime(t)`: a record of calendar or interval fields
//! - `formatTime(t, fmt)`: strftime formatting
//! - `gmtTimeString(secs)`, `localTimeString(secs)`: ctime-style text

use super::math::round_half_up;
use super::{numeric_value, string_arg};
use crate::error::{EvalError, EvalResult};
use crate::registry::{Arity, FunctionDefinition, FunctionRegistry};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Datelike, Local, TimeZone, Timelike, Utc};
use classad_ast::{Expr, ExprRef, RecordExpr, Value};
use classad_types::{AbsTime, RelTime};

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(FunctionDefinition::strict("time", Arity::Fixed(0), |_, _| {
        Ok(Expr::integer(Utc::now().timestamp()))
    }));
    registry.register(FunctionDefinition::strict(
        "interval",
        Arity::Fixed(1),
        |_, args| interval(args),
    ));
    registry.register(FunctionDefinition::strict(
        "absTime",
        Arity::Variadic,
        |_, args| abs_time(args),
    ));
    registry.register(FunctionDefinition::strict(
        "relTime",
        Arity::Fixed(1),
        |_, args| rel_time(args),
    ));
    registry.register(FunctionDefinition::strict(
        "splitTime",
        Arity::Fixed(1),
        |_, args| split_time(args),
    ));
    registry.register(FunctionDefinition::strict(
        "formatTime",
        Arity::Fixed(2),
        |_, args| format_time(args),
    ));
    registry.register(FunctionDefinition::strict(
        "gmtTimeString",
        Arity::Fixed(1),
        |_, args| gmt_time_string(args),
    ));
    registry.register(FunctionDefinition::strict(
        "localTimeString",
        Arity::Fixed(1),
        |_, args| local_time_string(args),
    ));
}

/// Seconds as `[days+][hh:]mm:ss`, leaving out leading zero fields
pub fn format_interval(secs: i64) -> String {
    let mut rest = secs;
    let mut text = String::new();
    for (base, separator) in [(60, ':'), (60, ':'), (24, '+')] {
        let field = rest % base;
        rest /= base;
        text.insert_str(0, &field.to_string());
        if rest == 0 {
            break;
        }
        if field < 10 {
            text.insert(0, '0');
        }
        text.insert(0, separator);
    }
    if rest > 0 {
        text.insert_str(0, &rest.to_string());
    }
    text
}

fn interval(args: &[ExprRef]) -> EvalResult<ExprRef> {
    let [secs] = args else {
        return Err(EvalError::arity("interval"));
    };
    match secs.value() {
        Some(Value::Integer(s)) => Ok(Expr::string(format_interval(*s))),
        _ => Err(EvalError::invalid_argument(
            "interval",
            format!("invalid argument {secs}"),
        )),
    }
}

/// Milliseconds from a count of seconds, rounded
fn millis_of(function: &str, seconds: &Value) -> EvalResult<i64> {
    Ok(round_half_up(numeric_value(function, seconds)? * 1000.0) as i64)
}

/// `absTime(text)`, `absTime()`, `absTime(secs)` or `absTime(secs, zone)`
///
/// Without a zone the local zone at that instant is used.
fn abs_time(args: &[ExprRef]) -> EvalResult<ExprRef> {
    let values: Vec<&Value> = args
        .iter()
        .map(|a| {
            a.value().ok_or_else(|| {
                EvalError::invalid_argument("absTime", format!("invalid argument {a}"))
            })
        })
        .collect::<EvalResult<_>>()?;

    let time = match values.as_slice() {
        [Value::String(s)] => AbsTime::parse(s)?,
        [Value::String(_), ..] => return Err(EvalError::arity("absTime")),
        [] => AbsTime::now(),
        [secs] => {
            let millis = millis_of("absTime", secs)?;
            AbsTime::new(millis, AbsTime::local_offset_at(millis))
        }
        [secs, zone] => {
            let millis = millis_of("absTime", secs)?;
            let zone = match zone {
                Value::Integer(z) => i32::try_from(*z)
                    .ok()
                    .filter(|z| z.abs() < 86_400)
                    .ok_or_else(|| {
                        EvalError::invalid_argument("absTime", format!("zone offset {z} out of range"))
                    })?,
                other => {
                    return Err(EvalError::invalid_argument(
                        "absTime",
                        format!("invalid {} second argument", other.type_name()),
                    ));
                }
            };
            AbsTime::new(millis, zone)
        }
        _ => return Err(EvalError::arity("absTime")),
    };
    Ok(Expr::constant(time))
}

/// `relTime(text)` or `relTime(secs)`
fn rel_time(args: &[ExprRef]) -> EvalResult<ExprRef> {
    let [arg] = args else {
        return Err(EvalError::arity("relTime"));
    };
    let interval = match arg.value() {
        Some(Value::String(s)) => RelTime::parse(s)?,
        Some(v) => RelTime::new(millis_of("relTime", v)?),
        None => {
            return Err(EvalError::invalid_argument(
                "relTime",
                format!("invalid argument {arg}"),
            ));
        }
    };
    Ok(Expr::constant(interval))
}

/// The fields of a timestamp (in its own zone) or an interval, as a record
fn split_time(args: &[ExprRef]) -> EvalResult<ExprRef> {
    let [arg] = args else {
        return Err(EvalError::arity("splitTime"));
    };
    let mut record = RecordExpr::with_capacity(8);
    match arg.value() {
        Some(Value::AbsTime(t)) => {
            let dt = t.to_datetime().ok_or_else(|| {
                EvalError::invalid_argument("splitTime", format!("timestamp {t} out of range"))
            })?;
            let millis = t.millis.rem_euclid(1000);
            record.set("Type", Expr::string("AbsoluteTime"))?;
            record.set("Year", Expr::integer(i64::from(dt.year())))?;
            record.set("Month", Expr::integer(i64::from(dt.month())))?;
            record.set("Day", Expr::integer(i64::from(dt.day())))?;
            record.set("Hours", Expr::integer(i64::from(dt.hour())))?;
            record.set("Minutes", Expr::integer(i64::from(dt.minute())))?;
            record.set(
                "Seconds",
                Expr::real(f64::from(dt.second()) + millis as f64 / 1000.0),
            )?;
            record.set("Offset", Expr::integer(i64::from(t.offset_secs)))?;
        }
        Some(Value::RelTime(t)) => {
            let (seconds, minutes) = if t.millis % 1000 == 0 {
                let secs = t.millis / 1000;
                (Expr::integer(secs % 60), secs / 60)
            } else {
                (Expr::real((t.millis % 60_000) as f64 / 1000.0), t.millis / 60_000)
            };
            let hours = minutes / 60;
            record.set("Type", Expr::string("RelativeTime"))?;
            record.set("Days", Expr::integer(hours / 24))?;
            record.set("Hours", Expr::integer(hours % 24))?;
            record.set("Minutes", Expr::integer(minutes % 60))?;
            record.set("Seconds", seconds)?;
        }
        _ => {
            return Err(EvalError::invalid_argument(
                "splitTime",
                format!("{arg} is not a time constant"),
            ));
        }
    }
    Ok(Expr::record(record))
}

/// `formatTime(t, fmt)`: `t` is a timestamp or a count of seconds, shown
/// in its own zone
fn format_time(args: &[ExprRef]) -> EvalResult<ExprRef> {
    let [time, format] = args else {
        return Err(EvalError::arity("formatTime"));
    };
    let time = match time.value() {
        Some(Value::AbsTime(t)) => *t,
        Some(Value::Integer(secs)) => {
            let millis = secs.wrapping_mul(1000);
            AbsTime::new(millis, AbsTime::local_offset_at(millis))
        }
        _ => {
            return Err(EvalError::invalid_argument(
                "formatTime",
                format!("invalid first argument {time}"),
            ));
        }
    };
    let format = string_arg("formatTime", 2, format)?;
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(EvalError::invalid_argument(
            "formatTime",
            format!("invalid format \"{format}\""),
        ));
    }
    let dt = time.to_datetime().ok_or_else(|| {
        EvalError::invalid_argument("formatTime", format!("timestamp {time} out of range"))
    })?;
    Ok(Expr::string(
        dt.format_with_items(StrftimeItems::new(format)).to_string(),
    ))
}

fn seconds_arg(function: &str, args: &[ExprRef]) -> EvalResult<i64> {
    match args {
        [arg] => match arg.value() {
            Some(Value::Integer(secs)) => Ok(*secs),
            _ => Err(EvalError::invalid_argument(
                function,
                format!("invalid argument {arg}"),
            )),
        },
        _ => Err(EvalError::arity(function)),
    }
}

/// `Mon Jan  1 00:00:00 UTC 2024`
fn gmt_time_string(args: &[ExprRef]) -> EvalResult<ExprRef> {
    let secs = seconds_arg("gmtTimeString", args)?;
    let dt = DateTime::<Utc>::from_timestamp(secs, 0).ok_or_else(|| {
        EvalError::invalid_argument("gmtTimeString", format!("{secs} out of range"))
    })?;
    Ok(Expr::string(
        dt.format("%a %b %e %H:%M:%S UTC %Y").to_string(),
    ))
}

/// Like `gmtTimeString` in the local zone, which is shown as an offset
fn local_time_string(args: &[ExprRef]) -> EvalResult<ExprRef> {
    let secs = seconds_arg("localTimeString", args)?;
    let dt = Local.timestamp_opt(secs, 0).earliest().ok_or_else(|| {
        EvalError::invalid_argument("localTimeString", format!("{secs} out of range"))
    })?;
    Ok(Expr::string(dt.format("%a %b %e %H:%M:%S %Z %Y").to_string()))
}
