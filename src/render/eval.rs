//! Expression evaluation against a render scope.

use std::cmp::Ordering;

use serde_json::{Number, Value};

use crate::render::context::Scope;
use crate::render::value::{compare, is_truthy, loose_equals, strict_equals};
use crate::render::{RenderError, RenderResult};
use crate::template::{BinOp, Expr};

/// Evaluate `expr` in `scope`.
pub fn evaluate(expr: &Expr, scope: &Scope<'_>) -> RenderResult<Value> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Var(name) => scope
            .lookup(name)
            .cloned()
            .ok_or_else(|| RenderError::Undefined { name: name.clone() }),
        Expr::Member(object, property) => {
            let target = evaluate(object, scope)?;
            member(&target, property, object)
        }
        Expr::Index(object, index) => {
            let target = evaluate(object, scope)?;
            let key = evaluate(index, scope)?;
            match (&target, &key) {
                (Value::Null, _) => Err(RenderError::NullAccess {
                    expr: object.to_string(),
                    property: crate::render::value::display(&key),
                }),
                (Value::Array(items), Value::Number(n)) => Ok(n
                    .as_u64()
                    .and_then(|i| items.get(i as usize))
                    .cloned()
                    .unwrap_or(Value::Null)),
                (Value::String(s), Value::Number(n)) => Ok(n
                    .as_u64()
                    .and_then(|i| s.chars().nth(i as usize))
                    .map(|c| Value::String(c.to_string()))
                    .unwrap_or(Value::Null)),
                (_, Value::String(name)) => member(&target, name, object),
                _ => Ok(Value::Null),
            }
        }
        Expr::Not(inner) => Ok(Value::Bool(!is_truthy(&evaluate(inner, scope)?))),
        Expr::Neg(inner) => {
            let value = evaluate(inner, scope)?;
            Ok(value
                .as_f64()
                .and_then(|f| Number::from_f64(-f))
                .map(Value::Number)
                .unwrap_or(Value::Null))
        }
        Expr::Binary(left, op, right) => binary(left, *op, right, scope),
    }
}

fn member(target: &Value, property: &str, object: &Expr) -> RenderResult<Value> {
    match target {
        Value::Null => Err(RenderError::NullAccess {
            expr: object.to_string(),
            property: property.to_string(),
        }),
        Value::Object(map) => Ok(map.get(property).cloned().unwrap_or(Value::Null)),
        Value::Array(items) if property == "length" => Ok(Value::from(items.len())),
        Value::String(s) if property == "length" => Ok(Value::from(s.chars().count())),
        _ => Ok(Value::Null),
    }
}

fn binary(left: &Expr, op: BinOp, right: &Expr, scope: &Scope<'_>) -> RenderResult<Value> {
    let lhs = evaluate(left, scope)?;

    // Logical operators short-circuit and yield an operand, not a bool.
    match op {
        BinOp::And if !is_truthy(&lhs) => return Ok(lhs),
        BinOp::Or if is_truthy(&lhs) => return Ok(lhs),
        BinOp::And | BinOp::Or => return evaluate(right, scope),
        _ => {}
    }

    let rhs = evaluate(right, scope)?;
    let ordering = compare(&lhs, &rhs);
    let result = match op {
        BinOp::Eq => loose_equals(&lhs, &rhs),
        BinOp::Ne => !loose_equals(&lhs, &rhs),
        BinOp::StrictEq => strict_equals(&lhs, &rhs),
        BinOp::StrictNe => !strict_equals(&lhs, &rhs),
        BinOp::Lt => ordering == Some(Ordering::Less),
        BinOp::Le => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
        BinOp::Gt => ordering == Some(Ordering::Greater),
        BinOp::Ge => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
        BinOp::And | BinOp::Or => unreachable!("logical operators handled above"),
    };
    Ok(Value::Bool(result))
}
