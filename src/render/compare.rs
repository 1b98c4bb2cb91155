use super::value::Value;
use crate::compile::Operator;
use std::{borrow::Cow, cmp::Ordering, ptr};

/// Apply the [`Operator`] to the two [`Value`] instances.
///
/// Every combination of types produces a value, no operator fails.
/// The logical operators return one of their operands, the caller is
/// responsible for skipping the right operand when it is not needed.
pub fn compare_values<'a>(left: Value<'a>, operator: Operator, right: Value<'a>) -> Value<'a> {
    match operator {
        Operator::Add => add(left, right),
        Operator::Subtract => Value::Number(left.to_number() - right.to_number()),
        Operator::Multiply => Value::Number(left.to_number() * right.to_number()),
        Operator::Divide => Value::Number(left.to_number() / right.to_number()),
        Operator::Remainder => Value::Number(left.to_number() % right.to_number()),
        Operator::Greater => Value::Bool(relational(left, right) == Some(Ordering::Greater)),
        Operator::Lesser => Value::Bool(relational(left, right) == Some(Ordering::Less)),
        Operator::GreaterOrEqual => Value::Bool(matches!(
            relational(left, right),
            Some(Ordering::Greater | Ordering::Equal)
        )),
        Operator::LesserOrEqual => Value::Bool(matches!(
            relational(left, right),
            Some(Ordering::Less | Ordering::Equal)
        )),
        Operator::Equal => Value::Bool(loose_equals(&left, &right)),
        Operator::NotEqual => Value::Bool(!loose_equals(&left, &right)),
        Operator::StrictEqual => Value::Bool(strict_equals(&left, &right)),
        Operator::StrictNotEqual => Value::Bool(!strict_equals(&left, &right)),
        Operator::And => {
            if left.is_truthy() {
                right
            } else {
                left
            }
        }
        Operator::Or => {
            if left.is_truthy() {
                left
            } else {
                right
            }
        }
        Operator::Nullish => {
            if left.is_nullish() {
                right
            } else {
                left
            }
        }
    }
}

/// Concatenate when either side is a string after conversion to a
/// primitive, otherwise add as numbers.
fn add<'a>(left: Value<'a>, right: Value<'a>) -> Value<'a> {
    let left = left.to_primitive();
    let right = right.to_primitive();

    match (&left, &right) {
        (Value::String(_), _) | (_, Value::String(_)) => {
            let mut text = left.to_text().into_owned();
            text.push_str(&right.to_text());
            Value::String(Cow::Owned(text))
        }
        _ => Value::Number(left.to_number() + right.to_number()),
    }
}

/// Order two values.
///
/// Strings are ordered by their UTF-16 code units, everything else is
/// ordered as numbers. Returns `None` when either number is `NaN`.
fn relational(left: Value<'_>, right: Value<'_>) -> Option<Ordering> {
    let left = left.to_primitive();
    let right = right.to_primitive();

    match (&left, &right) {
        (Value::String(left), Value::String(right)) => {
            Some(left.encode_utf16().cmp(right.encode_utf16()))
        }
        _ => left.to_number().partial_cmp(&right.to_number()),
    }
}

/// Return true if the values are the same type and the same value.
///
/// Arrays and objects are only equal to themselves.
pub fn strict_equals(left: &Value<'_>, right: &Value<'_>) -> bool {
    match (left, right) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(left), Value::Bool(right)) => left == right,
        (Value::Number(left), Value::Number(right)) => left == right,
        (Value::String(left), Value::String(right)) => left == right,
        (Value::Array(left), Value::Array(right)) => ptr::eq(*left, *right),
        (Value::Object(left), Value::Object(right)) => ptr::eq(*left, *right),
        _ => false,
    }
}

/// Return true if the values are equal after converting between types.
///
/// `null` and `undefined` are only equal to each other.
pub fn loose_equals(left: &Value<'_>, right: &Value<'_>) -> bool {
    if std::mem::discriminant(left) == std::mem::discriminant(right) {
        return strict_equals(left, right);
    }

    match (left, right) {
        (Value::Undefined | Value::Null, other) | (other, Value::Undefined | Value::Null) => {
            other.is_nullish()
        }
        (Value::Number(number), other @ Value::String(_))
        | (other @ Value::String(_), Value::Number(number)) => *number == other.to_number(),
        (Value::Bool(_), other) => loose_equals(&Value::Number(left.to_number()), other),
        (other, Value::Bool(_)) => loose_equals(other, &Value::Number(right.to_number())),
        (Value::Array(_) | Value::Object(_), Value::Number(_) | Value::String(_)) => {
            loose_equals(&Value::String(left.to_text()), right)
        }
        (Value::Number(_) | Value::String(_), Value::Array(_) | Value::Object(_)) => {
            loose_equals(left, &Value::String(right.to_text()))
        }
        _ => false,
    }
}
