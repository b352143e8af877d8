//! Built-in validators. Each one is independent and can be mixed freely in a
//! [`ValidatorList`](super::ValidatorList); none of them implies `required`.

use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde_json::Value;

use super::validation::{FieldError, Rule, ValidatorRef};

pub const NUMBER_MESSAGE: &str = "Please input number only";

static NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]*\.?[0-9]*$").expect("number pattern is valid"));
static INTEGER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("integer pattern is valid"));
static PASSWORD_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z_]{6,20}$").expect("password pattern is valid"));
static ALL_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("digits pattern is valid"));
static ALL_LETTERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]+$").expect("letters pattern is valid"));

fn check(
    message: impl Into<Arc<str>>,
    passes: impl Fn(Option<&Value>) -> bool + Send + Sync + 'static,
) -> ValidatorRef {
    let error = FieldError::new(message);
    Arc::new(move |_: &Rule, value: Option<&Value>| {
        if passes(value) {
            Ok(())
        } else {
            Err(error.clone())
        }
    })
}

/// Fails on a missing value, `null`, a blank string, an empty array, or
/// `false` (an unchecked checkbox).
pub fn required(message: impl Into<Arc<str>>) -> ValidatorRef {
    check(message, |value| match value {
        None | Some(Value::Null) => false,
        Some(Value::String(text)) => !text.trim().is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Bool(checked)) => *checked,
        Some(_) => true,
    })
}

pub fn number() -> ValidatorRef {
    number_with_message(NUMBER_MESSAGE)
}

/// Accepts the empty string, JSON numbers, and strings made of an optional
/// minus sign, digits and at most one decimal point.
pub fn number_with_message(message: impl Into<Arc<str>>) -> ValidatorRef {
    check(message, |value| match value {
        Some(Value::String(text)) => NUMBER_PATTERN.is_match(text),
        Some(Value::Number(_)) => true,
        _ => false,
    })
}

/// Accepts the empty string and non-negative whole numbers.
pub fn integer(message: impl Into<Arc<str>>) -> ValidatorRef {
    check(message, |value| match value {
        Some(Value::String(text)) => text.is_empty() || INTEGER_PATTERN.is_match(text),
        Some(Value::Number(number)) => {
            number.is_u64()
                || number
                    .as_f64()
                    .is_some_and(|float| float >= 0.0 && float.fract() == 0.0)
        }
        _ => false,
    })
}

pub fn min(bound: impl Into<Decimal>, message: impl Into<Arc<str>>) -> ValidatorRef {
    range(bound.into(), message, false, |value, bound| value > bound)
}

pub fn min_inclusive(bound: impl Into<Decimal>, message: impl Into<Arc<str>>) -> ValidatorRef {
    range(bound.into(), message, true, |value, bound| value > bound)
}

pub fn max(bound: impl Into<Decimal>, message: impl Into<Arc<str>>) -> ValidatorRef {
    range(bound.into(), message, false, |value, bound| value < bound)
}

pub fn max_inclusive(bound: impl Into<Decimal>, message: impl Into<Arc<str>>) -> ValidatorRef {
    range(bound.into(), message, true, |value, bound| value < bound)
}

fn range(
    bound: Decimal,
    message: impl Into<Arc<str>>,
    inclusive: bool,
    compare: fn(Decimal, Decimal) -> bool,
) -> ValidatorRef {
    check(message, move |value| match numeric(value) {
        None => true,
        Some(number) => compare(number, bound) || (inclusive && number == bound),
    })
}

fn numeric(value: Option<&Value>) -> Option<Decimal> {
    match value? {
        Value::Number(number) => number
            .as_i64()
            .map(Decimal::from)
            .or_else(|| number.as_u64().map(Decimal::from))
            .or_else(|| number.as_f64().and_then(Decimal::from_f64)),
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            Decimal::from_str(text)
                .or_else(|_| Decimal::from_scientific(text))
                .ok()
        }
        _ => None,
    }
}

pub fn min_length(bound: usize, message: impl Into<Arc<str>>) -> ValidatorRef {
    check(message, move |value| {
        length_of(value).is_none_or(|length| length >= bound)
    })
}

pub fn max_length(bound: usize, message: impl Into<Arc<str>>) -> ValidatorRef {
    check(message, move |value| {
        length_of(value).is_none_or(|length| length <= bound)
    })
}

fn length_of(value: Option<&Value>) -> Option<usize> {
    match value? {
        Value::String(text) => Some(text.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

/// 6 to 20 characters of letters, digits and underscore, neither all letters
/// nor all digits.
pub fn password_format(message: impl Into<Arc<str>>) -> ValidatorRef {
    check(message, |value| match value {
        Some(Value::String(text)) => {
            PASSWORD_CHARSET.is_match(text)
                && !ALL_DIGITS.is_match(text)
                && !ALL_LETTERS.is_match(text)
        }
        _ => false,
    })
}

/// Passes when the value equals `expected`, compared by value. `expected` is
/// captured when the validator is built, typically from a sibling field.
pub fn should_be_equal(
    expected: impl Into<Option<Value>>,
    message: impl Into<Arc<str>>,
) -> ValidatorRef {
    let expected = expected.into();
    check(message, move |value| value == expected.as_ref())
}

pub fn should_not_be_equal(
    expected: impl Into<Option<Value>>,
    message: impl Into<Arc<str>>,
) -> ValidatorRef {
    let expected = expected.into();
    check(message, move |value| value != expected.as_ref())
}
