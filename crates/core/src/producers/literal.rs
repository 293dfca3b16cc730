use crate::producers::{ProduceError, ValueProducer};
use crate::values::{Value, ValueKind};

/// Parses the tag option itself as the value.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralProducer;

impl ValueProducer for LiteralProducer {
    fn attempt(&self, kind: &ValueKind, option: &str) -> Result<Option<Value>, ProduceError> {
        parse_literal(kind, option).map(Some)
    }
}

/// Parse `input` as a literal of the given kind.
///
/// Sequences are comma separated and report every element that fails. Functions return the
/// parsed literal on every call. Documents are JSON.
pub fn parse_literal(kind: &ValueKind, input: &str) -> Result<Value, ProduceError> {
    match kind {
        ValueKind::String => Ok(Value::String(input.to_string())),
        ValueKind::Bool => parse_bool(input).map(Value::Bool),
        ValueKind::Int { bits } => parse_int(input, *bits, kind).map(Value::Int),
        ValueKind::Uint { bits } => parse_uint(input, *bits, kind).map(Value::Uint),
        ValueKind::Float { bits } => parse_float(input, *bits, kind).map(Value::Float),
        ValueKind::Sequence(element) => parse_sequence(element, input),
        ValueKind::Function(output) => {
            parse_literal(output, input).map(|value| Value::Function(Box::new(value)))
        }
        ValueKind::Document => serde_json::from_str(input)
            .map(Value::Document)
            .map_err(|e| parse_error(input, kind, e)),
        ValueKind::Opaque(_) => Err(ProduceError::UnsupportedKind { kind: kind.clone() }),
    }
}

fn parse_error(input: &str, kind: &ValueKind, reason: impl ToString) -> ProduceError {
    ProduceError::Parse {
        input: input.to_string(),
        kind: kind.clone(),
        reason: reason.to_string(),
    }
}

fn parse_bool(input: &str) -> Result<bool, ProduceError> {
    match input {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(parse_error(input, &ValueKind::Bool, "invalid syntax")),
    }
}

fn parse_int(input: &str, bits: u32, kind: &ValueKind) -> Result<i64, ProduceError> {
    let value: i64 = input.parse().map_err(|e| parse_error(input, kind, e))?;
    if bits < 64 {
        let max = (1i64 << (bits - 1)) - 1;
        let min = -(1i64 << (bits - 1));
        if value < min || value > max {
            return Err(ProduceError::OutOfRange {
                value: input.to_string(),
                kind: kind.clone(),
            });
        }
    }
    Ok(value)
}

fn parse_uint(input: &str, bits: u32, kind: &ValueKind) -> Result<u64, ProduceError> {
    let value: u64 = input.parse().map_err(|e| parse_error(input, kind, e))?;
    if bits < 64 && value >> bits != 0 {
        return Err(ProduceError::OutOfRange {
            value: input.to_string(),
            kind: kind.clone(),
        });
    }
    Ok(value)
}

fn parse_float(input: &str, bits: u32, kind: &ValueKind) -> Result<f64, ProduceError> {
    let value: f64 = input.parse().map_err(|e| parse_error(input, kind, e))?;
    if bits == 32 && value.is_finite() && value.abs() > f32::MAX as f64 {
        return Err(ProduceError::OutOfRange {
            value: input.to_string(),
            kind: kind.clone(),
        });
    }
    Ok(value)
}

fn parse_sequence(element: &ValueKind, input: &str) -> Result<Value, ProduceError> {
    if input.is_empty() {
        return Ok(Value::Sequence(Vec::new()));
    }

    let mut items = Vec::new();
    let mut failures = Vec::new();
    for (i, part) in input.split(',').enumerate() {
        match parse_literal(element, part) {
            Ok(item) => items.push(item),
            Err(e) => failures.push(format!("element {} - {}", i, e)),
        }
    }

    if !failures.is_empty() {
        return Err(ProduceError::Sequence { failures });
    }
    Ok(Value::Sequence(items))
}
