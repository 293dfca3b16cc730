use std::env::{self, VarError};

use crate::producers::{parse_literal, ProduceError, ValueProducer};
use crate::values::{Value, ValueKind};

/// Reads the value from an environment variable named by the tag option.
#[derive(Debug, Clone, Default)]
pub struct EnvProducer {
    prefix: Option<String>,
}

impl EnvProducer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend `prefix` to every variable name looked up
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// The environment variable read for a tag value of `option`.
    pub fn variable_name(&self, option: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, option),
            None => option.to_string(),
        }
    }
}

impl ValueProducer for EnvProducer {
    fn attempt(&self, kind: &ValueKind, option: &str) -> Result<Option<Value>, ProduceError> {
        let name = self.variable_name(option);
        match env::var(&name) {
            Ok(raw) => parse_literal(kind, &raw).map(Some),
            Err(VarError::NotPresent) => Ok(None),
            Err(VarError::NotUnicode(_)) => Err(ProduceError::Parse {
                input: name,
                kind: kind.clone(),
                reason: "environment variable is not valid unicode".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_reads_set_variable() {
        env::set_var("MODBIND_TEST_ENV_PORT", "8080");
        let value = EnvProducer::new()
            .attempt(&ValueKind::Uint { bits: 16 }, "MODBIND_TEST_ENV_PORT")
            .unwrap();
        assert_eq!(value, Some(Value::Uint(8080)));
        env::remove_var("MODBIND_TEST_ENV_PORT");
    }

    #[test]
    #[serial]
    fn test_unset_variable_is_not_handled() {
        env::remove_var("MODBIND_TEST_ENV_MISSING");
        let value = EnvProducer::new()
            .attempt(&ValueKind::String, "MODBIND_TEST_ENV_MISSING")
            .unwrap();
        assert_eq!(value, None);
    }

    #[test]
    #[serial]
    fn test_prefix_and_parse_failure() {
        env::set_var("APP_DEBUG", "maybe");
        let producer = EnvProducer::new().with_prefix("APP_");
        assert_eq!(producer.variable_name("DEBUG"), "APP_DEBUG");
        assert!(matches!(
            producer.attempt(&ValueKind::Bool, "DEBUG"),
            Err(ProduceError::Parse { .. })
        ));
        env::remove_var("APP_DEBUG");
    }
}
