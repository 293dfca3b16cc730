use std::collections::HashMap;

use clap::ArgMatches;

use crate::producers::{parse_literal, ProduceError, ValueProducer};
use crate::values::{Value, ValueKind};

/// Reads the value of a command-line flag captured from parsed arguments.
///
/// Multiple occurrences of a flag are joined with commas, so they parse as a sequence.
#[derive(Debug, Clone, Default)]
pub struct FlagProducer {
    values: HashMap<String, String>,
}

impl FlagProducer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture every argument present in `matches`, including defaulted ones.
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let mut values = HashMap::new();
        for id in matches.ids() {
            if let Ok(Some(raw)) = matches.try_get_raw(id.as_str()) {
                let joined = raw
                    .map(|v| v.to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join(",");
                values.insert(id.as_str().to_string(), joined);
            }
        }
        Self { values }
    }

    /// Add or replace one flag value
    pub fn with_flag(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Raw value captured for `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ValueProducer for FlagProducer {
    fn attempt(&self, kind: &ValueKind, option: &str) -> Result<Option<Value>, ProduceError> {
        match self.get(option) {
            Some(raw) if !raw.is_empty() => parse_literal(kind, raw).map(Some),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{Arg, ArgAction, Command};

    fn command() -> Command {
        Command::new("app")
            .arg(Arg::new("name").long("name"))
            .arg(Arg::new("port").long("port").default_value("80"))
            .arg(Arg::new("tag").long("tag").action(ArgAction::Append))
            .arg(Arg::new("empty").long("empty"))
    }

    #[test]
    fn test_captures_parsed_arguments() {
        let matches = command()
            .try_get_matches_from(["app", "--name", "svc", "--tag", "a", "--tag", "b"])
            .unwrap();
        let flags = FlagProducer::from_matches(&matches);

        assert_eq!(flags.get("name"), Some("svc"));
        assert_eq!(flags.get("port"), Some("80"));
        assert_eq!(flags.get("tag"), Some("a,b"));
        assert_eq!(flags.get("empty"), None);

        assert_eq!(
            flags.attempt(&ValueKind::Uint { bits: 16 }, "port").unwrap(),
            Some(Value::Uint(80))
        );
        assert_eq!(
            flags
                .attempt(&ValueKind::sequence_of(ValueKind::String), "tag")
                .unwrap(),
            Some(Value::Sequence(vec![
                Value::String("a".into()),
                Value::String("b".into())
            ]))
        );
    }

    #[test]
    fn test_absent_or_empty_flag_is_not_handled() {
        let flags = FlagProducer::new().with_flag("blank", "");
        assert_eq!(flags.attempt(&ValueKind::String, "blank").unwrap(), None);
        assert_eq!(flags.attempt(&ValueKind::String, "missing").unwrap(), None);
    }
}
