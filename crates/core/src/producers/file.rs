use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::modules::parse_tag_value;
use crate::producers::{parse_literal, ProduceError, ValueProducer};
use crate::values::{Value, ValueKind};

/// Reads the value from a file named by the tag option.
///
/// The option is `path[,format]`. Without a format the file extension is used. `txt` files
/// are parsed as a literal of the field's kind, `json` and `yaml` files as documents.
#[derive(Debug, Clone, Default)]
pub struct FileProducer {
    root: Option<PathBuf>,
}

impl FileProducer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative paths against `root` instead of the working directory
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Resolve `path` against the configured root; absolute paths are kept.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl ValueProducer for FileProducer {
    fn attempt(&self, kind: &ValueKind, option: &str) -> Result<Option<Value>, ProduceError> {
        let (path, options) = parse_tag_value(option);
        let path = self.resolve(path);

        let format = match options.first() {
            Some(format) => format.to_string(),
            None => match path.extension().and_then(|ext| ext.to_str()) {
                Some(ext) if !ext.is_empty() => ext.to_string(),
                _ => return Err(ProduceError::MissingFormat { path }),
            },
        };

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(ProduceError::Io { path, source }),
        };

        let value = match format.as_str() {
            "txt" => match kind {
                ValueKind::Document => Value::Document(serde_json::Value::String(contents)),
                _ => parse_literal(kind, &contents)?,
            },
            "json" => {
                let doc = serde_json::from_str(&contents).map_err(|e| ProduceError::Decode {
                    path: path.clone(),
                    format: format.clone(),
                    reason: e.to_string(),
                })?;
                shape_document(kind, doc)
            }
            "yaml" | "yml" => {
                let doc = serde_yaml::from_str(&contents).map_err(|e| ProduceError::Decode {
                    path: path.clone(),
                    format: format.clone(),
                    reason: e.to_string(),
                })?;
                shape_document(kind, doc)
            }
            _ => return Err(ProduceError::UnknownFormat { path, format }),
        };
        Ok(Some(value))
    }
}

/// Function fields receive a function returning the decoded document.
fn shape_document(kind: &ValueKind, doc: serde_json::Value) -> Value {
    match kind {
        ValueKind::Function(output) => Value::Function(Box::new(shape_document(output, doc))),
        _ => Value::Document(doc),
    }
}
