//! Dotted JSON path extraction: `data.name`, `items[0].id`, `[1]`, `list[-1]`.
//!
//! An empty path (or `$`) addresses the root.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum JsonPathError {
    #[error("invalid path `{path}`: {reason}")]
    Syntax { path: String, reason: String },

    #[error("no value at path `{0}`")]
    Missing(String),

    #[error("value at path `{path}` is not {expected}")]
    Type { path: String, expected: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Key(String),
    Index(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPath {
    raw: String,
    steps: Vec<Step>,
}

impl JsonPath {
    pub fn parse(path: &str) -> Result<Self, JsonPathError> {
        let syntax = |reason: &str| JsonPathError::Syntax {
            path: path.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = path.trim();
        let body = trimmed.strip_prefix('$').unwrap_or(trimmed);
        let body = body.strip_prefix('.').unwrap_or(body);

        let mut steps = Vec::new();
        if body.is_empty() {
            return Ok(Self {
                raw: path.to_string(),
                steps,
            });
        }

        for segment in body.split('.') {
            if segment.is_empty() {
                return Err(syntax("empty segment"));
            }
            let (key, mut rest) = match segment.find('[') {
                Some(pos) => segment.split_at(pos),
                None => (segment, ""),
            };
            if !key.is_empty() {
                steps.push(Step::Key(key.to_string()));
            }
            while !rest.is_empty() {
                let close = rest.find(']').ok_or_else(|| syntax("unclosed `[`"))?;
                let inner = rest
                    .get(1..close)
                    .ok_or_else(|| syntax("malformed index"))?;
                let index: i64 = inner
                    .trim()
                    .parse()
                    .map_err(|_| syntax("index must be an integer"))?;
                steps.push(Step::Index(index));
                rest = &rest[close + 1..];
                if !rest.is_empty() && !rest.starts_with('[') {
                    return Err(syntax("unexpected text after `]`"));
                }
            }
        }

        Ok(Self {
            raw: path.to_string(),
            steps,
        })
    }

    pub fn eval<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.steps.iter().try_fold(root, |current, step| match step {
            Step::Key(k) => current.as_object()?.get(k),
            Step::Index(i) => {
                let arr = current.as_array()?;
                let idx = if *i < 0 {
                    arr.len().checked_sub(i.unsigned_abs() as usize)?
                } else {
                    *i as usize
                };
                arr.get(idx)
            }
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Typed accessors over a parsed JSON document.
#[derive(Debug, Clone)]
pub struct JsonView {
    root: Value,
}

impl JsonView {
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn value(&self, path: &str) -> Result<&Value, JsonPathError> {
        JsonPath::parse(path)?
            .eval(&self.root)
            .ok_or_else(|| JsonPathError::Missing(path.to_string()))
    }

    /// Strings come back as-is; numbers and booleans are stringified.
    pub fn get_string(&self, path: &str) -> Result<String, JsonPathError> {
        match self.value(path)? {
            Value::String(s) => Ok(s.clone()),
            v @ (Value::Number(_) | Value::Bool(_)) => Ok(v.to_string()),
            _ => Err(JsonPathError::Type {
                path: path.to_string(),
                expected: "a scalar",
            }),
        }
    }

    /// Integers, or strings holding an integer.
    pub fn get_int(&self, path: &str) -> Result<i64, JsonPathError> {
        let value = self.value(path)?;
        value
            .as_i64()
            .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
            .ok_or_else(|| JsonPathError::Type {
                path: path.to_string(),
                expected: "an integer",
            })
    }

    pub fn get_bool(&self, path: &str) -> Result<bool, JsonPathError> {
        let value = self.value(path)?;
        value
            .as_bool()
            .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
            .ok_or_else(|| JsonPathError::Type {
                path: path.to_string(),
                expected: "a boolean",
            })
    }

    pub fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, JsonPathError> {
        serde_json::from_value(self.value(path)?.clone()).map_err(|_| JsonPathError::Type {
            path: path.to_string(),
            expected: std::any::type_name::<T>(),
        })
    }
}
