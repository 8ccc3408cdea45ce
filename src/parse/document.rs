//! JSON document wrapper used by adapters to query fetched responses

use crate::error::{Error, Result};
use serde_json::Value;

/// A parsed response body
///
/// All lookups return [`Error::Parsing`] with the offending path, so adapter
/// accessors can simply `?` them.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Value,
}

impl Document {
    /// Wrap an already parsed value
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    /// Parse raw bytes as JSON
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let root = serde_json::from_slice(bytes)
            .map_err(|e| Error::parsing(format!("Invalid JSON document: {e}")))?;
        Ok(Self { root })
    }

    /// Parse a string as JSON
    pub fn from_text(text: &str) -> Result<Self> {
        Self::from_bytes(text.as_bytes())
    }

    /// The root value
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Consume the document and return the root value
    pub fn into_root(self) -> Value {
        self.root
    }

    /// Look up a value by dotted path, if present and non-null
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        lookup_path(&self.root, path)
    }

    /// Required value at a path
    pub fn value(&self, path: &str) -> Result<&Value> {
        self.lookup(path).ok_or_else(|| missing(path))
    }

    /// Required string at a path
    pub fn str(&self, path: &str) -> Result<&str> {
        string_at(&self.root, path)
    }

    /// Required integer at a path (numeric strings are accepted)
    pub fn i64(&self, path: &str) -> Result<i64> {
        integer_at(&self.root, path)
    }

    /// Required object at a path, as a sub-document
    pub fn object(&self, path: &str) -> Result<Document> {
        match self.value(path)? {
            v @ Value::Object(_) => Ok(Document::new(v.clone())),
            other => Err(wrong_type(path, "object", other)),
        }
    }

    /// Required array at a path
    pub fn array(&self, path: &str) -> Result<&Vec<Value>> {
        match self.value(path)? {
            Value::Array(items) => Ok(items),
            other => Err(wrong_type(path, "array", other)),
        }
    }

    /// Evaluate a JSONPath expression and return all matches
    pub fn select(&self, expression: &str) -> Result<Vec<Value>> {
        use jsonpath_rust::JsonPath;

        let jp = JsonPath::try_from(expression)
            .map_err(|e| Error::parsing(format!("Invalid JSONPath '{expression}': {e}")))?;

        match jp.find(&self.root) {
            Value::Array(matches) => Ok(matches),
            Value::Null => Ok(vec![]),
            other => Ok(vec![other]),
        }
    }
}

impl From<Value> for Document {
    fn from(root: Value) -> Self {
        Self::new(root)
    }
}

// ============================================================================
// Path Helpers
// ============================================================================

/// Resolve a dotted path with optional `[n]` / `[-n]` array indexing
///
/// A leading `$.` is ignored. JSON `null` is treated as absent.
pub fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() || path == "$" {
        return Some(value);
    }

    let mut current = value;
    for part in path.split('.') {
        if let Some(bracket_pos) = part.find('[') {
            let name = &part[..bracket_pos];
            let index_str = part[bracket_pos + 1..].strip_suffix(']')?;

            if !name.is_empty() {
                current = current.get(name)?;
            }

            let index = index_str.parse::<i64>().ok()?;
            let Value::Array(arr) = current else {
                return None;
            };
            #[allow(clippy::cast_possible_wrap)]
            let idx = if index < 0 {
                arr.len() as i64 + index
            } else {
                index
            };
            current = arr.get(usize::try_from(idx).ok()?)?;
        } else {
            current = current.get(part)?;
        }
    }

    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// Required string at a path of an arbitrary value
pub fn string_at<'a>(value: &'a Value, path: &str) -> Result<&'a str> {
    match lookup_path(value, path) {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(wrong_type(path, "string", other)),
        None => Err(missing(path)),
    }
}

/// Required integer at a path of an arbitrary value
pub fn integer_at(value: &Value, path: &str) -> Result<i64> {
    match lookup_path(value, path) {
        Some(Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| Error::parsing(format!("Field '{path}' is not an integer: {n}"))),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map_err(|_| Error::parsing(format!("Field '{path}' is not an integer: {s}"))),
        Some(other) => Err(wrong_type(path, "integer", other)),
        None => Err(missing(path)),
    }
}

fn missing(path: &str) -> Error {
    Error::parsing(format!("Missing field '{path}'"))
}

fn wrong_type(path: &str, expected: &str, found: &Value) -> Error {
    let found = match found {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    Error::parsing(format!("Field '{path}' should be {expected}, found {found}"))
}
