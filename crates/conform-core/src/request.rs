//! Request model and projection from the decoded value tree

use conform_codec::Value;

use crate::error::{Error, Result};

/// One declared desired-state entry for a path.
///
/// A dimension with an absent value is never checked. `path` may be empty
/// in a decoded entry; the driver skips such entries without counting them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSpec {
    /// Target path.
    pub path: String,
    /// Required permission bits as an octal string, e.g. `"0644"`.
    pub mode: Option<String>,
    /// Required owning user name.
    pub owner: Option<String>,
    /// Required owning group name.
    pub group: Option<String>,
    /// Required literal content.
    pub content: Option<String>,
    /// Path whose current bytes override `content` when it exists.
    pub content_source: Option<String>,
}

/// A fully decoded run request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    /// Audit only; never mutate the filesystem.
    pub check_only: bool,
    /// Normalized, order-preserving file-spec sequence.
    pub files: Vec<FileSpec>,
}

impl Request {
    /// Decode request text into a normalized request.
    ///
    /// # Errors
    ///
    /// Returns an error when the text does not decode or does not have the
    /// shape of a run request. Nothing on the filesystem has been touched
    /// at that point.
    pub fn decode(input: &str) -> Result<Self> {
        let value = conform_codec::parse(input)?;
        Self::from_value(&value)
    }

    /// Project a decoded value tree into a request.
    ///
    /// The `files` collection may be an array of file-spec objects or an
    /// object mapping arbitrary keys to file-spec objects (values kept in
    /// key order, keys discarded). Both shapes normalize to the same
    /// ordered sequence; the original shape is not observable past this
    /// point.
    pub fn from_value(value: &Value) -> Result<Self> {
        if value.as_object().is_none() {
            return Err(Error::invalid_request(format!(
                "top level must be an object, got {}",
                value.type_name()
            )));
        }

        let check_only = match value.get("check_only") {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s == "true",
            _ => false,
        };

        let files = match value.get("files") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .map(FileSpec::from_value)
                .collect::<Result<Vec<_>>>()?,
            Some(Value::Object(members)) => members
                .iter()
                .map(|(_, entry)| FileSpec::from_value(entry))
                .collect::<Result<Vec<_>>>()?,
            Some(other) => {
                return Err(Error::invalid_request(format!(
                    "\"files\" must be an array or an object, got {}",
                    other.type_name()
                )));
            }
        };

        Ok(Self { check_only, files })
    }
}

impl FileSpec {
    fn from_value(value: &Value) -> Result<Self> {
        if value.as_object().is_none() {
            return Err(Error::invalid_request(format!(
                "file entries must be objects, got {}",
                value.type_name()
            )));
        }
        Ok(Self {
            path: scalar_string(value.get("path")).unwrap_or_default(),
            mode: scalar_string(value.get("mode")),
            owner: scalar_string(value.get("owner")),
            group: scalar_string(value.get("group")),
            content: scalar_string(value.get("content")),
            content_source: scalar_string(value.get("content_source")),
        })
    }
}

/// Coerce a scalar member to a non-empty string.
///
/// Strings are used as-is and integers render in decimal, so `"mode": 644`
/// behaves like `"mode": "644"`. Everything else counts as absent, and so
/// does the empty string: an empty value is never checked.
fn scalar_string(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Int(n)) => Some(n.to_string()),
        _ => None,
    }
}
