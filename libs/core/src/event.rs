use serde_json::Value;

use crate::error::HandlerError;

/// CloudEvent envelope delivered by the event router.
///
/// The full original JSON value is retained so the exact serialization of
/// the input can be forwarded to downstream services unchanged.
#[derive(Debug, Clone)]
pub struct CloudEvent {
    pub id: String,
    pub source: String,
    pub subject: String,
    pub data: Value,
    raw: Value,
}

impl CloudEvent {
    /// Parses and validates one raw event payload.
    ///
    /// Fails with `MalformedInput` on invalid JSON and `MissingField` when
    /// any of the four mandatory top-level keys is absent.
    pub fn parse(raw: &str) -> Result<CloudEvent, HandlerError> {
        let value: Value = serde_json::from_str(raw)?;
        let id = required_str(&value, "id")?;
        let source = required_str(&value, "source")?;
        let subject = required_str(&value, "subject")?;
        let data = walk(&value, &["data"])?.clone();
        Ok(CloudEvent {
            id,
            source,
            subject,
            data,
            raw: value,
        })
    }

    /// Exact JSON serialization of the original event.
    pub fn to_json(&self) -> String {
        self.raw.to_string()
    }

    /// Extracts a string at a nested path under the top-level `data` key.
    pub fn data_str(&self, path: &[&str]) -> Result<String, HandlerError> {
        let mut full = Vec::with_capacity(path.len() + 1);
        full.push("data");
        full.extend_from_slice(path);
        let dotted = full.join(".");
        walk(&self.raw, &full)?
            .as_str()
            .map(str::to_owned)
            .ok_or(HandlerError::MissingField(dotted))
    }
}

/// Walks `path` through nested JSON objects.
///
/// A missing key reports the dotted path down to that key; a non-object
/// intermediate reports the path that could not be traversed.
fn walk<'a>(value: &'a Value, path: &[&str]) -> Result<&'a Value, HandlerError> {
    let mut current = value;
    for (depth, key) in path.iter().enumerate() {
        let obj = current.as_object().ok_or_else(|| {
            let walked = if depth == 0 {
                path.join(".")
            } else {
                path[..depth].join(".")
            };
            HandlerError::NotIterable(walked)
        })?;
        current = obj
            .get(*key)
            .ok_or_else(|| HandlerError::MissingField(path[..=depth].join(".")))?;
    }
    Ok(current)
}

fn required_str(value: &Value, key: &str) -> Result<String, HandlerError> {
    walk(value, &[key])?
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| HandlerError::MissingField(key.to_string()))
}
