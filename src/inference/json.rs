use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;

lazy_static! {
    // Greedy: first `{` through last `}`.
    static ref OBJECT_SPAN: Regex = Regex::new(r"(?s)\{.*\}").unwrap();
}

/// Outcome of pulling a JSON object out of free-form model output.
#[derive(Debug, PartialEq)]
pub enum JsonExtraction<T> {
    /// The whole text was a JSON object.
    Strict(T),
    /// The object was recovered from a brace-delimited span inside the text.
    Extracted(T),
    Failed(String),
}

impl<T> JsonExtraction<T> {
    pub fn into_result(self) -> anyhow::Result<T> {
        match self {
            JsonExtraction::Strict(v) | JsonExtraction::Extracted(v) => Ok(v),
            JsonExtraction::Failed(reason) => Err(anyhow::anyhow!(reason)),
        }
    }
}

pub fn extract_object<T: DeserializeOwned>(text: &str) -> JsonExtraction<T> {
    let strict_err = match parse_object(text) {
        Ok(obj) => return decode(obj, JsonExtraction::Strict),
        Err(e) => e,
    };

    let Some(span) = OBJECT_SPAN.find(text) else {
        return JsonExtraction::Failed(format!("no JSON object in response ({strict_err})"));
    };
    match parse_object(span.as_str()) {
        Ok(obj) => decode(obj, JsonExtraction::Extracted),
        Err(e) => JsonExtraction::Failed(format!("extracted span is not a JSON object: {e}")),
    }
}

fn parse_object(text: &str) -> Result<Value, String> {
    match serde_json::from_str::<Value>(text.trim()) {
        Ok(v @ Value::Object(_)) => Ok(v),
        Ok(other) => Err(format!("expected object, got {}", kind(&other))),
        Err(e) => Err(e.to_string()),
    }
}

fn decode<T: DeserializeOwned>(obj: Value, wrap: fn(T) -> JsonExtraction<T>) -> JsonExtraction<T> {
    match serde_json::from_value(obj) {
        Ok(v) => wrap(v),
        Err(e) => JsonExtraction::Failed(format!("unexpected object shape: {e}")),
    }
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn whole_text_object_is_strict() {
        let got: JsonExtraction<Value> = extract_object(r#"{"cheek_lift": 5}"#);
        assert_eq!(got, JsonExtraction::Strict(json!({"cheek_lift": 5})));
    }

    #[test]
    fn object_inside_noise_is_extracted() {
        let got: JsonExtraction<Value> = extract_object("prefix noise {\"cheek_lift\":5} suffix");
        assert_eq!(got, JsonExtraction::Extracted(json!({"cheek_lift": 5})));
    }

    #[test]
    fn fenced_multiline_object_is_extracted() {
        let text = "```json\n{\n  \"a\": 1,\n  \"b\": {\"c\": 2}\n}\n```";
        let got: JsonExtraction<Value> = extract_object(text);
        assert_eq!(got, JsonExtraction::Extracted(json!({"a": 1, "b": {"c": 2}})));
    }

    #[test]
    fn top_level_array_is_not_accepted() {
        let got: JsonExtraction<Value> = extract_object("[1, 2, 3]");
        assert!(matches!(got, JsonExtraction::Failed(_)));
    }

    #[test]
    fn text_without_braces_fails() {
        let got: JsonExtraction<Value> = extract_object("I cannot analyze this image.");
        assert!(matches!(got, JsonExtraction::Failed(_)));
        assert!(got.into_result().is_err());
    }

    #[test]
    fn broken_span_fails() {
        let got: JsonExtraction<Value> = extract_object("here: {not json} and {also not}");
        assert!(matches!(got, JsonExtraction::Failed(_)));
    }
}
