//! Deep-analysis suggestions produced outside blogport, read leniently.
//!
//! Model output often wraps JSON in code fences or surrounds it with prose.
//! Fences are stripped first; if the remainder still isn't JSON, the outermost
//! object or array is cut out and parsed on its own.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Opening fence with a `json` info string, any case.
static JSON_FENCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| return Regex::new(r"(?i)```json").expect("valid regex"));

/// Accepted top-level shapes.
#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    /// `[ {...}, ... ]`
    List(Vec<SeoDiagnosis>),
    /// `{ "diagnoses": [ ... ] }`
    Wrapped {
        /// The suggestions.
        diagnoses: Vec<SeoDiagnosis>,
    },
}

/// One issue found by deep analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SeoDiagnosis {
    /// What is wrong.
    pub issue: String,
    /// The passage the issue refers to.
    pub original: String,
    /// Replacement text for the passage, if offered.
    pub rewrite: Option<String>,
    /// How to fix it.
    pub suggestion: String,
}

impl From<Payload> for Vec<SeoDiagnosis> {
    fn from(payload: Payload) -> Self {
        return match payload {
            Payload::List(list) | Payload::Wrapped { diagnoses: list } => list,
        };
    }
}

/// Cut the outermost JSON object or array out of surrounding text, choosing
/// whichever bracket opens first.
fn extract_json(text: &str) -> Option<&str> {
    let brace = text.find('{');
    let bracket = text.find('[');

    let (start, close) = match (brace, bracket) {
        (Some(b), Some(a)) if b < a => (b, '}'),
        (Some(b), None) => (b, '}'),
        (_, Some(a)) => (a, ']'),
        (None, None) => return None,
    };
    let end = text.rfind(close)?;
    if end <= start {
        return None;
    }
    return text.get(start..=end);
}

/// Read suggestions from a file.
///
/// # Errors
///
/// Returns `Error::FileNotFound` if the file is missing, `Error::Io` if it
/// cannot be read, or `Error::SuggestionsUnreadable` if no JSON is found.
pub fn load_diagnoses(path: &Path) -> Result<Vec<SeoDiagnosis>, Error> {
    let text = match std::fs::read_to_string(path) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::FileNotFound { path: path.to_path_buf() });
        },
        Err(e) => return Err(Error::Io(e)),
        Ok(text) => text,
    };
    let diagnoses = parse_diagnoses(&text)?;
    tracing::debug!(path = %path.display(), count = diagnoses.len(), "loaded suggestions");
    return Ok(diagnoses);
}

/// Parse suggestions from model output text.
///
/// # Errors
///
/// Returns `Error::SuggestionsUnreadable` if the text is empty or contains
/// no JSON of an accepted shape.
pub fn parse_diagnoses(text: &str) -> Result<Vec<SeoDiagnosis>, Error> {
    if text.trim().is_empty() {
        return Err(Error::SuggestionsUnreadable { reason: "empty input".to_string() });
    }

    let clean = JSON_FENCE_PATTERN.replace_all(text, "").replace("```", "");
    let clean = clean.trim();

    if let Ok(payload) = serde_json::from_str::<Payload>(clean) {
        return Ok(payload.into());
    }

    let Some(extracted) = extract_json(clean) else {
        return Err(Error::SuggestionsUnreadable { reason: "no JSON object or array found".to_string() });
    };
    return serde_json::from_str::<Payload>(extracted)
        .map(Vec::from)
        .map_err(|e| return Error::SuggestionsUnreadable { reason: format!("extracted text is not valid JSON: {e}") });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_array() {
        let list = parse_diagnoses(r#"[{"issue":"a","original":"b","suggestion":"c","rewrite":"d"}]"#).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].rewrite.as_deref(), Some("d"));
    }

    #[test]
    fn parses_wrapped_object_in_fence() {
        let text = "```JSON\n{\"diagnoses\": [{\"issue\":\"x\",\"original\":\"y\",\"suggestion\":\"z\"}, {\"issue\":\"q\"}]}\n```";
        let list = parse_diagnoses(text).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].issue, "q");
        assert!(list[1].rewrite.is_none());
    }

    #[test]
    fn extracts_json_from_prose() {
        let text = "Here is what I found:\n[{\"issue\":\"thin intro\"}]\nHope this helps.";
        let list = parse_diagnoses(text).unwrap();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn object_before_array_wins() {
        assert_eq!(extract_json("x {\"diagnoses\": []} y"), Some("{\"diagnoses\": []}"));
        assert_eq!(extract_json("x [1, {\"a\": 2}] y"), Some("[1, {\"a\": 2}]"));
    }

    #[test]
    fn garbage_is_unreadable() {
        assert!(matches!(parse_diagnoses("no json here"), Err(Error::SuggestionsUnreadable { .. })));
        assert!(matches!(parse_diagnoses("  "), Err(Error::SuggestionsUnreadable { .. })));
        assert!(matches!(parse_diagnoses("{\"other\": 1}"), Err(Error::SuggestionsUnreadable { .. })));
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_diagnoses(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(Error::FileNotFound { .. })));
    }
}
