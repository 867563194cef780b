use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Error body returned by the blog API on non-success responses.
///
/// Servers answer either with a single `message` or with a map of field
/// names to messages (`{"errors": {"email": ["has already been taken"]}}`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ApiError {
    pub fn into_message(self) -> Option<String> {
        if let Some(message) = self.message.filter(|m| !m.trim().is_empty()) {
            return Some(message);
        }

        let parts: Vec<String> = self
            .errors
            .into_iter()
            .flat_map(|(field, messages)| {
                messages
                    .into_iter()
                    .map(move |message| format!("{field} {message}"))
            })
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join("; "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_top_level_message() {
        let body: ApiError =
            serde_json::from_str(r#"{"message":"Not found","errors":{"x":["y"]}}"#).expect("json");
        assert_eq!(body.into_message().as_deref(), Some("Not found"));
    }

    #[test]
    fn flattens_field_errors_in_field_order() {
        let body: ApiError = serde_json::from_str(
            r#"{"errors":{"username":["is taken"],"email":["is invalid","is taken"]}}"#,
        )
        .expect("json");
        assert_eq!(
            body.into_message().as_deref(),
            Some("email is invalid; email is taken; username is taken")
        );
    }

    #[test]
    fn empty_body_has_no_message() {
        assert_eq!(ApiError::default().into_message(), None);
    }
}
