//! Chat-platform webhook payloads (skill request in, reply envelope out).

use serde::{Deserialize, Serialize};

pub const SKILL_RESPONSE_VERSION: &str = "2.0";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRequest {
    pub user_request: Option<UserRequest>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserRequest {
    pub utterance: Option<String>,
}

impl SkillRequest {
    /// The utterance exactly as sent, or `None` when absent or blank.
    pub fn utterance(&self) -> Option<&str> {
        self.user_request
            .as_ref()
            .and_then(|r| r.utterance.as_deref())
            .filter(|u| !u.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyEnvelope {
    pub version: String,
    pub template: ReplyTemplate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyTemplate {
    pub outputs: Vec<ReplyOutput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyOutput {
    pub simple_text: SimpleText,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleText {
    pub text: String,
}

impl ReplyEnvelope {
    pub fn simple_text(text: impl Into<String>) -> Self {
        Self {
            version: SKILL_RESPONSE_VERSION.to_string(),
            template: ReplyTemplate {
                outputs: vec![ReplyOutput {
                    simple_text: SimpleText { text: text.into() },
                }],
            },
        }
    }

    /// Text of the first output, if any.
    pub fn text(&self) -> Option<&str> {
        self.template
            .outputs
            .first()
            .map(|o| o.simple_text.text.as_str())
    }
}
