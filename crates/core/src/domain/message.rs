use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One turn of the conversation. Content is trimmed on construction; `new`
/// additionally rejects blank content, which the role shorthands do not.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Option<Self> {
        let content = content.into().trim().to_string();
        if content.is_empty() {
            return None;
        }
        Some(Self { role, content })
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into().trim().to_string() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into().trim().to_string() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into().trim().to_string() }
    }
}

/// Wire shape accepted at the request boundary: either a bare `message`
/// string or an explicit `messages` history. Unknown roles and blank
/// contents are dropped during coercion rather than rejected.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct IncomingBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub messages: Option<Vec<IncomingMessage>>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct IncomingMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl IncomingBody {
    /// Coerce the body into an ordered history. An empty result means the
    /// request carried no usable message; the boundary treats that as an
    /// input error.
    pub fn into_history(self) -> Vec<ChatMessage> {
        if let Some(messages) = self.messages {
            let cleaned: Vec<ChatMessage> = messages
                .into_iter()
                .filter_map(|m| {
                    let role = match m.role.as_deref().map(str::trim) {
                        Some("system") => Role::System,
                        Some("user") => Role::User,
                        Some("assistant") => Role::Assistant,
                        _ => return None,
                    };
                    ChatMessage::new(role, m.content.unwrap_or_default())
                })
                .collect();
            if !cleaned.is_empty() {
                return cleaned;
            }
        }

        match self.message {
            Some(message) => ChatMessage::new(Role::User, message).into_iter().collect(),
            None => Vec::new(),
        }
    }
}

/// Content of the most recent user turn, if any.
pub fn latest_user_text(history: &[ChatMessage]) -> Option<&str> {
    history.iter().rev().find(|m| m.role == Role::User).map(|m| m.content.as_str())
}
