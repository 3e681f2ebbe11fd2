use serde::{Deserialize, Serialize};

// 消息角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

// 对话消息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// 医生（操作者），即驱动对话的本地用户
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: String,
}

/// 患者（角色），第一条消息提供人设，其后为往来对话
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    pub messages: Vec<ChatMessage>,
}

/// 角色搜索范围
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharacterScope {
    /// 自己创建的角色
    #[serde(rename = "my")]
    Mine,
    /// 公开共享的角色
    #[serde(rename = "public")]
    Shared,
}

impl CharacterScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterScope::Mine => "my",
            CharacterScope::Shared => "public",
        }
    }
}
