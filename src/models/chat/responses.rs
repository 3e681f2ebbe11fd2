//! 角色对话平台响应 DTO

use serde::Deserialize;

/// 平台统一响应包装
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            code: Some(200),
            error_message: None,
            request_id: None,
            data: Some(data),
        }
    }

    pub fn failed(code: i64, message: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            error_message: Some(message.into()),
            request_id: None,
            data: None,
        }
    }

    /// 错误代码的展示形式
    pub fn code_display(&self) -> String {
        self.code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

// 对话结果
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResult {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub messages: Vec<ReplyMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReplyMessage {
    #[serde(default)]
    pub role: Option<String>,
    pub content: String,
}

impl ChatResult {
    /// 第一个候选回复的第一条消息内容
    pub fn first_reply(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.messages.first())
            .map(|message| message.content.as_str())
    }
}

// 角色搜索结果页
#[derive(Debug, Clone, Deserialize)]
pub struct CharacterPage {
    #[serde(default)]
    pub list: Vec<serde_json::Value>,
    #[serde(default)]
    pub total: Option<i64>,
}
