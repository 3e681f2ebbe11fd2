//! 角色对话平台请求 DTO

use super::entities::ChatMessage;
use serde::Serialize;

// 对话请求
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReqParams {
    pub bot_profile: CharacterKey,
    pub model_parameters: ModelParameters,
    pub messages: Vec<ChatMessage>,
    pub context: ChatContext,
    pub user_profile: UserProfile,
}

// 角色标识：直接提供人设内容，或引用平台上的角色 ID
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterKey {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

// 生成参数
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelParameters {
    pub seed: u64,
    pub top_p: f64,
    pub temperature: f64,
    pub incremental_output: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatContext {
    pub use_chat_history: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
}

// 角色更新请求，除 characterId 外的属性原样透传
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterUpdateRequest {
    pub character_id: String,
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

// 角色搜索请求
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterQuery {
    #[serde(rename = "where")]
    pub filter: CharacterQueryWhere,
    pub page_num: u32,
    pub page_size: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CharacterQueryWhere {
    pub scope: String,
}

// 对话历史查询请求
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatHistoryQuery {
    #[serde(rename = "where")]
    pub filter: ChatHistoryQueryWhere,
    pub order_by: Vec<String>,
    pub page_num: u32,
    pub page_size: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatHistoryQueryWhere {
    pub character_id: String,
    pub biz_user_id: String,
}

// 重置对话历史请求
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetChatHistoryRequest {
    pub character_id: String,
    pub user_id: String,
}
