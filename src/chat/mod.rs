//! 角色对话平台接入
//!
//! `CharacterApi` 描述外部平台的接口，`xingchen` 为其 HTTP 实现，
//! `ChatAdapter` 在此之上组装请求参数并处理失败占位回复。

use std::sync::Arc;

use crate::config::ChatConfig;
use crate::errors::Result;
use crate::models::chat::{
    requests::{
        CharacterQuery, CharacterUpdateRequest, ChatHistoryQuery, ChatReqParams,
        ResetChatHistoryRequest,
    },
    responses::{ApiEnvelope, CharacterPage, ChatResult},
};

mod adapter;
pub mod xingchen;

pub use adapter::ChatAdapter;

#[async_trait::async_trait]
pub trait CharacterApi: Send + Sync {
    // 发送对话
    async fn chat(&self, params: &ChatReqParams) -> Result<ApiEnvelope<ChatResult>>;
    // 更新角色属性
    async fn update_character(&self, req: &CharacterUpdateRequest) -> Result<ApiEnvelope<bool>>;
    // 获取角色详情
    async fn character_details(&self, character_id: &str)
    -> Result<ApiEnvelope<serde_json::Value>>;
    // 搜索角色
    async fn search_characters(&self, query: &CharacterQuery)
    -> Result<ApiEnvelope<CharacterPage>>;
    // 查询对话历史
    async fn chat_histories(&self, query: &ChatHistoryQuery)
    -> Result<ApiEnvelope<serde_json::Value>>;
    // 重置对话历史
    async fn reset_chat_history(
        &self,
        req: &ResetChatHistoryRequest,
    ) -> Result<ApiEnvelope<bool>>;
}

/// 根据配置创建对话适配器
pub fn create_chat_adapter(config: &ChatConfig) -> Result<Arc<ChatAdapter>> {
    let client = xingchen::XingChenClient::new(&config.host, &config.access_token)?;
    Ok(Arc::new(ChatAdapter::new(Arc::new(client))))
}
