//! 通义星尘角色对话平台 HTTP 客户端

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use super::CharacterApi;
use crate::errors::{ClinicError, Result};
use crate::models::chat::{
    requests::{
        CharacterQuery, CharacterUpdateRequest, ChatHistoryQuery, ChatReqParams,
        ResetChatHistoryRequest,
    },
    responses::{ApiEnvelope, CharacterPage, ChatResult},
};

const CHAT_SEND_PATH: &str = "v2/api/chat/send";
const CHARACTER_UPDATE_PATH: &str = "v2/api/character/update";
const CHARACTER_DETAILS_PATH: &str = "v2/api/character/details";
const CHARACTER_SEARCH_PATH: &str = "v2/api/character/search";
const CHAT_HISTORIES_PATH: &str = "v2/api/chat/message/histories";
const CHAT_RESET_PATH: &str = "v2/api/chat/reset";

pub struct XingChenClient {
    client: Client,
    host: String,
    access_token: String,
}

impl XingChenClient {
    pub fn new(host: &str, access_token: &str) -> Result<Self> {
        if host.trim().is_empty() {
            return Err(ClinicError::configuration("对话平台地址不能为空"));
        }

        let client = Client::builder()
            .build()
            .map_err(|e| ClinicError::chat_transport(format!("HTTP 客户端初始化失败: {e}")))?;

        Ok(Self {
            client,
            host: host.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        })
    }

    /// 获取接口 URL
    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.host, path)
    }

    /// 解析响应体，HTTP 状态异常时带上响应文本
    async fn read_envelope<T: DeserializeOwned>(
        path: &str,
        response: reqwest::Response,
    ) -> Result<ApiEnvelope<T>> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("对话平台接口 {} 返回 {}: {}", path, status, body);
            return Err(ClinicError::chat_transport(format!(
                "HTTP {status}: {body}"
            )));
        }

        Ok(response.json::<ApiEnvelope<T>>().await?)
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<ApiEnvelope<T>>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        debug!("POST {}", path);
        let response = self
            .client
            .post(self.api_url(path))
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await?;

        Self::read_envelope(path, response).await
    }
}

#[async_trait]
impl CharacterApi for XingChenClient {
    async fn chat(&self, params: &ChatReqParams) -> Result<ApiEnvelope<ChatResult>> {
        self.post(CHAT_SEND_PATH, params).await
    }

    async fn update_character(&self, req: &CharacterUpdateRequest) -> Result<ApiEnvelope<bool>> {
        self.post(CHARACTER_UPDATE_PATH, req).await
    }

    async fn character_details(
        &self,
        character_id: &str,
    ) -> Result<ApiEnvelope<serde_json::Value>> {
        debug!("GET {}", CHARACTER_DETAILS_PATH);
        let response = self
            .client
            .get(self.api_url(CHARACTER_DETAILS_PATH))
            .bearer_auth(&self.access_token)
            .query(&[("characterId", character_id)])
            .send()
            .await?;

        Self::read_envelope(CHARACTER_DETAILS_PATH, response).await
    }

    async fn search_characters(
        &self,
        query: &CharacterQuery,
    ) -> Result<ApiEnvelope<CharacterPage>> {
        self.post(CHARACTER_SEARCH_PATH, query).await
    }

    async fn chat_histories(
        &self,
        query: &ChatHistoryQuery,
    ) -> Result<ApiEnvelope<serde_json::Value>> {
        self.post(CHAT_HISTORIES_PATH, query).await
    }

    async fn reset_chat_history(
        &self,
        req: &ResetChatHistoryRequest,
    ) -> Result<ApiEnvelope<bool>> {
        self.post(CHAT_RESET_PATH, req).await
    }
}
