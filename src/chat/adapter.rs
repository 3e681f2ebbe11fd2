use std::sync::Arc;

use tracing::{debug, warn};

use super::CharacterApi;
use crate::errors::{ClinicError, Result};
use crate::models::chat::{
    entities::{CharacterScope, Doctor, Patient},
    requests::{
        CharacterKey, CharacterQuery, CharacterQueryWhere, CharacterUpdateRequest, ChatContext,
        ChatHistoryQuery, ChatHistoryQueryWhere, ChatReqParams, ModelParameters,
        ResetChatHistoryRequest, UserProfile,
    },
    responses::ApiEnvelope,
};

// 固定生成参数
const CHAT_SEED: u64 = 1683806810;
const CHAT_TOP_P: f64 = 0.95;
const CHAT_TEMPERATURE: f64 = 0.92;

const SEARCH_PAGE_NUM: u32 = 1;
const SEARCH_PAGE_SIZE: u32 = 100;
const HISTORY_PAGE_NUM: u32 = 1;
const HISTORY_PAGE_SIZE: u32 = 10;
const HISTORY_ORDER: &str = "gmtCreate desc";

/// 平台返回失败时的占位回复
fn upstream_placeholder(code: &str) -> String {
    format!("( 似乎自己在思索什么，嘴里反复说着数字 ~ {code} ~ )")
}

/// 调用异常时的占位回复
fn error_placeholder(reason: &str) -> String {
    format!("( 脑子坏掉了，等会再问我吧 ~ 原因是: {reason})")
}

/// 取出成功响应中的数据，失败或缺少数据时报错
fn into_data<T>(operation: &str, envelope: ApiEnvelope<T>) -> Result<T> {
    if !envelope.success {
        return Err(ClinicError::chat_upstream(format!(
            "{operation} 失败 (code: {}): {}",
            envelope.code_display(),
            envelope.error_message.as_deref().unwrap_or_default()
        )));
    }
    envelope
        .data
        .ok_or_else(|| ClinicError::chat_upstream(format!("{operation} 响应缺少 data")))
}

/// 角色对话适配器
pub struct ChatAdapter {
    api: Arc<dyn CharacterApi>,
}

impl ChatAdapter {
    pub fn new(api: Arc<dyn CharacterApi>) -> Self {
        Self { api }
    }

    /// 组装对话请求：首条消息为人设，其余为对话轮次
    pub fn build_chat_params(doctor: &Doctor, patient: &Patient) -> Result<ChatReqParams> {
        let (persona, turns) = patient
            .messages
            .split_first()
            .ok_or_else(|| ClinicError::validation("患者消息为空，缺少人设"))?;

        Ok(ChatReqParams {
            bot_profile: CharacterKey {
                character_id: None,
                content: Some(persona.content.clone()),
            },
            model_parameters: ModelParameters {
                seed: CHAT_SEED,
                top_p: CHAT_TOP_P,
                temperature: CHAT_TEMPERATURE,
                incremental_output: false,
            },
            messages: turns.to_vec(),
            context: ChatContext {
                use_chat_history: false,
            },
            user_profile: UserProfile {
                user_id: doctor.id.clone(),
            },
        })
    }

    /// 发送对话并返回回复文本
    ///
    /// 不会返回错误：平台失败与调用异常都转换为占位回复。
    pub async fn chat(&self, doctor: &Doctor, patient: &Patient) -> String {
        match self.try_chat(doctor, patient).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(code)) => {
                warn!("对话失败，平台返回代码 {} (患者: {})", code, patient.id);
                upstream_placeholder(&code)
            }
            Err(e) => {
                warn!("对话调用异常 (患者: {}): {}", patient.id, e);
                error_placeholder(e.message())
            }
        }
    }

    /// 内层 Err 为平台失败代码，外层 Err 为调用异常
    async fn try_chat(
        &self,
        doctor: &Doctor,
        patient: &Patient,
    ) -> Result<std::result::Result<String, String>> {
        let params = Self::build_chat_params(doctor, patient)?;
        debug!(
            "发送对话 (医生: {}, 患者: {}, 轮次: {})",
            doctor.id,
            patient.id,
            params.messages.len()
        );

        let envelope = self.api.chat(&params).await?;
        if !envelope.success {
            return Ok(Err(envelope.code_display()));
        }

        let reply = envelope
            .data
            .as_ref()
            .and_then(|result| result.first_reply())
            .ok_or_else(|| ClinicError::chat_transport("响应中没有回复内容"))?;

        Ok(Ok(reply.to_string()))
    }

    /// 更新角色属性
    pub async fn update_character(&self, req: CharacterUpdateRequest) -> Result<bool> {
        let envelope = self.api.update_character(&req).await?;
        into_data("更新角色", envelope)
    }

    /// 获取角色详情
    pub async fn character_details(&self, character_id: &str) -> Result<serde_json::Value> {
        let envelope = self.api.character_details(character_id).await?;
        into_data("获取角色详情", envelope)
    }

    /// 按范围搜索角色（第 1 页，每页 100 条）
    pub async fn search_characters(
        &self,
        scope: CharacterScope,
    ) -> Result<Vec<serde_json::Value>> {
        let query = CharacterQuery {
            filter: CharacterQueryWhere {
                scope: scope.as_str().to_string(),
            },
            page_num: SEARCH_PAGE_NUM,
            page_size: SEARCH_PAGE_SIZE,
        };
        let envelope = self.api.search_characters(&query).await?;
        Ok(into_data("搜索角色", envelope)?.list)
    }

    /// 查询医生与患者间最近的对话历史
    pub async fn chat_histories(
        &self,
        doctor: &Doctor,
        patient: &Patient,
    ) -> Result<serde_json::Value> {
        let query = ChatHistoryQuery {
            filter: ChatHistoryQueryWhere {
                character_id: patient.id.clone(),
                biz_user_id: doctor.id.clone(),
            },
            order_by: vec![HISTORY_ORDER.to_string()],
            page_num: HISTORY_PAGE_NUM,
            page_size: HISTORY_PAGE_SIZE,
        };
        let envelope = self.api.chat_histories(&query).await?;
        into_data("查询对话历史", envelope)
    }

    /// 重置医生与患者间的对话历史
    pub async fn reset_chat_history(&self, doctor: &Doctor, patient: &Patient) -> Result<bool> {
        let req = ResetChatHistoryRequest {
            character_id: patient.id.clone(),
            user_id: doctor.id.clone(),
        };
        let envelope = self.api.reset_chat_history(&req).await?;
        into_data("重置对话历史", envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::entities::ChatMessage;
    use crate::models::chat::responses::{
        CharacterPage, ChatChoice, ChatResult, ReplyMessage,
    };
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// 记录请求并返回预设结果的平台替身
    #[derive(Default)]
    struct MockApi {
        chat_reply: Mutex<Option<Result<ApiEnvelope<ChatResult>>>>,
        sent_chats: Mutex<Vec<ChatReqParams>>,
        sent_history_queries: Mutex<Vec<ChatHistoryQuery>>,
        sent_searches: Mutex<Vec<CharacterQuery>>,
    }

    impl MockApi {
        fn replying(reply: Result<ApiEnvelope<ChatResult>>) -> Self {
            Self {
                chat_reply: Mutex::new(Some(reply)),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl CharacterApi for MockApi {
        async fn chat(&self, params: &ChatReqParams) -> Result<ApiEnvelope<ChatResult>> {
            self.sent_chats.lock().unwrap().push(params.clone());
            self.chat_reply
                .lock()
                .unwrap()
                .take()
                .expect("unexpected chat call")
        }

        async fn update_character(
            &self,
            req: &CharacterUpdateRequest,
        ) -> Result<ApiEnvelope<bool>> {
            Ok(ApiEnvelope::ok(!req.character_id.is_empty()))
        }

        async fn character_details(
            &self,
            character_id: &str,
        ) -> Result<ApiEnvelope<serde_json::Value>> {
            if character_id == "missing" {
                return Ok(ApiEnvelope::failed(404, "character not found"));
            }
            Ok(ApiEnvelope::ok(
                serde_json::json!({ "characterId": character_id }),
            ))
        }

        async fn search_characters(
            &self,
            query: &CharacterQuery,
        ) -> Result<ApiEnvelope<CharacterPage>> {
            self.sent_searches.lock().unwrap().push(query.clone());
            Ok(ApiEnvelope::ok(CharacterPage {
                list: vec![serde_json::json!({ "name": "患者甲" })],
                total: Some(1),
            }))
        }

        async fn chat_histories(
            &self,
            query: &ChatHistoryQuery,
        ) -> Result<ApiEnvelope<serde_json::Value>> {
            self.sent_history_queries
                .lock()
                .unwrap()
                .push(query.clone());
            Ok(ApiEnvelope::ok(serde_json::json!({ "list": [] })))
        }

        async fn reset_chat_history(
            &self,
            _req: &ResetChatHistoryRequest,
        ) -> Result<ApiEnvelope<bool>> {
            Err(ClinicError::chat_transport("connection reset"))
        }
    }

    fn reply_with(text: &str) -> ApiEnvelope<ChatResult> {
        ApiEnvelope::ok(ChatResult {
            choices: vec![ChatChoice {
                messages: vec![ReplyMessage {
                    role: Some("assistant".into()),
                    content: text.into(),
                }],
            }],
        })
    }

    fn doctor() -> Doctor {
        Doctor {
            id: "doctor-1".into(),
        }
    }

    fn patient() -> Patient {
        Patient {
            id: "patient-1".into(),
            messages: vec![
                ChatMessage::system("你是一名发热三天的患者"),
                ChatMessage::user("哪里不舒服？"),
            ],
        }
    }

    #[tokio::test]
    async fn test_chat_returns_first_reply() {
        let api = Arc::new(MockApi::replying(Ok(reply_with("hello"))));
        let adapter = ChatAdapter::new(api.clone());

        assert_eq!(adapter.chat(&doctor(), &patient()).await, "hello");

        let sent = api.sent_chats.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let params = &sent[0];
        assert_eq!(
            params.bot_profile.content.as_deref(),
            Some("你是一名发热三天的患者")
        );
        assert_eq!(params.messages, vec![ChatMessage::user("哪里不舒服？")]);
        assert_eq!(params.model_parameters.seed, 1683806810);
        assert_eq!(params.model_parameters.top_p, 0.95);
        assert_eq!(params.model_parameters.temperature, 0.92);
        assert!(!params.model_parameters.incremental_output);
        assert!(!params.context.use_chat_history);
        assert_eq!(params.user_profile.user_id, "doctor-1");
    }

    #[tokio::test]
    async fn test_upstream_failure_becomes_code_placeholder() {
        let api = Arc::new(MockApi::replying(Ok(ApiEnvelope::failed(42, "quota"))));
        let adapter = ChatAdapter::new(api);

        let reply = adapter.chat(&doctor(), &patient()).await;
        assert!(reply.contains("42"), "reply: {reply}");
        assert!(reply.contains("嘴里反复说着数字"));
    }

    #[tokio::test]
    async fn test_transport_error_becomes_reason_placeholder() {
        let api = Arc::new(MockApi::replying(Err(ClinicError::chat_transport(
            "timeout",
        ))));
        let adapter = ChatAdapter::new(api);

        let reply = adapter.chat(&doctor(), &patient()).await;
        assert!(reply.contains("timeout"), "reply: {reply}");
        assert!(reply.starts_with("( 脑子坏掉了"));
    }

    #[tokio::test]
    async fn test_success_without_choices_is_reported_as_error() {
        let api = Arc::new(MockApi::replying(Ok(ApiEnvelope::ok(ChatResult {
            choices: vec![],
        }))));
        let adapter = ChatAdapter::new(api);

        let reply = adapter.chat(&doctor(), &patient()).await;
        assert!(reply.contains("没有回复内容"), "reply: {reply}");
    }

    #[tokio::test]
    async fn test_empty_history_never_calls_api() {
        let api = Arc::new(MockApi::default());
        let adapter = ChatAdapter::new(api.clone());
        let empty = Patient {
            id: "patient-1".into(),
            messages: vec![],
        };

        let reply = adapter.chat(&doctor(), &empty).await;
        assert!(reply.starts_with("( 脑子坏掉了"));
        assert!(api.sent_chats.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pass_through_operations() {
        let api = Arc::new(MockApi::default());
        let adapter = ChatAdapter::new(api.clone());

        let found = adapter
            .search_characters(CharacterScope::Mine)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        let search = &api.sent_searches.lock().unwrap()[0];
        assert_eq!(search.filter.scope, "my");
        assert_eq!((search.page_num, search.page_size), (1, 100));

        adapter.chat_histories(&doctor(), &patient()).await.unwrap();
        let history = &api.sent_history_queries.lock().unwrap()[0];
        assert_eq!(history.filter.character_id, "patient-1");
        assert_eq!(history.filter.biz_user_id, "doctor-1");
        assert_eq!(history.order_by, vec!["gmtCreate desc".to_string()]);
        assert_eq!((history.page_num, history.page_size), (1, 10));

        let details = adapter.character_details("c-1").await.unwrap();
        assert_eq!(details["characterId"], "c-1");

        let err = adapter.character_details("missing").await.unwrap_err();
        assert!(matches!(err, ClinicError::ChatUpstream(_)));
        assert!(err.message().contains("404"));

        let updated = adapter
            .update_character(CharacterUpdateRequest {
                character_id: "c-1".into(),
                attributes: serde_json::Map::new(),
            })
            .await
            .unwrap();
        assert!(updated);

        let err = adapter
            .reset_chat_history(&doctor(), &patient())
            .await
            .unwrap_err();
        assert!(matches!(err, ClinicError::ChatTransport(_)));
    }
}
