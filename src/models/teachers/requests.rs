use serde::Deserialize;

// 提示词创建请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTeacherPromptRequest {
    pub prompt: Option<String>,
    pub memo: Option<String>,
    pub model: Option<String>,
    pub creator: Option<String>,
    pub public: bool,
}

// 提示词更新请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTeacherPromptRequest {
    pub prompt: Option<String>,
    pub memo: Option<String>,
    pub model: Option<String>,
    pub creator: Option<String>,
    pub public: Option<bool>,
}

impl UpdateTeacherPromptRequest {
    pub fn is_empty(&self) -> bool {
        self.prompt.is_none()
            && self.memo.is_none()
            && self.model.is_none()
            && self.creator.is_none()
            && self.public.is_none()
    }
}
