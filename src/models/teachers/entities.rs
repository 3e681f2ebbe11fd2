use serde::{Deserialize, Serialize};

// 教师提示词配置（不是用户账号）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherPrompt {
    pub id: i64,
    pub prompt: Option<String>,
    pub memo: Option<String>,
    pub model: Option<String>,
    pub creator: Option<String>,
    pub public: bool,
}
