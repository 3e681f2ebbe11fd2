use serde::{Deserialize, Serialize};

// 病例记录，可选关联提示词配置与分类
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub id: i64,
    pub teacher_id: Option<i64>,
    pub chapter_id: Option<i64>,
    pub creator: Option<String>,
    pub profile: Option<String>,
    pub content: Option<String>,
}
