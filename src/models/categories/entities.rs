use serde::{Deserialize, Serialize};

/// 默认分类 ID，查找不到匹配分类时回退到该分类
pub const DEFAULT_CATEGORY_ID: i64 = 1;

// 病例分类（教材 / 章节 / 主题）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub book: Option<String>,
    pub chapter: Option<String>,
    pub subject: Option<String>,
}

impl Category {
    pub fn is_default(&self) -> bool {
        self.id == DEFAULT_CATEGORY_ID
    }
}
