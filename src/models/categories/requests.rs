use serde::Deserialize;

// 分类创建请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCategoryRequest {
    pub book: Option<String>,
    pub chapter: Option<String>,
    pub subject: Option<String>,
}

// 分类更新请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCategoryRequest {
    pub book: Option<String>,
    pub chapter: Option<String>,
    pub subject: Option<String>,
}

impl UpdateCategoryRequest {
    pub fn is_empty(&self) -> bool {
        self.book.is_none() && self.chapter.is_none() && self.subject.is_none()
    }
}
