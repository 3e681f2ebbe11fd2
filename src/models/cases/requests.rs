use serde::Deserialize;

// 病例创建请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCaseRequest {
    pub teacher_id: Option<i64>,
    pub chapter_id: Option<i64>,
    pub creator: Option<String>,
    pub profile: Option<String>,
    pub content: Option<String>,
}

// 病例更新请求
//
// 外键字段使用 Option<Option<i64>>：外层 None 表示不修改，Some(None) 表示清空关联。
#[derive(Debug, Clone, Default)]
pub struct UpdateCaseRequest {
    pub teacher_id: Option<Option<i64>>,
    pub chapter_id: Option<Option<i64>>,
    pub creator: Option<String>,
    pub profile: Option<String>,
    pub content: Option<String>,
}

impl UpdateCaseRequest {
    pub fn is_empty(&self) -> bool {
        self.teacher_id.is_none()
            && self.chapter_id.is_none()
            && self.creator.is_none()
            && self.profile.is_none()
            && self.content.is_none()
    }
}

// 病例列表查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaseListQuery {
    pub creator: Option<String>,
    pub teacher_id: Option<i64>,
    pub chapter_id: Option<i64>,
}
