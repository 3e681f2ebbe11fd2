use serde::Deserialize;

// 模型创建请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateAiModelRequest {
    #[serde(rename = "use")]
    pub in_use: bool,
    pub free: bool,
    pub platform: Option<String>,
    pub series: Option<String>,
    pub name: Option<String>,
    pub module: Option<String>,
    pub price_input: Option<f64>,
    pub price_output: Option<f64>,
}

// 模型更新请求（只包含需要修改的字段）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAiModelRequest {
    #[serde(rename = "use")]
    pub in_use: Option<bool>,
    pub free: Option<bool>,
    pub platform: Option<String>,
    pub series: Option<String>,
    pub name: Option<String>,
    pub module: Option<String>,
    pub price_input: Option<f64>,
    pub price_output: Option<f64>,
}

impl UpdateAiModelRequest {
    pub fn is_empty(&self) -> bool {
        self.in_use.is_none()
            && self.free.is_none()
            && self.platform.is_none()
            && self.series.is_none()
            && self.name.is_none()
            && self.module.is_none()
            && self.price_input.is_none()
            && self.price_output.is_none()
    }
}

// 批量更新中的单条记录，必须携带自身 ID
#[derive(Debug, Clone, Deserialize)]
pub struct AiModelPatch {
    pub id: i64,
    #[serde(flatten)]
    pub changes: UpdateAiModelRequest,
}

// 模型列表查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AiModelListQuery {
    pub in_use: Option<bool>,
    pub free: Option<bool>,
    pub platform: Option<String>,
}
