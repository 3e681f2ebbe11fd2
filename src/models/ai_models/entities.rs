use serde::{Deserialize, Serialize};

// 模型目录条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiModel {
    pub id: i64,
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

// 可选模型（仅名称与模块），用于下拉选择
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnabledModel {
    pub name: Option<String>,
    pub module: Option<String>,
}
