use serde::{Deserialize, Serialize};

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseConfig,
    pub chat: ChatConfig,
    pub argon2: Argon2Config,
    pub seed: SeedConfig,
}

/// 应用设置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub system_name: String,
    pub environment: String,
    pub log_level: String,
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,    // 数据库连接 URL（从 scheme 自动推断类型）
    pub pool_size: u32, // 连接池大小
    pub timeout: u64,   // 连接超时 (秒)
}

/// 角色对话平台配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    pub host: String,
    #[serde(skip_serializing, default)] // 不序列化访问令牌
    pub access_token: String,
}

/// Argon2 密码哈希参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Argon2Config {
    pub memory_cost: u32,
    pub time_cost: u32,
    pub parallelism: u32,
}

/// 初始数据配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    pub default_book: String,
    pub default_chapter: String,
    pub default_subject: String,
}
