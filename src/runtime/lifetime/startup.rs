use crate::chat::{ChatAdapter, create_chat_adapter};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::categories::{entities::DEFAULT_CATEGORY_ID, requests::CreateCategoryRequest};
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    /// 未配置访问令牌时为 None
    pub chat: Option<Arc<ChatAdapter>>,
}

/// 初始化默认分类
/// 如果 ID 为 1 的默认分类不存在，则写入
async fn seed_default_category(storage: &Arc<dyn Storage>, config: &AppConfig) -> Result<()> {
    if let Some(existing) = storage.get_category_by_id(DEFAULT_CATEGORY_ID).await? {
        debug!(
            "Default category already exists (ID: {}), skipping seed",
            existing.id
        );
        return Ok(());
    }

    let category = storage
        .seed_default_category(CreateCategoryRequest {
            book: Some(config.seed.default_book.clone()),
            chapter: Some(config.seed.default_chapter.clone()),
            subject: Some(config.seed.default_subject.clone()),
        })
        .await?;

    info!("Default category created (ID: {})", category.id);
    Ok(())
}

/// 创建对话适配器，未配置访问令牌时跳过
fn prepare_chat(config: &AppConfig) -> Result<Option<Arc<ChatAdapter>>> {
    if !config.chat_enabled() {
        warn!("Chat access token not set, chat adapter disabled");
        return Ok(None);
    }

    let adapter = create_chat_adapter(&config.chat)?;
    warn!("Chat adapter initialized (host: {})", config.chat.host);
    Ok(Some(adapter))
}

/// 准备启动上下文
/// 包括存储、默认数据和对话适配器
pub async fn prepare_startup() -> Result<StartupContext> {
    // 重复安装时返回 Err，忽略即可
    let _ = rustls::crypto::ring::default_provider().install_default();

    let config = AppConfig::get();

    let storage = crate::storage::create_storage(&config.database).await?;
    warn!("Storage backend initialized and schema ensured");

    seed_default_category(&storage, config).await?;

    let chat = prepare_chat(config)?;

    Ok(StartupContext { storage, chat })
}
