use std::sync::Arc;

use tokio::signal;
use tracing::{error, warn};

use crate::storage::Storage;

pub async fn listen_for_shutdown() {
    // 等待 Ctrl+C 信号
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        return;
    }
    warn!("Shutdown signal received, initiating graceful shutdown...");
}

/// 关闭连接池，确保数据落盘
pub async fn close_storage(storage: &Arc<dyn Storage>) {
    match storage.close().await {
        Ok(()) => warn!("Storage closed"),
        Err(e) => error!("Failed to close storage: {}", e),
    }
}
