// HTTP 服务模块
// 页面、表单问答、JSON 问答和健康检查

pub mod handlers;
pub mod router;
pub mod state;


// 重新导出主要类型
pub use router::build_router;
pub use state::AppState;

use crate::config::AppConfig;
use crate::error::AppError;
use tokio::net::TcpListener;
use tokio::signal;

/// 启动服务，直到收到 Ctrl+C 或 SIGTERM
pub async fn serve(config: AppConfig) -> Result<(), AppError> {
    let bind = config.server.bind.clone();
    let state = tokio::task::spawn_blocking(move || AppState::bootstrap(config))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let listener = TcpListener::bind(&bind).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        example = %state.example(),
        documents = state.document_count(),
        "服务已启动"
    );

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("服务已停止");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("监听 Ctrl+C 失败: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("监听 SIGTERM 失败: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("收到停止信号，开始优雅关闭");
}
