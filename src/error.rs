use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::path::PathBuf;
use thiserror::Error;

/// 应用错误
///
/// 启动期错误（配置、封面缺失）直接终止进程；请求期错误映射为 HTTP 状态码
#[derive(Error, Debug)]
pub enum AppError {
    #[error("配置错误: {0}")]
    Config(#[from] config::ConfigError),
    #[error("书籍配置不存在: {}", .0.display())]
    MissingBookConfig(PathBuf),
    #[error("书籍配置解析失败: {0}")]
    InvalidBookConfig(#[from] serde_json::Error),
    #[error("封面资源不存在: {0}")]
    MissingAsset(String),
    #[error("封面资源格式不支持: {0}")]
    InvalidAsset(String),
    #[error("示例标识无效: {0}")]
    InvalidExample(String),
    #[error("未知示例: {0}")]
    UnknownExample(String),
    #[error("问题不能为空")]
    EmptyQuestion,
    #[error("数据库错误: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("解析失败: {0}")]
    Parse(String),
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),
    #[error("内部错误: {0}")]
    Internal(String),
}

impl AppError {
    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::EmptyQuestion | AppError::InvalidExample(_) => StatusCode::BAD_REQUEST,
            AppError::UnknownExample(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "请求处理失败");
        } else {
            tracing::debug!(error = %self, "请求被拒绝");
        }

        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::EmptyQuestion.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::InvalidExample("../etc".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::UnknownExample("other".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::MissingAsset("cover.png".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_messages() {
        let err = AppError::MissingBookConfig(PathBuf::from("books/x/book-config.json"));
        assert!(err.to_string().contains("books/x/book-config.json"));
        assert_eq!(AppError::EmptyQuestion.to_string(), "问题不能为空");
    }
}
