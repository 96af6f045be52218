pub mod asset_manager;
pub mod book;
pub mod config;
pub mod db;
pub mod error;
pub mod ingest;
pub mod parser;
pub mod qa;
pub mod render;
pub mod retrieval;
pub mod server;

pub use crate::config::{load_config, AppConfig};
pub use error::AppError;
pub use server::serve;

use book::ExampleId;
use ingest::IngestReport;
use qa::{Prediction, QaService};
use retrieval::{ContextSelector, Retriever};
use rusqlite::Connection;
use std::path::Path;

/// 打开示例数据库，必要时创建目录
fn open_database(config: &AppConfig) -> Result<Connection, AppError> {
    ExampleId::parse(&config.example)?;

    let path = config.database_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    tracing::debug!(database = %path.display(), "打开数据库");
    Ok(db::init_db(&path)?)
}

/// 把教材文件导入当前示例的数据库
///
/// # 参数
/// - `config`: 应用配置
/// - `files`: 教材文件列表（txt / md / markdown）
/// - `replace`: 是否先清空已有文档
pub fn run_ingest(
    config: &AppConfig,
    files: &[impl AsRef<Path>],
    replace: bool,
) -> Result<Vec<IngestReport>, AppError> {
    let mut conn = open_database(config)?;
    ingest::ingest_files(&mut conn, files, config.ingest.chunk_words, replace)
}

/// 不启动服务，直接回答一个问题
pub fn ask_question(config: &AppConfig, question: &str) -> Result<Prediction, AppError> {
    let conn = open_database(config)?;
    let selector = ContextSelector::new(config.retrieval.top_k, config.retrieval.cumulative_p);
    let service = QaService::with_lexical(Retriever::from_connection(&conn, selector)?);
    service.answer(&conn, question)
}
