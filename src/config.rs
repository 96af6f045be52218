use crate::book::DEFAULT_EXAMPLE;
use crate::error::AppError;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// 默认配置文件名（不含扩展名，当前目录下可选）
pub const DEFAULT_CONFIG_NAME: &str = "textbook-qa";

/// 环境变量前缀，例如 `TBQA__SERVER__BIND`
pub const ENV_PREFIX: &str = "TBQA";

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 示例标识，选择要加载的教材
    pub example: String,
    /// 教材目录根路径，每个示例一个子目录
    pub books_dir: PathBuf,
    /// SQLite 数据库路径，未设置时为 `<books_dir>/<example>/book.db`
    pub database: Option<PathBuf>,
    pub server: ServerConfig,
    pub retrieval: RetrievalConfig,
    pub ingest: IngestConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

/// 检索参数
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// 最多取多少个候选章节
    pub top_k: usize,
    /// 归一化得分的累计阈值
    pub cumulative_p: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// 每个文档块的最大词数
    pub chunk_words: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            example: DEFAULT_EXAMPLE.to_string(),
            books_dir: PathBuf::from("books"),
            database: None,
            server: ServerConfig::default(),
            retrieval: RetrievalConfig::default(),
            ingest: IngestConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            cumulative_p: 0.6,
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self { chunk_words: 300 }
    }
}

impl AppConfig {
    /// 数据库文件路径
    pub fn database_path(&self) -> PathBuf {
        self.database
            .clone()
            .unwrap_or_else(|| self.books_dir.join(&self.example).join("book.db"))
    }
}

/// 加载配置
///
/// 分层顺序：内置默认值 → 配置文件 → `TBQA__*` 环境变量。
/// 显式指定的配置文件必须存在；未指定时尝试读取当前目录下的 `textbook-qa.toml`。
///
/// # 参数
/// - `path`: 配置文件路径（可选）
///
/// # 返回
/// 合并后的配置
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, AppError> {
    load_layers(path, None)
}

/// 合并配置文件和环境变量层
///
/// `env` 为 `None` 时读取进程环境变量，否则使用给定的键值对
fn load_layers(
    path: Option<&Path>,
    env: Option<config::Map<String, String>>,
) -> Result<AppConfig, AppError> {
    let file_source = match path {
        Some(p) => {
            info!("Loading config from {}", p.display());
            File::from(p).required(true)
        }
        None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
    };

    let config = Config::builder()
        .add_source(file_source)
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .convert_case(config::Case::Snake)
                .source(env),
        )
        .build()?
        .try_deserialize::<AppConfig>()?;

    Ok(config)
}
