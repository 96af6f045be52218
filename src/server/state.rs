use crate::asset_manager::AssetManager;
use crate::book::ExampleId;
use crate::config::AppConfig;
use crate::db;
use crate::error::AppError;
use crate::qa::{Prediction, QaService};
use crate::render::PageContext;
use crate::retrieval::{ContextSelector, Retriever};
use rusqlite::Connection;
use std::ops::Deref;
use std::sync::{Arc, Mutex};
use std::time::Instant;

pub struct AppStateInner {
    pub config: AppConfig,
    pub page: PageContext,
    pub started_at: Instant,
    qa: QaService,
    conn: Mutex<Connection>,
}

/// 共享状态
///
/// 页面和索引只读；SQLite 连接用互斥锁保护
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

impl AppState {
    pub fn new(config: AppConfig, page: PageContext, conn: Connection, qa: QaService) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                page,
                started_at: Instant::now(),
                qa,
                conn: Mutex::new(conn),
            }),
        }
    }

    /// 启动时加载全部资源
    ///
    /// 书籍配置或封面缺失直接返回错误，不做恢复
    pub fn bootstrap(config: AppConfig) -> Result<Self, AppError> {
        let example = ExampleId::parse(&config.example)?;
        let assets = AssetManager::new(&config.books_dir);

        let book = assets.load_book_config(&example)?;
        let cover = assets.load_cover(&example)?;
        let page = PageContext::new(example.clone(), book, &cover);

        let db_path = config.database_path();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = db::init_db(&db_path)?;

        let selector = ContextSelector::new(config.retrieval.top_k, config.retrieval.cumulative_p);
        let retriever = Retriever::from_connection(&conn, selector)?;
        if retriever.is_empty() {
            tracing::warn!(database = %db_path.display(), "文档表为空，请先运行 ingest");
        }
        let qa = QaService::with_lexical(retriever);

        tracing::info!(
            example = %example,
            book = %page.book.book_name,
            cover_sha256 = %cover.sha256,
            "示例已加载"
        );

        Ok(Self::new(config, page, conn, qa))
    }

    pub fn example(&self) -> &ExampleId {
        &self.inner.page.example
    }

    pub fn document_count(&self) -> usize {
        self.inner.qa.document_count()
    }

    /// 回答问题（阻塞调用）
    ///
    /// 打分和答案抽取不持锁，只有按 ID 取正文时才锁定连接
    pub fn ask(&self, question: &str) -> Result<Prediction, AppError> {
        self.inner.qa.answer(&self.inner.conn, question)
    }

    /// 在阻塞线程池中回答问题
    pub async fn ask_blocking(&self, question: String) -> Result<Prediction, AppError> {
        let state = self.clone();
        tokio::task::spawn_blocking(move || state.ask(&question))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
    }
}

impl Deref for AppState {
    type Target = AppStateInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
