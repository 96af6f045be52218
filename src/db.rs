use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Result};
use serde::Serialize;
use std::path::Path;
use std::sync::Mutex;

use crate::error::AppError;

/// 教材文档（章节切块）
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub ingested_at: String,
}

pub fn init_db<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let conn = Connection::open(path)?;
    init_schema(&conn)?;
    Ok(conn)
}

/// 内存数据库，测试用
pub fn init_memory_db() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    init_schema(&conn)?;
    Ok(conn)
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute("PRAGMA encoding = 'UTF-8'", [])?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS documents (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            text TEXT NOT NULL,
            source_path TEXT,
            ingested_at TEXT NOT NULL
        )",
        [],
    )?;

    Ok(())
}

/// 插入文档，返回新 ID
pub fn insert_document(
    conn: &Connection,
    title: &str,
    text: &str,
    source_path: Option<&str>,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO documents (title, text, source_path, ingested_at) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![title, text, source_path, Utc::now().to_rfc3339()],
    )?;
    Ok(conn.last_insert_rowid())
}

/// 按 ID 获取文档
pub fn get_doc_by_id(conn: &Connection, doc_id: i64) -> Result<Option<Document>> {
    conn.query_row(
        "SELECT id, title, text, ingested_at FROM documents WHERE id = ?1",
        [doc_id],
        |row| {
            Ok(Document {
                id: row.get(0)?,
                title: row.get(1)?,
                text: row.get(2)?,
                ingested_at: row.get(3)?,
            })
        },
    )
    .optional()
}

/// 获取全部文档（按 ID 排序），用于构建索引
pub fn get_all_documents(conn: &Connection) -> Result<Vec<Document>> {
    let mut stmt = conn.prepare("SELECT id, title, text, ingested_at FROM documents ORDER BY id")?;

    let docs = stmt
        .query_map([], |row| {
            Ok(Document {
                id: row.get(0)?,
                title: row.get(1)?,
                text: row.get(2)?,
                ingested_at: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(docs)
}

pub fn count_documents(conn: &Connection) -> Result<usize> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
    Ok(count as usize)
}

/// 清空文档表，返回删除的行数
pub fn clear_documents(conn: &Connection) -> Result<usize> {
    conn.execute("DELETE FROM documents", [])
}

/// 按 ID 取文档的存储抽象
///
/// 检索只在取正文时需要数据库，服务端借此把加锁范围缩小到单次查询
pub trait DocumentStore {
    fn fetch_document(&self, doc_id: i64) -> std::result::Result<Option<Document>, AppError>;
}

impl DocumentStore for Connection {
    fn fetch_document(&self, doc_id: i64) -> std::result::Result<Option<Document>, AppError> {
        Ok(get_doc_by_id(self, doc_id)?)
    }
}

impl DocumentStore for Mutex<Connection> {
    fn fetch_document(&self, doc_id: i64) -> std::result::Result<Option<Document>, AppError> {
        let conn = self
            .lock()
            .map_err(|e| AppError::Internal(format!("锁定数据库连接失败: {}", e)))?;
        Ok(get_doc_by_id(&conn, doc_id)?)
    }
}
