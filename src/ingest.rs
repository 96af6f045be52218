//! 导入模块
//!
//! 解析教材文件，按词数切块后写入 documents 表

use crate::db;
use crate::error::AppError;
use crate::parser::{ParseQuality, ParseResult, ParserRouter, SectionData};
use rusqlite::Connection;
use serde::Serialize;
use std::path::Path;

/// 单个文件的导入结果
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub file: String,
    pub sections: usize,
    pub paragraphs: usize,
    pub documents: usize,
    pub quality: ParseQuality,
}

/// 文档块
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub title: String,
    pub text: String,
}

/// 把章节按段落边界切成不超过 `max_words` 词的块
///
/// 单个段落超过上限时独立成块；`max_words` 为 0 时不切分
pub fn chunk_section(section: &SectionData, max_words: usize) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_words = 0;

    for paragraph in &section.paragraphs {
        let words = paragraph.split_whitespace().count();
        if max_words > 0 && !current.is_empty() && current_words + words > max_words {
            chunks.push(Chunk {
                title: section.title.clone(),
                text: current.join("\n\n"),
            });
            current.clear();
            current_words = 0;
        }
        current.push(paragraph);
        current_words += words;
    }

    if !current.is_empty() {
        chunks.push(Chunk {
            title: section.title.clone(),
            text: current.join("\n\n"),
        });
    }

    chunks
}

/// 路由并解析单个文件，不写数据库
fn parse_file(router: &ParserRouter, file_path: &Path) -> Result<ParseResult, AppError> {
    if !file_path.is_file() {
        return Err(AppError::Parse(format!("文件不存在: {}", file_path.display())));
    }

    let parser = router.route(file_path).map_err(AppError::Parse)?;
    parser.parse(file_path).map_err(AppError::Parse)
}

/// 把一个文件的解析结果切块写入
fn store_parsed(
    conn: &Connection,
    source: &str,
    result: &ParseResult,
    chunk_words: usize,
) -> Result<IngestReport, AppError> {
    let mut documents = 0;
    for section in &result.sections {
        for chunk in chunk_section(section, chunk_words) {
            db::insert_document(conn, &chunk.title, &chunk.text, Some(source))?;
            documents += 1;
        }
    }

    Ok(IngestReport {
        file: source.to_string(),
        sections: result.sections.len(),
        paragraphs: result.total_paragraphs,
        documents,
        quality: result.quality.clone(),
    })
}

/// 批量导入
///
/// 先解析全部文件，任何一个失败都不改动数据库；
/// 清空（`replace` 为真时）和所有写入在同一个事务里提交
///
/// # 参数
/// - `conn`: 数据库连接
/// - `files`: 教材文件
/// - `chunk_words`: 每块最大词数
/// - `replace`: 是否先清空文档表
///
/// # 返回
/// 每个文件的导入统计
pub fn ingest_files(
    conn: &mut Connection,
    files: &[impl AsRef<Path>],
    chunk_words: usize,
    replace: bool,
) -> Result<Vec<IngestReport>, AppError> {
    let router = ParserRouter::new();
    let parsed = files
        .iter()
        .map(|f| {
            let path = f.as_ref();
            parse_file(&router, path).map(|result| (path.to_string_lossy().to_string(), result))
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    let tx = conn.transaction()?;
    if replace {
        let removed = db::clear_documents(&tx)?;
        tracing::info!(removed, "已清空文档表");
    }

    let mut reports = Vec::with_capacity(parsed.len());
    for (source, result) in &parsed {
        reports.push(store_parsed(&tx, source, result, chunk_words)?);
    }
    tx.commit()?;

    for report in &reports {
        tracing::info!(
            file = %report.file,
            sections = report.sections,
            paragraphs = report.paragraphs,
            documents = report.documents,
            quality = ?report.quality,
            "教材导入完成"
        );
    }

    Ok(reports)
}
