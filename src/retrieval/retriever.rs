use crate::db::{self, Document, DocumentStore};
use crate::error::AppError;
use crate::retrieval::context_selector::ContextSelector;
use crate::retrieval::scoring_engine::ScoringEngine;
use crate::retrieval::types::{Context, ScoredDocument};
use crate::retrieval::vectorizer::TfidfIndex;
use rusqlite::Connection;

/// Retriever
/// 索引打分 + 上下文选择 + 从数据库取回正文
pub struct Retriever {
    index: TfidfIndex,
    scorer: ScoringEngine,
    selector: ContextSelector,
}

impl Retriever {
    pub fn new(index: TfidfIndex, selector: ContextSelector) -> Self {
        Self {
            index,
            scorer: ScoringEngine::new(),
            selector,
        }
    }

    /// 从数据库中的全部文档构建
    pub fn from_connection(conn: &Connection, selector: ContextSelector) -> rusqlite::Result<Self> {
        let documents: Vec<Document> = db::get_all_documents(conn)?;
        let index = TfidfIndex::build(&documents);
        tracing::info!(
            documents = index.len(),
            vocabulary = index.vectorizer().vocabulary_len(),
            top_k = selector.top_k(),
            cumulative_p = selector.cumulative_p(),
            "TF-IDF 索引已构建"
        );
        Ok(Self::new(index, selector))
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// 全部非零得分，降序
    pub fn get_scores(&self, query: &str) -> Vec<ScoredDocument> {
        self.scorer.get_scores(&self.index, query)
    }

    /// 检索上下文
    ///
    /// # 参数
    /// - `store`: 文档存储，每篇选中的文档查询一次
    /// - `query`: 问题文本
    ///
    /// # 返回
    /// 被选中的文档正文；索引构建后被删除的文档会被跳过
    pub fn get_contexts<S: DocumentStore + ?Sized>(
        &self,
        store: &S,
        query: &str,
    ) -> Result<Vec<Context>, AppError> {
        let scores = self.get_scores(query);
        let selected = self.selector.select(&scores);

        let mut contexts = Vec::with_capacity(selected.len());
        for scored in selected {
            match store.fetch_document(scored.doc_id)? {
                Some(doc) => contexts.push(Context {
                    doc_id: doc.id,
                    title: doc.title,
                    text: doc.text,
                    score: scored.score,
                }),
                None => {
                    tracing::warn!(doc_id = scored.doc_id, "索引中的文档已不存在");
                }
            }
        }

        tracing::debug!(candidates = scores.len(), selected = contexts.len(), "检索完成");
        Ok(contexts)
    }
}
