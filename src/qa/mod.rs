// 问答模块
// 检索上下文后交给答案抽取器

pub mod extractor;
pub mod predictor;

pub use extractor::{LexicalExtractor, SpanExtractor, SpanPrediction};
pub use predictor::{AnswerPredictor, Prediction, NO_MATCH_ANSWER, NO_SECTION, UNANSWERABLE};

use crate::db::DocumentStore;
use crate::error::AppError;
use crate::retrieval::Retriever;
use std::time::Instant;

/// 问答服务
pub struct QaService {
    retriever: Retriever,
    predictor: AnswerPredictor,
}

impl QaService {
    pub fn new(retriever: Retriever, predictor: AnswerPredictor) -> Self {
        Self { retriever, predictor }
    }

    /// 使用默认的词重合抽取器
    pub fn with_lexical(retriever: Retriever) -> Self {
        Self::new(retriever, AnswerPredictor::new(Box::new(LexicalExtractor::new())))
    }

    /// 索引中的文档数
    pub fn document_count(&self) -> usize {
        self.retriever.len()
    }

    /// 回答问题
    ///
    /// # 参数
    /// - `store`: 文档存储
    /// - `question`: 问题文本，不能为空
    pub fn answer<S: DocumentStore + ?Sized>(&self, store: &S, question: &str) -> Result<Prediction, AppError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AppError::EmptyQuestion);
        }

        let started = Instant::now();
        let contexts = self.retriever.get_contexts(store, question)?;
        let prediction = self.predictor.predict(&contexts, question);

        tracing::info!(
            contexts = contexts.len(),
            extractor = self.predictor.extractor_name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "问题已回答"
        );

        Ok(prediction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::retrieval::ContextSelector;
    use rusqlite::Connection;

    fn service_with(conn: &Connection) -> QaService {
        let retriever = Retriever::from_connection(conn, ContextSelector::default()).unwrap();
        QaService::with_lexical(retriever)
    }

    #[test]
    fn test_answer_from_database() {
        let conn = db::init_memory_db().unwrap();
        db::insert_document(&conn, "Calories", "Energy is measured in calories. A calorie is a unit of energy.", None).unwrap();
        db::insert_document(&conn, "Water", "Water regulates body temperature.", None).unwrap();

        let service = service_with(&conn);
        assert_eq!(service.document_count(), 2);

        let prediction = service.answer(&conn, "How is energy measured?").unwrap();
        assert_eq!(prediction.answer, "Energy is measured in calories.");
        assert_eq!(prediction.section_title.as_deref(), Some("Calories"));
    }

    #[test]
    fn test_empty_question_rejected() {
        let conn = db::init_memory_db().unwrap();
        let service = service_with(&conn);
        assert!(matches!(service.answer(&conn, "   "), Err(AppError::EmptyQuestion)));
    }

    #[test]
    fn test_no_matching_section() {
        let conn = db::init_memory_db().unwrap();
        db::insert_document(&conn, "Water", "Water regulates body temperature.", None).unwrap();

        let service = service_with(&conn);
        let prediction = service.answer(&conn, "quantum chromodynamics").unwrap();
        assert_eq!(prediction.answer, NO_MATCH_ANSWER);
        assert_eq!(prediction.section, NO_SECTION);
    }
}
