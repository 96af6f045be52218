use crate::retrieval::types::ScoredDocument;
use crate::retrieval::vectorizer::TfidfIndex;
use std::cmp::Ordering;

/// Scoring Engine
/// 计算查询与索引中每个文档的余弦相似度
#[derive(Debug, Clone)]
pub struct ScoringEngine;

impl ScoringEngine {
    pub fn new() -> Self {
        Self
    }

    /// 计算查询的文档得分
    ///
    /// # 参数
    /// - `index`: TF-IDF 索引
    /// - `query`: 查询文本
    ///
    /// # 返回
    /// 非零得分，按得分降序；得分相同的保持索引顺序
    pub fn get_scores(&self, index: &TfidfIndex, query: &str) -> Vec<ScoredDocument> {
        let query_vector = index.vectorizer().transform(query);
        if query_vector.is_empty() {
            return Vec::new();
        }

        let mut scores: Vec<ScoredDocument> = index
            .iter()
            .filter_map(|(position, doc_id, vector)| {
                // 文档向量和查询向量都已归一化，点积即余弦相似度
                let score = vector.dot(&query_vector);
                (score > 0.0).then_some(ScoredDocument {
                    index: position,
                    doc_id,
                    score,
                })
            })
            .collect();

        scores.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scores
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Document;

    fn build_index(texts: &[&str]) -> TfidfIndex {
        let docs: Vec<Document> = texts
            .iter()
            .enumerate()
            .map(|(i, text)| Document {
                id: (i as i64) + 1,
                title: String::new(),
                text: text.to_string(),
                ingested_at: String::new(),
            })
            .collect();
        TfidfIndex::build(&docs)
    }

    #[test]
    fn test_scores_sorted_and_nonzero() {
        let index = build_index(&[
            "fats store energy in the body",
            "protein is made of amino acids",
            "protein and energy needs of athletes",
        ]);
        let engine = ScoringEngine::new();
        let scores = engine.get_scores(&index, "protein energy");

        // 第一篇只含 energy，第二篇只含 protein，第三篇两者都有
        assert_eq!(scores.len(), 3);
        assert_eq!(scores[0].doc_id, 3);
        assert!(scores.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(scores.iter().all(|s| s.score > 0.0 && s.score <= 1.0 + 1e-12));
    }

    #[test]
    fn test_unrelated_documents_excluded() {
        let index = build_index(&["vitamin c citrus", "calcium bones"]);
        let scores = ScoringEngine::new().get_scores(&index, "citrus fruit");
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].doc_id, 1);
        assert_eq!(scores[0].index, 0);
    }

    #[test]
    fn test_ties_keep_index_order() {
        let index = build_index(&["water hydration", "other topic", "water hydration"]);
        let scores = ScoringEngine::new().get_scores(&index, "water");
        let ids: Vec<i64> = scores.iter().map(|s| s.doc_id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_out_of_vocabulary_query() {
        let index = build_index(&["vitamin c citrus"]);
        assert!(ScoringEngine::new().get_scores(&index, "quantum").is_empty());
        assert!(ScoringEngine::new().get_scores(&index, "").is_empty());
    }
}
