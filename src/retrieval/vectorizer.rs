use crate::db::Document;
use crate::retrieval::tokenizer::Tokenizer;
use crate::retrieval::types::SparseVector;
use std::collections::{BTreeSet, HashMap, HashSet};

/// TF-IDF 向量化器
///
/// 词频为原始计数，idf 平滑：`ln((1 + n) / (1 + df)) + 1`，结果按行 L2 归一化。
/// 词表按字典序编号。
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    tokenizer: Tokenizer,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// 在语料上拟合词表和 idf
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Self {
        let tokenizer = Tokenizer::new();
        let n_docs = documents.len() as f64;

        let mut document_frequency: HashMap<String, usize> = HashMap::new();
        for doc in documents {
            let unique: HashSet<String> = tokenizer.tokenize(doc.as_ref()).into_iter().collect();
            for term in unique {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        let terms: BTreeSet<&String> = document_frequency.keys().collect();
        let mut vocabulary = HashMap::with_capacity(terms.len());
        let mut idf = Vec::with_capacity(terms.len());
        for (index, term) in terms.into_iter().enumerate() {
            let df = document_frequency[term] as f64;
            vocabulary.insert(term.clone(), index);
            idf.push(((1.0 + n_docs) / (1.0 + df)).ln() + 1.0);
        }

        Self {
            tokenizer,
            vocabulary,
            idf,
        }
    }

    /// 将文本转换为归一化的 TF-IDF 向量，词表外的词被忽略
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for token in self.tokenizer.tokenize(text) {
            if let Some(&index) = self.vocabulary.get(&token) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut vector = SparseVector::from_unsorted(
            counts
                .into_iter()
                .map(|(index, tf)| (index, tf * self.idf[index]))
                .collect(),
        );
        vector.normalize();
        vector
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// 查询某个词的 idf
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.vocabulary.get(term).map(|&index| self.idf[index])
    }

    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }
}

/// TF-IDF 索引
///
/// 启动时从 documents 表整体构建，之后只读
#[derive(Debug, Clone)]
pub struct TfidfIndex {
    vectorizer: TfidfVectorizer,
    doc_ids: Vec<i64>,
    vectors: Vec<SparseVector>,
}

impl TfidfIndex {
    pub fn build(documents: &[Document]) -> Self {
        let texts: Vec<&str> = documents.iter().map(|d| d.text.as_str()).collect();
        let vectorizer = TfidfVectorizer::fit(&texts);
        let vectors = texts.iter().map(|t| vectorizer.transform(t)).collect();
        let doc_ids = documents.iter().map(|d| d.id).collect();

        Self {
            vectorizer,
            doc_ids,
            vectors,
        }
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn len(&self) -> usize {
        self.doc_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_ids.is_empty()
    }

    /// 迭代 (位置, 文档 ID, 向量)
    pub fn iter(&self) -> impl Iterator<Item = (usize, i64, &SparseVector)> {
        self.doc_ids
            .iter()
            .zip(self.vectors.iter())
            .enumerate()
            .map(|(index, (&doc_id, vector))| (index, doc_id, vector))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: i64, text: &str) -> Document {
        Document {
            id,
            title: format!("doc {}", id),
            text: text.to_string(),
            ingested_at: String::new(),
        }
    }

    #[test]
    fn test_smoothed_idf() {
        let vectorizer = TfidfVectorizer::fit(&["apple banana", "apple cherry"]);
        assert_eq!(vectorizer.vocabulary_len(), 3);
        // apple 出现在全部文档中：ln(3/3) + 1
        assert!((vectorizer.idf("apple").unwrap() - 1.0).abs() < 1e-12);
        // banana 只出现一次：ln(3/2) + 1
        assert!((vectorizer.idf("banana").unwrap() - (1.5f64.ln() + 1.0)).abs() < 1e-12);
        assert!(vectorizer.idf("durian").is_none());
    }

    #[test]
    fn test_vocabulary_is_sorted() {
        let vectorizer = TfidfVectorizer::fit(&["zinc iron calcium"]);
        assert_eq!(vectorizer.term_index("calcium"), Some(0));
        assert_eq!(vectorizer.term_index("iron"), Some(1));
        assert_eq!(vectorizer.term_index("zinc"), Some(2));
    }

    #[test]
    fn test_transform_is_normalized() {
        let vectorizer = TfidfVectorizer::fit(&["apple banana", "apple cherry"]);
        let v = vectorizer.transform("Apple apple banana durian");
        assert_eq!(v.entries.len(), 2);
        assert!((v.norm() - 1.0).abs() < 1e-12);

        // 只含词表外的词
        assert!(vectorizer.transform("durian").is_empty());
    }

    #[test]
    fn test_index_build() {
        let docs = vec![doc(10, "protein amino acids"), doc(20, "fat lipids energy")];
        let index = TfidfIndex::build(&docs);
        assert_eq!(index.len(), 2);

        let ids: Vec<i64> = index.iter().map(|(_, id, _)| id).collect();
        assert_eq!(ids, vec![10, 20]);
    }

    #[test]
    fn test_empty_index() {
        let index = TfidfIndex::build(&[]);
        assert!(index.is_empty());
        assert_eq!(index.vectorizer().vocabulary_len(), 0);
        assert!(index.vectorizer().transform("anything").is_empty());
    }
}
