// 检索模块
// TF-IDF 索引 + 余弦相似度 + 累计阈值选择上下文

pub mod types;
pub mod tokenizer;
pub mod vectorizer;
pub mod scoring_engine;
pub mod context_selector;
pub mod retriever;

#[cfg(test)]
mod integration_tests;

// 重新导出主要类型
pub use types::*;
pub use tokenizer::Tokenizer;
pub use vectorizer::{TfidfIndex, TfidfVectorizer};
pub use scoring_engine::ScoringEngine;
pub use context_selector::ContextSelector;
pub use retriever::Retriever;
