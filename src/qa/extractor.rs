use crate::retrieval::Tokenizer;
use std::collections::HashSet;

/// 模型输入的最大序列长度
pub const MAX_SEQ_LEN: usize = 512;

/// 特殊标记占用的长度
const SPECIAL_TOKENS_RESERVED: usize = 9;

/// 填充标记，出现在答案中说明预测落在了填充区
pub const PAD_TOKEN: &str = "<pad>";

/// 答案片段预测
///
/// `start`/`end` 是 `tokens` 上的下标，`end` 不包含
#[derive(Debug, Clone, PartialEq)]
pub struct SpanPrediction {
    pub tokens: Vec<String>,
    pub start: usize,
    pub start_prob: f64,
    pub end: usize,
    pub end_prob: f64,
}

impl SpanPrediction {
    /// 无答案的预测（start > end）
    pub fn empty(tokens: Vec<String>) -> Self {
        Self {
            tokens,
            start: 1,
            start_prob: 0.0,
            end: 0,
            end_prob: 0.0,
        }
    }

    /// 排序用的置信度
    pub fn confidence(&self) -> f64 {
        self.start_prob + self.end_prob
    }

    /// 取出答案文本
    ///
    /// start > end 时没有答案；start == end 时取单个词
    pub fn answer_text(&self) -> Option<String> {
        if self.start > self.end {
            return None;
        }
        let end = if self.start == self.end { self.end + 1 } else { self.end };
        let end = end.min(self.tokens.len());
        if self.start >= end {
            return None;
        }
        Some(self.tokens[self.start..end].join(" "))
    }
}

/// 答案抽取器
///
/// 神经模型等实现都挂在这个 trait 后面
pub trait SpanExtractor: Send + Sync {
    /// 在上下文中预测答案片段
    fn predict(&self, question: &str, context: &str) -> SpanPrediction;

    /// 抽取器名称（日志用）
    fn name(&self) -> &str;
}

/// 词重合抽取器
///
/// 把上下文切成句子，选与问题实词重合最多的句子作为答案
pub struct LexicalExtractor {
    tokenizer: Tokenizer,
    max_seq_len: usize,
}

impl LexicalExtractor {
    pub fn new() -> Self {
        Self {
            tokenizer: Tokenizer::new(),
            max_seq_len: MAX_SEQ_LEN,
        }
    }

    pub fn with_max_seq_len(max_seq_len: usize) -> Self {
        Self {
            tokenizer: Tokenizer::new(),
            max_seq_len,
        }
    }

    /// 上下文可用的最大词数
    fn context_budget(&self, question: &str) -> usize {
        let question_len = question.split_whitespace().count();
        self.max_seq_len
            .saturating_sub(question_len)
            .saturating_sub(SPECIAL_TOKENS_RESERVED)
    }

    /// 句子边界：以 . ? ! 结尾（可带引号或括号）的词结束一个句子
    fn sentence_spans(tokens: &[String]) -> Vec<(usize, usize)> {
        let mut spans = Vec::new();
        let mut start = 0;

        for (i, token) in tokens.iter().enumerate() {
            let trimmed = token.trim_end_matches(['"', '\'', ')', ']']);
            if trimmed.ends_with(['.', '?', '!']) {
                spans.push((start, i + 1));
                start = i + 1;
            }
        }
        if start < tokens.len() {
            spans.push((start, tokens.len()));
        }

        spans
    }

    fn overlap(&self, tokens: &[String], question_terms: &HashSet<String>) -> usize {
        let sentence_terms: HashSet<String> = tokens
            .iter()
            .flat_map(|t| self.tokenizer.tokenize(t))
            .collect();
        question_terms.intersection(&sentence_terms).count()
    }
}

impl SpanExtractor for LexicalExtractor {
    fn predict(&self, question: &str, context: &str) -> SpanPrediction {
        let tokens: Vec<String> = context
            .split_whitespace()
            .take(self.context_budget(question))
            .map(str::to_string)
            .collect();

        let question_terms = self.tokenizer.content_terms(question);
        if question_terms.is_empty() || tokens.is_empty() {
            return SpanPrediction::empty(tokens);
        }

        let mut best: Option<(usize, usize, usize)> = None;
        for (start, end) in Self::sentence_spans(&tokens) {
            let overlap = self.overlap(&tokens[start..end], &question_terms);
            if overlap > 0 && best.map_or(true, |(_, _, b)| overlap > b) {
                best = Some((start, end, overlap));
            }
        }

        match best {
            Some((start, end, overlap)) => SpanPrediction {
                start,
                end,
                start_prob: overlap as f64 / question_terms.len() as f64,
                end_prob: overlap as f64 / (end - start) as f64,
                tokens,
            },
            None => SpanPrediction::empty(tokens),
        }
    }

    fn name(&self) -> &str {
        "lexical"
    }
}

impl Default for LexicalExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_answer_text_rules() {
        let mut prediction = SpanPrediction {
            tokens: tokens("a calorie is a unit"),
            start: 1,
            start_prob: 0.5,
            end: 3,
            end_prob: 0.5,
        };
        assert_eq!(prediction.answer_text(), Some("calorie is".to_string()));

        // start == end 时取单个词
        prediction.end = 1;
        assert_eq!(prediction.answer_text(), Some("calorie".to_string()));

        // start > end 没有答案
        prediction.start = 2;
        assert_eq!(prediction.answer_text(), None);

        // 越界被截断
        let out_of_range = SpanPrediction {
            tokens: tokens("one two"),
            start: 1,
            start_prob: 0.0,
            end: 10,
            end_prob: 0.0,
        };
        assert_eq!(out_of_range.answer_text(), Some("two".to_string()));
        assert_eq!(SpanPrediction::empty(vec![]).answer_text(), None);
    }

    #[test]
    fn test_sentence_spans() {
        let spans = LexicalExtractor::sentence_spans(&tokens("One two. Three? (Four!) five"));
        assert_eq!(spans, vec![(0, 2), (2, 3), (3, 4), (4, 5)]);
    }

    #[test]
    fn test_predict_best_sentence() {
        let extractor = LexicalExtractor::new();
        let context = "Water regulates temperature. A calorie is a unit of energy. Fiber aids digestion.";
        let prediction = extractor.predict("What is a calorie?", context);

        assert_eq!(prediction.answer_text(), Some("A calorie is a unit of energy.".to_string()));
        assert_eq!(prediction.start_prob, 1.0);
        assert!(prediction.end_prob > 0.0 && prediction.end_prob < 1.0);
    }

    #[test]
    fn test_predict_no_overlap() {
        let extractor = LexicalExtractor::new();
        let prediction = extractor.predict("What about quantum physics?", "Water regulates temperature.");
        assert_eq!(prediction.answer_text(), None);
        assert_eq!(prediction.confidence(), 0.0);

        // 问题只有停用词
        let prediction = extractor.predict("What is it?", "It is water.");
        assert_eq!(prediction.answer_text(), None);
    }

    #[test]
    fn test_context_truncation() {
        // 预算：20 - 2 - 9 = 9 个词
        let extractor = LexicalExtractor::with_max_seq_len(20);
        let context = "one two three four five six seven eight nine. The calorie sentence comes too late.";
        let prediction = extractor.predict("calorie question", context);
        assert_eq!(prediction.tokens.len(), 9);
        assert_eq!(prediction.answer_text(), None);
    }
}
