use regex::Regex;
use std::collections::HashSet;

/// 英文停用词，只在答案抽取时用于计算问题词重合度
pub const STOP_WORDS: &[&str] = &[
    "about", "an", "and", "are", "as", "at", "be", "by", "can", "do", "does", "for", "from",
    "has", "have", "how", "in", "into", "is", "it", "its", "of", "on", "or", "that", "the",
    "their", "there", "these", "this", "to", "was", "were", "what", "when", "where", "which",
    "who", "why", "will", "with",
];

/// Tokenizer
/// 小写化后提取至少两个字符的词
#[derive(Debug, Clone)]
pub struct Tokenizer {
    token_regex: Regex,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            token_regex: Regex::new(r"\b\w\w+\b").unwrap(),
        }
    }

    /// 分词
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.token_regex
            .find_iter(&lowered)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// 去掉停用词后的词集合
    pub fn content_terms(&self, text: &str) -> HashSet<String> {
        self.tokenize(text)
            .into_iter()
            .filter(|t| !STOP_WORDS.contains(&t.as_str()))
            .collect()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize() {
        let tokenizer = Tokenizer::new();
        assert_eq!(
            tokenizer.tokenize("What is a Calorie? A unit of energy."),
            vec!["what", "is", "calorie", "unit", "of", "energy"]
        );
    }

    #[test]
    fn test_tokenize_unicode_and_digits() {
        let tokenizer = Tokenizer::new();
        assert_eq!(tokenizer.tokenize("Vitamin B12, café 2x"), vec!["vitamin", "b12", "café", "2x"]);
        assert!(tokenizer.tokenize("a b c !").is_empty());
    }

    #[test]
    fn test_content_terms() {
        let tokenizer = Tokenizer::new();
        let terms = tokenizer.content_terms("What is the role of fiber in digestion?");
        let mut sorted: Vec<_> = terms.into_iter().collect();
        sorted.sort();
        assert_eq!(sorted, vec!["digestion", "fiber", "role"]);
    }
}
