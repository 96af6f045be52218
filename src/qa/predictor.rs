use crate::qa::extractor::{SpanExtractor, SpanPrediction, PAD_TOKEN};
use crate::retrieval::Context;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// 没有检索到任何章节时的回答
pub const NO_MATCH_ANSWER: &str = "could not find a section which matched query";
/// 没有检索到任何章节时的章节内容
pub const NO_SECTION: &str = "N/A";
/// 所有候选都无法给出答案
pub const UNANSWERABLE: &str = "unanswerable";

/// 问答结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub answer: String,
    /// 答案所在章节的正文
    pub section: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_title: Option<String>,
}

impl Prediction {
    fn no_match() -> Self {
        Self {
            answer: NO_MATCH_ANSWER.to_string(),
            section: NO_SECTION.to_string(),
            section_title: None,
        }
    }
}

/// 答案预测器
///
/// 对每个上下文调用抽取器，按 start_prob + end_prob 降序依次尝试，
/// 取第一个有效答案
pub struct AnswerPredictor {
    extractor: Box<dyn SpanExtractor>,
}

impl AnswerPredictor {
    pub fn new(extractor: Box<dyn SpanExtractor>) -> Self {
        Self { extractor }
    }

    pub fn extractor_name(&self) -> &str {
        self.extractor.name()
    }

    /// 预测答案
    ///
    /// # 参数
    /// - `contexts`: 检索到的上下文
    /// - `question`: 问题
    ///
    /// # 返回
    /// 答案和对应章节；没有上下文时返回固定的未匹配结果
    pub fn predict(&self, contexts: &[Context], question: &str) -> Prediction {
        if contexts.is_empty() {
            return Prediction::no_match();
        }

        let predictions: Vec<SpanPrediction> = contexts
            .iter()
            .map(|c| self.extractor.predict(question, &c.text))
            .collect();

        let mut order: Vec<usize> = (0..predictions.len()).collect();
        order.sort_by(|&a, &b| {
            predictions[b]
                .confidence()
                .partial_cmp(&predictions[a].confidence())
                .unwrap_or(Ordering::Equal)
        });

        let mut last = order[0];
        for &i in &order {
            last = i;
            if let Some(answer) = predictions[i].answer_text() {
                if !answer.trim().is_empty() && !answer.contains(PAD_TOKEN) {
                    return Prediction {
                        answer,
                        section: contexts[i].text.clone(),
                        section_title: Some(contexts[i].title.clone()),
                    };
                }
            }
        }

        Prediction {
            answer: UNANSWERABLE.to_string(),
            section: contexts[last].text.clone(),
            section_title: Some(contexts[last].title.clone()),
        }
    }
}
