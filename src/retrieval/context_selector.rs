use crate::retrieval::types::ScoredDocument;

/// Context Selector
/// 从排好序的得分中选出交给答案抽取的文档
///
/// 先取前 k 个，按总和归一化；依次累加，累计值已超过 p 时停止。
/// 只要存在正得分，至少会选中一个文档。
#[derive(Debug, Clone)]
pub struct ContextSelector {
    top_k: usize,
    cumulative_p: f64,
}

impl ContextSelector {
    pub fn new(top_k: usize, cumulative_p: f64) -> Self {
        Self { top_k, cumulative_p }
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn cumulative_p(&self) -> f64 {
        self.cumulative_p
    }

    /// 选择上下文
    ///
    /// # 参数
    /// - `scores`: 按得分降序排列的检索结果
    ///
    /// # 返回
    /// 被选中的文档，保持原顺序
    pub fn select(&self, scores: &[ScoredDocument]) -> Vec<ScoredDocument> {
        let top = &scores[..scores.len().min(self.top_k)];
        let sum: f64 = top.iter().map(|s| s.score).sum();
        if sum <= 0.0 {
            return Vec::new();
        }

        let mut selected = Vec::new();
        let mut total = 0.0;
        for scored in top {
            if total > self.cumulative_p {
                break;
            }
            selected.push(scored.clone());
            total += scored.score / sum;
        }

        selected
    }
}

impl Default for ContextSelector {
    fn default() -> Self {
        Self::new(5, 0.6)
    }
}
