use serde::{Deserialize, Serialize};

/// 稀疏向量
///
/// 按词表下标升序存放 (下标, 权重)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    pub entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// 由无序条目构造，按下标排序
    pub fn from_unsorted(mut entries: Vec<(usize, f64)>) -> Self {
        entries.sort_by_key(|(index, _)| *index);
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// L2 归一化，零向量保持不变
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for (_, w) in self.entries.iter_mut() {
                *w /= norm;
            }
        }
    }

    /// 点积（两个向量均已排序）
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;

        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_w) = self.entries[i];
            let (b_idx, b_w) = other.entries[j];
            if a_idx == b_idx {
                sum += a_w * b_w;
                i += 1;
                j += 1;
            } else if a_idx < b_idx {
                i += 1;
            } else {
                j += 1;
            }
        }

        sum
    }
}

/// 检索得分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    /// 在索引中的位置
    pub index: usize,
    /// 数据库中的文档 ID
    pub doc_id: i64,
    pub score: f64,
}

/// 检索到的上下文
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Context {
    pub doc_id: i64,
    pub title: String,
    pub text: String,
    pub score: f64,
}
