use regex::Regex;
use super::SectionData;

/// 标题行最大字符数，超过则视为正文
const MAX_HEADING_CHARS: usize = 80;

/// 以这些字符结尾的行是句子，不是标题
const SENTENCE_ENDINGS: [char; 7] = ['.', '!', '?', ',', ';', '。', '，'];

/// 章节检测器
///
/// 两层回退式章节识别：
/// 1. 显式识别：标题行开启新章节
/// 2. 线性模式：无法识别章节时，整篇作为单章节处理
#[derive(Debug, Clone)]
pub struct ChapterDetector {
    /// 章节标题匹配模式列表
    patterns: Vec<Regex>,
}

impl ChapterDetector {
    pub fn new() -> Self {
        let patterns = vec![
            // 中文章节标题
            Regex::new(r"^第[零一二三四五六七八九十百千万\d]+[章节]").unwrap(),
            // 英文章节标题
            Regex::new(r"^(?i:chapter|section|part|unit)\s+([\dIVXLC]+)\b").unwrap(),
            // 数字小节：1.1 Title、2.3.4 Title
            Regex::new(r"^\d+(\.\d+)+\s+\S").unwrap(),
        ];

        Self { patterns }
    }

    /// 判断单行文本是否为章节标题
    pub fn is_heading(&self, line: &str) -> bool {
        let text = line.trim();
        !text.is_empty()
            && text.chars().count() <= MAX_HEADING_CHARS
            && !text.ends_with(SENTENCE_ENDINGS)
            && self.patterns.iter().any(|p| p.is_match(text))
    }

    /// 把段落分组为章节
    ///
    /// 标题必须已经作为独立段落切出（见 TXT 解析器的分段）
    ///
    /// # 参数
    /// - `paragraphs`: 段落列表
    /// - `fallback_title`: 首个标题之前的内容（或无标题全文）使用的章节名
    ///
    /// # 返回
    /// 章节列表，不含空章节
    pub fn detect(&self, paragraphs: &[String], fallback_title: &str) -> Vec<SectionData> {
        let mut sections = Vec::new();
        let mut current = SectionData::new(fallback_title);

        for paragraph in paragraphs {
            if self.is_heading(paragraph) {
                let finished = std::mem::replace(&mut current, SectionData::new(paragraph.trim()));
                if !finished.paragraphs.is_empty() {
                    sections.push(finished);
                }
            } else {
                current.paragraphs.push(paragraph.clone());
            }
        }

        if !current.paragraphs.is_empty() {
            sections.push(current);
        }

        sections
    }
}

impl Default for ChapterDetector {
    fn default() -> Self {
        Self::new()
    }
}
