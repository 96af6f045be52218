use super::*;
use super::chapter_detector::ChapterDetector;
use encoding_rs::*;
use std::fs;

/// TXT 解析器
///
/// 支持纯文本教材的解析，自动检测编码（UTF-8, GBK 等）
#[derive(Clone)]
pub struct TxtParser {
    detector: ChapterDetector,
}

impl TxtParser {
    /// 创建新的 TXT 解析器实例
    pub fn new() -> Self {
        Self {
            detector: ChapterDetector::new(),
        }
    }

    /// 检测文件编码
    ///
    /// # 参数
    /// - `bytes`: 文件字节数据
    ///
    /// # 返回
    /// 检测到的编码
    fn detect_encoding(&self, bytes: &[u8]) -> &'static Encoding {
        // 1. 检查 BOM (Byte Order Mark)
        if let Some((encoding, _bom_length)) = Encoding::for_bom(bytes) {
            return encoding;
        }

        // 2. 尝试 UTF-8 解码
        if std::str::from_utf8(bytes).is_ok() {
            return UTF_8;
        }

        // 3. 检测是否为 GBK
        if self.looks_like_gbk(bytes) {
            return GBK;
        }

        // 4. 默认使用 UTF-8
        UTF_8
    }

    /// 检测字节序列是否像 GBK 编码
    ///
    /// GBK 编码特征：
    /// - 第一字节范围：0x81-0xFE
    /// - 第二字节范围：0x40-0xFE
    fn looks_like_gbk(&self, bytes: &[u8]) -> bool {
        let mut gbk_pairs = 0;
        let mut total_pairs = 0;

        let mut i = 0;
        while i < bytes.len().saturating_sub(1) {
            let b1 = bytes[i];
            let b2 = bytes[i + 1];

            if b1 < 0x80 {
                i += 1;
                continue;
            }

            total_pairs += 1;

            if (0x81..=0xFE).contains(&b1) && (0x40..=0xFE).contains(&b2) {
                gbk_pairs += 1;
                i += 2;
            } else {
                i += 1;
            }
        }

        // 超过 50% 的非 ASCII 字节对符合 GBK 规则，则认为是 GBK
        total_pairs > 0 && (gbk_pairs as f32 / total_pairs as f32) > 0.5
    }

    /// 解码字节为字符串
    fn decode(&self, bytes: &[u8]) -> String {
        let encoding = self.detect_encoding(bytes);
        let (content, encoding_used, had_errors) = encoding.decode(bytes);
        if had_errors {
            tracing::warn!(encoding = encoding_used.name(), "文件解码时出现错误，可能存在乱码");
        }
        content.into_owned()
    }

    /// 分割文本为段落
    ///
    /// 根据空行分割段落，段内换行合并为空格。
    /// 标题行总是单独成段，不与上下文合并
    fn split_into_paragraphs(&self, content: &str) -> Vec<String> {
        let mut paragraphs = Vec::new();
        let mut current_paragraph = String::new();

        for line in content.lines() {
            let trimmed = line.trim();

            if trimmed.is_empty() {
                if !current_paragraph.is_empty() {
                    paragraphs.push(std::mem::take(&mut current_paragraph));
                }
            } else if self.detector.is_heading(trimmed) {
                if !current_paragraph.is_empty() {
                    paragraphs.push(std::mem::take(&mut current_paragraph));
                }
                paragraphs.push(trimmed.to_string());
            } else {
                if !current_paragraph.is_empty() {
                    current_paragraph.push(' ');
                }
                current_paragraph.push_str(trimmed);
            }
        }

        if !current_paragraph.is_empty() {
            paragraphs.push(current_paragraph);
        }

        paragraphs
    }

    /// 解析文本内容为章节
    fn parse_content(&self, content: &str, fallback_title: &str) -> Vec<SectionData> {
        let paragraphs = self.split_into_paragraphs(content);
        self.detector.detect(&paragraphs, fallback_title)
    }
}

impl Parser for TxtParser {
    fn parse(&self, file_path: &Path) -> Result<ParseResult, String> {
        let bytes = fs::read(file_path)
            .map_err(|e| format!("读取文件失败: {}", e))?;

        let content = self.decode(&bytes);
        let sections = self.parse_content(&content, &default_title(file_path));

        Ok(ParseResult::new(sections, ParseQuality::Light))
    }

    fn get_quality(&self) -> ParseQuality {
        ParseQuality::Light
    }

    fn supported_extensions(&self) -> Vec<&str> {
        vec!["txt"]
    }
}

impl Default for TxtParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_txt_parser_creation() {
        let parser = TxtParser::new();
        assert_eq!(parser.get_quality(), ParseQuality::Light);
        assert_eq!(parser.supported_extensions(), vec!["txt"]);
    }

    #[test]
    fn test_detect_utf8_encoding() {
        let parser = TxtParser::new();
        assert_eq!(parser.detect_encoding("测试文本".as_bytes()), UTF_8);
        assert_eq!(parser.detect_encoding(b"Hello World"), UTF_8); // ASCII 兼容 UTF-8
    }

    #[test]
    fn test_looks_like_gbk() {
        let parser = TxtParser::new();

        // GBK 编码的 "测试" (0xB2E2 0xCAD4)
        let gbk_bytes = vec![0xB2, 0xE2, 0xCA, 0xD4];
        assert!(parser.looks_like_gbk(&gbk_bytes));
        assert_eq!(parser.detect_encoding(&gbk_bytes), GBK);
        assert_eq!(parser.decode(&gbk_bytes), "测试");

        assert!(!parser.looks_like_gbk(b"This is a test"));
    }

    #[test]
    fn test_split_into_paragraphs() {
        let parser = TxtParser::new();
        let content = "Protein is built from amino acids.\nThere are twenty of them.\n\n\n\nFats store energy.\n\n";
        let paragraphs = parser.split_into_paragraphs(content);

        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0], "Protein is built from amino acids. There are twenty of them.");
        assert_eq!(paragraphs[1], "Fats store energy.");
    }

    #[test]
    fn test_only_whitespace() {
        let parser = TxtParser::new();
        assert!(parser.split_into_paragraphs("   \n\n   \n   ").is_empty());
        assert!(parser.split_into_paragraphs("").is_empty());
    }

    #[test]
    fn test_parse_file_with_chapters() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nutrition.txt");
        fs::write(
            &path,
            "About this book.\n\nChapter 1 Basic Concepts\n\nNutrition is the science of food.\n\n1.1 Calories\n\nA calorie is a unit of energy.\n",
        )
        .unwrap();

        let result = TxtParser::new().parse(&path).unwrap();
        assert_eq!(result.quality, ParseQuality::Light);
        assert_eq!(result.sections.len(), 3);
        assert_eq!(result.sections[0].title, "nutrition");
        assert_eq!(result.sections[1].title, "Chapter 1 Basic Concepts");
        assert_eq!(result.sections[2].paragraphs, vec!["A calorie is a unit of energy."]);
        assert_eq!(result.total_paragraphs, 3);
    }

    #[test]
    fn test_heading_line_directly_above_body() {
        let parser = TxtParser::new();
        let paragraphs = parser.split_into_paragraphs(
            "Chapter 1 Water\nWater regulates body temperature.\n1.1 Electrolytes\nSodium carries a charge.\n",
        );
        assert_eq!(
            paragraphs,
            vec![
                "Chapter 1 Water",
                "Water regulates body temperature.",
                "1.1 Electrolytes",
                "Sodium carries a charge.",
            ]
        );

        let sections = parser.parse_content("Chapter 1 Water\nWater regulates body temperature.\n", "book");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Chapter 1 Water");
        assert_eq!(sections[0].paragraphs, vec!["Water regulates body temperature."]);
    }

    #[test]
    fn test_body_line_starting_with_number_is_kept() {
        let parser = TxtParser::new();
        let sections = parser.parse_content("Part 2 of the meal is dessert.\nIt follows the main course.\n", "book");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "book");
        assert_eq!(
            sections[0].paragraphs,
            vec!["Part 2 of the meal is dessert. It follows the main course."]
        );
    }

    #[test]
    fn test_parse_missing_file() {
        let result = TxtParser::new().parse(Path::new("/nonexistent/book.txt"));
        assert!(result.unwrap_err().contains("读取文件失败"));
    }
}
