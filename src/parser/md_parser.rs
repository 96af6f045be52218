use super::*;
use pulldown_cmark::{Event, HeadingLevel, Options, Parser as MdParser, Tag};
use std::fs;

/// 开启新章节的最深标题层级（H1-H3）
const SECTION_HEADING_DEPTH: usize = 3;

/// Markdown 解析器
///
/// H1-H3 作为章节标题，段落、列表项和代码块作为段落，
/// 表格每行合并为一个段落（单元格以 ` | ` 分隔）
#[derive(Clone)]
pub struct MarkdownParser;

impl MarkdownParser {
    /// 创建新的 Markdown 解析器实例
    pub fn new() -> Self {
        Self
    }

    /// 解析 Markdown 内容为章节列表
    ///
    /// # 参数
    /// - `content`: Markdown 文本内容
    /// - `fallback_title`: 第一个标题之前内容的章节名
    ///
    /// # 返回
    /// 章节数据列表，不含空章节
    fn parse_markdown(&self, content: &str, fallback_title: &str) -> Vec<SectionData> {
        let mut sections: Vec<SectionData> = Vec::new();
        let mut current = SectionData::new(fallback_title);
        let mut current_text = String::new();
        let mut row_cells: Vec<String> = Vec::new();
        let mut heading_level = 0;

        for event in MdParser::new_ext(content, Options::ENABLE_TABLES) {
            match event {
                Event::Start(Tag::Heading(level, _, _)) => {
                    heading_level = heading_depth(level);
                    current_text.clear();
                }
                Event::End(Tag::Heading(_, _, _)) => {
                    let title = current_text.trim().to_string();
                    if heading_level <= SECTION_HEADING_DEPTH {
                        let finished = std::mem::replace(&mut current, SectionData::new(title));
                        if !finished.paragraphs.is_empty() {
                            sections.push(finished);
                        }
                    } else if !title.is_empty() {
                        // H4-H6 作为普通段落保留
                        current.paragraphs.push(title);
                    }
                    current_text.clear();
                }
                Event::Start(Tag::Paragraph)
                | Event::Start(Tag::CodeBlock(_))
                | Event::Start(Tag::TableCell) => {
                    current_text.clear();
                }
                Event::End(Tag::TableCell) => {
                    row_cells.push(current_text.trim().to_string());
                    current_text.clear();
                }
                Event::End(Tag::TableHead) | Event::End(Tag::TableRow) => {
                    if row_cells.iter().any(|c| !c.is_empty()) {
                        current.paragraphs.push(row_cells.join(" | "));
                    }
                    row_cells.clear();
                }
                // 紧凑列表的嵌套子列表开始前，先收起父列表项的文本
                Event::Start(Tag::List(_))
                | Event::End(Tag::Paragraph)
                | Event::End(Tag::CodeBlock(_))
                | Event::End(Tag::Item) => {
                    let text = current_text.trim();
                    if !text.is_empty() {
                        current.paragraphs.push(text.to_string());
                    }
                    current_text.clear();
                }
                Event::Text(text) | Event::Code(text) => {
                    current_text.push_str(&text);
                }
                Event::SoftBreak | Event::HardBreak => {
                    current_text.push(' ');
                }
                _ => {}
            }
        }

        if !current.paragraphs.is_empty() {
            sections.push(current);
        }

        sections
    }
}

fn heading_depth(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

impl Parser for MarkdownParser {
    fn parse(&self, file_path: &Path) -> Result<ParseResult, String> {
        let content = fs::read_to_string(file_path)
            .map_err(|e| format!("读取文件失败: {}", e))?;

        let sections = self.parse_markdown(&content, &default_title(file_path));
        Ok(ParseResult::new(sections, ParseQuality::Native))
    }

    fn get_quality(&self) -> ParseQuality {
        ParseQuality::Native
    }

    fn supported_extensions(&self) -> Vec<&str> {
        vec!["md", "markdown"]
    }
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}
