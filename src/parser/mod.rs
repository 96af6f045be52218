use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

// 子模块声明
pub mod chapter_detector;
pub mod md_parser;
pub mod txt_parser;

/// 解析质量等级
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseQuality {
    /// 原生结构（如 Markdown 标题）
    Native,
    /// 文本可提取但结构靠推断（如 TXT）
    Light,
}

/// 章节数据
///
/// 解析后的一个章节：标题加若干段落
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionData {
    pub title: String,
    pub paragraphs: Vec<String>,
}

impl SectionData {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            paragraphs: Vec::new(),
        }
    }
}

/// 解析结果
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub sections: Vec<SectionData>,
    pub total_paragraphs: usize,
    pub quality: ParseQuality,
}

impl ParseResult {
    pub fn new(sections: Vec<SectionData>, quality: ParseQuality) -> Self {
        let total_paragraphs = sections.iter().map(|s| s.paragraphs.len()).sum();
        Self {
            sections,
            total_paragraphs,
            quality,
        }
    }
}

/// Parser trait
///
/// 所有格式解析器必须实现此 trait
pub trait Parser: Send + Sync {
    /// 解析文件
    ///
    /// # 参数
    /// - `file_path`: 要解析的文件路径
    ///
    /// # 返回
    /// 解析结果，包含章节和质量信息
    fn parse(&self, file_path: &Path) -> Result<ParseResult, String>;

    /// 获取解析质量等级
    fn get_quality(&self) -> ParseQuality;

    /// 获取支持的文件扩展名列表
    fn supported_extensions(&self) -> Vec<&str>;
}

/// 没有标题时使用的章节名
pub(crate) fn default_title(file_path: &Path) -> String {
    file_path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("全文")
        .to_string()
}

/// Parser 路由器
///
/// 根据文件扩展名路由到对应的解析器
pub struct ParserRouter {
    /// 扩展名到解析器的映射
    parsers: HashMap<String, Arc<dyn Parser>>,
}

impl ParserRouter {
    /// 创建新的路由器实例
    ///
    /// 注册所有可用的解析器
    pub fn new() -> Self {
        let mut router = Self {
            parsers: HashMap::new(),
        };

        router.register(Arc::new(txt_parser::TxtParser::new()));
        router.register(Arc::new(md_parser::MarkdownParser::new()));

        router
    }

    fn register(&mut self, parser: Arc<dyn Parser>) {
        for ext in parser.supported_extensions() {
            self.parsers.insert(ext.to_string(), Arc::clone(&parser));
        }
    }

    /// 根据文件路径路由到对应的解析器
    ///
    /// # 返回
    /// 对应的解析器引用，如果不支持该格式则返回错误
    pub fn route(&self, file_path: &Path) -> Result<&dyn Parser, String> {
        let ext = file_path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or("无法识别文件扩展名")?
            .to_lowercase();

        self.parsers
            .get(&ext)
            .map(|p| p.as_ref())
            .ok_or(format!("不支持的文件格式: {}", ext))
    }

    /// 获取所有支持的文件扩展名
    pub fn supported_extensions(&self) -> Vec<String> {
        let mut exts: Vec<String> = self.parsers.keys().cloned().collect();
        exts.sort();
        exts
    }
}

impl Default for ParserRouter {
    fn default() -> Self {
        Self::new()
    }
}
