//! 页面渲染
//!
//! 静态信息面板（标题、教材介绍、封面）加上问答表单。
//! 所有插值都经过 HTML 转义；不含特殊字符的值原样输出。

use crate::asset_manager::CoverAsset;
use crate::book::{BookConfig, ExampleId};
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write as _;

pub const PAGE_TITLE: &str = "TextbookQA";

/// 页面上下文
///
/// 启动时组装一次，此后只读
#[derive(Debug, Clone)]
pub struct PageContext {
    pub example: ExampleId,
    pub book: BookConfig,
    /// 封面 data URI
    pub cover_src: String,
}

impl PageContext {
    pub fn new(example: ExampleId, book: BookConfig, cover: &CoverAsset) -> Self {
        Self {
            example,
            book,
            cover_src: cover.data_uri(),
        }
    }
}

/// 问答表单状态
#[derive(Debug, Clone, Default)]
pub struct QaFormState {
    pub question: String,
    pub answer: Option<String>,
    pub section: Option<String>,
}

/// 渲染完整页面
pub fn render_page(ctx: &PageContext, form: &QaFormState) -> String {
    let mut html = String::with_capacity(ctx.cover_src.len() + 4096);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{}</title>", PAGE_TITLE);
    html.push_str("</head>\n<body>\n<div class=\"App\">\n<div class=\"ui container\" style=\"margin-top: 40px\">\n");
    html.push_str(&render_panel(ctx));
    html.push_str(&render_qa_form(&ctx.example, form));
    html.push_str("</div>\n</div>\n</body>\n</html>\n");

    html
}

/// 渲染信息面板：标题、介绍段落和封面
pub fn render_panel(ctx: &PageContext) -> String {
    let mut html = String::new();

    html.push_str("<div>\n");
    let _ = writeln!(html, "<h1 class=\"ui header\">{}</h1>", PAGE_TITLE);
    let _ = writeln!(
        html,
        "<p>Welcome to TextbookQA, a question answering demo for extracting answers from \
         textbooks. This demo is based on the textbook, {} (source: openbooks). Input a \
         respective question and receive the answer and the relevant section.</p>",
        render_book_link(&ctx.book)
    );
    let _ = writeln!(
        html,
        "<img src=\"{}\" style=\"margin: 40px; height: 400px\" alt=\"textbook cover\">",
        encode_double_quoted_attribute(&ctx.cover_src)
    );
    html.push_str("</div>\n");

    html
}

/// 渲染教材链接
pub fn render_book_link(book: &BookConfig) -> String {
    format!(
        "<a target=\"_blank\" rel=\"noopener noreferrer\" href=\"{}\">{}</a>",
        encode_double_quoted_attribute(&book.book_link),
        encode_text(&book.book_name)
    )
}

/// 渲染问答表单
///
/// 表单只接收示例标识这一个参数，其余均为提交后的状态
pub fn render_qa_form(example: &ExampleId, form: &QaFormState) -> String {
    let example_attr = encode_double_quoted_attribute(example.as_str());
    let mut html = String::new();

    let _ = writeln!(
        html,
        "<form class=\"qa-form ui form\" method=\"post\" action=\"/ask\" data-example=\"{}\">",
        example_attr
    );
    let _ = writeln!(
        html,
        "<input type=\"hidden\" name=\"example\" value=\"{}\">",
        example_attr
    );
    let _ = writeln!(
        html,
        "<input type=\"text\" name=\"question\" placeholder=\"Input a question here\" value=\"{}\">",
        encode_double_quoted_attribute(&form.question)
    );
    html.push_str("<button class=\"ui button\" type=\"submit\">Submit</button>\n");

    if let Some(answer) = &form.answer {
        let _ = writeln!(
            html,
            "<div class=\"qa-answer\"><strong>Answer:</strong> {}</div>",
            encode_text(answer)
        );
    }
    if let Some(section) = &form.section {
        html.push_str("<div class=\"qa-section-label\"><strong>Most Relevant Section:</strong></div>\n");
        let _ = writeln!(
            html,
            "<div class=\"qa-section\" style=\"background: yellow\">{}</div>",
            encode_text(section)
        );
    }

    html.push_str("</form>\n");
    html
}
