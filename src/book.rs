use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 默认示例标识
pub const DEFAULT_EXAMPLE: &str = "health_education";

/// 示例标识
///
/// 用于选择教材的配置、封面和数据库目录，因此只允许 ASCII 字母数字、`_` 和 `-`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExampleId(String);

impl ExampleId {
    pub fn parse(value: &str) -> Result<Self, AppError> {
        let valid = !value.is_empty()
            && value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

        if valid {
            Ok(Self(value.to_string()))
        } else {
            Err(AppError::InvalidExample(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ExampleId {
    fn default() -> Self {
        Self(DEFAULT_EXAMPLE.to_string())
    }
}

impl fmt::Display for ExampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ExampleId {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ExampleId> for String {
    fn from(id: ExampleId) -> Self {
        id.0
    }
}

/// 书籍配置（book-config.json）
///
/// 只读，启动时加载一次
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookConfig {
    /// 教材链接，原样作为超链接目标
    pub book_link: String,
    /// 教材名称，原样作为链接文本
    pub book_name: String,
}

impl BookConfig {
    /// 从 JSON 文本解析，未知字段忽略
    pub fn from_json(content: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(content)?)
    }
}
