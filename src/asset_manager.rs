use crate::book::{BookConfig, ExampleId};
use crate::error::AppError;
use base64::{engine::general_purpose, Engine as _};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// 书籍配置文件名
pub const BOOK_CONFIG_FILE: &str = "book-config.json";

/// 封面候选文件名，按顺序查找
const COVER_CANDIDATES: [&str; 4] = ["cover.png", "cover.jpg", "cover.jpeg", "cover.gif"];

/// 封面资源
#[derive(Debug, Clone)]
pub struct CoverAsset {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
    /// SHA256 十六进制摘要
    pub sha256: String,
}

impl CoverAsset {
    /// 转为 data URI，直接嵌入页面
    pub fn data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime,
            general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// 资产管理器
/// 负责按示例标识解析书籍配置和封面图片
pub struct AssetManager {
    books_dir: PathBuf,
}

impl AssetManager {
    pub fn new(books_dir: impl Into<PathBuf>) -> Self {
        Self {
            books_dir: books_dir.into(),
        }
    }

    /// 示例目录：`<books_dir>/<example>`
    pub fn example_dir(&self, example: &ExampleId) -> PathBuf {
        self.books_dir.join(example.as_str())
    }

    /// 读取书籍配置
    ///
    /// # 参数
    /// - `example`: 示例标识
    ///
    /// # 返回
    /// 解析后的 BookConfig，文件不存在或格式错误时返回错误
    pub fn load_book_config(&self, example: &ExampleId) -> Result<BookConfig, AppError> {
        let path = self.example_dir(example).join(BOOK_CONFIG_FILE);
        if !path.is_file() {
            return Err(AppError::MissingBookConfig(path));
        }

        let content = fs::read_to_string(&path)?;
        let config = BookConfig::from_json(&content)?;
        tracing::debug!(path = %path.display(), book = %config.book_name, "书籍配置已加载");
        Ok(config)
    }

    /// 读取封面图片
    ///
    /// 依次查找 cover.png / cover.jpg / cover.jpeg / cover.gif，
    /// 并根据文件头校验确实是可渲染的位图
    pub fn load_cover(&self, example: &ExampleId) -> Result<CoverAsset, AppError> {
        let dir = self.example_dir(example);
        let path = COVER_CANDIDATES
            .iter()
            .map(|name| dir.join(name))
            .find(|p| p.is_file())
            .ok_or_else(|| AppError::MissingAsset(format!("{}/cover.*", dir.display())))?;

        let bytes = fs::read(&path)?;
        let file_name = file_name_of(&path);
        let mime = detect_image_mime(&bytes).ok_or_else(|| AppError::InvalidAsset(file_name.clone()))?;
        let sha256 = hash_bytes(&bytes);

        tracing::debug!(file = %file_name, mime, size = bytes.len(), "封面已加载");

        Ok(CoverAsset {
            file_name,
            mime,
            bytes,
            sha256,
        })
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// 计算 SHA256 十六进制摘要
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// 根据文件头识别图片类型
pub fn detect_image_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("image/png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("image/gif")
    } else {
        None
    }
}
