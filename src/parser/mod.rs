use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

// 子模块声明
pub mod docx_parser;
pub mod pdf_parser;
pub mod txt_parser;

/// PDF 媒体类型
pub const MEDIA_TYPE_PDF: &str = "application/pdf";
/// DOCX 媒体类型
pub const MEDIA_TYPE_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
/// 纯文本媒体类型
pub const MEDIA_TYPE_TXT: &str = "text/plain";

/// 文本提取错误
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("format de fichier non pris en charge: {0}")]
    UnsupportedMediaType(String),
    #[error("extension de fichier introuvable")]
    UnknownExtension,
    #[error("extraction PDF impossible: {0}")]
    Pdf(String),
    #[error("extraction DOCX impossible: {0}")]
    Docx(String),
    #[error("lecture du fichier impossible: {0}")]
    Io(#[from] std::io::Error),
    #[error("aucun texte n'a pu être extrait du document")]
    NoText,
}

/// Extractor trait
///
/// 所有格式的文本提取器必须实现此 trait。
/// 提取结果总是一个完整的 UTF-8 字符串，不保留任何文档结构。
pub trait Extractor: Send + Sync {
    /// 从字节流中提取纯文本
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError>;

    /// 支持的媒体类型列表
    fn media_types(&self) -> Vec<&str>;

    /// 支持的文件扩展名列表
    fn supported_extensions(&self) -> Vec<&str>;
}

/// Extractor 路由器
///
/// 根据媒体类型（或文件扩展名）路由到对应的提取器
pub struct ExtractorRouter {
    /// 媒体类型到提取器的映射
    by_media_type: HashMap<String, Arc<dyn Extractor>>,
    /// 扩展名到媒体类型的映射
    extension_media_types: HashMap<String, String>,
}

impl ExtractorRouter {
    /// 创建新的路由器实例
    ///
    /// 注册所有可用的提取器
    pub fn new() -> Self {
        let mut router = Self {
            by_media_type: HashMap::new(),
            extension_media_types: HashMap::new(),
        };

        router.register(Arc::new(pdf_parser::PdfExtractor::new()));
        router.register(Arc::new(docx_parser::DocxExtractor::new()));
        router.register(Arc::new(txt_parser::TxtExtractor::new()));

        router
    }

    fn register(&mut self, extractor: Arc<dyn Extractor>) {
        let primary = extractor.media_types().first().map(|m| m.to_string());

        for media_type in extractor.media_types() {
            self.by_media_type
                .insert(media_type.to_string(), Arc::clone(&extractor));
        }

        if let Some(primary) = primary {
            for ext in extractor.supported_extensions() {
                self.extension_media_types
                    .insert(ext.to_string(), primary.clone());
            }
        }
    }

    /// 根据媒体类型路由到对应的提取器
    ///
    /// 媒体类型比较时忽略大小写和参数部分（如 `; charset=utf-8`）
    pub fn route(&self, media_type: &str) -> Result<&dyn Extractor, ExtractError> {
        let essence = media_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_lowercase();

        self.by_media_type
            .get(&essence)
            .map(|e| e.as_ref())
            .ok_or_else(|| ExtractError::UnsupportedMediaType(media_type.to_string()))
    }

    /// 根据文件扩展名推断媒体类型
    pub fn media_type_for_path(&self, path: &Path) -> Result<&str, ExtractError> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or(ExtractError::UnknownExtension)?
            .to_lowercase();

        self.extension_media_types
            .get(&ext)
            .map(|m| m.as_str())
            .ok_or(ExtractError::UnsupportedMediaType(ext))
    }

    /// 提取文档文本
    ///
    /// 只包含空白的结果视为提取失败
    pub fn extract(&self, bytes: &[u8], media_type: &str) -> Result<String, ExtractError> {
        let extractor = self.route(media_type)?;
        let text = extractor.extract(bytes)?;

        if text.trim().is_empty() {
            return Err(ExtractError::NoText);
        }

        Ok(text)
    }

    /// 读取文件并提取文本
    ///
    /// # 参数
    /// - `path`: 文档路径
    /// - `media_type`: 显式指定的媒体类型，缺省时按扩展名推断
    pub fn extract_file(&self, path: &Path, media_type: Option<&str>) -> Result<String, ExtractError> {
        let media_type = match media_type {
            Some(media_type) => media_type.to_string(),
            None => self.media_type_for_path(path)?.to_string(),
        };

        let bytes = std::fs::read(path)?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), media_type = %media_type, "读取文档");

        self.extract(&bytes, &media_type)
    }
}

impl Default for ExtractorRouter {
    fn default() -> Self {
        Self::new()
    }
}
