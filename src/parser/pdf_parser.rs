use super::*;

/// PDF 提取器（基础版）
///
/// 支持纯文本 PDF 的提取，不支持扫描版 PDF
#[derive(Clone)]
pub struct PdfExtractor;

impl PdfExtractor {
    /// 创建新的 PDF 提取器实例
    pub fn new() -> Self {
        Self
    }

    /// 规范化提取结果
    ///
    /// 统一换行符并去掉首尾空白，页与页之间保留空行
    fn normalize(&self, text: &str) -> String {
        text.replace("\r\n", "\n")
            .replace('\u{c}', "\n\n")
            .trim()
            .to_string()
    }
}

impl Extractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        let text = pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ExtractError::Pdf(format!("{} (PDF scanné ou protégé ?)", e)))?;

        let text = self.normalize(&text);
        tracing::debug!(chars = text.chars().count(), "PDF 文本提取完成");

        Ok(text)
    }

    fn media_types(&self) -> Vec<&str> {
        vec![MEDIA_TYPE_PDF]
    }

    fn supported_extensions(&self) -> Vec<&str> {
        vec!["pdf"]
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_extractor_creation() {
        let extractor = PdfExtractor::new();
        assert_eq!(extractor.media_types(), vec![MEDIA_TYPE_PDF]);
        assert_eq!(extractor.supported_extensions(), vec!["pdf"]);
    }

    #[test]
    fn test_invalid_pdf_bytes() {
        let extractor = PdfExtractor::new();
        let result = extractor.extract(b"this is not a pdf");
        assert!(matches!(result, Err(ExtractError::Pdf(_))));
    }

    #[test]
    fn test_normalize_line_endings() {
        let extractor = PdfExtractor::new();
        let text = "\r\n  1. Introduction\r\nTexte\u{c}2. Suite\r\n";
        assert_eq!(
            extractor.normalize(text),
            "1. Introduction\nTexte\n\n2. Suite"
        );
    }

    #[test]
    fn test_normalize_only_whitespace() {
        let extractor = PdfExtractor::new();
        assert_eq!(extractor.normalize("  \n\n  \u{c} "), "");
    }
}
