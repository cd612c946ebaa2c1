use super::*;
use encoding_rs::*;

/// TXT 提取器
///
/// 用于已经提取好的纯文本报告，自动检测编码（UTF-8、带 BOM 的 UTF-16、windows-1252）
#[derive(Clone)]
pub struct TxtExtractor;

impl TxtExtractor {
    /// 创建新的 TXT 提取器实例
    pub fn new() -> Self {
        Self
    }

    /// 检测文本编码
    ///
    /// 依次检查 BOM 和 UTF-8 合法性，最后回退到 windows-1252
    /// （法语报告中常见的旧编码）
    fn detect_encoding(&self, bytes: &[u8]) -> &'static Encoding {
        if let Some((encoding, _bom_length)) = Encoding::for_bom(bytes) {
            return encoding;
        }

        if std::str::from_utf8(bytes).is_ok() {
            return UTF_8;
        }

        WINDOWS_1252
    }
}

impl Extractor for TxtExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        let encoding = self.detect_encoding(bytes);
        let (content, encoding_used, had_errors) = encoding.decode(bytes);

        if had_errors {
            tracing::warn!(encoding = encoding_used.name(), "文件解码时出现错误，可能存在乱码");
        }

        Ok(content.into_owned())
    }

    fn media_types(&self) -> Vec<&str> {
        vec![MEDIA_TYPE_TXT]
    }

    fn supported_extensions(&self) -> Vec<&str> {
        vec!["txt"]
    }
}

impl Default for TxtExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_utf8_encoding() {
        let extractor = TxtExtractor::new();
        assert_eq!(extractor.detect_encoding("Étude préliminaire".as_bytes()), UTF_8);
        assert_eq!(extractor.detect_encoding(b"Hello World"), UTF_8);
    }

    #[test]
    fn test_detect_bom() {
        let extractor = TxtExtractor::new();
        let bytes = [0xFF, 0xFE, b'A', 0x00];
        assert_eq!(extractor.detect_encoding(&bytes), UTF_16LE);
    }

    #[test]
    fn test_legacy_single_byte_fallback() {
        let extractor = TxtExtractor::new();
        // "Méthodologie" en windows-1252
        let bytes = b"M\xe9thodologie";
        assert_eq!(extractor.detect_encoding(bytes), WINDOWS_1252);

        let text = extractor.extract(bytes).unwrap();
        assert_eq!(text, "Méthodologie");
    }

    #[test]
    fn test_extract_keeps_text_verbatim() {
        let extractor = TxtExtractor::new();
        let text = extractor.extract(b"  1. Intro\r\nCorps  ").unwrap();
        assert_eq!(text, "  1. Intro\r\nCorps  ");
    }
}
