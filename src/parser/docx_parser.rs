use super::*;
use docx_rust::document::{BodyContent, Paragraph, ParagraphContent, Run, RunContent};
use docx_rust::DocxFile;
use std::io::Cursor;

/// DOCX 提取器
///
/// 按文档顺序读取正文段落，只保留非空段落，段落之间以单个换行连接
#[derive(Clone)]
pub struct DocxExtractor;

impl DocxExtractor {
    /// 创建新的 DOCX 提取器实例
    pub fn new() -> Self {
        Self
    }

    /// 收集正文中的段落文本
    fn collect_body(&self, content: &[BodyContent], paragraphs: &mut Vec<String>) {
        for item in content {
            match item {
                BodyContent::Paragraph(para) => {
                    let text = self.paragraph_text(para);
                    if !text.trim().is_empty() {
                        paragraphs.push(text);
                    }
                }
                BodyContent::Sdt(sdt) => {
                    if let Some(ref sdt_content) = sdt.content {
                        self.collect_body(&sdt_content.content, paragraphs);
                    }
                }
                _ => {}
            }
        }
    }

    fn paragraph_text(&self, para: &Paragraph) -> String {
        let mut text = String::new();

        for pc in &para.content {
            match pc {
                ParagraphContent::Run(run) => self.push_run_text(run, &mut text),
                ParagraphContent::Link(link) => {
                    if let Some(ref run) = link.content {
                        self.push_run_text(run, &mut text);
                    }
                }
                _ => {}
            }
        }

        text
    }

    fn push_run_text(&self, run: &Run, text: &mut String) {
        for rc in &run.content {
            match rc {
                RunContent::Text(t) => text.push_str(&t.text),
                RunContent::Break(_) => text.push('\n'),
                RunContent::Tab(_) => text.push('\t'),
                _ => {}
            }
        }
    }
}

impl Extractor for DocxExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        let file = DocxFile::from_reader(Cursor::new(bytes))
            .map_err(|e| ExtractError::Docx(e.to_string()))?;
        let docx = file.parse().map_err(|e| ExtractError::Docx(e.to_string()))?;

        let mut paragraphs = Vec::new();
        self.collect_body(&docx.document.body.content, &mut paragraphs);
        tracing::debug!(paragraphs = paragraphs.len(), "DOCX 文本提取完成");

        Ok(paragraphs.join("\n"))
    }

    fn media_types(&self) -> Vec<&str> {
        vec![MEDIA_TYPE_DOCX]
    }

    fn supported_extensions(&self) -> Vec<&str> {
        vec!["docx"]
    }
}

impl Default for DocxExtractor {
    fn default() -> Self {
        Self::new()
    }
}
