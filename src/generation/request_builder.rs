use crate::segmentation::Segment;

use super::prompts;

/// 单个章节的生成请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub title: String,
    pub prompt: String,
}

/// 问题请求构造器
///
/// 正文先截断到固定字符预算，再嵌入问题生成模板
pub struct QuestionRequestBuilder {
    max_body_chars: usize,
}

impl QuestionRequestBuilder {
    pub fn new(max_body_chars: usize) -> Self {
        Self { max_body_chars }
    }

    /// 截断正文（按字符计数，不会切断多字节字符）
    pub fn truncate<'a>(&self, body: &'a str) -> &'a str {
        match body.char_indices().nth(self.max_body_chars) {
            Some((idx, _)) => &body[..idx],
            None => body,
        }
    }

    /// 构造生成请求
    ///
    /// 截断后的正文为空时返回 `None`，不应调用后端
    pub fn build(&self, segment: &Segment) -> Option<GenerationRequest> {
        let body = self.truncate(&segment.body);
        if body.trim().is_empty() {
            return None;
        }

        Some(GenerationRequest {
            title: segment.title.clone(),
            prompt: prompts::chapter_questions(&segment.title, body),
        })
    }
}

impl Default for QuestionRequestBuilder {
    fn default() -> Self {
        Self::new(10_000)
    }
}
