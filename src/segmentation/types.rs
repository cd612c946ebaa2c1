use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::generation::prompts;

/// 切分降级原因
///
/// 无法识别章节结构时，整篇文档作为单一章节处理，
/// 并通过此枚举说明原因，调用方可以据此区分“没有结构”与“识别出 N 个章节”
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason", content = "detail")]
pub enum Degradation {
    /// 没有任何标题候选，未执行切分
    NoTitlesDetected,
    /// 生成后端没有返回可用的标题
    NoTitlesSuggested,
    /// 后端建议的标题在原文中一个都找不到
    TitlesNotFound,
    /// 调用生成后端失败
    BackendFailed(String),
    /// 生成后端未配置
    BackendUnconfigured,
}

impl Degradation {
    /// 整篇文档章节的标题
    pub fn title(&self) -> &'static str {
        match self {
            Degradation::NoTitlesDetected => prompts::TITLE_NO_SEGMENTATION,
            Degradation::NoTitlesSuggested => prompts::TITLE_NO_CHAPTERS_SUGGESTED,
            Degradation::TitlesNotFound => prompts::TITLE_CHAPTERS_NOT_FOUND,
            Degradation::BackendFailed(_) => prompts::TITLE_SEGMENTATION_ERROR,
            Degradation::BackendUnconfigured => prompts::TITLE_BACKEND_UNCONFIGURED,
        }
    }
}

/// 标题候选的来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateKind {
    /// 标题行本身位于片段开头，切分时需要从正文中去掉
    InlineHeading,
    /// 只用作分界点，正文保留原样
    Boundary,
    /// 降级哨兵：整篇文档作为单一章节
    WholeDocument(Degradation),
}

/// 标题候选
///
/// `offset` 是原文中的字节偏移量，总是落在字符边界上
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleCandidate {
    pub offset: usize,
    pub title: String,
    pub kind: CandidateKind,
}

impl TitleCandidate {
    pub fn inline_heading(offset: usize, title: impl Into<String>) -> Self {
        Self {
            offset,
            title: title.into(),
            kind: CandidateKind::InlineHeading,
        }
    }

    pub fn boundary(offset: usize, title: impl Into<String>) -> Self {
        Self {
            offset,
            title: title.into(),
            kind: CandidateKind::Boundary,
        }
    }

    /// 创建覆盖整篇文档的降级哨兵
    pub fn whole_document(degradation: Degradation) -> Self {
        Self {
            offset: 0,
            title: degradation.title().to_string(),
            kind: CandidateKind::WholeDocument(degradation),
        }
    }

    pub fn degradation(&self) -> Option<&Degradation> {
        match &self.kind {
            CandidateKind::WholeDocument(d) => Some(d),
            _ => None,
        }
    }
}

/// 片段类型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "degradation")]
pub enum SegmentKind {
    /// 第一个标题之前的前置文本
    Preliminary,
    /// 正常识别出的章节
    Chapter,
    /// 未能切分时的整篇文档
    WholeDocument(Degradation),
}

/// Segment（章节片段）
///
/// `span` 是片段在原文中的字节范围（修剪前），按 `order` 依次拼接可还原原文
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub title: String,
    pub body: String,
    pub order: usize,
    pub span: Range<usize>,
    pub kind: SegmentKind,
}
