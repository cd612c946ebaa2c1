use std::ops::Range;

use super::title_locator::sort_and_dedup;
use super::types::{CandidateKind, Degradation, Segment, SegmentKind, TitleCandidate};
use crate::generation::prompts;

/// 切分计划中的一段：原文范围及其对应的标题候选（前置文本没有候选）
struct PlannedSpan<'a> {
    span: Range<usize>,
    candidate: Option<&'a TitleCandidate>,
}

/// 章节切分器
///
/// 把有序的标题候选转换成连续、互不重叠、覆盖全文的片段列表：
/// 第 i 个片段的范围是 `[offset_i, offset_{i+1})`，最后一个片段延伸到文末；
/// 第一个标题之前的内容作为“前置文本”片段
pub struct Segmenter;

impl Segmenter {
    pub fn new() -> Self {
        Self
    }

    /// 切分文本
    ///
    /// # 参数
    /// - `text`: 原文
    /// - `candidates`: 标题候选（会再次排序去重）
    ///
    /// # 返回
    /// 按原文顺序排列的片段，修剪后为空的片段不会出现
    pub fn segment(&self, text: &str, candidates: &[TitleCandidate]) -> Vec<Segment> {
        if let Some(degradation) = candidates.iter().find_map(|c| c.degradation()) {
            return vec![self.whole_document(text, degradation.clone())];
        }

        let candidates = self.sanitize(text, candidates);
        if candidates.is_empty() {
            return vec![self.whole_document(text, Degradation::NoTitlesDetected)];
        }

        let mut segments = Vec::new();
        for planned in self.plan(text.len(), &candidates) {
            let raw = &text[planned.span.clone()];

            let (title, body, kind) = match planned.candidate {
                None => (
                    prompts::TITLE_PRELIMINARY.to_string(),
                    raw.trim().to_string(),
                    SegmentKind::Preliminary,
                ),
                Some(candidate) => {
                    let body = match candidate.kind {
                        CandidateKind::InlineHeading => {
                            raw.replacen(candidate.title.as_str(), "", 1).trim().to_string()
                        }
                        _ => raw.trim().to_string(),
                    };
                    (candidate.title.clone(), body, SegmentKind::Chapter)
                }
            };

            if body.is_empty() {
                tracing::debug!(title = %title, "片段修剪后为空，丢弃");
                continue;
            }

            segments.push(Segment {
                title,
                body,
                order: segments.len(),
                span: planned.span,
                kind,
            });
        }

        segments
    }

    /// 计算原文分区
    ///
    /// 返回的范围首尾相接，覆盖 `[0, text_len)`（首个偏移量为 0 时没有前置范围）
    pub fn partition(&self, text: &str, candidates: &[TitleCandidate]) -> Vec<Range<usize>> {
        let candidates = self.sanitize(text, candidates);
        if candidates.is_empty() {
            return vec![0..text.len()];
        }

        self.plan(text.len(), &candidates)
            .into_iter()
            .map(|p| p.span)
            .collect()
    }

    fn plan<'a>(&self, text_len: usize, candidates: &'a [TitleCandidate]) -> Vec<PlannedSpan<'a>> {
        let mut plan = Vec::with_capacity(candidates.len() + 1);

        if let Some(first) = candidates.first() {
            if first.offset > 0 {
                plan.push(PlannedSpan {
                    span: 0..first.offset,
                    candidate: None,
                });
            }
        }

        for (i, candidate) in candidates.iter().enumerate() {
            let end = candidates
                .get(i + 1)
                .map(|next| next.offset)
                .unwrap_or(text_len);

            plan.push(PlannedSpan {
                span: candidate.offset..end,
                candidate: Some(candidate),
            });
        }

        plan
    }

    /// 排序、去重并丢弃越界或不在字符边界上的候选
    fn sanitize(&self, text: &str, candidates: &[TitleCandidate]) -> Vec<TitleCandidate> {
        let valid: Vec<TitleCandidate> = candidates
            .iter()
            .filter(|c| {
                let ok = c.offset < text.len() && text.is_char_boundary(c.offset);
                if !ok {
                    tracing::warn!(offset = c.offset, title = %c.title, "标题偏移量无效，忽略");
                }
                ok
            })
            .cloned()
            .collect();

        sort_and_dedup(valid)
    }

    fn whole_document(&self, text: &str, degradation: Degradation) -> Segment {
        Segment {
            title: degradation.title().to_string(),
            body: text.trim().to_string(),
            order: 0,
            span: 0..text.len(),
            kind: SegmentKind::WholeDocument(degradation),
        }
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new()
    }
}
