use regex::RegexBuilder;
use std::sync::Arc;

use super::title_locator::{sort_and_dedup, TitleLocator};
use super::types::{Degradation, TitleCandidate};
use crate::generation::backend::TextGenerator;
use crate::generation::prompts;

/// 外部标题定位器
///
/// 把文档开头交给生成后端，请它列出实质性的章节标题，
/// 再在全文中逐个做大小写不敏感的字面量查找。
/// 任何失败都降级为“整篇文档一个章节”，不会中断流程。
pub struct ExternalTitleLocator {
    generator: Option<Arc<dyn TextGenerator>>,
    model: String,
    /// 发送给后端的文档开头字符数
    scan_chars: usize,
    /// 标题修剪后必须严格长于此字符数
    min_title_chars: usize,
}

impl ExternalTitleLocator {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>, model: impl Into<String>) -> Self {
        Self {
            generator,
            model: model.into(),
            scan_chars: 8000,
            min_title_chars: 5,
        }
    }

    pub fn with_scan_chars(mut self, scan_chars: usize) -> Self {
        self.scan_chars = scan_chars;
        self
    }

    pub fn with_min_title_chars(mut self, min_title_chars: usize) -> Self {
        self.min_title_chars = min_title_chars;
        self
    }

    /// 解析后端返回的标题列表
    ///
    /// 只保留修剪后足够长的非空行
    fn parse_titles(&self, response: &str) -> Vec<String> {
        response
            .lines()
            .map(str::trim)
            .filter(|line| line.chars().count() > self.min_title_chars)
            .map(str::to_string)
            .collect()
    }

    /// 在全文中定位标题
    ///
    /// 标题按字面量处理（转义正则元字符），忽略大小写，只取第一次出现的位置；
    /// 偏移量已被先前标题占用时跳过
    fn find_titles(&self, text: &str, titles: &[String]) -> Vec<TitleCandidate> {
        let mut candidates: Vec<TitleCandidate> = Vec::new();

        for title in titles {
            let pattern = match RegexBuilder::new(&regex::escape(title))
                .case_insensitive(true)
                .build()
            {
                Ok(pattern) => pattern,
                Err(e) => {
                    tracing::debug!(title = %title, error = %e, "标题无法构造查找模式，跳过");
                    continue;
                }
            };

            match pattern.find(text) {
                Some(m) if !candidates.iter().any(|c| c.offset == m.start()) => {
                    candidates.push(TitleCandidate::boundary(m.start(), title.clone()));
                }
                Some(_) => {
                    tracing::debug!(title = %title, "标题位置已被占用，跳过");
                }
                None => {
                    tracing::debug!(title = %title, "标题在原文中找不到");
                }
            }
        }

        sort_and_dedup(candidates)
    }
}

impl TitleLocator for ExternalTitleLocator {
    fn locate(&self, text: &str) -> Vec<TitleCandidate> {
        let Some(generator) = self.generator.as_ref() else {
            tracing::warn!("生成后端未配置，无法识别章节标题");
            return vec![TitleCandidate::whole_document(Degradation::BackendUnconfigured)];
        };

        let excerpt: String = text.chars().take(self.scan_chars).collect();
        let prompt = prompts::title_discovery(&excerpt);

        let response = match generator.generate(&self.model, &prompt) {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "标题识别调用失败，整篇文档作为单一章节");
                return vec![TitleCandidate::whole_document(Degradation::BackendFailed(
                    e.to_string(),
                ))];
            }
        };

        let titles = self.parse_titles(&response);
        if titles.is_empty() {
            return vec![TitleCandidate::whole_document(Degradation::NoTitlesSuggested)];
        }

        let candidates = self.find_titles(text, &titles);
        tracing::info!(
            suggested = titles.len(),
            located = candidates.len(),
            "后端建议的标题定位完成"
        );

        if candidates.is_empty() {
            return vec![TitleCandidate::whole_document(Degradation::TitlesNotFound)];
        }

        candidates
    }

    fn name(&self) -> &'static str {
        "ai"
    }
}
