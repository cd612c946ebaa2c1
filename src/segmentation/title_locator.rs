use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::types::TitleCandidate;

/// 标题定位策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocatorStrategy {
    /// 基于编号标题的正则匹配
    Regex,
    /// 由生成后端建议标题，再在原文中定位
    Ai,
}

/// TitleLocator trait
///
/// 在原文中定位章节标题，返回按偏移量升序排列、偏移量互不相同的候选列表
pub trait TitleLocator: Send + Sync {
    fn locate(&self, text: &str) -> Vec<TitleCandidate>;

    /// 策略名称（用于日志）
    fn name(&self) -> &'static str;
}

/// 按偏移量排序并去重
///
/// 同一偏移量只保留最先出现的候选（稳定排序保证先来者在前）
pub fn sort_and_dedup(mut candidates: Vec<TitleCandidate>) -> Vec<TitleCandidate> {
    candidates.sort_by_key(|c| c.offset);

    let mut seen = HashSet::new();
    candidates.retain(|c| seen.insert(c.offset));
    candidates
}

/// 正则标题定位器
///
/// 逐行匹配层级编号标题，如 `1. Introduction`、`2.3 Résultats`、`4.1.2 État de l'art`：
/// 一组或多组以点分隔的数字，后接空白，再接一个字母（含带重音的拉丁字母）
pub struct RegexTitleLocator {
    pattern: Regex,
}

impl RegexTitleLocator {
    pub fn new() -> Self {
        // 分隔空白不跨行（含不换行空格、全角空格等 Unicode 空白）
        let pattern = Regex::new(r"(?m)^\d+(?:\.\d+)*\.?[^\S\n]+\p{Latin}[^\n]*").unwrap();

        Self { pattern }
    }
}

impl TitleLocator for RegexTitleLocator {
    fn locate(&self, text: &str) -> Vec<TitleCandidate> {
        self.pattern
            .find_iter(text)
            .map(|m| TitleCandidate::inline_heading(m.start(), m.as_str().trim()))
            .collect()
    }

    fn name(&self) -> &'static str {
        "regex"
    }
}

impl Default for RegexTitleLocator {
    fn default() -> Self {
        Self::new()
    }
}
