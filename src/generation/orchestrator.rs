use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::backend::TextGenerator;
use super::prompts;
use super::request_builder::QuestionRequestBuilder;
use crate::segmentation::Segment;

/// 单个章节的生成状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChapterStatus {
    /// 后端成功返回问题
    Generated,
    /// 正文为空，未调用后端
    NoContent,
    /// 后端调用失败（错误信息见 questions）
    Failed,
    /// 后端未配置，整个生成阶段未执行
    Unconfigured,
}

/// 章节结果
///
/// `questions` 总是可以直接展示：失败时是一条错误说明，而不是空列表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterResult {
    pub title: String,
    pub questions: Vec<String>,
    pub order: usize,
    pub status: ChapterStatus,
}

/// 问题生成调度器
///
/// 按章节顺序逐个调用后端，每个章节只尝试一次，
/// 单个章节的失败被隔离在它自己的结果里
pub struct QuestionGenerationOrchestrator {
    generator: Option<Arc<dyn TextGenerator>>,
    model: String,
    builder: QuestionRequestBuilder,
}

impl QuestionGenerationOrchestrator {
    pub fn new(
        generator: Option<Arc<dyn TextGenerator>>,
        model: impl Into<String>,
        builder: QuestionRequestBuilder,
    ) -> Self {
        Self {
            generator,
            model: model.into(),
            builder,
        }
    }

    /// 为所有章节生成问题
    ///
    /// # 返回
    /// 与输入片段一一对应、顺序相同的结果；后端未配置时只返回一条配置错误
    pub fn run(&self, segments: &[Segment]) -> Vec<ChapterResult> {
        let Some(generator) = self.generator.as_ref() else {
            tracing::error!("生成后端未配置，跳过问题生成");
            return vec![ChapterResult {
                title: prompts::UNCONFIGURED_TITLE.to_string(),
                questions: vec![prompts::UNCONFIGURED_MESSAGE.to_string()],
                order: 0,
                status: ChapterStatus::Unconfigured,
            }];
        };

        segments
            .iter()
            .map(|segment| self.run_segment(generator.as_ref(), segment))
            .collect()
    }

    fn run_segment(&self, generator: &dyn TextGenerator, segment: &Segment) -> ChapterResult {
        let Some(request) = self.builder.build(segment) else {
            tracing::debug!(order = segment.order, title = %segment.title, "章节没有正文，跳过生成");
            return ChapterResult {
                title: segment.title.clone(),
                questions: vec![prompts::NO_SIGNIFICANT_TEXT.to_string()],
                order: segment.order,
                status: ChapterStatus::NoContent,
            };
        };

        match generator.generate(&self.model, &request.prompt) {
            Ok(response) => {
                let questions: Vec<String> = response
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect();

                tracing::info!(
                    order = segment.order,
                    title = %segment.title,
                    questions = questions.len(),
                    "章节问题生成完成"
                );

                ChapterResult {
                    title: request.title,
                    questions,
                    order: segment.order,
                    status: ChapterStatus::Generated,
                }
            }
            Err(e) => {
                tracing::warn!(order = segment.order, title = %segment.title, error = %e, "章节问题生成失败");

                ChapterResult {
                    title: request.title,
                    questions: vec![prompts::generation_failure(&e.to_string())],
                    order: segment.order,
                    status: ChapterStatus::Failed,
                }
            }
        }
    }
}
