use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::config::AppConfig;
use crate::generation::{
    ChapterResult, GeminiClient, GenerationError, QuestionGenerationOrchestrator,
    QuestionRequestBuilder, TextGenerator,
};
use crate::parser::{ExtractError, ExtractorRouter};
use crate::segmentation::{
    Degradation, ExternalTitleLocator, LocatorStrategy, RegexTitleLocator, Segment, SegmentKind,
    Segmenter, TitleLocator,
};

/// 流程级错误
///
/// 只有这两种情况会在切分之前终止整个流程
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("impossible d'extraire le texte du document: {0}")]
    Extraction(#[from] ExtractError),
    #[error("le document ne contient aucun texte à segmenter")]
    EmptyDocument,
}

/// 切分阶段的结果
#[derive(Debug, Clone, Serialize)]
pub struct SegmentationReport {
    /// 提取出的原文
    #[serde(skip)]
    pub text: String,
    /// 原文的 SHA-256 指纹
    pub fingerprint: String,
    pub strategy: LocatorStrategy,
    pub segments: Vec<Segment>,
}

impl SegmentationReport {
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// 未能识别章节结构时的降级原因
    pub fn degradation(&self) -> Option<&Degradation> {
        self.segments.iter().find_map(|s| match &s.kind {
            SegmentKind::WholeDocument(d) => Some(d),
            _ => None,
        })
    }
}

/// 一次完整运行的报告
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub source_name: String,
    pub fingerprint: String,
    pub generated_at: DateTime<Utc>,
    pub segmentation: SegmentationReport,
    pub chapters: Vec<ChapterResult>,
}

/// 报告处理流程
///
/// 提取 -> 标题定位 -> 切分 -> 问题生成。
/// 每次运行相互独立，不保存任何状态
pub struct ReportPipeline {
    config: AppConfig,
    router: ExtractorRouter,
    generator: Option<Arc<dyn TextGenerator>>,
}

impl ReportPipeline {
    /// 使用给定的生成后端创建流程（`None` 表示后端未配置）
    pub fn new(config: AppConfig, generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self {
            config,
            router: ExtractorRouter::new(),
            generator,
        }
    }

    /// 根据配置创建流程，有 API key 时使用 Gemini 客户端
    pub fn from_config(config: AppConfig) -> Result<Self, GenerationError> {
        let generator = GeminiClient::from_config(&config)?
            .map(|client| Arc::new(client) as Arc<dyn TextGenerator>);

        if generator.is_none() {
            tracing::warn!("未配置 API key，生成后端不可用");
        }

        Ok(Self::new(config, generator))
    }

    /// 按配置选择标题定位策略
    pub fn locator(&self) -> Box<dyn TitleLocator> {
        match self.config.strategy {
            LocatorStrategy::Regex => Box::new(RegexTitleLocator::new()),
            LocatorStrategy::Ai => Box::new(
                ExternalTitleLocator::new(self.generator.clone(), self.config.model.clone())
                    .with_scan_chars(self.config.title_scan_chars)
                    .with_min_title_chars(self.config.min_title_chars),
            ),
        }
    }

    /// 提取并切分文档
    pub fn analyze(
        &self,
        bytes: &[u8],
        media_type: &str,
    ) -> Result<SegmentationReport, PipelineError> {
        let text = self.router.extract(bytes, media_type)?;
        tracing::info!(bytes = bytes.len(), media_type, "文档文本提取完成");

        self.analyze_text(text)
    }

    /// 读取文件，提取并切分
    ///
    /// `media_type` 缺省时按扩展名推断
    pub fn analyze_file(
        &self,
        path: &Path,
        media_type: Option<&str>,
    ) -> Result<SegmentationReport, PipelineError> {
        let text = self.router.extract_file(path, media_type)?;
        tracing::info!(path = %path.display(), "文档文本提取完成");

        self.analyze_text(text)
    }

    /// 切分已经提取好的文本
    pub fn analyze_text(&self, text: String) -> Result<SegmentationReport, PipelineError> {
        if text.trim().is_empty() {
            return Err(PipelineError::EmptyDocument);
        }

        let fingerprint = fingerprint(&text);
        let locator = self.locator();
        let candidates = locator.locate(&text);
        let segments = Segmenter::new().segment(&text, &candidates);

        let report = SegmentationReport {
            text,
            fingerprint,
            strategy: self.config.strategy,
            segments,
        };

        tracing::info!(
            fingerprint = %report.fingerprint,
            strategy = locator.name(),
            segments = report.segment_count(),
            degraded = report.degradation().is_some(),
            "文档切分完成"
        );

        Ok(report)
    }

    /// 为切分结果生成问题
    pub fn generate(&self, report: &SegmentationReport) -> Vec<ChapterResult> {
        let orchestrator = QuestionGenerationOrchestrator::new(
            self.generator.clone(),
            self.config.model.clone(),
            QuestionRequestBuilder::new(self.config.max_body_chars),
        );

        orchestrator.run(&report.segments)
    }

    /// 完整流程
    pub fn process(
        &self,
        source_name: &str,
        bytes: &[u8],
        media_type: &str,
    ) -> Result<RunReport, PipelineError> {
        let segmentation = self.analyze(bytes, media_type)?;
        Ok(self.complete(source_name, segmentation))
    }

    /// 对已切分的文档生成问题，组装运行报告
    pub fn complete(&self, source_name: &str, segmentation: SegmentationReport) -> RunReport {
        let chapters = self.generate(&segmentation);

        RunReport {
            source_name: source_name.to_string(),
            fingerprint: segmentation.fingerprint.clone(),
            generated_at: Utc::now(),
            segmentation,
            chapters,
        }
    }
}

/// 计算文本的 SHA-256 指纹
pub fn fingerprint(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::test_support::ScriptedGenerator;
    use crate::generation::{prompts, ChapterStatus};
    use crate::parser::MEDIA_TYPE_TXT;

    fn regex_config() -> AppConfig {
        AppConfig {
            strategy: LocatorStrategy::Regex,
            ..AppConfig::default()
        }
    }

    fn pipeline(config: AppConfig, generator: &Arc<ScriptedGenerator>) -> ReportPipeline {
        let shared: Arc<dyn TextGenerator> = generator.clone();
        ReportPipeline::new(config, Some(shared))
    }

    #[test]
    fn test_process_regex_strategy() {
        let generator = Arc::new(ScriptedGenerator::new(vec![
            Ok("1. Q préambule".to_string()),
            Ok("1. Q intro".to_string()),
            Ok("1. Q méthodes".to_string()),
        ]));
        let pipeline = pipeline(regex_config(), &generator);

        let text = "Preamble.\n1. Intro\nBody A.\n2. Methods\nBody B.";
        let report = pipeline
            .process("rapport.txt", text.as_bytes(), MEDIA_TYPE_TXT)
            .unwrap();

        assert_eq!(report.segmentation.segment_count(), 3);
        assert!(report.segmentation.degradation().is_none());
        assert_eq!(report.chapters.len(), 3);
        assert_eq!(report.chapters[1].questions, vec!["1. Q intro"]);
        assert_eq!(report.fingerprint, fingerprint(text));
        assert_eq!(report.source_name, "rapport.txt");
    }

    #[test]
    fn test_empty_document_aborts_before_segmentation() {
        let generator = Arc::new(ScriptedGenerator::new(vec![]));
        let pipeline = pipeline(AppConfig::default(), &generator);

        let result = pipeline.process("vide.txt", b"  \n ", MEDIA_TYPE_TXT);
        assert!(matches!(
            result,
            Err(PipelineError::Extraction(ExtractError::NoText))
        ));
        assert!(matches!(
            pipeline.analyze_text(String::new()),
            Err(PipelineError::EmptyDocument)
        ));
        assert_eq!(generator.calls(), 0);
    }

    #[test]
    fn test_unsupported_media_type_is_fatal() {
        let generator = Arc::new(ScriptedGenerator::new(vec![]));
        let pipeline = pipeline(AppConfig::default(), &generator);

        let result = pipeline.analyze(b"data", "application/zip");
        assert!(matches!(
            result,
            Err(PipelineError::Extraction(ExtractError::UnsupportedMediaType(_)))
        ));
    }

    #[test]
    fn test_ai_strategy_uses_backend_titles() {
        let generator = Arc::new(ScriptedGenerator::new(vec![
            Ok("Introduction générale\nConclusion générale".to_string()),
            Ok("1. Q intro".to_string()),
            Ok("1. Q conclusion".to_string()),
        ]));
        let pipeline = pipeline(AppConfig::default(), &generator);

        let text = "Introduction générale\nTexte A.\nConclusion générale\nTexte B.";
        let report = pipeline.analyze_text(text.to_string()).unwrap();
        assert_eq!(report.segment_count(), 2);
        assert_eq!(report.segments[0].title, "Introduction générale");

        let chapters = pipeline.generate(&report);
        assert_eq!(chapters[1].questions, vec!["1. Q conclusion"]);
        assert_eq!(generator.calls(), 3);
    }

    #[test]
    fn test_unconfigured_backend() {
        let pipeline = ReportPipeline::new(AppConfig::default(), None);

        let report = pipeline.analyze_text("Texte du rapport.".to_string()).unwrap();
        assert_eq!(report.degradation(), Some(&Degradation::BackendUnconfigured));
        assert_eq!(report.segment_count(), 1);

        let chapters = pipeline.generate(&report);
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].status, ChapterStatus::Unconfigured);
        assert_eq!(chapters[0].questions, vec![prompts::UNCONFIGURED_MESSAGE]);
    }

    #[test]
    fn test_title_detection_failure_still_generates() {
        let generator = Arc::new(ScriptedGenerator::new(vec![
            Err(GenerationError::EmptyResponse),
            Ok("1. Q".to_string()),
        ]));
        let pipeline = pipeline(AppConfig::default(), &generator);

        let report = pipeline.analyze_text("Texte du rapport.".to_string()).unwrap();
        assert!(matches!(
            report.degradation(),
            Some(Degradation::BackendFailed(_))
        ));

        let chapters = pipeline.generate(&report);
        assert_eq!(chapters[0].title, prompts::TITLE_SEGMENTATION_ERROR);
        assert_eq!(chapters[0].questions, vec!["1. Q"]);
    }

    #[test]
    fn test_report_serialization_skips_text() {
        let pipeline = ReportPipeline::new(regex_config(), None);
        let report = pipeline.analyze_text("1. Intro\nCorps".to_string()).unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("text").is_none());
        assert_eq!(json["strategy"], "regex");
        assert_eq!(json["segments"][0]["title"], "1. Intro");
    }

    #[test]
    fn test_analyze_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rapport.txt");
        std::fs::write(&path, "Avant.\n1. Intro\nCorps.").unwrap();

        let pipeline = ReportPipeline::new(regex_config(), None);
        let report = pipeline.analyze_file(&path, None).unwrap();
        assert_eq!(report.segment_count(), 2);
        assert_eq!(report.segments[1].title, "1. Intro");

        let missing = pipeline.analyze_file(&dir.path().join("absent.pdf"), None);
        assert!(matches!(
            missing,
            Err(PipelineError::Extraction(ExtractError::Io(_)))
        ));
    }

    #[test]
    fn test_fingerprint() {
        assert_eq!(
            fingerprint("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
