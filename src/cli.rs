use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::AppConfig;
use crate::generation::ChapterResult;
use crate::pipeline::{ReportPipeline, SegmentationReport};
use crate::segmentation::LocatorStrategy;

/// Génère des questions d'évaluation pour chaque chapitre d'un rapport (PDF, DOCX, TXT)
#[derive(Parser, Debug)]
#[command(name = "chapter-quiz", version, about)]
pub struct Cli {
    /// Rapport à analyser
    pub input: PathBuf,

    /// Type MIME du document (déduit de l'extension par défaut)
    #[arg(long)]
    pub media_type: Option<String>,

    /// Stratégie de détection des titres de chapitres
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Modèle utilisé pour les deux appels au service de génération
    #[arg(long)]
    pub model: Option<String>,

    /// Fichier de configuration TOML
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// S'arrêter après la segmentation, sans générer de questions
    #[arg(long, default_value_t = false)]
    pub segments_only: bool,

    /// Afficher le rapport complet en JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

/// 命令行中的策略参数
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyArg {
    Regex,
    Ai,
}

impl From<StrategyArg> for LocatorStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Regex => LocatorStrategy::Regex,
            StrategyArg::Ai => LocatorStrategy::Ai,
        }
    }
}

impl Cli {
    /// 加载配置并应用命令行覆盖项
    pub fn resolve_config(&self) -> Result<AppConfig> {
        let config = AppConfig::load(self.config.as_deref())
            .context("chargement de la configuration impossible")?;

        Ok(self.apply_overrides(config))
    }

    /// 命令行参数优先于配置文件和环境变量
    fn apply_overrides(&self, mut config: AppConfig) -> AppConfig {
        if let Some(strategy) = self.strategy {
            config.strategy = strategy.into();
        }
        if let Some(model) = &self.model {
            config.model = model.clone();
        }

        config
    }

    fn source_name(&self) -> String {
        self.input
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| self.input.display().to_string())
    }
}

/// 执行一次命令行调用
pub fn execute(cli: &Cli) -> Result<()> {
    let config = cli.resolve_config()?;
    let pipeline = ReportPipeline::from_config(config)
        .context("initialisation du service de génération impossible")?;

    let source_name = cli.source_name();
    tracing::info!(source = %source_name, "开始处理文档");

    let segmentation = pipeline
        .analyze_file(&cli.input, cli.media_type.as_deref())
        .with_context(|| format!("Impossible d'extraire le texte de {}.", cli.input.display()))?;

    if cli.segments_only {
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&segmentation)?);
        } else {
            print!("{}", render_segmentation(&segmentation));
        }
        return Ok(());
    }

    let report = pipeline.complete(&source_name, segmentation);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_segmentation(&report.segmentation));
        println!();
        print!("{}", render_chapters(&report.chapters));
    }

    Ok(())
}

/// 切分摘要：章节数量和每个章节的标题
pub fn render_segmentation(report: &SegmentationReport) -> String {
    let mut out = format!(
        "Segmentation réussie : {} chapitres/sections détectés.\n",
        report.segment_count()
    );

    if let Some(degradation) = report.degradation() {
        out.push_str(&format!("Aucune structure exploitable : {}\n", degradation.title()));
    }
    for segment in &report.segments {
        out.push_str(&format!(
            "  - {} ({} caractères)\n",
            segment.title,
            segment.body.chars().count()
        ));
    }

    out
}

/// 每个章节的标题和问题
pub fn render_chapters(chapters: &[ChapterResult]) -> String {
    chapters
        .iter()
        .map(|chapter| {
            let mut block = format!("== {} ==\n", chapter.title);
            for question in &chapter.questions {
                block.push_str(question);
                block.push('\n');
            }
            block.push('\n');
            block
        })
        .collect()
}
