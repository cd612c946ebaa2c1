// 报告章节问题生成库
// 提取文档文本，按章节切分，再为每个章节生成评估问题

pub mod cli;
pub mod config;
pub mod generation;
pub mod parser;
pub mod pipeline;
pub mod segmentation;
pub mod telemetry;

pub use config::AppConfig;
pub use pipeline::{PipelineError, ReportPipeline, RunReport, SegmentationReport};

use clap::Parser;

/// 命令行入口
pub fn run() -> anyhow::Result<()> {
    telemetry::init();

    let cli = cli::Cli::parse();
    cli::execute(&cli)
}
