// 问题生成模块
// 为每个章节构造受长度限制的提示词，逐个调用生成后端并汇总结果

pub mod backend;
pub mod prompts;
pub mod request_builder;
pub mod orchestrator;

#[cfg(test)]
pub(crate) mod test_support;


// 重新导出主要类型
pub use backend::{GeminiClient, GenerationError, TextGenerator};
pub use request_builder::{GenerationRequest, QuestionRequestBuilder};
pub use orchestrator::{ChapterResult, ChapterStatus, QuestionGenerationOrchestrator};
