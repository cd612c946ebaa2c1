// 章节切分模块
// 定位标题候选，再把原文切成连续的章节片段

pub mod types;
pub mod title_locator;
pub mod external_locator;
pub mod segmenter;


// 重新导出主要类型
pub use types::*;
pub use title_locator::{LocatorStrategy, RegexTitleLocator, TitleLocator};
pub use external_locator::ExternalTitleLocator;
pub use segmenter::Segmenter;
