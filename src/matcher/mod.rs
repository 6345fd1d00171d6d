//! 匹配模块：按模式分类选择最快的匹配策略
mod generic;
mod relaxed;
pub mod matcher;

pub use self::matcher::PatternMatcher;
