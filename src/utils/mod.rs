//! 工具模块：日志宏、日志预览、UTF-8 字符边界
#[macro_use]
mod log_format;
pub mod preview;
pub mod utf8;

pub use self::preview::preview_compact;
