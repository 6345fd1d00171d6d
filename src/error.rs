//! 全局错误类型定义
//! 只有模式编译会失败，匹配阶段没有错误，仅返回布尔结果

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RslikeError {
    // 模式相关错误
    /// 转义用法非法：转义符位于模式末尾，或转义了 `%`/`_`/转义符以外的字符
    #[error("Invalid LIKE pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// 转义符无法表示为单字节
    #[error("Invalid escape character: {0}")]
    InvalidEscape(String),
}

impl RslikeError {
    /// 构造 InvalidPattern（模式按有损 UTF-8 展示）
    pub(crate) fn invalid_pattern(pattern: &[u8], reason: impl Into<String>) -> Self {
        RslikeError::InvalidPattern {
            pattern: String::from_utf8_lossy(pattern).into_owned(),
            reason: reason.into(),
        }
    }
}

// 全局Result类型
pub type LikeResult<T> = Result<T, RslikeError>;
