//! rslike - SQL LIKE 模式匹配引擎
//! 模式编译为分类后的只读匹配计划，精确/前缀/后缀/子串与 Relaxed 类走无回溯快速路径

// 导出全局错误类型
pub use self::error::{LikeResult, RslikeError};

// 导出配置模块
pub use self::config::{ConfigManager, CustomConfigBuilder, LikeConfig};

// 导出编译模块核心接口
pub use self::compiler::{
    CompiledPattern, ExplainedSubPattern, PatternCompiler, PatternKind, PatternSpec, PatternText,
    PlanExplain, SubPattern,
};

// 导出匹配模块核心接口
pub use self::matcher::PatternMatcher;

// 导出缓存模块核心接口
pub use self::cache::{global_pattern_cache, PatternCache};

// 声明所有子模块（日志宏所在的 utils 必须最先声明）
#[macro_use]
pub mod utils;
pub mod config;
pub mod error;
pub mod compiler;
pub mod matcher;
pub mod cache;

/// 编译模式（`compile(pattern, escape)` 的便捷入口）
pub fn compile(pattern: &str, escape: Option<char>) -> LikeResult<CompiledPattern> {
    PatternCompiler::compile_str(pattern, escape)
}

/// 一次性匹配：经全局缓存取得计划后匹配
pub fn like(input: &str, pattern: &str, escape: Option<char>) -> LikeResult<bool> {
    let plan = global_pattern_cache().get_or_compile_str(pattern, escape)?;
    Ok(plan.matches(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_entry_points() {
        assert_eq!(like("helloworld", "hello%", None), Ok(true));
        assert_eq!(like("hell", "hello%", None), Ok(false));
        assert_eq!(like("a_c", "a#_c", Some('#')), Ok(true));
        assert!(like("abc", "abc#", Some('#')).is_err());
        assert_eq!(compile("%hello", None).map(|p| p.kind()), Ok(PatternKind::Suffix));
    }
}
