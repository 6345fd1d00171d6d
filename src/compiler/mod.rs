//! 编译模块：将 LIKE 模式编译为分类后的只读匹配计划
pub mod pattern;
pub mod compiler;

pub use self::pattern::{
    CompiledPattern, ExplainedSubPattern, PatternKind, PatternSpec, PatternText, PlanExplain,
    SubPattern,
};
pub use self::compiler::PatternCompiler;
