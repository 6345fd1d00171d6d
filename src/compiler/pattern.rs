//! 编译后模式模型
//! LIKE 模式编译后的不可变匹配计划

use std::fmt;

use memchr::memmem::Finder;
use serde::{Deserialize, Serialize};

use super::compiler::PatternCompiler;
use crate::error::RslikeError;
use crate::matcher::PatternMatcher;
use crate::utils::utf8::char_count;

/// 子模式：匹配计划的最小单元
/// 字面量不持有自己的存储，只引用固定字面量缓冲区中的 `(offset, len)` 区间
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubPattern {
    /// 字面量（逐字节比较）
    LiteralString { offset: usize, len: usize },
    /// 连续 N 个 `_`，每个恰好匹配一个字符（不是一个字节）
    SingleCharWildcard { count: usize },
}

impl SubPattern {
    #[inline(always)]
    pub fn is_wildcard(&self) -> bool {
        matches!(self, SubPattern::SingleCharWildcard { .. })
    }
}

/// 模式分类（互斥，按特异性排序，编译时总是选出最具体的一类）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// 无任何通配符：`abc`
    Exact,
    /// `abc%`
    Prefix,
    /// `%abc`
    Suffix,
    /// `%abc%`
    Substring,
    /// 起始锚定、以 `%` 结尾、含 `_`：`a_c%`
    RelaxedPrefix,
    /// 结尾锚定、以 `%` 开头、含 `_`：`%a_c`
    RelaxedSuffix,
    /// 其他所有情况
    Generic,
}

impl PatternKind {
    /// 是否走快速路径（非通用回溯匹配）
    #[inline(always)]
    pub fn is_fast_path(&self) -> bool {
        !matches!(self, PatternKind::Generic)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PatternKind::Exact => "exact",
            PatternKind::Prefix => "prefix",
            PatternKind::Suffix => "suffix",
            PatternKind::Substring => "substring",
            PatternKind::RelaxedPrefix => "relaxed_prefix",
            PatternKind::RelaxedSuffix => "relaxed_suffix",
            PatternKind::Generic => "generic",
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 模式原文：合法 UTF-8 时序列化为字符串，否则为字节数组
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternText {
    Utf8(String),
    Bytes(Vec<u8>),
}

/// 纯静态的模式描述体（序列化形态）
/// 反序列化时重新编译，派生字段永远与原文一致
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSpec {
    pub pattern: PatternText,
    /// 单字节转义符（按 Latin-1 映射为 char）
    #[serde(default)]
    pub escape: Option<char>,
}

/// 编译后的 LIKE 匹配计划
/// 创建后只读，可跨线程无锁共享
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "PatternSpec", into = "PatternSpec")]
pub struct CompiledPattern {
    /// 模式原文
    pub(crate) source: Box<[u8]>,
    /// 转义符
    pub(crate) escape: Option<u8>,
    /// 所有字面量按顺序拼接的固定缓冲区
    pub(crate) fixed: Box<[u8]>,
    /// 子模式序列（从左到右）
    pub(crate) sub_patterns: Box<[SubPattern]>,
    /// `%` 位置：出现在第 i 个子模式之前（i == 子模式数量表示结尾）
    pub(crate) any_positions: Box<[usize]>,
    pub(crate) kind: PatternKind,
    /// Prefix 的前缀字节数
    pub(crate) prefix_len: usize,
    /// Suffix 的后缀字节数
    pub(crate) suffix_len: usize,
    /// 任意匹配输入的最小字节数：字面量字节 + `_` 个数
    pub(crate) min_input_len: usize,
    /// Substring 的预构建子串查找器
    pub(crate) finder: Option<Finder<'static>>,
}

impl CompiledPattern {
    /// 执行匹配（按输入是否纯 ASCII 自动选择单字节路径）
    #[inline(always)]
    pub fn matches(&self, input: &str) -> bool {
        PatternMatcher::matches(input.as_bytes(), self, input.is_ascii())
    }

    /// 字节级匹配，调用方声明输入是否为单字节编码
    #[inline(always)]
    pub fn matches_bytes(&self, input: &[u8], single_byte: bool) -> bool {
        PatternMatcher::matches(input, self, single_byte)
    }

    #[inline(always)]
    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    pub fn source(&self) -> &[u8] {
        &self.source
    }

    pub fn escape(&self) -> Option<u8> {
        self.escape
    }

    /// 固定字面量缓冲区
    #[inline(always)]
    pub fn fixed_bytes(&self) -> &[u8] {
        &self.fixed
    }

    #[inline(always)]
    pub fn sub_patterns(&self) -> &[SubPattern] {
        &self.sub_patterns
    }

    /// `%` 在子模式序列中的位置
    #[inline(always)]
    pub fn any_wildcard_positions(&self) -> &[usize] {
        &self.any_positions
    }

    /// 字面量总字节数
    #[inline(always)]
    pub fn fixed_len(&self) -> usize {
        self.fixed.len()
    }

    #[inline(always)]
    pub fn prefix_len(&self) -> usize {
        self.prefix_len
    }

    #[inline(always)]
    pub fn suffix_len(&self) -> usize {
        self.suffix_len
    }

    #[inline(always)]
    pub fn min_input_len(&self) -> usize {
        self.min_input_len
    }

    /// 取子模式对应的字面量字节（通配符返回空切片）
    #[inline(always)]
    pub fn literal(&self, sub: &SubPattern) -> &[u8] {
        match *sub {
            SubPattern::LiteralString { offset, len } => &self.fixed[offset..offset + len],
            SubPattern::SingleCharWildcard { .. } => &[],
        }
    }

    /// 描述匹配计划（用于日志/调试输出）
    pub fn describe(&self) -> String {
        let fixed = String::from_utf8_lossy(&self.fixed);
        match self.kind {
            PatternKind::Exact => format!("exact: {}", fixed),
            PatternKind::Prefix => format!("prefix: {}", fixed),
            PatternKind::Suffix => format!("suffix: {}", fixed),
            PatternKind::Substring => format!("substring: {}", fixed),
            kind => format!(
                "{}: {} sub-patterns, {} any-length wildcards",
                kind,
                self.sub_patterns.len(),
                self.any_positions.len()
            ),
        }
    }

    /// 生成可序列化的计划说明（CLI --explain）
    pub fn explain(&self) -> PlanExplain {
        let sub_patterns = self
            .sub_patterns
            .iter()
            .map(|sub| match *sub {
                SubPattern::LiteralString { offset, len } => {
                    let bytes = self.literal(sub);
                    ExplainedSubPattern::Literal {
                        text: String::from_utf8_lossy(bytes).into_owned(),
                        offset,
                        len,
                        chars: char_count(bytes),
                    }
                }
                SubPattern::SingleCharWildcard { count } => ExplainedSubPattern::Wildcard { count },
            })
            .collect();

        PlanExplain {
            pattern: String::from_utf8_lossy(&self.source).into_owned(),
            escape: self.escape.map(char::from),
            kind: self.kind,
            sub_patterns,
            any_wildcards: self.any_positions.to_vec(),
            fixed_len: self.fixed.len(),
            prefix_len: self.prefix_len,
            suffix_len: self.suffix_len,
            min_input_len: self.min_input_len,
        }
    }
}

impl From<CompiledPattern> for PatternSpec {
    fn from(plan: CompiledPattern) -> Self {
        let pattern = match String::from_utf8(plan.source.into_vec()) {
            Ok(text) => PatternText::Utf8(text),
            Err(e) => PatternText::Bytes(e.into_bytes()),
        };
        PatternSpec {
            pattern,
            escape: plan.escape.map(char::from),
        }
    }
}

impl TryFrom<PatternSpec> for CompiledPattern {
    type Error = RslikeError;

    fn try_from(spec: PatternSpec) -> Result<Self, Self::Error> {
        let escape = match spec.escape {
            Some(c) => Some(
                u8::try_from(c)
                    .map_err(|_| RslikeError::InvalidEscape(format!("'{}' is not a single byte", c)))?,
            ),
            None => None,
        };
        match &spec.pattern {
            PatternText::Utf8(text) => PatternCompiler::compile(text.as_bytes(), escape),
            PatternText::Bytes(bytes) => PatternCompiler::compile(bytes, escape),
        }
    }
}

/// 匹配计划说明
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanExplain {
    pub pattern: String,
    pub escape: Option<char>,
    pub kind: PatternKind,
    pub sub_patterns: Vec<ExplainedSubPattern>,
    pub any_wildcards: Vec<usize>,
    pub fixed_len: usize,
    pub prefix_len: usize,
    pub suffix_len: usize,
    pub min_input_len: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExplainedSubPattern {
    Literal {
        text: String,
        offset: usize,
        len: usize,
        chars: usize,
    },
    Wildcard {
        count: usize,
    },
}
