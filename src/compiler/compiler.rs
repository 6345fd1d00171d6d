//! 模式编译器核心
//! 负责将 LIKE 模式解析为子模式序列，并按结构形态分类

use memchr::memmem::Finder;

use super::pattern::{CompiledPattern, PatternKind, SubPattern};
use crate::error::{LikeResult, RslikeError};
use crate::utils::preview_compact;

/// 日志中模式预览的最大长度
const LOG_PREVIEW_LEN: usize = 64;

/// 模式编译器
pub struct PatternCompiler;

impl PatternCompiler {
    /// 编译 LIKE 模式
    ///
    /// # 参数
    /// - `pattern`: 模式原文（字节串）
    /// - `escape`: 可选的单字节转义符
    ///
    /// # 返回值
    /// - `Ok(CompiledPattern)`: 只读匹配计划
    /// - `Err(RslikeError::InvalidPattern)`: 转义符位于末尾，或转义了 `%`/`_`/转义符以外的字符
    pub fn compile(pattern: &[u8], escape: Option<u8>) -> LikeResult<CompiledPattern> {
        // 1. 解析为子模式序列
        let parsed = Self::parse(pattern, escape)?;

        // 2. 结构分类
        let kind = Self::classify(&parsed);

        // 3. 派生快速路径所需字段
        let fixed_len = parsed.fixed.len();
        let wildcard_chars: usize = parsed
            .sub_patterns
            .iter()
            .map(|sub| match sub {
                SubPattern::SingleCharWildcard { count } => *count,
                SubPattern::LiteralString { .. } => 0,
            })
            .sum();
        let (prefix_len, suffix_len) = match kind {
            PatternKind::Prefix => (fixed_len, 0),
            PatternKind::Suffix => (0, fixed_len),
            _ => (0, 0),
        };
        let finder = match kind {
            PatternKind::Substring => Some(Finder::new(&parsed.fixed).into_owned()),
            _ => None,
        };

        like_debug!(
            "Compiled LIKE pattern | Pattern: {} | Kind: {} | Sub-patterns: {} | Any-length wildcards: {}",
            preview_compact(pattern, LOG_PREVIEW_LEN),
            kind,
            parsed.sub_patterns.len(),
            parsed.any_positions.len()
        );

        Ok(CompiledPattern {
            source: pattern.into(),
            escape,
            fixed: parsed.fixed.into_boxed_slice(),
            sub_patterns: parsed.sub_patterns.into_boxed_slice(),
            any_positions: parsed.any_positions.into_boxed_slice(),
            kind,
            prefix_len,
            suffix_len,
            min_input_len: fixed_len + wildcard_chars,
            finder,
        })
    }

    /// 字符串版本的编译入口，转义符必须是 ASCII 字符
    pub fn compile_str(pattern: &str, escape: Option<char>) -> LikeResult<CompiledPattern> {
        let escape = escape.map(Self::escape_byte).transpose()?;
        Self::compile(pattern.as_bytes(), escape)
    }

    /// 转义符转换为单字节
    pub(crate) fn escape_byte(escape: char) -> LikeResult<u8> {
        if escape.is_ascii() {
            Ok(escape as u8)
        } else {
            Err(RslikeError::InvalidEscape(format!(
                "'{}' is not a single-byte character",
                escape
            )))
        }
    }

    /// 从左到右扫描模式
    fn parse(pattern: &[u8], escape: Option<u8>) -> LikeResult<ParsedPattern> {
        let mut parsed = ParsedPattern::with_capacity(pattern.len());
        let mut bytes = pattern.iter().copied();

        while let Some(byte) = bytes.next() {
            if Some(byte) == escape {
                let Some(escaped) = bytes.next() else {
                    return Err(RslikeError::invalid_pattern(
                        pattern,
                        "escape character at the end of the pattern",
                    ));
                };
                if escaped != b'%' && escaped != b'_' && Some(escaped) != escape {
                    return Err(RslikeError::invalid_pattern(
                        pattern,
                        format!(
                            "escape character must be followed by '%', '_' or itself, found {}",
                            describe_byte(escaped)
                        ),
                    ));
                }
                parsed.push_literal(escaped);
                continue;
            }

            match byte {
                b'%' => parsed.push_any(),
                b'_' => parsed.push_single_char(),
                _ => parsed.push_literal(byte),
            }
        }

        parsed.close_literal();
        Ok(parsed)
    }

    /// 结构分类（第一条命中的规则生效）
    fn classify(parsed: &ParsedPattern) -> PatternKind {
        let subs = &parsed.sub_patterns;
        let anys = &parsed.any_positions;
        let has_wildcard = subs.iter().any(SubPattern::is_wildcard);
        let leading = anys.first() == Some(&0);
        let trailing = anys.last() == Some(&subs.len());

        match anys.len() {
            // 规则1: 无任何通配符
            0 if !has_wildcard => PatternKind::Exact,
            // 规则2: `literal%`，单独的 `%` 视为空前缀
            1 if trailing && !has_wildcard && (subs.is_empty() || (subs.len() == 1 && !leading)) => {
                PatternKind::Prefix
            }
            // 规则3: `%literal`
            1 if leading && !has_wildcard && subs.len() == 1 => PatternKind::Suffix,
            // 规则4: `%literal%`
            2 if leading && trailing && !has_wildcard && subs.len() == 1 => PatternKind::Substring,
            // 规则5: 起始锚定，唯一的 `%` 在结尾
            1 if trailing && !leading => PatternKind::RelaxedPrefix,
            // 规则6: 结尾锚定，唯一的 `%` 在开头
            1 if leading && !trailing => PatternKind::RelaxedSuffix,
            // 规则7: 兜底
            _ => PatternKind::Generic,
        }
    }
}

/// 日志/错误信息中的字节展示
fn describe_byte(byte: u8) -> String {
    if byte.is_ascii_graphic() {
        format!("'{}'", byte as char)
    } else {
        format!("byte 0x{:02X}", byte)
    }
}

/// 解析中间结果
#[derive(Debug, Default)]
struct ParsedPattern {
    fixed: Vec<u8>,
    sub_patterns: Vec<SubPattern>,
    any_positions: Vec<usize>,
    /// 当前未闭合字面量在 fixed 中的起点
    open_literal: Option<usize>,
}

impl ParsedPattern {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            fixed: Vec::with_capacity(capacity),
            ..Default::default()
        }
    }

    #[inline]
    fn push_literal(&mut self, byte: u8) {
        if self.open_literal.is_none() {
            self.open_literal = Some(self.fixed.len());
        }
        self.fixed.push(byte);
    }

    fn close_literal(&mut self) {
        if let Some(offset) = self.open_literal.take() {
            self.sub_patterns.push(SubPattern::LiteralString {
                offset,
                len: self.fixed.len() - offset,
            });
        }
    }

    /// `%`：连续出现只记录一次
    fn push_any(&mut self) {
        self.close_literal();
        let position = self.sub_patterns.len();
        if self.any_positions.last() != Some(&position) {
            self.any_positions.push(position);
        }
    }

    /// `_`：连续出现累加到同一段
    fn push_single_char(&mut self) {
        self.close_literal();
        let separated_by_any = self.any_positions.last() == Some(&self.sub_patterns.len());
        match self.sub_patterns.last_mut() {
            Some(SubPattern::SingleCharWildcard { count }) if !separated_by_any => *count += 1,
            _ => self.sub_patterns.push(SubPattern::SingleCharWildcard { count: 1 }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SubPattern::{LiteralString as Lit, SingleCharWildcard as Wild};

    fn kind_of(pattern: &str) -> PatternKind {
        PatternCompiler::compile_str(pattern, None).unwrap().kind()
    }

    #[test]
    fn test_classification_precedence() {
        assert_eq!(kind_of(""), PatternKind::Exact);
        assert_eq!(kind_of("hello"), PatternKind::Exact);
        assert_eq!(kind_of("hello%"), PatternKind::Prefix);
        assert_eq!(kind_of("hello%%%"), PatternKind::Prefix);
        assert_eq!(kind_of("%"), PatternKind::Prefix);
        assert_eq!(kind_of("%%"), PatternKind::Prefix);
        assert_eq!(kind_of("%hello"), PatternKind::Suffix);
        assert_eq!(kind_of("%hello%"), PatternKind::Substring);
        assert_eq!(kind_of("%%hello%%"), PatternKind::Substring);
        assert_eq!(kind_of("hello_velox%"), PatternKind::RelaxedPrefix);
        assert_eq!(kind_of("_%"), PatternKind::RelaxedPrefix);
        assert_eq!(kind_of("%_"), PatternKind::RelaxedSuffix);
        assert_eq!(kind_of("%he_lo"), PatternKind::RelaxedSuffix);
        assert_eq!(kind_of("h_e_l_l_o"), PatternKind::Generic);
        assert_eq!(kind_of("_"), PatternKind::Generic);
        assert_eq!(kind_of("a%b"), PatternKind::Generic);
        assert_eq!(kind_of("%a_c%"), PatternKind::Generic);
        assert_eq!(kind_of("%a%b%"), PatternKind::Generic);
        assert_eq!(kind_of("_%_"), PatternKind::Generic);
    }

    #[test]
    fn test_parse_sub_patterns() {
        let plan = PatternCompiler::compile_str("ab__c%d_", None).unwrap();
        assert_eq!(plan.fixed_bytes(), b"abcd");
        assert_eq!(
            plan.sub_patterns(),
            &[
                Lit { offset: 0, len: 2 },
                Wild { count: 2 },
                Lit { offset: 2, len: 1 },
                Lit { offset: 3, len: 1 },
                Wild { count: 1 },
            ]
        );
        assert_eq!(plan.any_wildcard_positions(), &[3]);
        assert_eq!(plan.min_input_len(), 7);
    }

    #[test]
    fn test_wildcard_runs_split_by_any() {
        // 测试场景：`_%_` 中两个 `_` 被 `%` 隔开，不能合并
        let plan = PatternCompiler::compile_str("_%_", None).unwrap();
        assert_eq!(plan.sub_patterns(), &[Wild { count: 1 }, Wild { count: 1 }]);
        assert_eq!(plan.any_wildcard_positions(), &[1]);
    }

    #[test]
    fn test_derived_lengths() {
        let plan = PatternCompiler::compile_str("hello%", None).unwrap();
        assert_eq!((plan.prefix_len(), plan.suffix_len(), plan.fixed_len()), (5, 0, 5));
        let plan = PatternCompiler::compile_str("%hello", None).unwrap();
        assert_eq!((plan.prefix_len(), plan.suffix_len(), plan.fixed_len()), (0, 5, 5));
        let plan = PatternCompiler::compile_str("%", None).unwrap();
        assert_eq!((plan.prefix_len(), plan.min_input_len()), (0, 0));
    }

    #[test]
    fn test_escape_makes_wildcards_literal() {
        let plan = PatternCompiler::compile_str("a#_c", Some('#')).unwrap();
        assert_eq!(plan.kind(), PatternKind::Exact);
        assert_eq!(plan.fixed_bytes(), b"a_c");
        assert_eq!(plan.sub_patterns(), &[Lit { offset: 0, len: 3 }]);

        let plan = PatternCompiler::compile_str("100#%%", Some('#')).unwrap();
        assert_eq!(plan.kind(), PatternKind::Prefix);
        assert_eq!(plan.fixed_bytes(), b"100%");

        let plan = PatternCompiler::compile_str("a##b", Some('#')).unwrap();
        assert_eq!(plan.fixed_bytes(), b"a#b");
    }

    #[test]
    fn test_without_escape_backslash_is_literal() {
        let plan = PatternCompiler::compile_str(r"a\_", None).unwrap();
        assert_eq!(plan.kind(), PatternKind::Generic);
        assert_eq!(plan.fixed_bytes(), b"a\\");
    }

    #[test]
    fn test_invalid_escape_usage() {
        // 测试场景：转义符在末尾
        let err = PatternCompiler::compile_str("abc#", Some('#')).unwrap_err();
        assert!(matches!(err, RslikeError::InvalidPattern { .. }));
        assert!(err.to_string().contains("end of the pattern"));

        // 测试场景：转义普通字符
        let err = PatternCompiler::compile_str("a#bc", Some('#')).unwrap_err();
        assert_eq!(
            err,
            RslikeError::InvalidPattern {
                pattern: "a#bc".to_string(),
                reason: "escape character must be followed by '%', '_' or itself, found 'b'".to_string(),
            }
        );

        // 测试场景：非 ASCII 转义符
        let err = PatternCompiler::compile_str("abc", Some('é')).unwrap_err();
        assert!(matches!(err, RslikeError::InvalidEscape(_)));
    }

    #[test]
    fn test_compile_is_deterministic() {
        for pattern in ["", "%", "a_b%", "%x_y", "%a%b_%", "__", "%中_文%"] {
            let first = PatternCompiler::compile_str(pattern, None).unwrap();
            let second = PatternCompiler::compile_str(pattern, None).unwrap();
            assert_eq!(first.kind(), second.kind(), "{}", pattern);
            assert_eq!(first.sub_patterns(), second.sub_patterns(), "{}", pattern);
            assert_eq!(first.fixed_bytes(), second.fixed_bytes(), "{}", pattern);
        }
    }
}
