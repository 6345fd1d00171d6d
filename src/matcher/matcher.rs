//! 运行时匹配器
//! 严格按 PatternKind 分发：精确/前缀/后缀/子串直接字节比较，
//! Relaxed 类顺序扫描，其余走通用匹配

use super::{generic, relaxed};
use crate::compiler::{CompiledPattern, PatternKind};

/// 模式匹配器（无状态，计划只读共享）
pub struct PatternMatcher;

impl PatternMatcher {
    /// 执行匹配（核心匹配逻辑）
    ///
    /// # 参数
    /// - `input`: 待匹配字节串
    /// - `plan`: 编译后的匹配计划
    /// - `single_byte`: 输入是否为单字节编码（纯 ASCII）。为 true 时 `_` 按字节跳过
    ///
    /// # 返回值
    /// 是否匹配。输入与字面量缓冲区必须是所声明编码下的合法字节序列
    #[inline(always)]
    pub fn matches(input: &[u8], plan: &CompiledPattern, single_byte: bool) -> bool {
        // 每个 `_` 至少占一个字节，短于下限直接失败
        if input.len() < plan.min_input_len() {
            return false;
        }

        match plan.kind() {
            PatternKind::Exact => input == plan.fixed_bytes(),
            PatternKind::Prefix => input[..plan.prefix_len()] == *plan.fixed_bytes(),
            PatternKind::Suffix => input[input.len() - plan.suffix_len()..] == *plan.fixed_bytes(),
            PatternKind::Substring => match &plan.finder {
                Some(finder) => finder.find(input).is_some(),
                None => true,
            },
            PatternKind::RelaxedPrefix => relaxed::matches_relaxed_prefix(plan, input, single_byte),
            PatternKind::RelaxedSuffix => relaxed::matches_relaxed_suffix(plan, input, single_byte),
            PatternKind::Generic => Self::matches_generic(input, plan, single_byte),
        }
    }

    /// 字符串匹配，单字节标志由 `is_ascii` 推导
    #[inline(always)]
    pub fn matches_str(input: &str, plan: &CompiledPattern) -> bool {
        Self::matches(input.as_bytes(), plan, input.is_ascii())
    }

    /// 忽略分类，强制走通用匹配（快速路径一致性校验用）
    pub fn matches_generic(input: &[u8], plan: &CompiledPattern, single_byte: bool) -> bool {
        if single_byte {
            generic::matches_generic::<true>(plan, input)
        } else {
            generic::matches_generic::<false>(plan, input)
        }
    }

    /// 批量匹配：单字节标志对整批只计算一次
    pub fn matches_batch<S: AsRef<[u8]>>(inputs: &[S], plan: &CompiledPattern) -> Vec<bool> {
        let single_byte = inputs.iter().all(|input| input.as_ref().is_ascii());
        like_trace!(
            "Batch match | Rows: {} | Kind: {} | Single-byte: {}",
            inputs.len(),
            plan.kind(),
            single_byte
        );
        inputs
            .iter()
            .map(|input| Self::matches(input.as_ref(), plan, single_byte))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::PatternCompiler;

    fn plan(pattern: &str) -> CompiledPattern {
        PatternCompiler::compile_str(pattern, None).unwrap()
    }

    #[test]
    fn test_prefix_scenarios() {
        let p = plan("hello%");
        assert_eq!(p.kind(), PatternKind::Prefix);
        assert!(p.matches("helloworld"));
        assert!(p.matches("hello"));
        assert!(!p.matches("hell"));
        assert!(!p.matches("xhello"));
    }

    #[test]
    fn test_suffix_scenarios() {
        let p = plan("%hello");
        assert_eq!(p.kind(), PatternKind::Suffix);
        assert!(p.matches("sayhello"));
        assert!(!p.matches("hello!"));
        assert!(!p.matches("ello"));
    }

    #[test]
    fn test_substring_scenarios() {
        let p = plan("%hello%");
        assert_eq!(p.kind(), PatternKind::Substring);
        assert!(p.matches("xhelloy"));
        assert!(p.matches("hello"));
        assert!(!p.matches("hllo"));
        assert!(plan("%🔥%").matches("hello 🔥"));
    }

    #[test]
    fn test_relaxed_prefix_scenarios() {
        let p = plan("hello_velox%");
        assert_eq!(p.kind(), PatternKind::RelaxedPrefix);
        assert!(p.matches("helloXvelox123"));
        assert!(p.matches("hello中velox"));
        assert!(!p.matches("helloveloxextra"));
    }

    #[test]
    fn test_exact_and_empty() {
        // 测试场景：空模式只匹配空输入
        let empty = plan("");
        assert!(empty.matches(""));
        assert!(!empty.matches("a"));

        let escaped = PatternCompiler::compile_str("a#_c", Some('#')).unwrap();
        assert_eq!(escaped.kind(), PatternKind::Exact);
        assert!(escaped.matches("a_c"));
        assert!(!escaped.matches("abc"));
    }

    #[test]
    fn test_match_all() {
        let p = plan("%");
        assert!(p.matches(""));
        assert!(p.matches("anything 中文"));
    }

    #[test]
    fn test_short_input_rejected_before_dispatch() {
        let p = plan("%abc_");
        assert_eq!(p.min_input_len(), 4);
        assert!(!PatternMatcher::matches(b"abc", &p, true));
        assert!(PatternMatcher::matches(b"abcd", &p, true));
    }

    #[test]
    fn test_underscore_counts_characters_not_bytes() {
        let p = plan("h_e_l_l_o");
        assert!(p.matches("h中e_l_l_o"));
        assert!(p.matches("h🔥e_l_l_o"));
        assert!(!p.matches("h中文e_l_l_o"));
        assert!(!p.matches("he_l_l_o"));
    }

    #[test]
    fn test_batch_uses_single_flag() {
        let p = plan("a_c%");
        let ascii = ["abc", "abcd", "ac", "xbc"];
        assert_eq!(PatternMatcher::matches_batch(&ascii, &p), vec![true, true, false, false]);

        // 测试场景：整批含多字节字符时全部按字符匹配
        let mixed = vec!["abc".to_string(), "a中c".to_string(), "a中文c".to_string()];
        assert_eq!(PatternMatcher::matches_batch(&mixed, &p), vec![true, true, false]);
    }

    #[test]
    fn test_fast_paths_agree_with_generic() {
        let inputs = ["", "a", "hello", "helloXvelox", "xhelloy", "sayhello", "h中llo", "中文"];
        for pattern in ["hello", "hello%", "%hello", "%hello%", "hello_velox%", "%l_o", "h_llo%", "%"] {
            let p = plan(pattern);
            assert!(p.kind().is_fast_path(), "{}", pattern);
            for input in inputs {
                let single_byte = input.is_ascii();
                assert_eq!(
                    PatternMatcher::matches(input.as_bytes(), &p, single_byte),
                    PatternMatcher::matches_generic(input.as_bytes(), &p, single_byte),
                    "pattern={} input={}",
                    pattern,
                    input
                );
            }
        }
    }
}
