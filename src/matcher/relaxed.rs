//! 顺序扫描匹配（无回溯）
//! RelaxedPrefix/RelaxedSuffix 除开放端的 `%` 外不含其他 `%`，
//! 每个字面量的位置都是确定的，只需一次正向（反向）扫描

use crate::compiler::{CompiledPattern, SubPattern};
use crate::utils::utf8::{char_width, prev_char_boundary};

/// 从 `start` 正向走完所有子模式，返回结束游标
/// `SINGLE_BYTE` 为 true 时 `_` 直接跳过 N 个字节，不读取内容
#[inline(always)]
pub(crate) fn walk_forward<const SINGLE_BYTE: bool>(
    sub_patterns: &[SubPattern],
    fixed: &[u8],
    input: &[u8],
    start: usize,
) -> Option<usize> {
    let mut cursor = start;
    for sub in sub_patterns {
        match *sub {
            SubPattern::LiteralString { offset, len } => {
                let end = cursor.checked_add(len).filter(|&end| end <= input.len())?;
                if input[cursor..end] != fixed[offset..offset + len] {
                    return None;
                }
                cursor = end;
            }
            SubPattern::SingleCharWildcard { count } => {
                cursor = if SINGLE_BYTE {
                    cursor.checked_add(count).filter(|&end| end <= input.len())?
                } else {
                    skip_chars_forward(input, cursor, count)?
                };
            }
        }
    }
    Some(cursor)
}

/// 从 `end` 反向走完所有子模式（逆序），返回起始游标
#[inline(always)]
pub(crate) fn walk_backward<const SINGLE_BYTE: bool>(
    sub_patterns: &[SubPattern],
    fixed: &[u8],
    input: &[u8],
    end: usize,
) -> Option<usize> {
    let mut cursor = end;
    for sub in sub_patterns.iter().rev() {
        match *sub {
            SubPattern::LiteralString { offset, len } => {
                let begin = cursor.checked_sub(len)?;
                if input[begin..cursor] != fixed[offset..offset + len] {
                    return None;
                }
                cursor = begin;
            }
            SubPattern::SingleCharWildcard { count } => {
                cursor = if SINGLE_BYTE {
                    cursor.checked_sub(count)?
                } else {
                    skip_chars_backward(input, cursor, count)?
                };
            }
        }
    }
    Some(cursor)
}

/// 正向跳过 `count` 个字符
#[inline(always)]
fn skip_chars_forward(input: &[u8], mut cursor: usize, count: usize) -> Option<usize> {
    for _ in 0..count {
        if cursor >= input.len() {
            return None;
        }
        cursor += char_width(input[cursor]);
    }
    // 截断的多字节字符不算完整字符
    (cursor <= input.len()).then_some(cursor)
}

/// 反向跳过 `count` 个字符
#[inline(always)]
fn skip_chars_backward(input: &[u8], mut cursor: usize, count: usize) -> Option<usize> {
    for _ in 0..count {
        if cursor == 0 {
            return None;
        }
        cursor = prev_char_boundary(input, cursor);
    }
    Some(cursor)
}

/// RelaxedPrefix：从输入开头正向扫描
#[inline]
pub(crate) fn matches_relaxed_prefix(plan: &CompiledPattern, input: &[u8], single_byte: bool) -> bool {
    let (subs, fixed) = (plan.sub_patterns(), plan.fixed_bytes());
    if single_byte {
        walk_forward::<true>(subs, fixed, input, 0).is_some()
    } else {
        walk_forward::<false>(subs, fixed, input, 0).is_some()
    }
}

/// RelaxedSuffix：从输入结尾反向扫描
#[inline]
pub(crate) fn matches_relaxed_suffix(plan: &CompiledPattern, input: &[u8], single_byte: bool) -> bool {
    let (subs, fixed) = (plan.sub_patterns(), plan.fixed_bytes());
    if single_byte {
        walk_backward::<true>(subs, fixed, input, input.len()).is_some()
    } else {
        walk_backward::<false>(subs, fixed, input, input.len()).is_some()
    }
}
