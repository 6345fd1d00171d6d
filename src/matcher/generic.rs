//! 通用匹配：任意组合的 `%` / `_` / 字面量
//!
//! 以 `%` 为界把子模式切成若干块，每块长度（按字符）固定：
//! 1. 首块锚定在输入开头，尾块锚定在输入结尾，二者不得重叠
//! 2. 中间各块在首尾之间按从左到右的最左位置依次放置
//!
//! 块内长度固定，最左放置给后续块留下的空间最大，因此贪心放置与
//! 标准 LIKE 语义等价，不需要回溯到更早的块。

use memchr::memmem;

use super::relaxed::{walk_backward, walk_forward};
use crate::compiler::{CompiledPattern, SubPattern};
use crate::utils::utf8::{char_width, is_continuation};

/// 通用匹配入口
pub(crate) fn matches_generic<const SINGLE_BYTE: bool>(plan: &CompiledPattern, input: &[u8]) -> bool {
    let subs = plan.sub_patterns();
    let fixed = plan.fixed_bytes();
    let anys = plan.any_wildcard_positions();

    let (Some(&first_any), Some(&last_any)) = (anys.first(), anys.last()) else {
        // 无 `%`：两端同时锚定
        return walk_forward::<SINGLE_BYTE>(subs, fixed, input, 0) == Some(input.len());
    };

    // 1. 首块
    let Some(head_end) = walk_forward::<SINGLE_BYTE>(&subs[..first_any], fixed, input, 0) else {
        return false;
    };
    // 2. 尾块
    let Some(tail_start) = walk_backward::<SINGLE_BYTE>(&subs[last_any..], fixed, input, input.len())
    else {
        return false;
    };
    if head_end > tail_start {
        return false;
    }

    // 3. 中间块只能落在首尾之间
    let window = &input[..tail_start];
    let mut cursor = head_end;
    for bounds in anys.windows(2) {
        let block = &subs[bounds[0]..bounds[1]];
        match find_block::<SINGLE_BYTE>(block, fixed, window, cursor) {
            Some(end) => cursor = end,
            None => return false,
        }
    }
    true
}

/// 在 `window[start..]` 中寻找块的最左匹配，返回匹配结束位置
fn find_block<const SINGLE_BYTE: bool>(
    block: &[SubPattern],
    fixed: &[u8],
    window: &[u8],
    mut start: usize,
) -> Option<usize> {
    // 块以字面量开头：用 memmem 跳到候选位置
    if let Some(&SubPattern::LiteralString { offset, len }) = block.first() {
        let finder = memmem::Finder::new(&fixed[offset..offset + len]);
        while start <= window.len() {
            let candidate = start + finder.find(&window[start..])?;
            if SINGLE_BYTE || !is_continuation(window[candidate]) {
                if let Some(end) = walk_forward::<SINGLE_BYTE>(block, fixed, window, candidate) {
                    return Some(end);
                }
            }
            start = candidate + 1;
        }
        return None;
    }

    // 块以 `_` 开头：逐字符尝试起点
    loop {
        if let Some(end) = walk_forward::<SINGLE_BYTE>(block, fixed, window, start) {
            return Some(end);
        }
        if start >= window.len() {
            return None;
        }
        start += if SINGLE_BYTE { 1 } else { char_width(window[start]) };
    }
}
