//! UTF-8 字符边界探测
//! 通配符 `_` 在多字节输入上按「字符」而不是「字节」前进，依赖这里的宽度计算

/// 由首字节推算该字符占用的字节数
/// 续字节/非法首字节按 1 处理，保证游标总能前进
#[inline(always)]
pub fn char_width(lead: u8) -> usize {
    match lead.leading_ones() {
        0 => 1,
        n @ 2..=4 => n as usize,
        _ => 1,
    }
}

/// 是否为 UTF-8 续字节（10xxxxxx）
#[inline(always)]
pub fn is_continuation(byte: u8) -> bool {
    (byte & 0xC0) == 0x80
}

/// 从 `pos` 起向前越过一个字符，返回该字符的起始偏移
/// 调用方保证 `0 < pos <= bytes.len()`
#[inline(always)]
pub fn prev_char_boundary(bytes: &[u8], pos: usize) -> usize {
    let mut cursor = pos - 1;
    // 最多回退 3 个续字节
    let floor = pos.saturating_sub(4);
    while cursor > floor && is_continuation(bytes[cursor]) {
        cursor -= 1;
    }
    cursor
}

/// 统计字符数（续字节不计数）
#[inline]
pub fn char_count(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&b| !is_continuation(b)).count()
}
