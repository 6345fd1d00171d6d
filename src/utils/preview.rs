use std::fmt::{self, Write};

// ======================== 输出截断工具函数 ========================
/// 空白字符折叠 + 截断 - 零堆分配的日志预览核心函数
/// 逻辑：
/// 1. 按 UTF-8 分块遍历，合法字符原样输出，非法字节输出为 `\xNN`
/// 2. 连续空白折叠为单个空格（不修改原字节串，仅格式化输出）
/// 3. 达到最大长度时输出省略号并立即终止
#[inline(always)]
pub fn preview_compact(source: &[u8], max_len: usize) -> impl fmt::Display + '_ {
    struct CompactView<'a> {
        source: &'a [u8],
        max_length: usize,
    }

    impl fmt::Display for CompactView<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let mut char_count = 0;
            let mut last_was_whitespace = false;

            for chunk in self.source.utf8_chunks() {
                for ch in chunk.valid().chars() {
                    if char_count >= self.max_length {
                        return f.write_str("…");
                    }

                    if ch.is_whitespace() {
                        if !last_was_whitespace {
                            f.write_char(' ')?;
                            char_count += 1;
                            last_was_whitespace = true;
                        }
                    } else {
                        f.write_char(ch)?;
                        char_count += 1;
                        last_was_whitespace = false;
                    }
                }

                for byte in chunk.invalid() {
                    if char_count >= self.max_length {
                        return f.write_str("…");
                    }
                    write!(f, "\\x{:02X}", byte)?;
                    char_count += 1;
                    last_was_whitespace = false;
                }
            }
            Ok(())
        }
    }

    CompactView {
        source,
        max_length: max_len,
    }
}
