//! `segmenter`：找出光标前正在补全的“词”。
//!
//! 候选的 `value` 会替换这个词；前缀过滤与公共前缀也都以它为基准。

/// 被补全的词：`line[start..end]`，`end` 就是光标。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// Segmenter：给定整行与光标，返回光标前的词。
pub trait Segmenter: Send + Sync {
    fn word_at(&self, line: &str, cursor: usize) -> Word;
}

/// 默认切分：从光标往回找到最近的空白为止。
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceSegmenter;

impl Segmenter for WhitespaceSegmenter {
    fn word_at(&self, line: &str, cursor: usize) -> Word {
        let end = clamp_cursor(line, cursor);
        let start = line[..end]
            .char_indices()
            .rev()
            .find(|(_, ch)| ch.is_whitespace())
            .map_or(0, |(i, ch)| i + ch.len_utf8());
        Word {
            start,
            end,
            text: line[start..end].to_owned(),
        }
    }
}

/// 把光标收到行内，并退到最近的字符边界。
pub fn clamp_cursor(line: &str, cursor: usize) -> usize {
    let mut c = cursor.min(line.len());
    while !line.is_char_boundary(c) {
        c -= 1;
    }
    c
}
