use std::{collections::BTreeMap, fs, io, path::Path};

use tabline_core::{
    Candidate, Completer,
    segmenter::{Segmenter, WhitespaceSegmenter},
};
use tracing::debug;

/// 读取/解析候选表时的错误，行号从 1 开始。
#[derive(Debug, thiserror::Error)]
pub enum TsvError {
    #[error("读取候选表失败：{0}")]
    Io(#[from] io::Error),
    #[error("TSV 第 {line} 行缺少 value")]
    MissingValue { line: usize },
    #[error("TSV 第 {line} 行 sort 不是整数：{value:?}")]
    SortKey { line: usize, value: String },
    #[error("TSV 第 {line} 行 key 必须是单个字符：{value:?}")]
    Key { line: usize, value: String },
    #[error("TSV 第 {line} 行 complete 无法识别：{value:?}")]
    Flag { line: usize, value: String },
}

/// TSV 格式：
///
/// - `value<TAB>sort<TAB>group<TAB>description<TAB>display<TAB>suffix<TAB>key<TAB>complete`
/// - 只有 value 必填；后面的列可以省略，空单元表示“没有”
/// - complete 接受 `true/false/1/0/yes/no`，默认 true
/// - 允许 `#` 开头注释行
#[derive(Debug)]
pub struct TsvCompleter {
    map: BTreeMap<String, Vec<Candidate>>,
    case_insensitive: bool,
}

impl TsvCompleter {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TsvError> {
        let s = fs::read_to_string(path)?;
        Self::from_tsv_str(&s)
    }

    pub fn from_tsv_str(s: &str) -> Result<Self, TsvError> {
        let mut map: BTreeMap<String, Vec<Candidate>> = BTreeMap::new();
        let mut count = 0;
        for (idx, raw) in s.lines().enumerate() {
            let line = idx + 1;
            if raw.trim().is_empty() || raw.trim_start().starts_with('#') {
                continue;
            }
            let candidate = parse_row(raw, line)?;
            map.entry(candidate.value().to_owned())
                .or_default()
                .push(candidate);
            count += 1;
        }
        debug!(candidates = count, "loaded candidate table");
        Ok(Self {
            map,
            case_insensitive: false,
        })
    }

    /// 前缀查找忽略大小写（退化为全表扫描）。
    pub fn case_insensitive(mut self, on: bool) -> Self {
        self.case_insensitive = on;
        self
    }

    pub fn len(&self) -> usize {
        self.map.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn prefix_candidates(&self, prefix: &str, out: &mut Vec<Candidate>) {
        if self.case_insensitive {
            let prefix = prefix.to_lowercase();
            for (value, entries) in &self.map {
                if value.to_lowercase().starts_with(&prefix) {
                    out.extend(entries.iter().cloned());
                }
            }
            return;
        }
        for (value, entries) in self.map.range(prefix.to_owned()..) {
            if !value.starts_with(prefix) {
                break;
            }
            out.extend(entries.iter().cloned());
        }
    }
}

impl Completer for TsvCompleter {
    fn complete(&self, line: &str, cursor: usize) -> Vec<Candidate> {
        let word = WhitespaceSegmenter.word_at(line, cursor);
        let mut out = Vec::new();
        self.prefix_candidates(&word.text, &mut out);
        out
    }
}

fn cell<'a>(cols: &[&'a str], i: usize) -> Option<&'a str> {
    cols.get(i).map(|c| c.trim()).filter(|c| !c.is_empty())
}

fn parse_row(raw: &str, line: usize) -> Result<Candidate, TsvError> {
    let cols: Vec<&str> = raw.split('\t').collect();
    let value = cell(&cols, 0).ok_or(TsvError::MissingValue { line })?;
    let mut candidate =
        Candidate::try_new(value).map_err(|_| TsvError::MissingValue { line })?;

    if let Some(sort) = cell(&cols, 1) {
        let k = sort.parse::<i32>().map_err(|_| TsvError::SortKey {
            line,
            value: sort.to_owned(),
        })?;
        candidate = candidate.with_sort_key(k);
    }
    if let Some(group) = cell(&cols, 2) {
        candidate = candidate.with_group(group);
    }
    if let Some(description) = cell(&cols, 3) {
        candidate = candidate.with_description(description);
    }
    if let Some(display) = cell(&cols, 4) {
        candidate = candidate.with_display(display);
    }
    if let Some(suffix) = cell(&cols, 5) {
        candidate = candidate.with_suffix(suffix);
    }
    if let Some(key) = cell(&cols, 6) {
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => candidate = candidate.with_key(ch),
            _ => {
                return Err(TsvError::Key {
                    line,
                    value: key.to_owned(),
                });
            }
        }
    }
    if let Some(flag) = cell(&cols, 7) {
        let complete = match flag.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => true,
            "false" | "0" | "no" => false,
            _ => {
                return Err(TsvError::Flag {
                    line,
                    value: flag.to_owned(),
                });
            }
        };
        candidate = candidate.with_complete(complete);
    }
    Ok(candidate)
}
