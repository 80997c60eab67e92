//! `rank`：候选的全序。
//!
//! 规则依次比较，直到分出先后：
//! 1. `sort_key` 升序（`i32` 的自然顺序，`i32::MIN` 最前、`i32::MAX` 最后）
//! 2. 缺省 `sort_key` 的处理由 `MissingSortKey` 决定
//! 3. `value` 按字节序比较
//! 4. 仍相等则保持 completer 给出的原始顺序（稳定排序）

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::model::Candidate;

/// 没有 `sort_key` 的候选排在哪里。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingSortKey {
    /// 视为 `0`，负数键排在它前面
    #[default]
    AsZero,
    /// 排在所有带 `sort_key` 的候选之后
    Last,
}

fn rank_key(candidate: &Candidate, missing: MissingSortKey) -> (bool, i32) {
    match (candidate.sort_key(), missing) {
        (Some(k), _) => (false, k),
        (None, MissingSortKey::AsZero) => (false, 0),
        (None, MissingSortKey::Last) => (true, 0),
    }
}

/// 比较两个候选的排名。
pub fn compare(a: &Candidate, b: &Candidate, missing: MissingSortKey) -> Ordering {
    rank_key(a, missing)
        .cmp(&rank_key(b, missing))
        .then_with(|| a.value().cmp(b.value()))
}

/// 稳定排序：相等的候选保持原始相对顺序。
pub fn sort(candidates: &mut [Candidate], missing: MissingSortKey) {
    candidates.sort_by(|a, b| compare(a, b, missing));
}

/// 分组判别：分组标签相同（包括都没有）即同组，与排名无关。
pub fn same_group(a: &Candidate, b: &Candidate) -> bool {
    a.group() == b.group()
}
