//! `filter`：候选后处理（前缀过滤/排序/分组）。

use crate::{
    model::Candidate,
    rank::{self, MissingSortKey},
};

/// Filter：对候选列表做后处理。
pub trait Filter: Send + Sync {
    fn apply(&self, candidates: Vec<Candidate>) -> Vec<Candidate>;
}

/// 只保留 `value` 以 `prefix` 开头的候选。
///
/// 空 `value` 没有可插入的内容，总是被去掉。
pub struct PrefixFilter<'a> {
    pub prefix: &'a str,
    pub case_insensitive: bool,
}

impl Filter for PrefixFilter<'_> {
    fn apply(&self, mut candidates: Vec<Candidate>) -> Vec<Candidate> {
        candidates.retain(|c| !c.value().is_empty());
        if self.prefix.is_empty() {
            return candidates;
        }
        if self.case_insensitive {
            let prefix = self.prefix.to_lowercase();
            candidates.retain(|c| c.value().to_lowercase().starts_with(&prefix));
        } else {
            candidates.retain(|c| c.value().starts_with(self.prefix));
        }
        candidates
    }
}

/// 按 `rank::compare` 稳定排序。
pub struct RankSort {
    pub missing_sort_key: MissingSortKey,
}

impl Filter for RankSort {
    fn apply(&self, mut candidates: Vec<Candidate>) -> Vec<Candidate> {
        rank::sort(&mut candidates, self.missing_sort_key);
        candidates
    }
}

/// 稳定分组：同组候选排到一起，组的先后由该组第一个出现的成员决定。
///
/// 输入应已排好序，这样每组的位置取决于组内排名最高的成员。
pub struct GroupRuns;

impl Filter for GroupRuns {
    fn apply(&self, candidates: Vec<Candidate>) -> Vec<Candidate> {
        let mut runs: Vec<Vec<Candidate>> = Vec::new();
        for c in candidates {
            match runs.iter_mut().find(|run| rank::same_group(&run[0], &c)) {
                Some(run) => run.push(c),
                None => runs.push(vec![c]),
            }
        }
        runs.into_iter().flatten().collect()
    }
}
