//! `Context`：processor 链共享的唯一状态容器。
//!
//! 状态机：
//! - `Idle`：没有持有候选；触发补全时向 completer 取候选
//! - `AwaitingSecondTrigger`：第一次触发后候选仍有歧义，等待再次触发
//! - `ListDisplayed`：列表已展示；再次触发循环选择，按候选快捷键直接选中
//!
//! 任何缓冲区编辑都回到 `Idle` 并丢弃候选，下次触发重新向 completer 请求。
use std::ops::Range;

use tracing::debug;

use crate::{
    engine::Snapshot,
    key_event::{Action, BufferEdit, LineView},
    model::{Candidate, UiState},
    processor::EngineFacade,
    segmenter::clamp_cursor,
};

/// 交互阶段（不带数据，给宿主看）。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    AwaitingSecondTrigger,
    ListDisplayed,
}

/// 列表展示阶段的数据。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub snapshot: Snapshot,
    /// 当前高亮的候选（菜单顺序下标）
    pub selected: Option<usize>,
    /// 当前选中文本在缓冲区里占据的范围
    pub slot: Range<usize>,
    /// 最后一次编辑之后缓冲区应有的内容
    pub line: String,
    pub cursor: usize,
}

impl Menu {
    fn matches(&self, view: &LineView<'_>) -> bool {
        self.line == view.line && self.cursor == clamp_cursor(view.line, view.cursor)
    }
}

/// 带数据的状态。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CompletionState {
    #[default]
    Idle,
    AwaitingSecondTrigger(Snapshot),
    ListDisplayed(Menu),
}

impl CompletionState {
    pub fn phase(&self) -> Phase {
        match self {
            Self::Idle => Phase::Idle,
            Self::AwaitingSecondTrigger(_) => Phase::AwaitingSecondTrigger,
            Self::ListDisplayed(_) => Phase::ListDisplayed,
        }
    }
}

/// 补全会话上下文：processor 链共享的唯一状态。
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub state: CompletionState,
}

impl Context {
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// 回到 `Idle` 并丢弃候选，返回之前的阶段。
    pub fn reset(&mut self) -> Phase {
        std::mem::take(&mut self.state).phase()
    }

    /// 生成宿主只读快照。
    pub fn ui_state(&self, consumed: bool) -> UiState {
        let (selected, candidate_list) = match &self.state {
            CompletionState::Idle => (None, Vec::new()),
            CompletionState::AwaitingSecondTrigger(snapshot) => {
                (None, snapshot.candidate_list.clone())
            }
            CompletionState::ListDisplayed(menu) => {
                (menu.selected, menu.snapshot.candidate_list.clone())
            }
        };
        UiState {
            phase: self.phase(),
            consumed,
            selected,
            candidate_list,
        }
    }

    /// 处理一次补全触发。
    pub fn trigger(&mut self, engine: &dyn EngineFacade, view: &LineView<'_>) -> Vec<Action> {
        let cursor = clamp_cursor(view.line, view.cursor);
        match std::mem::take(&mut self.state) {
            CompletionState::Idle => self.start(engine, view),
            CompletionState::AwaitingSecondTrigger(snapshot)
                if snapshot.line == view.line && snapshot.cursor == cursor =>
            {
                self.open_menu(engine, snapshot, view.width)
            }
            CompletionState::ListDisplayed(menu) if menu.matches(view) => {
                self.cycle(engine, menu, view.width)
            }
            stale => {
                // 宿主改了缓冲区却没有上报编辑事件：旧候选作废，重新开始
                debug!(phase = ?stale.phase(), "buffer changed under completion, restarting");
                let mut actions = Vec::new();
                if stale.phase() == Phase::ListDisplayed {
                    actions.push(Action::ClearDisplay);
                }
                actions.extend(self.start(engine, view));
                actions
            }
        }
    }

    /// 列表展示时，按快捷键直接选中候选；没有匹配的候选返回 `None`。
    pub fn select_key(&mut self, view: &LineView<'_>, key: char) -> Option<Vec<Action>> {
        let CompletionState::ListDisplayed(menu) = &self.state else {
            return None;
        };
        if !menu.matches(view) {
            return None;
        }
        let candidate = menu
            .snapshot
            .candidate_list
            .iter()
            .find(|c| c.key() == Some(key))?;
        let edit = accept(&menu.line, menu.slot.clone(), candidate);
        debug!(key = %key, value = candidate.value(), "candidate selected by key");
        self.reset();
        Some(vec![Action::Edit(edit), Action::ClearDisplay])
    }

    fn start(&mut self, engine: &dyn EngineFacade, view: &LineView<'_>) -> Vec<Action> {
        let snapshot = engine.collect(view.line, view.cursor);
        let range = snapshot.word.start..snapshot.cursor;
        match snapshot.candidate_list.as_slice() {
            [] => {
                debug!("no completions available");
                vec![Action::Bell]
            }
            [only] => {
                debug!(value = only.value(), "single candidate inserted");
                vec![Action::Edit(accept(&snapshot.line, range, only))]
            }
            candidates => {
                let options = engine.options();
                if options.insert_common_prefix {
                    let prefix = common_prefix(candidates, options.case_insensitive);
                    if prefix.chars().count() > snapshot.word.text.chars().count() {
                        debug!(prefix = %prefix, "common prefix inserted");
                        return vec![Action::Edit(BufferEdit {
                            cursor: range.start + prefix.len(),
                            range,
                            insert: prefix,
                        })];
                    }
                }
                debug!(
                    candidates = candidates.len(),
                    "ambiguous completion, awaiting second trigger"
                );
                self.state = CompletionState::AwaitingSecondTrigger(snapshot);
                Vec::new()
            }
        }
    }

    fn open_menu(
        &mut self,
        engine: &dyn EngineFacade,
        snapshot: Snapshot,
        width: usize,
    ) -> Vec<Action> {
        let rendered = engine.render(&snapshot.candidate_list, width);
        let mut line = snapshot.line.clone();
        let mut cursor = snapshot.cursor;
        let mut slot = snapshot.word.start..snapshot.cursor;
        let mut actions = Vec::new();

        let selected = if engine.options().auto_menu {
            let edit = replace(slot.clone(), snapshot.candidate_list[0].value());
            cursor = edit.apply(&mut line);
            slot = slot.start..cursor;
            actions.push(Action::Edit(edit));
            Some(0)
        } else {
            None
        };
        actions.push(Action::Display(rendered.with_selection(selected)));
        debug!(candidates = snapshot.candidate_list.len(), ?selected, "completion list displayed");

        self.state = CompletionState::ListDisplayed(Menu {
            snapshot,
            selected,
            slot,
            line,
            cursor,
        });
        actions
    }

    fn cycle(&mut self, engine: &dyn EngineFacade, mut menu: Menu, width: usize) -> Vec<Action> {
        let len = menu.snapshot.candidate_list.len();
        if len == 0 {
            return Vec::new();
        }
        let next = menu.selected.map_or(0, |i| (i + 1) % len);
        let edit = replace(menu.slot.clone(), menu.snapshot.candidate_list[next].value());
        menu.cursor = edit.apply(&mut menu.line);
        menu.slot = menu.slot.start..menu.cursor;
        menu.selected = Some(next);
        let rendered = engine
            .render(&menu.snapshot.candidate_list, width)
            .with_selection(Some(next));
        debug!(selected = next, "completion selection advanced");
        self.state = CompletionState::ListDisplayed(menu);
        vec![Action::Edit(edit), Action::Display(rendered)]
    }
}

fn replace(range: Range<usize>, value: &str) -> BufferEdit {
    BufferEdit {
        cursor: range.start + value.len(),
        range,
        insert: value.to_owned(),
    }
}

/// 采纳一个候选：插入 `value`；完整候选再补上后缀（默认一个空格），
/// 光标后已经是该后缀时只移动光标。
fn accept(line: &str, range: Range<usize>, candidate: &Candidate) -> BufferEdit {
    let mut edit = replace(range, candidate.value());
    if candidate.is_complete() {
        let tail = candidate.suffix().unwrap_or(" ");
        if !line[edit.range.end..].starts_with(tail) {
            edit.insert.push_str(tail);
        }
        edit.cursor += tail.len();
    }
    edit
}

/// 所有候选 `value` 的最长公共前缀（取排名第一的候选的写法）。
fn common_prefix(candidates: &[Candidate], case_insensitive: bool) -> String {
    let Some((first, rest)) = candidates.split_first() else {
        return String::new();
    };
    let mut len = first.value().chars().count();
    for c in rest {
        let shared = first
            .value()
            .chars()
            .zip(c.value().chars())
            .take_while(|(a, b)| {
                if case_insensitive {
                    a.to_lowercase().eq(b.to_lowercase())
                } else {
                    a == b
                }
            })
            .count();
        len = len.min(shared);
    }
    first.value().chars().take(len).collect()
}
