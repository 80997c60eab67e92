//! `processor`：输入事件处理链。
//!
//! Processor 按顺序处理 `InputEvent`，对 `Context` 做状态变更，并可产生 `Action`。
//!
//! 当前链路（`Session::new` 默认组装）：
//! - `KeySelectProcessor`：列表展示时，按候选快捷键直接选中
//! - `EditingProcessor`：缓冲区编辑（Char/Backspace/Delete）让状态回到 Idle；Cancel 关闭列表
//! - `CompletionProcessor`：补全触发，驱动状态机

use crate::{
    context::{Context, Phase},
    engine::Snapshot,
    key_event::{Action, InputEvent, LineView},
    layout::Rendered,
    model::Candidate,
    options::CompletionOptions,
};

/// 给 processors 的对象安全引擎接口（避免在 processors 层引入泛型爆炸）。
pub trait EngineFacade {
    fn options(&self) -> &CompletionOptions;
    /// 取候选：line/cursor -> 菜单顺序的候选
    fn collect(&self, line: &str, cursor: usize) -> Snapshot;
    /// 渲染菜单顺序的候选
    fn render(&self, candidates: &[Candidate], width: usize) -> Rendered;
}

/// Processor 执行结果：是否“消费”了本次事件。
///
/// - `Consume`：本 processor 已处理该事件，后续 processor 不再执行，宿主也不再处理
/// - `Continue`：交给下一个 processor；链尾仍是 `Continue` 时由宿主处理该按键
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    Consume,
    Continue,
}

/// Processor：处理输入事件并改变 Context；必要时产生输出动作。
pub trait Processor: Send + Sync {
    fn process(
        &mut self,
        engine: &dyn EngineFacade,
        context: &mut Context,
        view: &LineView<'_>,
        input_event: &InputEvent,
    ) -> (ProcessStatus, Vec<Action>);
}

pub struct KeySelectProcessor;

impl Processor for KeySelectProcessor {
    fn process(
        &mut self,
        _engine: &dyn EngineFacade,
        context: &mut Context,
        view: &LineView<'_>,
        input_event: &InputEvent,
    ) -> (ProcessStatus, Vec<Action>) {
        match *input_event {
            InputEvent::Char(ch) => match context.select_key(view, ch) {
                Some(actions) => (ProcessStatus::Consume, actions),
                None => (ProcessStatus::Continue, Vec::new()),
            },
            _ => (ProcessStatus::Continue, Vec::new()),
        }
    }
}

/// 编辑事件本身由宿主执行，这里只负责丢弃候选。
pub struct EditingProcessor;

impl Processor for EditingProcessor {
    fn process(
        &mut self,
        _engine: &dyn EngineFacade,
        context: &mut Context,
        _view: &LineView<'_>,
        input_event: &InputEvent,
    ) -> (ProcessStatus, Vec<Action>) {
        match *input_event {
            InputEvent::Char(_) | InputEvent::Backspace | InputEvent::Delete => {
                let actions = match context.reset() {
                    Phase::ListDisplayed => vec![Action::ClearDisplay],
                    _ => Vec::new(),
                };
                (ProcessStatus::Continue, actions)
            }
            InputEvent::Cancel => match context.reset() {
                Phase::Idle => (ProcessStatus::Continue, Vec::new()),
                Phase::AwaitingSecondTrigger => (ProcessStatus::Consume, Vec::new()),
                Phase::ListDisplayed => (ProcessStatus::Consume, vec![Action::ClearDisplay]),
            },
            InputEvent::Complete => (ProcessStatus::Continue, Vec::new()),
        }
    }
}

pub struct CompletionProcessor;

impl Processor for CompletionProcessor {
    fn process(
        &mut self,
        engine: &dyn EngineFacade,
        context: &mut Context,
        view: &LineView<'_>,
        input_event: &InputEvent,
    ) -> (ProcessStatus, Vec<Action>) {
        match *input_event {
            InputEvent::Complete => (ProcessStatus::Consume, context.trigger(engine, view)),
            _ => (ProcessStatus::Continue, Vec::new()),
        }
    }
}
