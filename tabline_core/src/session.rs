//! `Session`：对上层（行编辑器宿主）提供的会话对象。
//!
//! `Session` 自身不做业务逻辑判断，而是：
//! - 持有 `Context`（状态）
//! - 持有 processors 链（可插拔）
//! - 把每次 `InputEvent` 依次交给 processors，直到被消费
//! - 最后输出 `UiState` + `Action`

use crate::{
    completer::Completer,
    context::{Context, Phase},
    engine::Engine,
    key_event::{Action, InputEvent, LineView},
    model::UiState,
    processor::{
        CompletionProcessor, EditingProcessor, KeySelectProcessor, ProcessStatus, Processor,
    },
    segmenter::Segmenter,
};

/// 补全会话（一次次补全交互的状态机容器）。
pub struct Session<C, S> {
    /// 引擎（completer、segmenter、选项）
    engine: Engine<C, S>,
    /// 会话上下文（processors 共享）
    ctx: Context,
    /// processors 链（可配置/可扩展）
    processors: Vec<Box<dyn Processor>>,
}

impl<C, S> Session<C, S>
where
    C: Completer,
    S: Segmenter,
{
    /// 创建会话，并组装默认 processors 链。
    pub fn new(engine: Engine<C, S>) -> Self {
        Self {
            engine,
            ctx: Context::default(),
            processors: vec![
                Box::new(KeySelectProcessor),
                Box::new(EditingProcessor),
                Box::new(CompletionProcessor),
            ],
        }
    }

    pub fn phase(&self) -> Phase {
        self.ctx.phase()
    }

    /// 获取当前 UI 快照（只读）。
    pub fn ui_state(&self) -> UiState {
        self.ctx.ui_state(false)
    }

    /// 处理一个输入事件，返回最新 UI 快照与动作列表。
    ///
    /// `UiState::consumed` 为 false 时，宿主应按平常方式处理该按键。
    pub fn handle(&mut self, ev: InputEvent, view: LineView<'_>) -> (UiState, Vec<Action>) {
        let mut actions = Vec::new();
        let mut consumed = false;
        for p in &mut self.processors {
            let (status, mut a) = p.process(&self.engine, &mut self.ctx, &view, &ev);
            actions.append(&mut a);
            if status == ProcessStatus::Consume {
                consumed = true;
                break;
            }
        }
        (self.ctx.ui_state(consumed), actions)
    }
}
