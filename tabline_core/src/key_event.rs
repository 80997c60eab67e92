use std::ops::Range;

use crate::layout::Rendered;

/// 输入事件（逻辑按键事件）。
///
/// 说明：
/// - `Session`/processor 只关心“语义事件”，不关心具体平台键值。
/// - 宿主负责把终端按键转换成这些事件。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// 请求补全（通常是 Tab）
    Complete,
    /// 输入一个字符；列表展示时若匹配某候选的 `key` 则直接选中
    Char(char),
    /// 删除光标前一个字符
    Backspace,
    /// 删除光标后一个字符
    Delete,
    /// 关闭列表（类似 Esc）
    Cancel,
}

/// 事件发生时宿主缓冲区的只读视图。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineView<'a> {
    /// 当前整行
    pub line: &'a str,
    /// 光标（字节偏移）
    pub cursor: usize,
    /// 终端显示宽度（列）
    pub width: usize,
}

/// 缓冲区修改：把 `range` 替换为 `insert`，然后把光标放到 `cursor`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferEdit {
    pub range: Range<usize>,
    pub insert: String,
    pub cursor: usize,
}

impl BufferEdit {
    /// 应用到一行文本上，返回新的光标位置。
    pub fn apply(&self, line: &mut String) -> usize {
        line.replace_range(self.range.clone(), &self.insert);
        self.cursor
    }
}

/// 会话输出动作（对宿主的“副作用”请求）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// 修改缓冲区
    Edit(BufferEdit),
    /// 在输入行下方展示候选列表
    Display(Rendered),
    /// 收起之前展示的列表
    ClearDisplay,
    /// 没有可用补全（响铃/闪烁由宿主决定）
    Bell,
}
