use unicode_width::UnicodeWidthStr;

use crate::{context::Phase, error::CandidateError};

/// 补全候选（由 completer 产生，可被 UI 展示与用户选择）。
///
/// 构造后不可变：字段私有，只能通过 `with_*` 在构造阶段设置。
/// 相等性按全部字段做结构比较。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Candidate {
    /// 选中后插入缓冲区的文本
    value: String,
    /// 展示文本（可以带类型标注等，与 `value` 不同）
    display: String,
    /// 分组标签；`None` 表示不分组
    group: Option<String>,
    /// 跟在展示文本后面的注释
    description: Option<String>,
    /// 插入完整候选后追加的后缀（例如右括号）
    suffix: Option<String>,
    /// 列表展示时直接选中该候选的快捷键
    key: Option<char>,
    /// 是否是完整 token（决定是否追加后缀/空格）
    complete: bool,
    /// 显式排序键（越小越靠前）
    sort_key: Option<i32>,
}

impl Candidate {
    /// 以 `value` 构造候选：display 与 value 相同，complete 为 true，其余为空。
    ///
    /// 不检查 `value`，用于代码里写死的可信候选；外部输入请用 `try_new`。
    /// 空 `value` 的候选在 engine 过滤阶段被丢弃，不会进入列表。
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            display: value.clone(),
            value,
            group: None,
            description: None,
            suffix: None,
            key: None,
            complete: true,
            sort_key: None,
        }
    }

    /// 同 `new`，但拒绝空 `value`（用于不可信输入，例如文件）。
    pub fn try_new(value: impl Into<String>) -> Result<Self, CandidateError> {
        let value = value.into();
        if value.is_empty() {
            return Err(CandidateError::EmptyValue);
        }
        Ok(Self::new(value))
    }

    /// 设置展示文本；空串保持 display 等于 value。
    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        let display = display.into();
        if !display.is_empty() {
            self.display = display;
        }
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn with_key(mut self, key: char) -> Self {
        self.key = Some(key);
        self
    }

    pub fn with_sort_key(mut self, sort_key: i32) -> Self {
        self.sort_key = Some(sort_key);
        self
    }

    /// 标记为“部分补全”：插入后不追加后缀，补全可以继续。
    pub fn partial(mut self) -> Self {
        self.complete = false;
        self
    }

    pub fn with_complete(mut self, complete: bool) -> Self {
        self.complete = complete;
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    pub fn key(&self) -> Option<char> {
        self.key
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn sort_key(&self) -> Option<i32> {
        self.sort_key
    }

    /// 展示文本在终端里占的列数。
    pub fn width(&self) -> usize {
        self.display.width()
    }
}

/// 会话给宿主的“快照视图”。
///
/// 宿主只读 `UiState`，不直接读写 `Context`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    /// 当前所处的交互阶段
    pub phase: Phase,
    /// 本次事件是否被补全逻辑消费（为 false 时宿主自行处理按键）
    pub consumed: bool,
    /// 列表中当前高亮的候选（菜单顺序下标）
    pub selected: Option<usize>,
    /// 当前持有的候选（菜单顺序）；`Idle` 时为空
    pub candidate_list: Vec<Candidate>,
}
