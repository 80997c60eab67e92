use crate::model::Candidate;

/// 候选来源抽象：core 不关心候选来自文件/内存/命令表。
///
/// 约定：
/// - `line` 是当前整行缓冲区，`cursor` 是光标的字节偏移
/// - 返回顺序无关紧要（engine 会重新排序）
/// - 对语法不合法的输入不应 panic，而是返回空列表
pub trait Completer: Send + Sync {
    fn complete(&self, line: &str, cursor: usize) -> Vec<Candidate>;
}

impl<F> Completer for F
where
    F: Fn(&str, usize) -> Vec<Candidate> + Send + Sync,
{
    fn complete(&self, line: &str, cursor: usize) -> Vec<Candidate> {
        self(line, cursor)
    }
}

/// 固定候选表：每次都返回同一组候选，过滤交给 engine。
#[derive(Debug, Clone, Default)]
pub struct StaticCompleter {
    candidates: Vec<Candidate>,
}

impl StaticCompleter {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }
}

impl Completer for StaticCompleter {
    fn complete(&self, _line: &str, _cursor: usize) -> Vec<Candidate> {
        self.candidates.clone()
    }
}
