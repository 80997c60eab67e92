use tracing::debug;

use crate::completer::Completer;
use crate::filter::{Filter, PrefixFilter};
use crate::layout::{self, Rendered};
use crate::model::Candidate;
use crate::options::CompletionOptions;
use crate::segmenter::{Segmenter, Word};

/// 一次补全请求的结果。
///
/// 每次请求整体替换，不与上一轮共享。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// 请求时的整行
    pub line: String,
    /// 请求时的光标（已收到字符边界）
    pub cursor: usize,
    /// 光标前被补全的词
    pub word: Word,
    /// 过滤后的候选（菜单顺序）
    pub candidate_list: Vec<Candidate>,
}

/// 引擎：把 (line, cursor) 变成排好序的候选，并负责渲染。
///
/// 流水线：segmenter（找词） -> completer（取候选） -> filter（前缀过滤） -> rank/group（排列）
pub struct Engine<C, S> {
    /// 候选来源
    completer: C,
    /// 找出光标前的词
    segmenter: S,
    /// 行为选项
    options: CompletionOptions,
}

impl<C, S> Engine<C, S>
where
    C: Completer,
    S: Segmenter,
{
    pub fn new(completer: C, segmenter: S) -> Self {
        Self {
            completer,
            segmenter,
            options: CompletionOptions::default(),
        }
    }

    /// 替换行为选项。
    pub fn with_options(mut self, options: CompletionOptions) -> Self {
        self.options = options;
        self
    }

    /// 取候选、过滤并排列成菜单顺序。
    pub fn collect(&self, line: &str, cursor: usize) -> Snapshot {
        let word = self.segmenter.word_at(line, cursor);
        let fetched = self.completer.complete(line, word.end);
        let fetched_len = fetched.len();
        let matched = PrefixFilter {
            prefix: &word.text,
            case_insensitive: self.options.case_insensitive,
        }
        .apply(fetched);
        let candidate_list = layout::arrange(matched, &self.options);
        debug!(
            word = %word.text,
            fetched = fetched_len,
            matched = candidate_list.len(),
            "collected completion candidates"
        );
        Snapshot {
            line: line.to_owned(),
            cursor: word.end,
            word,
            candidate_list,
        }
    }

    /// 渲染菜单顺序的候选。
    pub fn render(&self, candidates: &[Candidate], width: usize) -> Rendered {
        layout::render_arranged(candidates, &self.options, width)
    }
}

impl<C, S> crate::processor::EngineFacade for Engine<C, S>
where
    C: Completer,
    S: Segmenter,
{
    fn options(&self) -> &CompletionOptions {
        &self.options
    }

    fn collect(&self, line: &str, cursor: usize) -> Snapshot {
        Engine::<C, S>::collect(self, line, cursor)
    }

    fn render(&self, candidates: &[Candidate], width: usize) -> Rendered {
        Engine::<C, S>::render(self, candidates, width)
    }
}
