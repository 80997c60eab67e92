//! `layout`：把候选排成对齐的多列文本。
//!
//! 流程：排序（`rank`） -> 分组（可选） -> 每个 run 计算列宽/列数 -> 逐行输出。
//!
//! 约定：
//! - 列宽 = run 内最宽单元 + `COLUMN_GAP`；列数至少为 1
//! - 默认按行填充（从左到右就是排名顺序），`list_rows_first = false` 时按列填充
//! - 每行都不超过终端宽度（按显示列计算）；宽度 0 视为 1
//! - 行尾不留填充空格

use tracing::trace;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::{
    filter::{Filter, GroupRuns, RankSort},
    model::Candidate,
    options::CompletionOptions,
    rank,
};

/// 相邻两列之间的空格数。
pub const COLUMN_GAP: usize = 3;

/// 一段连续渲染的候选（一个分组，或不分组时的全部候选）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run<'a> {
    /// 分组标题；不分组或无标签时为 `None`
    pub label: Option<&'a str>,
    /// 本 run 第一个候选在菜单顺序里的下标
    pub start: usize,
    pub items: &'a [Candidate],
}

/// 一个 run 的列几何。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub max_width: usize,
    pub column_width: usize,
    pub columns: usize,
    pub rows: usize,
}

/// 某个候选在输出里的位置，供宿主做高亮。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// 菜单顺序下标
    pub index: usize,
    /// 所在行（`Rendered::lines` 的下标）
    pub line: usize,
    /// 起始显示列
    pub column: usize,
    /// 占用的显示列数
    pub width: usize,
}

/// 渲染结果。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    pub lines: Vec<String>,
    pub cells: Vec<Cell>,
    /// 当前高亮的候选（菜单顺序下标）
    pub selected: Option<usize>,
}

impl Rendered {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// 各行以 `\n` 连接。
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn with_selection(mut self, selected: Option<usize>) -> Self {
        self.selected = selected;
        self
    }

    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.iter().find(|c| c.index == index)
    }

    pub fn selected_cell(&self) -> Option<&Cell> {
        self.selected.and_then(|i| self.cell(i))
    }
}

/// 排序并（按选项）分组，得到菜单顺序。
pub fn arrange(candidates: Vec<Candidate>, options: &CompletionOptions) -> Vec<Candidate> {
    let ranked = RankSort {
        missing_sort_key: options.missing_sort_key,
    }
    .apply(candidates);
    if options.group {
        GroupRuns.apply(ranked)
    } else {
        ranked
    }
}

/// 把已排列好的候选切成 run。
pub fn runs(arranged: &[Candidate], group: bool) -> Vec<Run<'_>> {
    if arranged.is_empty() {
        return Vec::new();
    }
    if !group {
        return vec![Run {
            label: None,
            start: 0,
            items: arranged,
        }];
    }
    let mut out = Vec::new();
    let mut start = 0;
    for i in 1..=arranged.len() {
        if i == arranged.len() || !rank::same_group(&arranged[start], &arranged[i]) {
            out.push(Run {
                label: arranged[start].group(),
                start,
                items: &arranged[start..i],
            });
            start = i;
        }
    }
    out
}

/// 计算列几何。
pub fn geometry(max_width: usize, count: usize, term_width: usize, rows_first: bool) -> Geometry {
    let term_width = term_width.max(1);
    let column_width = max_width + COLUMN_GAP;
    let mut columns = ((term_width + COLUMN_GAP) / column_width)
        .max(1)
        .min(count.max(1));
    let rows = count.div_ceil(columns);
    // 按列填充时，行数确定后收紧列数，避免出现空列
    if !rows_first && rows > 0 {
        columns = count.div_ceil(rows);
    }
    Geometry {
        max_width,
        column_width,
        columns,
        rows,
    }
}

/// 排序、分组并渲染。
pub fn render(candidates: &[Candidate], options: &CompletionOptions, width: usize) -> Rendered {
    let arranged = arrange(candidates.to_vec(), options);
    render_arranged(&arranged, options, width)
}

/// 渲染已经是菜单顺序的候选。
pub fn render_arranged(arranged: &[Candidate], options: &CompletionOptions, width: usize) -> Rendered {
    let width = width.max(1);
    let mut out = Rendered::default();
    for (n, run) in runs(arranged, options.group).iter().enumerate() {
        if n > 0 {
            out.lines.push(String::new());
        }
        if let Some(label) = run.label {
            out.lines.push(truncate(label, width));
        }
        render_run(run, width, options.list_rows_first, &mut out);
    }
    trace!(
        candidates = arranged.len(),
        lines = out.lines.len(),
        width,
        "rendered completion list"
    );
    out
}

fn render_run(run: &Run<'_>, width: usize, rows_first: bool, out: &mut Rendered) {
    let texts = cell_texts(run.items);
    let max_width = texts.iter().map(|t| t.width()).max().unwrap_or(0);
    let geo = geometry(max_width, texts.len(), width, rows_first);

    for row in 0..geo.rows {
        let slots: Vec<usize> = (0..geo.columns)
            .map(|col| {
                if rows_first {
                    row * geo.columns + col
                } else {
                    col * geo.rows + row
                }
            })
            .filter(|&i| i < texts.len())
            .collect();

        let line_no = out.lines.len();
        let mut line = String::new();
        let mut column = 0;
        for (n, &i) in slots.iter().enumerate() {
            let text = &texts[i];
            let text_width = text.width();
            out.cells.push(Cell {
                index: run.start + i,
                line: line_no,
                column,
                width: text_width.min(width.saturating_sub(column)),
            });
            line.push_str(text);
            if n + 1 < slots.len() {
                pad(&mut line, geo.max_width - text_width + COLUMN_GAP);
                column += geo.column_width;
            }
        }
        out.lines.push(truncate(&line, width));
    }
}

/// 单元文本：有注释时先把展示文本对齐，再接 `  (注释)`。
fn cell_texts(items: &[Candidate]) -> Vec<String> {
    if items.iter().all(|c| c.description().is_none()) {
        return items.iter().map(|c| c.display().to_owned()).collect();
    }
    let display_width = items.iter().map(Candidate::width).max().unwrap_or(0);
    items
        .iter()
        .map(|c| match c.description() {
            Some(description) => {
                let mut text = c.display().to_owned();
                pad(&mut text, display_width - c.width());
                text.push_str("  (");
                text.push_str(description);
                text.push(')');
                text
            }
            None => c.display().to_owned(),
        })
        .collect()
}

fn pad(s: &mut String, n: usize) {
    s.extend(std::iter::repeat_n(' ', n));
}

/// 按显示宽度截断。
fn truncate(s: &str, width: usize) -> String {
    if s.width() <= width {
        return s.to_owned();
    }
    let mut used = 0;
    let mut out = String::new();
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        out.push(ch);
    }
    out
}
