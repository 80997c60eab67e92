use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::Parser;
use tabline_core::{
    Action, CompletionOptions, Engine, InputEvent, LineView, Phase, Rendered,
    Session, WhitespaceSegmenter,
};
use tabline_tsv::TsvCompleter;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 行式 Tab 补全演示：一行一条命令驱动补全会话。
#[derive(Debug, Parser)]
#[command(name = "tabline", version)]
struct Args {
    /// 候选表（TSV）；默认使用自带的 asset/candidates.tsv
    #[arg(long, value_name = "PATH")]
    candidates: Option<PathBuf>,
    /// 补全选项（TOML）
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// 终端显示宽度
    #[arg(long, default_value_t = 80)]
    width: usize,
    /// 按分组标签展示（覆盖配置）
    #[arg(long, overrides_with = "no_group")]
    group: bool,
    /// 关闭分组展示（覆盖配置）
    #[arg(long, overrides_with = "group")]
    no_group: bool,
    /// 前缀匹配忽略大小写
    #[arg(long)]
    ignore_case: bool,
}

type TsvSession = Session<TsvCompleter, WhitespaceSegmenter>;

/// 宿主侧的缓冲区：应用会话给出的编辑，自己处理未被消费的按键。
struct Buffer {
    line: String,
    cursor: usize,
    width: usize,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut options = match &args.config {
        Some(path) => load_options(path)?,
        None => CompletionOptions::default(),
    };
    if args.group {
        options.group = true;
    } else if args.no_group {
        options.group = false;
    }
    if args.ignore_case {
        options.case_insensitive = true;
    }

    let table_path = args.candidates.clone().unwrap_or_else(default_table_path);
    let completer = TsvCompleter::from_path(&table_path)
        .with_context(|| format!("加载候选表 {} 失败", table_path.display()))?
        .case_insensitive(options.case_insensitive);
    info!(path = %table_path.display(), candidates = completer.len(), ?options, "starting");

    let engine = Engine::new(completer, WhitespaceSegmenter).with_options(options);
    let mut session = Session::new(engine);
    let mut buffer = Buffer {
        line: String::new(),
        cursor: 0,
        width: args.width,
    };
    repl(&mut session, &mut buffer, &table_path)?;
    Ok(())
}

fn init_tracing() {
    // RUST_LOG=tabline_core=debug
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .compact()
        .try_init();
}

fn load_options(path: &Path) -> anyhow::Result<CompletionOptions> {
    let s = fs::read_to_string(path)
        .with_context(|| format!("读取选项文件 {} 失败", path.display()))?;
    CompletionOptions::from_toml_str(&s)
        .with_context(|| format!("解析选项文件 {} 失败", path.display()))
}

fn default_table_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("asset")
        .join("candidates.tsv")
}

fn repl(session: &mut TsvSession, buffer: &mut Buffer, table_path: &Path) -> io::Result<()> {
    let mut out = io::stdout();
    let mut input = String::new();
    writeln!(out, "tabline 演示 | 候选表：{}", table_path.display())?;
    writeln!(
        out,
        "输入文本替换缓冲区；空行或 :tab 触发补全；:key <c> 输入一个字符；:bs 退格；:cancel 关闭列表；:q 退出。"
    )?;

    loop {
        input.clear();
        write!(out, "tab>")?;
        out.flush()?;
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let cmd = input.trim_end_matches(['\r', '\n']);
        match cmd {
            ":q" | ":quit" | ":exit" => break,
            "" | ":tab" => press(session, buffer, InputEvent::Complete, &mut out)?,
            ":bs" => press(session, buffer, InputEvent::Backspace, &mut out)?,
            ":cancel" => press(session, buffer, InputEvent::Cancel, &mut out)?,
            _ => {
                if let Some(rest) = cmd.strip_prefix(":key ") {
                    let mut chars = rest.chars();
                    match (chars.next(), chars.next()) {
                        (Some(ch), None) => {
                            press(session, buffer, InputEvent::Char(ch), &mut out)?;
                        }
                        _ => writeln!(out, "（:key 需要一个字符）")?,
                    }
                } else {
                    // 替换缓冲区：逐个上报删除与输入，让会话丢弃旧候选
                    if session.phase() != Phase::Idle {
                        press(session, buffer, InputEvent::Cancel, &mut out)?;
                    }
                    while buffer.cursor > 0 {
                        press(session, buffer, InputEvent::Backspace, &mut out)?;
                    }
                    buffer.line.clear();
                    for ch in cmd.chars() {
                        press(session, buffer, InputEvent::Char(ch), &mut out)?;
                    }
                }
            }
        }
        let (before, after) = buffer.line.split_at(buffer.cursor);
        writeln!(out, "buffer: {before}|{after}")?;
    }
    Ok(())
}

fn press(
    session: &mut TsvSession,
    buffer: &mut Buffer,
    ev: InputEvent,
    out: &mut impl Write,
) -> io::Result<()> {
    let view = LineView {
        line: &buffer.line,
        cursor: buffer.cursor,
        width: buffer.width,
    };
    let (ui, actions) = session.handle(ev.clone(), view);
    for action in actions {
        match action {
            Action::Edit(edit) => buffer.cursor = edit.apply(&mut buffer.line),
            Action::Display(rendered) => print_list(&rendered, out)?,
            Action::ClearDisplay => writeln!(out, "（列表已关闭）")?,
            Action::Bell => writeln!(out, "（没有可用补全）")?,
        }
    }
    if ui.consumed {
        return Ok(());
    }
    match ev {
        InputEvent::Char(ch) => {
            buffer.line.insert(buffer.cursor, ch);
            buffer.cursor += ch.len_utf8();
        }
        InputEvent::Backspace => {
            if let Some((i, _)) = buffer.line[..buffer.cursor].char_indices().next_back() {
                buffer.line.remove(i);
                buffer.cursor = i;
            }
        }
        _ => {}
    }
    Ok(())
}

/// 打印列表；选中项下方画一行 `^` 标记。
fn print_list(rendered: &Rendered, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "--------------------")?;
    let selected = rendered.selected_cell();
    for (i, line) in rendered.lines.iter().enumerate() {
        writeln!(out, "{line}")?;
        if let Some(cell) = selected.filter(|c| c.line == i) {
            writeln!(out, "{}{}", " ".repeat(cell.column), "^".repeat(cell.width.max(1)))?;
        }
    }
    Ok(())
}
