use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use pretty_assertions::assert_eq;
use tabline_core::{
    Action, Candidate, Completer, CompletionOptions, Engine, InputEvent, LineView, Phase,
    Rendered, Session, StaticCompleter, UiState, WhitespaceSegmenter, segmenter::Segmenter,
};

/// 模拟宿主：持有缓冲区，应用会话给出的动作，未被消费的按键按普通编辑处理。
struct Host {
    line: String,
    cursor: usize,
    width: usize,
    display: Option<Rendered>,
    bells: usize,
}

impl Host {
    fn new(line: &str) -> Self {
        Self {
            line: line.to_owned(),
            cursor: line.len(),
            width: 80,
            display: None,
            bells: 0,
        }
    }

    fn press<C: Completer, S: Segmenter>(
        &mut self,
        session: &mut Session<C, S>,
        ev: InputEvent,
    ) -> (UiState, Vec<Action>) {
        let view = LineView {
            line: &self.line,
            cursor: self.cursor,
            width: self.width,
        };
        let (ui, actions) = session.handle(ev.clone(), view);
        for action in &actions {
            match action {
                Action::Edit(edit) => self.cursor = edit.apply(&mut self.line),
                Action::Display(rendered) => self.display = Some(rendered.clone()),
                Action::ClearDisplay => self.display = None,
                Action::Bell => self.bells += 1,
            }
        }
        if !ui.consumed {
            match ev {
                InputEvent::Char(ch) => {
                    self.line.insert(self.cursor, ch);
                    self.cursor += ch.len_utf8();
                }
                InputEvent::Backspace => {
                    if let Some((i, _)) = self.line[..self.cursor].char_indices().next_back() {
                        self.line.remove(i);
                        self.cursor = i;
                    }
                }
                _ => {}
            }
        }
        (ui, actions)
    }

    fn tab<C: Completer, S: Segmenter>(&mut self, session: &mut Session<C, S>) -> UiState {
        self.press(session, InputEvent::Complete).0
    }
}

fn session(
    candidates: Vec<Candidate>,
    options: CompletionOptions,
) -> Session<StaticCompleter, WhitespaceSegmenter> {
    let engine = Engine::new(StaticCompleter::new(candidates), WhitespaceSegmenter)
        .with_options(options);
    Session::new(engine)
}

fn ranked_foo_bar_zoo() -> Vec<Candidate> {
    vec![
        Candidate::new("foo").with_sort_key(0),
        Candidate::new("bar").with_sort_key(1),
        Candidate::new("zoo").with_sort_key(2),
    ]
}

#[test]
fn second_trigger_inserts_best_ranked_candidate() {
    let mut s = session(ranked_foo_bar_zoo(), CompletionOptions::default());
    let mut host = Host::new("");

    let ui = host.tab(&mut s);
    assert_eq!(ui.phase, Phase::AwaitingSecondTrigger);
    assert_eq!(host.line, "");
    assert!(host.display.is_none());

    let ui = host.tab(&mut s);
    assert_eq!(ui.phase, Phase::ListDisplayed);
    assert_eq!(host.line, "foo");
    assert_eq!(ui.selected, Some(0));
    let display = host.display.as_ref().map(Rendered::text);
    assert_eq!(display.as_deref(), Some("foo   bar   zoo"));
}

#[test]
fn further_triggers_cycle_and_wrap() {
    let mut s = session(ranked_foo_bar_zoo(), CompletionOptions::default());
    let mut host = Host::new("");
    host.tab(&mut s);
    host.tab(&mut s);
    let mut seen = vec![host.line.clone()];
    for _ in 0..3 {
        host.tab(&mut s);
        seen.push(host.line.clone());
    }
    assert_eq!(seen, ["foo", "bar", "zoo", "foo"]);
    let selected = host.display.as_ref().and_then(Rendered::selected_cell).map(|c| c.index);
    assert_eq!(selected, Some(0));
}

#[test]
fn single_match_is_inserted_with_a_trailing_space() {
    let mut s = session(
        vec![Candidate::new("git"), Candidate::new("ls")],
        CompletionOptions::default(),
    );
    let mut host = Host::new("gi");
    let ui = host.tab(&mut s);
    assert_eq!(ui.phase, Phase::Idle);
    assert_eq!(host.line, "git ");
    assert_eq!(host.cursor, 4);
}

#[test]
fn single_match_uses_its_suffix() {
    let mut s = session(
        vec![Candidate::new("print(").with_suffix(")")],
        CompletionOptions::default(),
    );
    let mut host = Host::new("x = pr");
    host.tab(&mut s);
    assert_eq!(host.line, "x = print()");
    assert_eq!(host.cursor, "x = print()".len());
}

#[test]
fn partial_match_gets_no_suffix() {
    let mut s = session(
        vec![Candidate::new("src/").partial()],
        CompletionOptions::default(),
    );
    let mut host = Host::new("cd s");
    host.tab(&mut s);
    assert_eq!(host.line, "cd src/");
}

#[test]
fn common_prefix_is_inserted_before_listing() {
    let mut s = session(
        vec![Candidate::new("checkout"), Candidate::new("cherry-pick")],
        CompletionOptions::default(),
    );
    let mut host = Host::new("git c");

    let ui = host.tab(&mut s);
    assert_eq!(host.line, "git che");
    assert_eq!(ui.phase, Phase::Idle);

    let ui = host.tab(&mut s);
    assert_eq!(host.line, "git che");
    assert_eq!(ui.phase, Phase::AwaitingSecondTrigger);

    let ui = host.tab(&mut s);
    assert_eq!(ui.phase, Phase::ListDisplayed);
    assert_eq!(host.line, "git checkout");
}

#[test]
fn common_prefix_insertion_can_be_disabled() {
    let options = CompletionOptions {
        insert_common_prefix: false,
        ..CompletionOptions::default()
    };
    let mut s = session(
        vec![Candidate::new("checkout"), Candidate::new("cherry-pick")],
        options,
    );
    let mut host = Host::new("c");
    let ui = host.tab(&mut s);
    assert_eq!(host.line, "c");
    assert_eq!(ui.phase, Phase::AwaitingSecondTrigger);
}

#[test]
fn case_insensitive_matching_rewrites_the_word() {
    let options = CompletionOptions {
        case_insensitive: true,
        ..CompletionOptions::default()
    };
    let mut s = session(vec![Candidate::new("Makefile")], options);
    let mut host = Host::new("make");
    host.tab(&mut s);
    assert_eq!(host.line, "Makefile ");
}

#[test]
fn no_candidates_rings_the_bell_and_stays_idle() {
    let mut s = session(vec![Candidate::new("foo")], CompletionOptions::default());
    let mut host = Host::new("xyz");
    let ui = host.tab(&mut s);
    assert_eq!(ui.phase, Phase::Idle);
    assert_eq!(host.bells, 1);
    assert_eq!(host.line, "xyz");
}

#[test]
fn key_selects_candidate_from_the_list() {
    let mut s = session(
        vec![
            Candidate::new("alpha").with_key('a'),
            Candidate::new("beta").with_key('b').with_suffix("="),
        ],
        CompletionOptions::default(),
    );
    let mut host = Host::new("");
    host.tab(&mut s);
    host.tab(&mut s);
    assert_eq!(host.line, "alpha");

    let (ui, _) = host.press(&mut s, InputEvent::Char('b'));
    assert!(ui.consumed);
    assert_eq!(ui.phase, Phase::Idle);
    assert_eq!(host.line, "beta=");
    assert!(host.display.is_none());
}

#[test]
fn typing_dismisses_the_list_and_keeps_the_selection() {
    let mut s = session(ranked_foo_bar_zoo(), CompletionOptions::default());
    let mut host = Host::new("");
    host.tab(&mut s);
    host.tab(&mut s);
    let (ui, _) = host.press(&mut s, InputEvent::Char('x'));
    assert!(!ui.consumed);
    assert_eq!(ui.phase, Phase::Idle);
    assert_eq!(host.line, "foox");
    assert!(host.display.is_none());
}

#[test]
fn edits_discard_candidates_and_re_request_them() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let completer = move |_line: &str, _cursor: usize| {
        counter.fetch_add(1, Ordering::SeqCst);
        vec![Candidate::new("foo"), Candidate::new("fob")]
    };
    let mut s = Session::new(Engine::new(completer, WhitespaceSegmenter));
    let mut host = Host::new("f");

    host.tab(&mut s);
    assert_eq!(host.line, "fo");
    host.tab(&mut s);
    assert_eq!(s.phase(), Phase::AwaitingSecondTrigger);

    host.press(&mut s, InputEvent::Backspace);
    assert_eq!(s.phase(), Phase::Idle);
    assert_eq!(host.line, "f");

    host.tab(&mut s);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn unreported_buffer_change_restarts_the_cycle() {
    let mut s = session(
        vec![Candidate::new("foo"), Candidate::new("bar")],
        CompletionOptions::default(),
    );
    let mut host = Host::new("");
    host.tab(&mut s);
    assert_eq!(s.phase(), Phase::AwaitingSecondTrigger);

    host.line = "b".to_owned();
    host.cursor = 1;
    let ui = host.tab(&mut s);
    assert_eq!(ui.phase, Phase::Idle);
    assert_eq!(host.line, "bar ");
}

#[test]
fn cancel_closes_the_list() {
    let mut s = session(ranked_foo_bar_zoo(), CompletionOptions::default());
    let mut host = Host::new("");
    host.tab(&mut s);
    host.tab(&mut s);
    let (ui, actions) = host.press(&mut s, InputEvent::Cancel);
    assert!(ui.consumed);
    assert_eq!(ui.phase, Phase::Idle);
    assert_eq!(actions, [Action::ClearDisplay]);

    let (ui, actions) = host.press(&mut s, InputEvent::Cancel);
    assert!(!ui.consumed);
    assert!(actions.is_empty());
}

#[test]
fn list_without_auto_menu_waits_for_a_third_trigger() {
    let options = CompletionOptions {
        auto_menu: false,
        ..CompletionOptions::default()
    };
    let mut s = session(ranked_foo_bar_zoo(), options);
    let mut host = Host::new("");
    host.tab(&mut s);
    let ui = host.tab(&mut s);
    assert_eq!(ui.phase, Phase::ListDisplayed);
    assert_eq!(ui.selected, None);
    assert_eq!(host.line, "");
    assert!(host.display.is_some());

    let ui = host.tab(&mut s);
    assert_eq!(ui.selected, Some(0));
    assert_eq!(host.line, "foo");
}

#[test]
fn grouped_list_cycles_in_display_order() {
    let mut s = session(
        vec![
            Candidate::new("ls").with_group("shell").with_sort_key(2),
            Candidate::new("apply").with_group("git").with_sort_key(3),
            Candidate::new("add").with_group("git").with_sort_key(1),
        ],
        CompletionOptions::default(),
    );
    let mut host = Host::new("");
    host.tab(&mut s);
    host.tab(&mut s);
    assert_eq!(host.line, "add");
    host.tab(&mut s);
    assert_eq!(host.line, "apply");
    host.tab(&mut s);
    assert_eq!(host.line, "ls");
    let lines = host.display.map(|r| r.lines).unwrap_or_default();
    assert_eq!(lines, ["git", "add     apply", "", "shell", "ls"]);
}

#[test]
fn cursor_past_the_end_keeps_cycling() {
    let mut s = session(
        vec![Candidate::new("foo"), Candidate::new("bar")],
        CompletionOptions::default(),
    );
    let mut host = Host::new("");
    let mut seen = Vec::new();
    for _ in 0..4 {
        host.cursor = 99;
        let ui = host.tab(&mut s);
        seen.push((ui.phase, host.line.clone()));
    }
    assert_eq!(
        seen,
        [
            (Phase::AwaitingSecondTrigger, String::new()),
            (Phase::ListDisplayed, "bar".to_owned()),
            (Phase::ListDisplayed, "foo".to_owned()),
            (Phase::ListDisplayed, "bar".to_owned()),
        ]
    );
}

#[test]
fn key_select_clamps_cursor_past_the_end() {
    let mut s = session(
        vec![
            Candidate::new("foo").with_key('f'),
            Candidate::new("bar").with_key('b'),
        ],
        CompletionOptions::default(),
    );
    let mut host = Host::new("");
    host.tab(&mut s);
    host.tab(&mut s);
    assert_eq!(host.line, "bar");

    host.cursor = 99;
    let (ui, _) = host.press(&mut s, InputEvent::Char('f'));
    assert!(ui.consumed);
    assert_eq!(host.line, "foo ");
}

#[test]
fn empty_values_never_reach_the_list() {
    let mut s = session(
        vec![Candidate::new(""), Candidate::new("ab")],
        CompletionOptions::default(),
    );
    let mut host = Host::new("");
    let ui = host.tab(&mut s);
    assert_eq!(ui.phase, Phase::Idle);
    assert_eq!(host.line, "ab ");
}
