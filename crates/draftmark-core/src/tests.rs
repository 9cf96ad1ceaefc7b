//! End-to-end tests over the attribute output.
//!
//! These drive a paragraph the way the input loop does and compare the text
//! form of the attribute list.

use crate::config::EngineConfig;
use crate::paragraph::Renderable;
use crate::render::OPEN_ATTR_END;
use crate::span::{Span, SpanId, SpanKind, simplify};
use crate::state::{MarkdownState, OpenToggles};
use crate::text::{EditorRope, EditorString, TextBuffer};

const PARKED_COMPOSE: &str = "0 0 underline single";
const PARKED_CURSOR: &str = "0 0 foreground-alpha 32767";

fn para(text: &str) -> Renderable {
    Renderable::new(text, &EngineConfig::default()).unwrap()
}

fn attr_lines(p: &Renderable) -> Vec<String> {
    p.attributes_string().lines().map(str::to_owned).collect()
}

/// Everything about the state except the handle allocator.
fn observable(state: &MarkdownState) -> (Vec<(SpanId, Span)>, OpenToggles, usize) {
    let spans = state.spans().iter().map(|(id, s)| (id, *s)).collect();
    (spans, state.toggles(), state.scan_offset())
}

fn with_parked(expected: &[&str]) -> Vec<String> {
    [PARKED_COMPOSE, PARKED_CURSOR]
        .iter()
        .chain(expected)
        .map(|s| s.to_string())
        .collect()
}

#[test]
fn test_basic_string() {
    let p = para("hello beaſts!");
    assert_eq!(p.buffer().len_bytes(), 14);
    assert_eq!(p.state().scan_cursor().char_offset(), 13);
    assert_eq!(attr_lines(&p), with_parked(&[]));
}

#[test]
fn test_closed_spans() {
    let cases: &[(&str, &[&str])] = &[
        ("hello _world_!", &["6 13 style italic"]),
        ("_hello_ world!", &["0 7 style italic"]),
        ("hello world_!_", &["11 14 style italic"]),
        ("hello **world**!", &["6 15 weight semibold"]),
        ("**hello** world!", &["0 9 weight semibold"]),
        ("hello world**!**", &["11 16 weight semibold"]),
        (
            "hello **w_orl_d**!",
            &["6 17 weight semibold", "9 14 style italic"],
        ),
        (
            "_**hello**_ world!",
            &["0 11 style italic", "1 10 weight semibold"],
        ),
    ];
    for (text, expected) in cases {
        let p = para(text);
        assert_eq!(p.state().scan_offset(), text.len(), "{text}");
        assert!(p.state().open_bold().is_none(), "{text}");
        assert!(p.state().open_italic().is_none(), "{text}");
        assert_eq!(attr_lines(&p), with_parked(expected), "{text}");
    }
}

#[test]
fn test_open_italics() {
    let p = para("hello _wor");
    assert_eq!(p.state().scan_offset(), 10);
    assert_eq!(p.state().open_italic().map(|s| s.start), Some(6));
    insta::assert_snapshot!(p.attributes_string(), @r"
    0 0 underline single
    0 0 foreground-alpha 32767
    6 4294967295 style italic
    ");
}

#[test]
fn test_multibyte_markup() {
    let p = para("**½** — Behold _the☃ beaſts!_ — _«**Pay attention ☭ now!**»_");
    assert_eq!(
        p.markup().unwrap(),
        r#"<span weight="600">**½**</span> — Behold <i>_the☃ beaſts!_</i> — <i>_«<span weight="600">**Pay attention ☭ now!**</span>»_</i>"#
    );
}

#[test]
fn test_backspace_table() {
    let open = OPEN_ATTR_END;
    let reopened_italic = format!("8 {open} style italic");
    let reopened_bold = format!("11 {open} weight semibold");
    let cases: Vec<(&str, Vec<&str>, bool, bool)> = vec![
        ("We slowly go back.", vec![], false, false),
        ("There were **two** lights", vec!["11 18 weight semibold"], false, false),
        ("This is _only_", vec![reopened_italic.as_str()], false, true),
        ("This **is** only _", vec!["5 11 weight semibold"], false, false),
        (
            "Let us now **_un_bold**",
            vec![reopened_bold.as_str(), "13 17 style italic"],
            true,
            false,
        ),
        ("And now _the_ **", vec!["8 13 style italic"], false, false),
        ("**Multibyte**: ☭", vec!["0 13 weight semibold"], false, false),
        ("This is _only_,", vec!["8 14 style italic"], false, false),
        ("This is **only**,", vec!["8 16 weight semibold"], false, false),
    ];

    for (text, expected, has_bold, has_italic) in cases {
        let mut p = para(text);
        let removed = p.backspace().unwrap();
        let kept: String = {
            let mut chars = text.chars();
            assert_eq!(removed, chars.next_back());
            chars.collect()
        };
        assert_eq!(p.text(), kept, "{text}");
        assert_eq!(p.state().scan_offset(), kept.len(), "{text}");
        assert_eq!(
            p.state().scan_cursor().char_offset(),
            kept.chars().count(),
            "{text}"
        );
        assert_eq!(attr_lines(&p), with_parked(&expected), "{text}");
        assert_eq!(p.state().open_bold().is_some(), has_bold, "{text}");
        assert_eq!(p.state().open_italic().is_some(), has_italic, "{text}");
    }
}

#[test]
fn test_reopen_then_close() {
    let mut p = para("Let us now **_un_bold**");
    p.backspace().unwrap();
    assert_eq!(
        attr_lines(&p),
        with_parked(&["11 4294967295 weight semibold", "13 17 style italic"])
    );

    p.append_chars("*").unwrap();
    insta::assert_snapshot!(p.attributes_string(), @r"
    0 0 underline single
    0 0 foreground-alpha 32767
    11 23 weight semibold
    13 17 style italic
    ");
}

#[test]
fn test_cursor() {
    let mut p = para("You should be writing.");
    let shown = p.cursor().unwrap();
    assert_eq!(shown.text(), "You should be writing._");
    assert_eq!(
        shown.attributes_string(),
        "0 0 underline single\n22 23 foreground-alpha 32767"
    );
    assert_eq!(
        shown.markup().unwrap(),
        r#"You should be writing.<span alpha="50%">_</span>"#
    );
}

#[test]
fn test_type_then_delete_everything() {
    let text = "a **b _c_ d** e _f_ ☃";
    let mut p = para("");
    for c in text.chars() {
        p.append_chars(&c.to_string()).unwrap();
    }
    assert_eq!(p.attributes_string(), para(text).attributes_string());

    while p.backspace().unwrap().is_some() {}
    assert_eq!(p.text(), "");
    assert_eq!(p.attributes_string(), para("").attributes_string());
    assert_eq!(p.state().toggles(), OpenToggles::default());
}

#[test]
fn test_backspace_then_retype_restores_spans() {
    // appending a codepoint and deleting it again leaves the state unchanged
    let text = "x **bold** and _it_ **o";
    for cut in (0..=text.len()).filter(|&i| text.is_char_boundary(i)) {
        let prefix = &text[..cut];
        let rest = &text[cut..];
        let Some(next) = rest.chars().next() else {
            continue;
        };

        let mut p = para(prefix);
        let before = observable(p.state());
        p.append_chars(&next.to_string()).unwrap();
        p.backspace().unwrap();
        assert_eq!(observable(p.state()), before, "appending {next:?} after {prefix:?}");
        assert_eq!(p.text(), prefix);
    }
}

#[test]
fn test_backends_agree() {
    let text = "½ _é_ **☭ x** _tail";
    let config = EngineConfig::default();
    let mut string = Renderable::with_buffer(EditorString::from(text), &config).unwrap();
    let mut rope = Renderable::with_buffer(EditorRope::from(text), &config).unwrap();
    assert_eq!(string.spans(), rope.spans());

    for _ in 0..6 {
        assert_eq!(string.backspace().unwrap(), rope.backspace().unwrap());
        assert_eq!(string.spans(), rope.spans());
        assert_eq!(string.state().toggles(), rope.state().toggles());
    }
}

#[test]
fn test_reallocation_keeps_scanning_correct() {
    let config = EngineConfig {
        initial_capacity: 0,
        ..Default::default()
    };
    let mut p = Renderable::new("", &config).unwrap();
    let text = format!("_ab_ **{}**", "½".repeat(40));
    let mut generations = std::collections::BTreeSet::new();
    generations.insert(p.buffer().generation());
    for c in text.chars() {
        p.append_chars(&c.to_string()).unwrap();
        generations.insert(p.buffer().generation());
    }
    assert!(generations.len() > 1);
    let bold = format!("5 {} weight semibold", text.len());
    assert_eq!(
        attr_lines(&p),
        with_parked(&["0 4 style italic", bold.as_str()])
    );
}

#[test]
fn test_overlays_are_independent() {
    let mut p = para("**a** ");
    {
        let mut compose = p.composing("ka").unwrap();
        let compose_span = *compose
            .spans()
            .get(compose.state().compose_span_id())
            .unwrap();
        {
            let cursor = compose.cursor().unwrap();
            assert_eq!(
                cursor.spans().get(cursor.state().compose_span_id()),
                Some(&compose_span)
            );
        }
        assert_eq!(
            compose.spans().get(compose.state().compose_span_id()),
            Some(&compose_span)
        );
        assert!(!compose.state().is_cursor_shown());
    }
    assert_eq!(p.attributes_string(), para("**a** ").attributes_string());
}

#[test]
fn test_simplify_render_output() {
    let p = para("_a_ **b");
    let simple = simplify(p.spans());
    assert_eq!(simple.len(), 2);
    assert!(simple.iter().all(|(_, s)| s.kind.is_markdown()));
    assert_eq!(simplify(&simple), simple);
    assert_eq!(simple.of_kind(SpanKind::Bold).count(), 1);
}

#[test]
fn test_state_driven_directly() {
    let mut buf = EditorString::from("_a");
    let mut state = MarkdownState::new();
    state.extend(&buf).unwrap();
    buf.push_char('_');
    assert_eq!(state.extend(&buf).unwrap(), 1);
    assert!(state.open_italic().is_none());
}
