use super::*;

fn field(text: &str, width: usize) -> Document {
    Document::new(
        text,
        Options {
            width,
            indent: 0,
            headshift: 0,
        },
    )
    .expect("failed to build field")
}

fn indented_field(text: &str, width: usize, indent: usize) -> Document {
    Document::new(
        text,
        Options {
            width,
            indent,
            headshift: 0,
        },
    )
    .expect("failed to build field")
}

fn texts(document: &Document) -> Vec<String> {
    document.line_texts().collect()
}

/// The two document-wide invariants: every line but the tail fits its
/// budget, and exactly one line is focused — the current one.
fn assert_field_invariants(document: &Document) {
    let tail = document.chain.tail();
    for id in document.chain.ids() {
        if id != tail {
            assert!(
                document.chain.node(id).line.size() <= document.chain.usable_width(id),
                "line {:?} exceeds its width budget",
                document.chain.node(id).line.text()
            );
        }
    }
    let focused: Vec<_> = document
        .chain
        .ids()
        .filter(|&id| document.chain.node(id).line.focused())
        .collect();
    assert_eq!(focused.len(), 1, "exactly one line must hold the cursor");
    assert_eq!(focused[0], document.current, "current must be the focused line");
}

#[test]
fn normalized_text_round_trips() {
    let text = "the quick fox jumps\nover the lazy dog";
    let document = field(text, 50);
    assert_eq!(document.to_text(), text);
    assert_field_invariants(&document);
}

#[test]
fn input_whitespace_runs_collapse() {
    let document = field("a   b\t c\nd", 50);
    assert_eq!(document.to_text(), "a b c\nd");
}

#[test]
fn trailing_paragraph_breaks_drop() {
    let document = field("abc\n\n", 50);
    assert_eq!(document.line_count(), 1);
    assert_eq!(document.to_text(), "abc");
}

#[test]
fn narrow_field_wraps_at_word_boundaries() {
    let document = field("the quick fox jumps", 10);
    assert_eq!(texts(&document), ["the quick", "fox jumps"]);
    assert_eq!(document.to_text(), "the quick fox jumps");
    assert_field_invariants(&document);
}

#[test]
fn paragraph_break_splits_at_the_cursor() {
    let mut document = field("hello world", 50);
    document.place_cursor(CursorAddress::Linear(5));

    let hint = document.insert_char('\n').expect("paragraph split");

    assert_eq!(hint, Refresh::Whole);
    assert_eq!(document.to_text(), "hello\nworld");
    assert_eq!(document.cursor_row(), 1);
    assert_eq!(document.cursor().linear, 0);
    assert!(document.line_at(0).is_some_and(|line| line.ends_paragraph()));
    assert_field_invariants(&document);
}

#[test]
fn paragraph_break_at_line_start_leaves_a_blank_paragraph() {
    let mut document = field("hello", 50);
    document.insert_char('\n').expect("paragraph split");
    assert_eq!(texts(&document), ["", "hello"]);
    assert_eq!(document.to_text(), "\nhello");
    assert_eq!(document.cursor_row(), 1);
    assert_field_invariants(&document);
}

#[test]
fn paragraph_break_at_a_paragraph_end_moves_to_the_next_paragraph() {
    let mut document = field("foo\nbar", 50);
    document.place_cursor(CursorAddress::Linear(3));
    document.insert_char('\n').expect("paragraph split");
    assert_eq!(document.to_text(), "foo\nbar");
    assert_eq!(document.cursor_row(), 1);
    assert_eq!(document.cursor().linear, 0);
    assert_field_invariants(&document);
}

#[test]
fn forward_delete_at_a_paragraph_end_merges_paragraphs() {
    let mut document = field("foo\nbar", 50);
    document.place_cursor(CursorAddress::Linear(3));

    let hint = document.delete_forward().expect("merge paragraphs");

    assert_eq!(hint, Refresh::Whole);
    assert_eq!(document.to_text(), "foo bar");
    assert_eq!(document.line_count(), 1);
    assert_eq!(document.cursor().linear, 3);
    assert_field_invariants(&document);
}

#[test]
fn forward_delete_absorbs_a_blank_paragraph() {
    let mut document = field("foo\n\nbar", 50);
    assert_eq!(texts(&document), ["foo", "", "bar"]);

    document.place_cursor(CursorAddress::Linear(3));
    document.delete_forward().expect("absorb the blank paragraph");

    assert_eq!(document.line_count(), 2);
    assert_eq!(document.to_text(), "foo\nbar");
    assert_field_invariants(&document);
}

#[test]
fn forward_delete_at_the_field_end_is_a_no_op() {
    let mut document = field("foo\nbar", 50);
    document.document_end();
    let before = document.to_text();

    let hint = document.delete_forward().expect("boundary no-op");

    assert_eq!(hint, Refresh::NoOp);
    assert_eq!(document.to_text(), before);
    assert_eq!(document.cursor().linear, 3);
}

#[test]
fn backward_delete_at_the_field_start_is_a_no_op() {
    let mut document = field("foo", 50);
    let hint = document.delete_backward().expect("boundary no-op");
    assert_eq!(hint, Refresh::NoOp);
    assert_eq!(document.to_text(), "foo");
    assert_eq!(document.cursor().linear, 0);
    assert_field_invariants(&document);
}

#[test]
fn insert_then_backward_delete_restores_the_line() {
    let mut document = field("alpha beta", 50);
    document.place_cursor(CursorAddress::Linear(3));
    let before = texts(&document);

    document.insert_char('x').expect("insert");
    assert_eq!(texts(&document), ["alpxha beta"]);
    document.delete_backward().expect("delete");

    assert_eq!(texts(&document), before);
    assert_eq!(document.cursor().linear, 3);
    assert_eq!(document.cursor().word, 0);
    assert_eq!(document.cursor().offset, 3);
    assert_field_invariants(&document);
}

#[test]
fn typing_past_the_width_wraps_and_carries_the_cursor() {
    let mut document = field("", 10);
    for ch in "aaa bbb ccc".chars() {
        document
            .apply(Operation::InsertChar(ch))
            .expect("typed char");
    }

    assert_eq!(texts(&document), ["aaa bbb", "ccc"]);
    assert_eq!(document.cursor_row(), 1);
    assert_eq!(document.cursor().linear, 3);
    assert_field_invariants(&document);
}

#[test]
fn backward_delete_at_a_line_start_joins_the_wrapped_words() {
    let mut document = field("aaa bbb ccc", 10);
    assert_eq!(texts(&document), ["aaa bbb", "ccc"]);
    document.document_end();
    document.line_start();

    document.delete_backward().expect("join across the wrap");

    assert_eq!(document.line_count(), 1);
    assert_eq!(document.to_text(), "aaa bbbccc");
    assert_eq!(document.cursor().linear, 7);
    assert_field_invariants(&document);
}

#[test]
fn blank_paragraphs_round_trip() {
    let document = field("foo\n\nbar", 50);
    assert_eq!(texts(&document), ["foo", "", "bar"]);
    assert_eq!(document.to_text(), "foo\n\nbar");
    assert_field_invariants(&document);
}

#[test]
fn width_change_rewraps_the_whole_field() {
    let mut document = field("the quick fox jumps over the lazy dog", 40);
    document.place_cursor(CursorAddress::Linear(24));
    let before = document.to_text();

    document.set_width(12).expect("bulk re-wrap");

    assert_eq!(document.to_text(), before);
    assert!(document.line_count() > 1);
    assert_field_invariants(&document);

    document.set_width(40).expect("bulk re-wrap back");
    assert_eq!(document.to_text(), before);
    assert_eq!(document.line_count(), 1);
    assert_field_invariants(&document);
}

#[test]
fn paragraph_first_lines_carry_the_indent() {
    let mut document = indented_field("one two three", 10, 4);
    assert_eq!(texts(&document), ["one", "two three"]);
    assert_eq!(document.cursor_column(), 4, "indent shifts the cursor column");

    let head = document.line_at(0).expect("first line");
    assert_eq!(head.display_text(), "    one");
    assert_eq!(head.visible_text(2), "  one");
    assert!(head.is_paragraph_start());

    let continuation = document.line_at(1).expect("second line");
    assert_eq!(continuation.display_text(), "two three");
    assert!(!continuation.is_paragraph_start());

    document.next_line();
    assert_eq!(document.cursor_column(), 0);
    assert_field_invariants(&document);
}

#[test]
fn scrolling_shifts_the_viewport_mapping() {
    let mut document = field("p1\np2\np3\np4", 50);
    assert_eq!(document.line_at(0).map(|line| line.text()), Some("p1".into()));

    document.scroll_by(2);

    assert_eq!(document.headshift(), 2);
    assert_eq!(document.line_at(0).map(|line| line.text()), Some("p3".into()));
    assert_eq!(document.line_at(1).map(|line| line.text()), Some("p4".into()));
    assert!(document.line_at(2).is_none());
    assert_eq!(document.cursor_row(), -2);

    document.scroll_by(-2);
    assert_eq!(document.cursor_row(), 0);
}

#[test]
fn scrolling_marks_every_line_for_whole_repaint() {
    let mut document = field("p1\np2", 50);
    document.mark_line_clean(0);
    document.mark_line_clean(1);

    document.scroll_by(1);

    assert!(
        document.lines().all(|line| line.freshness() == Freshness::Whole),
        "a scrolled viewport must repaint every line"
    );
}

#[test]
fn repaint_acknowledgement_resets_freshness() {
    let mut document = field("abc", 50);
    assert_ne!(document.line_at(0).map(|line| line.freshness()), Some(Freshness::Clean));

    document.mark_line_clean(0);
    assert_eq!(document.line_at(0).map(|line| line.freshness()), Some(Freshness::Clean));

    document.insert_char('x').expect("insert");
    assert_ne!(
        document.line_at(0).map(|line| line.freshness()),
        Some(Freshness::Clean),
        "an edit must mark its line for repaint"
    );
}

#[test]
fn edits_with_an_address_reposition_first() {
    let mut document = field("hello world", 50);
    document
        .insert_char_at('!', CursorAddress::Linear(5))
        .expect("insert at address");
    assert_eq!(document.to_text(), "hello! world");

    document
        .delete_backward_at(CursorAddress::WordOffset { word: 0, offset: 6 })
        .expect("delete at address");
    assert_eq!(document.to_text(), "hello world");
}

#[test]
fn apply_dispatches_the_closed_operation_set() {
    let mut document = field("foo bar", 50);
    assert_eq!(document.apply(Operation::DocumentEnd), Ok(Refresh::Whole));
    assert_eq!(document.cursor().linear, 7);
    assert_eq!(document.apply(Operation::PrevWord), Ok(Refresh::Cursor));
    assert_eq!(document.cursor().word, 0);
    assert_eq!(document.cursor().linear, 0);
    assert_eq!(document.apply(Operation::InsertChar('x')), Ok(Refresh::Whole));
    assert_eq!(document.to_text(), "xfoo bar");
    assert_eq!(document.apply(Operation::DocumentStart), Ok(Refresh::Whole));
    assert_eq!(document.apply(Operation::PrevChar), Ok(Refresh::NoOp));
}

#[test]
fn line_views_report_rows_and_paragraph_shape() {
    let document = field("aaa bbb ccc\nddd", 10);
    let rows: Vec<usize> = document.lines().map(|line| line.row()).collect();
    assert_eq!(rows, [0, 1, 2]);

    let starts: Vec<bool> = document.lines().map(|line| line.is_paragraph_start()).collect();
    assert_eq!(starts, [true, false, true]);

    let ends: Vec<bool> = document.lines().map(|line| line.ends_paragraph()).collect();
    assert_eq!(ends, [false, true, false]);

    assert!(document.lines().next().is_some_and(|line| line.is_focused()));
}
