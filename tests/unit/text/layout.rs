use super::*;

/// Every char advances 10px; lines are 20px tall.
struct Fixed;

impl TextMeasure for Fixed {
    fn measure(&mut self, text: &str) -> (f32, f32) {
        (text.chars().count() as f32 * 10.0, 20.0)
    }
}

#[test]
fn title_placeholder_with_uppercase() {
    let t = prepare_text("{title}", "Dune", "2021", TextTransform::Uppercase);
    assert_eq!(t, "DUNE");
}

#[test]
fn year_placeholder_and_capitalize() {
    let t = prepare_text("{title} ({year})", "the dark KNIGHT", "2008", TextTransform::Capitalize);
    assert_eq!(t, "The Dark Knight (2008)");
}

#[test]
fn lowercase_and_none_transforms() {
    assert_eq!(apply_transform("AbC", TextTransform::Lowercase), "abc");
    assert_eq!(apply_transform("AbC", TextTransform::None), "AbC");
}

#[test]
fn fitting_line_is_one_line() {
    let lines = wrap_line("HELLO WORLD", 200.0, &mut Fixed);
    assert_eq!(lines, vec!["HELLO WORLD".to_owned()]);
}

#[test]
fn spaceless_overwide_string_breaks_by_char() {
    let s = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let lines = wrap_line(s, 75.0, &mut Fixed);
    assert!(lines.len() > 1);
    assert!(lines.iter().all(|l| Fixed.width(l) <= 75.0), "{lines:?}");
    assert_eq!(lines.concat(), s);
    assert_eq!(lines[0], "ABCDEFG");
}

#[test]
fn greedy_word_wrap() {
    let lines = wrap_line("AAA BBB CCC DDD", 75.0, &mut Fixed);
    assert_eq!(lines, vec!["AAA BBB", "CCC DDD"]);
}

#[test]
fn long_word_after_short_word_is_still_broken() {
    let lines = wrap_line("AB CDEFGHIJKL", 50.0, &mut Fixed);
    assert_eq!(lines, vec!["AB", "CDEFG", "HIJKL"]);
}

#[test]
fn explicit_newlines_and_blank_lines() {
    let lines = wrap_text("ONE\n\nTWO", 1000.0, &mut Fixed);
    assert_eq!(lines, vec!["ONE", "", "TWO"]);
}

#[test]
fn block_height_adds_gap_between_lines() {
    let block = TextBlock::layout("A\nB\nC", 1000.0, 100.0, 1.2, &mut Fixed);
    assert_eq!(block.lines.len(), 3);
    assert_eq!(block.gap, 20.0);
    assert_eq!(block.height(), 3.0 * 20.0 + 2.0 * 20.0);
}

#[test]
fn line_tops_center_the_block() {
    let block = TextBlock::layout("A\nB", 1000.0, 100.0, 1.0, &mut Fixed);
    assert_eq!(block.line_tops(100.0), vec![80.0, 100.0]);
}

#[test]
fn block_width_is_widest_line() {
    let block = TextBlock::layout("AB\nABCD", 1000.0, 10.0, 1.0, &mut Fixed);
    assert_eq!(block.width(), 40.0);
}
