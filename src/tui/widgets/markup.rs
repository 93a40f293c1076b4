// ABOUTME: Inline markup transform — escapes control characters, then styles **bold**, *italic* and `code`.
// ABOUTME: Produces ratatui Lines; a newline in the text starts a new Line.

use std::sync::LazyLock;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use regex::Regex;

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern is valid"));
static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(.*?)\*").expect("italic pattern is valid"));
static CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("code pattern is valid"));

/// Presentational attributes accumulated on a run of text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Emphasis {
    pub bold: bool,
    pub italic: bool,
    pub code: bool,
}

impl Emphasis {
    pub const BOLD: Emphasis = Emphasis {
        bold: true,
        italic: false,
        code: false,
    };
    pub const ITALIC: Emphasis = Emphasis {
        bold: false,
        italic: true,
        code: false,
    };
    pub const CODE: Emphasis = Emphasis {
        bold: false,
        italic: false,
        code: true,
    };

    fn union(self, other: Emphasis) -> Emphasis {
        Emphasis {
            bold: self.bold || other.bold,
            italic: self.italic || other.italic,
            code: self.code || other.code,
        }
    }

    pub fn style(self) -> Style {
        let mut style = Style::default();
        if self.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.italic {
            style = style.add_modifier(Modifier::ITALIC);
        }
        if self.code {
            style = style.fg(Color::Yellow);
        }
        style
    }
}

/// A maximal stretch of text sharing one emphasis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub emphasis: Emphasis,
}

#[derive(Debug, Clone, Copy)]
struct Cell {
    ch: char,
    emphasis: Emphasis,
}

/// Replace characters that could drive the terminal with visible stand-ins.
///
/// `\r\n` collapses to `\n`, tabs expand to four spaces, and every other C0
/// control character (and DEL) becomes its Unicode Control Picture, so ESC
/// shows up as `␛` instead of starting an escape sequence.
pub fn escape_controls(text: &str) -> String {
    let text = text.replace("\r\n", "\n");
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\n' => out.push('\n'),
            '\t' => out.push_str("    "),
            '\u{7f}' => out.push('\u{2421}'),
            c if (c as u32) < 0x20 => {
                out.push(char::from_u32(0x2400 + c as u32).unwrap_or('\u{fffd}'))
            }
            c => out.push(c),
        }
    }
    out
}

/// Parse text into lines of styled runs.
///
/// Rules apply over the whole text in a fixed order: bold, italic, code. Bold
/// goes first so `**x**` is never read as two italic markers. Styles from
/// earlier rules are kept on the characters later rules wrap.
pub fn parse(text: &str) -> Vec<Vec<Run>> {
    let escaped = escape_controls(text);
    let mut cells: Vec<Cell> = escaped
        .chars()
        .map(|ch| Cell {
            ch,
            emphasis: Emphasis::default(),
        })
        .collect();

    cells = apply_rule(cells, &BOLD, Emphasis::BOLD);
    cells = apply_rule(cells, &ITALIC, Emphasis::ITALIC);
    cells = apply_rule(cells, &CODE, Emphasis::CODE);

    cells
        .split(|cell| cell.ch == '\n')
        .map(group_runs)
        .collect()
}

/// Render text into styled ratatui Lines.
pub fn render_markup(text: &str) -> Vec<Line<'static>> {
    parse(text)
        .into_iter()
        .map(|runs| {
            Line::from(
                runs.into_iter()
                    .map(|run| Span::styled(run.text, run.emphasis.style()))
                    .collect::<Vec<_>>(),
            )
        })
        .collect()
}

/// Strip the delimiters of every match of `rule` and add `emphasis` to the captured text.
fn apply_rule(cells: Vec<Cell>, rule: &Regex, emphasis: Emphasis) -> Vec<Cell> {
    let text: String = cells.iter().map(|c| c.ch).collect();
    let offsets: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
    let char_index = |byte: usize| offsets.partition_point(|&o| o < byte);

    let mut out = Vec::with_capacity(cells.len());
    let mut cursor = 0;
    for caps in rule.captures_iter(&text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let start = char_index(whole.start());
        out.extend_from_slice(&cells[cursor..start]);
        out.extend(
            cells[char_index(inner.start())..char_index(inner.end())]
                .iter()
                .map(|c| Cell {
                    ch: c.ch,
                    emphasis: c.emphasis.union(emphasis),
                }),
        );
        cursor = char_index(whole.end());
    }
    out.extend_from_slice(&cells[cursor..]);
    out
}

fn group_runs(cells: &[Cell]) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();
    for cell in cells {
        match runs.last_mut() {
            Some(run) if run.emphasis == cell.emphasis => run.text.push(cell.ch),
            _ => runs.push(Run {
                text: cell.ch.to_string(),
                emphasis: cell.emphasis,
            }),
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str, emphasis: Emphasis) -> Run {
        Run {
            text: text.to_string(),
            emphasis,
        }
    }

    fn plain(text: &str) -> Run {
        run(text, Emphasis::default())
    }

    #[test]
    fn plain_text_is_one_run() {
        assert_eq!(parse("hello world"), vec![vec![plain("hello world")]]);
    }

    #[test]
    fn bold_wraps_inner_text_only() {
        assert_eq!(parse("**hi**"), vec![vec![run("hi", Emphasis::BOLD)]]);
    }

    #[test]
    fn italic_and_code() {
        assert_eq!(
            parse("an *aside* and `x = 1`"),
            vec![vec![
                plain("an "),
                run("aside", Emphasis::ITALIC),
                plain(" and "),
                run("x = 1", Emphasis::CODE),
            ]]
        );
    }

    #[test]
    fn bold_runs_before_italic() {
        // Italic first would have produced an empty italic pair around "*a*".
        assert_eq!(
            parse("**a** *b*"),
            vec![vec![
                run("a", Emphasis::BOLD),
                plain(" "),
                run("b", Emphasis::ITALIC),
            ]]
        );
    }

    #[test]
    fn styles_accumulate() {
        let both = Emphasis {
            bold: true,
            italic: true,
            code: false,
        };
        assert_eq!(
            parse("**x *y* z**"),
            vec![vec![
                run("x ", Emphasis::BOLD),
                run("y", both),
                run(" z", Emphasis::BOLD),
            ]]
        );
    }

    #[test]
    fn newlines_split_lines() {
        assert_eq!(
            parse("one\n\n**two**"),
            vec![vec![plain("one")], vec![], vec![run("two", Emphasis::BOLD)]]
        );
    }

    #[test]
    fn italic_does_not_cross_lines() {
        assert_eq!(
            parse("*a\nb*"),
            vec![vec![plain("*a")], vec![plain("b*")]]
        );
    }

    #[test]
    fn code_may_span_lines() {
        assert_eq!(
            parse("`a\nb`"),
            vec![vec![run("a", Emphasis::CODE)], vec![run("b", Emphasis::CODE)]]
        );
    }

    #[test]
    fn unmatched_markers_pass_through() {
        assert_eq!(parse("2 * 3 = 6"), vec![vec![plain("2 * 3 = 6")]]);
        assert_eq!(parse("a ` b"), vec![vec![plain("a ` b")]]);
    }

    #[test]
    fn escape_sequences_are_neutralized() {
        let lines = parse("\u{1b}[31mred\u{1b}[0m");
        assert_eq!(lines, vec![vec![plain("\u{241b}[31mred\u{241b}[0m")]]);
    }

    #[test]
    fn crlf_and_tabs_are_normalized() {
        assert_eq!(escape_controls("a\r\nb\tc\rd"), "a\nb    c\u{240d}d");
    }

    #[test]
    fn multibyte_text_keeps_char_boundaries() {
        assert_eq!(
            parse("héllo **wörld** 🙂"),
            vec![vec![
                plain("héllo "),
                run("wörld", Emphasis::BOLD),
                plain(" 🙂"),
            ]]
        );
    }

    #[test]
    fn render_applies_modifiers() {
        let lines = render_markup("**b** *i* `c`");
        let spans = &lines[0].spans;
        assert_eq!(spans[0].content, "b");
        assert!(spans[0].style.add_modifier.contains(Modifier::BOLD));
        assert!(spans[2].style.add_modifier.contains(Modifier::ITALIC));
        assert_eq!(spans[4].style.fg, Some(Color::Yellow));
    }
}
