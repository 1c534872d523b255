use std::io::{self, Write};

use bat::PrettyPrinter;
use console::{measure_text_width, style, Term};

/// Prints assistant output as it accumulates.
///
/// Each update carries the full running text; only the not-yet-shown suffix
/// is written, so the visible stream grows in place. The printer tracks how
/// many terminal rows the plain text occupies, and when the finished turn
/// still fits on screen it is erased and repainted as rendered markdown.
pub struct StreamPrinter {
    term: Term,
    shown: usize,
    rows: usize,
    repaintable: bool,
}

impl StreamPrinter {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
            shown: 0,
            rows: 0,
            repaintable: true,
        }
    }

    /// Print the suffix of `full` that has not been shown yet.
    ///
    /// Updates are prefix-extensions of each other; anything else restarts
    /// the block on a fresh line and gives up on the final repaint.
    pub fn update(&mut self, full: &str) {
        if full.len() < self.shown || !full.is_char_boundary(self.shown) {
            println!();
            self.shown = 0;
            self.repaintable = false;
        }
        let tail = &full[self.shown..];
        if !tail.is_empty() {
            print!("{tail}");
            let _ = io::stdout().flush();
            self.shown = full.len();
            let width = self.term.size().1 as usize;
            self.rows = rows_for(full, width);
        }
    }

    /// Terminate the streamed block, erasing it when a repaint is possible.
    /// Returns true when the block was erased.
    fn close(&mut self) -> bool {
        if self.shown == 0 {
            return false;
        }
        println!();
        let _ = io::stdout().flush();
        if !self.repaintable || !self.term.is_term() {
            return false;
        }
        let height = self.term.size().0 as usize;
        if self.rows + 1 > height {
            return false;
        }
        self.term.clear_last_lines(self.rows).is_ok()
    }

    /// Finish a completed turn: repaint the streamed plain text as markdown
    /// when it still fits on screen, otherwise leave it standing.
    pub fn finish(mut self, final_text: &str) {
        if self.close() && !final_text.is_empty() {
            print_markdown(final_text);
        }
    }

    /// Erase whatever was streamed. Used on failure, where partial output
    /// must not remain on screen.
    pub fn clear(mut self) {
        let _ = self.close();
    }
}

impl Default for StreamPrinter {
    fn default() -> Self {
        Self::new()
    }
}

/// Terminal rows a block of text occupies at the given width, counting
/// soft-wrapped continuation rows. This is also the row the cursor ends on
/// (1-based) after printing the block.
fn rows_for(text: &str, width: usize) -> usize {
    let width = width.max(1);
    text.split('\n')
        .map(|line| 1 + measure_text_width(line).saturating_sub(1) / width)
        .sum()
}

/// Render finished assistant text as highlighted markdown, falling back to
/// plain output when the printer fails.
pub fn print_markdown(text: &str) {
    let ok = PrettyPrinter::new()
        .input_from_bytes(text.as_bytes())
        .language("markdown")
        .print();
    if ok.is_err() {
        println!("{text}");
    }
}

pub fn print_banner() {
    println!();
    println!("  {}", style("Songlap AI").bold().cyan());
    println!(
        "  {}",
        style("বাংলায় আড্ডা দেওয়ার সঙ্গী। /help লিখে কমান্ড দেখুন।").dim()
    );
    println!();
}

pub fn print_assistant_label() {
    println!("🤖 {}", style("Songlap AI").bold().green());
}

pub fn print_fallback(notice: &str) {
    println!("{}", style(notice).red());
}

/// Fenced code blocks of a completed reply, fences and language tags
/// stripped. An unclosed fence is dropped.
pub fn extract_code_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Option<String> = None;
    for line in text.lines() {
        if line.trim_start().starts_with("```") {
            match current.take() {
                Some(block) => blocks.push(block),
                None => current = Some(String::new()),
            }
        } else if let Some(block) = current.as_mut() {
            block.push_str(line);
            block.push('\n');
        }
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::{extract_code_blocks, rows_for};

    #[test]
    fn rows_count_hard_and_soft_breaks() {
        assert_eq!(rows_for("", 10), 1);
        assert_eq!(rows_for("abc", 10), 1);
        assert_eq!(rows_for("abcdefghij", 10), 1);
        assert_eq!(rows_for("abcdefghijk", 10), 2);
        assert_eq!(rows_for("a\nb", 10), 2);
        assert_eq!(rows_for("a\n", 10), 2);
        assert_eq!(rows_for("0123456789abcdefghij!", 10), 3);
    }

    #[test]
    fn code_blocks_are_collected_without_fences() {
        let reply = "Use this:\n```rust\nfn main() {}\n```\nand then:\n```\necho hi\n```\n";
        assert_eq!(
            extract_code_blocks(reply),
            vec!["fn main() {}\n".to_string(), "echo hi\n".to_string()]
        );
    }

    #[test]
    fn unclosed_fence_yields_nothing() {
        assert_eq!(
            extract_code_blocks("```python\nprint('hi')"),
            Vec::<String>::new()
        );
    }

    #[test]
    fn reply_without_fences_yields_nothing() {
        assert!(extract_code_blocks("just prose, no code").is_empty());
    }
}
