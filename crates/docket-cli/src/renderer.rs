//! Terminal output for the markdown produced by the display wrappers.
//!
//! Rich output goes through termimad so fact tables, step lists and warning
//! quotes keep their layout. `--no-color` prints the markdown source as is,
//! which is also what the integration tests match against.

use anyhow::Result;
use termimad::{crossterm::style::Color, MadSkin};

enum Mode {
    Rich(Box<MadSkin>),
    Plain,
}

/// Writes markdown to stdout, styled or verbatim.
pub struct TerminalRenderer {
    mode: Mode,
}

impl TerminalRenderer {
    pub fn new(rich: bool) -> Self {
        let mode = if rich {
            Mode::Rich(Box::new(docket_skin()))
        } else {
            Mode::Plain
        };
        Self { mode }
    }

    pub fn render(&self, markdown: &str) -> Result<()> {
        match &self.mode {
            Mode::Rich(skin) => skin.print_text(markdown),
            Mode::Plain if markdown.ends_with('\n') => print!("{markdown}"),
            Mode::Plain => println!("{markdown}"),
        }
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Step titles in yellow, step states in magenta, warnings dimmed.
fn docket_skin() -> MadSkin {
    let mut skin = MadSkin::default();
    skin.set_headers_fg(Color::Blue);
    skin.bold.set_fg(Color::Yellow);
    skin.italic.set_fg(Color::Magenta);
    skin.inline_code.set_bg(Color::AnsiValue(238));
    skin.quote_mark.set_fg(Color::DarkYellow);
    skin.table.set_fg(Color::DarkGrey);
    skin
}
