//! Terminal look of the book list: palette, panels, the book table and the
//! help screen.

use clap::builder::styling::{AnsiColor, Color, Style};
use clap::builder::Styles;
use crossterm::style::{Color as CtColor, Stylize};
use std::io::{self, Write};
use unicode_width::UnicodeWidthStr;

const PANEL_WIDTH: usize = 60;

pub fn get_styles() -> Styles {
    let bold = |color: AnsiColor| Style::new().bold().fg_color(Some(Color::Ansi(color)));
    Styles::styled()
        .header(bold(AnsiColor::Yellow).underline())
        .usage(bold(AnsiColor::Yellow).underline())
        .literal(bold(AnsiColor::Green))
        .valid(bold(AnsiColor::Green))
        .invalid(bold(AnsiColor::Red))
        .error(bold(AnsiColor::Red))
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack))))
}

pub mod palette {
    use crossterm::style::Color;

    /// Regular text.
    pub const INK: Color = Color::Rgb { r: 235, g: 228, b: 214 };
    /// Titles and the row being edited.
    pub const ACCENT: Color = Color::Rgb { r: 255, g: 191, b: 0 };
    /// Panel and table borders.
    pub const FRAME: Color = Color::Rgb { r: 196, g: 140, b: 90 };
    pub const OK: Color = Color::Rgb { r: 0, g: 210, b: 120 };
    pub const WARN: Color = Color::Rgb { r: 255, g: 140, b: 0 };
    pub const ERR: Color = Color::Rgb { r: 255, g: 85, b: 85 };
    pub const MUTED: Color = Color::Rgb { r: 128, g: 128, b: 128 };
}

pub mod glyph {
    pub const RULE: &str = "─";
    pub const BAR: &str = "│";
    pub const CORNER_TL: &str = "╭";
    pub const CORNER_TR: &str = "╮";
    pub const CORNER_BL: &str = "╰";
    pub const CORNER_BR: &str = "╯";
    pub const JOINT_TOP: &str = "┬";
    pub const JOINT_MID: &str = "┼";
    pub const JOINT_BOTTOM: &str = "┴";
    pub const TEE_LEFT: &str = "├";
    pub const TEE_RIGHT: &str = "┤";

    pub const BOOK: &str = "📚";
    pub const PENCIL: &str = "✎";
    pub const FIELD: &str = "•";
    pub const DIAMOND: &str = "◆";
}

// -----------------------------------------------------------------------------
// Notes
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Warning,
    Error,
    Muted,
}

/// Prints a one-line message prefixed by a marker matching its tone.
pub fn note(tone: Tone, message: &str) {
    let (marker, color) = match tone {
        Tone::Success => ("✓", palette::OK),
        Tone::Warning => ("!", palette::WARN),
        Tone::Error => ("✗", palette::ERR),
        Tone::Muted => (" ", palette::MUTED),
    };
    let text = if tone == Tone::Muted {
        message.with(color).italic()
    } else {
        message.with(color)
    };
    println!(" {} {}", marker.with(color).bold(), text);
}

// -----------------------------------------------------------------------------
// Panels
// -----------------------------------------------------------------------------

pub fn panel_open(title: &str) {
    let label = format!(" {} ", title);
    let spare = PANEL_WIDTH.saturating_sub(label.width());
    let left = spare / 2;
    println!();
    println!(
        "{}{}{}{}",
        format!("{}{}", glyph::CORNER_TL, glyph::RULE.repeat(left)).with(palette::FRAME),
        label.with(palette::ACCENT).bold(),
        glyph::RULE.repeat(spare - left).with(palette::FRAME),
        glyph::CORNER_TR.with(palette::FRAME),
    );
}

pub fn panel_close() {
    let line = format!(
        "{}{}{}",
        glyph::CORNER_BL,
        glyph::RULE.repeat(PANEL_WIDTH),
        glyph::CORNER_BR
    );
    println!("{}", line.with(palette::FRAME));
}

/// One labelled field of a book. Blank values show as "(empty)".
pub fn field_line(label: &str, value: &str) {
    let value = if value.is_empty() {
        "(empty)".with(palette::MUTED).italic()
    } else {
        value.with(palette::INK)
    };
    println!(
        "  {} {} {}",
        glyph::FIELD.with(palette::FRAME),
        format!("{:<10}", format!("{}:", label)).with(palette::MUTED),
        value
    );
}

// -----------------------------------------------------------------------------
// Book table
// -----------------------------------------------------------------------------

pub const TABLE_COLUMNS: usize = 4;

/// Fixed-column table sized to its widest cell per column.
pub struct BookTable {
    headers: [String; TABLE_COLUMNS],
    widths: [usize; TABLE_COLUMNS],
    rows: Vec<([String; TABLE_COLUMNS], bool)>,
}

impl BookTable {
    pub fn new(headers: [&str; TABLE_COLUMNS]) -> Self {
        Self {
            widths: headers.map(|h| h.width()),
            headers: headers.map(String::from),
            rows: Vec::new(),
        }
    }

    /// Adds a row; highlighted rows are drawn in the accent color.
    pub fn push(&mut self, cells: [String; TABLE_COLUMNS], highlighted: bool) {
        for (width, cell) in self.widths.iter_mut().zip(&cells) {
            *width = (*width).max(cell.width());
        }
        self.rows.push((cells, highlighted));
    }

    fn rule(&self, left: &str, joint: &str, right: &str) -> String {
        let segments: Vec<String> = self
            .widths
            .iter()
            .map(|w| glyph::RULE.repeat(w + 2))
            .collect();
        format!("{}{}{}", left, segments.join(joint), right)
    }

    fn line(&self, cells: &[String; TABLE_COLUMNS]) -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(self.widths)
            .map(|(cell, w)| format!(" {}{} ", cell, " ".repeat(w.saturating_sub(cell.width()))))
            .collect();
        format!("{}{}{}", glyph::BAR, padded.join(glyph::BAR), glyph::BAR)
    }

    pub fn print(&self) {
        let frame = |s: String| s.with(palette::FRAME);
        println!("{}", frame(self.rule(glyph::CORNER_TL, glyph::JOINT_TOP, glyph::CORNER_TR)));
        println!("{}", self.line(&self.headers).with(palette::ACCENT).bold());
        println!("{}", frame(self.rule(glyph::TEE_LEFT, glyph::JOINT_MID, glyph::TEE_RIGHT)));
        for (cells, highlighted) in &self.rows {
            let color = if *highlighted { palette::ACCENT } else { palette::INK };
            println!("{}", self.line(cells).with(color));
        }
        println!("{}", frame(self.rule(glyph::CORNER_BL, glyph::JOINT_BOTTOM, glyph::CORNER_BR)));
    }
}

// -----------------------------------------------------------------------------
// Session chrome
// -----------------------------------------------------------------------------

pub fn get_prompt() -> String {
    format!("{} {} ", glyph::BOOK, "❯".with(palette::FRAME).bold())
}

pub fn print_command_echo(command: &str) {
    println!("{} {}", "❯".with(palette::FRAME), command.with(palette::OK).bold());
}

pub fn print_welcome(base_url: &str) {
    println!();
    let title = format!("booklist {}", env!("CARGO_PKG_VERSION"));
    println!("  {} {}", glyph::BOOK, title.with(palette::ACCENT).bold());
    field_line("Store", base_url);
    note(Tone::Muted, "Type 'help' for available commands");
}

pub fn print_goodbye() {
    println!();
    note(Tone::Muted, "Closing the book list.");
}

pub fn flush() {
    let _ = io::stdout().flush();
}

// -----------------------------------------------------------------------------
// Help
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Browsing,
    Editing,
    System,
}

impl CommandGroup {
    const ALL: [CommandGroup; 3] = [Self::Browsing, Self::Editing, Self::System];

    fn title(self) -> &'static str {
        match self {
            Self::Browsing => "Browsing",
            Self::Editing => "Editing",
            Self::System => "System",
        }
    }

    fn color(self) -> CtColor {
        match self {
            Self::Browsing => palette::FRAME,
            Self::Editing => palette::ACCENT,
            Self::System => palette::MUTED,
        }
    }
}

pub struct CommandHelp {
    pub name: &'static str,
    pub args: &'static str,
    pub description: &'static str,
    pub group: CommandGroup,
}

impl CommandHelp {
    fn usage(&self) -> String {
        format!("{} {}", self.name, self.args).trim_end().to_string()
    }
}

pub fn print_help(commands: &[CommandHelp]) {
    panel_open("Commands");
    let usage_width = commands.iter().map(|c| c.usage().width()).max().unwrap_or(0);
    for group in CommandGroup::ALL {
        println!(
            "  {} {}",
            glyph::DIAMOND.with(group.color()),
            group.title().with(group.color()).bold()
        );
        for cmd in commands.iter().filter(|c| c.group == group) {
            println!(
                "      {}  {}",
                format!("{:<width$}", cmd.usage(), width = usage_width).with(palette::OK),
                cmd.description.with(palette::INK)
            );
        }
    }
    panel_close();
}
