use unicode_width::UnicodeWidthStr;

use quizrank_core::{BoardFrame, BoardRow, RankMovement};

use crate::color;

pub const EMPTY_MESSAGE: &str = "No leaderboard data available for this selection.";

const VIEWER_MARKER: &str = " (you)";

pub struct TableFormatter {
    rank_width: usize,
    /// Present only when the movement column is shown.
    movement_width: Option<usize>,
    name_width: usize,
    email_width: usize,
    college_width: usize,
    score_width: usize,
    time_width: usize,
}

impl TableFormatter {
    pub fn new(rows: &[BoardRow]) -> Self {
        // Minimum widths = header label lengths
        let mut rank_width = "Rank".len();
        let mut name_width = "Name".len();
        let mut email_width = "Email".len();
        let mut college_width = "College".len();
        let mut score_width = "Score".len();
        let mut time_width = "Time".len();

        for row in rows {
            rank_width = rank_width.max(display_width(&row.entry.rank.to_string()));
            name_width = name_width.max(display_width(&name_cell(row)));
            email_width = email_width.max(display_width(&row.entry.email));
            college_width = college_width.max(display_width(row.entry.college_display()));
            score_width = score_width.max(display_width(&score_cell(row)));
            time_width = time_width.max(display_width(&row.time_display()));
        }

        Self {
            rank_width,
            movement_width: None,
            name_width,
            email_width,
            college_width,
            score_width,
            time_width,
        }
    }

    /// Same table with a "Move" column after the rank (▲2, ▼1, new).
    pub fn with_movement(rows: &[BoardRow]) -> Self {
        let width = rows
            .iter()
            .map(|row| display_width(&movement_cell(row.movement)))
            .fold("Move".len(), usize::max);
        Self {
            movement_width: Some(width),
            ..Self::new(rows)
        }
    }

    /// Render the whole board: title, table and participant count.
    pub fn render(&self, frame: &BoardFrame) -> String {
        let mut lines = Vec::with_capacity(frame.rows.len() + 6);
        lines.push(color::bold(&frame.scope.label()));
        lines.push(self.top_border());
        lines.push(self.header_row());
        lines.push(self.separator());
        for row in &frame.rows {
            lines.push(self.row_line(row));
        }
        lines.push(self.bottom_border());
        lines.push(color::muted(&participants_line(frame.participants())));
        lines.join("\n")
    }

    pub fn print_table(&self, frame: &BoardFrame) {
        println!("{}", self.render(frame));
    }

    fn row_line(&self, row: &BoardRow) -> String {
        let name = pad(&name_cell(row), self.name_width);
        let name = if row.is_viewer {
            color::viewer(&name)
        } else {
            name
        };

        let mut cells = vec![color::badge(
            row.badge,
            &pad_left(&row.entry.rank.to_string(), self.rank_width),
        )];
        if let Some(width) = self.movement_width {
            cells.push(color::movement(
                row.movement,
                &pad(&movement_cell(row.movement), width),
            ));
        }
        cells.extend([
            name,
            color::muted(&pad(&row.entry.email, self.email_width)),
            pad(row.entry.college_display(), self.college_width),
            color::score(&pad(&score_cell(row), self.score_width)),
            pad_left(&row.time_display(), self.time_width),
        ]);
        join_cells(&cells)
    }

    fn header_row(&self) -> String {
        let mut labels = vec![("Rank", self.rank_width)];
        if let Some(width) = self.movement_width {
            labels.push(("Move", width));
        }
        labels.extend([
            ("Name", self.name_width),
            ("Email", self.email_width),
            ("College", self.college_width),
            ("Score", self.score_width),
            ("Time", self.time_width),
        ]);
        let cells: Vec<String> = labels
            .into_iter()
            .map(|(label, width)| color::bold(&pad(label, width)))
            .collect();
        join_cells(&cells)
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths = vec![self.rank_width];
        widths.extend(self.movement_width);
        widths.extend([
            self.name_width,
            self.email_width,
            self.college_width,
            self.score_width,
            self.time_width,
        ]);
        widths
    }

    fn border(&self, left: &str, mid: &str, right: &str) -> String {
        let segments: Vec<String> = self.widths().iter().map(|w| "─".repeat(w + 2)).collect();
        color::muted(&format!("{}{}{}", left, segments.join(mid), right))
    }

    fn top_border(&self) -> String {
        self.border("┌", "┬", "┐")
    }

    fn separator(&self) -> String {
        self.border("├", "┼", "┤")
    }

    fn bottom_border(&self) -> String {
        self.border("└", "┴", "┘")
    }
}

/// "│ a │ b │"
fn join_cells(cells: &[String]) -> String {
    let sep = color::muted("│");
    let glue = format!(" {} ", sep);
    let inner = cells.join(glue.as_str());
    format!("{sep} {inner} {sep}")
}

/// "▲2", "▼1", "new", or "=" when the rank held.
fn movement_cell(movement: RankMovement) -> String {
    match movement {
        RankMovement::New => "new".to_string(),
        RankMovement::Up(places) => format!("▲{}", places),
        RankMovement::Down(places) => format!("▼{}", places),
        RankMovement::Unchanged => "=".to_string(),
    }
}

fn name_cell(row: &BoardRow) -> String {
    if row.is_viewer {
        format!("{}{}", row.entry.user_name, VIEWER_MARKER)
    } else {
        row.entry.user_name.clone()
    }
}

/// "9/10 (90%)"
fn score_cell(row: &BoardRow) -> String {
    format!(
        "{} ({}%)",
        row.score_display(),
        format_percentage(row.entry.score_percentage)
    )
}

/// Percentage with at most two decimals and no trailing zeros.
pub(crate) fn format_percentage(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    fixed
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

pub(crate) fn participants_line(count: usize) -> String {
    format!("{} participants", count)
}

/// Compute the terminal display width of a string.
///
/// Wide characters (CJK, emoji) count as 2 columns.
pub(crate) fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Pad a string to a minimum display width without truncating.
pub(crate) fn pad(s: &str, min_width: usize) -> String {
    let width = display_width(s);
    if width >= min_width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(min_width - width))
    }
}

/// Right-align a string within a minimum display width.
pub(crate) fn pad_left(s: &str, min_width: usize) -> String {
    let width = display_width(s);
    if width >= min_width {
        s.to_string()
    } else {
        format!("{}{}", " ".repeat(min_width - width), s)
    }
}
