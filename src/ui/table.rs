//! Fixed-width text tables.
//!
//! A [`Table`] is a list of columns, each with a header, a width and a render
//! function that turns one row into the cell text. Cells longer than their
//! column are truncated with `...`.

const COLUMN_GAP: &str = "  ";

pub struct Column<'a, T> {
    header: &'a str,
    width: usize,
    render: Box<dyn Fn(&T) -> String + 'a>,
}

pub struct Table<'a, T> {
    columns: Vec<Column<'a, T>>,
    empty_message: &'a str,
}

impl<'a, T> Table<'a, T> {
    pub fn new(empty_message: &'a str) -> Self {
        Self {
            columns: Vec::new(),
            empty_message,
        }
    }

    pub fn column(
        mut self,
        header: &'a str,
        width: usize,
        render: impl Fn(&T) -> String + 'a,
    ) -> Self {
        self.columns.push(Column {
            header,
            width: width.max(header.chars().count()),
            render: Box::new(render),
        });
        self
    }

    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.header).collect()
    }

    /// Render the rows, or the empty-state message when there are none.
    pub fn render(&self, rows: &[T]) -> String {
        if rows.is_empty() {
            return format!("{}\n", self.empty_message);
        }

        let mut out = String::new();
        let header: Vec<String> = self.columns.iter().map(|c| c.header.to_uppercase()).collect();
        out.push_str(&self.line(header));

        let total_width = self.columns.iter().map(|c| c.width).sum::<usize>()
            + COLUMN_GAP.len() * self.columns.len().saturating_sub(1);
        out.push_str(&"-".repeat(total_width));
        out.push('\n');

        for row in rows {
            let cells = self.columns.iter().map(|c| (c.render)(row)).collect();
            out.push_str(&self.line(cells));
        }
        out
    }

    fn line(&self, cells: Vec<String>) -> String {
        let padded: Vec<String> = self
            .columns
            .iter()
            .zip(cells)
            .map(|(column, cell)| {
                format!(
                    "{:<width$}",
                    truncate(&cell, column.width),
                    width = column.width
                )
            })
            .collect();
        format!("{}\n", padded.join(COLUMN_GAP).trim_end())
    }
}

/// Shorten `s` to at most `max_len` characters.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Placeholder for absent optional values
pub fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        id: i64,
        name: &'static str,
    }

    fn table() -> Table<'static, Row> {
        Table::new("No rows found.")
            .column("ID", 4, |r: &Row| r.id.to_string())
            .column("Name", 8, |r: &Row| r.name.to_string())
    }

    #[test]
    fn test_empty_state() {
        assert_eq!(table().render(&[]), "No rows found.\n");
    }

    #[test]
    fn test_render_layout() {
        let rows = [
            Row { id: 1, name: "General" },
            Row { id: 22, name: "St. Mary's Hospital" },
        ];
        let out = table().render(&rows);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "ID    NAME");
        assert_eq!(lines[1], "-".repeat(14));
        assert_eq!(lines[2], "1     General");
        assert_eq!(lines[3], "22    St. M...");
    }

    #[test]
    fn test_width_never_below_header() {
        let t: Table<'_, Row> = Table::new("-").column("Quantity", 2, |r: &Row| r.id.to_string());
        assert_eq!(t.columns[0].width, 8);
        assert_eq!(t.headers(), vec!["Quantity"]);
    }

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("Zürich", 6), "Zürich");
        assert_eq!(truncate("Zürich General", 8), "Züric...");
        assert_eq!(or_dash(None), "-");
        assert_eq!(or_dash(Some("")), "-");
        assert_eq!(or_dash(Some("x")), "x");
    }
}
