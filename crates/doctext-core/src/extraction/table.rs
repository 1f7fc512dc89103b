/// A parsed table: a header row plus data rows, all cells as display text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.len())
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0)
    }

    /// Render as plain text.
    ///
    /// Every column is right-aligned to its widest cell (header included)
    /// and columns are separated by two spaces. Short rows are padded with
    /// empty cells. There are no row labels.
    pub fn render(&self) -> String {
        let columns = self.column_count();
        let mut widths = vec![0usize; columns];
        for row in std::iter::once(&self.headers).chain(self.rows.iter()) {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let mut lines = Vec::with_capacity(self.rows.len() + 1);
        for row in std::iter::once(&self.headers).chain(self.rows.iter()) {
            let cells: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(i, width)| {
                    let cell = row.get(i).map(String::as_str).unwrap_or("");
                    format!("{:>width$}", cell, width = width)
                })
                .collect();
            lines.push(cells.join("  "));
        }

        lines.join("\n")
    }
}
