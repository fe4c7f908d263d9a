/// One cell as it came out of the PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Empty,
    /// Text made only of ASCII digits.
    Int(i64),
    Text(String),
}

impl Cell {
    /// Classify trimmed cell text.
    pub fn parse(raw: &str) -> Cell {
        let s = raw.trim();
        if s.is_empty() {
            return Cell::Empty;
        }
        if s.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = s.parse::<i64>() {
                return Cell::Int(n);
            }
        }
        Cell::Text(s.to_string())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::parse(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawTable {
    /// Column names taken from the first line of the extracted block.
    /// Unlabeled positions are named `Unnamed: <i>`.
    pub headers: Vec<String>,
    /// Every following line, one cell per header.
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { headers, rows }
    }

    pub fn unnamed(i: usize) -> String {
        format!("Unnamed: {}", i)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn drop_empty_rows(&mut self) {
        self.rows.retain(|row| !row.iter().all(Cell::is_empty));
    }

    /// Rename the column called `from`, if present.
    pub fn rename(&mut self, from: &str, to: &str) {
        if let Some(i) = self.column_index(from) {
            self.headers[i] = to.to_string();
        }
    }

    /// Keep only the given column positions, in that order.
    pub fn select(&self, indices: &[usize]) -> RawTable {
        let headers = indices.iter().map(|&i| self.headers[i].clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                indices
                    .iter()
                    .map(|&i| row.get(i).cloned().unwrap_or(Cell::Empty))
                    .collect()
            })
            .collect();
        RawTable { headers, rows }
    }
}
