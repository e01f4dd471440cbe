use std::fmt::Display;

/// Loosely typed description of an entity, rendered by `ls`.
#[derive(Debug, Clone, PartialEq)]
pub enum InfoItem {
    Text(String),
    List(Vec<InfoItem>),
    Map(Vec<(String, InfoItem)>),
}

impl InfoItem {
    pub fn text(value: impl Display) -> Self {
        InfoItem::Text(value.to_string())
    }

    pub fn map() -> Self {
        InfoItem::Map(Vec::new())
    }

    pub fn list<T: Into<InfoItem>>(items: impl IntoIterator<Item = T>) -> Self {
        InfoItem::List(items.into_iter().map(Into::into).collect())
    }

    /// Appends `key: value` to a map. Does nothing on other variants.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<InfoItem>) -> Self {
        if let InfoItem::Map(entries) = &mut self {
            entries.push((key.into(), value.into()));
        }
        self
    }

    /// Appends every entry of another map.
    pub fn merge(mut self, other: InfoItem) -> Self {
        if let (InfoItem::Map(entries), InfoItem::Map(extra)) = (&mut self, other) {
            entries.extend(extra);
        }
        self
    }

    fn is_empty(&self) -> bool {
        match self {
            InfoItem::Text(_) => false,
            InfoItem::List(items) => items.is_empty(),
            InfoItem::Map(entries) => entries.is_empty(),
        }
    }
}

impl From<String> for InfoItem {
    fn from(value: String) -> Self {
        InfoItem::Text(value)
    }
}

impl From<&str> for InfoItem {
    fn from(value: &str) -> Self {
        InfoItem::Text(value.to_string())
    }
}

impl<T: Into<InfoItem>> From<Option<T>> for InfoItem {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => value.into(),
            None => InfoItem::Text("None".to_string()),
        }
    }
}

macro_rules! info_from_display {
    ($($ty:ty),*) => {
        $(impl From<$ty> for InfoItem {
            fn from(value: $ty) -> Self {
                InfoItem::Text(value.to_string())
            }
        })*
    };
}

info_from_display!(u8, u16, u32, u64, usize, i8, i16, i32, i64, bool, f64);

/// Column table used for directory listings.
pub struct InfoTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    column_width: usize,
}

impl InfoTable {
    pub fn new(header: &[&str], rows: Vec<Vec<String>>) -> Self {
        Self {
            header: header.iter().map(|h| h.to_string()).collect(),
            rows,
            column_width: 20,
        }
    }

    pub fn render(&self) -> String {
        if self.rows.is_empty() {
            return "(*empty*)".to_string();
        }

        let mut widths: Vec<usize> = Vec::new();
        for row in self.rows.iter().chain(std::iter::once(&self.header)) {
            for (i, value) in row.iter().enumerate() {
                let width = value.chars().count();
                match widths.get_mut(i) {
                    Some(current) => *current = (*current).max(width),
                    None => widths.push(width.max(self.column_width)),
                }
            }
        }
        let total_width = widths.iter().sum::<usize>() + widths.len().saturating_sub(1);

        let make_line = |row: &[String]| {
            row.iter()
                .enumerate()
                .map(|(i, value)| format!("{:<width$}", value, width = widths[i]))
                .collect::<Vec<_>>()
                .join(" ")
        };

        let mut out = String::new();
        out.push_str(&make_line(&self.header));
        out.push('\n');
        out.push_str(&"-".repeat(total_width));
        out.push('\n');
        for row in &self.rows {
            out.push_str(&make_line(row));
            out.push('\n');
        }
        out
    }
}

struct TreeRow {
    content: Vec<String>,
    depth: usize,
    is_divider: bool,
}

/// Indented key/value rendering of a single entity.
pub struct InfoTree {
    header: Vec<String>,
    items: InfoItem,
    total_width: usize,
    max_rows: usize,
}

impl InfoTree {
    pub fn new(header: Vec<String>, items: InfoItem) -> Self {
        Self {
            header,
            items,
            total_width: 80,
            max_rows: 300,
        }
    }

    fn build_rows(item: &InfoItem, depth: usize, prev_key: &str, rows: &mut Vec<TreeRow>) {
        let pairs: Vec<(String, &InfoItem)> = match item {
            InfoItem::Text(_) => return,
            InfoItem::List(items) => items
                .iter()
                .enumerate()
                .map(|(i, value)| (format!("{}[{}]", prev_key, i), value))
                .collect(),
            InfoItem::Map(entries) => entries.iter().map(|(k, v)| (k.clone(), v)).collect(),
        };

        for (key, value) in pairs {
            let mut content = vec![format!("{}:", key)];
            match value {
                InfoItem::Text(text) => content.push(text.clone()),
                _ if value.is_empty() => content.push("None".to_string()),
                _ => {}
            }
            rows.push(TreeRow {
                content,
                depth,
                is_divider: false,
            });
            Self::build_rows(value, depth + 1, &key, rows);
        }
    }

    pub fn render(&self) -> String {
        let mut rows = vec![
            TreeRow {
                content: self.header.clone(),
                depth: 0,
                is_divider: false,
            },
            TreeRow {
                content: Vec::new(),
                depth: 0,
                is_divider: true,
            },
        ];
        Self::build_rows(&self.items, 0, "", &mut rows);

        let mut out = String::new();
        for (i, row) in rows.iter().enumerate() {
            if i > self.max_rows {
                out.push_str(&format!("\n(...) exceeded {} lines\n", self.max_rows));
                break;
            }
            if row.is_divider {
                out.push_str(&"-".repeat(self.total_width));
                out.push('\n');
                continue;
            }

            let mut columns = vec![" ".to_string(); row.depth];
            columns.extend(row.content.iter().cloned());
            let mut line = columns.join(" ");
            if line.chars().count() > self.total_width {
                line = line.chars().take(self.total_width - 3).collect::<String>() + "...";
            }
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}
