//! Column names recognized in rule table headers.

use std::fmt;

/// Header written by the standard-rule generator, in column order.
pub const COLUMN_HEADINGS: [&str; 11] = [
    "type", "title", "fc1", "fcs1", "sql1", "fc2", "fcs2", "sql2", "severity", "notes", "specials",
];

/// A rule table column the normalizer knows how to interpret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    CheckKind,
    Title,
    FeatureClassA,
    SubtypeA,
    SqlA,
    FeatureClassB,
    SubtypeB,
    SqlB,
    Severity,
    Notes,
    Specials,
}

impl Column {
    pub const ALL: [Column; 11] = [
        Column::CheckKind,
        Column::Title,
        Column::FeatureClassA,
        Column::SubtypeA,
        Column::SqlA,
        Column::FeatureClassB,
        Column::SubtypeB,
        Column::SqlB,
        Column::Severity,
        Column::Notes,
        Column::Specials,
    ];

    /// Accepted header names; the first one is canonical.
    pub fn names(&self) -> &'static [&'static str] {
        match self {
            Column::CheckKind => &["type", "ckind"],
            Column::Title => &["title", "name"],
            Column::FeatureClassA => &["fc1", "fcA"],
            Column::SubtypeA => &["fcs1", "subtype"],
            Column::SqlA => &["sql1", "sql"],
            Column::FeatureClassB => &["fc2", "fcB"],
            Column::SubtypeB => &["fcs2"],
            Column::SqlB => &["sql2"],
            Column::Severity => &["severity"],
            Column::Notes => &["notes"],
            Column::Specials => &["specials"],
        }
    }

    pub fn canonical(&self) -> &'static str {
        self.names()[0]
    }

    pub fn matches(&self, header: &str) -> bool {
        self.names().contains(&header)
    }

    /// Resolve a header cell to a column (exact, case-sensitive).
    pub fn from_header(header: &str) -> Option<Column> {
        Column::ALL.into_iter().find(|column| column.matches(header))
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}
