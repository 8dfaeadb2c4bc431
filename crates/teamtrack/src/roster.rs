//! Roster of known interns.
//!
//! The roster is the tech lead's intern sheet: a CSV file with a `Name`
//! column. The store never checks team members against it; callers use it
//! to offer candidates and to flag names nobody recognises.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::team::TeamDocument;

/// Header of the column holding intern names.
pub const NAME_COLUMN: &str = "Name";

/// Suffix shown after member names missing from the roster.
pub const NOT_IN_ROSTER: &str = " (Not in roster)";

/// Known intern names, in roster order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    names: Vec<String>,
    index: HashSet<String>,
}

impl Roster {
    /// Build a roster from names. Blank and repeated names are dropped.
    #[must_use]
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut roster = Self::default();
        for name in names {
            let name: String = name.into();
            let name = name.trim();
            if !name.is_empty() && roster.index.insert(name.to_string()) {
                roster.names.push(name.to_string());
            }
        }
        roster
    }

    /// Read a roster CSV.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or
    /// [`Error::RosterParse`] if it has no `Name` column or an unterminated
    /// quoted field.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let records = parse_csv(&contents).map_err(|(line, message)| Error::RosterParse {
            path: path.to_path_buf(),
            line,
            message,
        })?;

        let mut records = records.into_iter();
        let header = records.next().unwrap_or_default();
        let column = header
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').trim() == NAME_COLUMN)
            .ok_or_else(|| Error::RosterParse {
                path: path.to_path_buf(),
                line: 1,
                message: format!("missing {NAME_COLUMN} column"),
            })?;

        let roster = Self::from_names(records.filter_map(|mut r| {
            (column < r.len()).then(|| r.swap_remove(column))
        }));
        debug!("Loaded {} intern(s) from {}", roster.len(), path.display());
        Ok(roster)
    }

    /// Number of known interns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Known names in roster order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Whether a name is on the roster.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains(name)
    }

    /// The name as it should be displayed, flagged if unknown.
    #[must_use]
    pub fn display_name(&self, name: &str) -> String {
        if self.contains(name) {
            name.to_string()
        } else {
            format!("{name}{NOT_IN_ROSTER}")
        }
    }

    /// Roster names not yet on any team in `document`.
    #[must_use]
    pub fn candidates(&self, document: &TeamDocument) -> Vec<&str> {
        let assigned = document.assigned_members();
        self.names
            .iter()
            .map(String::as_str)
            .filter(|name| !assigned.contains(name))
            .collect()
    }
}

/// Split CSV text into records. Errors carry a one-based line number.
fn parse_csv(input: &str) -> std::result::Result<Vec<Vec<String>>, (usize, String)> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut quote_line = 1;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' => {
                in_quotes = true;
                quote_line = line;
            }
            ',' => record.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                line += 1;
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err((quote_line, "unterminated quoted field".to_string()));
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    records.retain(|r| !(r.len() == 1 && r[0].is_empty()));
    Ok(records)
}
