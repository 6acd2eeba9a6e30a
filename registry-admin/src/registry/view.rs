use std::fmt;

use super::reference::ReferenceData;
use super::resource::Resource;
use crate::models::{Entity, EntityId};

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    /// Target of the row's Edit and Delete actions.
    pub id: EntityId,
    pub cells: Vec<String>,
}

/// Rows of the last loaded collection with foreign keys resolved to labels.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub columns: Vec<&'static str>,
    pub rows: Vec<TableRow>,
}

impl TableView {
    pub fn project<R: Resource>(entities: &[R::Entity], references: &ReferenceData) -> Self {
        let rows = entities
            .iter()
            .map(|entity| TableRow {
                id: entity.id(),
                cells: R::cells(entity, references),
            })
            .collect();

        Self {
            columns: R::COLUMNS.to_vec(),
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, id: EntityId) -> Option<&TableRow> {
        self.rows.iter().find(|row| row.id == id)
    }
}

impl fmt::Display for TableView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(&row.cells) {
                *width = (*width).max(cell.chars().count());
            }
        }

        write_line(f, &widths, self.columns.iter().copied())?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        write_line(f, &widths, rule.iter().map(String::as_str))?;

        if self.rows.is_empty() {
            return writeln!(f, "(no records)");
        }
        for row in &self.rows {
            write_line(f, &widths, row.cells.iter().map(String::as_str))?;
        }
        Ok(())
    }
}

fn write_line<'a>(
    f: &mut fmt::Formatter<'_>,
    widths: &[usize],
    cells: impl Iterator<Item = &'a str>,
) -> fmt::Result {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect();
    writeln!(f, "{}", padded.join("  ").trim_end())
}
