//! View model of the transaction history table.
//!
//! Owns the rows, the frozen column set, pagination and pan state, and turns
//! them into a [`TableView`] the shell paints without further decisions.

use tracing::warn;

use crate::cell::{column_title, placeholder_for, render_cell, CellDisplay, Row};
use crate::domain::{is_structural_key, CancelTarget, TxStatus};
use crate::pagination::{Pagination, PAGE_SIZE_OPTIONS};
use crate::pan::PanController;

/// Whether the wallet side can take a cancellation right now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CancelReadiness {
    pub utxos_resolved: bool,
    pub attempt_in_flight: bool,
}

impl CancelReadiness {
    pub fn enabled(self) -> bool {
        self.utxos_resolved && !self.attempt_in_flight
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnHeader {
    pub key: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelAffordance {
    pub target: CancelTarget,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRow {
    /// Position in the full row sequence, not in the page.
    pub index: usize,
    pub cells: Vec<CellDisplay>,
    pub cancel: Option<CancelAffordance>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationFooter {
    pub count: usize,
    pub page: usize,
    pub page_size: usize,
    pub page_size_options: &'static [usize],
    pub range_label: String,
    pub has_previous: bool,
    pub has_next: bool,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableBody {
    pub headers: Vec<ColumnHeader>,
    pub rows: Vec<RenderedRow>,
    pub footer: PaginationFooter,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableView {
    Error,
    Ready(TableBody),
}

#[derive(Debug, Clone, Default)]
pub struct TransactionTable {
    rows: Vec<Row>,
    columns: Option<Vec<String>>,
    is_loading: bool,
    error: bool,
    pagination: Pagination,
    pan: PanController,
}

impl TransactionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the rows. The column set is taken from the first non-empty
    /// row ever seen and stays fixed for the table's lifetime.
    pub fn set_rows(&mut self, rows: Vec<Row>) {
        if self.columns.is_none() {
            self.columns = rows
                .iter()
                .find(|row| !row.is_empty())
                .map(|row| row.keys().map(str::to_owned).collect());
        }
        if let Some(columns) = self.columns.as_ref() {
            let mismatched = rows
                .iter()
                .filter(|row| !row.is_empty())
                .filter(|row| {
                    row.len() != columns.len() || !columns.iter().all(|k| row.get(k).is_some())
                })
                .count();
            if mismatched > 0 {
                warn!(mismatched, "rows do not match the table's column set");
            }
        }
        self.rows = rows;
        self.pagination.clamp_to(self.rows.len());
    }

    pub fn set_loading(&mut self, is_loading: bool) {
        self.is_loading = is_loading;
    }

    pub fn set_error(&mut self, error: bool) {
        self.error = error;
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn has_error(&self) -> bool {
        self.error
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// All column keys, structural ones included.
    pub fn columns(&self) -> &[String] {
        self.columns.as_deref().unwrap_or(&[])
    }

    pub fn visible_columns(&self) -> Vec<&str> {
        self.columns()
            .iter()
            .map(String::as_str)
            .filter(|key| !is_structural_key(key))
            .collect()
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn set_page(&mut self, page: usize) -> usize {
        self.pagination.set_page(page, self.rows.len())
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.pagination.set_page_size(page_size);
    }

    pub fn pan(&self) -> &PanController {
        &self.pan
    }

    pub fn pan_mut(&mut self) -> &mut PanController {
        &mut self.pan
    }

    pub fn render(&self, readiness: CancelReadiness) -> TableView {
        if self.error {
            return TableView::Error;
        }

        let visible = self.visible_columns();
        let headers = visible
            .iter()
            .map(|key| ColumnHeader {
                key: (*key).to_owned(),
                title: column_title(key),
            })
            .collect();

        let range = self.pagination.range(self.rows.len());
        let rows = self.rows[range.clone()]
            .iter()
            .zip(range)
            .map(|(row, index)| self.render_row(row, index, &visible, readiness))
            .collect();

        TableView::Ready(TableBody {
            headers,
            rows,
            footer: self.footer(),
        })
    }

    fn render_row(
        &self,
        row: &Row,
        index: usize,
        visible: &[&str],
        readiness: CancelReadiness,
    ) -> RenderedRow {
        let cells = visible
            .iter()
            .map(|key| {
                if self.is_loading {
                    CellDisplay::Placeholder(placeholder_for(row, key))
                } else {
                    render_cell(row, key)
                }
            })
            .collect();

        let pending = row.status().and_then(|s| s.known()) == Some(TxStatus::Pending);
        let cancel = if pending && !self.is_loading {
            row.cancel_target().map(|target| CancelAffordance {
                target,
                enabled: readiness.enabled(),
            })
        } else {
            None
        };

        RenderedRow {
            index,
            cells,
            cancel,
        }
    }

    fn footer(&self) -> PaginationFooter {
        let count = self.rows.len();
        PaginationFooter {
            count,
            page: self.pagination.page(),
            page_size: self.pagination.page_size(),
            page_size_options: &PAGE_SIZE_OPTIONS,
            range_label: self.pagination.range_label(count),
            has_previous: self.pagination.has_previous(),
            has_next: self.pagination.has_next(count),
            disabled: self.is_loading,
        }
    }
}
