//! In-memory table store
//!
//! Mirrors the Drive/Sheets object model closely enough for sync tests and
//! dry runs: tables live under parent containers, own named subsheets, and
//! each subsheet is a grid of text cells.

use crate::store::{A1Range, TableId, TableStore};
use crate::{Result, StoreError};
use parking_lot::Mutex;
use std::collections::BTreeMap;

/// Container every new table starts in
pub const ROOT_CONTAINER: &str = "root";

/// Store operations, used to inject failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Find,
    Create,
    Relocate,
    Clear,
    Write,
}

#[derive(Debug, Clone)]
struct Table {
    name: String,
    parents: Vec<String>,
    sheets: BTreeMap<String, Vec<Vec<String>>>,
}

#[derive(Debug, Default)]
struct Inner {
    tables: BTreeMap<TableId, Table>,
    next_id: u64,
    failing: Option<Operation>,
    calls: Vec<Operation>,
}

#[derive(Debug, Default)]
pub struct MemoryTableStore {
    inner: Mutex<Inner>,
}

impl MemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call of `operation` fail
    pub fn fail_on(&self, operation: Operation) {
        self.inner.lock().failing = Some(operation);
    }

    pub fn clear_failure(&self) {
        self.inner.lock().failing = None;
    }

    /// Operations invoked so far, in order
    pub fn calls(&self) -> Vec<Operation> {
        self.inner.lock().calls.clone()
    }

    pub fn table_count(&self) -> usize {
        self.inner.lock().tables.len()
    }

    /// Tables whose parents include the container
    pub fn tables_in(&self, container_id: &str) -> Vec<TableId> {
        self.inner
            .lock()
            .tables
            .iter()
            .filter(|(_, t)| t.parents.iter().any(|p| p == container_id))
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn table_name(&self, id: &TableId) -> Option<String> {
        self.inner.lock().tables.get(id).map(|t| t.name.clone())
    }

    /// Subsheet contents, trailing empty rows trimmed
    pub fn rows(&self, id: &TableId, sheet: &str) -> Vec<Vec<String>> {
        let inner = self.inner.lock();
        let mut rows = inner
            .tables
            .get(id)
            .and_then(|t| t.sheets.get(sheet))
            .cloned()
            .unwrap_or_default();
        while rows.last().is_some_and(|row| row.iter().all(String::is_empty)) {
            rows.pop();
        }
        rows
    }

    fn begin(&self, operation: Operation) -> Result<parking_lot::MutexGuard<'_, Inner>> {
        let mut inner = self.inner.lock();
        inner.calls.push(operation);
        if inner.failing == Some(operation) {
            return Err(StoreError::Unavailable(format!("injected {:?} failure", operation)));
        }
        Ok(inner)
    }
}

fn sheet_mut<'a>(
    inner: &'a mut Inner,
    id: &TableId,
    sheet: &str,
) -> Result<&'a mut Vec<Vec<String>>> {
    let table = inner.tables.get_mut(id).ok_or_else(|| StoreError::TableNotFound(id.to_string()))?;
    table.sheets.get_mut(sheet).ok_or_else(|| StoreError::InvalidRange {
        range: sheet.to_string(),
        message: format!("no subsheet named `{}` in table {}", sheet, id),
    })
}

#[async_trait::async_trait]
impl TableStore for MemoryTableStore {
    async fn find_table_by_name_in_container(
        &self,
        name: &str,
        container_id: &str,
    ) -> Result<Option<TableId>> {
        let inner = self.begin(Operation::Find)?;
        Ok(inner
            .tables
            .iter()
            .find(|(_, t)| t.name == name && t.parents.iter().any(|p| p == container_id))
            .map(|(id, _)| id.clone()))
    }

    async fn create_table(&self, name: &str, subsheet: &str) -> Result<TableId> {
        let mut inner = self.begin(Operation::Create)?;
        inner.next_id += 1;
        let id = TableId(format!("mem-{}", inner.next_id));

        let mut sheets = BTreeMap::new();
        sheets.insert(subsheet.to_string(), Vec::new());
        inner.tables.insert(
            id.clone(),
            Table { name: name.to_string(), parents: vec![ROOT_CONTAINER.to_string()], sheets },
        );
        Ok(id)
    }

    async fn relocate(&self, id: &TableId, container_id: &str) -> Result<()> {
        let mut inner = self.begin(Operation::Relocate)?;
        let table =
            inner.tables.get_mut(id).ok_or_else(|| StoreError::TableNotFound(id.to_string()))?;
        table.parents = vec![container_id.to_string()];
        Ok(())
    }

    async fn clear_range(&self, id: &TableId, range: &A1Range) -> Result<()> {
        let mut inner = self.begin(Operation::Clear)?;
        let grid = sheet_mut(&mut inner, id, &range.sheet)?;
        let (row0, col0) = range.start.unwrap_or((0, 0));
        for row in grid.iter_mut().skip(row0) {
            for cell in row.iter_mut().skip(col0) {
                cell.clear();
            }
        }
        Ok(())
    }

    async fn write_range(&self, id: &TableId, range: &A1Range, rows: &[Vec<String>]) -> Result<()> {
        let mut inner = self.begin(Operation::Write)?;
        let grid = sheet_mut(&mut inner, id, &range.sheet)?;
        let (row0, col0) = range.start.unwrap_or((0, 0));
        for (r, values) in rows.iter().enumerate() {
            let target_row = row0 + r;
            if grid.len() <= target_row {
                grid.resize(target_row + 1, Vec::new());
            }
            let row = &mut grid[target_row];
            if row.len() < col0 + values.len() {
                row.resize(col0 + values.len(), String::new());
            }
            for (c, value) in values.iter().enumerate() {
                row[col0 + c] = value.clone();
            }
        }
        Ok(())
    }
}
