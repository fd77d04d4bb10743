use std::collections::BTreeMap;

use async_trait::async_trait;

use biblio_core::{Error, FieldKind, FieldValue, Result, TableId};

/// One synthesized cell of a row about to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedCell {
    pub column: String,
    pub kind: FieldKind,
    pub value: FieldValue,
}

/// Where generated rows go, and where key lookups are answered.
///
/// Every call observes the rows inserted earlier in the same batch.
#[async_trait]
pub trait GenerationTarget: Send {
    /// `max(key) + 1` of `table`, `1` when empty.
    async fn next_key(&mut self, table: TableId) -> Result<i32>;

    /// Key of the parent row at `roll` (in `[0, 1)`) of the parent's key order.
    async fn pick_parent_key(&mut self, parent: TableId, roll: f64) -> Result<i32>;

    async fn insert_row(&mut self, table: TableId, row: &[GeneratedCell]) -> Result<()>;
}

/// Position in `0..len` for a roll in `[0, 1)`.
pub fn roll_index(roll: f64, len: u64) -> u64 {
    ((roll * len as f64) as u64).min(len.saturating_sub(1))
}

/// Target keeping rows in memory. Enforces foreign keys against the rows it
/// holds and assigns missing keys like a sequence would.
#[derive(Debug, Default)]
pub struct InMemoryTarget {
    rows: BTreeMap<TableId, Vec<BTreeMap<String, FieldValue>>>,
}

impl InMemoryTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `count` parent rows with keys `1..=count`.
    pub fn with_keys(mut self, table: TableId, count: i32) -> Self {
        let key = table.primary_key().to_string();
        let rows = self.rows.entry(table).or_default();
        for id in 1..=count {
            rows.push(BTreeMap::from([(key.clone(), FieldValue::Int(id))]));
        }
        self
    }

    pub fn rows(&self, table: TableId) -> &[BTreeMap<String, FieldValue>] {
        self.rows.get(&table).map(Vec::as_slice).unwrap_or(&[])
    }

    fn keys(&self, table: TableId) -> Vec<i32> {
        let key = table.primary_key();
        let mut keys: Vec<i32> = self
            .rows(table)
            .iter()
            .filter_map(|row| row.get(key).and_then(FieldValue::as_i32))
            .collect();
        keys.sort_unstable();
        keys
    }
}

#[async_trait]
impl GenerationTarget for InMemoryTarget {
    async fn next_key(&mut self, table: TableId) -> Result<i32> {
        Ok(self.keys(table).last().copied().unwrap_or(0) + 1)
    }

    async fn pick_parent_key(&mut self, parent: TableId, roll: f64) -> Result<i32> {
        let keys = self.keys(parent);
        if keys.is_empty() {
            return Err(Error::NoParentRows(parent.name().to_string()));
        }
        let idx = roll_index(roll, keys.len() as u64) as usize;
        Ok(keys[idx])
    }

    async fn insert_row(&mut self, table: TableId, row: &[GeneratedCell]) -> Result<()> {
        let entity = table.entity();
        for fk in entity.foreign_keys {
            let value = row
                .iter()
                .find(|cell| cell.column == fk.column)
                .and_then(|cell| cell.value.as_i32());
            if let Some(value) = value {
                if !self.keys(fk.parent).contains(&value) {
                    return Err(Error::Db(format!(
                        "foreign key violation: {}.{} = {value}",
                        table, fk.column
                    )));
                }
            }
        }

        let mut record: BTreeMap<String, FieldValue> = row
            .iter()
            .map(|cell| (cell.column.clone(), cell.value.clone()))
            .collect();
        let key = entity.primary_key.to_string();
        match record.get(&key).and_then(FieldValue::as_i32) {
            Some(id) if self.keys(table).contains(&id) => {
                return Err(Error::Db(format!("duplicate key: {table}.{key} = {id}")));
            }
            Some(_) => {}
            None => {
                let id = self.next_key(table).await?;
                record.insert(key, FieldValue::Int(id));
            }
        }

        self.rows.entry(table).or_default().push(record);
        Ok(())
    }
}
