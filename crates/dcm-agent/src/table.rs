//! `AgentTable`: one row per choice occasion, stored column-wise.
//!
//! Besides its named attribute columns every row carries three fixed fields:
//!
//! - `id`: the caller's [`AgentId`], unique within the table,
//! - `segment`: an interned label (`"work"`, `"school"`, …) selecting the
//!   coefficient column of a specification,
//! - `chunk_id`: assigned at build time (or by an explicit
//!   [`rechunk`](AgentTable::rechunk) before a run), never during one.
//!
//! Sub-tables produced by [`select`](AgentTable::select) and
//! [`take`](AgentTable::take) keep all three, including the segment label
//! list, so `SegmentId`s stay comparable between a table and its subsets.

use std::collections::BTreeMap;

use dcm_core::{AgentId, ChunkId, Column, CoreError, CoreResult, SegmentId, chunk_of};
use rustc_hash::FxHashMap;

use crate::{AgentError, AgentResult};

/// Columnar agent storage.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentTable {
    ids:            Vec<AgentId>,
    segments:       Vec<SegmentId>,
    segment_labels: Vec<String>,
    chunk_ids:      Vec<ChunkId>,
    columns:        Vec<(String, Column)>,

    /// `AgentId` → row.  Built once; doubles as the duplicate check.
    index: FxHashMap<AgentId, usize>,
}

impl AgentTable {
    pub(crate) fn from_parts(
        ids:            Vec<AgentId>,
        segments:       Vec<SegmentId>,
        segment_labels: Vec<String>,
        chunk_ids:      Vec<ChunkId>,
        columns:        Vec<(String, Column)>,
    ) -> AgentResult<Self> {
        let n = ids.len();
        check_len("segment labels", n, segments.len())?;
        check_len("chunk ids", n, chunk_ids.len())?;
        for (name, col) in &columns {
            if col.len() != n {
                return Err(CoreError::ColumnLength { name: name.clone(), expected: n, got: col.len() }.into());
            }
        }

        let mut index = FxHashMap::with_capacity_and_hasher(n, Default::default());
        for (row, &id) in ids.iter().enumerate() {
            if index.insert(id, row).is_some() {
                return Err(AgentError::DuplicateAgent(id));
            }
        }

        Ok(Self { ids, segments, segment_labels, chunk_ids, columns, index })
    }

    // ── Shape / identity ──────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[AgentId] {
        &self.ids
    }

    #[inline]
    pub fn id(&self, row: usize) -> AgentId {
        self.ids[row]
    }

    /// Row holding `agent`, if present.
    pub fn row_of(&self, agent: AgentId) -> Option<usize> {
        self.index.get(&agent).copied()
    }

    // ── Segments ──────────────────────────────────────────────────────────

    /// Distinct segment labels, indexed by `SegmentId`.
    pub fn segment_labels(&self) -> &[String] {
        &self.segment_labels
    }

    pub fn segment_ids(&self) -> &[SegmentId] {
        &self.segments
    }

    #[inline]
    pub fn segment_id(&self, row: usize) -> SegmentId {
        self.segments[row]
    }

    pub fn segment_label(&self, row: usize) -> &str {
        &self.segment_labels[self.segments[row].index()]
    }

    pub fn segment_id_of(&self, label: &str) -> Option<SegmentId> {
        self.segment_labels
            .iter()
            .position(|l| l == label)
            .map(|i| SegmentId(i as u16))
    }

    /// Rows whose segment label is `label`, ascending.
    pub fn segment_rows(&self, label: &str) -> Vec<usize> {
        match self.segment_id_of(label) {
            Some(seg) => (0..self.len()).filter(|&r| self.segments[r] == seg).collect(),
            None => Vec::new(),
        }
    }

    // ── Chunks ────────────────────────────────────────────────────────────

    pub fn chunk_ids(&self) -> &[ChunkId] {
        &self.chunk_ids
    }

    #[inline]
    pub fn chunk_id(&self, row: usize) -> ChunkId {
        self.chunk_ids[row]
    }

    /// Row numbers grouped by chunk id, chunks ascending and rows ascending
    /// within each chunk.
    pub fn chunk_rows(&self) -> BTreeMap<ChunkId, Vec<usize>> {
        let mut groups: BTreeMap<ChunkId, Vec<usize>> = BTreeMap::new();
        for (row, &chunk) in self.chunk_ids.iter().enumerate() {
            groups.entry(chunk).or_default().push(row);
        }
        groups
    }

    /// Number of distinct chunk ids.
    pub fn chunk_count(&self) -> usize {
        self.chunk_rows().len()
    }

    /// Reassign every row to `chunk_of(row, chunk_size)`, discarding the
    /// previous chunk ids.
    pub fn rechunk(&mut self, chunk_size: usize) -> AgentResult<()> {
        self.chunk_ids = (0..self.len())
            .map(|row| chunk_of(row, chunk_size))
            .collect::<CoreResult<Vec<_>>>()?;
        Ok(())
    }

    // ── Columns ───────────────────────────────────────────────────────────

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    /// Add `column`, replacing any existing column of the same name.
    pub fn set_column(&mut self, name: impl Into<String>, column: Column) -> AgentResult<()> {
        let name = name.into();
        if column.len() != self.len() {
            return Err(CoreError::ColumnLength { name, expected: self.len(), got: column.len() }.into());
        }
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = column,
            None => self.columns.push((name, column)),
        }
        Ok(())
    }

    /// Remove and return a column.
    pub fn remove_column(&mut self, name: &str) -> Option<Column> {
        let pos = self.columns.iter().position(|(n, _)| n == name)?;
        Some(self.columns.remove(pos).1)
    }

    // ── Sub-tables ────────────────────────────────────────────────────────

    /// Agents whose segment label is `label`.  Unknown labels give an empty
    /// table.
    pub fn select(&self, label: &str) -> AgentTable {
        let rows = self.segment_rows(label);
        self.gather(&rows)
    }

    /// Gather `rows` (in the given order) into a new table.
    ///
    /// Ids, segments and chunk ids travel with their rows.  Repeating a row
    /// would duplicate its id and is rejected.
    pub fn take(&self, rows: &[usize]) -> AgentResult<AgentTable> {
        if let Some(&row) = rows.iter().find(|&&r| r >= self.len()) {
            return Err(AgentError::RowOutOfRange { row, len: self.len() });
        }
        let mut seen = vec![false; self.len()];
        for &r in rows {
            if std::mem::replace(&mut seen[r], true) {
                return Err(AgentError::DuplicateAgent(self.ids[r]));
            }
        }
        Ok(self.gather(rows))
    }

    /// `rows` must be in range and distinct.
    fn gather(&self, rows: &[usize]) -> AgentTable {
        let ids: Vec<AgentId> = rows.iter().map(|&r| self.ids[r]).collect();
        let index = ids.iter().enumerate().map(|(row, &id)| (id, row)).collect();
        AgentTable {
            ids,
            segments:       rows.iter().map(|&r| self.segments[r]).collect(),
            segment_labels: self.segment_labels.clone(),
            chunk_ids:      rows.iter().map(|&r| self.chunk_ids[r]).collect(),
            columns:        self.columns.iter().map(|(n, c)| (n.clone(), c.take(rows))).collect(),
            index,
        }
    }
}

fn check_len(what: &'static str, expected: usize, got: usize) -> AgentResult<()> {
    if expected == got {
        Ok(())
    } else {
        Err(AgentError::Length { what, expected, got })
    }
}
