//! The in-memory record set: loaded once, read-only afterwards.

use ahash::AHashSet;
use log::debug;

use crate::models::{Axis, FilterSelection, Record};

/// Complete, validated rows of one data file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
    dropped_rows: usize,
}

impl Dataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        Self {
            records,
            dropped_rows: 0,
        }
    }

    pub(crate) fn with_dropped(records: Vec<Record>, dropped_rows: usize) -> Self {
        Self {
            records,
            dropped_rows,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows discarded at load time because at least one cell was missing.
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    /// Distinct values of one axis in order of first appearance.
    pub fn observed(&self, axis: Axis) -> Vec<&str> {
        let mut seen: AHashSet<&str> = AHashSet::new();
        self.records
            .iter()
            .map(|r| axis.value_of(r))
            .filter(|v| seen.insert(*v))
            .collect()
    }

    /// Records accepted by `selection`, in source order. Never mutates the dataset.
    pub fn filter<'a>(&'a self, selection: &FilterSelection) -> Vec<&'a Record> {
        for axis in Axis::ALL {
            let observed: AHashSet<&str> = self.observed(axis).into_iter().collect();
            for value in selection.accepted(axis) {
                if !observed.contains(value.as_str()) {
                    debug!("{} filter value '{}' does not occur in the dataset", axis.label(), value);
                }
            }
        }
        let out: Vec<&Record> = self.records.iter().filter(|r| selection.matches(r)).collect();
        debug!("filter matched {} of {} records", out.len(), self.records.len());
        out
    }
}
