//! Newest-first sequence of draw records.

use super::record::DrawRecord;
use crate::selector::TicketNumber;
use serde::{Deserialize, Serialize};
use std::collections::vec_deque::{self, VecDeque};

/// Draw history, most recent record first.
///
/// Index 0 is always the latest draw. Indices shift on every insert, so
/// they identify a record only until the next draw completes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog {
    records: VecDeque<DrawRecord>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DrawRecord> {
        self.records.get(index)
    }

    /// The most recent record.
    pub fn latest(&self) -> Option<&DrawRecord> {
        self.records.front()
    }

    pub fn iter(&self) -> vec_deque::Iter<'_, DrawRecord> {
        self.records.iter()
    }

    /// Winners of the `count` most recent draws, newest first.
    pub fn recent_winners(&self, count: usize) -> Vec<TicketNumber> {
        self.records
            .iter()
            .take(count)
            .map(DrawRecord::winner)
            .collect()
    }

    /// Encode as the persisted JSON array.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode a persisted JSON array. Any malformed record fails the whole
    /// decode.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub(crate) fn prepend(&mut self, record: DrawRecord) {
        self.records.push_front(record);
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut DrawRecord> {
        self.records.get_mut(index)
    }
}

/// Collects records that are already newest-first.
impl FromIterator<DrawRecord> for HistoryLog {
    fn from_iter<I: IntoIterator<Item = DrawRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a HistoryLog {
    type Item = &'a DrawRecord;
    type IntoIter = vec_deque::Iter<'a, DrawRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
