//! Session-scoped most-recently-used patient list.

use crate::patient::PatientRecord;
use std::collections::VecDeque;

/// Maximum number of remembered selections
pub const MAX_RECENTS: usize = 5;

/// Recently selected patients, most recent first, unique by id.
///
/// Lives for the session only and is never persisted. There is no removal
/// operation; old entries fall off the tail.
#[derive(Debug, Clone, Default)]
pub struct RecentSelections {
    entries: VecDeque<PatientRecord>,
}

impl RecentSelections {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(MAX_RECENTS + 1),
        }
    }

    /// Move `patient` to the front, dropping any earlier entry with the same
    /// id and evicting the oldest beyond [`MAX_RECENTS`].
    pub fn record(&mut self, patient: PatientRecord) {
        self.entries.retain(|p| p.id != patient.id);
        self.entries.push_front(patient);
        self.entries.truncate(MAX_RECENTS);
    }

    pub fn list(&self) -> impl ExactSizeIterator<Item = &PatientRecord> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<PatientRecord> {
        self.entries.iter().cloned().collect()
    }

    pub fn front(&self) -> Option<&PatientRecord> {
        self.entries.front()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn patient(id: &str) -> PatientRecord {
        PatientRecord::new(id, format!("Nombre{id}"), "Apellido", None)
    }

    fn ids(recents: &RecentSelections) -> Vec<String> {
        recents.list().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn reselecting_moves_to_front_without_duplicates() {
        let mut recents = RecentSelections::new();
        recents.record(patient("1"));
        recents.record(patient("2"));
        recents.record(patient("1"));
        assert_eq!(ids(&recents), ["1", "2"]);
    }

    #[test]
    fn recording_twice_keeps_single_front_entry() {
        let mut recents = RecentSelections::new();
        recents.record(patient("7"));
        recents.record(patient("7"));
        assert_eq!(ids(&recents), ["7"]);
        assert_eq!(recents.front().map(|p| p.id.as_str()), Some("7"));
    }

    #[test]
    fn oldest_evicted_beyond_limit() {
        let mut recents = RecentSelections::new();
        for id in ["1", "2", "3", "4", "5", "6"] {
            recents.record(patient(id));
        }
        assert_eq!(ids(&recents), ["6", "5", "4", "3", "2"]);
        assert!(!recents.contains("1"));
    }

    #[test]
    fn untouched_entries_keep_relative_order() {
        let mut recents = RecentSelections::new();
        for id in ["1", "2", "3", "4"] {
            recents.record(patient(id));
        }
        recents.record(patient("2"));
        assert_eq!(ids(&recents), ["2", "4", "3", "1"]);
    }

    proptest! {
        #[test]
        fn bounded_unique_and_most_recent_first(
            picks in proptest::collection::vec(0u8..9, 0..200)
        ) {
            let mut recents = RecentSelections::new();
            for pick in &picks {
                let id = pick.to_string();
                recents.record(patient(&id));

                prop_assert!(recents.len() <= MAX_RECENTS);
                let unique: HashSet<_> = recents.list().map(|p| p.id.as_str()).collect();
                prop_assert_eq!(unique.len(), recents.len());
                prop_assert_eq!(recents.front().map(|p| p.id.as_str()), Some(id.as_str()));
            }

            // newest distinct picks, most recent first
            let mut expected: Vec<String> = Vec::new();
            for pick in picks.iter().rev() {
                let id = pick.to_string();
                if !expected.contains(&id) {
                    expected.push(id);
                }
            }
            expected.truncate(MAX_RECENTS);
            prop_assert_eq!(ids(&recents), expected);
        }
    }

    #[test]
    fn starts_empty() {
        let recents = RecentSelections::new();
        assert!(recents.is_empty());
        assert_eq!(recents.list().len(), 0);
    }
}
