use crate::calendar::MonthView;
use std::collections::{btree_map::Entry, BTreeMap, BTreeSet};

/// Attendance for a single month: the days on which the subject was present
/// and those on which they were absent.
///
/// The two sets are expected to be disjoint.  A day listed in both is treated
/// as present.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MonthAttendanceRecord {
    pub view: MonthView,
    pub present_days: BTreeSet<u8>,
    pub absent_days: BTreeSet<u8>,
}

impl MonthAttendanceRecord {
    pub fn new<P, A>(view: MonthView, present_days: P, absent_days: A) -> MonthAttendanceRecord
    where
        P: IntoIterator<Item = u8>,
        A: IntoIterator<Item = u8>,
    {
        MonthAttendanceRecord {
            view,
            present_days: present_days.into_iter().collect(),
            absent_days: absent_days.into_iter().collect(),
        }
    }

    pub fn is_present(&self, day: u8) -> bool {
        self.present_days.contains(&day)
    }

    pub fn is_absent(&self, day: u8) -> bool {
        self.absent_days.contains(&day)
    }
}

/// A collection of monthly attendance records indexed by month.
///
/// A dataset can be built from a single record or from any sequence of
/// records.  If a sequence contains more than one record for the same month,
/// the first one wins.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AttendanceDataset {
    records: BTreeMap<MonthView, MonthAttendanceRecord>,
}

impl AttendanceDataset {
    pub fn new() -> AttendanceDataset {
        AttendanceDataset::default()
    }

    /// Add a record unless the dataset already has one for the same month.
    /// Returns `true` if the record was added.
    pub fn insert(&mut self, record: MonthAttendanceRecord) -> bool {
        match self.records.entry(record.view) {
            Entry::Vacant(e) => {
                e.insert(record);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Returns the record for exactly the month `view`, if any
    pub fn record_for(&self, view: MonthView) -> Option<&MonthAttendanceRecord> {
        self.records.get(&view)
    }

    pub fn records(&self) -> impl Iterator<Item = &MonthAttendanceRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<MonthAttendanceRecord> for AttendanceDataset {
    fn from(record: MonthAttendanceRecord) -> AttendanceDataset {
        let mut dataset = AttendanceDataset::new();
        dataset.insert(record);
        dataset
    }
}

impl FromIterator<MonthAttendanceRecord> for AttendanceDataset {
    fn from_iter<I: IntoIterator<Item = MonthAttendanceRecord>>(iter: I) -> AttendanceDataset {
        let mut dataset = AttendanceDataset::new();
        dataset.extend(iter);
        dataset
    }
}

impl Extend<MonthAttendanceRecord> for AttendanceDataset {
    fn extend<I: IntoIterator<Item = MonthAttendanceRecord>>(&mut self, iter: I) {
        for record in iter {
            self.insert(record);
        }
    }
}
