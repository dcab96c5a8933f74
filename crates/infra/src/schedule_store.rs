use eapteka_domain::{ReminderSchedule, ID};
use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

/// Immutable point-in-time view of the `ScheduleStore`
#[derive(Debug, Clone, Default)]
pub struct ScheduleSnapshot(Arc<HashMap<ID, ReminderSchedule>>);

impl ScheduleSnapshot {
    pub fn iter(&self) -> impl Iterator<Item = &ReminderSchedule> {
        self.0.values()
    }

    pub fn get(&self, id: &ID) -> Option<&ReminderSchedule> {
        self.0.get(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Schedules ordered by id
    pub fn to_sorted_vec(&self) -> Vec<ReminderSchedule> {
        let mut schedules = self.0.values().cloned().collect::<Vec<_>>();
        schedules.sort_by_key(|s| s.id);
        schedules
    }
}

impl<'a> IntoIterator for &'a ScheduleSnapshot {
    type Item = &'a ReminderSchedule;
    type IntoIter = std::collections::hash_map::Values<'a, ID, ReminderSchedule>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.values()
    }
}

/// In-memory cache of the reminder schedules read by the reminder job.
///
/// The data store stays authoritative: the cache is seeded with `load` at
/// start-up and kept in sync with `insert` and `remove` when notifiers are
/// created and deleted.
///
/// Readers get an `Arc` to the current map. Writers copy the map when a
/// snapshot of it is still alive, so a snapshot never changes after it was
/// taken and always reflects a whole number of completed writes.
#[derive(Debug, Default)]
pub struct ScheduleStore {
    schedules: RwLock<Arc<HashMap<ID, ReminderSchedule>>>,
}

impl ScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every cached schedule
    pub fn load(&self, schedules: Vec<ReminderSchedule>) {
        let schedules = schedules.into_iter().map(|s| (s.id, s)).collect();
        *self.schedules.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(schedules);
    }

    /// Inserts or replaces the schedule with the same id
    pub fn insert(&self, schedule: ReminderSchedule) {
        let mut schedules = self.schedules.write().unwrap_or_else(PoisonError::into_inner);
        Arc::make_mut(&mut *schedules).insert(schedule.id, schedule);
    }

    /// Removing an unknown id is a no-op and returns `None`
    pub fn remove(&self, id: &ID) -> Option<ReminderSchedule> {
        let mut schedules = self.schedules.write().unwrap_or_else(PoisonError::into_inner);
        if !schedules.contains_key(id) {
            return None;
        }
        Arc::make_mut(&mut *schedules).remove(id)
    }

    pub fn snapshot(&self) -> ScheduleSnapshot {
        let schedules = self.schedules.read().unwrap_or_else(PoisonError::into_inner);
        ScheduleSnapshot(Arc::clone(&*schedules))
    }

    pub fn get(&self, id: &ID) -> Option<ReminderSchedule> {
        self.snapshot().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eapteka_domain::parse_triggers;
    use std::thread;

    fn schedule(id: i64) -> ReminderSchedule {
        ReminderSchedule {
            id: id.into(),
            product_id: id.into(),
            product_name: format!("Product {}", id),
            triggers: parse_triggers(&["08:30:UTC"]).unwrap(),
        }
    }

    #[test]
    fn load_replaces_everything() {
        let store = ScheduleStore::new();
        store.insert(schedule(100));
        store.load(vec![schedule(1), schedule(2)]);

        assert_eq!(store.len(), 2);
        assert!(store.get(&ID::from(100)).is_none());
        assert_eq!(store.get(&ID::from(2)), Some(schedule(2)));
    }

    #[test]
    fn insert_and_remove() {
        let store = ScheduleStore::new();
        assert!(store.is_empty());

        store.insert(schedule(1));
        store.insert(schedule(2));
        assert_eq!(store.len(), 2);

        assert_eq!(store.remove(&ID::from(1)), Some(schedule(1)));
        assert!(store.remove(&ID::from(1)).is_none());
        assert!(store.remove(&ID::from(42)).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn snapshots_do_not_see_later_writes() {
        let store = ScheduleStore::new();
        store.insert(schedule(1));
        let before = store.snapshot();

        store.insert(schedule(2));
        store.remove(&ID::from(1));
        let after = store.snapshot();

        assert_eq!(before.len(), 1);
        assert!(before.get(&ID::from(1)).is_some());
        assert_eq!(after.len(), 1);
        assert!(after.get(&ID::from(2)).is_some());
        assert_eq!(
            after.to_sorted_vec().into_iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![ID::from(2)]
        );
    }

    #[test]
    fn concurrent_snapshots_observe_whole_writes() {
        let store = Arc::new(ScheduleStore::new());
        // Writers always insert pairs of schedules in one step
        // so a consistent snapshot always has an even length.
        let writer = {
            let store = store.clone();
            thread::spawn(move || {
                for i in 0..500 {
                    let mut schedules = store.snapshot().to_sorted_vec();
                    schedules.push(schedule(2 * i));
                    schedules.push(schedule(2 * i + 1));
                    store.load(schedules);
                    store.insert(schedule(10_000 + i));
                    store.remove(&ID::from(10_000 + i));
                }
            })
        };
        let readers = (0..4)
            .map(|_| {
                let store = store.clone();
                thread::spawn(move || {
                    for _ in 0..2_000 {
                        let snapshot = store.snapshot();
                        let count = snapshot.iter().filter(|s| s.id.inner() < 10_000).count();
                        assert_eq!(count % 2, 0);
                        assert!(snapshot.len() - count <= 1);
                    }
                })
            })
            .collect::<Vec<_>>();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(store.len(), 1_000);
    }
}
