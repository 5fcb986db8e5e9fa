use std::{
    collections::HashSet,
    sync::{Arc, Mutex, MutexGuard},
};

use lambda_model::UnitId;

/// Append-only set of units seen on the response stream.
///
/// Shared between the stream-draining path (writer) and the reclaimer (reader).
/// Cloning yields another handle to the same set.
#[derive(Clone, Default)]
pub struct UnitRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

#[derive(Default)]
struct RegistryInner {
    seen: HashSet<UnitId>,
    /// First-seen order.
    order: Vec<UnitId>,
}

impl UnitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a unit. Returns `true` if it was not seen before.
    pub fn add(&self, id: &UnitId) -> bool {
        let mut inner = self.lock();
        if inner.seen.contains(id) {
            return false;
        }
        inner.seen.insert(id.clone());
        inner.order.push(id.clone());
        true
    }

    /// All units seen so far, in first-seen order.
    pub fn snapshot(&self) -> Vec<UnitId> {
        self.lock().order.clone()
    }

    pub fn contains(&self, id: &UnitId) -> bool {
        self.lock().seen.contains(id)
    }

    pub fn len(&self) -> usize {
        self.lock().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Both operations are plain set updates; a poisoned lock still holds a consistent set.
    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn new_registry_is_empty() {
        let reg = UnitRegistry::new();
        assert!(reg.is_empty());
        assert!(reg.snapshot().is_empty());
    }

    #[test]
    fn add_is_idempotent() {
        let reg = UnitRegistry::new();
        let id = UnitId::from("unit-a");

        assert!(reg.add(&id));
        let before = reg.snapshot();
        assert!(!reg.add(&id));
        let after = reg.snapshot();

        assert_eq!(before.len(), after.len());
        assert_eq!(after.iter().filter(|u| **u == id).count(), 1);
    }

    #[test]
    fn snapshot_keeps_first_seen_order() {
        let reg = UnitRegistry::new();
        for id in ["c", "a", "b", "a", "c"] {
            reg.add(&UnitId::from(id));
        }
        let ids: Vec<_> = reg.snapshot().into_iter().map(|u| u.to_string()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn clones_share_the_same_set() {
        let reg = UnitRegistry::new();
        let other = reg.clone();
        reg.add(&UnitId::from("x"));
        assert!(other.contains(&UnitId::from("x")));
        assert_eq!(other.len(), 1);
    }

    #[test]
    fn snapshot_is_detached_from_later_adds() {
        let reg = UnitRegistry::new();
        reg.add(&UnitId::from("x"));
        let snap = reg.snapshot();
        reg.add(&UnitId::from("y"));
        assert_eq!(snap.len(), 1);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn concurrent_add_and_snapshot() {
        let reg = UnitRegistry::new();
        let writer = {
            let reg = reg.clone();
            thread::spawn(move || {
                for i in 0..500 {
                    reg.add(&UnitId::new(format!("unit-{}", i % 100)));
                }
            })
        };
        let reader = {
            let reg = reg.clone();
            thread::spawn(move || {
                let mut last = 0;
                for _ in 0..500 {
                    let n = reg.snapshot().len();
                    assert!(n >= last, "registry must never shrink");
                    last = n;
                }
            })
        };
        writer.join().unwrap();
        reader.join().unwrap();
        assert_eq!(reg.len(), 100);
    }
}
