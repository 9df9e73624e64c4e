//! Local application state for dashboard clients with optimistic updates.
//!
//! A habit created locally is shown immediately under a temporary id and is
//! swapped for the server copy once the create call succeeds.

use crate::models::Habit;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum RecordId {
    Pending { temp_id: String },
    Committed { id: String },
}

#[derive(Debug, Clone)]
pub struct LocalHabit {
    pub id: RecordId,
    pub habit: Habit,
}

#[derive(Debug, Default)]
pub struct ClientStore {
    habits: Vec<LocalHabit>,
}

impl ClientStore {
    pub fn new(committed: impl IntoIterator<Item = Habit>) -> Self {
        let habits = committed
            .into_iter()
            .map(|habit| LocalHabit {
                id: RecordId::Committed {
                    id: habit.id.clone(),
                },
                habit,
            })
            .collect();
        Self { habits }
    }

    pub fn habits(&self) -> &[LocalHabit] {
        &self.habits
    }

    /// Adds a draft under a fresh temporary id and returns that id.
    pub fn insert_pending(&mut self, draft: Habit) -> String {
        let temp_id = format!("tmp-{}", Uuid::new_v4());
        self.habits.push(LocalHabit {
            id: RecordId::Pending {
                temp_id: temp_id.clone(),
            },
            habit: draft,
        });
        temp_id
    }

    fn position(&self, temp_id: &str) -> Option<usize> {
        self.habits.iter().position(|local| {
            matches!(&local.id, RecordId::Pending { temp_id: pending } if pending == temp_id)
        })
    }

    /// Replaces the pending entry with the server copy. Returns false when no
    /// entry carries `temp_id`, e.g. after a rollback.
    pub fn reconcile(&mut self, temp_id: &str, committed: Habit) -> bool {
        let Some(index) = self.position(temp_id) else {
            return false;
        };
        self.habits[index] = LocalHabit {
            id: RecordId::Committed {
                id: committed.id.clone(),
            },
            habit: committed,
        };
        true
    }

    pub fn rollback(&mut self, temp_id: &str) -> Option<Habit> {
        let index = self.position(temp_id)?;
        Some(self.habits.remove(index).habit)
    }

    pub fn find_committed(&self, id: &str) -> Option<&Habit> {
        self.habits.iter().find_map(|local| match &local.id {
            RecordId::Committed { id: committed } if committed == id => Some(&local.habit),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Frequency;
    use chrono::{NaiveDate, Utc};

    fn draft(id: &str, title: &str) -> Habit {
        Habit {
            id: id.to_string(),
            user_id: "u1".to_string(),
            title: title.to_string(),
            frequency: Frequency::Daily,
            completed_dates: Vec::new(),
            streak: 0,
            color: "#4f46e5".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn reconcile_swaps_pending_for_committed() {
        let mut store = ClientStore::new([draft("h0", "existing")]);
        let temp_id = store.insert_pending(draft("", "new"));
        assert_eq!(store.habits().len(), 2);

        assert!(store.reconcile(&temp_id, draft("h1", "new")));
        assert_eq!(store.habits().len(), 2);
        assert_eq!(store.find_committed("h1").map(|h| h.title.as_str()), Some("new"));
        assert!(!store.reconcile(&temp_id, draft("h2", "again")));
    }

    #[test]
    fn rollback_drops_only_the_pending_entry() {
        let mut store = ClientStore::new([draft("h0", "existing")]);
        let temp_id = store.insert_pending(draft("", "doomed"));

        let dropped = store.rollback(&temp_id).expect("pending entry");
        assert_eq!(dropped.title, "doomed");
        assert_eq!(store.habits().len(), 1);
        assert!(store.rollback(&temp_id).is_none());
    }
}
