//! Levels and per-user completion state

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::ids::LevelId;

/// A unit of content inside a path, gated behind the previous level
///
/// `order` defines the unlock dependency: level N requires level N-1 to be
/// completed. Levels are fetched read-only and never mutated client-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    #[serde(alias = "_id")]
    pub id: LevelId,
    #[serde(default)]
    pub order: i32,
    #[serde(default = "default_completion_required")]
    pub completion_required: bool,
}

fn default_completion_required() -> bool {
    true
}

impl Level {
    pub fn new(id: impl Into<LevelId>, order: i32) -> Self {
        Self {
            id: id.into(),
            order,
            completion_required: true,
        }
    }
}

/// Stable sort by `order`; levels sharing an order keep their input position.
pub fn sort_levels(levels: &mut [Level]) {
    levels.sort_by_key(|level| level.order);
}

/// Exercise counts for one level, as reported by the progress endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelProgress {
    #[serde(default)]
    pub completed_exercises: u32,
    #[serde(default)]
    pub total_exercises: u32,
}

impl LevelProgress {
    pub fn new(completed_exercises: u32, total_exercises: u32) -> Self {
        Self {
            completed_exercises,
            total_exercises,
        }
    }

    /// A level with no exercises is never complete.
    pub fn is_complete(&self) -> bool {
        self.total_exercises > 0 && self.completed_exercises == self.total_exercises
    }
}

/// Level ids whose exercises are all completed
///
/// Derived per page load and treated as eventually consistent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletedLevelSet(HashSet<LevelId>);

impl CompletedLevelSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, level_id: &LevelId) -> bool {
        self.0.contains(level_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<LevelId> for CompletedLevelSet {
    fn from_iter<I: IntoIterator<Item = LevelId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for CompletedLevelSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut ids: Vec<&LevelId> = self.0.iter().collect();
        ids.sort();
        ids.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_complete_only_when_all_done() {
        assert!(LevelProgress::new(5, 5).is_complete());
        assert!(!LevelProgress::new(4, 5).is_complete());
        assert!(!LevelProgress::new(0, 0).is_complete());
    }

    #[test]
    fn test_progress_defaults_missing_counts() {
        let progress: LevelProgress = serde_json::from_str(r#"{"completedExercises":3}"#).unwrap();
        assert_eq!(progress.total_exercises, 0);
        assert!(!progress.is_complete());
    }

    #[test]
    fn test_sort_levels_is_stable() {
        let mut levels = vec![
            Level::new("c", 2),
            Level::new("a", 1),
            Level::new("b", 1),
        ];
        sort_levels(&mut levels);
        let ids: Vec<&str> = levels.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_level_wire_format() {
        let level: Level = serde_json::from_str(r#"{"_id":"l1","order":0}"#).unwrap();
        assert_eq!(level.id.as_str(), "l1");
        assert!(level.completion_required);
    }

    #[test]
    fn test_completed_set_serializes_sorted() {
        let set: CompletedLevelSet = vec![LevelId::new("b"), LevelId::new("a")]
            .into_iter()
            .collect();
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["a","b"]"#);
    }
}
