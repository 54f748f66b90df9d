//! Sequential unlock resolution
//!
//! Combines an ordered level list, the user's completed levels and the
//! server's [`AccessDecision`] into a per-level verdict. Pure and total: it
//! never panics, and malformed input resolves to "everything locked".
//!
//! Rules, in precedence order:
//! 1. A bypass source (`admin`, `admin_bypass`) unlocks every level.
//! 2. A denied decision locks every level.
//! 3. Otherwise the first level is unlocked, and level `i` is unlocked iff
//!    level `i - 1` is completed. The first locked level locks everything
//!    after it, even levels already completed from earlier data.
//!
//! Levels must already be sorted by `order` (stable for ties); the resolver
//! trusts the caller's ordering and never re-sorts.

use serde::Serialize;

use crate::access::AccessDecision;
use crate::ids::LevelId;
use crate::level::{CompletedLevelSet, Level};

/// Per-level resolver verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnlockState {
    Locked,
    Unlocked,
}

impl UnlockState {
    pub fn is_unlocked(&self) -> bool {
        matches!(self, UnlockState::Unlocked)
    }
}

/// Three-way classification: how an unlocked level may be used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelMode {
    Locked,
    /// Unlocked with full interaction (exercises can be submitted)
    Interactive,
    /// Unlocked read-only
    Preview,
}

/// Insertion-ordered map from level id to a per-level value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelMap<V> {
    entries: Vec<(LevelId, V)>,
}

impl<V> LevelMap<V> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, id: LevelId, value: V) {
        self.entries.push((id, value));
    }

    pub fn get(&self, id: &LevelId) -> Option<&V> {
        self.entries
            .iter()
            .find(|(entry_id, _)| entry_id == id)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LevelId, &V)> {
        self.entries.iter().map(|(id, value)| (id, value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Serialize> Serialize for LevelMap<V> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, value) in &self.entries {
            map.serialize_entry(id, value)?;
        }
        map.end()
    }
}

pub type UnlockMap = LevelMap<UnlockState>;

impl UnlockMap {
    pub fn is_unlocked(&self, id: &LevelId) -> bool {
        self.get(id).map(UnlockState::is_unlocked).unwrap_or(false)
    }

    pub fn unlocked_count(&self) -> usize {
        self.entries.iter().filter(|(_, s)| s.is_unlocked()).count()
    }
}

/// Resolve the unlock state of every level.
pub fn resolve(
    levels: &[Level],
    completed: &CompletedLevelSet,
    access: &AccessDecision,
) -> UnlockMap {
    let mut map = UnlockMap::with_capacity(levels.len());

    if levels.iter().any(|level| level.id.is_blank()) {
        for level in levels {
            map.push(level.id.clone(), UnlockState::Locked);
        }
        return map;
    }

    if access.is_bypass() {
        for level in levels {
            map.push(level.id.clone(), UnlockState::Unlocked);
        }
        return map;
    }

    if !access.has_access() {
        for level in levels {
            map.push(level.id.clone(), UnlockState::Locked);
        }
        return map;
    }

    let mut gate_open = true;
    for (index, level) in levels.iter().enumerate() {
        if index > 0 && gate_open {
            gate_open = completed.contains(&levels[index - 1].id);
        }
        let state = if gate_open {
            UnlockState::Unlocked
        } else {
            UnlockState::Locked
        };
        map.push(level.id.clone(), state);
    }

    map
}

/// Resolve, then split unlocked levels into interactive and preview.
pub fn classify(
    levels: &[Level],
    completed: &CompletedLevelSet,
    access: &AccessDecision,
) -> LevelMap<LevelMode> {
    let unlocks = resolve(levels, completed, access);
    let viewable = access.permits_viewing();
    let interactive = access.can_interact() || access.is_bypass();

    let mut modes = LevelMap::with_capacity(unlocks.len());
    for (id, state) in unlocks.iter() {
        let mode = match (state, viewable, interactive) {
            (UnlockState::Locked, _, _) | (UnlockState::Unlocked, false, _) => LevelMode::Locked,
            (UnlockState::Unlocked, true, true) => LevelMode::Interactive,
            (UnlockState::Unlocked, true, false) => LevelMode::Preview,
        };
        modes.push(id.clone(), mode);
    }
    modes
}
