//! Token records and the token store.
//!
//! [`TokenStore`] is the single owner of token state. Every mutation builds a
//! new version of the collection and swaps it in: untouched records are
//! shared by `Arc`, the edited record is rebuilt. A [`Snapshot`] taken before a
//! mutation therefore never observes a half-applied edit.
//!
//! All operations are total. Unknown ids, unparsable numbers and non-finite
//! positions are ignored; sizes clamp at the floor. Each mutator returns
//! whether anything changed.

#[cfg(test)]
#[path = "tokens_test.rs"]
mod tokens_test;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogEntry;
use crate::consts::{DEFAULT_PLAYER_HP, DEFAULT_PLAYER_NAME, MIN_TOKEN_SIZE};
use crate::image::ImageRef;
use crate::viewport::Point;

/// Session-unique token identifier. Assigned sequentially from 1.
pub type TokenId = u64;

/// Immutable view of the whole collection at one point in time.
pub type Snapshot = Arc<[Arc<Token>]>;

// =============================================================
// Conditions
// =============================================================

/// Status conditions that can be toggled on a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Poison,
    Rage,
    Confusion,
    Fear,
    Sleeping,
    Death,
}

impl Condition {
    pub const ALL: [Self; 6] = [Self::Poison, Self::Rage, Self::Confusion, Self::Fear, Self::Sleeping, Self::Death];

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Poison => "poison",
            Self::Rage => "rage",
            Self::Confusion => "confusion",
            Self::Fear => "fear",
            Self::Sleeping => "sleeping",
            Self::Death => "death",
        }
    }

    /// Glyph drawn on the token while the condition is active.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Poison => "☣",
            Self::Rage => "🔥",
            Self::Confusion => "❓",
            Self::Fear => "😱",
            Self::Sleeping => "Z",
            Self::Death => "☠",
        }
    }

    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::Poison => "green",
            Self::Rage => "red",
            Self::Confusion | Self::Fear => "yellow",
            Self::Sleeping => "purple",
            Self::Death => "grey",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown condition: {0}")]
pub struct ConditionParseError(pub String);

impl FromStr for Condition {
    type Err = ConditionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.key().eq_ignore_ascii_case(key))
            .ok_or_else(|| ConditionParseError(key.to_string()))
    }
}

/// Condition key → active flag. Absent keys are inactive.
pub type Statuses = BTreeMap<Condition, bool>;

// =============================================================
// Editable fields
// =============================================================

/// Fields the detail editor can replace through [`TokenStore::update_field`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Name,
    Hp,
    MaxHp,
    Image,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown token field: {0}")]
pub struct FieldParseError(pub String);

impl FromStr for Field {
    type Err = FieldParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "name" => Ok(Self::Name),
            "hp" => Ok(Self::Hp),
            "maxHp" | "max_hp" => Ok(Self::MaxHp),
            "image" => Ok(Self::Image),
            other => Err(FieldParseError(other.to_string())),
        }
    }
}

/// Coerce editor input to a number: blank is 0, decimals truncate toward
/// zero, anything else non-numeric is rejected.
#[must_use]
pub fn coerce_number(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(0);
    }
    if let Ok(n) = raw.parse::<i64>() {
        return Some(n);
    }
    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() => {
            // Float-to-int `as` saturates at the i64 bounds.
            #[allow(clippy::cast_possible_truncation)]
            let n = f.trunc() as i64;
            Some(n)
        }
        _ => None,
    }
}

// =============================================================
// Token
// =============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Player,
    Creature,
}

/// Kind-specific display data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DisplayFields {
    #[serde(rename_all = "camelCase")]
    Player { name: String, hp: i64, max_hp: i64 },
    #[serde(rename_all = "camelCase")]
    Creature {
        name: String,
        /// Ordinal among creatures of the same catalog name this session.
        type_count: u32,
        details: Arc<CatalogEntry>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub id: TokenId,
    /// Top-left corner of the token square, in world units.
    pub position: Point,
    /// Diameter in world units.
    pub size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
    #[serde(flatten)]
    pub fields: DisplayFields,
    pub statuses: Statuses,
}

impl Token {
    #[must_use]
    pub fn kind(&self) -> TokenKind {
        match self.fields {
            DisplayFields::Player { .. } => TokenKind::Player,
            DisplayFields::Creature { .. } => TokenKind::Creature,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match &self.fields {
            DisplayFields::Player { name, .. } | DisplayFields::Creature { name, .. } => name,
        }
    }

    #[must_use]
    pub fn is_active(&self, condition: Condition) -> bool {
        self.statuses.get(&condition).copied().unwrap_or(false)
    }

    /// Active conditions in display order.
    pub fn active_statuses(&self) -> impl Iterator<Item = Condition> + '_ {
        self.statuses.iter().filter(|(_, on)| **on).map(|(c, _)| *c)
    }

    /// Text under the token: `name (hp/max)` for players, the name for creatures.
    #[must_use]
    pub fn caption(&self) -> String {
        match &self.fields {
            DisplayFields::Player { name, hp, max_hp } => format!("{name} ({hp}/{max_hp})"),
            DisplayFields::Creature { name, .. } => name.clone(),
        }
    }
}

/// Everything about a token except its id, which the store assigns.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenDraft {
    pub position: Point,
    pub size: u32,
    pub image: Option<ImageRef>,
    pub fields: DisplayFields,
    pub statuses: Statuses,
}

impl TokenDraft {
    /// A fresh player token with default name and hit points.
    #[must_use]
    pub fn player(position: Point, size: u32, image: Option<ImageRef>) -> Self {
        Self {
            position,
            size,
            image,
            fields: DisplayFields::Player {
                name: DEFAULT_PLAYER_NAME.to_string(),
                hp: DEFAULT_PLAYER_HP,
                max_hp: DEFAULT_PLAYER_HP,
            },
            statuses: Statuses::new(),
        }
    }

    /// A creature token instantiated from a catalog entry.
    #[must_use]
    pub fn creature(entry: Arc<CatalogEntry>, type_count: u32, position: Point, size: u32) -> Self {
        Self {
            position,
            size,
            image: entry.image(),
            fields: DisplayFields::Creature { name: entry.name.clone(), type_count, details: entry },
            statuses: Statuses::new(),
        }
    }
}

// =============================================================
// TokenStore
// =============================================================

#[derive(Debug, Clone)]
pub struct TokenStore {
    tokens: Snapshot,
    next_id: TokenId,
    revision: u64,
    min_size: u32,
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new(MIN_TOKEN_SIZE)
    }
}

impl TokenStore {
    /// A store whose size floor is `min_size`, never lower than 20.
    #[must_use]
    pub fn new(min_size: u32) -> Self {
        Self { tokens: Arc::from(Vec::new()), next_id: 1, revision: 0, min_size: min_size.max(MIN_TOKEN_SIZE) }
    }

    // --- Reads ---

    /// Cheap handle to the current collection.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.tokens)
    }

    /// Tokens in insertion (and draw) order.
    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().map(AsRef::as_ref)
    }

    #[must_use]
    pub fn get(&self, id: TokenId) -> Option<&Token> {
        self.iter().find(|t| t.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: TokenId) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Bumped on every effective change.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Id the next `add` will assign.
    #[must_use]
    pub fn next_id(&self) -> TokenId {
        self.next_id
    }

    #[must_use]
    pub fn min_size(&self) -> u32 {
        self.min_size
    }

    // --- Structural changes ---

    /// Append a token and return its freshly assigned id.
    pub fn add(&mut self, draft: TokenDraft) -> TokenId {
        let id = self.next_id;
        self.next_id += 1;
        let token = Token {
            id,
            position: draft.position,
            size: draft.size.max(self.min_size),
            image: draft.image,
            fields: draft.fields,
            statuses: draft.statuses,
        };
        tracing::info!(id, kind = ?token.kind(), name = token.name(), "token added");
        let mut next: Vec<Arc<Token>> = self.tokens.iter().cloned().collect();
        next.push(Arc::new(token));
        self.commit(next);
        id
    }

    /// Remove a token. Returns the removed record, or `None` for unknown ids.
    pub fn remove(&mut self, id: TokenId) -> Option<Arc<Token>> {
        let removed = self.tokens.iter().find(|t| t.id == id).cloned()?;
        let next: Vec<Arc<Token>> = self.tokens.iter().filter(|t| t.id != id).cloned().collect();
        self.commit(next);
        tracing::info!(id, "token removed");
        Some(removed)
    }

    /// Keep only tokens matching `keep`; returns the ids that were dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(&Token) -> bool) -> Vec<TokenId> {
        let (kept, dropped): (Vec<Arc<Token>>, Vec<Arc<Token>>) = self.tokens.iter().cloned().partition(|t| keep(t));
        if dropped.is_empty() {
            return Vec::new();
        }
        self.commit(kept);
        let ids: Vec<TokenId> = dropped.iter().map(|t| t.id).collect();
        tracing::info!(count = ids.len(), "tokens removed in bulk");
        ids
    }

    /// Empty the store and restart ids at 1.
    pub fn clear(&mut self) {
        self.tokens = Arc::from(Vec::new());
        self.next_id = 1;
        self.revision += 1;
    }

    // --- Record replacement ---

    /// Replace one field. `Hp` / `MaxHp` are coerced to numbers; `Image`
    /// with a blank value clears the portrait. Creature tokens have no hit
    /// points, so numeric fields are ignored for them.
    pub fn update_field(&mut self, id: TokenId, field: Field, value: &str) -> bool {
        self.replace(id, |token| {
            let mut next = token.clone();
            match (field, &mut next.fields) {
                (Field::Name, DisplayFields::Player { name, .. } | DisplayFields::Creature { name, .. }) => {
                    value.clone_into(name);
                }
                (Field::Hp, DisplayFields::Player { hp, .. }) => *hp = coerce_number(value)?,
                (Field::MaxHp, DisplayFields::Player { max_hp, .. }) => *max_hp = coerce_number(value)?,
                (Field::Image, _) => next.image = ImageRef::new(value),
                (Field::Hp | Field::MaxHp, DisplayFields::Creature { .. }) => return None,
            }
            Some(next)
        })
    }

    pub fn update_status(&mut self, id: TokenId, condition: Condition, active: bool) -> bool {
        self.replace(id, |token| {
            let mut next = token.clone();
            next.statuses.insert(condition, active);
            Some(next)
        })
    }

    pub fn update_position(&mut self, id: TokenId, position: Point) -> bool {
        if !position.is_finite() {
            tracing::warn!(id, "ignoring non-finite token position");
            return false;
        }
        self.replace(id, |token| Some(Token { position, ..token.clone() }))
    }

    /// Grow or shrink by `delta` world units, never below the size floor.
    pub fn update_size(&mut self, id: TokenId, delta: i32) -> bool {
        let floor = self.min_size;
        self.replace(id, |token| {
            let wanted = i64::from(token.size) + i64::from(delta);
            let size = u32::try_from(wanted.max(i64::from(floor))).unwrap_or(u32::MAX);
            Some(Token { size, ..token.clone() })
        })
    }

    /// Add `delta` to a player's hit points, flooring at 0.
    pub fn adjust_hp(&mut self, id: TokenId, delta: i64) -> bool {
        self.replace(id, |token| {
            let mut next = token.clone();
            let DisplayFields::Player { hp, .. } = &mut next.fields else {
                return None;
            };
            *hp = hp.saturating_add(delta).max(0);
            Some(next)
        })
    }

    /// Swap in a rebuilt record for `id`. The closure returns `None` to
    /// decline; an identical record also counts as no change.
    fn replace(&mut self, id: TokenId, rebuild: impl FnOnce(&Token) -> Option<Token>) -> bool {
        let Some(index) = self.tokens.iter().position(|t| t.id == id) else {
            tracing::debug!(id, "update for unknown token ignored");
            return false;
        };
        let current = &self.tokens[index];
        let Some(updated) = rebuild(current) else {
            return false;
        };
        if updated == **current {
            return false;
        }
        let mut next: Vec<Arc<Token>> = self.tokens.to_vec();
        next[index] = Arc::new(updated);
        self.commit(next);
        true
    }

    fn commit(&mut self, next: Vec<Arc<Token>>) {
        self.tokens = Arc::from(next);
        self.revision += 1;
    }
}
