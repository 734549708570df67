//! Per-token detail view: the player editor and the creature reveal panel.
//!
//! The view remembers only which token it shows and two flags. Everything it
//! displays is re-read from the [`TokenStore`] through [`DetailView::model`],
//! so an edit made anywhere else is reflected immediately and the view can
//! never write back stale data.

#[cfg(test)]
#[path = "detail_test.rs"]
mod detail_test;

use serde::Serialize;
use serde_json::Value;

use crate::image::ImageRef;
use crate::tokens::{Condition, DisplayFields, Token, TokenId, TokenStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum DetailView {
    #[default]
    Closed,
    PlayerEditor {
        token: TokenId,
        pinned: bool,
    },
    /// Creatures start with basic info only; `trusted` unlocks the stat block.
    CreatureReveal {
        token: TokenId,
        pinned: bool,
        trusted: bool,
    },
}

impl DetailView {
    /// The view appropriate for `token`'s kind.
    #[must_use]
    pub fn open_for(token: &Token) -> Self {
        match token.fields {
            DisplayFields::Player { .. } => Self::PlayerEditor { token: token.id, pinned: false },
            DisplayFields::Creature { .. } => Self::CreatureReveal { token: token.id, pinned: false, trusted: false },
        }
    }

    #[must_use]
    pub fn token(&self) -> Option<TokenId> {
        match *self {
            Self::Closed => None,
            Self::PlayerEditor { token, .. } | Self::CreatureReveal { token, .. } => Some(token),
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.token().is_some()
    }

    /// Whether `id` is shown here with the pin engaged.
    #[must_use]
    pub fn is_pinned_for(&self, id: TokenId) -> bool {
        match *self {
            Self::PlayerEditor { token, pinned } | Self::CreatureReveal { token, pinned, .. } => pinned && token == id,
            Self::Closed => false,
        }
    }

    /// Flip the pin. Returns the new state, `false` if closed.
    pub fn toggle_pin(&mut self) -> bool {
        match self {
            Self::PlayerEditor { pinned, .. } | Self::CreatureReveal { pinned, .. } => {
                *pinned = !*pinned;
                *pinned
            }
            Self::Closed => false,
        }
    }

    /// Escalate a creature view to full reveal. Returns whether anything changed.
    pub fn trust(&mut self) -> bool {
        match self {
            Self::CreatureReveal { trusted, .. } if !*trusted => {
                *trusted = true;
                true
            }
            _ => false,
        }
    }

    pub fn close(&mut self) {
        *self = Self::Closed;
    }

    /// Close if showing `id`. Returns whether it closed.
    pub fn close_if_showing(&mut self, id: TokenId) -> bool {
        if self.token() == Some(id) {
            self.close();
            true
        } else {
            false
        }
    }

    /// Current display data, derived fresh from the store. `None` when
    /// closed or when the token no longer exists.
    #[must_use]
    pub fn model(&self, store: &TokenStore) -> Option<DetailModel> {
        let id = self.token()?;
        let token = store.get(id)?;
        let statuses = Condition::ALL.iter().map(|c| (*c, token.is_active(*c))).collect();
        let model = match (&token.fields, *self) {
            (DisplayFields::Player { name, hp, max_hp }, Self::PlayerEditor { pinned, .. }) => DetailModel::Player {
                id,
                name: name.clone(),
                hp: *hp,
                max_hp: *max_hp,
                image: token.image.clone(),
                statuses,
                pinned,
            },
            (DisplayFields::Creature { name, type_count, .. }, Self::CreatureReveal { trusted: false, pinned, .. }) => {
                DetailModel::CreatureBasic { id, name: name.clone(), type_count: *type_count, pinned }
            }
            (DisplayFields::Creature { name, details, .. }, Self::CreatureReveal { trusted: true, pinned, .. }) => {
                DetailModel::CreatureFull {
                    id,
                    name: name.clone(),
                    image: token.image.clone().or_else(|| details.image()),
                    sim_points: details.sim_points(),
                    stat_block: details.stat_block.clone(),
                    statuses,
                    pinned,
                }
            }
            _ => return None,
        };
        Some(model)
    }
}

/// What a detail panel shows, rebuilt on every read.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "panel", rename_all = "snake_case")]
pub enum DetailModel {
    #[serde(rename_all = "camelCase")]
    Player {
        id: TokenId,
        name: String,
        hp: i64,
        max_hp: i64,
        image: Option<ImageRef>,
        statuses: Vec<(Condition, bool)>,
        pinned: bool,
    },
    #[serde(rename_all = "camelCase")]
    CreatureBasic { id: TokenId, name: String, type_count: u32, pinned: bool },
    #[serde(rename_all = "camelCase")]
    CreatureFull {
        id: TokenId,
        name: String,
        image: Option<ImageRef>,
        sim_points: Option<i64>,
        stat_block: Value,
        statuses: Vec<(Condition, bool)>,
        pinned: bool,
    },
}
