//! Viewport transform and token interaction engine for the battle map.
//!
//! The crate owns everything between raw input events and world-space token
//! state: the zoom/pan viewport and its coordinate mapping, the token store,
//! the press-hold-drag state machine, keyboard resize routing, the per-token
//! detail view and a headless scene description for whatever renders it. It
//! performs no I/O. Hosts feed it input events and image-load results, and
//! read back [`engine::Action`]s and [`render::Scene`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::EngineCore`]: owns the session state, the only mutation path |
//! | [`router`] | Event-to-route dispatch with fixed priority |
//! | [`drag`] | Idle / Held / Dragging state machine and release commit |
//! | [`tokens`] | Token records and the snapshot-replacing [`tokens::TokenStore`] |
//! | [`viewport`] | Zoom/pan state and the world/screen [`viewport::CoordinateMapper`] |
//! | [`detail`] | Player editor and creature reveal view state |
//! | [`catalog`] | Read-only monster catalog parsed from JSON |
//! | [`image`] | Image handles and pending/resolved tracking |
//! | [`input`] | Input event types, modifiers and keys |
//! | [`hit`] | Screen-space hit-testing of token bodies and controls |
//! | [`render`] | Scene draw list built from the current state |
//! | [`config`] | Tunables with validation |
//! | [`consts`] | Shared numeric defaults |

pub mod catalog;
pub mod config;
pub mod consts;
pub mod detail;
pub mod drag;
pub mod engine;
pub mod hit;
pub mod image;
pub mod input;
pub mod render;
pub mod router;
pub mod tokens;
pub mod viewport;
