//! Replay of JSON-lines session scripts against an [`EngineCore`].
//!
//! Each non-blank line is either a host input event (an object with an
//! `"input"` tag, forwarded to [`EngineCore::handle`]) or a command (an
//! object with an `"op"` tag) standing in for toolbar buttons, the detail
//! editor and the image loader. Lines starting with `#` are comments.

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use board::catalog::MonsterCatalog;
use board::detail::{DetailModel, DetailView};
use board::drag::DragPhase;
use board::engine::EngineCore;
use board::image::ImageRef;
use board::input::InputEvent;
use board::render::Scene;
use board::tokens::{Condition, Field, Snapshot, TokenId};
use board::viewport::Point;

use crate::config::AppConfig;
use crate::dice::{DiceRoller, STANDARD};
use crate::error::AppError;
use crate::maps;
use crate::sim_points::SimPoints;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    ResizeViewport { width: f64, height: f64 },
    SetBackground { image: Option<String> },
    SelectMap { name: String },
    ImageLoaded { image: String, width: u32, height: u32 },
    AddPlayer { image: Option<String> },
    AddCreature { name: String },
    Remove { id: TokenId },
    RemovePlayers,
    RemoveCreatures,
    UpdateField { id: TokenId, field: Field, value: String },
    UpdateStatus { id: TokenId, condition: Condition, active: bool },
    UpdatePosition { id: TokenId, x: f64, y: f64 },
    UpdateSize { id: TokenId, delta: i32 },
    AdjustHp { id: TokenId, delta: i64 },
    OpenDetail { id: TokenId },
    CloseDetail,
    TogglePin,
    Trust,
    Reset,
    ResetViewport,
    ZoomIn,
    ZoomOut,
    Roll { sides: u32, count: Option<u32> },
    AdjustMultiplier { sides: u32, delta: i32 },
    ClearHistory,
    SetSimPoints { value: i64 },
    DivideSimPoints { divisor: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Input(InputEvent),
    Command(Command),
}

impl Step {
    /// Parse one script line. `Ok(None)` for blanks and comments.
    pub fn parse(line: usize, text: &str) -> Result<Option<Self>, AppError> {
        let text = text.trim();
        if text.is_empty() || text.starts_with('#') {
            return Ok(None);
        }
        let value: Value = serde_json::from_str(text).map_err(|source| AppError::Script { line, source })?;
        let step = if value.get("input").is_some() {
            Self::Input(serde_json::from_value(value).map_err(|source| AppError::Script { line, source })?)
        } else if value.get("op").is_some() {
            Self::Command(serde_json::from_value(value).map_err(|source| AppError::Script { line, source })?)
        } else {
            return Err(AppError::Step { line, message: "expected an \"input\" or \"op\" tag".into() });
        };
        Ok(Some(step))
    }
}

/// State printed after a replay.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub steps: usize,
    pub prevented_defaults: usize,
    pub zoom_percent: f64,
    pub pan: Point,
    /// Built-in map currently shown, if the background is one.
    pub map: Option<&'static str>,
    pub drag: DragPhase,
    pub tokens: Snapshot,
    pub detail: DetailView,
    pub detail_model: Option<DetailModel>,
    pub pending_images: Vec<ImageRef>,
    /// Toolbar multiplier per standard die.
    pub multipliers: BTreeMap<u32, u32>,
    pub dice: Vec<String>,
    pub sim_points: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scene: Option<Scene>,
}

/// One replayed session: the engine plus the host-side pieces around it.
pub struct Session {
    engine: EngineCore,
    catalog: Option<MonsterCatalog>,
    dice: DiceRoller,
    sim_points: SimPoints,
    rng: StdRng,
    steps: usize,
    prevented_defaults: usize,
}

impl Session {
    pub fn new(config: &AppConfig, catalog: Option<MonsterCatalog>, seed: Option<u64>) -> Self {
        let mut engine = EngineCore::new(config.board.clone());
        engine.set_viewport_size(config.viewport.width, config.viewport.height);
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            engine,
            catalog,
            dice: DiceRoller::new(),
            sim_points: SimPoints::default(),
            rng,
            steps: 0,
            prevented_defaults: 0,
        }
    }

    /// Apply every step of a script in order, stopping at the first error.
    pub fn run(&mut self, script: &str) -> Result<(), AppError> {
        for (index, text) in script.lines().enumerate() {
            let line = index + 1;
            if let Some(step) = Step::parse(line, text)? {
                self.apply(line, step)?;
            }
        }
        Ok(())
    }

    pub fn apply(&mut self, line: usize, step: Step) -> Result<(), AppError> {
        self.steps += 1;
        match step {
            Step::Input(event) => {
                let routed = self.engine.handle(&event);
                if routed.prevent_default {
                    self.prevented_defaults += 1;
                }
                tracing::debug!(line, actions = routed.actions.len(), "input replayed");
            }
            Step::Command(command) => self.command(line, command)?,
        }
        Ok(())
    }

    fn command(&mut self, line: usize, command: Command) -> Result<(), AppError> {
        let engine = &mut self.engine;
        match command {
            Command::ResizeViewport { width, height } => engine.set_viewport_size(width, height),
            Command::SetBackground { image } => engine.set_background(image.as_deref().and_then(ImageRef::new)),
            Command::SelectMap { name } => {
                let map = maps::find(&name)
                    .ok_or_else(|| AppError::Step { line, message: format!("unknown map '{name}'") })?;
                engine.set_background(ImageRef::new(map.url));
            }
            Command::ImageLoaded { image, width, height } => {
                let image =
                    ImageRef::new(&image).ok_or_else(|| AppError::Step { line, message: "blank image".into() })?;
                engine.image_resolved(&image, width, height);
            }
            Command::AddPlayer { image } => {
                engine.add_player(image.as_deref().and_then(ImageRef::new));
            }
            Command::AddCreature { name } => {
                let entry = self
                    .catalog
                    .as_ref()
                    .ok_or_else(|| AppError::Step { line, message: "no catalog loaded".into() })?
                    .find(&name)
                    .ok_or_else(|| AppError::Step { line, message: format!("unknown creature '{name}'") })?;
                engine.add_creature(entry.clone());
            }
            Command::Remove { id } => {
                engine.remove(id);
            }
            Command::RemovePlayers => {
                engine.remove_players();
            }
            Command::RemoveCreatures => {
                engine.remove_creatures();
            }
            Command::UpdateField { id, field, value } => {
                engine.update_field(id, field, &value);
            }
            Command::UpdateStatus { id, condition, active } => {
                engine.update_status(id, condition, active);
            }
            Command::UpdatePosition { id, x, y } => {
                engine.update_position(id, Point::new(x, y));
            }
            Command::UpdateSize { id, delta } => {
                engine.update_size(id, delta);
            }
            Command::AdjustHp { id, delta } => {
                engine.adjust_hp(id, delta);
            }
            Command::OpenDetail { id } => {
                engine.open_detail(id);
            }
            Command::CloseDetail => engine.close_detail(),
            Command::TogglePin => {
                engine.toggle_pin();
            }
            Command::Trust => {
                engine.trust();
            }
            Command::Reset => engine.reset(),
            Command::ResetViewport => {
                engine.reset_viewport();
            }
            Command::ZoomIn => {
                engine.zoom_in();
            }
            Command::ZoomOut => {
                engine.zoom_out();
            }
            Command::Roll { sides, count } => {
                let rolled = match count {
                    Some(count) => self.dice.roll_n(count, sides, &mut self.rng),
                    None => self.dice.roll(sides, &mut self.rng),
                };
                rolled.map_err(|e| AppError::Step { line, message: e.to_string() })?;
            }
            Command::AdjustMultiplier { sides, delta } => {
                self.dice.adjust_multiplier(sides, delta);
            }
            Command::ClearHistory => self.dice.clear_history(),
            Command::SetSimPoints { value } => self.sim_points.set(value),
            Command::DivideSimPoints { divisor } => {
                self.sim_points
                    .divide(divisor)
                    .ok_or_else(|| AppError::Step { line, message: "sim points divisor must be positive".into() })?;
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn report(&self, with_scene: bool) -> Report {
        let engine = &self.engine;
        Report {
            steps: self.steps,
            prevented_defaults: self.prevented_defaults,
            zoom_percent: engine.viewport().zoom_percent(),
            pan: engine.viewport().pan(),
            map: engine.background().and_then(|image| maps::by_url(image.as_str())).map(|m| m.name),
            drag: engine.drag_phase(),
            tokens: engine.tokens().snapshot(),
            detail: engine.detail(),
            detail_model: engine.detail_model(),
            pending_images: engine.images().pending(),
            multipliers: STANDARD.into_iter().map(|sides| (sides, self.dice.multiplier(sides))).collect(),
            dice: self.dice.history().iter().map(ToString::to_string).collect(),
            sim_points: self.sim_points.value(),
            scene: with_scene.then(|| engine.scene()),
        }
    }
}
