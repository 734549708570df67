//! Image handles and their load state.
//!
//! The engine never fetches or decodes images. It hands out [`ImageRef`]s,
//! records them as pending, and waits for the host to report dimensions.
//! Until then tokens draw a placeholder and the background contributes no
//! centering offset. Resolution never touches world-space geometry.

#[cfg(test)]
#[path = "image_test.rs"]
mod image_test;

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::viewport::Size;

/// Opaque handle to an external image: a URL or an embedded `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(Arc<str>);

impl ImageRef {
    /// Wrap a source string. Blank sources mean "no image".
    #[must_use]
    pub fn new(source: &str) -> Option<Self> {
        let trimmed = source.trim();
        if trimmed.is_empty() { None } else { Some(Self(Arc::from(trimmed))) }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the image bytes travel inline (an uploaded portrait).
    #[must_use]
    pub fn is_embedded(&self) -> bool {
        self.0.starts_with("data:")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ImageState {
    Pending,
    Resolved { width: u32, height: u32 },
}

/// Load state for every image the session has referenced.
#[derive(Debug, Clone, Default)]
pub struct ImageRegistry {
    states: HashMap<ImageRef, ImageState>,
}

impl ImageRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register interest in `image`. Returns `true` when it is new and the
    /// host should start loading it.
    pub fn request(&mut self, image: &ImageRef) -> bool {
        if self.states.contains_key(image) {
            return false;
        }
        tracing::debug!(image = %abbreviate(image), "image requested");
        self.states.insert(image.clone(), ImageState::Pending);
        true
    }

    /// Record the loaded dimensions. Returns `true` if the state changed.
    pub fn resolve(&mut self, image: &ImageRef, width: u32, height: u32) -> bool {
        let next = ImageState::Resolved { width, height };
        let prev = self.states.insert(image.clone(), next);
        if prev == Some(next) {
            return false;
        }
        tracing::debug!(image = %abbreviate(image), width, height, "image resolved");
        true
    }

    #[must_use]
    pub fn state(&self, image: &ImageRef) -> Option<ImageState> {
        self.states.get(image).copied()
    }

    #[must_use]
    pub fn is_resolved(&self, image: &ImageRef) -> bool {
        matches!(self.state(image), Some(ImageState::Resolved { .. }))
    }

    /// Resolved dimensions, if known.
    #[must_use]
    pub fn dimensions(&self, image: &ImageRef) -> Option<Size> {
        match self.state(image)? {
            ImageState::Resolved { width, height } => Some(Size::new(f64::from(width), f64::from(height))),
            ImageState::Pending => None,
        }
    }

    /// Images still waiting on the host, in a stable order.
    #[must_use]
    pub fn pending(&self) -> Vec<ImageRef> {
        let mut out: Vec<ImageRef> = self
            .states
            .iter()
            .filter(|(_, state)| **state == ImageState::Pending)
            .map(|(image, _)| image.clone())
            .collect();
        out.sort();
        out
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// Data URLs can be megabytes long; keep log lines readable.
fn abbreviate(image: &ImageRef) -> &str {
    let s = image.as_str();
    match s.char_indices().nth(48) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
