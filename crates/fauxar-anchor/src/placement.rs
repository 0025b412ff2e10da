use crate::anchor::Anchor;
use fauxar_scene::projector::ProjectionError;
use glam::{Quat, Vec3};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum PlacementError {
    #[error("Not waiting for a placement")]
    NotPlacing,
    #[error("No model loaded")]
    NoModel,
    #[error(transparent)]
    Projection(#[from] ProjectionError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementState {
    /// No placement in progress (non-AR viewing).
    Unplaced,
    /// Indicator visible, waiting for a double tap.
    Placing,
    /// Anchor frozen.
    Placed,
}

/// Tap-to-place state machine.
///
/// ```text
/// Unplaced --begin--> Placing --confirm--> Placed
///                        ^                    |
///                        +-----relocate-------+
/// any --exit--> Unplaced
/// ```
#[derive(Debug, Clone)]
pub struct Placement {
    state: PlacementState,
    /// Where the indicator currently sits, if the last preview hit.
    indicator: Option<Vec3>,
}

impl Placement {
    pub fn new() -> Self {
        Self {
            state: PlacementState::Unplaced,
            indicator: None,
        }
    }

    pub fn state(&self) -> PlacementState {
        self.state
    }

    /// Indicator position while placing. `None` when hidden.
    pub fn indicator(&self) -> Option<Vec3> {
        match self.state {
            PlacementState::Placing => self.indicator,
            _ => None,
        }
    }

    pub fn indicator_visible(&self) -> bool {
        self.state == PlacementState::Placing
    }

    /// Start waiting for a placement. No effect once placing or placed.
    pub fn begin(&mut self) {
        if self.state == PlacementState::Unplaced {
            self.state = PlacementState::Placing;
            self.indicator = None;
            tracing::debug!("Placement started");
        }
    }

    /// Move the indicator to follow input.
    pub fn preview(&mut self, projected: Result<Vec3, ProjectionError>) {
        if self.state == PlacementState::Placing {
            self.indicator = projected.ok();
        }
    }

    /// Freeze the anchor at `projected`.
    ///
    /// On failure nothing changes: the state stays `Placing` for a retry.
    pub fn confirm(
        &mut self,
        anchor: &mut Anchor,
        projected: Result<Vec3, ProjectionError>,
    ) -> Result<Vec3, PlacementError> {
        if self.state != PlacementState::Placing {
            return Err(PlacementError::NotPlacing);
        }
        let position = projected?;

        anchor.place(position, Quat::IDENTITY);
        self.state = PlacementState::Placed;
        self.indicator = None;
        tracing::info!(?position, scale = anchor.scale, "Anchor placed");
        Ok(position)
    }

    /// Unfreeze a placed anchor so it can be put somewhere else. Scale is kept.
    pub fn relocate(&mut self, anchor: &mut Anchor) -> bool {
        if self.state != PlacementState::Placed {
            return false;
        }
        anchor.unplace();
        self.state = PlacementState::Placing;
        self.indicator = None;
        tracing::info!("Relocating anchor");
        true
    }

    /// Leave placement entirely and discard the anchor.
    pub fn exit(&mut self, anchor: &mut Anchor) {
        anchor.reset();
        self.state = PlacementState::Unplaced;
        self.indicator = None;
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::new()
    }
}
