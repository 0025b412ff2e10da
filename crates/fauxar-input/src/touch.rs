use crate::gesture::PinchTracker;
use crate::tap::DoubleTapDetector;
use crate::AnchorAction;
use fauxar_config::{GestureConfig, PlacementConfig};
use glam::Vec2;
use std::collections::BTreeMap;
use std::time::Duration;

/// A contact that travels further than this (pixels) is a drag, not a tap.
const TAP_SLOP_PX: f32 = 12.0;

/// Routes raw touch contacts into anchoring actions.
///
/// One contact previews and taps; two contacts pinch and twist. A pinch
/// follows the two contacts that started it and ignores any others; it ends
/// when either of them lifts. A contact that was down during multi-touch
/// never counts as a tap.
pub struct InteractionManager {
    contacts: BTreeMap<u64, Contact>,
    pinch: PinchTracker,
    /// Contact ids driving the active pinch.
    pinch_ids: Option<(u64, u64)>,
    taps: DoubleTapDetector,
    /// Set once a second finger lands; cleared when all fingers lift.
    multi_touch: bool,
}

#[derive(Debug, Clone, Copy)]
struct Contact {
    start: Vec2,
    position: Vec2,
}

impl InteractionManager {
    pub fn new(gesture: &GestureConfig, placement: &PlacementConfig) -> Self {
        Self {
            contacts: BTreeMap::new(),
            pinch: PinchTracker::new(gesture),
            pinch_ids: None,
            taps: DoubleTapDetector::new(Duration::from_millis(placement.double_tap_window_ms)),
            multi_touch: false,
        }
    }

    pub fn is_pinching(&self) -> bool {
        self.pinch.is_active()
    }

    pub fn pinch(&self) -> &PinchTracker {
        &self.pinch
    }

    pub fn on_touch_start(&mut self, id: u64, position: Vec2) -> Option<AnchorAction> {
        self.contacts.insert(
            id,
            Contact {
                start: position,
                position,
            },
        );

        if self.contacts.len() == 1 {
            return Some(AnchorAction::Preview(position));
        }

        self.multi_touch = true;
        if self.pinch_ids.is_none() && self.contacts.len() == 2 {
            let mut ids = self.contacts.keys().copied();
            let ids = (ids.next()?, ids.next()?);
            let (a, b) = self.positions(ids)?;
            self.pinch.begin(a, b);
            self.pinch_ids = Some(ids);
            tracing::debug!(?ids, "Pinch started");
        }
        None
    }

    pub fn on_touch_move(
        &mut self,
        id: u64,
        position: Vec2,
        current_scale: f32,
    ) -> Option<AnchorAction> {
        self.contacts.get_mut(&id)?.position = position;

        if let Some(ids) = self.pinch_ids {
            if id != ids.0 && id != ids.1 {
                return None;
            }
            let (a, b) = self.positions(ids)?;
            let update = self.pinch.update(a, b, current_scale)?;
            return Some(AnchorAction::Transform {
                scale: update.scale,
                yaw_delta: update.yaw_delta,
            });
        }

        (self.contacts.len() == 1 && !self.multi_touch).then_some(AnchorAction::Preview(position))
    }

    /// `at` is the time since session start; it feeds the double-tap window.
    pub fn on_touch_end(&mut self, id: u64, at: Duration) -> Option<AnchorAction> {
        let contact = self.contacts.remove(&id)?;

        if self.pinch_ids.is_some_and(|(a, b)| id == a || id == b) {
            self.pinch.end();
            self.pinch_ids = None;
            tracing::debug!(id, "Pinch ended");
        }

        let was_tap = !self.multi_touch
            && self.contacts.is_empty()
            && contact.position.distance(contact.start) <= TAP_SLOP_PX;

        if self.contacts.is_empty() {
            self.multi_touch = false;
        }

        if was_tap && self.taps.on_tap(at) {
            return Some(AnchorAction::Place(contact.position));
        }
        None
    }

    /// Desktop click: counts as a tap without a preceding press.
    pub fn on_click(&mut self, position: Vec2, at: Duration) -> Option<AnchorAction> {
        self.taps
            .on_tap(at)
            .then_some(AnchorAction::Place(position))
    }

    /// Drop all contacts and tap history (e.g. on mode change).
    pub fn reset(&mut self) {
        self.contacts.clear();
        self.pinch.end();
        self.pinch_ids = None;
        self.taps.reset();
        self.multi_touch = false;
    }

    fn positions(&self, (a, b): (u64, u64)) -> Option<(Vec2, Vec2)> {
        Some((self.contacts.get(&a)?.position, self.contacts.get(&b)?.position))
    }
}
