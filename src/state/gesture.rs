//! Per-overlay gesture recognition.
//!
//! The overlay feeds raw pointer snapshots in; the interpreter answers with live
//! transforms while a gesture is in progress, a commit when a pan or pinch is
//! released, and a long-press request once contact has been held long enough.
//! Pan and pinch are tracked independently and may be active at the same time.
//! Each one captures its reference from the last committed placement when it
//! starts, never from the other recognizer's live value.

use tracing::debug;

use crate::config::{GestureConfig, PlacementDefaults};
use crate::model::{self, DeityKey, DeityPlacement};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pointer {
    pub id: i32,
    pub x: f64,
    pub y: f64,
}

impl Pointer {
    pub fn new(id: i32, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }

    fn distance_to(&self, other: &Pointer) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum GestureInput {
    /// Every pointer currently in contact with the overlay. An empty list means release.
    Touches { at_ms: f64, pointers: Vec<Pointer> },
    /// Timer heartbeat, drives long-press detection.
    Tick { at_ms: f64 },
    /// Platform cancelled the gesture; nothing is committed.
    Cancel,
}

/// Mouse button state mapped onto a single-pointer touch stream.
/// Moves are forwarded while the button is held, wherever the cursor is.
#[derive(Clone, Copy, Debug, Default)]
pub struct MouseDrag {
    down: bool,
}

impl MouseDrag {
    /// Pointer id no touch contact will ever use.
    pub const POINTER_ID: i32 = -1;

    pub fn press(&mut self, at_ms: f64, x: f64, y: f64) -> GestureInput {
        self.down = true;
        GestureInput::Touches {
            at_ms,
            pointers: vec![Pointer::new(Self::POINTER_ID, x, y)],
        }
    }

    pub fn moved(&self, at_ms: f64, x: f64, y: f64) -> Option<GestureInput> {
        self.down.then(|| GestureInput::Touches {
            at_ms,
            pointers: vec![Pointer::new(Self::POINTER_ID, x, y)],
        })
    }

    pub fn release(&mut self, at_ms: f64) -> Option<GestureInput> {
        std::mem::replace(&mut self.down, false).then(|| GestureInput::Touches {
            at_ms,
            pointers: Vec::new(),
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl From<&DeityPlacement> for Transform {
    fn from(p: &DeityPlacement) -> Self {
        Self {
            x: p.x,
            y: p.y,
            scale: p.scale,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum GestureOutput {
    /// Transform to draw right now; not committed.
    Live(Transform),
    /// A pan or pinch ended; route through the store.
    Commit(DeityPlacement),
    /// Contact was held past the long-press threshold.
    LongPress { key: DeityKey, scale: f64 },
}

#[derive(Clone, Debug)]
struct PanTrack {
    pointer: i32,
    start: (f64, f64),
    /// Committed position captured when the pan activated.
    origin: Option<(f64, f64)>,
    live: (f64, f64),
}

#[derive(Clone, Debug)]
struct PinchTrack {
    a: i32,
    b: i32,
    start_distance: f64,
    origin_scale: f64,
    live_scale: f64,
}

#[derive(Clone, Copy, Debug)]
struct LongPressTimer {
    armed_at: f64,
    fired: bool,
}

#[derive(Clone, Debug)]
pub struct GestureInterpreter {
    key: DeityKey,
    committed: Transform,
    pointers: Vec<Pointer>,
    pan: Option<PanTrack>,
    pinch: Option<PinchTrack>,
    long_press: Option<LongPressTimer>,
    config: GestureConfig,
    bounds: PlacementDefaults,
}

impl GestureInterpreter {
    pub fn new(committed: &DeityPlacement, config: GestureConfig, bounds: PlacementDefaults) -> Self {
        Self {
            key: committed.key.clone(),
            committed: Transform::from(committed),
            pointers: Vec::new(),
            pan: None,
            pinch: None,
            long_press: None,
            config,
            bounds,
        }
    }

    /// Adopts the store's latest committed placement, e.g. after a menu scale change.
    /// Gestures already in flight keep their captured reference.
    pub fn sync_committed(&mut self, placement: &DeityPlacement) {
        self.committed = Transform::from(placement);
    }

    pub fn is_idle(&self) -> bool {
        !self.is_panning() && !self.is_pinching() && !self.is_long_press_armed()
    }

    pub fn is_panning(&self) -> bool {
        self.pan.as_ref().is_some_and(|p| p.origin.is_some())
    }

    pub fn is_pinching(&self) -> bool {
        self.pinch.is_some()
    }

    pub fn is_long_press_armed(&self) -> bool {
        self.long_press.is_some_and(|t| !t.fired)
    }

    /// Transform to draw: live values for active recognizers, committed otherwise.
    pub fn current(&self) -> Transform {
        let (x, y) = match &self.pan {
            Some(PanTrack {
                origin: Some(_),
                live,
                ..
            }) => *live,
            _ => (self.committed.x, self.committed.y),
        };
        let scale = self
            .pinch
            .as_ref()
            .map_or(self.committed.scale, |p| p.live_scale);
        Transform { x, y, scale }
    }

    pub fn handle(&mut self, input: GestureInput) -> Vec<GestureOutput> {
        match input {
            GestureInput::Touches { at_ms, pointers } => self.on_touches(at_ms, pointers),
            GestureInput::Tick { at_ms } => self.check_long_press(at_ms).into_iter().collect(),
            GestureInput::Cancel => self.cancel(),
        }
    }

    fn on_touches(&mut self, at_ms: f64, pointers: Vec<Pointer>) -> Vec<GestureOutput> {
        let mut out = Vec::new();
        let lifted = |id: i32| !pointers.iter().any(|p| p.id == id);

        // Releases
        if self.pan.as_ref().is_some_and(|t| lifted(t.pointer)) {
            if let Some(PanTrack {
                origin: Some(_),
                live,
                ..
            }) = self.pan.take()
            {
                self.committed.x = live.0;
                self.committed.y = live.1;
                out.push(GestureOutput::Commit(self.placement()));
            }
        }
        if self.pinch.as_ref().is_some_and(|t| lifted(t.a) || lifted(t.b)) {
            if let Some(track) = self.pinch.take() {
                self.committed.scale = track.live_scale;
                out.push(GestureOutput::Commit(self.placement()));
            }
        }
        if pointers.is_empty() {
            self.long_press = None;
        }

        // New contact
        if self.pointers.is_empty() {
            if let Some(first) = pointers.first() {
                self.pan = Some(PanTrack {
                    pointer: first.id,
                    start: (first.x, first.y),
                    origin: None,
                    live: (self.committed.x, self.committed.y),
                });
                self.long_press = Some(LongPressTimer {
                    armed_at: at_ms,
                    fired: false,
                });
            }
        }
        if self.pinch.is_none() && pointers.len() >= 2 {
            let (a, b) = (pointers[0], pointers[1]);
            self.pinch = Some(PinchTrack {
                a: a.id,
                b: b.id,
                start_distance: a.distance_to(&b),
                origin_scale: self.committed.scale,
                live_scale: self.committed.scale,
            });
        }

        // Movement
        let mut moved = false;
        if let Some(track) = self.pan.as_mut() {
            if let Some(p) = pointers.iter().find(|p| p.id == track.pointer) {
                let (dx, dy) = (p.x - track.start.0, p.y - track.start.1);
                if track.origin.is_none() && dx.hypot(dy) > self.config.drag_threshold_px {
                    track.origin = Some((self.committed.x, self.committed.y));
                }
                if let Some((ox, oy)) = track.origin {
                    track.live = (ox + dx, oy + dy);
                    moved = true;
                }
            }
        }
        if let Some(track) = self.pinch.as_mut() {
            let a = pointers.iter().find(|p| p.id == track.a);
            let b = pointers.iter().find(|p| p.id == track.b);
            if let (Some(a), Some(b)) = (a, b) {
                let ratio = if track.start_distance > f64::EPSILON {
                    a.distance_to(b) / track.start_distance
                } else {
                    1.0
                };
                track.live_scale = model::clamp_scale(track.origin_scale * ratio, &self.bounds);
                moved = true;
            }
        }
        self.pointers = pointers;

        if moved || !out.is_empty() {
            out.push(GestureOutput::Live(self.current()));
        }
        out.extend(self.check_long_press(at_ms));
        out
    }

    fn check_long_press(&mut self, at_ms: f64) -> Option<GestureOutput> {
        let timer = self.long_press.as_mut()?;
        if timer.fired || at_ms - timer.armed_at < self.config.long_press_ms {
            return None;
        }
        timer.fired = true;
        debug!("long press on {}", self.key);
        Some(GestureOutput::LongPress {
            key: self.key.clone(),
            scale: self.committed.scale,
        })
    }

    fn cancel(&mut self) -> Vec<GestureOutput> {
        let was_active = self.pan.is_some() || self.pinch.is_some();
        self.pan = None;
        self.pinch = None;
        self.long_press = None;
        self.pointers.clear();
        if was_active {
            vec![GestureOutput::Live(self.committed)]
        } else {
            Vec::new()
        }
    }

    fn placement(&self) -> DeityPlacement {
        DeityPlacement::new(
            self.key.clone(),
            self.committed.x,
            self.committed.y,
            self.committed.scale,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interp(x: f64, y: f64, scale: f64) -> GestureInterpreter {
        GestureInterpreter::new(
            &DeityPlacement::new("ganesh", x, y, scale),
            GestureConfig::default(),
            PlacementDefaults::default(),
        )
    }

    fn touches(g: &mut GestureInterpreter, at_ms: f64, pts: &[(i32, f64, f64)]) -> Vec<GestureOutput> {
        let pointers = pts.iter().map(|&(id, x, y)| Pointer::new(id, x, y)).collect();
        g.handle(GestureInput::Touches { at_ms, pointers })
    }

    fn commits(out: &[GestureOutput]) -> Vec<DeityPlacement> {
        out.iter()
            .filter_map(|o| match o {
                GestureOutput::Commit(p) => Some(p.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn small_movement_is_not_a_pan() {
        let mut g = interp(-60.0, 0.0, 3.0);
        touches(&mut g, 0.0, &[(1, 100.0, 100.0)]);
        touches(&mut g, 10.0, &[(1, 104.0, 103.0)]);
        assert!(!g.is_panning());
        let out = touches(&mut g, 20.0, &[]);
        assert!(commits(&out).is_empty());
        assert!(g.is_idle());
    }

    #[test]
    fn pan_commits_origin_plus_translation() {
        let mut g = interp(-60.0, 0.0, 3.0);
        touches(&mut g, 0.0, &[(1, 100.0, 100.0)]);
        let out = touches(&mut g, 16.0, &[(1, 200.0, 115.0)]);
        assert!(g.is_panning());
        assert_eq!(
            out.first(),
            Some(&GestureOutput::Live(Transform { x: 40.0, y: 15.0, scale: 3.0 }))
        );
        let out = touches(&mut g, 32.0, &[]);
        assert_eq!(commits(&out), vec![DeityPlacement::new("ganesh", 40.0, 15.0, 3.0)]);
        assert!(!g.is_panning());
    }

    #[test]
    fn mouse_drag_follows_cursor_until_button_release() {
        let mut g = interp(-60.0, 0.0, 3.0);
        let mut mouse = MouseDrag::default();
        assert!(mouse.moved(0.0, 50.0, 50.0).is_none());
        g.handle(mouse.press(0.0, 100.0, 100.0));
        for (t, x, y) in [(16.0, 400.0, 100.0), (32.0, 700.0, 130.0)] {
            if let Some(input) = mouse.moved(t, x, y) {
                g.handle(input);
            }
        }
        assert!(g.is_panning());
        let out = mouse.release(48.0).map(|i| g.handle(i)).unwrap_or_default();
        assert_eq!(commits(&out), vec![DeityPlacement::new("ganesh", 540.0, 30.0, 3.0)]);
        assert!(mouse.release(64.0).is_none());
        assert!(mouse.moved(80.0, 0.0, 0.0).is_none());
    }

    #[test]
    fn each_pan_starts_from_last_commit() {
        let mut g = interp(0.0, 0.0, 3.0);
        touches(&mut g, 0.0, &[(1, 0.0, 0.0)]);
        touches(&mut g, 10.0, &[(1, 50.0, 0.0)]);
        touches(&mut g, 20.0, &[]);
        touches(&mut g, 30.0, &[(2, 300.0, 300.0)]);
        touches(&mut g, 40.0, &[(2, 300.0, 320.0)]);
        let out = touches(&mut g, 50.0, &[]);
        assert_eq!(commits(&out), vec![DeityPlacement::new("ganesh", 50.0, 20.0, 3.0)]);
    }

    #[test]
    fn pinch_scales_by_ratio_and_commits_on_release() {
        let mut g = interp(0.0, 0.0, 3.0);
        touches(&mut g, 0.0, &[(1, 0.0, 0.0)]);
        touches(&mut g, 5.0, &[(1, 0.0, 0.0), (2, 100.0, 0.0)]);
        assert!(g.is_pinching());
        touches(&mut g, 10.0, &[(1, 0.0, 0.0), (2, 150.0, 0.0)]);
        assert_eq!(g.current().scale, 4.5);
        let out = touches(&mut g, 20.0, &[(1, 0.0, 0.0)]);
        assert_eq!(commits(&out), vec![DeityPlacement::new("ganesh", 0.0, 0.0, 4.5)]);
        assert!(!g.is_pinching());
    }

    #[test]
    fn pinch_is_clamped_and_survives_zero_start_distance() {
        let mut g = interp(0.0, 0.0, 3.0);
        touches(&mut g, 0.0, &[(1, 10.0, 10.0), (2, 10.0, 10.0)]);
        touches(&mut g, 5.0, &[(1, 0.0, 0.0), (2, 500.0, 0.0)]);
        assert_eq!(g.current().scale, 3.0);

        let mut g = interp(0.0, 0.0, 3.0);
        touches(&mut g, 0.0, &[(1, 0.0, 0.0), (2, 100.0, 0.0)]);
        touches(&mut g, 5.0, &[(1, 0.0, 0.0), (2, 1.0, 0.0)]);
        assert_eq!(g.current().scale, 0.5);
        touches(&mut g, 10.0, &[(1, 0.0, 0.0), (2, 1000.0, 0.0)]);
        assert_eq!(g.current().scale, 5.0);
    }

    #[test]
    fn simultaneous_pan_and_pinch_commit_independently() {
        let mut g = interp(0.0, 0.0, 2.0);
        touches(&mut g, 0.0, &[(1, 0.0, 0.0)]);
        touches(&mut g, 5.0, &[(1, 20.0, 0.0)]);
        touches(&mut g, 10.0, &[(1, 20.0, 0.0), (2, 120.0, 0.0)]);
        touches(&mut g, 15.0, &[(1, 30.0, 0.0), (2, 230.0, 0.0)]);
        assert!(g.is_panning() && g.is_pinching());
        assert_eq!(g.current(), Transform { x: 30.0, y: 0.0, scale: 4.0 });

        // second finger up: pinch commits scale with the committed position
        let out = touches(&mut g, 20.0, &[(1, 30.0, 0.0)]);
        assert_eq!(commits(&out), vec![DeityPlacement::new("ganesh", 0.0, 0.0, 4.0)]);
        assert!(g.is_panning());

        let out = touches(&mut g, 25.0, &[]);
        assert_eq!(commits(&out), vec![DeityPlacement::new("ganesh", 30.0, 0.0, 4.0)]);
    }

    #[test]
    fn long_press_fires_once_with_committed_scale() {
        let mut g = interp(0.0, 0.0, 3.0);
        touches(&mut g, 0.0, &[(1, 0.0, 0.0)]);
        assert!(g.is_long_press_armed());
        assert!(g.handle(GestureInput::Tick { at_ms: 2999.0 }).is_empty());
        let out = g.handle(GestureInput::Tick { at_ms: 3000.0 });
        assert_eq!(
            out,
            vec![GestureOutput::LongPress {
                key: "ganesh".into(),
                scale: 3.0
            }]
        );
        assert!(g.handle(GestureInput::Tick { at_ms: 4000.0 }).is_empty());
        let out = touches(&mut g, 4100.0, &[]);
        assert!(commits(&out).is_empty());
    }

    #[test]
    fn long_press_does_not_disturb_active_pan() {
        let mut g = interp(0.0, 0.0, 3.0);
        touches(&mut g, 0.0, &[(1, 0.0, 0.0)]);
        touches(&mut g, 100.0, &[(1, 40.0, 0.0)]);
        let out = touches(&mut g, 3100.0, &[(1, 45.0, 0.0)]);
        assert!(out.iter().any(|o| matches!(o, GestureOutput::LongPress { .. })));
        assert!(g.is_panning());
        let out = touches(&mut g, 3200.0, &[]);
        assert_eq!(commits(&out), vec![DeityPlacement::new("ganesh", 45.0, 0.0, 3.0)]);
    }

    #[test]
    fn release_before_threshold_disarms_long_press() {
        let mut g = interp(0.0, 0.0, 3.0);
        touches(&mut g, 0.0, &[(1, 0.0, 0.0)]);
        touches(&mut g, 1000.0, &[]);
        assert!(g.handle(GestureInput::Tick { at_ms: 5000.0 }).is_empty());
    }

    #[test]
    fn pinch_after_menu_change_starts_from_new_scale() {
        let mut g = interp(0.0, 0.0, 3.0);
        g.sync_committed(&DeityPlacement::new("ganesh", 0.0, 0.0, 2.4));
        touches(&mut g, 0.0, &[(1, 0.0, 0.0), (2, 100.0, 0.0)]);
        touches(&mut g, 5.0, &[(1, 0.0, 0.0), (2, 200.0, 0.0)]);
        assert_eq!(g.current().scale, 4.8);
    }

    #[test]
    fn cancel_discards_live_values() {
        let mut g = interp(0.0, 0.0, 3.0);
        touches(&mut g, 0.0, &[(1, 0.0, 0.0)]);
        touches(&mut g, 5.0, &[(1, 90.0, 0.0)]);
        let out = g.handle(GestureInput::Cancel);
        assert_eq!(out, vec![GestureOutput::Live(Transform { x: 0.0, y: 0.0, scale: 3.0 })]);
        assert!(g.is_idle());
        assert!(commits(&touches(&mut g, 10.0, &[])).is_empty());
    }
}
