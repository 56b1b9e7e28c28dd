//! Drag-to-rotate interaction with inertial coasting and tap selection.
//!
//! The controller is driven by three pointer callbacks plus a per-frame tick. It never
//! schedules frames itself; it asks a [`FrameScheduler`] for the next tick and the host
//! calls [`RotationController::tick`] with the ticket it was handed. Every new gesture
//! bumps a generation counter, so ticks queued by an earlier coast are ignored.

use crate::error::{self, ParamError};
use crate::geometry::{Point, shortest_delta};
use crate::layout::{ItemId, Layout};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;
use strum::{Display as StrumDisplay, IntoStaticStr};

const RELEASE_WINDOW_FRAMES: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationParams {
    /// Velocity multiplier applied on every coasting frame.
    pub friction: f64,
    /// Pointer travel (px) beyond which a gesture is a drag, not a tap.
    pub tap_max_distance: f64,
    pub tap_max_duration_ms: u64,
    /// Coasting stops once |velocity| (rad/frame) drops to this.
    pub velocity_epsilon: f64,
    pub frame_interval_ms: f64,
    /// Rotation applied before any gesture.
    pub initial_offset: f64,
}

impl Default for RotationParams {
    fn default() -> Self {
        Self {
            friction: 0.95,
            tap_max_distance: 10.0,
            tap_max_duration_ms: 300,
            velocity_epsilon: 1e-3,
            frame_interval_ms: 16.0,
            initial_offset: 0.0,
        }
    }
}

impl RotationParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        if !(self.friction > 0.0 && self.friction < 1.0) {
            return Err(ParamError::Friction(self.friction));
        }
        error::non_negative("tap_max_distance", self.tap_max_distance)?;
        error::positive("velocity_epsilon", self.velocity_epsilon)?;
        error::positive("frame_interval_ms", self.frame_interval_ms)
    }

    fn tap_max_duration(&self) -> Duration {
        Duration::from_millis(self.tap_max_duration_ms)
    }

    /// How long the pointer may rest after its last move and still fling the wheel.
    fn release_window(&self) -> Duration {
        Duration::from_secs_f64(RELEASE_WINDOW_FRAMES * self.frame_interval_ms / 1000.0)
    }
}

/// Measured placement of the wheel in widget coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelFrame {
    pub center: Point,
    pub radius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotationState {
    pub offset_angle: f64,
    /// Radians per frame; non-zero only while coasting.
    pub velocity: f64,
    pub is_dragging: bool,
}

/// Handed to the scheduler when a frame is wanted; passed back to `tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoastTicket {
    generation: u64,
}

pub trait FrameScheduler {
    /// Arrange for `tick(ticket)` to be called on the next animation frame.
    fn request_tick(&mut self, ticket: CoastTicket);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    Idle,
    Dragging,
    Coasting,
}

/// What a finished gesture amounted to.
#[derive(Debug, Clone, PartialEq)]
pub enum Release {
    /// A quick, short press. Holds the segment under the press, if any.
    Tap(Option<ItemId>),
    Coast,
    Settle,
    /// No gesture was in progress, or the wheel was never measured.
    Ignored,
}

#[derive(Debug, Clone, Copy)]
struct Gesture {
    start_pos: Point,
    start_time: Duration,
    start_angle: f64,
    offset_at_start: f64,
    last_pos: Point,
    last_time: Duration,
    last_angle: f64,
    dragged: bool,
}

pub struct RotationController<S> {
    params: RotationParams,
    state: RotationState,
    phase: Phase,
    frame: Option<WheelFrame>,
    gesture: Option<Gesture>,
    generation: u64,
    scheduler: S,
}

impl<S: FrameScheduler> RotationController<S> {
    pub fn new(params: RotationParams, scheduler: S) -> Self {
        Self {
            params,
            state: RotationState {
                offset_angle: params.initial_offset,
                ..RotationState::default()
            },
            phase: Phase::Idle,
            frame: None,
            gesture: None,
            generation: 0,
            scheduler,
        }
    }

    pub fn state(&self) -> RotationState {
        self.state
    }

    pub fn offset(&self) -> f64 {
        self.state.offset_angle
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn params(&self) -> RotationParams {
        self.params
    }

    /// Replaces the tuning. A changed `initial_offset` shifts the current rotation by the
    /// difference, so a new start edge shows up without a restart.
    pub fn set_params(&mut self, params: RotationParams) {
        self.state.offset_angle += params.initial_offset - self.params.initial_offset;
        self.params = params;
    }

    pub fn frame(&self) -> Option<WheelFrame> {
        self.frame
    }

    pub fn set_frame(&mut self, frame: Option<WheelFrame>) {
        self.frame = frame;
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Angle of `pos` around the wheel centre, or `None` while unmeasured.
    fn pointer_angle(&self, pos: Point) -> Option<f64> {
        self.frame
            .filter(|f| f.radius > 0.0)
            .map(|f| pos.angle_from(f.center))
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            log::debug!("rotation {} -> {}", self.phase, phase);
            self.phase = phase;
        }
        self.state.is_dragging = phase == Phase::Dragging;
    }

    /// Cancels any coasting and leaves the offset where it is.
    pub fn stop(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.gesture = None;
        self.state.velocity = 0.0;
        self.set_phase(Phase::Idle);
    }

    pub fn pointer_down(&mut self, pos: Point, time: Duration) {
        let Some(angle) = self.pointer_angle(pos) else {
            log::debug!("pointer down before the wheel was measured");
            return;
        };

        self.stop();
        self.gesture = Some(Gesture {
            start_pos: pos,
            start_time: time,
            start_angle: angle,
            offset_at_start: self.state.offset_angle,
            last_pos: pos,
            last_time: time,
            last_angle: angle,
            dragged: false,
        });
        self.set_phase(Phase::Dragging);
    }

    pub fn pointer_move(&mut self, pos: Point, time: Duration) {
        let Some(angle) = self.pointer_angle(pos) else {
            return;
        };
        let Some(gesture) = self.gesture.as_mut() else {
            return;
        };

        let delta = shortest_delta(gesture.last_angle, angle);
        let elapsed_ms = time.saturating_sub(gesture.last_time).as_secs_f64() * 1000.0;
        // sub-frame bursts count as one frame
        let frames = (elapsed_ms / self.params.frame_interval_ms).max(1.0);

        self.state.offset_angle += delta;
        self.state.velocity = delta / frames;

        if pos.distance_to(gesture.start_pos) > self.params.tap_max_distance {
            gesture.dragged = true;
        }
        gesture.last_pos = pos;
        gesture.last_time = time;
        gesture.last_angle = angle;
    }

    /// Ends the gesture. Taps are resolved against `layout` in its unrotated frame.
    pub fn pointer_up(&mut self, pos: Point, time: Duration, layout: &Layout) -> Release {
        if self.phase != Phase::Dragging {
            return Release::Ignored;
        }
        let Some(gesture) = self.gesture.take() else {
            return Release::Ignored;
        };

        let dragged =
            gesture.dragged || pos.distance_to(gesture.start_pos) > self.params.tap_max_distance;
        let elapsed = time.saturating_sub(gesture.start_time);

        if !dragged && elapsed < self.params.tap_max_duration() {
            self.state.offset_angle = gesture.offset_at_start;
            self.state.velocity = 0.0;
            self.set_phase(Phase::Idle);

            let hit = layout
                .hit_test(gesture.start_angle - gesture.offset_at_start)
                .map(|segment| segment.item_id.clone());
            log::debug!("tap resolved to {:?}", hit);
            return Release::Tap(hit);
        }

        if time.saturating_sub(gesture.last_time) > self.params.release_window() {
            log::debug!("pointer rested before release, dropping velocity");
            self.state.velocity = 0.0;
        }

        if self.state.velocity.abs() > self.params.velocity_epsilon {
            self.set_phase(Phase::Coasting);
            self.scheduler.request_tick(CoastTicket {
                generation: self.generation,
            });
            Release::Coast
        } else {
            self.state.velocity = 0.0;
            self.set_phase(Phase::Idle);
            Release::Settle
        }
    }

    /// Treated like a release at the last tracked position.
    pub fn pointer_cancel(&mut self, time: Duration, layout: &Layout) -> Release {
        match self.gesture.map(|g| g.last_pos) {
            Some(pos) => self.pointer_up(pos, time, layout),
            None => Release::Ignored,
        }
    }

    /// Advances one coasting frame. Returns whether another frame was requested.
    pub fn tick(&mut self, ticket: CoastTicket) -> bool {
        if ticket.generation != self.generation || self.phase != Phase::Coasting {
            log::trace!("dropping stale coast tick");
            return false;
        }

        self.state.offset_angle += self.state.velocity;
        self.state.velocity *= self.params.friction;

        if self.state.velocity.abs() > self.params.velocity_epsilon {
            self.scheduler.request_tick(ticket);
            true
        } else {
            self.state.velocity = 0.0;
            self.set_phase(Phase::Idle);
            false
        }
    }
}

/// Scheduler that only queues tickets; the owner drains them.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    pending: VecDeque<CoastTicket>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn pop(&mut self) -> Option<CoastTicket> {
        self.pending.pop_front()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_tick(&mut self, ticket: CoastTicket) {
        self.pending.push_back(ticket);
    }
}

impl RotationController<ManualScheduler> {
    /// Runs queued frames until none are pending or `max_frames` have run.
    pub fn run_frames(&mut self, max_frames: usize) -> usize {
        let mut ran = 0;
        while ran < max_frames {
            let Some(ticket) = self.scheduler.pop() else {
                break;
            };
            self.tick(ticket);
            ran += 1;
        }
        ran
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::polar_to_cartesian;
    use crate::label::Label;
    use crate::layout::{AllocationItem, LayoutParams};
    use approx::assert_abs_diff_eq;

    const CENTER: Point = Point { x: 100.0, y: 100.0 };

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn at(angle: f64) -> Point {
        polar_to_cartesian(CENTER, 80.0, angle)
    }

    fn controller() -> RotationController<ManualScheduler> {
        let mut c = RotationController::new(RotationParams::default(), ManualScheduler::new());
        c.set_frame(Some(WheelFrame {
            center: CENTER,
            radius: 100.0,
        }));
        c
    }

    fn layout() -> Layout {
        let items = vec![
            AllocationItem::new("a", 100.0, Label::new("A")),
            AllocationItem::new("b", 0.0, Label::new("B")),
            AllocationItem::new("c", 50.0, Label::new("C")),
        ];
        Layout::compute(&items, LayoutParams::default())
    }

    fn drag(c: &mut RotationController<ManualScheduler>, from: f64, to: f64, steps: u32) {
        c.pointer_down(at(from), ms(0));
        for i in 1..=steps {
            let angle = from + (to - from) * f64::from(i) / f64::from(steps);
            c.pointer_move(at(angle), ms(u64::from(i) * 16));
        }
    }

    #[test]
    fn test_tap_selects_segment_once() {
        let layout = layout();
        let mut c = controller();
        let target = &layout.segments()[2];

        c.pointer_down(at(target.center_angle), ms(1000));
        let release = c.pointer_up(at(target.center_angle), ms(1100), &layout);

        assert_eq!(release, Release::Tap(Some(target.item_id.clone())));
        assert_eq!(c.phase(), Phase::Idle);
        assert_eq!(c.scheduler().pending(), 0);
        assert_eq!(c.pointer_up(at(0.0), ms(1150), &layout), Release::Ignored);
    }

    #[test]
    fn test_tap_respects_current_rotation() {
        let layout = layout();
        let params = RotationParams {
            initial_offset: 1.25,
            ..RotationParams::default()
        };
        let mut c = RotationController::new(params, ManualScheduler::new());
        c.set_frame(Some(WheelFrame {
            center: CENTER,
            radius: 100.0,
        }));
        let target = layout.segments()[1].rotated(c.offset());

        c.pointer_down(at(target.center_angle), ms(0));
        let release = c.pointer_up(at(target.center_angle), ms(50), &layout);
        assert_eq!(release, Release::Tap(Some(target.item_id)));
    }

    #[test]
    fn test_tap_jitter_leaves_rotation_unchanged() {
        let layout = layout();
        let mut c = controller();
        let angle = layout.segments()[0].center_angle;
        let start = at(angle);

        c.pointer_down(start, ms(0));
        c.pointer_move(Point::new(start.x + 3.0, start.y + 4.0), ms(40));
        let release = c.pointer_up(Point::new(start.x + 3.0, start.y + 4.0), ms(80), &layout);

        assert!(matches!(release, Release::Tap(Some(_))));
        assert_eq!(c.offset(), 0.0);
        assert_eq!(c.state().velocity, 0.0);
    }

    #[test]
    fn test_tap_in_gap_selects_nothing() {
        let layout = layout();
        let mut c = controller();
        let gap_angle = layout.segments()[0].end_angle + 0.2;

        c.pointer_down(at(gap_angle), ms(0));
        assert_eq!(c.pointer_up(at(gap_angle), ms(10), &layout), Release::Tap(None));
    }

    #[test]
    fn test_long_press_is_not_a_tap() {
        let layout = layout();
        let mut c = controller();

        c.pointer_down(at(0.5), ms(0));
        assert_eq!(c.pointer_up(at(0.5), ms(400), &layout), Release::Settle);
    }

    #[test]
    fn test_drag_never_selects() {
        let layout = layout();
        for duration in [20, 100, 299, 1000] {
            let mut c = controller();
            c.pointer_down(at(0.5), ms(0));
            let release = c.pointer_up(at(1.0), ms(duration), &layout);
            assert!(
                !matches!(release, Release::Tap(_)),
                "{duration} ms drag selected"
            );
        }
    }

    #[test]
    fn test_drag_accumulates_offset() {
        let mut c = controller();
        drag(&mut c, 0.0, 0.6, 6);

        assert!(c.state().is_dragging);
        assert_abs_diff_eq!(c.offset(), 0.6, epsilon = 1e-9);
        assert_abs_diff_eq!(c.state().velocity, 0.1, epsilon = 1e-9);
    }

    #[test]
    fn test_drag_across_wraparound_takes_short_way() {
        let mut c = controller();
        let pi = std::f64::consts::PI;
        c.pointer_down(at(pi - 0.05), ms(0));
        c.pointer_move(at(-pi + 0.05), ms(16));

        assert_abs_diff_eq!(c.offset(), 0.1, epsilon = 1e-9);
    }

    #[test]
    fn test_bursty_moves_do_not_inflate_velocity() {
        let layout = layout();
        let mut c = controller();
        c.pointer_down(at(0.0), ms(0));
        c.pointer_move(at(0.3), ms(16));
        c.pointer_move(at(0.31), ms(16) + Duration::from_micros(20));

        assert_abs_diff_eq!(c.state().velocity, 0.01, epsilon = 1e-9);
        assert_eq!(c.pointer_up(at(0.31), ms(20), &layout), Release::Coast);

        let frames = c.run_frames(1000);
        assert!(frames <= 46, "coasted for {frames} frames");
        assert!(c.offset() < 0.31 + 0.2);
    }

    #[test]
    fn test_rest_before_release_settles() {
        let layout = layout();
        let mut c = controller();
        drag(&mut c, 0.0, 0.6, 6);

        assert_eq!(c.pointer_up(at(0.6), ms(96 + 3000), &layout), Release::Settle);
        assert_eq!(c.phase(), Phase::Idle);
        assert_eq!(c.state().velocity, 0.0);
        assert_eq!(c.scheduler().pending(), 0);
        assert_abs_diff_eq!(c.offset(), 0.6, epsilon = 1e-9);
    }

    #[test]
    fn test_set_params_applies_initial_offset_change() {
        let mut c = controller();
        drag(&mut c, 0.0, 0.6, 6);
        c.stop();

        c.set_params(RotationParams {
            initial_offset: std::f64::consts::FRAC_PI_2,
            ..RotationParams::default()
        });
        assert_abs_diff_eq!(c.offset(), 0.6 + std::f64::consts::FRAC_PI_2, epsilon = 1e-9);

        c.set_params(RotationParams {
            friction: 0.9,
            initial_offset: std::f64::consts::FRAC_PI_2,
            ..RotationParams::default()
        });
        assert_abs_diff_eq!(c.offset(), 0.6 + std::f64::consts::FRAC_PI_2, epsilon = 1e-9);
    }

    #[test]
    fn test_release_with_velocity_coasts_then_settles() {
        let layout = layout();
        let mut c = controller();
        drag(&mut c, 0.0, 0.6, 6);

        assert_eq!(c.pointer_up(at(0.6), ms(100), &layout), Release::Coast);
        assert_eq!(c.phase(), Phase::Coasting);
        assert_eq!(c.scheduler().pending(), 1);

        let frames = c.run_frames(1000);
        // 0.1 * 0.95^n <= 1e-3 needs n <= 90
        assert!(frames <= 91, "coasted for {frames} frames");
        assert_eq!(c.phase(), Phase::Idle);
        assert_eq!(c.state().velocity, 0.0);
        assert!(c.offset() > 0.6);
        assert_eq!(c.scheduler().pending(), 0);
    }

    #[test]
    fn test_momentum_decays_in_bounded_frames() {
        let params = RotationParams::default();
        for v0 in [0.01_f64, 0.5, 5.0, -3.0] {
            let mut v = v0;
            let mut frames = 0;
            while v.abs() > params.velocity_epsilon {
                v *= params.friction;
                frames += 1;
                assert!(frames < 10_000);
            }
            let bound = ((params.velocity_epsilon / v0.abs()).ln() / params.friction.ln()).ceil();
            assert!(f64::from(frames) <= bound.max(0.0) + 1.0);
        }
    }

    #[test]
    fn test_new_gesture_cancels_coasting() {
        let layout = layout();
        let mut c = controller();
        drag(&mut c, 0.0, 0.6, 6);
        c.pointer_up(at(0.6), ms(100), &layout);
        let stale = c.scheduler_mut().pop().expect("coast requested");

        c.pointer_down(at(2.0), ms(200));
        let before = c.offset();

        assert!(!c.tick(stale));
        assert_eq!(c.offset(), before);
        assert_eq!(c.phase(), Phase::Dragging);
        assert_eq!(c.state().velocity, 0.0);
    }

    #[test]
    fn test_unmeasured_wheel_ignores_gestures() {
        let layout = layout();
        let mut c = RotationController::new(RotationParams::default(), ManualScheduler::new());

        c.pointer_down(at(0.5), ms(0));
        c.pointer_move(at(1.5), ms(16));
        assert_eq!(c.pointer_up(at(1.5), ms(32), &layout), Release::Ignored);
        assert_eq!(c.offset(), 0.0);

        c.set_frame(Some(WheelFrame {
            center: CENTER,
            radius: 0.0,
        }));
        c.pointer_down(at(0.5), ms(0));
        assert_eq!(c.phase(), Phase::Idle);
    }

    #[test]
    fn test_cancel_uses_last_position() {
        let layout = layout();
        let mut c = controller();
        let angle = layout.segments()[0].center_angle;

        c.pointer_down(at(angle), ms(0));
        assert!(matches!(c.pointer_cancel(ms(30), &layout), Release::Tap(Some(_))));
        assert_eq!(c.pointer_cancel(ms(40), &layout), Release::Ignored);
    }

    #[test]
    fn test_validate_rejects_bad_friction() {
        let params = RotationParams {
            friction: 1.0,
            ..RotationParams::default()
        };
        assert_eq!(params.validate(), Err(ParamError::Friction(1.0)));
        assert!(RotationParams::default().validate().is_ok());
    }
}
