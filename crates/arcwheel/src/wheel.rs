use crate::geometry::Point;
use crate::layout::{AllocationItem, Layout, LayoutParams};
use crate::rotation::{
    CoastTicket, FrameScheduler, Release, RotationController, RotationParams, WheelFrame,
};
use crate::scene::{Scene, WheelSizing};
use std::time::Duration;

/// Host-facing pointer callbacks. Any toolkit's press/motion/release events map onto these.
///
/// `time` is a monotonic timestamp from an arbitrary epoch; only differences are used.
pub trait PointerTracker {
    fn on_start(&mut self, pos: Point, time: Duration);
    fn on_move(&mut self, pos: Point, time: Duration);
    fn on_end(&mut self, pos: Point, time: Duration) -> Release;
}

/// A laid-out, rotatable wheel: items, their arc layout, and the rotation controller.
pub struct Wheel<S> {
    items: Vec<AllocationItem>,
    layout: Layout,
    sizing: WheelSizing,
    allocation: Option<(f64, f64)>,
    controller: RotationController<S>,
}

impl<S: FrameScheduler> Wheel<S> {
    pub fn new(
        items: Vec<AllocationItem>,
        layout_params: LayoutParams,
        rotation_params: RotationParams,
        sizing: WheelSizing,
        scheduler: S,
    ) -> Self {
        let layout = Layout::compute(&items, layout_params);
        Self {
            items,
            layout,
            sizing,
            allocation: None,
            controller: RotationController::new(rotation_params, scheduler),
        }
    }

    pub fn items(&self) -> &[AllocationItem] {
        &self.items
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn sizing(&self) -> WheelSizing {
        self.sizing
    }

    pub fn controller(&self) -> &RotationController<S> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut RotationController<S> {
        &mut self.controller
    }

    /// Replaces the items and recomputes the layout. The rotation offset is kept.
    pub fn set_items(&mut self, items: Vec<AllocationItem>) {
        self.items = items;
        self.layout = Layout::compute(&self.items, self.layout.params());
    }

    pub fn set_layout_params(&mut self, params: LayoutParams) {
        self.layout = Layout::compute(&self.items, params);
    }

    pub fn set_rotation_params(&mut self, params: RotationParams) {
        self.controller.set_params(params);
    }

    pub fn set_sizing(&mut self, sizing: WheelSizing) {
        self.sizing = sizing;
        if let Some((width, height)) = self.allocation {
            self.measure(width, height);
        }
    }

    /// Records the widget's allocated size. The wheel is centred in it.
    pub fn measure(&mut self, width: f64, height: f64) {
        if width <= 0.0 || height <= 0.0 {
            self.allocation = None;
            self.controller.set_frame(None);
            return;
        }
        self.allocation = Some((width, height));
        self.controller.set_frame(Some(WheelFrame {
            center: Point::new(width / 2.0, height / 2.0),
            radius: self.sizing.radius(),
        }));
    }

    pub fn center(&self) -> Point {
        self.controller
            .frame()
            .map(|f| f.center)
            .unwrap_or_else(|| self.sizing.center())
    }

    pub fn scene(&self) -> Scene {
        Scene::compose(
            &self.layout,
            self.controller.offset(),
            &self.sizing,
            self.center(),
        )
    }

    pub fn tick(&mut self, ticket: CoastTicket) -> bool {
        self.controller.tick(ticket)
    }

    pub fn cancel(&mut self, time: Duration) -> Release {
        self.controller.pointer_cancel(time, &self.layout)
    }
}

impl<S: FrameScheduler> PointerTracker for Wheel<S> {
    fn on_start(&mut self, pos: Point, time: Duration) {
        self.controller.pointer_down(pos, time);
    }

    fn on_move(&mut self, pos: Point, time: Duration) {
        self.controller.pointer_move(pos, time);
    }

    fn on_end(&mut self, pos: Point, time: Duration) -> Release {
        self.controller.pointer_up(pos, time, &self.layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::initials;
    use crate::layout::ItemId;
    use crate::rotation::{ManualScheduler, Phase};

    fn wheel() -> Wheel<ManualScheduler> {
        let items = vec![
            AllocationItem::new("a", 700.0, initials("Alpha Court")),
            AllocationItem::new("b", 300.0, initials("Beta")),
        ];
        Wheel::new(
            items,
            LayoutParams::default(),
            RotationParams::default(),
            WheelSizing::default(),
            ManualScheduler::new(),
        )
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_tap_on_knob_selects_item() {
        let mut wheel = wheel();
        wheel.measure(400.0, 300.0);

        let knob = wheel.scene().sprites[1].knob;
        wheel.on_start(knob, ms(5));
        assert_eq!(wheel.on_end(knob, ms(60)), Release::Tap(Some(ItemId::new("b"))));
    }

    #[test]
    fn test_unmeasured_wheel_is_inert() {
        let mut wheel = wheel();
        let knob = wheel.scene().sprites[0].knob;

        wheel.on_start(knob, ms(0));
        assert_eq!(wheel.on_end(knob, ms(10)), Release::Ignored);

        wheel.measure(0.0, 100.0);
        wheel.on_start(knob, ms(20));
        assert_eq!(wheel.controller().phase(), Phase::Idle);
    }

    #[test]
    fn test_drag_rotates_scene_then_coasts() {
        let mut wheel = wheel();
        wheel.measure(280.0, 280.0);
        let before = wheel.scene().sprites[0].start_angle;
        let c = wheel.center();

        wheel.on_start(Point::new(c.x + 100.0, c.y), ms(0));
        wheel.on_move(Point::new(c.x + 100.0, c.y + 20.0), ms(16));
        wheel.on_move(Point::new(c.x + 100.0, c.y + 40.0), ms(32));
        assert_eq!(wheel.on_end(Point::new(c.x + 100.0, c.y + 40.0), ms(40)), Release::Coast);

        let turned = 0.4_f64.atan();
        let after = wheel.scene().sprites[0].start_angle;
        assert!((after - before - turned).abs() < 1e-9);

        while let Some(ticket) = wheel.controller_mut().scheduler_mut().pop() {
            wheel.tick(ticket);
        }
        assert_eq!(wheel.controller().phase(), Phase::Idle);
        assert!(wheel.scene().sprites[0].start_angle > after);
    }

    #[test]
    fn test_set_items_replaces_layout_and_keeps_offset() {
        let mut wheel = wheel();
        let offset = wheel.controller().offset();

        wheel.set_items(vec![AllocationItem::new("z", 1.0, initials("Zeta"))]);
        assert_eq!(wheel.layout().len(), 1);
        assert_eq!(wheel.layout().segments()[0].item_id, ItemId::new("z"));
        assert_eq!(wheel.controller().offset(), offset);
    }
}
