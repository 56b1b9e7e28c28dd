use crate::error::{self, ParamError};
use crate::geometry::{ArcPath, Point, describe_arc, polar_to_cartesian};
use crate::label::Label;
use crate::layout::{ItemId, Layout};
use serde::{Deserialize, Serialize};

/// Caller-facing size knobs for the wheel, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelSizing {
    pub size: f64,
    pub ring_width: f64,
    pub knob_size: f64,
    pub inset: f64,
}

impl Default for WheelSizing {
    fn default() -> Self {
        Self {
            size: 280.0,
            ring_width: 18.0,
            knob_size: 36.0,
            inset: 24.0,
        }
    }
}

impl WheelSizing {
    /// Radius of the ring's centre line.
    pub fn radius(&self) -> f64 {
        (self.size / 2.0 - self.inset).max(0.0)
    }

    pub fn center(&self) -> Point {
        Point::new(self.size / 2.0, self.size / 2.0)
    }

    pub fn validate(&self) -> Result<(), ParamError> {
        error::positive("size", self.size)?;
        error::non_negative("ring_width", self.ring_width)?;
        error::non_negative("knob_size", self.knob_size)?;
        error::non_negative("inset", self.inset)
    }
}

/// One segment in screen space, already rotated.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentSprite {
    pub item_id: ItemId,
    pub label: Label,
    pub start_angle: f64,
    pub end_angle: f64,
    pub path: ArcPath,
    pub knob: Point,
    pub knob_radius: f64,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    pub center: Point,
    pub radius: f64,
    pub ring_width: f64,
    pub sprites: Vec<SegmentSprite>,
}

impl Scene {
    /// Places every segment of `layout`, rotated by `offset`, on a ring around `center`.
    pub fn compose(layout: &Layout, offset: f64, sizing: &WheelSizing, center: Point) -> Self {
        let radius = sizing.radius();
        let sprites = if radius > 0.0 {
            layout
                .iter()
                .map(|segment| {
                    let s = segment.rotated(offset);
                    SegmentSprite {
                        path: describe_arc(center, radius, s.start_angle, s.end_angle),
                        knob: polar_to_cartesian(center, radius, s.center_angle),
                        knob_radius: sizing.knob_size / 2.0,
                        item_id: s.item_id,
                        label: s.label,
                        start_angle: s.start_angle,
                        end_angle: s.end_angle,
                        percent: s.percent,
                    }
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            center,
            radius,
            ring_width: sizing.ring_width,
            sprites,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}
