//! Proportional arc layout with a minimum visible size per arc.

use crate::error::{self, ParamError};
use crate::geometry::{FULL_CIRCLE, normalize_angle};
use crate::label::Label;
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ItemId(String);

crate::impl_string_newtype!(ItemId);

/// One weighted entry to place on the wheel.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationItem {
    pub id: ItemId,
    pub value: f64,
    pub label: Label,
}

impl AllocationItem {
    pub fn new(id: impl Into<String>, value: f64, label: Label) -> Self {
        Self {
            id: ItemId::new(id),
            value,
            label,
        }
    }

    /// Weight used for sizing. Negative and non-finite values count as zero.
    fn weight(&self) -> f64 {
        if self.value.is_finite() {
            self.value.max(0.0)
        } else {
            0.0
        }
    }
}

/// The arc an item occupies in the unrotated frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcSegment {
    pub item_id: ItemId,
    pub label: Label,
    pub start_angle: f64,
    pub end_angle: f64,
    pub arc_angle: f64,
    pub center_angle: f64,
    pub percent: f64,
}

impl ArcSegment {
    fn new(item: &AllocationItem, start_angle: f64, arc_angle: f64) -> Self {
        Self {
            item_id: item.id.clone(),
            label: item.label.clone(),
            start_angle,
            end_angle: start_angle + arc_angle,
            arc_angle,
            center_angle: start_angle + arc_angle / 2.0,
            percent: arc_angle / FULL_CIRCLE * 100.0,
        }
    }

    /// The same segment with every angle advanced by `offset`.
    pub fn rotated(&self, offset: f64) -> Self {
        Self {
            start_angle: self.start_angle + offset,
            end_angle: self.end_angle + offset,
            center_angle: self.center_angle + offset,
            ..self.clone()
        }
    }

    /// Whether `angle` falls inside this segment, with wraparound past 0.
    pub fn contains(&self, angle: f64) -> bool {
        if self.arc_angle >= FULL_CIRCLE {
            return true;
        }
        let angle = normalize_angle(angle);
        let start = normalize_angle(self.start_angle);
        let end = normalize_angle(self.end_angle);

        if end < start {
            angle >= start || angle <= end
        } else {
            angle >= start && angle <= end
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    /// Angular spacing between consecutive segments.
    pub gap: f64,
    /// Smallest arc any segment is given.
    pub min_arc: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            gap: 0.4,
            min_arc: 0.1,
        }
    }
}

impl LayoutParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        error::non_negative("gap", self.gap)?;
        error::non_negative("min_arc", self.min_arc)
    }

    /// True when `count` segments cannot all get `min_arc` plus a gap. Segments overlap then.
    pub fn overflows(&self, count: usize) -> bool {
        count as f64 * (self.min_arc + self.gap) > FULL_CIRCLE
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Layout {
    segments: Vec<ArcSegment>,
    params: LayoutParams,
}

impl Layout {
    pub fn empty(params: LayoutParams) -> Self {
        Self {
            segments: Vec::new(),
            params,
        }
    }

    /// Lays `items` out clockwise from angle 0, in input order.
    ///
    /// Each item receives a share of the circle (minus one gap per item) proportional to its
    /// value. Shares below `min_arc` are raised to it and the shortfall is taken from the
    /// larger shares in proportion to their headroom above `min_arc`. When every value is
    /// zero the shares are equal.
    pub fn compute(items: &[AllocationItem], params: LayoutParams) -> Self {
        if items.is_empty() {
            return Self::empty(params);
        }

        let count = items.len();
        if params.overflows(count) {
            log::warn!(
                "{} segments with gap {} and min arc {} exceed the circle; segments will overlap",
                count,
                params.gap,
                params.min_arc
            );
        }

        let budget = FULL_CIRCLE - count as f64 * params.gap;
        let weights: Vec<f64> = items.iter().map(AllocationItem::weight).collect();
        let total: f64 = weights.iter().sum();

        let mut arcs: Vec<f64> = if total > 0.0 {
            weights.iter().map(|w| w / total * budget).collect()
        } else {
            vec![budget / count as f64; count]
        };
        enforce_minimum(&mut arcs, params.min_arc);

        let mut cursor = 0.0;
        let segments = items
            .iter()
            .zip(arcs)
            .map(|(item, arc)| {
                let segment = ArcSegment::new(item, cursor, arc);
                cursor = segment.end_angle + params.gap;
                segment
            })
            .collect();

        log::debug!("laid out {} segments", count);
        Self { segments, params }
    }

    pub fn segments(&self) -> &[ArcSegment] {
        &self.segments
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArcSegment> {
        self.segments.iter()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn params(&self) -> LayoutParams {
        self.params
    }

    pub fn overflows(&self) -> bool {
        self.params.overflows(self.segments.len())
    }

    /// The segment covering `angle` in the unrotated frame.
    pub fn hit_test(&self, angle: f64) -> Option<&ArcSegment> {
        self.segments.iter().find(|s| s.contains(angle))
    }
}

fn enforce_minimum(arcs: &mut [f64], min_arc: f64) {
    let mut deficit = 0.0;
    for arc in arcs.iter_mut().filter(|a| **a < min_arc) {
        deficit += min_arc - *arc;
        *arc = min_arc;
    }
    if deficit <= 0.0 {
        return;
    }

    let adjustable: f64 = arcs
        .iter()
        .filter(|&&a| a > min_arc)
        .map(|a| a - min_arc)
        .sum();
    // every arc is pinned at the minimum; the deficit cannot be absorbed
    if adjustable <= 0.0 {
        return;
    }

    for arc in arcs.iter_mut().filter(|a| **a > min_arc) {
        let reducible = *arc - min_arc;
        *arc = (*arc - deficit * reducible / adjustable).max(0.0);
    }
}
