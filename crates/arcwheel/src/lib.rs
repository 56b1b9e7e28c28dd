//! Proportional arc layout and drag-to-rotate interaction for a holdings wheel.
//!
//! The crate is split leaves-first: [`geometry`] has the angle math, [`layout`] turns
//! weighted items into arc segments, [`rotation`] turns pointer events into a rotation
//! offset with inertial coasting, and [`scene`] combines both into drawable primitives.
//! [`wheel::Wheel`] owns all of it for a host UI.

pub mod macros;

pub mod error;
pub mod export;
pub mod geometry;
pub mod label;
pub mod layout;
pub mod portfolio;
pub mod rotation;
pub mod scene;
pub mod wheel;

pub use error::ParamError;
pub use geometry::{ArcPath, Point};
pub use layout::{AllocationItem, ArcSegment, ItemId, Layout, LayoutParams};
pub use rotation::{
    CoastTicket, FrameScheduler, ManualScheduler, Phase, Release, RotationController,
    RotationParams, RotationState, WheelFrame,
};
pub use scene::{Scene, SegmentSprite, WheelSizing};
pub use wheel::{PointerTracker, Wheel};

/// Path of the unix socket the `orbit` daemon listens on.
pub const SOCKET_PATH: &str = "/tmp/orbit.sock";
