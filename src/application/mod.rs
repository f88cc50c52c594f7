//! Application layer: interaction state and use cases
//!
//! This layer drives the domain model over time (zoom and highlight
//! timelines) and binds it to companion-map regions.

pub mod context;
pub mod error;
pub mod error_ext;
pub mod highlight;
pub mod regions;
pub mod scale;
pub mod timeline;
pub mod zoom;

pub use context::{NodeLayout, TickOutcome, WheelContext};
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::DomainResultExt;
pub use highlight::{
    Emphasis, HighlightController, HighlightMode, HighlightTarget, InteractionEvent,
    OpacityLevels,
};
pub use regions::{bind_regions, RegionBinding, RegionIndex, Tooltip};
pub use scale::{ArcGeometry, LabelPlacement, ScaleState, TextAnchor, WheelGeometry};
pub use timeline::{Easing, PlaybackState, TimelineKind, Transition};
pub use zoom::{Visibility, WheelFrame, ZoomCompletion, ZoomState, ZoomTransition};
