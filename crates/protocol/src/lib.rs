pub mod commands;
pub mod content;
pub mod events;
pub mod region;
pub mod section;
pub mod snapshot;
pub mod types;

pub use commands::{Capability, FocusTarget, HostCommand, ObserverOptions, ScrollBehavior};
pub use content::{OwnerProfile, ProjectRecord, SkillGroupRecord, SkillIcon};
pub use events::{
    DismissSource, HostEvent, IntersectionEntry, UnknownDismissSource, is_cancel_key,
};
pub use region::RegionId;
pub use section::{Section, UnknownSection};
pub use snapshot::{CursorStyle, Parallax, PreviewView, Snapshot};
pub use types::{Color, InvalidColor, Point, Rect, ScrollMetrics};
