pub mod anchor;
pub mod notice;
pub mod placement;
pub mod session;
pub mod stabilizer;

pub use anchor::Anchor;
pub use notice::{Notice, NoticeKind};
pub use placement::{Placement, PlacementError, PlacementState};
pub use session::{Session, TrackingState, ViewMode};
pub use stabilizer::Stabilizer;
