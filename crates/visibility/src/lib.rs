pub mod evaluator;
pub mod sharing;
pub mod view;

pub use evaluator::VisibilityEvaluator;
pub use sharing::{PrefetchedShares, SharingCapability, SharingError};
pub use view::{AssetView, UserView};
