// Core modules
pub mod asset;
pub mod audit;
pub mod company;
pub mod team;
pub mod user;

// Re-export commonly used types
pub use asset::{
    Asset, AssetFilter, AssetKind, AssetShare, AssetStatus, AssetTeamShare, AssetUpdate,
    AssetVersion, CarouselItem, NewAsset, NewAssetVersion, NewCarouselItem, UploadType,
    Visibility,
};
pub use audit::{
    AuditAction, AuditLogEntry, AuditLogFilter, AuditResourceType, NewAuditLogEntry,
    RequestContext,
};
pub use company::{Company, NewCompany};
pub use team::{NewTeam, Team, TeamMember};
pub use user::{NewUser, User, UserProfile, UserRole};
