pub mod admin;
pub mod error;
pub mod ledger;
pub mod service;
pub mod storage;

pub use admin::AdminService;
pub use error::{Result, ServiceError};
pub use ledger::AuditLedger;
pub use service::{
    ApproveRequest, AssetService, CreateAssetRequest, DownloadGrant, RejectRequest,
    SetVisibilityRequest, ShareList,
};
pub use storage::ObjectStorage;
