pub mod assets;
pub mod audit;
pub mod carousel;
pub mod companies;
pub mod shares;
pub mod teams;
pub mod users;
pub mod versions;

pub use assets::AssetRepository;
pub use audit::AuditRepository;
pub use carousel::CarouselRepository;
pub use companies::CompanyRepository;
pub use shares::ShareRepository;
pub use teams::TeamRepository;
pub use users::UserRepository;
pub use versions::VersionRepository;
