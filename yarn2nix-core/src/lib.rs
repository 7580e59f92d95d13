pub mod backfill;
pub mod config;
pub mod console;
pub mod error;
pub mod lockfile;
pub mod nix;
pub mod operations;
pub mod prefetch;
pub mod source;

pub use config::Yarn2NixConfig;
pub use error::Yarn2NixError;
pub use lockfile::{LockEntry, LockedDependency, Lockfile};
pub use prefetch::{ContentAddresser, NixPrefetchGit};
pub use source::{SourceDescriptor, SourceKind};

pub type Result<T> = std::result::Result<T, Yarn2NixError>;
