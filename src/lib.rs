pub mod config;
pub mod downloads;
pub mod embed;
pub mod error;
pub mod id;
pub mod record;
pub mod schema;
pub mod seed;
pub mod storage;
pub mod store;

pub use config::FolioConfig;
pub use downloads::{summarize, DownloadEvent, DownloadLog, DownloadSummary};
pub use error::FolioError;
pub use id::new_id;
pub use record::{Collection, Fields, Record};
pub use storage::{FileStorage, MemoryStorage, StoreAdapter};
pub use store::{DocumentAudit, RecordStore};

/// Re-export commonly used types
pub type Result<T> = std::result::Result<T, FolioError>;
