pub mod archive_service;
pub mod quota_service;
pub mod quota_store;

pub use archive_service::ArchiveService;
pub use quota_service::{QuotaService, QuotaSnapshot};
pub use quota_store::{FileQuotaStore, MemoryQuotaStore, QuotaRecord, QuotaStore};
