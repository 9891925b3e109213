pub mod export;
pub mod migrate;
pub mod sync;

pub use export::{ExportFormat, export_episodes};
pub use migrate::{RepairPlan, ValidationReport, plan_repair, validate_catalog};
pub use sync::{
    ContentSource, MetadataSource, SyncError, SyncOptions, SyncOutcome, SyncReport, SyncService,
    SyncStage, write_atomic,
};
