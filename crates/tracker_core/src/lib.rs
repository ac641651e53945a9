//! Job tracker core: records, filtering, notifications and the pure sync
//! state machine. No IO happens here.
mod effect;
mod fallback;
mod filter;
mod msg;
mod notify;
mod record;
mod state;
mod stats;
mod sync;
mod update;
mod validate;
mod view_model;

pub use effect::Effect;
pub use fallback::FallbackDataset;
pub use filter::{apply_filter, DateRange, FilterPredicate, FilterState};
pub use msg::Msg;
pub use notify::{
    Notification, NotificationChannel, Severity, DEFAULT_NOTIFICATION_DURATION,
    MAX_NOTIFICATION_DURATION,
};
pub use record::{JobDraft, JobId, JobPatch, JobRecord, JobStatus, ParseStatusError};
pub use state::TrackerState;
pub use stats::JobStats;
pub use sync::SyncState;
pub use update::{
    update, CREATE_FAILED, CREATE_SUCCEEDED, DELETE_FAILED, DELETE_SUCCEEDED, LOAD_FAILED,
    UPDATE_FAILED, UPDATE_SUCCEEDED,
};
pub use validate::{FieldError, ValidationErrors, COMPANY_REQUIRED, INVALID_URL, ROLE_REQUIRED};
pub use view_model::{JobRowView, NotificationView, TrackerViewModel};
