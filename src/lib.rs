pub mod api;
pub mod config;
pub mod console;
pub mod error;
pub mod format;
pub mod types;

pub use api::ApiClient;
pub use config::{Config, LOGIN_PATH};
pub use console::form::{DetailView, FormFields, Modal};
pub use console::list::PaginationView;
pub use console::query::{FilterPatch, QueryState, ORDERING, PAGE_SIZE};
pub use console::selection::SelectionState;
pub use console::stager::{FileInput, StagedFile, UploadStager};
pub use console::{ListView, Screen};
pub use error::{ConsoleError, Result};
pub use types::{Category, FormPayload, Metrics, Page, Record, ResourceKind, Status};
