//! The generic admin screen engine.
//!
//! One `Screen` drives either resource kind, parameterized by
//! [`ResourceKind`](crate::types::ResourceKind). All state lives in plain
//! structs mutated by explicit operations, so every transition is testable
//! against a mock server with no rendering host attached. The host (CLI or
//! web shell) reads the derived view fields after each operation and paints
//! them; it never mutates state directly.

pub mod form;
pub mod list;
pub mod query;
pub mod selection;
pub mod stager;

use jiff::Timestamp;

use crate::api::ApiClient;
use crate::error::{ConsoleError, Result};
use crate::types::{Category, Metrics, Page, Record, ResourceKind};

use form::{DetailView, FormFields, Modal, detail_view};
use list::PaginationView;
use query::{FilterPatch, QueryState};
use selection::SelectionState;
use stager::{FileInput, UploadStager};

/// Rendered state of the list pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    Loading,
    Loaded {
        body_html: String,
        pagination: PaginationView,
    },
    Failed(String),
}

impl ListView {
    /// Table-body fragment for whichever state the list is in.
    pub fn body_html(&self) -> String {
        match self {
            ListView::Loading => list::loading_row(),
            ListView::Loaded { body_html, .. } => body_html.clone(),
            ListView::Failed(message) => list::error_row(message),
        }
    }
}

pub struct Screen {
    kind: ResourceKind,
    api: ApiClient,
    pub query: QueryState,
    pub list: ListView,
    page: Option<Page<Record>>,
    pub modal: Modal,
    pub form: FormFields,
    /// Inline message shown in the open form; cleared on the next attempt.
    pub form_error: Option<String>,
    pub detail: Option<DetailView>,
    pub stager: UploadStager,
    pub selection: SelectionState,
    pub categories: Vec<Category>,
    pub metrics: Option<Metrics>,
    saving: bool,
    /// Set when a response demands navigation to the login page. The host
    /// must navigate and stop driving this screen.
    pub navigate_to: Option<String>,
    /// One-shot message for the host's alert surface.
    pub alert: Option<String>,
}

impl Screen {
    pub fn new(kind: ResourceKind, api: ApiClient) -> Self {
        Self {
            kind,
            api,
            query: QueryState::new(),
            list: ListView::Loading,
            page: None,
            modal: Modal::Closed,
            form: FormFields::default(),
            form_error: None,
            detail: None,
            stager: UploadStager::new(),
            selection: SelectionState::new(),
            categories: Vec::new(),
            metrics: None,
            saving: false,
            navigate_to: None,
            alert: None,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Raw records behind the current list view, when loaded.
    pub fn page(&self) -> Option<&Page<Record>> {
        self.page.as_ref()
    }

    /// Screen entry: metrics and categories load concurrently, then the
    /// first list page. Metrics and category failures degrade (the screen
    /// stays usable); only the list itself reports errors inline.
    pub async fn init(&mut self) {
        let (metrics, categories) =
            futures::join!(self.api.metrics(self.kind), self.api.categories());
        self.apply_metrics(metrics);
        self.apply_categories(categories);
        if self.navigate_to.is_none() {
            self.reload().await;
        }
    }

    /// Refresh the KPI header on its own.
    pub async fn load_metrics(&mut self) {
        let result = self.api.metrics(self.kind).await;
        self.apply_metrics(result);
    }

    /// Refresh the category options on their own.
    pub async fn load_categories(&mut self) {
        let result = self.api.categories().await;
        self.apply_categories(result);
    }

    fn apply_metrics(&mut self, result: Result<Metrics>) {
        match result {
            Ok(metrics) => self.metrics = Some(metrics),
            Err(err) => self.degrade(err, "metrics unavailable"),
        }
    }

    fn apply_categories(&mut self, result: Result<Vec<Category>>) {
        match result {
            Ok(categories) => self.categories = categories,
            Err(err) => self.degrade(err, "categories unavailable"),
        }
    }

    /// Fetch the page described by the current query and swap the list view.
    /// Stale in-flight results are not a concern here: operations are
    /// serialized by the single `&mut self` entry points, so the last
    /// completed reload wins.
    pub async fn reload(&mut self) {
        self.list = ListView::Loading;
        match self.api.list(self.kind, &self.query).await {
            Ok(page) => {
                let body_html = if page.results.is_empty() {
                    list::empty_row()
                } else {
                    list::render_rows(self.kind, &page.results, Timestamp::now())
                };
                let pagination = list::pagination_view(
                    self.kind,
                    self.query.page,
                    self.query.page_size,
                    &page,
                );
                // Selection only survives within one render of the store list.
                if matches!(self.kind, ResourceKind::Stores) {
                    self.selection
                        .set_rows(page.results.iter().map(|r| r.id).collect());
                }
                self.page = Some(page);
                self.list = ListView::Loaded {
                    body_html,
                    pagination,
                };
            }
            Err(err) => {
                if self.check_auth(&err) {
                    return;
                }
                self.list = ListView::Failed(err.to_string());
            }
        }
    }

    pub async fn set_search(&mut self, search: &str) {
        self.apply_filter(FilterPatch {
            search: Some(search.to_string()),
            ..Default::default()
        })
        .await;
    }

    pub async fn set_status(&mut self, status: &str) {
        self.apply_filter(FilterPatch {
            status: Some(status.to_string()),
            ..Default::default()
        })
        .await;
    }

    pub async fn set_category(&mut self, category: &str) {
        self.apply_filter(FilterPatch {
            category: Some(category.to_string()),
            ..Default::default()
        })
        .await;
    }

    async fn apply_filter(&mut self, patch: FilterPatch) {
        self.query.set_filter(patch);
        self.reload().await;
    }

    /// Advance one page if the server reported a next link.
    pub async fn next_page(&mut self) {
        let has_next = matches!(
            &self.list,
            ListView::Loaded { pagination, .. } if !pagination.next_disabled
        );
        if has_next {
            self.query.next_page();
            self.reload().await;
        }
    }

    pub async fn prev_page(&mut self) {
        if self.query.page > 1 {
            self.query.prev_page();
            self.reload().await;
        }
    }

    /// Open the create form. Status defaults to active and the category is
    /// prefilled from the list's category filter; any leftover staged files
    /// from a previous form are dropped.
    pub fn open_create(&mut self) {
        self.stager.clear();
        self.form = FormFields::for_create(&self.query.category);
        self.form_error = None;
        self.detail = None;
        self.modal = Modal::Create;
    }

    /// Fetch the record and open the edit form populated from it.
    pub async fn open_edit(&mut self, id: i64) {
        match self.api.retrieve(self.kind, id).await {
            Ok(record) => {
                self.stager.clear();
                self.form = FormFields::populate(self.kind, &record);
                self.form_error = None;
                self.detail = None;
                self.modal = Modal::Edit { id };
            }
            Err(err) => self.surface(err),
        }
    }

    /// Fetch the record and open the read-only detail view.
    pub async fn open_view(&mut self, id: i64) {
        match self.api.retrieve(self.kind, id).await {
            Ok(record) => {
                self.detail = Some(detail_view(self.kind, &record, Timestamp::now()));
                self.modal = Modal::View { id };
            }
            Err(err) => self.surface(err),
        }
    }

    /// Hand off from the detail view to the edit form for the same record.
    pub async fn edit_from_view(&mut self) {
        if let Modal::View { id } = self.modal {
            self.open_edit(id).await;
        }
    }

    /// Close whichever modal is open, revoking all staged previews.
    pub fn close_modal(&mut self) {
        self.stager.clear();
        self.form_error = None;
        self.detail = None;
        self.modal = Modal::Closed;
    }

    /// Stage files for the open form. Returns the number accepted.
    pub fn stage_files(&mut self, files: impl IntoIterator<Item = FileInput>) -> usize {
        self.stager.add(files)
    }

    /// Submit the open create/edit form.
    ///
    /// Re-entrant submits while a save is in flight are ignored. Validation
    /// failures surface inline and issue no request. On success the modal
    /// closes, staged files are dropped, and the list reloads; on failure
    /// the form stays open with the server's message.
    pub async fn save(&mut self) {
        if self.saving {
            return;
        }
        let id = match self.modal {
            Modal::Create => None,
            Modal::Edit { id } => Some(id),
            Modal::Closed | Modal::View { .. } => return,
        };
        self.form_error = None;
        if let Err(err) = self.form.validate(self.kind, &self.categories) {
            self.form_error = Some(err.inline_message());
            return;
        }

        self.saving = true;
        let payload = self.form.to_payload(self.kind);
        let result = self
            .api
            .save(self.kind, id, &payload, self.stager.files())
            .await;
        self.saving = false;

        match result {
            Ok(()) => {
                self.close_modal();
                self.reload().await;
            }
            Err(err) => {
                if self.check_auth(&err) {
                    return;
                }
                self.form_error = Some(err.inline_message());
            }
        }
    }

    /// Delete a record. The host asks "{confirm_delete_message}" first and
    /// passes the answer; a declined confirmation is a complete no-op.
    pub async fn delete(&mut self, id: i64, confirmed: bool) {
        if !confirmed {
            return;
        }
        match self.api.delete(self.kind, id).await {
            Ok(()) => self.reload().await,
            Err(err) => self.surface(err),
        }
    }

    /// CSV export target for the current filters.
    pub fn export_url(&self) -> Result<url::Url> {
        self.api.export_url(self.kind, &self.query)
    }

    pub fn confirm_delete_message(&self) -> String {
        self.kind.confirm_delete_message()
    }

    /// Route an operation failure: auth errors navigate, everything else
    /// goes to the alert surface.
    fn surface(&mut self, err: ConsoleError) {
        if self.check_auth(&err) {
            return;
        }
        self.alert = Some(err.to_string());
    }

    /// Non-critical load failure: log and continue with empty state.
    fn degrade(&mut self, err: ConsoleError, context: &str) {
        if self.check_auth(&err) {
            return;
        }
        tracing::warn!(error = %err, "{context}");
    }

    fn check_auth(&mut self, err: &ConsoleError) -> bool {
        if let ConsoleError::Unauthorized { login } = err {
            self.navigate_to = Some(login.clone());
            true
        } else {
            false
        }
    }

    /// Take the pending one-shot alert, if any.
    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }
}
