use super::deletion::DeletionFlow;
use super::form::FormController;
use super::reference::ReferenceData;
use super::resource::Resource;
use super::view::TableView;
use crate::models::{Entity, EntityId};

/// Secondary listing route: `GET /{resource}/{field}/{value}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFilter {
    pub field: String,
    pub value: String,
}

impl ListFilter {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Everything one resource screen shows. Only the manager writes to it.
pub struct ViewState<R: Resource> {
    pub rows: Vec<R::Entity>,
    pub references: ReferenceData,
    pub loaded: bool,
    pub filter: Option<ListFilter>,

    // Busy flag: set while a remote call is in flight
    pub is_loading: bool,

    // Banners, cleared by the next action
    pub error: Option<String>,
    pub success: Option<String>,

    pub form: FormController<R::Draft>,
    pub deletion: DeletionFlow<R::Entity>,
}

impl<R: Resource> Default for ViewState<R> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            references: ReferenceData::default(),
            loaded: false,
            filter: None,
            is_loading: false,
            error: None,
            success: None,
            form: FormController::default(),
            deletion: DeletionFlow::default(),
        }
    }
}

impl<R: Resource> ViewState<R> {
    pub fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    pub fn set_error(&mut self, message: String) {
        self.success = None;
        self.error = Some(message);
    }

    pub fn set_success(&mut self, message: String) {
        self.error = None;
        self.success = Some(message);
    }

    pub fn clear_messages(&mut self) {
        self.error = None;
        self.success = None;
    }

    pub fn find(&self, id: EntityId) -> Option<&R::Entity> {
        self.rows.iter().find(|entity| entity.id() == id)
    }

    pub fn table(&self) -> TableView {
        TableView::project::<R>(&self.rows, &self.references)
    }

    /// Submit stays disabled while a call is in flight.
    pub fn can_submit(&self) -> bool {
        self.form.is_visible() && !self.is_loading
    }

    pub fn delete_prompt(&self) -> Option<String> {
        self.deletion.prompt(R::NOUN)
    }
}
