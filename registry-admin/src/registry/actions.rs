use super::state::ListFilter;
use crate::models::EntityId;

#[derive(Debug, Clone, PartialEq)]
pub enum CrudAction {
    // Loading
    Mount,
    Reload,
    SetFilter { filter: Option<ListFilter> },

    // Form
    OpenCreate,
    OpenEdit { id: EntityId },
    CloseForm,
    SetField { name: String, value: String },
    Submit,

    // Deletion
    RequestDelete { id: EntityId },
    ConfirmDelete,
    CancelDelete,

    // Banners
    ClearMessages,
}

impl CrudAction {
    pub fn set_field(name: impl Into<String>, value: impl Into<String>) -> Self {
        CrudAction::SetField {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CrudAction::Mount => "Loading screen data",
            CrudAction::Reload => "Reloading collection",
            CrudAction::SetFilter { .. } => "Changing list filter",
            CrudAction::OpenCreate => "Opening create form",
            CrudAction::OpenEdit { .. } => "Opening edit form",
            CrudAction::CloseForm => "Closing form",
            CrudAction::SetField { .. } => "Updating form field",
            CrudAction::Submit => "Submitting form",
            CrudAction::RequestDelete { .. } => "Requesting delete confirmation",
            CrudAction::ConfirmDelete => "Deleting record",
            CrudAction::CancelDelete => "Cancelling delete",
            CrudAction::ClearMessages => "Clearing messages",
        }
    }

    pub fn is_async(&self) -> bool {
        match self {
            // These require backend calls
            CrudAction::Mount
            | CrudAction::Reload
            | CrudAction::SetFilter { .. }
            | CrudAction::Submit
            | CrudAction::ConfirmDelete => true,

            // These are local state changes
            CrudAction::OpenCreate
            | CrudAction::OpenEdit { .. }
            | CrudAction::CloseForm
            | CrudAction::SetField { .. }
            | CrudAction::RequestDelete { .. }
            | CrudAction::CancelDelete
            | CrudAction::ClearMessages => false,
        }
    }
}
