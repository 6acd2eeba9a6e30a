pub mod actions;
pub mod collection;
pub mod deletion;
pub mod draft;
pub mod form;
pub mod manager;
pub mod reference;
pub mod resource;
pub mod state;
pub mod view;


pub use actions::CrudAction;
pub use collection::{Backend, Collection};
pub use deletion::{confirmation_prompt, DeletionFlow, DeletionState};
pub use draft::{CityDraft, Draft, InstitutionDraft, ProvinceDraft, StudentDraft};
pub use form::{FormController, FormMode};
pub use manager::CrudManager;
pub use reference::{ReferenceData, ReferenceKind, SENTINEL_LABEL};
pub use resource::{Cities, Institutions, Provinces, Resource, Students};
pub use state::{ListFilter, ViewState};
pub use view::{TableRow, TableView};

// Re-export for convenience
pub mod prelude {
    pub use super::actions::CrudAction;
    pub use super::manager::CrudManager;
    pub use super::resource::{Cities, Institutions, Provinces, Resource, Students};
    pub use super::state::{ListFilter, ViewState};
}
