use std::collections::BTreeMap;

use super::collection::Backend;
use super::draft::Draft;
use crate::error::{FieldError, SubmitError, ValidationError};

#[derive(Debug, Clone, PartialEq)]
pub enum FormMode<E> {
    Create,
    /// Editing the record the draft was hydrated from.
    Edit(E),
}

impl<E> Default for FormMode<E> {
    fn default() -> Self {
        Self::Create
    }
}

/// Entity form: a draft, the mode it is submitted in, and whether it is shown.
#[derive(Debug, Clone)]
pub struct FormController<D: Draft> {
    mode: FormMode<D::Entity>,
    draft: D,
    visible: bool,
    // Inputs the draft could not parse, keyed by field; they block submit
    rejected: BTreeMap<&'static str, FieldError>,
}

impl<D: Draft> Default for FormController<D> {
    fn default() -> Self {
        Self {
            mode: FormMode::Create,
            draft: D::default(),
            visible: false,
            rejected: BTreeMap::new(),
        }
    }
}

impl<D: Draft> FormController<D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_create(&mut self) {
        self.mode = FormMode::Create;
        self.draft = D::default();
        self.visible = true;
        self.rejected.clear();
    }

    pub fn open_edit(&mut self, entity: D::Entity) {
        self.draft = D::hydrate(&entity);
        self.mode = FormMode::Edit(entity);
        self.visible = true;
        self.rejected.clear();
    }

    /// Stores one input value. Required fields are not checked here.
    ///
    /// Input the draft cannot parse is kept as typed and blocks [`submit`]
    /// until a later value for the same field is accepted.
    ///
    /// [`submit`]: FormController::submit
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), FieldError> {
        match self.draft.set_field(name, value) {
            Ok(()) => {
                self.rejected.remove(name);
                Ok(())
            }
            Err(err) => {
                if let Some(field) = err.field() {
                    self.rejected.insert(field, err.clone());
                }
                Err(err)
            }
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let error = ValidationError {
            missing: self.draft.missing_required(),
            invalid: self.rejected.values().cloned().collect(),
        };
        if error.is_empty() {
            Ok(())
        } else {
            Err(error)
        }
    }

    pub fn has_rejected_input(&self) -> bool {
        !self.rejected.is_empty()
    }

    /// Validates and writes the draft. On success the form returns to an
    /// empty, hidden Create form; on failure mode and draft are untouched.
    pub async fn submit(&mut self, backend: &dyn Backend) -> Result<(), SubmitError> {
        self.validate()?;

        let editing = match &self.mode {
            FormMode::Create => None,
            FormMode::Edit(entity) => Some(entity),
        };
        self.draft.save(backend, editing).await?;

        self.close();
        Ok(())
    }

    /// Hides the form and drops the draft.
    pub fn close(&mut self) {
        *self = Self::default();
    }

    pub fn mode(&self) -> &FormMode<D::Entity> {
        &self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    /// Bound input value: the rejected text when the last input did not parse.
    pub fn field(&self, name: &str) -> Option<String> {
        match self.rejected.get(name).and_then(|err| err.rejected_value()) {
            Some(raw) => Some(raw.to_string()),
            None => self.draft.field(name),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}
