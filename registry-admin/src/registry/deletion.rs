use super::collection::{Backend, Collection};
use crate::error::RemoteError;
use crate::models::Entity;

#[derive(Debug, Clone, PartialEq)]
pub enum DeletionState<E> {
    Idle,
    PendingConfirmation(E),
}

impl<E> Default for DeletionState<E> {
    fn default() -> Self {
        Self::Idle
    }
}

/// Confirm-then-execute guard in front of every delete.
#[derive(Debug, Clone)]
pub struct DeletionFlow<E> {
    state: DeletionState<E>,
}

impl<E> Default for DeletionFlow<E> {
    fn default() -> Self {
        Self {
            state: DeletionState::Idle,
        }
    }
}

impl<E: Entity> DeletionFlow<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any earlier pending target.
    pub fn request_delete(&mut self, entity: E) {
        self.state = DeletionState::PendingConfirmation(entity);
    }

    pub fn cancel(&mut self) {
        self.state = DeletionState::Idle;
    }

    /// Runs the pending delete, if any. The flow is back to Idle before the
    /// call is made, whatever it returns.
    pub async fn confirm(&mut self, backend: &dyn Backend) -> Option<Result<E, RemoteError>> {
        let target = match std::mem::take(&mut self.state) {
            DeletionState::PendingConfirmation(entity) => entity,
            DeletionState::Idle => return None,
        };

        let result = Collection::<E>::new(backend).delete(target.id()).await;
        Some(result.map(|_| target))
    }

    pub fn state(&self) -> &DeletionState<E> {
        &self.state
    }

    pub fn target(&self) -> Option<&E> {
        match &self.state {
            DeletionState::PendingConfirmation(entity) => Some(entity),
            DeletionState::Idle => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.target().is_some()
    }

    pub fn prompt(&self, noun: &str) -> Option<String> {
        self.target()
            .map(|entity| confirmation_prompt(noun, entity.label()))
    }
}

pub fn confirmation_prompt(noun: &str, label: Option<&str>) -> String {
    match label {
        Some(label) => format!("Are you sure you want to delete the {} \"{}\"?", noun, label),
        None => format!("Are you sure you want to delete this {}?", noun),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntityId, Institution};

    fn institution(name: &str) -> Institution {
        Institution {
            id: EntityId(2),
            name: name.to_string(),
            authority: None,
            contact: None,
            address: None,
        }
    }

    #[test]
    fn test_request_then_cancel() {
        let mut flow = DeletionFlow::new();
        assert_eq!(flow.state(), &DeletionState::Idle);

        flow.request_delete(institution("Colegio Mejía"));
        assert!(flow.is_pending());
        assert_eq!(flow.target().map(|i| i.id), Some(EntityId(2)));

        flow.cancel();
        assert_eq!(flow.state(), &DeletionState::Idle);
        assert_eq!(flow.prompt("institution"), None);
    }

    #[test]
    fn test_prompt_uses_label_or_generic_noun() {
        let mut flow = DeletionFlow::new();
        flow.request_delete(institution("Colegio Mejía"));
        assert_eq!(
            flow.prompt("institution").unwrap(),
            "Are you sure you want to delete the institution \"Colegio Mejía\"?"
        );

        flow.request_delete(institution(""));
        assert_eq!(
            flow.prompt("institution").unwrap(),
            "Are you sure you want to delete this institution?"
        );
    }
}
