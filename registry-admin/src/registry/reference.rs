use std::collections::{BTreeMap, HashMap};

use futures::future::try_join_all;

use super::collection::{Backend, Collection};
use crate::error::RemoteError;
use crate::models::{City, Entity, EntityId, Institution, Province};

/// Label shown when a foreign key does not resolve.
pub const SENTINEL_LABEL: &str = "N/A";

/// Auxiliary collections used to resolve foreign keys and fill selection inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReferenceKind {
    Cities,
    Institutions,
    Provinces,
}

impl ReferenceKind {
    pub fn resource(&self) -> &'static str {
        match self {
            ReferenceKind::Cities => City::RESOURCE,
            ReferenceKind::Institutions => Institution::RESOURCE,
            ReferenceKind::Provinces => Province::RESOURCE,
        }
    }
}

/// Snapshot of the most recently loaded reference collections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceData {
    collections: HashMap<ReferenceKind, BTreeMap<EntityId, String>>,
}

impl ReferenceData {
    /// Fetches every requested collection concurrently. Any failure fails the whole load.
    pub async fn load(backend: &dyn Backend, kinds: &[ReferenceKind]) -> Result<Self, RemoteError> {
        let fetches = kinds.iter().map(|kind| fetch_labels(backend, *kind));
        let loaded = try_join_all(fetches).await?;

        Ok(Self {
            collections: loaded.into_iter().collect(),
        })
    }

    pub fn from_entities<E: Entity>(kind: ReferenceKind, entities: &[E]) -> Self {
        let mut data = Self::default();
        data.collections.insert(kind, labels_of(entities));
        data
    }

    pub fn is_loaded(&self, kind: ReferenceKind) -> bool {
        self.collections.contains_key(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    /// Pure lookup; absent ids (never loaded or since deleted) give [`SENTINEL_LABEL`].
    pub fn resolve(&self, kind: ReferenceKind, id: EntityId) -> &str {
        self.collections
            .get(&kind)
            .and_then(|labels| labels.get(&id))
            .map(String::as_str)
            .unwrap_or(SENTINEL_LABEL)
    }

    /// `(id, label)` pairs ordered by label, for selection inputs.
    pub fn options(&self, kind: ReferenceKind) -> Vec<(EntityId, &str)> {
        let mut options: Vec<(EntityId, &str)> = self
            .collections
            .get(&kind)
            .map(|labels| labels.iter().map(|(id, label)| (*id, label.as_str())).collect())
            .unwrap_or_default();
        options.sort_by(|a, b| a.1.cmp(b.1).then(a.0.cmp(&b.0)));
        options
    }
}

async fn fetch_labels(
    backend: &dyn Backend,
    kind: ReferenceKind,
) -> Result<(ReferenceKind, BTreeMap<EntityId, String>), RemoteError> {
    log::debug!("🔄 Loading reference collection {}", kind.resource());
    let labels = match kind {
        ReferenceKind::Cities => labels_of(&Collection::<City>::new(backend).list().await?),
        ReferenceKind::Institutions => {
            labels_of(&Collection::<Institution>::new(backend).list().await?)
        }
        ReferenceKind::Provinces => labels_of(&Collection::<Province>::new(backend).list().await?),
    };
    Ok((kind, labels))
}

fn labels_of<E: Entity>(entities: &[E]) -> BTreeMap<EntityId, String> {
    entities
        .iter()
        .map(|entity| {
            let label = entity.label().unwrap_or(SENTINEL_LABEL);
            (entity.id(), label.to_string())
        })
        .collect()
}
