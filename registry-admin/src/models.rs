use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Server-assigned record identifier. The client never mints these.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(EntityId)
    }
}

/// A record living in one REST collection.
pub trait Entity: DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static {
    /// Collection path segment, e.g. `estudiantes`.
    const RESOURCE: &'static str;

    fn id(&self) -> EntityId;

    /// Human readable label used for foreign-key display and prompts.
    fn label(&self) -> Option<&str>;
}

fn non_empty(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Widens a calendar date to the timestamp the API expects (midnight UTC).
pub fn midnight_utc(date: NaiveDate) -> String {
    format!("{}T00:00:00Z", date.format("%Y-%m-%d"))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    #[serde(rename = "ID")]
    pub id: EntityId,
    #[serde(rename = "nombre", default)]
    pub full_name: String,
    #[serde(rename = "fecha_nacimiento", default)]
    pub birth_date: Option<DateTime<FixedOffset>>,
    #[serde(rename = "correo", default)]
    pub email: Option<String>,
    #[serde(rename = "telefono", default)]
    pub phone: Option<String>,
    #[serde(rename = "cedula", default)]
    pub national_id: String,
}

impl Entity for Person {
    const RESOURCE: &'static str = "personas";

    fn id(&self) -> EntityId {
        self.id
    }

    fn label(&self) -> Option<&str> {
        non_empty(&self.full_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonPayload {
    #[serde(rename = "nombre")]
    pub full_name: String,
    #[serde(rename = "fecha_nacimiento")]
    pub birth_date: Option<String>,
    #[serde(rename = "correo")]
    pub email: Option<String>,
    #[serde(rename = "telefono")]
    pub phone: Option<String>,
    #[serde(rename = "cedula")]
    pub national_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(rename = "ID")]
    pub id: EntityId,
    #[serde(rename = "persona_id", default)]
    pub person_id: Option<EntityId>,
    #[serde(rename = "institucion_id", default)]
    pub institution_id: EntityId,
    #[serde(rename = "ciudad_id", default)]
    pub city_id: EntityId,
    #[serde(rename = "especialidad", default)]
    pub specialty: Option<String>,
    #[serde(rename = "persona", default)]
    pub person: Option<Person>,
}

impl Student {
    /// The linked person, taken from the foreign key or the embedded record.
    pub fn person_ref(&self) -> Option<EntityId> {
        self.person_id
            .or_else(|| self.person.as_ref().map(|person| person.id))
    }
}

impl Entity for Student {
    const RESOURCE: &'static str = "estudiantes";

    fn id(&self) -> EntityId {
        self.id
    }

    fn label(&self) -> Option<&str> {
        self.person.as_ref().and_then(|person| person.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentPayload {
    #[serde(rename = "persona_id")]
    pub person_id: EntityId,
    #[serde(rename = "institucion_id")]
    pub institution_id: EntityId,
    #[serde(rename = "ciudad_id")]
    pub city_id: EntityId,
    #[serde(rename = "especialidad")]
    pub specialty: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Institution {
    #[serde(rename = "ID")]
    pub id: EntityId,
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(rename = "autoridad", default)]
    pub authority: Option<String>,
    #[serde(rename = "contacto", default)]
    pub contact: Option<String>,
    #[serde(rename = "direccion", default)]
    pub address: Option<String>,
}

impl Entity for Institution {
    const RESOURCE: &'static str = "instituciones";

    fn id(&self) -> EntityId {
        self.id
    }

    fn label(&self) -> Option<&str> {
        non_empty(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstitutionPayload {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "autoridad")]
    pub authority: Option<String>,
    #[serde(rename = "contacto")]
    pub contact: Option<String>,
    #[serde(rename = "direccion")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Province {
    #[serde(rename = "ID")]
    pub id: EntityId,
    #[serde(rename = "nombre", default)]
    pub name: String,
}

impl Entity for Province {
    const RESOURCE: &'static str = "provincias";

    fn id(&self) -> EntityId {
        self.id
    }

    fn label(&self) -> Option<&str> {
        non_empty(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvincePayload {
    #[serde(rename = "nombre")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    #[serde(rename = "ID")]
    pub id: EntityId,
    #[serde(rename = "ciudad", default)]
    pub name: String,
    #[serde(rename = "provincia_id", default)]
    pub province_id: EntityId,
}

impl Entity for City {
    const RESOURCE: &'static str = "ciudades";

    fn id(&self) -> EntityId {
        self.id
    }

    fn label(&self) -> Option<&str> {
        non_empty(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityPayload {
    #[serde(rename = "ciudad")]
    pub name: String,
    #[serde(rename = "provincia_id")]
    pub province_id: EntityId,
}
