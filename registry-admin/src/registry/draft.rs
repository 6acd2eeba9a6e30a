//! Typed drafts: the form's in-progress copy of one record.
//!
//! Raw input arrives as strings. Identifiers and dates are parsed once, in
//! [`Draft::set_field`]; required-field checks wait until submit.

use std::fmt;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};

use super::collection::{Backend, Collection};
use crate::error::{FieldError, SubmitError, ValidationError};
use crate::models::{
    midnight_utc, City, CityPayload, Entity, EntityId, Institution, InstitutionPayload, Person,
    PersonPayload, Province, ProvincePayload, Student, StudentPayload,
};

#[async_trait]
pub trait Draft: Default + Clone + fmt::Debug + Send + Sync + 'static {
    type Entity: Entity;

    /// Input names accepted by [`Draft::set_field`], in display order.
    const FIELDS: &'static [&'static str];

    /// Builds a draft from a stored record. Absent optional values become empty input.
    fn hydrate(entity: &Self::Entity) -> Self;

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), FieldError>;

    /// Current input value as it would be bound to a text field.
    fn field(&self, name: &str) -> Option<String>;

    fn missing_required(&self) -> Vec<&'static str>;

    /// Writes the draft: create when `editing` is `None`, update otherwise.
    async fn save(
        &self,
        backend: &dyn Backend,
        editing: Option<&Self::Entity>,
    ) -> Result<(), SubmitError>;
}

fn parse_id(field: &'static str, value: &str) -> Result<Option<EntityId>, FieldError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    value
        .parse::<EntityId>()
        .map(Some)
        .map_err(|_| FieldError::InvalidId {
            field,
            value: value.to_string(),
        })
}

fn parse_date(field: &'static str, value: &str) -> Result<Option<NaiveDate>, FieldError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map(Some)
        .map_err(|_| FieldError::InvalidDate {
            field,
            value: value.to_string(),
        })
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn id_text(id: Option<EntityId>) -> String {
    id.map(|id| id.to_string()).unwrap_or_default()
}

fn required_id(id: Option<EntityId>, field: &'static str) -> Result<EntityId, ValidationError> {
    id.ok_or_else(|| ValidationError::missing(vec![field]))
}

/// Student form. The person's fields are flattened onto it and split back
/// into a person payload and a student payload on save.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentDraft {
    pub full_name: String,
    pub birth_date: Option<NaiveDate>,
    pub email: String,
    pub phone: String,
    pub national_id: String,
    pub institution_id: Option<EntityId>,
    pub city_id: Option<EntityId>,
    pub specialty: String,
}

impl StudentDraft {
    pub fn person_payload(&self) -> PersonPayload {
        PersonPayload {
            full_name: self.full_name.trim().to_string(),
            birth_date: self.birth_date.map(midnight_utc),
            email: optional(&self.email),
            phone: optional(&self.phone),
            national_id: self.national_id.trim().to_string(),
        }
    }

    pub fn student_payload(&self, person_id: EntityId) -> Result<StudentPayload, ValidationError> {
        Ok(StudentPayload {
            person_id,
            institution_id: required_id(self.institution_id, "institucion_id")?,
            city_id: required_id(self.city_id, "ciudad_id")?,
            specialty: self.specialty.trim().to_string(),
        })
    }
}

#[async_trait]
impl Draft for StudentDraft {
    type Entity = Student;

    const FIELDS: &'static [&'static str] = &[
        "nombre",
        "fecha_nacimiento",
        "correo",
        "telefono",
        "cedula",
        "institucion_id",
        "ciudad_id",
        "especialidad",
    ];

    fn hydrate(student: &Student) -> Self {
        let person = student.person.as_ref();
        Self {
            full_name: person.map(|p| p.full_name.clone()).unwrap_or_default(),
            // Zero timestamps (0001-01-01) mean no date was recorded.
            birth_date: person
                .and_then(|p| p.birth_date)
                .map(|date| date.date_naive())
                .filter(|date| date.year() > 1),
            email: person.and_then(|p| p.email.clone()).unwrap_or_default(),
            phone: person.and_then(|p| p.phone.clone()).unwrap_or_default(),
            national_id: person.map(|p| p.national_id.clone()).unwrap_or_default(),
            institution_id: Some(student.institution_id).filter(|id| id.0 != 0),
            city_id: Some(student.city_id).filter(|id| id.0 != 0),
            specialty: student.specialty.clone().unwrap_or_default(),
        }
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), FieldError> {
        match name {
            "nombre" => self.full_name = value.to_string(),
            "fecha_nacimiento" => self.birth_date = parse_date("fecha_nacimiento", value)?,
            "correo" => self.email = value.to_string(),
            "telefono" => self.phone = value.to_string(),
            "cedula" => self.national_id = value.to_string(),
            "institucion_id" => self.institution_id = parse_id("institucion_id", value)?,
            "ciudad_id" => self.city_id = parse_id("ciudad_id", value)?,
            "especialidad" => self.specialty = value.to_string(),
            other => return Err(FieldError::Unknown(other.to_string())),
        }
        Ok(())
    }

    fn field(&self, name: &str) -> Option<String> {
        let value = match name {
            "nombre" => self.full_name.clone(),
            "fecha_nacimiento" => self
                .birth_date
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            "correo" => self.email.clone(),
            "telefono" => self.phone.clone(),
            "cedula" => self.national_id.clone(),
            "institucion_id" => id_text(self.institution_id),
            "ciudad_id" => id_text(self.city_id),
            "especialidad" => self.specialty.clone(),
            _ => return None,
        };
        Some(value)
    }

    fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if blank(&self.full_name) {
            missing.push("nombre");
        }
        if blank(&self.national_id) {
            missing.push("cedula");
        }
        if self.institution_id.is_none() {
            missing.push("institucion_id");
        }
        if self.city_id.is_none() {
            missing.push("ciudad_id");
        }
        missing
    }

    async fn save(&self, backend: &dyn Backend, editing: Option<&Student>) -> Result<(), SubmitError> {
        let person = self.person_payload();
        let people = Collection::<Person>::new(backend);

        // Two writes without a transaction: a person created here stays
        // behind if the student write below fails.
        let person_id = match editing {
            Some(student) => {
                let person_id = student.person_ref().ok_or(SubmitError::MissingPerson)?;
                people.update(person_id, &person).await?;
                person_id
            }
            None => people.create(&person).await?.id,
        };

        let payload = self.student_payload(person_id)?;
        let students = Collection::<Student>::new(backend);
        let written = match editing {
            Some(student) => students.update(student.id, &payload).await,
            None => students.create(&payload).await,
        };

        if let Err(err) = written {
            if editing.is_none() {
                log::warn!(
                    "⚠️ Person {} was created but the student record was not; it is left without a student",
                    person_id
                );
            }
            return Err(err.into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstitutionDraft {
    pub name: String,
    pub authority: String,
    pub contact: String,
    pub address: String,
}

impl InstitutionDraft {
    pub fn payload(&self) -> InstitutionPayload {
        InstitutionPayload {
            name: self.name.trim().to_string(),
            authority: optional(&self.authority),
            contact: optional(&self.contact),
            address: optional(&self.address),
        }
    }
}

#[async_trait]
impl Draft for InstitutionDraft {
    type Entity = Institution;

    const FIELDS: &'static [&'static str] = &["nombre", "autoridad", "contacto", "direccion"];

    fn hydrate(institution: &Institution) -> Self {
        Self {
            name: institution.name.clone(),
            authority: institution.authority.clone().unwrap_or_default(),
            contact: institution.contact.clone().unwrap_or_default(),
            address: institution.address.clone().unwrap_or_default(),
        }
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), FieldError> {
        let slot = match name {
            "nombre" => &mut self.name,
            "autoridad" => &mut self.authority,
            "contacto" => &mut self.contact,
            "direccion" => &mut self.address,
            other => return Err(FieldError::Unknown(other.to_string())),
        };
        *slot = value.to_string();
        Ok(())
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "nombre" => Some(self.name.clone()),
            "autoridad" => Some(self.authority.clone()),
            "contacto" => Some(self.contact.clone()),
            "direccion" => Some(self.address.clone()),
            _ => None,
        }
    }

    fn missing_required(&self) -> Vec<&'static str> {
        if blank(&self.name) {
            vec!["nombre"]
        } else {
            Vec::new()
        }
    }

    async fn save(
        &self,
        backend: &dyn Backend,
        editing: Option<&Institution>,
    ) -> Result<(), SubmitError> {
        let collection = Collection::<Institution>::new(backend);
        let payload = self.payload();
        match editing {
            Some(institution) => collection.update(institution.id, &payload).await?,
            None => collection.create(&payload).await?,
        };
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProvinceDraft {
    pub name: String,
}

#[async_trait]
impl Draft for ProvinceDraft {
    type Entity = Province;

    const FIELDS: &'static [&'static str] = &["nombre"];

    fn hydrate(province: &Province) -> Self {
        Self {
            name: province.name.clone(),
        }
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), FieldError> {
        match name {
            "nombre" => self.name = value.to_string(),
            other => return Err(FieldError::Unknown(other.to_string())),
        }
        Ok(())
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "nombre" => Some(self.name.clone()),
            _ => None,
        }
    }

    fn missing_required(&self) -> Vec<&'static str> {
        if blank(&self.name) {
            vec!["nombre"]
        } else {
            Vec::new()
        }
    }

    async fn save(&self, backend: &dyn Backend, editing: Option<&Province>) -> Result<(), SubmitError> {
        let collection = Collection::<Province>::new(backend);
        let payload = ProvincePayload {
            name: self.name.trim().to_string(),
        };
        match editing {
            Some(province) => collection.update(province.id, &payload).await?,
            None => collection.create(&payload).await?,
        };
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CityDraft {
    pub name: String,
    pub province_id: Option<EntityId>,
}

#[async_trait]
impl Draft for CityDraft {
    type Entity = City;

    const FIELDS: &'static [&'static str] = &["ciudad", "provincia_id"];

    fn hydrate(city: &City) -> Self {
        Self {
            name: city.name.clone(),
            province_id: Some(city.province_id).filter(|id| id.0 != 0),
        }
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), FieldError> {
        match name {
            "ciudad" => self.name = value.to_string(),
            "provincia_id" => self.province_id = parse_id("provincia_id", value)?,
            other => return Err(FieldError::Unknown(other.to_string())),
        }
        Ok(())
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "ciudad" => Some(self.name.clone()),
            "provincia_id" => Some(id_text(self.province_id)),
            _ => None,
        }
    }

    fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if blank(&self.name) {
            missing.push("ciudad");
        }
        if self.province_id.is_none() {
            missing.push("provincia_id");
        }
        missing
    }

    async fn save(&self, backend: &dyn Backend, editing: Option<&City>) -> Result<(), SubmitError> {
        let collection = Collection::<City>::new(backend);
        let payload = CityPayload {
            name: self.name.trim().to_string(),
            province_id: required_id(self.province_id, "provincia_id")?,
        };
        match editing {
            Some(city) => collection.update(city.id, &payload).await?,
            None => collection.create(&payload).await?,
        };
        Ok(())
    }
}
