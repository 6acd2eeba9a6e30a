//! Resource descriptors: one per screen, each naming its entity, draft,
//! table columns and the reference collections it depends on.

use super::draft::{CityDraft, Draft, InstitutionDraft, ProvinceDraft, StudentDraft};
use super::reference::{ReferenceData, ReferenceKind, SENTINEL_LABEL};
use crate::models::{City, Entity, Institution, Person, Province, Student};

pub trait Resource: Send + Sync + 'static {
    type Entity: Entity;
    type Draft: Draft<Entity = Self::Entity>;

    /// Lowercase singular, used in prompts and error text.
    const NOUN: &'static str;
    /// Capitalised singular, used in success banners.
    const TITLE: &'static str;
    const PLURAL: &'static str;
    /// Collections loaded alongside the primary list.
    const REFERENCES: &'static [ReferenceKind];
    const COLUMNS: &'static [&'static str];

    fn cells(entity: &Self::Entity, references: &ReferenceData) -> Vec<String>;
}

/// Optional or blank text renders as [`SENTINEL_LABEL`].
fn text(value: Option<&str>) -> String {
    match value {
        Some(value) if !value.trim().is_empty() => value.to_string(),
        _ => SENTINEL_LABEL.to_string(),
    }
}

fn person_text(person: Option<&Person>, field: fn(&Person) -> Option<&str>) -> String {
    text(person.and_then(field))
}

pub struct Students;

impl Resource for Students {
    type Entity = Student;
    type Draft = StudentDraft;

    const NOUN: &'static str = "student";
    const TITLE: &'static str = "Student";
    const PLURAL: &'static str = "students";
    const REFERENCES: &'static [ReferenceKind] =
        &[ReferenceKind::Cities, ReferenceKind::Institutions];
    const COLUMNS: &'static [&'static str] = &[
        "ID",
        "Name",
        "National ID",
        "Email",
        "Phone",
        "Institution",
        "City",
        "Specialty",
    ];

    fn cells(student: &Student, references: &ReferenceData) -> Vec<String> {
        let person = student.person.as_ref();
        vec![
            student.id.to_string(),
            person_text(person, |p| Some(p.full_name.as_str())),
            person_text(person, |p| Some(p.national_id.as_str())),
            person_text(person, |p| p.email.as_deref()),
            person_text(person, |p| p.phone.as_deref()),
            references
                .resolve(ReferenceKind::Institutions, student.institution_id)
                .to_string(),
            references
                .resolve(ReferenceKind::Cities, student.city_id)
                .to_string(),
            text(student.specialty.as_deref()),
        ]
    }
}

pub struct Institutions;

impl Resource for Institutions {
    type Entity = Institution;
    type Draft = InstitutionDraft;

    const NOUN: &'static str = "institution";
    const TITLE: &'static str = "Institution";
    const PLURAL: &'static str = "institutions";
    const REFERENCES: &'static [ReferenceKind] = &[];
    const COLUMNS: &'static [&'static str] = &["ID", "Name", "Authority", "Contact", "Address"];

    fn cells(institution: &Institution, _references: &ReferenceData) -> Vec<String> {
        vec![
            institution.id.to_string(),
            institution.name.clone(),
            text(institution.authority.as_deref()),
            text(institution.contact.as_deref()),
            text(institution.address.as_deref()),
        ]
    }
}

pub struct Provinces;

impl Resource for Provinces {
    type Entity = Province;
    type Draft = ProvinceDraft;

    const NOUN: &'static str = "province";
    const TITLE: &'static str = "Province";
    const PLURAL: &'static str = "provinces";
    const REFERENCES: &'static [ReferenceKind] = &[];
    const COLUMNS: &'static [&'static str] = &["ID", "Name"];

    fn cells(province: &Province, _references: &ReferenceData) -> Vec<String> {
        vec![province.id.to_string(), province.name.clone()]
    }
}

pub struct Cities;

impl Resource for Cities {
    type Entity = City;
    type Draft = CityDraft;

    const NOUN: &'static str = "city";
    const TITLE: &'static str = "City";
    const PLURAL: &'static str = "cities";
    const REFERENCES: &'static [ReferenceKind] = &[ReferenceKind::Provinces];
    const COLUMNS: &'static [&'static str] = &["ID", "City", "Province"];

    fn cells(city: &City, references: &ReferenceData) -> Vec<String> {
        vec![
            city.id.to_string(),
            city.name.clone(),
            references
                .resolve(ReferenceKind::Provinces, city.province_id)
                .to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntityId;

    fn institution(authority: Option<&str>) -> Institution {
        Institution {
            id: EntityId(4),
            name: "Colegio Mejía".to_string(),
            authority: authority.map(str::to_string),
            contact: Some("   ".to_string()),
            address: None,
        }
    }

    #[test]
    fn test_absent_optional_cells_show_sentinel() {
        let cells = Institutions::cells(&institution(Some("Rector")), &ReferenceData::default());
        assert_eq!(cells, vec!["4", "Colegio Mejía", "Rector", "N/A", "N/A"]);

        let cells = Institutions::cells(&institution(None), &ReferenceData::default());
        assert_eq!(cells[2], SENTINEL_LABEL);
    }

    #[test]
    fn test_student_without_person_shows_sentinel() {
        let student = Student {
            id: EntityId(11),
            person_id: None,
            institution_id: EntityId(4),
            city_id: EntityId(7),
            specialty: None,
            person: None,
        };

        let cells = Students::cells(&student, &ReferenceData::default());
        assert_eq!(cells[0], "11");
        assert!(cells[1..].iter().all(|cell| cell == SENTINEL_LABEL));
    }
}
