//! Student domain model.
//!
//! Field names on the wire follow the school API (`nome`, `idade`, `turma_id`, ...),
//! which is also the vocabulary used for filter and sort keys.

use super::error::{Result, RosterError};
use super::record::{FieldValue, Record};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Enrollment status of a student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StudentStatus {
    /// Enrolled and attending.
    #[default]
    #[serde(rename = "ativo")]
    Active,
    /// Not currently enrolled.
    #[serde(rename = "inativo")]
    Inactive,
}

impl StudentStatus {
    /// Wire representation, also used as the status filter value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ativo",
            Self::Inactive => "inativo",
        }
    }

    /// Parses the wire representation.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ativo" => Some(Self::Active),
            "inativo" => Some(Self::Inactive),
            _ => None,
        }
    }
}

impl std::fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A student as returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "data_nascimento")]
    pub birth_date: NaiveDate,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub status: StudentStatus,
    #[serde(rename = "turma_id", default)]
    pub class_id: Option<i64>,
    #[serde(rename = "turma_nome", default)]
    pub class_name: Option<String>,
    #[serde(rename = "idade", default)]
    pub age: u32,
    #[serde(rename = "telefone", default)]
    pub phone: Option<String>,
    #[serde(rename = "observacoes", default)]
    pub notes: Option<String>,
}

impl Record for Student {
    fn id(&self) -> i64 {
        self.id
    }

    fn field(&self, key: &str) -> Option<FieldValue> {
        let value = match key {
            "id" => FieldValue::from(self.id),
            "nome" => FieldValue::from(self.name.as_str()),
            "data_nascimento" => FieldValue::from(self.birth_date.to_string()),
            "email" => FieldValue::from(self.email.clone()),
            "status" => FieldValue::from(self.status.as_str()),
            "turma_id" => FieldValue::from(self.class_id),
            "turma_nome" => FieldValue::from(self.class_name.clone()),
            "idade" => FieldValue::from(self.age),
            "telefone" => FieldValue::from(self.phone.clone()),
            _ => return None,
        };
        Some(value)
    }
}

/// Full years elapsed between `birth_date` and `today`.
///
/// Returns 0 for birth dates in the future.
#[must_use]
pub fn age_on(birth_date: NaiveDate, today: NaiveDate) -> u32 {
    let mut years = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        years -= 1;
    }
    u32::try_from(years).unwrap_or(0)
}

/// Form payload for creating or updating a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentDraft {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "data_nascimento")]
    pub birth_date: NaiveDate,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub status: StudentStatus,
    #[serde(rename = "turma_id", default)]
    pub class_id: Option<i64>,
    #[serde(rename = "telefone", default)]
    pub phone: Option<String>,
    #[serde(rename = "observacoes", default)]
    pub notes: Option<String>,
}

impl StudentDraft {
    /// Minimum age accepted by the API.
    pub const MIN_AGE: u32 = 5;

    /// Checks the draft against the API's form rules.
    ///
    /// Returns the draft with trimmed name and email on success.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::Validation`] when the name is not 3–80 characters,
    /// the student is younger than five on `today`, or the email is malformed.
    pub fn validate(mut self, today: NaiveDate) -> Result<Self> {
        self.name = self.name.trim().to_string();
        let name_len = self.name.chars().count();
        if !(3..=80).contains(&name_len) {
            return Err(RosterError::Validation(
                "name must be between 3 and 80 characters".to_string(),
            ));
        }

        if self.birth_date > today || age_on(self.birth_date, today) < Self::MIN_AGE {
            return Err(RosterError::Validation(format!(
                "student must be at least {} years old",
                Self::MIN_AGE
            )));
        }

        self.email = super::school::normalize_email(self.email.take())?;
        self.phone = super::school::normalize_phone(self.phone.take())?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn age_counts_full_years_only() {
        assert_eq!(age_on(date(2010, 6, 15), date(2020, 6, 14)), 9);
        assert_eq!(age_on(date(2010, 6, 15), date(2020, 6, 15)), 10);
        assert_eq!(age_on(date(2030, 1, 1), date(2020, 1, 1)), 0);
    }

    #[test]
    fn student_deserializes_from_api_json() {
        let json = r#"{
            "id": 7,
            "nome": "Ana Souza",
            "data_nascimento": "2012-03-04",
            "email": null,
            "status": "inativo",
            "turma_id": 2,
            "turma_nome": "5A",
            "idade": 12
        }"#;
        let student: Student = serde_json::from_str(json).unwrap();
        assert_eq!(student.name, "Ana Souza");
        assert_eq!(student.status, StudentStatus::Inactive);
        assert_eq!(student.field("turma_id"), Some(FieldValue::Number(2.0)));
        assert_eq!(student.field("email"), Some(FieldValue::Null));
        assert_eq!(student.field("turma"), None);
    }

    #[test]
    fn draft_rejects_short_name() {
        let draft = StudentDraft {
            name: "  Al ".to_string(),
            birth_date: date(2010, 1, 1),
            email: None,
            status: StudentStatus::Active,
            class_id: None,
            phone: None,
            notes: None,
        };
        let err = draft.validate(date(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, RosterError::Validation(_)));
    }

    #[test]
    fn draft_rejects_too_young() {
        let draft = StudentDraft {
            name: "Bruno Lima".to_string(),
            birth_date: date(2021, 1, 1),
            email: None,
            status: StudentStatus::Active,
            class_id: None,
            phone: None,
            notes: None,
        };
        assert!(draft.validate(date(2024, 1, 1)).is_err());
    }
}
