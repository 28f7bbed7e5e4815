//! Classes, guardians, grades and users.
//!
//! These are the entities edited through the modal forms around the student
//! list. Each draft type carries the same validation rules the API enforces so
//! a form can reject bad input before a round trip.

use super::error::{Result, RosterError};
use serde::{Deserialize, Serialize};

/// A class group (`turma`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolClass {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "capacidade")]
    pub capacity: u32,
    #[serde(rename = "alunos_count", default)]
    pub student_count: u32,
}

impl SchoolClass {
    /// Label used in class selects, e.g. `5A (12/30)`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} ({}/{})", self.name, self.student_count, self.capacity)
    }

    /// Whether another student can be enrolled.
    #[must_use]
    pub const fn has_room(&self) -> bool {
        self.student_count < self.capacity
    }
}

/// Form payload for creating a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDraft {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "capacidade")]
    pub capacity: u32,
}

impl ClassDraft {
    /// # Errors
    ///
    /// Returns [`RosterError::Validation`] for an empty name or zero capacity.
    pub fn validate(mut self) -> Result<Self> {
        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            return Err(RosterError::Validation("class name is required".to_string()));
        }
        if self.capacity == 0 {
            return Err(RosterError::Validation(
                "class capacity must be positive".to_string(),
            ));
        }
        Ok(self)
    }
}

/// A guardian (`responsavel`) attached to a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guardian {
    pub id: i64,
    #[serde(rename = "aluno_id")]
    pub student_id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "parentesco")]
    pub relationship: String,
    #[serde(rename = "telefone", default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "documento", default)]
    pub document: Option<String>,
}

/// Form payload for creating or updating a guardian.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardianDraft {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "parentesco")]
    pub relationship: String,
    #[serde(rename = "telefone", default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "documento", default)]
    pub document: Option<String>,
}

impl GuardianDraft {
    /// # Errors
    ///
    /// Returns [`RosterError::Validation`] when the name is not 3–80 characters,
    /// the relationship is not 3–40 characters, or phone, email or CPF document
    /// are malformed.
    pub fn validate(mut self) -> Result<Self> {
        self.name = self.name.trim().to_string();
        self.relationship = self.relationship.trim().to_string();

        if !(3..=80).contains(&self.name.chars().count()) {
            return Err(RosterError::Validation(
                "name must be between 3 and 80 characters".to_string(),
            ));
        }
        if !(3..=40).contains(&self.relationship.chars().count()) {
            return Err(RosterError::Validation(
                "relationship must be between 3 and 40 characters".to_string(),
            ));
        }

        self.phone = normalize_phone(self.phone.take())?;
        self.email = normalize_email(self.email.take())?;
        self.document = normalize_document(self.document.take())?;
        Ok(self)
    }
}

/// Grading period of a [`Grade`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GradeStage {
    #[serde(rename = "1B")]
    First,
    #[serde(rename = "2B")]
    Second,
    #[serde(rename = "3B")]
    Third,
    #[serde(rename = "4B")]
    Fourth,
    #[serde(rename = "FINAL")]
    Final,
}

/// A grade (`nota`) recorded for a student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grade {
    pub id: i64,
    #[serde(rename = "aluno_id")]
    pub student_id: i64,
    #[serde(rename = "disciplina")]
    pub subject: String,
    #[serde(rename = "etapa")]
    pub stage: GradeStage,
    #[serde(rename = "nota")]
    pub score: f64,
}

/// Form payload for creating or updating a grade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeDraft {
    #[serde(rename = "disciplina")]
    pub subject: String,
    #[serde(rename = "etapa")]
    pub stage: GradeStage,
    #[serde(rename = "nota")]
    pub score: f64,
}

impl GradeDraft {
    /// Checks subject length and score range, rounding the score to one decimal.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::Validation`] when the subject is not 2–60
    /// characters or the score is outside `0.0..=10.0`.
    pub fn validate(mut self) -> Result<Self> {
        self.subject = self.subject.trim().to_string();
        if !(2..=60).contains(&self.subject.chars().count()) {
            return Err(RosterError::Validation(
                "subject must be between 2 and 60 characters".to_string(),
            ));
        }
        if !(0.0..=10.0).contains(&self.score) {
            return Err(RosterError::Validation(
                "score must be between 0.0 and 10.0".to_string(),
            ));
        }
        self.score = (self.score * 10.0).round() / 10.0;
        Ok(self)
    }
}

/// Role of the signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

/// The signed-in user, as returned by `/auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub role: Role,
}

impl User {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Dashboard counters (`/estatisticas`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    #[serde(rename = "total_alunos")]
    pub total_students: usize,
    #[serde(rename = "alunos_ativos")]
    pub active_students: usize,
    #[serde(rename = "total_turmas")]
    pub total_classes: usize,
}

/// Trims an optional email, mapping blanks to `None`.
///
/// # Errors
///
/// Returns [`RosterError::Validation`] when the address has no single `@`,
/// an empty local part, or a domain without a dot-separated suffix of at least
/// two letters.
pub fn normalize_email(email: Option<String>) -> Result<Option<String>> {
    let Some(email) = non_blank(email) else {
        return Ok(None);
    };

    let valid = email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty()
            && !domain.contains('@')
            && domain.rsplit_once('.').is_some_and(|(host, tld)| {
                !host.is_empty() && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
            })
    });

    if valid {
        Ok(Some(email))
    } else {
        Err(RosterError::Validation("invalid email".to_string()))
    }
}

/// Trims an optional phone number; at least ten digits are required.
///
/// # Errors
///
/// Returns [`RosterError::Validation`] when fewer than ten digits are present.
pub fn normalize_phone(phone: Option<String>) -> Result<Option<String>> {
    let Some(phone) = non_blank(phone) else {
        return Ok(None);
    };
    if phone.chars().filter(char::is_ascii_digit).count() < 10 {
        return Err(RosterError::Validation(
            "phone must have at least 10 digits".to_string(),
        ));
    }
    Ok(Some(phone))
}

/// Trims an optional CPF document; exactly eleven digits are required.
///
/// # Errors
///
/// Returns [`RosterError::Validation`] when the digit count is not eleven.
pub fn normalize_document(document: Option<String>) -> Result<Option<String>> {
    let Some(document) = non_blank(document) else {
        return Ok(None);
    };
    if document.chars().filter(char::is_ascii_digit).count() != 11 {
        return Err(RosterError::Validation("CPF must have 11 digits".to_string()));
    }
    Ok(Some(document))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ana@escola.com.br", true)]
    #[case("a.b+c@x.io", true)]
    #[case("no-at-sign.com", false)]
    #[case("@escola.com", false)]
    #[case("ana@escola", false)]
    #[case("ana@escola.c", false)]
    #[case("ana@@escola.com", false)]
    fn email_rules(#[case] email: &str, #[case] ok: bool) {
        assert_eq!(normalize_email(Some(email.to_string())).is_ok(), ok);
    }

    #[test]
    fn blank_optional_fields_become_none() {
        assert_eq!(normalize_email(Some("   ".to_string())).unwrap(), None);
        assert_eq!(normalize_phone(None).unwrap(), None);
        assert_eq!(normalize_document(Some(String::new())).unwrap(), None);
    }

    #[test]
    fn phone_and_document_count_digits() {
        assert!(normalize_phone(Some("(11) 98765-4321".to_string())).is_ok());
        assert!(normalize_phone(Some("98765-4321".to_string())).is_err());
        assert!(normalize_document(Some("123.456.789-09".to_string())).is_ok());
        assert!(normalize_document(Some("123.456.789".to_string())).is_err());
    }

    #[test]
    fn grade_score_is_rounded_and_bounded() {
        let draft = GradeDraft {
            subject: "Matemática".to_string(),
            stage: GradeStage::First,
            score: 7.46,
        };
        assert!((draft.validate().unwrap().score - 7.5).abs() < f64::EPSILON);

        let out_of_range = GradeDraft {
            subject: "Matemática".to_string(),
            stage: GradeStage::Final,
            score: 10.5,
        };
        assert!(out_of_range.validate().is_err());
    }

    #[test]
    fn grade_stage_uses_wire_names() {
        let json = serde_json::to_string(&GradeStage::Final).unwrap();
        assert_eq!(json, "\"FINAL\"");
        let stage: GradeStage = serde_json::from_str("\"2B\"").unwrap();
        assert_eq!(stage, GradeStage::Second);
    }

    #[test]
    fn class_label_and_capacity() {
        let class = SchoolClass {
            id: 1,
            name: "5A".to_string(),
            capacity: 2,
            student_count: 2,
        };
        assert_eq!(class.label(), "5A (2/2)");
        assert!(!class.has_room());
    }

    #[test]
    fn guardian_relationship_length_is_checked() {
        let draft = GuardianDraft {
            name: "Maria Souza".to_string(),
            relationship: "Mã".to_string(),
            phone: None,
            email: None,
            document: None,
        };
        assert!(draft.validate().is_err());
    }
}
