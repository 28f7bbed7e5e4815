//! In-process implementation of [`SchoolApi`].
//!
//! Behaves like the HTTP backend: server-side query filters, draft validation,
//! class capacity checks, and the computed `idade` / `turma_nome` /
//! `alunos_count` fields. Used by the CLI and by tests.

use super::api::{SchoolApi, StudentQuery};
use crate::domain::{
    age_on, ClassDraft, Grade, GradeDraft, Guardian, GuardianDraft, Result, RosterError,
    SchoolClass, Stats, Student, StudentDraft, StudentStatus,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Initial data set, in the shape of the API's list responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Seed {
    #[serde(rename = "turmas", default)]
    pub classes: Vec<SchoolClass>,
    #[serde(rename = "alunos", default)]
    pub students: Vec<Student>,
    #[serde(rename = "responsaveis", default)]
    pub guardians: Vec<Guardian>,
    #[serde(rename = "notas", default)]
    pub grades: Vec<Grade>,
}

impl Seed {
    /// Parses a seed document.
    ///
    /// Accepts either the full object form or a bare JSON array of students.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::Api`] when the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Document {
            Full(Seed),
            Students(Vec<Student>),
        }

        let document: Document = serde_json::from_str(json)
            .map_err(|e| RosterError::Api(format!("invalid seed data: {e}")))?;
        Ok(match document {
            Document::Full(seed) => seed,
            Document::Students(students) => Self {
                students,
                ..Self::default()
            },
        })
    }

    /// # Errors
    ///
    /// Returns an I/O error if the file can't be read, or the errors of
    /// [`Seed::from_json`].
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[derive(Debug, Clone)]
pub struct MemorySchoolApi {
    students: BTreeMap<i64, Student>,
    classes: BTreeMap<i64, SchoolClass>,
    guardians: BTreeMap<i64, Guardian>,
    grades: BTreeMap<i64, Grade>,
    next_id: i64,
    today: NaiveDate,
}

impl Default for MemorySchoolApi {
    fn default() -> Self {
        Self::new(Seed::default())
    }
}

impl MemorySchoolApi {
    /// Creates a store from `seed`, computing ages against the local date.
    #[must_use]
    pub fn new(seed: Seed) -> Self {
        Self::with_today(seed, chrono::Local::now().date_naive())
    }

    /// Creates a store whose age computations use a fixed `today`.
    #[must_use]
    pub fn with_today(seed: Seed, today: NaiveDate) -> Self {
        let max_id = seed
            .students
            .iter()
            .map(|s| s.id)
            .chain(seed.classes.iter().map(|c| c.id))
            .chain(seed.guardians.iter().map(|g| g.id))
            .chain(seed.grades.iter().map(|g| g.id))
            .max()
            .unwrap_or(0);

        tracing::debug!(
            students = seed.students.len(),
            classes = seed.classes.len(),
            "memory api seeded"
        );

        Self {
            students: seed.students.into_iter().map(|s| (s.id, s)).collect(),
            classes: seed.classes.into_iter().map(|c| (c.id, c)).collect(),
            guardians: seed.guardians.into_iter().map(|g| (g.id, g)).collect(),
            grades: seed.grades.into_iter().map(|g| (g.id, g)).collect(),
            next_id: max_id + 1,
            today,
        }
    }

    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn enrolled_in(&self, class_id: i64) -> u32 {
        let count = self
            .students
            .values()
            .filter(|s| s.class_id == Some(class_id))
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    fn class_view(&self, class: &SchoolClass) -> SchoolClass {
        SchoolClass {
            student_count: self.enrolled_in(class.id),
            ..class.clone()
        }
    }

    fn student_view(&self, student: &Student) -> Student {
        let class_name = student
            .class_id
            .and_then(|id| self.classes.get(&id))
            .map(|c| c.name.clone());
        Student {
            age: age_on(student.birth_date, self.today),
            class_name,
            ..student.clone()
        }
    }

    /// Fails unless `class_id` exists and has a free seat.
    fn check_capacity(&self, class_id: i64) -> Result<()> {
        let class = self.classes.get(&class_id).ok_or(RosterError::NotFound {
            entity: "class",
            id: class_id,
        })?;
        if self.enrolled_in(class_id) >= class.capacity {
            return Err(RosterError::Api(format!(
                "class {} is at full capacity",
                class.name
            )));
        }
        Ok(())
    }

    fn require_student(&self, id: i64) -> Result<&Student> {
        self.students
            .get(&id)
            .ok_or(RosterError::NotFound { entity: "student", id })
    }

    fn build_student(id: i64, draft: StudentDraft) -> Student {
        Student {
            id,
            name: draft.name,
            birth_date: draft.birth_date,
            email: draft.email,
            status: draft.status,
            class_id: draft.class_id,
            class_name: None,
            age: 0,
            phone: draft.phone,
            notes: draft.notes,
        }
    }
}

impl SchoolApi for MemorySchoolApi {
    fn list_students(&self, query: &StudentQuery) -> Result<Vec<Student>> {
        let students: Vec<Student> = self
            .students
            .values()
            .map(|s| self.student_view(s))
            .filter(|s| query.matches(s))
            .collect();
        tracing::debug!(count = students.len(), query = ?query, "students listed");
        Ok(students)
    }

    fn create_student(&mut self, draft: StudentDraft) -> Result<Student> {
        let draft = draft.validate(self.today)?;
        if let Some(class_id) = draft.class_id {
            self.check_capacity(class_id)?;
        }
        let id = self.allocate_id();
        let student = Self::build_student(id, draft);
        self.students.insert(id, student);
        tracing::debug!(student_id = id, "student created");
        self.require_student(id).map(|s| self.student_view(s))
    }

    fn update_student(&mut self, id: i64, draft: StudentDraft) -> Result<Student> {
        let current_class = self.require_student(id)?.class_id;
        let draft = draft.validate(self.today)?;
        if let Some(class_id) = draft.class_id {
            if current_class != Some(class_id) {
                self.check_capacity(class_id)?;
            }
        }
        self.students.insert(id, Self::build_student(id, draft));
        tracing::debug!(student_id = id, "student updated");
        self.require_student(id).map(|s| self.student_view(s))
    }

    fn delete_student(&mut self, id: i64) -> Result<()> {
        self.students
            .remove(&id)
            .ok_or(RosterError::NotFound { entity: "student", id })?;
        self.guardians.retain(|_, g| g.student_id != id);
        self.grades.retain(|_, g| g.student_id != id);
        tracing::debug!(student_id = id, "student deleted");
        Ok(())
    }

    fn list_classes(&self) -> Result<Vec<SchoolClass>> {
        Ok(self.classes.values().map(|c| self.class_view(c)).collect())
    }

    fn create_class(&mut self, draft: ClassDraft) -> Result<SchoolClass> {
        let draft = draft.validate()?;
        let id = self.allocate_id();
        let class = SchoolClass {
            id,
            name: draft.name,
            capacity: draft.capacity,
            student_count: 0,
        };
        self.classes.insert(id, class.clone());
        tracing::debug!(class_id = id, "class created");
        Ok(class)
    }

    fn enroll(&mut self, student_id: i64, class_id: i64) -> Result<Student> {
        self.require_student(student_id)?;
        self.check_capacity(class_id)?;
        let student = self
            .students
            .get_mut(&student_id)
            .ok_or(RosterError::NotFound { entity: "student", id: student_id })?;
        student.class_id = Some(class_id);
        student.status = StudentStatus::Active;
        tracing::debug!(student_id, class_id, "student enrolled");
        self.require_student(student_id).map(|s| self.student_view(s))
    }

    fn list_guardians(&self, student_id: i64) -> Result<Vec<Guardian>> {
        self.require_student(student_id)?;
        Ok(self
            .guardians
            .values()
            .filter(|g| g.student_id == student_id)
            .cloned()
            .collect())
    }

    fn create_guardian(&mut self, student_id: i64, draft: GuardianDraft) -> Result<Guardian> {
        self.require_student(student_id)?;
        let draft = draft.validate()?;
        let id = self.allocate_id();
        let guardian = Guardian {
            id,
            student_id,
            name: draft.name,
            relationship: draft.relationship,
            phone: draft.phone,
            email: draft.email,
            document: draft.document,
        };
        self.guardians.insert(id, guardian.clone());
        Ok(guardian)
    }

    fn update_guardian(&mut self, id: i64, draft: GuardianDraft) -> Result<Guardian> {
        let draft = draft.validate()?;
        let guardian = self
            .guardians
            .get_mut(&id)
            .ok_or(RosterError::NotFound { entity: "guardian", id })?;
        guardian.name = draft.name;
        guardian.relationship = draft.relationship;
        guardian.phone = draft.phone;
        guardian.email = draft.email;
        guardian.document = draft.document;
        Ok(guardian.clone())
    }

    fn delete_guardian(&mut self, id: i64) -> Result<()> {
        self.guardians
            .remove(&id)
            .map(|_| ())
            .ok_or(RosterError::NotFound { entity: "guardian", id })
    }

    fn list_grades(&self, student_id: i64) -> Result<Vec<Grade>> {
        self.require_student(student_id)?;
        Ok(self
            .grades
            .values()
            .filter(|g| g.student_id == student_id)
            .cloned()
            .collect())
    }

    fn create_grade(&mut self, student_id: i64, draft: GradeDraft) -> Result<Grade> {
        self.require_student(student_id)?;
        let draft = draft.validate()?;
        let id = self.allocate_id();
        let grade = Grade {
            id,
            student_id,
            subject: draft.subject,
            stage: draft.stage,
            score: draft.score,
        };
        self.grades.insert(id, grade.clone());
        Ok(grade)
    }

    fn update_grade(&mut self, id: i64, draft: GradeDraft) -> Result<Grade> {
        let draft = draft.validate()?;
        let grade = self
            .grades
            .get_mut(&id)
            .ok_or(RosterError::NotFound { entity: "grade", id })?;
        grade.subject = draft.subject;
        grade.stage = draft.stage;
        grade.score = draft.score;
        Ok(grade.clone())
    }

    fn delete_grade(&mut self, id: i64) -> Result<()> {
        self.grades
            .remove(&id)
            .map(|_| ())
            .ok_or(RosterError::NotFound { entity: "grade", id })
    }

    fn stats(&self) -> Result<Stats> {
        Ok(Stats {
            total_students: self.students.len(),
            active_students: self
                .students
                .values()
                .filter(|s| s.status == StudentStatus::Active)
                .count(),
            total_classes: self.classes.len(),
        })
    }
}
