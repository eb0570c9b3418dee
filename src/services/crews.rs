//! Student crew applications

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        crew::{ApplyCrew, Crew, CrewApplication, CrewDecision, CrewQuery},
        school::School,
        student::Student,
    },
    repository::{crews::PENDING_EXISTS, Repository},
};

#[derive(Clone)]
pub struct CrewsService {
    repository: Repository,
}

impl CrewsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// New pending application; a student has at most one pending at a time
    pub async fn apply(&self, student: &Student, data: ApplyCrew) -> AppResult<Crew> {
        data.validate()?;
        if self.repository.crews_has_pending(student.id).await? {
            return Err(AppError::Conflict(PENDING_EXISTS.to_string()));
        }
        let crew = self.repository.crews_create(student.id, &data.position).await?;
        tracing::info!(crew_id = crew.id, student_id = student.id, "Crew application submitted");
        Ok(crew)
    }

    pub async fn results(&self, student: &Student) -> AppResult<Vec<Crew>> {
        self.repository.crews_for_student(student.id).await
    }

    pub async fn list_for_school(&self, school: &School, query: &CrewQuery) -> AppResult<Vec<CrewApplication>> {
        self.repository.crews_for_school(school.id, query).await
    }

    /// Approve or reject a pending application of one of the school's students
    pub async fn decide(&self, school: &School, id: i32, decision: CrewDecision) -> AppResult<Crew> {
        let crew = self.repository.crews_get_by_id(id).await?;
        let student = self.repository.students_get_by_id(crew.student_id).await?;
        if student.school_id != school.id {
            return Err(AppError::NotFound(format!("Crew application {} not found", id)));
        }

        let status = decision.apply(crew.status)?;
        let decided = self.repository.crews_set_status(id, status).await?;
        tracing::info!(crew_id = id, school_code = %school.code, status = %status, "Crew application decided");
        Ok(decided)
    }
}
