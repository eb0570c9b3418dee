//! Students of a school and the student dashboard

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        school::School,
        student::{Student, StudentDashboard, StudentForm, StudentQuery},
        user::UserClaims,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct StudentsService {
    repository: Repository,
}

impl StudentsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(
        &self,
        school: &School,
        query: &StudentQuery,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Student>, i64)> {
        self.repository.students_search(school.id, query, limit, offset).await
    }

    /// Student of the given school; students of other schools look missing
    pub async fn get(&self, school: &School, id: i32) -> AppResult<Student> {
        let student = self.repository.students_get_by_id(id).await?;
        if student.school_id != school.id {
            return Err(AppError::NotFound(format!("Student {} not found", id)));
        }
        Ok(student)
    }

    pub async fn create(&self, school: &School, form: StudentForm) -> AppResult<Student> {
        form.validate()?;
        let student = self.repository.students_create(school.id, &form).await?;
        tracing::info!(student_id = student.id, school_code = %school.code, "Student registered");
        Ok(student)
    }

    pub async fn update(&self, school: &School, id: i32, form: StudentForm) -> AppResult<Student> {
        form.validate()?;
        self.get(school, id).await?;
        let student = self.repository.students_update(id, &form).await?;
        tracing::info!(student_id = id, school_code = %school.code, "Student updated");
        Ok(student)
    }

    pub async fn delete(&self, school: &School, id: i32) -> AppResult<()> {
        self.get(school, id).await?;
        self.repository.students_delete(id).await?;
        tracing::info!(student_id = id, school_code = %school.code, "Student deleted");
        Ok(())
    }

    /// Student record linked to the calling account
    pub async fn own_record(&self, claims: &UserClaims) -> AppResult<Student> {
        self.repository
            .students_get_by_user(claims.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("No student record is linked to your account.".to_string()))
    }

    pub async fn dashboard(&self, claims: &UserClaims) -> AppResult<StudentDashboard> {
        let student = self.own_record(claims).await?;
        let school = self.repository.schools_get_by_id(student.school_id).await?;
        let applications = self.repository.crews_for_student(student.id).await?;
        Ok(StudentDashboard {
            student,
            school_name: school.name,
            school_code: school.code,
            applications,
        })
    }
}
