use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;
use markbook_core::{PaginationMeta, PaginationParams};
use markbook_models::academic_years::{
    AcademicYear, CreateAcademicYearDto, UpdateAcademicYearDto,
};
use markbook_models::auth::{LoginRequest, LoginResponse};
use markbook_models::exams::{
    CreateExamDto, Exam, ExamType, ExamWithSubject, PaginatedExamsResponse, UpdateExamDto,
};
use markbook_models::results::{
    BulkTransitionResponse, CreateResultDto, ExamResult, Grade, PaginatedResultsResponse,
    PublishResultsDto, ResultStatus, ResultWithContext, ReviewResultsDto, UpdateResultDto,
};
use markbook_models::semesters::{
    CreateSemesterDto, Semester, SemesterWithYear, UpdateSemesterDto,
};
use markbook_models::students::{
    CreateStudentDto, PaginatedStudentsResponse, Student, StudentWithUser, UpdateStudentDto,
};
use markbook_models::subjects::{CreateSubjectDto, Subject};
use markbook_models::users::{CreateUserDto, User, UserRole};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::get_profile,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::subjects::controller::create_subject,
        crate::modules::subjects::controller::get_subjects,
        crate::modules::subjects::controller::get_subject,
        crate::modules::exams::controller::create_exam,
        crate::modules::exams::controller::get_exams,
        crate::modules::exams::controller::get_exam,
        crate::modules::exams::controller::update_exam,
        crate::modules::exams::controller::delete_exam,
        crate::modules::results::controller::create_result,
        crate::modules::results::controller::update_result,
        crate::modules::results::controller::get_results,
        crate::modules::results::controller::get_result,
        crate::modules::results::controller::publish_results,
        crate::modules::results::controller::review_results,
        crate::modules::academic_years::controller::create_academic_year,
        crate::modules::academic_years::controller::get_academic_years,
        crate::modules::academic_years::controller::get_current_academic_year,
        crate::modules::academic_years::controller::get_academic_year,
        crate::modules::academic_years::controller::update_academic_year,
        crate::modules::academic_years::controller::delete_academic_year,
        crate::modules::semesters::controller::create_semester,
        crate::modules::semesters::controller::get_semesters,
        crate::modules::semesters::controller::get_current_semester,
        crate::modules::semesters::controller::get_semester,
        crate::modules::semesters::controller::update_semester,
        crate::modules::semesters::controller::delete_semester,
    ),
    components(
        schemas(
            ErrorResponse,
            PaginationMeta,
            PaginationParams,
            LoginRequest,
            LoginResponse,
            User,
            UserRole,
            CreateUserDto,
            Student,
            StudentWithUser,
            CreateStudentDto,
            UpdateStudentDto,
            PaginatedStudentsResponse,
            Subject,
            CreateSubjectDto,
            Exam,
            ExamType,
            ExamWithSubject,
            CreateExamDto,
            UpdateExamDto,
            PaginatedExamsResponse,
            ExamResult,
            ResultWithContext,
            Grade,
            ResultStatus,
            CreateResultDto,
            UpdateResultDto,
            PublishResultsDto,
            ReviewResultsDto,
            BulkTransitionResponse,
            PaginatedResultsResponse,
            AcademicYear,
            CreateAcademicYearDto,
            UpdateAcademicYearDto,
            Semester,
            SemesterWithYear,
            CreateSemesterDto,
            UpdateSemesterDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Users", description = "User account management"),
        (name = "Students", description = "Student profile management"),
        (name = "Subjects", description = "Subject registry"),
        (name = "Exams", description = "Exam registry"),
        (name = "Results", description = "Result lifecycle: draft, publish, approve/reject"),
        (name = "Academic Years", description = "Academic year management"),
        (name = "Semesters", description = "Semester management"),
    ),
    info(
        title = "Markbook API",
        description = "School results back end with a teacher-to-admin approval workflow",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
