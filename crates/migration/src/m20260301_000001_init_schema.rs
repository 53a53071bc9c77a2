use sea_orm_migration::prelude::*;
use sea_orm_migration::schema::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, DatabaseBackend};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Course::Table)
                    .if_not_exists()
                    .col(string_len(Course::Id, 36).primary_key())
                    .col(string_len(Course::Name, 200).unique_key())
                    .col(timestamp(Course::CreatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Department::Table)
                    .if_not_exists()
                    .col(string_len(Department::Id, 36).primary_key())
                    .col(string_len(Department::CourseId, 36))
                    .col(string_len(Department::Name, 200))
                    .col(timestamp(Department::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-department-course_id")
                            .from(Department::Table, Department::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Class::Table)
                    .if_not_exists()
                    .col(string_len(Class::Id, 36).primary_key())
                    .col(string_len_null(Class::DepartmentId, 36))
                    .col(string_len(Class::Name, 100))
                    .col(timestamp(Class::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-class-department_id")
                            .from(Class::Table, Class::DepartmentId)
                            .to(Department::Table, Department::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Subject::Table)
                    .if_not_exists()
                    .col(string_len(Subject::Id, 36).primary_key())
                    .col(string_len(Subject::Name, 200).unique_key())
                    .col(double(Subject::MaxMarks).default(100.0))
                    .col(timestamp(Subject::CreatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        // Student ids are assigned by administrators, not generated.
        manager
            .create_table(
                Table::create()
                    .table(Student::Table)
                    .if_not_exists()
                    .col(big_integer(Student::Id).primary_key())
                    .col(string_len_null(Student::UserId, 36))
                    .col(string_len(Student::Name, 200))
                    .col(string_len_null(Student::CourseId, 36))
                    .col(string_len_null(Student::DepartmentId, 36))
                    .col(string_len_null(Student::ClassId, 36))
                    .col(string_len_null(Student::Section, 50))
                    .col(date_null(Student::DateOfBirth))
                    .col(timestamp(Student::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-student-course_id")
                            .from(Student::Table, Student::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-student-department_id")
                            .from(Student::Table, Student::DepartmentId)
                            .to(Department::Table, Department::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-student-class_id")
                            .from(Student::Table, Student::ClassId)
                            .to(Class::Table, Class::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Marks::Table)
                    .if_not_exists()
                    .col(pk_auto(Marks::Id))
                    .col(big_integer(Marks::StudentId))
                    .col(string_len(Marks::SubjectId, 36))
                    // ExamType enum is represented in app code.
                    // 0=midterm, 1=final, 2=quiz, 3=assignment
                    .col(
                        small_integer(Marks::ExamType)
                            .default(1)
                            .check(Expr::col(Marks::ExamType).gte(0))
                            .check(Expr::col(Marks::ExamType).lte(3)),
                    )
                    .col(string_len(Marks::Semester, 50))
                    .col(double(Marks::MarksObtained).check(Expr::col(Marks::MarksObtained).gte(0)))
                    .col(boolean(Marks::IsFinalized).default(false))
                    .col(timestamp(Marks::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(Marks::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-marks-student_id")
                            .from(Marks::Table, Marks::StudentId)
                            .to(Student::Table, Student::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-marks-subject_id")
                            .from(Marks::Table, Marks::SubjectId)
                            .to(Subject::Table, Subject::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uniq_marks_student_subject_exam_semester")
                    .table(Marks::Table)
                    .col(Marks::StudentId)
                    .col(Marks::SubjectId)
                    .col(Marks::ExamType)
                    .col(Marks::Semester)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StudentResult::Table)
                    .if_not_exists()
                    .col(pk_auto(StudentResult::Id))
                    .col(big_integer(StudentResult::StudentId))
                    .col(string_len(StudentResult::Semester, 50))
                    .col(double(StudentResult::TotalMarks))
                    .col(double(StudentResult::TotalMaxMarks))
                    .col(double(StudentResult::Percentage))
                    .col(string_len(StudentResult::Grade, 2))
                    .col(double(StudentResult::Sgpa))
                    .col(double(StudentResult::Cgpa))
                    // ResultStatus enum is represented in app code.
                    // 0=pending, 1=approved, 2=frozen
                    .col(
                        small_integer(StudentResult::Status)
                            .default(0)
                            .check(Expr::col(StudentResult::Status).gte(0))
                            .check(Expr::col(StudentResult::Status).lte(2)),
                    )
                    .col(timestamp(StudentResult::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(StudentResult::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-student_result-student_id")
                            .from(StudentResult::Table, StudentResult::StudentId)
                            .to(Student::Table, Student::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uniq_student_result_student_semester")
                    .table(StudentResult::Table)
                    .col(StudentResult::StudentId)
                    .col(StudentResult::Semester)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_student_result_percentage")
                    .table(StudentResult::Table)
                    .col(StudentResult::Percentage)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GradingSchema::Table)
                    .if_not_exists()
                    .col(string_len(GradingSchema::Id, 36).primary_key())
                    .col(string_len(GradingSchema::Name, 200))
                    .col(integer(GradingSchema::Version).default(1))
                    // Grade ranges are stored as a JSON array.
                    .col(text(GradingSchema::Ranges))
                    .col(double(GradingSchema::PassPercentage).default(33.0))
                    .col(boolean(GradingSchema::IsActive).default(false))
                    .col(timestamp(GradingSchema::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(GradingSchema::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        // At most one active schema. MySQL has no partial indexes; there the
        // row lock taken by the repository is the only guard.
        if matches!(
            manager.get_database_backend(),
            DatabaseBackend::Postgres | DatabaseBackend::Sqlite
        ) {
            manager
                .get_connection()
                .execute_unprepared(
                    "CREATE UNIQUE INDEX uniq_grading_schema_single_active \
                     ON grading_schema (is_active) WHERE is_active",
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GradingSchema::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(StudentResult::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Marks::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Student::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Subject::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Class::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Department::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Course::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Course {
    Table,
    Id,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Department {
    Table,
    Id,
    CourseId,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Class {
    Table,
    Id,
    DepartmentId,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Subject {
    Table,
    Id,
    Name,
    MaxMarks,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Student {
    Table,
    Id,
    UserId,
    Name,
    CourseId,
    DepartmentId,
    ClassId,
    Section,
    DateOfBirth,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Marks {
    Table,
    Id,
    StudentId,
    SubjectId,
    ExamType,
    Semester,
    MarksObtained,
    IsFinalized,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum StudentResult {
    Table,
    Id,
    StudentId,
    Semester,
    TotalMarks,
    TotalMaxMarks,
    Percentage,
    Grade,
    Sgpa,
    Cgpa,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum GradingSchema {
    Table,
    Id,
    Name,
    Version,
    Ranges,
    PassPercentage,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
