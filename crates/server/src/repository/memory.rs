//! 内存版仓储，供服务与路由测试使用。

use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use gradebook_core::domain::{
    ClassId, Grade, GradingSchema, GradingSchemaId, HierarchyFilter, ResultComputation,
    ResultStatus, StudentId, SubjectId,
};

use super::{
    GradingSchemaRecord, GradingSchemaRepository, MarkRecord, MarksRepository, Repositories,
    ResultRecord, ResultRepository, StudentRecord, StudentRepository, SubjectRecord,
    SubjectRepository,
};

#[derive(Default)]
pub(crate) struct MemoryStore {
    students: Mutex<Vec<StudentRecord>>,
    subjects: Mutex<Vec<SubjectRecord>>,
    marks: Mutex<Vec<(String, MarkRecord)>>,
    results: Mutex<Vec<ResultRecord>>,
    schemas: Mutex<Vec<GradingSchemaRecord>>,
}

fn in_scope(students: Option<&[StudentId]>, id: StudentId) -> bool {
    students.is_none_or(|ids| ids.contains(&id))
}

fn frozen(row: &ResultRecord) -> bool {
    row.status == ResultStatus::Frozen
}

fn in_semester(semester: Option<&str>, value: &str) -> bool {
    semester.is_none_or(|semester| semester == value)
}

impl MemoryStore {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn repositories(self: &Arc<Self>) -> Repositories {
        Repositories {
            students: self.clone(),
            subjects: self.clone(),
            marks: self.clone(),
            results: self.clone(),
            grading_schemas: self.clone(),
        }
    }

    pub(crate) fn add_student(
        &self,
        id: i64,
        name: &str,
        class: Option<(ClassId, &str)>,
        section: Option<&str>,
    ) -> StudentId {
        let id = StudentId::new(id);
        self.students.lock().expect("store lock").push(StudentRecord {
            id,
            name: name.to_string(),
            course_id: None,
            department_id: None,
            class_id: class.map(|(class_id, _)| class_id),
            class_name: class.map(|(_, class_name)| class_name.to_string()),
            section: section.map(str::to_string),
        });
        id
    }

    pub(crate) fn add_student_record(&self, record: StudentRecord) {
        self.students.lock().expect("store lock").push(record);
    }

    pub(crate) fn add_subject(&self, name: &str, max_marks: f64) -> SubjectId {
        let id = SubjectId::new();
        self.subjects.lock().expect("store lock").push(SubjectRecord {
            id,
            name: name.to_string(),
            max_marks,
        });
        id
    }

    pub(crate) fn add_mark(&self, student_id: StudentId, subject_id: SubjectId, semester: &str, marks: f64) {
        self.marks.lock().expect("store lock").push((
            semester.to_string(),
            MarkRecord {
                student_id,
                subject_id,
                marks_obtained: marks,
            },
        ));
    }

    pub(crate) fn add_result(&self, student_id: StudentId, semester: &str, percentage: f64, grade: Grade) {
        self.results.lock().expect("store lock").push(ResultRecord {
            student_id,
            semester: semester.to_string(),
            total_marks: percentage,
            total_max_marks: 100.0,
            percentage,
            grade,
            sgpa: 0.0,
            cgpa: 0.0,
            status: ResultStatus::Pending,
        });
    }

    pub(crate) fn set_result_status(&self, student_id: StudentId, semester: &str, status: ResultStatus) {
        let mut rows = self.results.lock().expect("store lock");
        for row in rows
            .iter_mut()
            .filter(|row| row.student_id == student_id && row.semester == semester)
        {
            row.status = status;
        }
    }

    pub(crate) fn results(&self) -> Vec<ResultRecord> {
        self.results.lock().expect("store lock").clone()
    }

    /// 过滤条件为空时返回 `None`，表示不限制学生。
    fn students_in(&self, filter: &HierarchyFilter) -> Option<Vec<StudentId>> {
        if filter.is_unconstrained() {
            return None;
        }
        Some(
            self.students
                .lock()
                .expect("store lock")
                .iter()
                .filter(|row| filter.matches(row.course_id, row.department_id, row.class_id))
                .map(|row| row.id)
                .collect(),
        )
    }
}

#[async_trait]
impl StudentRepository for MemoryStore {
    async fn list(&self, filter: &HierarchyFilter) -> Result<Vec<StudentRecord>> {
        let mut rows: Vec<StudentRecord> = self
            .students
            .lock()
            .expect("store lock")
            .iter()
            .filter(|row| filter.matches(row.course_id, row.department_id, row.class_id))
            .cloned()
            .collect();
        rows.sort_by_key(|row| row.id);
        Ok(rows)
    }
}

#[async_trait]
impl SubjectRepository for MemoryStore {
    async fn list_by_ids(&self, ids: &[SubjectId]) -> Result<Vec<SubjectRecord>> {
        Ok(self
            .subjects
            .lock()
            .expect("store lock")
            .iter()
            .filter(|row| ids.contains(&row.id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl MarksRepository for MemoryStore {
    async fn list_for_student(
        &self,
        student_id: StudentId,
        semester: Option<&str>,
    ) -> Result<Vec<MarkRecord>> {
        Ok(self
            .marks
            .lock()
            .expect("store lock")
            .iter()
            .filter(|(row_semester, row)| {
                row.student_id == student_id && in_semester(semester, row_semester)
            })
            .map(|(_, row)| row.clone())
            .collect())
    }

    async fn list(
        &self,
        semester: Option<&str>,
        filter: &HierarchyFilter,
    ) -> Result<Vec<MarkRecord>> {
        let students = self.students_in(filter);
        Ok(self
            .marks
            .lock()
            .expect("store lock")
            .iter()
            .filter(|(row_semester, row)| {
                in_semester(semester, row_semester)
                    && in_scope(students.as_deref(), row.student_id)
            })
            .map(|(_, row)| row.clone())
            .collect())
    }
}

#[async_trait]
impl ResultRepository for MemoryStore {
    async fn find(&self, student_id: StudentId, semester: &str) -> Result<Option<ResultRecord>> {
        Ok(self
            .results
            .lock()
            .expect("store lock")
            .iter()
            .find(|row| row.student_id == student_id && row.semester == semester)
            .cloned())
    }

    async fn upsert(
        &self,
        student_id: StudentId,
        semester: &str,
        computation: &ResultComputation,
        skip_frozen: bool,
    ) -> Result<Option<ResultRecord>> {
        let mut rows = self.results.lock().expect("store lock");
        let existing = rows
            .iter_mut()
            .find(|row| row.student_id == student_id && row.semester == semester);
        let record = match existing {
            Some(row) if skip_frozen && frozen(row) => return Ok(None),
            Some(row) => {
                row.total_marks = computation.total_marks;
                row.total_max_marks = computation.total_max_marks;
                row.percentage = computation.percentage;
                row.grade = computation.grade;
                row.sgpa = computation.sgpa;
                row.cgpa = computation.cgpa;
                row.clone()
            }
            None => {
                let row = ResultRecord {
                    student_id,
                    semester: semester.to_string(),
                    total_marks: computation.total_marks,
                    total_max_marks: computation.total_max_marks,
                    percentage: computation.percentage,
                    grade: computation.grade,
                    sgpa: computation.sgpa,
                    cgpa: computation.cgpa,
                    status: ResultStatus::Pending,
                };
                rows.push(row.clone());
                row
            }
        };
        Ok(Some(record))
    }

    async fn list(
        &self,
        semester: Option<&str>,
        filter: &HierarchyFilter,
    ) -> Result<Vec<ResultRecord>> {
        let students = self.students_in(filter);
        Ok(self
            .results
            .lock()
            .expect("store lock")
            .iter()
            .filter(|row| {
                in_semester(semester, &row.semester)
                    && in_scope(students.as_deref(), row.student_id)
            })
            .cloned()
            .collect())
    }

    async fn list_for_student(&self, student_id: StudentId) -> Result<Vec<ResultRecord>> {
        Ok(self
            .results
            .lock()
            .expect("store lock")
            .iter()
            .filter(|row| row.student_id == student_id)
            .cloned()
            .collect())
    }

    async fn top_by_percentage(
        &self,
        semester: Option<&str>,
        filter: &HierarchyFilter,
        limit: u32,
    ) -> Result<Vec<ResultRecord>> {
        let mut rows = ResultRepository::list(self, semester, filter).await?;
        rows.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
        rows.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(rows)
    }
}

#[async_trait]
impl GradingSchemaRepository for MemoryStore {
    async fn create(&self, schema: GradingSchema, active: bool) -> Result<GradingSchemaRecord> {
        let mut rows = self.schemas.lock().expect("store lock");
        if active {
            rows.iter_mut().for_each(|row| row.is_active = false);
        }
        let record = GradingSchemaRecord {
            id: GradingSchemaId::new(),
            schema,
            is_active: active,
        };
        rows.push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        id: GradingSchemaId,
        schema: GradingSchema,
        active: bool,
    ) -> Result<Option<GradingSchemaRecord>> {
        let mut rows = self.schemas.lock().expect("store lock");
        if !rows.iter().any(|row| row.id == id) {
            return Ok(None);
        }
        if active {
            rows.iter_mut().for_each(|row| row.is_active = false);
        }
        let row = rows.iter_mut().find(|row| row.id == id).expect("checked above");
        row.schema = schema;
        row.is_active = active;
        Ok(Some(row.clone()))
    }

    async fn list(&self) -> Result<Vec<GradingSchemaRecord>> {
        Ok(self.schemas.lock().expect("store lock").clone())
    }

    async fn find_active(&self) -> Result<Option<GradingSchemaRecord>> {
        Ok(self
            .schemas
            .lock()
            .expect("store lock")
            .iter()
            .find(|row| row.is_active)
            .cloned())
    }

    async fn activate(&self, id: GradingSchemaId) -> Result<Option<GradingSchemaRecord>> {
        let mut rows = self.schemas.lock().expect("store lock");
        if !rows.iter().any(|row| row.id == id) {
            return Ok(None);
        }
        let mut activated = None;
        for row in rows.iter_mut() {
            row.is_active = row.id == id;
            if row.is_active {
                activated = Some(row.clone());
            }
        }
        Ok(activated)
    }
}
