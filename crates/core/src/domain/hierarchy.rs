use super::{ClassId, CourseId, DepartmentId};

/// Optional course/department/class constraints applied to the student set.
///
/// An absent field places no constraint; it never means "must be unset".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HierarchyFilter {
    pub course: Option<CourseId>,
    pub department: Option<DepartmentId>,
    pub class: Option<ClassId>,
}

impl HierarchyFilter {
    pub fn is_unconstrained(&self) -> bool {
        self.course.is_none() && self.department.is_none() && self.class.is_none()
    }

    pub fn matches(
        &self,
        course: Option<CourseId>,
        department: Option<DepartmentId>,
        class: Option<ClassId>,
    ) -> bool {
        fn field<T: PartialEq>(wanted: Option<T>, actual: Option<T>) -> bool {
            wanted.is_none_or(|wanted| actual == Some(wanted))
        }

        field(self.course, course) && field(self.department, department) && field(self.class, class)
    }
}
