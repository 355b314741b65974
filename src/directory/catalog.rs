/*!
Catalog administration: adding, removing, and changing courses.
*/
use super::AcademicDirectory;
use crate::{
    course::{Course, CourseUpdate},
    error::{Error, Result},
};

impl AcademicDirectory {
    pub fn add_course(&mut self, course: Course) -> Result<()> {
        log::trace!("AcademicDirectory::add_course( {} ) called.", &course);

        if course.credits == 0 {
            return Err(Error::InvalidCredits(course.credits));
        }
        if course.capacity == 0 {
            return Err(Error::InvalidCapacity(course.capacity));
        }
        if self.course(&course.code).is_some() {
            return Err(Error::DuplicateCourse(course.code));
        }
        self.require_professor(&course.professor)?;

        log::info!("Course added: {}", &course);
        self.courses.push(course);
        Ok(())
    }

    /**
    Remove course `code` from the catalog.

    Its roster goes with it, and so does every student's registration and
    grade for it; TA capabilities for it are withdrawn.
    */
    pub fn remove_course(&mut self, code: &str) -> Result<Course> {
        log::trace!("AcademicDirectory::remove_course( {:?} ) called.", code);

        let n = self.courses.iter()
            .position(|c| c.code == code)
            .ok_or_else(|| Error::not_found("course", code))?;

        let enrolled = self.rosters.remove(code).unwrap_or_default();
        for s in self.users.iter_mut().filter_map(|u| u.as_student_mut()) {
            s.registered.retain(|c| c != code);
            s.grades.remove(code);
            if let Some(cap) = s.ta.as_mut() {
                cap.courses.retain(|c| c != code);
            }
        }

        let course = self.courses.remove(n);
        log::info!(
            "Course removed: {} ({} students unenrolled)",
            &course, &enrolled.len()
        );
        Ok(course)
    }

    /// Change course `code`'s credits, prerequisites, and schedule. Only
    /// the course's own professor may do this.
    pub fn update_course(
        &mut self,
        professor_id: &str,
        code: &str,
        update: CourseUpdate,
    ) -> Result<()> {
        log::trace!(
            "AcademicDirectory::update_course( {:?}, {:?}, {:?} ) called.",
            professor_id, code, &update
        );

        self.require_professor(professor_id)?;
        let course = self.require_course(code)?;
        if course.professor != professor_id {
            log::warn!("{} may not update {}.", professor_id, code);
            return Err(Error::unauthorized(professor_id, format!("update {}", code)));
        }
        if update.credits == 0 {
            return Err(Error::InvalidCredits(update.credits));
        }

        // Nobody already enrolled may be pushed over the credit limit.
        if update.credits > course.credits {
            let extra = update.credits - course.credits;
            for id in self.roster(code).iter() {
                let attempted = self.credit_load(id)?.saturating_add(extra);
                if attempted > self.rules.credit_limit {
                    log::warn!(
                        "Raising {} to {} credits would put {} at {}; declined.",
                        code, &update.credits, id, &attempted
                    );
                    return Err(Error::CreditLimitExceeded {
                        code: code.to_owned(),
                        attempted,
                        limit: self.rules.credit_limit,
                    });
                }
            }
        }

        let course = self.course_mut(code)
            .ok_or_else(|| Error::not_found("course", code))?;
        course.apply(update);
        log::info!("Course details updated: {}", course);
        Ok(())
    }

    pub fn reassign_professor(
        &mut self,
        code: &str,
        professor_id: &str,
    ) -> Result<()> {
        log::trace!(
            "AcademicDirectory::reassign_professor( {:?}, {:?} ) called.",
            code, professor_id
        );

        self.require_professor(professor_id)?;
        let course = self.course_mut(code)
            .ok_or_else(|| Error::not_found("course", code))?;
        course.professor = professor_id.to_owned();
        log::info!("Professor {} assigned to course: {}", professor_id, course);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::tests::small_directory;
    use crate::grade::Grade;
    use crate::tests::ensure_logging;

    #[test]
    fn add_and_remove() {
        ensure_logging();
        let mut d = small_directory();

        let c = Course::new("CS301", "Compilers", "P002", 4, &["CS201"], 5, "Mon 14:00-17:00", 40);
        d.add_course(c.clone()).unwrap();
        assert!(matches!(d.add_course(c), Err(Error::DuplicateCourse(_))));

        let orphan = Course::new("CS302", "Databases", "P404", 4, &[], 5, "TBA", 40);
        assert!(matches!(d.add_course(orphan), Err(Error::NotFound { kind: "professor", .. })));

        let weightless = Course::new("CS303", "Seminar", "P002", 0, &[], 5, "TBA", 40);
        assert!(matches!(d.add_course(weightless), Err(Error::InvalidCredits(0))));
        let roomless = Course::new("CS304", "Reading", "P002", 2, &[], 5, "TBA", 0);
        assert!(matches!(d.add_course(roomless), Err(Error::InvalidCapacity(0))));
        assert!(d.course("CS303").is_none() && d.course("CS304").is_none());

        d.register("S001", "CS101").unwrap();
        d.assign_grade("S001", "CS101", Grade::A).unwrap();
        d.grant_ta("S004", "CS101").unwrap();
        let removed = d.remove_course("CS101").unwrap();
        assert_eq!(removed.code, "CS101");
        assert!(d.course("CS101").is_none());
        assert!(d.student("S001").unwrap().registered.is_empty());
        assert!(d.student("S001").unwrap().grades.is_empty());
        assert!(!d.student("S004").unwrap().is_ta_for("CS101"));
        d.check_integrity().unwrap();

        assert!(d.remove_course("CS101").is_err());
    }

    #[test]
    fn only_owner_updates() {
        ensure_logging();
        let mut d = small_directory();
        let update = CourseUpdate {
            credits: 3,
            prerequisites: vec!["MA101".to_owned()],
            schedule: "Fri 09:00-12:00".to_owned(),
        };

        let err = d.update_course("P002", "CS101", update.clone()).unwrap_err();
        assert!(matches!(err, Error::Unauthorized { .. }));
        assert_eq!(d.course("CS101").unwrap().credits, 4);

        d.update_course("P001", "CS101", update).unwrap();
        let c = d.course("CS101").unwrap();
        assert_eq!(c.credits, 3);
        assert_eq!(c.prerequisites, vec!["MA101".to_owned()]);
        assert_eq!(c.schedule, "Fri 09:00-12:00");
    }

    #[test]
    fn reassignment_moves_ownership() {
        ensure_logging();
        let mut d = small_directory();
        d.reassign_professor("CS101", "P002").unwrap();
        assert_eq!(d.course("CS101").unwrap().professor, "P002");
        assert!(d.reassign_professor("CS101", "P404").is_err());
        assert!(d.reassign_professor("CS999", "P001").is_err());

        let update = CourseUpdate {
            credits: 4,
            prerequisites: Vec::new(),
            schedule: "TBA".to_owned(),
        };
        assert!(d.update_course("P001", "CS101", update.clone()).is_err());
        d.update_course("P002", "CS101", update).unwrap();
    }

    #[test]
    fn credit_raise_respects_enrolled_loads() {
        ensure_logging();
        let mut d = small_directory();
        for (n, credits) in [4, 4, 4, 4].iter().enumerate() {
            let code = format!("EL{}", n);
            d.courses.push(Course::new(&code, "Elective", "P002", *credits, &[], 1, "TBA", 30));
            d.register("S002", &code).unwrap();
        }
        d.register("S002", "CS203").unwrap();
        assert_eq!(d.credit_load("S002").unwrap(), 18);

        let mut update = CourseUpdate {
            credits: 5,
            prerequisites: vec!["CS101".to_owned()],
            schedule: "Fri 10:00-12:00".to_owned(),
        };
        let err = d.update_course("P002", "CS203", update.clone()).unwrap_err();
        assert!(matches!(err, Error::CreditLimitExceeded { attempted: 21, .. }));
        assert_eq!(d.course("CS203").unwrap().credits, 2);

        update.credits = 4;
        d.update_course("P002", "CS203", update).unwrap();
        assert_eq!(d.credit_load("S002").unwrap(), 20);

        let zero = CourseUpdate { credits: 0, prerequisites: Vec::new(), schedule: String::new() };
        assert!(matches!(d.update_course("P002", "CS203", zero), Err(Error::InvalidCredits(0))));
    }

    #[test]
    fn huge_credit_raise_declines() {
        ensure_logging();
        let mut d = small_directory();
        d.register("S001", "CS101").unwrap();

        let update = CourseUpdate {
            credits: u32::MAX,
            prerequisites: Vec::new(),
            schedule: "TBA".to_owned(),
        };
        let err = d.update_course("P001", "CS101", update).unwrap_err();
        assert!(matches!(err, Error::CreditLimitExceeded { attempted: u32::MAX, .. }));
        assert_eq!(d.course("CS101").unwrap().credits, 4);
    }
}
