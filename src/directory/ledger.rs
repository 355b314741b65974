/*!
The enrollment ledger: registering for and dropping courses.

Every check a registration has to pass runs before anything is touched, and
a successful registration or drop updates the course roster and the
student's registration list together, so the two never disagree.
*/
use time::{Date, OffsetDateTime};

use super::AcademicDirectory;
use crate::{
    course::Course,
    error::{Error, Result},
    user::Student,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Registration {
    Registered,
    /// The student was already on the roster; nothing changed.
    AlreadyRegistered,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    Dropped,
    /// The student never registered for the course; nothing changed.
    NotRegistered,
}

impl AcademicDirectory {
    /// Whether course `code`'s roster has reached its capacity.
    pub fn is_full(&self, code: &str) -> Result<bool> {
        let course = self.require_course(code)?;
        Ok(self.roster(code).len() >= course.capacity as usize)
    }

    /// Total credits of the courses student `student_id` is registered for.
    pub fn credit_load(&self, student_id: &str) -> Result<u32> {
        let student = self.require_student(student_id)?;
        Ok(self.credits_of(student))
    }

    fn credits_of(&self, student: &Student) -> u32 {
        student.registered.iter()
            .filter_map(|code| self.course(code))
            .fold(0u32, |total, c| total.saturating_add(c.credits))
    }

    /**
    Prerequisites of course `code` that student `student_id` hasn't met.

    A prerequisite is met when the student registered for a course with
    that code and holds a grade in it worth at least the configured pass
    points (4.0, a D, by default).
    */
    pub fn unmet_prerequisites(
        &self,
        student_id: &str,
        code: &str,
    ) -> Result<Vec<String>> {
        let course = self.require_course(code)?;
        let student = self.require_student(student_id)?;

        let unmet: Vec<String> = course.prerequisites.iter()
            .filter(|prereq| {
                let passed = student.is_registered(prereq) && match student.grade(prereq) {
                    Some(g) => g.points() >= self.rules.pass_points,
                    None => false,
                };
                !passed
            })
            .cloned()
            .collect();

        Ok(unmet)
    }

    pub fn prerequisites_met(&self, student_id: &str, code: &str) -> Result<bool> {
        Ok(self.unmet_prerequisites(student_id, code)?.is_empty())
    }

    /**
    Register student `student_id` for course `code`.

    Declines, in the order checked, with `CourseFull`,
    `CreditLimitExceeded`, and (only if the rules say to enforce them)
    `PrerequisitesNotMet`. A declined registration changes nothing.
    */
    pub fn register(
        &mut self,
        student_id: &str,
        code: &str,
    ) -> Result<Registration> {
        log::trace!("AcademicDirectory::register( {:?}, {:?} ) called.", student_id, code);

        let course = self.require_course(code)?;
        let student = self.require_student(student_id)?;

        if self.roster(code).len() >= course.capacity as usize {
            log::warn!("Course {} is full; {} not registered.", code, student_id);
            return Err(Error::CourseFull {
                code: code.to_owned(),
                capacity: course.capacity,
            });
        }

        if self.on_roster(code, student_id) {
            log::info!("{} is already registered for {}.", student_id, code);
            return Ok(Registration::AlreadyRegistered);
        }

        // Saturates, so an absurd credit value is simply over the limit.
        let attempted = self.credits_of(student).saturating_add(course.credits);
        if attempted > self.rules.credit_limit {
            log::warn!(
                "{} registering for {} would carry {} credits; declined.",
                student_id, code, &attempted
            );
            return Err(Error::CreditLimitExceeded {
                code: code.to_owned(),
                attempted,
                limit: self.rules.credit_limit,
            });
        }

        if self.rules.enforce_prerequisites {
            let missing = self.unmet_prerequisites(student_id, code)?;
            if !missing.is_empty() {
                log::warn!(
                    "{} lacks prerequisites {:?} for {}; declined.",
                    student_id, &missing, code
                );
                return Err(Error::PrerequisitesNotMet {
                    code: code.to_owned(),
                    missing,
                });
            }
        }

        self.rosters.entry(code.to_owned())
            .or_default()
            .push(student_id.to_owned());
        // Presence was checked by `require_student()` above.
        if let Some(s) = self.student_mut(student_id) {
            s.registered.push(code.to_owned());
        }

        log::info!("Registered {} for {}.", student_id, code);
        Ok(Registration::Registered)
    }

    /**
    Drop course `code` for student `student_id`, as of `today`.

    Fails with `DropWindowClosed` on any day after the configured drop
    deadline. Dropping takes the student off the roster, out of the
    registration list, and discards any grade recorded for the course.
    */
    pub fn drop_course(
        &mut self,
        student_id: &str,
        code: &str,
        today: Date,
    ) -> Result<DropOutcome> {
        log::trace!(
            "AcademicDirectory::drop_course( {:?}, {:?}, {} ) called.",
            student_id, code, &today
        );

        self.require_course(code)?;
        let student = self.require_student(student_id)?;

        if today > self.rules.drop_deadline {
            log::warn!("Drop deadline {} has passed; {} stays in {}.",
                &self.rules.drop_deadline, student_id, code);
            return Err(Error::DropWindowClosed {
                code: code.to_owned(),
                deadline: self.rules.drop_deadline,
            });
        }

        if !student.is_registered(code) {
            log::info!("{} is not registered for {}; nothing to drop.", student_id, code);
            return Ok(DropOutcome::NotRegistered);
        }

        if let Some(ids) = self.rosters.get_mut(code) {
            ids.retain(|id| id != student_id);
            if ids.is_empty() {
                self.rosters.remove(code);
            }
        }
        if let Some(s) = self.student_mut(student_id) {
            s.registered.retain(|c| c != code);
            s.grades.remove(code);
        }

        log::info!("Dropped {} from {}.", student_id, code);
        Ok(DropOutcome::Dropped)
    }

    /// `drop_course()` as of the current UTC date.
    pub fn drop_course_now(
        &mut self,
        student_id: &str,
        code: &str,
    ) -> Result<DropOutcome> {
        let today = OffsetDateTime::now_utc().date();
        self.drop_course(student_id, code, today)
    }

    /// Catalog courses offered in `semester`, in catalog order.
    pub fn available_courses(&self, semester: u32) -> Vec<&Course> {
        self.courses.iter()
            .filter(|c| c.semester == semester)
            .collect()
    }

    /// Registered courses that run in the student's current semester.
    pub fn weekly_schedule(&self, student_id: &str) -> Result<Vec<&Course>> {
        let student = self.require_student(student_id)?;
        let courses = student.registered.iter()
            .filter_map(|code| self.course(code))
            .filter(|c| c.semester == student.semester)
            .collect();
        Ok(courses)
    }

    /// The roster of course `code`, as seen by its professor.
    pub fn enrolled_students(
        &self,
        professor_id: &str,
        code: &str,
    ) -> Result<Vec<&Student>> {
        let course = self.require_course(code)?;
        self.require_professor(professor_id)?;
        if course.professor != professor_id {
            return Err(Error::unauthorized(
                professor_id,
                format!("view the roster of {}", code),
            ));
        }

        let students = self.roster(code).iter()
            .filter_map(|id| self.student(id))
            .collect();
        Ok(students)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::tests::small_directory;
    use crate::course::Course;
    use crate::grade::Grade;
    use crate::tests::ensure_logging;
    use crate::user::{BaseUser, Student, User};

    use time::macros::date;

    fn add_students(d: &mut AcademicDirectory, n: usize) -> Vec<String> {
        (0..n).map(|k| {
            let id = format!("X{:04}", k);
            let email = format!("x{}@university.com", k);
            d.users.push(User::Student(Student::new(BaseUser::new(&email, "pw"), &id, 1)));
            id
        }).collect()
    }

    fn assert_symmetric(d: &AcademicDirectory) {
        d.check_integrity().unwrap();
    }

    #[test]
    fn register_and_drop() {
        ensure_logging();
        let mut d = small_directory();

        assert_eq!(d.register("S001", "CS101").unwrap(), Registration::Registered);
        assert_eq!(d.register("S001", "CS101").unwrap(), Registration::AlreadyRegistered);
        assert_eq!(d.roster("CS101"), &["S001".to_owned()]);
        assert_eq!(d.student("S001").unwrap().registered, vec!["CS101".to_owned()]);
        assert_eq!(d.credit_load("S001").unwrap(), 4);
        assert_symmetric(&d);

        let out = d.drop_course("S001", "CS101", date!(2024 - 11 - 30)).unwrap();
        assert_eq!(out, DropOutcome::Dropped);
        assert!(d.roster("CS101").is_empty());
        assert!(d.student("S001").unwrap().registered.is_empty());
        assert_symmetric(&d);

        let out = d.drop_course("S001", "CS101", date!(2024 - 11 - 30)).unwrap();
        assert_eq!(out, DropOutcome::NotRegistered);
    }

    #[test]
    fn full_course_declines() {
        ensure_logging();
        let mut d = small_directory();
        d.course_mut("CS101").unwrap().capacity = 150;
        let ids = add_students(&mut d, 151);

        for id in ids[..150].iter() {
            d.register(id, "CS101").unwrap();
        }
        assert!(d.is_full("CS101").unwrap());

        let err = d.register(&ids[150], "CS101").unwrap_err();
        assert!(matches!(err, Error::CourseFull { capacity: 150, .. }));
        assert_eq!(d.roster("CS101").len(), 150);
        assert!(d.student(&ids[150]).unwrap().registered.is_empty());
        assert_symmetric(&d);
    }

    #[test]
    fn credit_limit_declines() {
        ensure_logging();
        let mut d = small_directory();
        for (n, credits) in [4, 4, 4, 4, 2].iter().enumerate() {
            let code = format!("EL{}", n);
            d.courses.push(Course::new(&code, "Elective", "P002", *credits, &[], 1, "TBA", 30));
            d.register("S002", &code).unwrap();
        }
        assert_eq!(d.credit_load("S002").unwrap(), 18);

        let err = d.register("S002", "CS101").unwrap_err();
        assert!(matches!(err, Error::CreditLimitExceeded { attempted: 22, limit: 20, .. }));
        assert_eq!(d.credit_load("S002").unwrap(), 18);
        assert!(d.roster("CS101").is_empty());
        assert_symmetric(&d);

        // Two more credits fit exactly.
        d.register("S002", "CS203").unwrap();
        assert_eq!(d.credit_load("S002").unwrap(), 20);
    }

    #[test]
    fn enormous_course_declines() {
        ensure_logging();
        let mut d = small_directory();
        d.register("S001", "CS101").unwrap();
        d.courses.push(Course::new("BIG", "Everything", "P002", u32::MAX, &[], 1, "TBA", 30));

        let err = d.register("S001", "BIG").unwrap_err();
        assert!(matches!(err, Error::CreditLimitExceeded { attempted: u32::MAX, .. }));
        assert_eq!(d.credit_load("S001").unwrap(), 4);
        assert!(d.roster("BIG").is_empty());
        assert_symmetric(&d);
    }

    #[test]
    fn drop_after_deadline() {
        ensure_logging();
        let mut d = small_directory();
        d.register("S001", "CS101").unwrap();

        let err = d.drop_course("S001", "CS101", date!(2024 - 12 - 02)).unwrap_err();
        assert!(matches!(err, Error::DropWindowClosed { .. }));
        assert_eq!(d.student("S001").unwrap().registered, vec!["CS101".to_owned()]);
        assert_eq!(d.roster("CS101").len(), 1);

        // The deadline day itself is still open.
        let out = d.drop_course("S001", "CS101", date!(2024 - 12 - 01)).unwrap();
        assert_eq!(out, DropOutcome::Dropped);
    }

    #[test]
    fn drop_discards_grade() {
        ensure_logging();
        let mut d = small_directory();
        d.register("S001", "CS101").unwrap();
        d.assign_grade("S001", "CS101", Grade::B).unwrap();
        d.drop_course("S001", "CS101", date!(2024 - 09 - 01)).unwrap();
        assert!(d.student("S001").unwrap().grades.is_empty());
        assert_symmetric(&d);
    }

    #[test]
    fn prerequisites() {
        ensure_logging();
        let mut d = small_directory();

        assert_eq!(
            d.unmet_prerequisites("S003", "CS203").unwrap(),
            vec!["CS101".to_owned(), "CS102".to_owned()]
        );

        d.register("S003", "CS101").unwrap();
        d.register("S003", "CS102").unwrap();
        d.assign_grade("S003", "CS101", Grade::D).unwrap();
        d.assign_grade("S003", "CS102", Grade::F).unwrap();
        assert_eq!(d.unmet_prerequisites("S003", "CS203").unwrap(), vec!["CS102".to_owned()]);

        d.assign_grade("S003", "CS102", Grade::from("C-")).unwrap();
        assert!(d.prerequisites_met("S003", "CS203").unwrap());
    }

    #[test]
    fn prerequisites_only_enforced_when_configured() {
        ensure_logging();
        let mut d = small_directory();
        assert_eq!(d.register("S001", "CS102").unwrap(), Registration::Registered);

        d.rules.enforce_prerequisites = true;
        let err = d.register("S002", "CS102").unwrap_err();
        match err {
            Error::PrerequisitesNotMet { missing, .. } => {
                assert_eq!(missing, vec!["CS101".to_owned()]);
            },
            e => panic!("unexpected error: {:?}", e),
        }
        assert!(!d.on_roster("CS102", "S002"));
        assert_symmetric(&d);
    }

    #[test]
    fn unknown_keys() {
        ensure_logging();
        let mut d = small_directory();
        assert!(matches!(d.register("S999", "CS101"), Err(Error::NotFound { kind: "student", .. })));
        assert!(matches!(d.register("S001", "CS999"), Err(Error::NotFound { kind: "course", .. })));
        assert!(d.is_full("CS999").is_err());
    }

    #[test]
    fn capacity_holds_under_churn() {
        ensure_logging();
        let mut d = small_directory();
        let ids = add_students(&mut d, 8);
        let day = date!(2024 - 10 - 01);

        for round in 0..4 {
            for (n, id) in ids.iter().enumerate() {
                if (n + round) % 3 == 0 {
                    let _ = d.drop_course(id, "CS101", day);
                } else {
                    let _ = d.register(id, "CS101");
                }
                assert!(d.roster("CS101").len() <= 3);
            }
            assert_symmetric(&d);
        }
    }

    #[test]
    fn schedules_and_offerings() {
        ensure_logging();
        let mut d = small_directory();
        d.register("S003", "CS101").unwrap();
        d.register("S003", "CS102").unwrap();

        let sched: Vec<&str> = d.weekly_schedule("S003").unwrap()
            .iter().map(|c| c.schedule.as_str()).collect();
        assert_eq!(sched, vec!["Tue-Thu 12:00-1:30"]);

        let offered: Vec<&str> = d.available_courses(3)
            .iter().map(|c| c.code.as_str()).collect();
        assert_eq!(offered, vec!["CS203"]);
        assert!(d.available_courses(7).is_empty());
    }

    #[test]
    fn professor_roster_view() {
        ensure_logging();
        let mut d = small_directory();
        d.register("S002", "CS101").unwrap();
        d.register("S001", "CS101").unwrap();

        let ids: Vec<&str> = d.enrolled_students("P001", "CS101").unwrap()
            .iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["S002", "S001"]);

        assert!(matches!(
            d.enrolled_students("P002", "CS101"),
            Err(Error::Unauthorized { .. })
        ));
    }
}
