/*!
The `AcademicDirectory`: every user, course, complaint, and roster.

A directory is constructed once and passed by reference to whatever needs
it; nothing here is global. Operations are split by concern across the
submodules, each adding methods to `AcademicDirectory`:

  * `ledger`: registering for and dropping courses
  * `record`: grades, GPA, transcripts, and teaching assistants
  * `catalog`: adding, removing, and updating courses
  * `complaints`: the complaint log
  * `feedback`: course feedback
  * `accounts`: sign-up, login, and student record updates

Entities refer to each other by key (student id, professor id, course code)
rather than by pointer, so every reference resolves to the one entry held
here. The enrollment ledger (`rosters`) is authoritative; each student's
registration list is kept in step with it by every operation that touches
either.
*/
use std::collections::{BTreeMap, HashSet};

use crate::{
    complaint::Complaint,
    config::Rules,
    course::{Course, FeedbackBody},
    error::{Error, Result},
    user::{Professor, Student, User},
};

pub mod accounts;
pub mod catalog;
pub mod complaints;
pub mod feedback;
pub mod ledger;
pub mod record;

#[derive(Clone, Debug, PartialEq)]
pub struct AcademicDirectory {
    pub(crate) rules: Rules,
    pub(crate) users: Vec<User>,
    pub(crate) courses: Vec<Course>,
    pub(crate) complaints: Vec<Complaint>,
    /// Course code -> student ids, in enrollment order.
    pub(crate) rosters: BTreeMap<String, Vec<String>>,
}

impl AcademicDirectory {
    pub fn new(rules: Rules) -> Self {
        log::trace!("AcademicDirectory::new( {:?} ) called.", &rules);

        Self {
            rules,
            users: Vec::new(),
            courses: Vec::new(),
            complaints: Vec::new(),
            rosters: BTreeMap::new(),
        }
    }

    pub fn rules(&self) -> &Rules { &self.rules }

    pub fn users(&self) -> &[User] { &self.users }

    pub fn courses(&self) -> &[Course] { &self.courses }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.courses.is_empty()
    }

    pub fn course(&self, code: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.code == code)
    }

    pub(crate) fn course_mut(&mut self, code: &str) -> Option<&mut Course> {
        self.courses.iter_mut().find(|c| c.code == code)
    }

    pub(crate) fn require_course(&self, code: &str) -> Result<&Course> {
        self.course(code).ok_or_else(|| Error::not_found("course", code))
    }

    pub fn student(&self, id: &str) -> Option<&Student> {
        self.users.iter()
            .filter_map(|u| u.as_student())
            .find(|s| s.id == id)
    }

    pub(crate) fn student_mut(&mut self, id: &str) -> Option<&mut Student> {
        self.users.iter_mut()
            .filter_map(|u| u.as_student_mut())
            .find(|s| s.id == id)
    }

    pub(crate) fn require_student(&self, id: &str) -> Result<&Student> {
        self.student(id).ok_or_else(|| Error::not_found("student", id))
    }

    pub fn professor(&self, id: &str) -> Option<&Professor> {
        self.users.iter()
            .filter_map(|u| u.as_professor())
            .find(|p| p.id == id)
    }

    pub(crate) fn require_professor(&self, id: &str) -> Result<&Professor> {
        self.professor(id).ok_or_else(|| Error::not_found("professor", id))
    }

    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users.iter().find(|u| u.email() == email)
    }

    /// Student ids enrolled in course `code`, in enrollment order.
    pub fn roster(&self, code: &str) -> &[String] {
        match self.rosters.get(code) {
            Some(ids) => ids.as_slice(),
            None => &[],
        }
    }

    pub(crate) fn on_roster(&self, code: &str, student_id: &str) -> bool {
        self.roster(code).iter().any(|id| id == student_id)
    }

    /**
    Check every cross-reference and uniqueness constraint in the graph.

    Returns a description of the first problem found. The credit limit is
    not checked here: it is an admission rule that depends on configuration,
    enforced when registering and when a course's credits change.
    */
    pub fn check_integrity(&self) -> std::result::Result<(), String> {
        log::trace!("AcademicDirectory::check_integrity() called.");

        let mut emails: HashSet<&str> = HashSet::new();
        let mut student_ids: HashSet<&str> = HashSet::new();
        let mut professor_ids: HashSet<&str> = HashSet::new();
        for u in self.users.iter() {
            if !emails.insert(u.email()) {
                return Err(format!("duplicate email {:?}", u.email()));
            }
            match u {
                User::Student(s) => if !student_ids.insert(&s.id) {
                    return Err(format!("duplicate student id {:?}", &s.id));
                },
                User::Professor(p) => if !professor_ids.insert(&p.id) {
                    return Err(format!("duplicate professor id {:?}", &p.id));
                },
                User::Admin(_) => {},
            }
        }

        let mut codes: HashSet<&str> = HashSet::new();
        for c in self.courses.iter() {
            if !codes.insert(&c.code) {
                return Err(format!("duplicate course code {:?}", &c.code));
            }
            if !professor_ids.contains(c.professor.as_str()) {
                return Err(format!(
                    "course {} refers to unknown professor {:?}",
                    &c.code, &c.professor
                ));
            }
            if c.credits == 0 || c.capacity == 0 {
                return Err(format!("course {} has zero credits or capacity", &c.code));
            }
            for fb in c.feedback.iter() {
                if !student_ids.contains(fb.student.as_str()) {
                    return Err(format!(
                        "feedback on {} from unknown student {:?}",
                        &c.code, &fb.student
                    ));
                }
                if let FeedbackBody::Rating(n) = &fb.body {
                    if !(1..=5).contains(n) {
                        return Err(format!(
                            "feedback on {} from {} has rating {} outside 1-5",
                            &c.code, &fb.student, n
                        ));
                    }
                }
            }
        }

        for (code, ids) in self.rosters.iter() {
            let course = match self.course(code) {
                Some(c) => c,
                None => { return Err(format!("roster for unknown course {:?}", code)); },
            };
            if ids.len() > course.capacity as usize {
                return Err(format!(
                    "roster of {} holds {} students; capacity is {}",
                    code, ids.len(), &course.capacity
                ));
            }
            let mut seen: HashSet<&str> = HashSet::new();
            for id in ids.iter() {
                if !seen.insert(id) {
                    return Err(format!("student {:?} appears twice on roster of {}", id, code));
                }
                match self.student(id) {
                    None => {
                        return Err(format!("roster of {} refers to unknown student {:?}", code, id));
                    },
                    Some(s) => if !s.is_registered(code) {
                        return Err(format!(
                            "student {} is on roster of {} but not registered for it",
                            id, code
                        ));
                    },
                }
            }
        }

        for s in self.users.iter().filter_map(|u| u.as_student()) {
            if s.semester == 0 {
                return Err(format!("student {} has semester 0", &s.id));
            }
            let mut seen: HashSet<&str> = HashSet::new();
            for code in s.registered.iter() {
                if !seen.insert(code) {
                    return Err(format!("student {} registered twice for {}", &s.id, code));
                }
                if self.course(code).is_none() {
                    return Err(format!(
                        "student {} registered for unknown course {:?}",
                        &s.id, code
                    ));
                }
                if !self.on_roster(code, &s.id) {
                    return Err(format!(
                        "student {} registered for {} but missing from its roster",
                        &s.id, code
                    ));
                }
            }
            for code in s.grades.keys() {
                if !s.is_registered(code) {
                    return Err(format!(
                        "student {} has a grade for unregistered course {:?}",
                        &s.id, code
                    ));
                }
            }
            if let Some(cap) = &s.ta {
                for code in cap.courses.iter() {
                    if self.course(code).is_none() {
                        return Err(format!(
                            "student {} assists in unknown course {:?}",
                            &s.id, code
                        ));
                    }
                }
            }
        }

        for (n, c) in self.complaints.iter().enumerate() {
            if c.id as usize != n + 1 {
                return Err(format!("complaint #{} is out of sequence", &c.id));
            }
            if !student_ids.contains(c.student.as_str()) {
                return Err(format!(
                    "complaint #{} filed by unknown student {:?}",
                    &c.id, &c.student
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::tests::ensure_logging;
    use crate::user::BaseUser;

    /// A small directory: two professors, four students, three courses.
    pub fn small_directory() -> AcademicDirectory {
        let mut d = AcademicDirectory::new(Rules::default());
        d.users.push(User::Admin(BaseUser::new("admin@university.com", "root")));
        for (id, email) in [("P001", "smith@university.com"), ("P002", "jones@university.com")] {
            d.users.push(User::Professor(Professor::new(BaseUser::new(email, "pw"), id)));
        }
        for (id, sem) in [("S001", 1), ("S002", 1), ("S003", 2), ("S004", 3)] {
            let email = format!("{}@university.com", id.to_ascii_lowercase());
            d.users.push(User::Student(Student::new(BaseUser::new(&email, "pw"), id, sem)));
        }
        d.courses.push(Course::new("CS101", "Intro to CS", "P001", 4, &[], 1, "Mon-Wed 10:00-11:30", 3));
        d.courses.push(Course::new("CS102", "Data Structures", "P001", 4, &["CS101"], 2, "Tue-Thu 12:00-1:30", 150));
        d.courses.push(Course::new("CS203", "Computer Networks", "P002", 2, &["CS101", "CS102"], 3, "Fri 10:00-12:00", 150));
        d
    }

    #[test]
    fn lookups() {
        ensure_logging();
        let d = small_directory();

        assert_eq!(d.student("S003").unwrap().semester, 2);
        assert!(d.student("P001").is_none());
        assert_eq!(d.professor("P002").unwrap().base.email, "jones@university.com");
        assert_eq!(d.course("CS102").unwrap().title, "Data Structures");
        assert!(d.roster("CS101").is_empty());
        assert!(matches!(d.require_course("XX999"), Err(Error::NotFound { .. })));
        d.check_integrity().unwrap();
    }

    #[test]
    fn integrity_catches_asymmetry() {
        ensure_logging();
        let mut d = small_directory();
        d.rosters.insert("CS101".to_owned(), vec!["S001".to_owned()]);
        let err = d.check_integrity().unwrap_err();
        assert!(err.contains("not registered"), "{}", &err);

        let mut d = small_directory();
        d.student_mut("S002").unwrap().registered.push("CS102".to_owned());
        let err = d.check_integrity().unwrap_err();
        assert!(err.contains("missing from its roster"), "{}", &err);
    }

    #[test]
    fn integrity_catches_bad_rating() {
        ensure_logging();
        let mut d = small_directory();
        d.give_feedback("S002", "CS102", FeedbackBody::Rating(3)).unwrap();
        d.check_integrity().unwrap();

        d.course_mut("CS102").unwrap().feedback[0].body = FeedbackBody::Rating(9);
        let err = d.check_integrity().unwrap_err();
        assert!(err.contains("rating 9"), "{}", &err);
    }

    #[test]
    fn integrity_catches_dangling_professor() {
        ensure_logging();
        let mut d = small_directory();
        d.course_mut("CS203").unwrap().professor = "P404".to_owned();
        let err = d.check_integrity().unwrap_err();
        assert!(err.contains("P404"), "{}", &err);
    }
}
