/*!
Account creation, login, and administrative student record updates.
*/
use super::AcademicDirectory;
use crate::{
    error::{Error, Result},
    grade::Grade,
    user::{BaseUser, Professor, Student, User},
};

/// Everything needed to sign up, by kind of account.
#[derive(Clone, Debug)]
pub enum NewAccount {
    Student { email: String, password: String, id: String, semester: u32 },
    Professor { email: String, password: String, id: String },
    Admin { email: String, password: String },
}

/// A change an administrator can make to a student's record.
#[derive(Clone, Debug, PartialEq)]
pub enum StudentUpdate {
    Semester(u32),
    Grade { course: String, grade: Grade },
}

impl AcademicDirectory {
    /// Return the user with these credentials, if any.
    pub fn authenticate(&self, email: &str, password: &str) -> Option<&User> {
        log::trace!("AcademicDirectory::authenticate( {:?}, [ password ] ) called.", email);

        self.users.iter().find(|u| u.base().login(email, password))
    }

    /**
    Add a user to the directory.

    Emails are unique across all users; student ids across students and
    professor ids across professors. A clash is `DuplicateUser`. Students
    must be in semester 1 or later, else `InvalidSemester`.
    */
    pub fn add_user(&mut self, user: User) -> Result<&User> {
        log::trace!("AcademicDirectory::add_user( {} {:?} ) called.", user.role(), user.email());

        if let Some(u) = self.user_by_email(user.email()) {
            return Err(Error::DuplicateUser(format!(
                "Email {} already belongs to a {}.",
                user.email(), u.role()
            )));
        }
        match &user {
            User::Student(s) => {
                if s.semester == 0 {
                    return Err(Error::InvalidSemester(s.semester));
                }
                if self.student(&s.id).is_some() {
                    return Err(Error::DuplicateUser(format!("Student id {} is already in use.", &s.id)));
                }
            },
            User::Professor(p) => if self.professor(&p.id).is_some() {
                return Err(Error::DuplicateUser(format!("Professor id {} is already in use.", &p.id)));
            },
            User::Admin(_) => {},
        }

        log::info!("{} account created for {}.", user.role(), user.email());
        self.users.push(user);
        Ok(&self.users[self.users.len() - 1])
    }

    pub fn create_account(&mut self, account: NewAccount) -> Result<&User> {
        let user = match account {
            NewAccount::Student { email, password, id, semester } => {
                User::Student(Student::new(BaseUser { email, password }, &id, semester))
            },
            NewAccount::Professor { email, password, id } => {
                User::Professor(Professor::new(BaseUser { email, password }, &id))
            },
            NewAccount::Admin { email, password } => {
                User::Admin(BaseUser { email, password })
            },
        };
        self.add_user(user)
    }

    pub fn update_student_record(
        &mut self,
        student_id: &str,
        update: StudentUpdate,
    ) -> Result<()> {
        log::trace!(
            "AcademicDirectory::update_student_record( {:?}, {:?} ) called.",
            student_id, &update
        );

        match update {
            StudentUpdate::Semester(n) => {
                if n == 0 {
                    return Err(Error::InvalidSemester(n));
                }
                let s = self.student_mut(student_id)
                    .ok_or_else(|| Error::not_found("student", student_id))?;
                s.semester = n;
                log::info!("Student {} moved to semester {}.", student_id, &n);
                Ok(())
            },
            StudentUpdate::Grade { course, grade } => {
                self.assign_grade(student_id, &course, grade)
            },
        }
    }
}
