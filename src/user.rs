/*!
Directory users: students, professors, and administrators.
*/
use std::collections::BTreeMap;
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::grade::Grade;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Admin,
    Professor,
    Student,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let token = match self {
            Role::Admin     => "Admin",
            Role::Professor => "Professor",
            Role::Student   => "Student",
        };

        write!(f, "{}", token)
    }
}

/// Login credentials every kind of user carries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BaseUser {
    pub email: String,
    /// Compared, never hashed.
    pub password: String,
}

impl BaseUser {
    pub fn new(email: &str, password: &str) -> Self {
        Self { email: email.to_owned(), password: password.to_owned() }
    }

    pub fn login(&self, email: &str, password: &str) -> bool {
        self.email == email && self.password == password
    }
}

/// Extra powers a student holds while acting as a teaching assistant.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TaCapability {
    /// Codes of the courses this student assists in.
    pub courses: Vec<String>,
}

impl TaCapability {
    pub fn covers(&self, code: &str) -> bool {
        self.courses.iter().any(|c| c == code)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub base: BaseUser,
    pub id: String,
    pub semester: u32,
    /// Course codes in registration order.
    pub registered: Vec<String>,
    /// Keyed by course code; only ever holds registered courses.
    pub grades: BTreeMap<String, Grade>,
    #[serde(default)]
    pub ta: Option<TaCapability>,
}

impl Student {
    pub fn new(base: BaseUser, id: &str, semester: u32) -> Self {
        Self {
            base,
            id: id.to_owned(),
            semester,
            registered: Vec::new(),
            grades: BTreeMap::new(),
            ta: None,
        }
    }

    pub fn is_registered(&self, code: &str) -> bool {
        self.registered.iter().any(|c| c == code)
    }

    pub fn grade(&self, code: &str) -> Option<&Grade> {
        self.grades.get(code)
    }

    pub fn is_ta_for(&self, code: &str) -> bool {
        match &self.ta {
            Some(cap) => cap.covers(code),
            None => false,
        }
    }

    /**
    Student .csv rows should look like this

    ```csv
    #id,  email,               password,    semester
    S001, john@university.com, password123, 1
    ```
    */
    pub fn from_csv_line(
        row: &csv::StringRecord
    ) -> Result<Student, String> {
        log::trace!("Student::from_csv_line( {:?} ) called.", row);

        let id = match row.get(0) {
            Some(s) if !s.is_empty() => s,
            _ => { return Err("no student id".into()); }
        };
        let email = match row.get(1) {
            Some(s) if !s.is_empty() => s,
            _ => { return Err("no email address".into()); },
        };
        let password = match row.get(2) {
            Some(s) => s,
            None => { return Err("no password".into()); },
        };
        let semester: u32 = match row.get(3) {
            Some(s) => match s.parse() {
                Ok(n) if n > 0 => n,
                _ => { return Err(format!("Unable to parse {:?} as semester.", s)); },
            },
            None => { return Err("no semester".into()); },
        };

        Ok(Student::new(BaseUser::new(email, password), id, semester))
    }

    pub fn vec_from_csv_reader<R: Read>(r: R) -> Result<Vec<Student>, String> {
        log::trace!("Student::vec_from_csv_reader(...) called.");

        let mut csv_reader = csv::ReaderBuilder::new()
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .flexible(false)
            .has_headers(false)
            .from_reader(r);

        let mut students: Vec<Student> = Vec::new();

        for (n, res) in csv_reader.records().enumerate() {
            let record = res.map_err(|e| match e.position() {
                Some(p) => format!("Error on line {}: {}", p.line(), &e),
                None => format!("Error in CSV record {}: {}", &n, &e),
            })?;
            let stud = Student::from_csv_line(&record).map_err(|e| match record.position() {
                Some(p) => format!("Error on line {}: {}", p.line(), &e),
                None => format!("Error in CSV record {}: {}", &n, &e),
            })?;
            students.push(stud);
        }

        log::trace!(
            "Student::vec_from_csv_reader() returns {} Students.",
            students.len()
        );
        Ok(students)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Professor {
    pub base: BaseUser,
    pub id: String,
}

impl Professor {
    pub fn new(base: BaseUser, id: &str) -> Self {
        Self { base, id: id.to_owned() }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role")]
pub enum User {
    Admin(BaseUser),
    Professor(Professor),
    Student(Student),
}

impl User {
    pub fn base(&self) -> &BaseUser {
        match self {
            User::Admin(base) => base,
            User::Professor(p) => &p.base,
            User::Student(s) => &s.base,
        }
    }

    pub fn email(&self) -> &str { &self.base().email }

    pub fn role(&self) -> Role {
        match self {
            User::Admin(_) => Role::Admin,
            User::Professor(_) => Role::Professor,
            User::Student(_) => Role::Student,
        }
    }

    pub fn as_student(&self) -> Option<&Student> {
        match self {
            User::Student(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_student_mut(&mut self) -> Option<&mut Student> {
        match self {
            User::Student(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_professor(&self) -> Option<&Professor> {
        match self {
            User::Professor(p) => Some(p),
            _ => None,
        }
    }
}
