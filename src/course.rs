/*!
Courses in the catalog and the feedback students leave on them.
*/
use std::io::Read;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FeedbackBody {
    Rating(u8),
    Text(String),
}

impl std::fmt::Display for FeedbackBody {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            FeedbackBody::Rating(n) => write!(f, "{}/5", n),
            FeedbackBody::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    /// Id of the student who left it.
    pub student: String,
    pub body: FeedbackBody,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub code: String,
    pub title: String,
    /// Id of the owning professor.
    pub professor: String,
    pub credits: u32,
    /// Course codes; not checked against the catalog.
    pub prerequisites: Vec<String>,
    pub semester: u32,
    pub schedule: String,
    pub capacity: u32,
    pub(crate) feedback: Vec<Feedback>,
}

/// The fields a course's owner is allowed to change.
#[derive(Clone, Debug, PartialEq)]
pub struct CourseUpdate {
    pub credits: u32,
    pub prerequisites: Vec<String>,
    pub schedule: String,
}

impl Course {
    pub fn new(
        code: &str,
        title: &str,
        professor: &str,
        credits: u32,
        prerequisites: &[&str],
        semester: u32,
        schedule: &str,
        capacity: u32,
    ) -> Course {
        Course {
            code: code.to_owned(),
            title: title.to_owned(),
            professor: professor.to_owned(),
            credits,
            prerequisites: prerequisites.iter().map(|s| s.to_string()).collect(),
            semester,
            schedule: schedule.to_owned(),
            capacity,
            feedback: Vec::new(),
        }
    }

    pub fn feedback(&self) -> &[Feedback] { &self.feedback }

    pub(crate) fn apply(&mut self, update: CourseUpdate) {
        self.credits = update.credits;
        self.prerequisites = update.prerequisites;
        self.schedule = update.schedule;
    }

    /**
    Course .csv rows should look like this

    ```csv
    #code, title,       professor, credits, prerequisites, semester, schedule,            capacity
    CS102, Data Structures, P001,  4,       CS101,         2,        Tue-Thu 12:00-1:30,  150
    ```

    Multiple prerequisites are separated by semicolons; a blank column
    means none.
    */
    pub fn from_csv_line(
        row: &csv::StringRecord
    ) -> Result<Course, String> {
        log::trace!("Course::from_csv_line( {:?} ) called.", row);

        fn field<'a>(row: &'a csv::StringRecord, n: usize, name: &str) -> Result<&'a str, String> {
            match row.get(n) {
                Some(s) => Ok(s),
                None => Err(format!("no {}", name)),
            }
        }

        fn positive(row: &csv::StringRecord, n: usize, name: &str) -> Result<u32, String> {
            let s = field(row, n, name)?;
            match s.parse::<u32>() {
                Ok(n) if n > 0 => Ok(n),
                _ => Err(format!("Unable to parse {:?} as {}.", s, name)),
            }
        }

        let code = field(row, 0, "course code")?;
        if code.is_empty() {
            return Err("no course code".into());
        }
        let prerequisites: Vec<&str> = field(row, 4, "prerequisites")?
            .split(';')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();

        let c = Course::new(
            code,
            field(row, 1, "title")?,
            field(row, 2, "professor id")?,
            positive(row, 3, "credits")?,
            &prerequisites,
            positive(row, 5, "semester")?,
            field(row, 6, "schedule")?,
            positive(row, 7, "capacity")?,
        );
        Ok(c)
    }

    pub fn vec_from_csv_reader<R: Read>(r: R) -> Result<Vec<Course>, String> {
        log::trace!("Course::vec_from_csv_reader(...) called.");

        let mut csv_reader = csv::ReaderBuilder::new()
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .flexible(false)
            .has_headers(false)
            .from_reader(r);

        let mut courses: Vec<Course> = Vec::new();
        for (n, res) in csv_reader.records().enumerate() {
            let record = res.map_err(|e| format!("Error in CSV record {}: {}", &n, &e))?;
            let crs = Course::from_csv_line(&record).map_err(|e| match record.position() {
                Some(p) => format!("Error on line {}: {}", p.line(), &e),
                None => format!("Error in CSV record {}: {}", &n, &e),
            })?;
            courses.push(crs);
        }

        log::trace!(
            "Course::vec_from_csv_reader() returns {} Courses.",
            courses.len()
        );
        Ok(courses)
    }
}

impl std::fmt::Display for Course {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} ({})", &self.title, &self.code)
    }
}
