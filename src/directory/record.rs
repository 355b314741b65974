/*!
Academic records: grades, GPA, and teaching-assistant grading.
*/
use super::AcademicDirectory;
use crate::{
    error::{Error, Result},
    grade::Grade,
    user::TaCapability,
};

/// One line of a student's transcript.
#[derive(Clone, Debug, PartialEq)]
pub struct TranscriptLine<'a> {
    pub code: &'a str,
    pub title: &'a str,
    pub credits: u32,
    pub grade: Option<&'a Grade>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Transcript<'a> {
    pub student: &'a str,
    pub lines: Vec<TranscriptLine<'a>>,
    pub gpa: f64,
}

impl AcademicDirectory {
    /**
    Record `grade` for student `student_id` in course `code`, replacing any
    grade already there.

    The student must be on the course's roster, else `NotEnrolled`.
    */
    pub fn assign_grade(
        &mut self,
        student_id: &str,
        code: &str,
        grade: Grade,
    ) -> Result<()> {
        log::trace!(
            "AcademicDirectory::assign_grade( {:?}, {:?}, {} ) called.",
            student_id, code, &grade
        );

        self.require_course(code)?;
        self.require_student(student_id)?;
        if !self.on_roster(code, student_id) {
            log::warn!("{} is not enrolled in {}; no grade recorded.", student_id, code);
            return Err(Error::NotEnrolled {
                student: student_id.to_owned(),
                code: code.to_owned(),
            });
        }

        if let Some(s) = self.student_mut(student_id) {
            if let Some(old) = s.grades.insert(code.to_owned(), grade) {
                log::info!("Replaced {}'s grade of {} in {}.", student_id, &old, code);
            }
        }
        Ok(())
    }

    /**
    Credit-weighted mean of grade points over the student's graded courses.

    Registered courses with no grade yet don't count. A student with no
    graded credits has a GPA of exactly 0.0.
    */
    pub fn gpa(&self, student_id: &str) -> Result<f64> {
        let student = self.require_student(student_id)?;

        let mut points = 0.0_f64;
        let mut credits = 0u32;
        for code in student.registered.iter() {
            let (course, grade) = match (self.course(code), student.grade(code)) {
                (Some(c), Some(g)) => (c, g),
                _ => continue,
            };
            points += grade.points() * course.credits as f64;
            credits += course.credits;
        }

        if credits == 0 {
            Ok(0.0)
        } else {
            Ok(points / credits as f64)
        }
    }

    /// Every registered course with its grade (if any), plus the GPA.
    pub fn transcript(&self, student_id: &str) -> Result<Transcript<'_>> {
        let student = self.require_student(student_id)?;

        let lines = student.registered.iter()
            .filter_map(|code| self.course(code))
            .map(|c| TranscriptLine {
                code: &c.code,
                title: &c.title,
                credits: c.credits,
                grade: student.grade(&c.code),
            })
            .collect();

        Ok(Transcript {
            student: &student.id,
            lines,
            gpa: self.gpa(student_id)?,
        })
    }

    /// Let student `student_id` act as a teaching assistant in course `code`.
    pub fn grant_ta(&mut self, student_id: &str, code: &str) -> Result<()> {
        log::trace!("AcademicDirectory::grant_ta( {:?}, {:?} ) called.", student_id, code);

        self.require_course(code)?;
        let student = self.student_mut(student_id)
            .ok_or_else(|| Error::not_found("student", student_id))?;

        let cap = student.ta.get_or_insert_with(TaCapability::default);
        if !cap.covers(code) {
            cap.courses.push(code.to_owned());
            log::info!("{} is now a TA for {}.", student_id, code);
        }
        Ok(())
    }

    fn require_ta(&self, ta_id: &str, code: &str) -> Result<()> {
        let ta = self.require_student(ta_id)?;
        if ta.is_ta_for(code) {
            Ok(())
        } else {
            Err(Error::unauthorized(ta_id, format!("act as a TA for {}", code)))
        }
    }

    /// Each student on course `code`'s roster with their grade, for a TA.
    pub fn ta_view_grades(
        &self,
        ta_id: &str,
        code: &str,
    ) -> Result<Vec<(&str, Option<&Grade>)>> {
        self.require_course(code)?;
        self.require_ta(ta_id, code)?;

        let grades = self.roster(code).iter()
            .filter_map(|id| self.student(id))
            .map(|s| (s.id.as_str(), s.grade(code)))
            .collect();
        Ok(grades)
    }

    pub fn ta_assign_grade(
        &mut self,
        ta_id: &str,
        student_id: &str,
        code: &str,
        grade: Grade,
    ) -> Result<()> {
        self.require_course(code)?;
        self.require_ta(ta_id, code)?;
        self.assign_grade(student_id, code, grade)
    }
}
