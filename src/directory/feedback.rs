/*!
Course feedback from students.
*/
use super::AcademicDirectory;
use crate::{
    course::{Feedback, FeedbackBody},
    error::{Error, Result},
};

impl AcademicDirectory {
    /// Attach feedback from student `student_id` to course `code`.
    /// Numeric ratings must be in 1..=5.
    pub fn give_feedback(
        &mut self,
        student_id: &str,
        code: &str,
        body: FeedbackBody,
    ) -> Result<()> {
        log::trace!(
            "AcademicDirectory::give_feedback( {:?}, {:?}, {:?} ) called.",
            student_id, code, &body
        );

        if let FeedbackBody::Rating(n) = body {
            if !(1..=5).contains(&n) {
                return Err(Error::InvalidRating(n));
            }
        }
        self.require_student(student_id)?;
        let course = self.course_mut(code)
            .ok_or_else(|| Error::not_found("course", code))?;

        course.feedback.push(Feedback {
            student: student_id.to_owned(),
            body,
        });
        log::info!("Feedback from {} recorded for {}.", student_id, code);
        Ok(())
    }

    /// Feedback left on course `code`, as seen by its professor.
    pub fn course_feedback(
        &self,
        professor_id: &str,
        code: &str,
    ) -> Result<&[Feedback]> {
        let course = self.require_course(code)?;
        self.require_professor(professor_id)?;
        if course.professor != professor_id {
            return Err(Error::unauthorized(
                professor_id,
                format!("view feedback for {}", code),
            ));
        }
        Ok(course.feedback())
    }
}
