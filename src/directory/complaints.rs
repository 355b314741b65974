/*!
The complaint log.
*/
use super::AcademicDirectory;
use crate::{
    complaint::{Complaint, Status},
    error::{Error, Result},
};

impl AcademicDirectory {
    /// File a new PENDING complaint on behalf of student `student_id`.
    /// Returns its id.
    pub fn submit_complaint(
        &mut self,
        student_id: &str,
        description: &str,
    ) -> Result<u32> {
        log::trace!(
            "AcademicDirectory::submit_complaint( {:?}, {:?} ) called.",
            student_id, description
        );

        self.require_student(student_id)?;
        let id = self.complaints.len() as u32 + 1;
        self.complaints.push(Complaint {
            id,
            student: student_id.to_owned(),
            description: description.to_owned(),
            status: Status::Pending,
        });

        log::info!("Complaint #{} submitted by {}.", &id, student_id);
        Ok(id)
    }

    pub fn complaints(&self) -> &[Complaint] { &self.complaints }

    pub fn set_complaint_status(&mut self, id: u32, status: Status) -> Result<()> {
        log::trace!("AcademicDirectory::set_complaint_status( {}, {} ) called.", &id, &status);

        let c = self.complaints.iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::not_found("complaint", &id.to_string()))?;
        c.status = status;

        log::info!("Complaint #{} status updated to {}.", &id, &status);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::tests::small_directory;
    use crate::tests::ensure_logging;

    #[test]
    fn submit_and_resolve() {
        ensure_logging();
        let mut d = small_directory();

        let first = d.submit_complaint("S001", "Projector in room 4 is broken.").unwrap();
        let second = d.submit_complaint("S003", "CS102 schedule clashes with MA102.").unwrap();
        assert_eq!((first, second), (1, 2));
        assert!(d.complaints().iter().all(|c| c.status == Status::Pending));

        d.set_complaint_status(second, Status::Resolved).unwrap();
        assert_eq!(d.complaints()[0].status, Status::Pending);
        assert_eq!(d.complaints()[1].status, Status::Resolved);

        assert!(matches!(
            d.set_complaint_status(9, Status::Resolved),
            Err(Error::NotFound { kind: "complaint", .. })
        ));
        assert!(d.submit_complaint("S999", "Who am I?").is_err());
        d.check_integrity().unwrap();
    }
}
