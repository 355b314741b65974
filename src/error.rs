/*!
The crate-wide error type.

Most variants are declines: the caller reports them and carries on, and the
directory is guaranteed to be unchanged. `CorruptStore`, `BadSeed`, and `Io`
come out of loading and saving, and mean the operation was abandoned.
*/

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot register. The course {code} is full ({capacity} students).")]
    CourseFull { code: String, capacity: u32 },

    #[error("Cannot register for {code}: {attempted} credits would exceed the limit of {limit}.")]
    CreditLimitExceeded { code: String, attempted: u32, limit: u32 },

    #[error("Prerequisites not met for {code}: missing {}.", .missing.join(", "))]
    PrerequisitesNotMet { code: String, missing: Vec<String> },

    #[error("Cannot drop {code}. The drop deadline ({deadline}) has passed.")]
    DropWindowClosed { code: String, deadline: time::Date },

    #[error("Student {student} is not enrolled in {code}.")]
    NotEnrolled { student: String, code: String },

    #[error("{actor} is not authorized to {action}.")]
    Unauthorized { actor: String, action: String },

    #[error("No {kind} {key:?}.")]
    NotFound { kind: &'static str, key: String },

    #[error("A course with code {0:?} already exists.")]
    DuplicateCourse(String),

    #[error("{0}")]
    DuplicateUser(String),

    #[error("A course must be worth at least one credit, not {0}.")]
    InvalidCredits(u32),

    #[error("A course must hold at least one student, not {0}.")]
    InvalidCapacity(u32),

    #[error("Semester must be a positive number, not {0}.")]
    InvalidSemester(u32),

    #[error("Rating {0} is outside the range 1-5.")]
    InvalidRating(u8),

    #[error("Snapshot store is corrupt: {0}")]
    CorruptStore(String),

    #[error("Bad seed data: {0}")]
    BadSeed(String),

    #[error("Snapshot store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn not_found(kind: &'static str, key: &str) -> Self {
        Error::NotFound { kind, key: key.to_owned() }
    }

    pub(crate) fn unauthorized(actor: &str, action: String) -> Self {
        Error::Unauthorized { actor: actor.to_owned(), action }
    }

    /// Whether the caller can report this and keep going with the same
    /// in-memory state.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::CorruptStore(_) | Error::BadSeed(_) | Error::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decline_messages() {
        let e = Error::PrerequisitesNotMet {
            code: "CS201".to_owned(),
            missing: vec!["CS101".to_owned(), "CS102".to_owned()],
        };
        assert_eq!(
            e.to_string(),
            "Prerequisites not met for CS201: missing CS101, CS102."
        );
        assert!(e.is_recoverable());

        let e = Error::not_found("course", "MA999");
        assert_eq!(e.to_string(), "No course \"MA999\".");

        let e = Error::CorruptStore("bad hash".to_owned());
        assert!(!e.is_recoverable());
    }
}
