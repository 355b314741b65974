/*!
Complaints students file and administrators resolve.
*/
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Pending,
    Resolved,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let token = match self {
            Status::Pending  => "PENDING",
            Status::Resolved => "RESOLVED",
        };

        write!(f, "{}", token)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Complaint {
    /// 1-based, in order of submission.
    pub id: u32,
    /// Id of the student who filed it.
    pub student: String,
    pub description: String,
    pub status: Status,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_tokens() {
        assert_eq!(Status::Pending.to_string(), "PENDING");
        assert_eq!(Status::Resolved.to_string(), "RESOLVED");
    }
}
