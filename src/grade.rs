/*!
Letter grades and their grade-point values.
*/
use serde::{Deserialize, Serialize};

/// A recorded letter grade.
///
/// Tokens off the scale are kept verbatim in `Other` so they survive a
/// snapshot round trip; they are worth zero points.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Grade {
    A,
    AMinus,
    B,
    BMinus,
    C,
    CMinus,
    D,
    F,
    Other(String),
}

impl Grade {
    pub fn points(&self) -> f64 {
        match self {
            Grade::A      => 10.0,
            Grade::AMinus =>  9.0,
            Grade::B      =>  8.0,
            Grade::BMinus =>  7.0,
            Grade::C      =>  6.0,
            Grade::CMinus =>  5.0,
            Grade::D      =>  4.0,
            Grade::F      =>  2.0,
            Grade::Other(_) => 0.0,
        }
    }

    pub fn token(&self) -> &str {
        match self {
            Grade::A      => "A",
            Grade::AMinus => "A-",
            Grade::B      => "B",
            Grade::BMinus => "B-",
            Grade::C      => "C",
            Grade::CMinus => "C-",
            Grade::D      => "D",
            Grade::F      => "F",
            Grade::Other(s) => s.as_str(),
        }
    }
}

impl From<&str> for Grade {
    fn from(s: &str) -> Grade {
        match s.trim() {
            "A"  => Grade::A,
            "A-" => Grade::AMinus,
            "B"  => Grade::B,
            "B-" => Grade::BMinus,
            "C"  => Grade::C,
            "C-" => Grade::CMinus,
            "D"  => Grade::D,
            "F"  => Grade::F,
            x => Grade::Other(x.to_owned()),
        }
    }
}

impl From<String> for Grade {
    fn from(s: String) -> Grade { Grade::from(s.as_str()) }
}

impl From<Grade> for String {
    fn from(g: Grade) -> String {
        match g {
            Grade::Other(s) => s,
            g => g.token().to_owned(),
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}
