/*!
Configuration: where the snapshot lives and the enrollment rules.
*/
use std::path::{Path, PathBuf};

use serde::Deserialize;
use time::{Date, macros::{date, format_description}};

#[derive(Deserialize)]
struct ConfigFile {
    snapshot_path: Option<String>,
    seed_dir: Option<String>,
    admin_email: Option<String>,
    admin_password: Option<String>,
    drop_deadline: Option<String>,
    credit_limit: Option<u32>,
    pass_points: Option<f64>,
    enforce_prerequisites: Option<bool>,
}

/// The knobs the enrollment ledger and academic record consult.
#[derive(Clone, Debug, PartialEq)]
pub struct Rules {
    /// Drops are refused on any day after this one.
    pub drop_deadline: Date,
    /// Most credits a student may be registered for at once.
    pub credit_limit: u32,
    /// Grade points needed in a course for it to count as a prerequisite.
    pub pass_points: f64,
    /// Whether `register` checks prerequisites.
    pub enforce_prerequisites: bool,
}

impl std::default::Default for Rules {
    fn default() -> Self {
        Self {
            drop_deadline: date!(2024 - 12 - 01),
            credit_limit: 20,
            pass_points: 4.0,
            enforce_prerequisites: false,
        }
    }
}

#[derive(Debug)]
pub struct Cfg {
    pub snapshot_path: PathBuf,
    /// If set, a fresh directory is seeded from `students.csv`,
    /// `professors.csv` and `courses.csv` in here instead of the built-in data.
    pub seed_dir: Option<PathBuf>,
    pub default_admin_email: String,
    pub default_admin_password: String,
    pub rules: Rules,
}

impl std::default::Default for Cfg {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from("registrar.json"),
            seed_dir: None,
            default_admin_email: "ad123@xyz.com".to_owned(),
            default_admin_password: "pa1234".to_owned(),
            rules: Rules::default(),
        }
    }
}

pub fn parse_date(s: &str) -> Result<Date, String> {
    Date::parse(s.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|e| format!("Error parsing {:?} as YYYY-MM-DD date: {}", s, &e))
}

impl Cfg {
    pub fn from_toml(file_contents: &str) -> Result<Self, String> {
        let cf: ConfigFile = toml::from_str(file_contents)
            .map_err(|e| format!("Unable to deserialize config file: {}", &e))?;

        let mut c = Self::default();

        if let Some(s) = cf.snapshot_path {
            c.snapshot_path = PathBuf::from(s);
        }
        if let Some(s) = cf.seed_dir {
            c.seed_dir = Some(PathBuf::from(s));
        }
        if let Some(s) = cf.admin_email {
            c.default_admin_email = s;
        }
        if let Some(s) = cf.admin_password {
            c.default_admin_password = s;
        }
        if let Some(s) = cf.drop_deadline {
            c.rules.drop_deadline = parse_date(&s)?;
        }
        if let Some(n) = cf.credit_limit {
            if n == 0 {
                return Err("credit_limit must be positive.".to_owned());
            }
            c.rules.credit_limit = n;
        }
        if let Some(x) = cf.pass_points {
            if !(0.0..=10.0).contains(&x) {
                return Err(format!("pass_points {} is off the 0-10 grade-point scale.", &x));
            }
            c.rules.pass_points = x;
        }
        if let Some(b) = cf.enforce_prerequisites {
            c.rules.enforce_prerequisites = b;
        }

        Ok(c)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let file_contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Unable to read config file {}: {}", path.display(), &e))?;
        Self::from_toml(&file_contents)
    }
}
