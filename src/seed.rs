/*!
Bootstrapping: opening the directory a process will work with.

If a snapshot exists it is restored. Otherwise the directory is seeded,
either from CSV files in the configured `seed_dir` or from a small built-in
data set, and the seed is snapshotted straight away. Either way the default
administrator is guaranteed to exist.
*/
use std::io::Read;
use std::path::Path;

use crate::{
    config::{Cfg, Rules},
    course::Course,
    directory::AcademicDirectory,
    error::{Error, Result},
    store::Store,
    user::{BaseUser, Professor, Student, User},
};

static STUDENTS: &[(&str, &str, &str, u32)] = &[
    ("john@university.com", "password123", "S001", 1),
    ("jane@university.com", "password456", "S002", 1),
    ("sam@university.com",  "password789", "S003", 2),
];

static PROFESSORS: &[(&str, &str, &str)] = &[
    ("dr.smith@university.com", "pass123", "P001"),
    ("dr.jones@university.com", "pass456", "P002"),
];

static COURSES: &[(&str, &str, &str, u32, &[&str], u32, &str, u32)] = &[
    ("CS101", "Intro to CS",         "P001", 4, &[],        1, "Mon-Wed 10:00-11:30", 150),
    ("CS102", "Data Structures",     "P001", 4, &["CS101"], 2, "Tue-Thu 12:00-1:30",  150),
    ("CS201", "Algorithms",          "P002", 4, &["CS102"], 3, "Mon-Wed 10:00-11:30", 150),
    ("CS202", "Operating Systems",   "P002", 4, &["CS201"], 2, "Tue-Thu 12:00-1:30",  150),
    ("CS203", "Computer Networks",   "P002", 2, &["CS201"], 3, "Fri 10:00-12:00",     150),
];

/// The built-in data set: three students, two professors, five courses.
pub fn builtin(rules: Rules) -> Result<AcademicDirectory> {
    log::trace!("seed::builtin() called.");

    let mut d = AcademicDirectory::new(rules);
    for (email, password, id, semester) in STUDENTS.iter() {
        let s = Student::new(BaseUser::new(email, password), id, *semester);
        d.add_user(User::Student(s))?;
    }
    for (email, password, id) in PROFESSORS.iter() {
        d.add_user(User::Professor(Professor::new(BaseUser::new(email, password), id)))?;
    }
    for (code, title, prof, credits, prereqs, semester, schedule, capacity) in COURSES.iter() {
        d.add_course(Course::new(code, title, prof, *credits, prereqs, *semester, schedule, *capacity))?;
    }
    Ok(d)
}

/**
Professor .csv rows should look like this

```csv
#id,  email,                   password
P001, dr.smith@university.com, pass123
```
*/
pub fn professors_from_csv_reader<R: Read>(r: R) -> std::result::Result<Vec<Professor>, String> {
    log::trace!("professors_from_csv_reader(...) called.");

    let mut csv_reader = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .flexible(false)
        .has_headers(false)
        .from_reader(r);

    let mut profs: Vec<Professor> = Vec::new();
    for (n, res) in csv_reader.records().enumerate() {
        let record = res.map_err(|e| format!("Error in CSV record {}: {}", &n, &e))?;
        match (record.get(0), record.get(1), record.get(2)) {
            (Some(id), Some(email), Some(password)) if !id.is_empty() && !email.is_empty() => {
                profs.push(Professor::new(BaseUser::new(email, password), id));
            },
            _ => { return Err(format!("Error in CSV record {}: need id, email, password", &n)); },
        }
    }
    Ok(profs)
}

fn open_csv(dir: &Path, name: &str) -> Result<std::fs::File> {
    let path = dir.join(name);
    std::fs::File::open(&path).map_err(|e| {
        log::error!("Unable to open seed file {}: {}", path.display(), &e);
        Error::Io(e)
    })
}

/// Seed from `students.csv`, `professors.csv`, and `courses.csv` in `dir`.
pub fn from_csv_dir(dir: &Path, rules: Rules) -> Result<AcademicDirectory> {
    log::trace!("seed::from_csv_dir( {} ) called.", dir.display());

    let students = Student::vec_from_csv_reader(open_csv(dir, "students.csv")?)
        .map_err(|e| Error::BadSeed(format!("students.csv: {}", e)))?;
    let profs = professors_from_csv_reader(open_csv(dir, "professors.csv")?)
        .map_err(|e| Error::BadSeed(format!("professors.csv: {}", e)))?;
    let courses = Course::vec_from_csv_reader(open_csv(dir, "courses.csv")?)
        .map_err(|e| Error::BadSeed(format!("courses.csv: {}", e)))?;

    let mut d = AcademicDirectory::new(rules);
    for s in students {
        d.add_user(User::Student(s))?;
    }
    for p in profs {
        d.add_user(User::Professor(p))?;
    }
    for c in courses {
        d.add_course(c)?;
    }

    log::info!(
        "Seeded {} users and {} courses from {}.",
        d.users().len(), d.courses().len(), dir.display()
    );
    Ok(d)
}

fn ensure_default_admin(d: &mut AcademicDirectory, cfg: &Cfg) -> Result<bool> {
    match d.user_by_email(&cfg.default_admin_email) {
        Some(u) => {
            if !u.base().login(&cfg.default_admin_email, &cfg.default_admin_password) {
                log::warn!("Default Admin ({}) not using default password.", &cfg.default_admin_email);
            }
            Ok(false)
        },
        None => {
            log::info!(
                "Default Admin ({}) doesn't exist; inserting.",
                &cfg.default_admin_email
            );
            let admin = BaseUser::new(&cfg.default_admin_email, &cfg.default_admin_password);
            d.add_user(User::Admin(admin))?;
            Ok(true)
        },
    }
}

/**
Restore the directory from the configured snapshot, or seed a fresh one and
snapshot it.

A corrupt snapshot is an error; it is never silently replaced with seed
data.
*/
pub fn open(cfg: &Cfg) -> Result<(AcademicDirectory, Store)> {
    log::trace!("seed::open() called.");

    let store = Store::new(&cfg.snapshot_path);
    let mut d = AcademicDirectory::new(cfg.rules.clone());
    let restored = d.restore(&store)?;

    if !restored {
        d = match &cfg.seed_dir {
            Some(dir) => from_csv_dir(dir, cfg.rules.clone())?,
            None => builtin(cfg.rules.clone())?,
        };
    }

    let admin_added = ensure_default_admin(&mut d, cfg)?;
    if !restored || admin_added {
        store.save(&d)?;
    }

    Ok((d, store))
}
