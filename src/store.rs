/*!
Whole-directory snapshots on disk.

A snapshot is a single JSON file:

```json
{
  "format_version": 1,
  "hash": "<sha-256 of state, lowercase hex>",
  "state": "<JSON text of the directory graph>"
}
```

The graph inside `state` holds, in order, the users, the courses, the
complaints, and the enrollment ledger. Cross-references are stored as keys
(student ids, professor ids, course codes) and are checked on the way back
in, so a restored directory has exactly one entry for each entity no matter
how many others refer to it.

Saving writes a sibling temporary file and renames it over the snapshot, so
a crash mid-save leaves the previous snapshot in place. Loading is
all-or-nothing: anything unreadable, mis-hashed, or inconsistent is a
`CorruptStore` error and nothing is returned.
*/
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{
    complaint::Complaint,
    config::Rules,
    course::Course,
    directory::AcademicDirectory,
    error::{Error, Result},
    user::User,
};

const FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct Envelope {
    format_version: u32,
    hash: String,
    state: String,
}

#[derive(Serialize)]
struct EnrollmentRef<'a> {
    course: &'a str,
    students: &'a [String],
}

#[derive(Serialize)]
struct GraphRef<'a> {
    users: &'a [User],
    courses: &'a [Course],
    complaints: &'a [Complaint],
    enrollments: Vec<EnrollmentRef<'a>>,
}

#[derive(Deserialize)]
struct Enrollment {
    course: String,
    students: Vec<String>,
}

#[derive(Deserialize)]
struct Graph {
    users: Vec<User>,
    courses: Vec<Course>,
    complaints: Vec<Complaint>,
    enrollments: Vec<Enrollment>,
}

fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        log::trace!("Store::new( {} ) called.", path.display());
        Self { path }
    }

    pub fn path(&self) -> &Path { &self.path }

    pub fn exists(&self) -> bool { self.path.exists() }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name()
            .map(|s| s.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Wrap `state_json` in a hashed envelope and atomically replace the
    /// snapshot file with it.
    fn write_state(&self, state_json: &str) -> Result<()> {
        let env = Envelope {
            format_version: FORMAT_VERSION,
            hash: sha256_hex(state_json.as_bytes()),
            state: state_json.to_owned(),
        };
        let content = serde_json::to_string_pretty(&env)
            .map_err(|e| Error::CorruptStore(format!("Unable to serialize snapshot: {}", &e)))?;

        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }

        let tmp = self.temp_path();
        let res = File::create(&tmp)
            .and_then(|mut f| {
                f.write_all(content.as_bytes())?;
                f.sync_all()
            })
            .and_then(|_| fs::rename(&tmp, &self.path));

        if let Err(e) = res {
            if let Err(rm_e) = fs::remove_file(&tmp) {
                if rm_e.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("Unable to remove {}: {}", tmp.display(), &rm_e);
                }
            }
            return Err(Error::Io(e));
        }
        Ok(())
    }

    /// Snapshot the entire directory.
    pub fn save(&self, dir: &AcademicDirectory) -> Result<()> {
        log::trace!("Store::save( [ directory ] ) called; path {}", self.path.display());

        let graph = GraphRef {
            users: &dir.users,
            courses: &dir.courses,
            complaints: &dir.complaints,
            enrollments: dir.rosters.iter()
                .map(|(code, ids)| EnrollmentRef { course: code, students: ids })
                .collect(),
        };
        let state_json = serde_json::to_string(&graph)
            .map_err(|e| Error::CorruptStore(format!("Unable to serialize directory: {}", &e)))?;

        self.write_state(&state_json).map_err(|e| {
            log::error!("Error writing snapshot {}: {}", self.path.display(), &e);
            e
        })?;

        log::info!(
            "Saved {} users, {} courses, {} complaints to {}.",
            dir.users.len(), dir.courses.len(), dir.complaints.len(),
            self.path.display()
        );
        Ok(())
    }

    /**
    Read the snapshot back into a new directory governed by `rules`.

    Returns `Ok(None)` if there is no snapshot yet.
    */
    pub fn load(&self, rules: Rules) -> Result<Option<AcademicDirectory>> {
        log::trace!("Store::load() called; path {}", self.path.display());

        if !self.path.exists() {
            log::info!("No snapshot at {}; starting fresh.", self.path.display());
            return Ok(None);
        }

        let corrupt = |msg: String| {
            log::error!("Snapshot {} is corrupt: {}", self.path.display(), &msg);
            Error::CorruptStore(msg)
        };

        let content = fs::read(&self.path)?;
        let env: Envelope = serde_json::from_slice(&content)
            .map_err(|e| corrupt(format!("bad envelope: {}", &e)))?;
        if env.format_version != FORMAT_VERSION {
            return Err(corrupt(format!(
                "format version {} (expected {})",
                &env.format_version, &FORMAT_VERSION
            )));
        }
        if sha256_hex(env.state.as_bytes()) != env.hash {
            return Err(corrupt("state does not match its hash".to_owned()));
        }

        let graph: Graph = serde_json::from_str(&env.state)
            .map_err(|e| corrupt(format!("bad state: {}", &e)))?;

        let mut dir = AcademicDirectory::new(rules);
        dir.users = graph.users;
        dir.courses = graph.courses;
        dir.complaints = graph.complaints;
        for e in graph.enrollments {
            if dir.rosters.insert(e.course.clone(), e.students).is_some() {
                return Err(corrupt(format!("two rosters for course {:?}", &e.course)));
            }
        }
        dir.check_integrity().map_err(corrupt)?;

        log::info!(
            "Loaded {} users, {} courses, {} complaints from {}.",
            dir.users.len(), dir.courses.len(), dir.complaints.len(),
            self.path.display()
        );
        Ok(Some(dir))
    }
}

impl AcademicDirectory {
    /**
    Replace this directory's contents with the snapshot in `store`.

    Returns `false`, leaving the directory as it is, if there is no
    snapshot. On error the directory is also left exactly as it was.
    The directory's current rules are kept.
    */
    pub fn restore(&mut self, store: &Store) -> Result<bool> {
        match store.load(self.rules.clone())? {
            Some(dir) => {
                *self = dir;
                Ok(true)
            },
            None => Ok(false),
        }
    }
}
