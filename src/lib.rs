/*!
Course enrollment, academic records, and whole-graph persistence.

Everything hangs off an [`AcademicDirectory`](directory::AcademicDirectory),
which owns the users, the course catalog, the complaint log, and the
enrollment ledger. A [`Store`](store::Store) snapshots a directory to disk
and restores it again.
*/
pub mod complaint;
pub mod config;
pub mod course;
pub mod directory;
pub mod error;
pub mod grade;
pub mod seed;
pub mod store;
pub mod user;

pub use directory::AcademicDirectory;
pub use error::{Error, Result};
pub use store::Store;

pub fn log_level_from_env() -> simplelog::LevelFilter {
    use simplelog::LevelFilter;

    let mut level_string = match std::env::var("LOG_LEVEL") {
        Err(_) => { return LevelFilter::Warn; },
        Ok(s) => s,
    };

    level_string.make_ascii_lowercase();
    match level_string.as_str() {
        "max" => LevelFilter::max(),
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Warn,
    }
}
