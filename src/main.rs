/*!
Open (or seed) the registrar's directory and report what's in it.

```text
registrar [CONFIG_FILE]
```

With no config file the defaults apply and the snapshot lives at
`registrar.json` in the working directory.
*/
use simplelog::{ColorChoice, TerminalMode, TermLogger};

use registrar::config::Cfg;

fn run() -> Result<(), String> {
    let cfg = match std::env::args().nth(1) {
        Some(path) => Cfg::from_file(&path)?,
        None => Cfg::default(),
    };
    log::info!("Configuration:\n{:#?}", &cfg);

    let (dir, store) = registrar::seed::open(&cfg)
        .map_err(|e| format!("Unable to open directory: {}", &e))?;

    println!("Snapshot: {}", store.path().display());
    println!(
        "{} users, {} courses, {} complaints.",
        dir.users().len(), dir.courses().len(), dir.complaints().len()
    );
    for c in dir.courses() {
        println!(
            "  {:<8} {:<28} {:>2} cr  sem {}  {:>3}/{:<3}  {}",
            &c.code, &c.title, &c.credits, &c.semester,
            dir.roster(&c.code).len(), &c.capacity, &c.schedule
        );
    }

    Ok(())
}

fn main() {
    let log_cfg = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("registrar")
        .build();
    if let Err(e) = TermLogger::init(
        registrar::log_level_from_env(),
        log_cfg,
        TerminalMode::Stderr,
        ColorChoice::Auto
    ) {
        eprintln!("Unable to start logging: {}", &e);
    }
    log::info!("Logging started.");

    if let Err(e) = run() {
        log::error!("{}", &e);
        eprintln!("{}", &e);
        std::process::exit(1);
    }
}
