use std::fs::File;
use std::io;
use std::path::Path;

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Initializes the global logger.
///
/// Logs go to `log_file` when given, otherwise to stderr. With a file the
/// default level is info (debug when `verbose`). On stderr, which shares the
/// terminal with the game, only warnings and errors are shown unless
/// `verbose` is set. `RUST_LOG` overrides either default.
pub fn init(verbose: bool, log_file: Option<&Path>) -> io::Result<()> {
    let level = match (verbose, log_file.is_some()) {
        (true, _) => LevelFilter::Debug,
        (false, true) => LevelFilter::Info,
        (false, false) => LevelFilter::Warn,
    };

    let env = Env::default().default_filter_or(level.to_string());
    let mut builder = Builder::from_env(env);
    if let Some(path) = log_file {
        builder.target(Target::Pipe(Box::new(File::create(path)?)));
    }

    // `try_init` only fails if a logger was already set. Ignore that case so
    // tests can call `init` multiple times without panicking.
    let _ = builder.try_init();
    Ok(())
}
