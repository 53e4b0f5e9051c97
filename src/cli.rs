//! Command-line dispatch and log filter selection for the binary.

use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::db;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP server (no argument).
    Serve,
    /// Create the schema at `DATABASE_FILE` and exit.
    InitDb,
}

impl Command {
    /// Picks the command from the arguments after the program name.
    pub fn parse<I, A>(args: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = A>,
        A: AsRef<str>,
    {
        let mut args = args.into_iter();
        let command = match args.next() {
            None => Command::Serve,
            Some(arg) => match arg.as_ref() {
                "serve" => Command::Serve,
                "init-db" => Command::InitDb,
                other => return Err(format!("unknown command {other:?}")),
            },
        };
        match args.next() {
            Some(extra) => Err(format!("unexpected argument {:?}", extra.as_ref())),
            None => Ok(command),
        }
    }
}

/// `RUST_LOG` wins when it holds a valid filter, else `debug` or `info`
/// depending on the `DEBUG` setting.
pub fn log_filter(debug: bool, rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default_level(debug)))
}

pub fn default_level(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "info"
    }
}

pub fn init_db(config: &Config) -> rusqlite::Result<()> {
    let conn = db::create_db(&config.database_file)?;
    db::close_db(conn)
}
