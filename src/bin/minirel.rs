use std::io::{BufRead, Write, stdin, stdout};

use miette::{IntoDiagnostic, Result};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use minirel::{Database, DatabaseConfig};

const PROMPT: &str = "> ";
const EXIT: &str = "exit";

/// Logs go to stderr so query output on stdout stays clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(false)
                .context_lines(3)
                .tab_width(4)
                .break_words(true)
                .build(),
        )
    }))
    .into_diagnostic()?;
    miette::set_panic_hook();

    init_tracing();

    let mut config = DatabaseConfig::default();
    if let Ok(dir) = std::env::var("MINIREL_DATA_DIR") {
        config.data_directory = dir.into();
    }
    tracing::debug!(data_directory = %config.data_directory.display(), "starting");

    let mut db = Database::with_config(config);

    let mut stdin = stdin().lock();
    let mut stdout = stdout().lock();
    let mut buf = String::new();

    loop {
        stdout.write_all(PROMPT.as_bytes()).into_diagnostic()?;
        stdout.flush().into_diagnostic()?;

        buf.clear();
        if stdin.read_line(&mut buf).into_diagnostic()? == 0 {
            break;
        }

        let query = buf.trim_end_matches(['\n', '\r']);
        if query == EXIT {
            break;
        }
        if query.trim().is_empty() {
            continue;
        }

        let result = db.transact(query);
        if !result.is_empty() {
            writeln!(stdout, "{result}").into_diagnostic()?;
        }
    }

    Ok(())
}
