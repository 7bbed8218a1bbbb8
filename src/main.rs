use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use zkb::cli::{self, CliError, Outcome};
use zkb::workspace::find_root;
use zkb::{Session, StoreError};

mod logging;

const ROOT_HELP: &str = "\
The project must have a root directory whose name ends with .zkb, and the
current directory must be the root or one of its lines.

Example: Project.zkb
    Project.zkb
    |- 1 IsEven(num [int]) [bool]
       |- 1 return a % 2 == 0
    |- 2 main() [int]
       |- 1 print('Hello, World\\n')
       |- 2 println('3 is even?')
       |- 3 println(IsEven(3))
       |- 4 return 0
";

/// Edit a line-numbered outline stored as directories
#[derive(Parser, Debug)]
#[command(name = "zkb")]
#[command(version, about, long_about = None)]
struct Args {
    /// Start directory (defaults to the current directory)
    #[arg(short = 'C', long)]
    root: Option<PathBuf>,

    /// Log filter, e.g. `zkb=debug` (also: ZKB_LOG)
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,

    /// Override the log directory
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Mirror logs to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let _logging = logging::init(args.log_dir.as_deref(), args.log_level.as_deref(), args.verbose);

    let start = match args.root.map(Ok).unwrap_or_else(std::env::current_dir) {
        Ok(start) => start,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let start = std::fs::canonicalize(&start).unwrap_or(start);

    let root = match find_root(&start) {
        Ok(root) => root,
        Err(StoreError::RootNotFound(_)) => {
            print!("{}", ROOT_HELP);
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut session = match Session::open(&root) {
        Ok(session) => session,
        Err(e) => {
            tracing::error!(root = %root.display(), error = %e, "failed to open session");
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Start in the line the user is standing in, if it is below the root.
    if let Ok(relative) = start.strip_prefix(&root) {
        for component in relative.components() {
            let name = component.as_os_str().to_string_lossy();
            let Ok(key) = zkb::models::OrderKey::parse(&name) else {
                break;
            };
            if session.enter(key.key).is_err() {
                break;
            }
        }
    }

    match run(&mut session) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(session: &mut Session) -> io::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut stdout = io::stdout();

    loop {
        write!(stdout, "{}> ", session.breadcrumb().join("/"))?;
        stdout.flush()?;

        let Some(line) = lines.next().transpose()? else {
            return Ok(());
        };

        let request = match cli::parse(&line) {
            Ok(Some(request)) => request,
            Ok(None) => continue,
            Err(e) => {
                report(&e);
                continue;
            }
        };

        let mut confirm = |question: &str| {
            print!("{}", question);
            if io::stdout().flush().is_err() {
                return false;
            }
            matches!(
                lines.next(),
                Some(Ok(answer)) if answer.trim().eq_ignore_ascii_case("y")
            )
        };

        match cli::execute(session, &request, &mut confirm) {
            Ok(Outcome::Continue(output)) => {
                for line in output {
                    writeln!(stdout, "{}", line)?;
                }
            }
            Ok(Outcome::Quit) => return Ok(()),
            Err(e) => report(&e),
        }
    }
}

fn report(error: &CliError) {
    tracing::debug!(error = %error, "command failed");
    eprintln!("error: {}", error);
}
