//! etc Compiler Driver
//!
//! Reads the main module (plus the stdlib prelude), runs the front-end and
//! reports diagnostics. Exits non-zero if anything failed.

use clap::Parser;
use etc_common::ErrorReporter;
use etc_frontend::{AstPrinter, CompileOptions, Frontend, Module, PRELUDE_FILE};
use log::{debug, LevelFilter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "etc")]
#[command(about = "etc compiler front-end")]
#[command(version = "0.1.0")]
struct Cli {
    /// Build for tests: a `main` function is not required
    #[arg(short = 't', long)]
    test_build: bool,

    /// Main module source file
    #[arg(short = 'm', long = "main")]
    main: PathBuf,

    /// Standard library directory; its prelude.etc is loaded first
    #[arg(short = 'l', long = "stdlib")]
    stdlib: Option<PathBuf>,

    /// Print the checked program back in source form
    #[arg(long)]
    print_ast: bool,

    /// Dump the annotated tree as JSON
    #[arg(long)]
    dump_json: bool,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();
}

fn emit(module: &Module, print_ast: bool, dump_json: bool) -> Result<(), etc_common::CompilerError> {
    if print_ast {
        println!("{}", AstPrinter::new().print_module(module));
    }
    if dump_json {
        println!("{}", Frontend::module_to_json(module)?);
    }
    Ok(())
}

fn run(cli: &Cli, main_path: &Path, reporter: &mut ErrorReporter) {
    let options = CompileOptions {
        test_build: cli.test_build,
        stdlib_path: cli.stdlib.clone(),
    };
    debug!("compile options: {options:?}");

    if let Some(stdlib) = &options.stdlib_path {
        if !stdlib.join(PRELUDE_FILE).is_file() {
            reporter.warning(
                format!("no {PRELUDE_FILE} in {}, compiling without a prelude", stdlib.display()),
                None,
            );
        }
    }

    let result = Frontend::compile_file(main_path, &options).and_then(|module| {
        debug!("{} items checked", module.items.len());
        emit(&module, cli.print_ast, cli.dump_json)
    });

    if let Err(e) = result {
        reporter.report(&e);
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut reporter = ErrorReporter::new();
    run(&cli, &cli.main, &mut reporter);

    if !reporter.diagnostics().is_empty() {
        reporter.print_diagnostics();
        eprintln!("{}", reporter.summary());
    }

    if reporter.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
