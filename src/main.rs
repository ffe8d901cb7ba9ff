use doccgen_cli::{Args, print_error};
use std::process::ExitCode;

fn main() -> ExitCode {
    // Parse before logging is set up so --help and --version stay clean
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            print_error(&error);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    doccgen_util::initialize_tracing()?;
    args.execute()
}
