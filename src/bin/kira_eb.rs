use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use kira_entrez_batch::app::App;
use kira_entrez_batch::config::ConfigLoader;
use kira_entrez_batch::entrez::SystemEntrezClient;
use kira_entrez_batch::error::KiraError;
use kira_entrez_batch::output::ConsoleOutput;

#[derive(Parser)]
#[command(name = "kira-eb")]
#[command(
    about = "Generate and execute Entrez Direct commands from a CSV accession list"
)]
#[command(version, author)]
struct Cli {
    /// Input CSV file containing `accession` and `id` columns
    #[arg(short, long)]
    input: String,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(kira) = report.downcast_ref::<KiraError>() {
            return ExitCode::from(map_exit_code(kira));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &KiraError) -> u8 {
    match error {
        KiraError::InputRead(_)
        | KiraError::InputParse(_)
        | KiraError::MissingColumn(_)
        | KiraError::ConfigRead(_)
        | KiraError::ConfigParse(_) => 2,
        KiraError::MissingTool(_)
        | KiraError::CommandFailed { .. }
        | KiraError::OutputTimeout { .. } => 3,
        KiraError::Filesystem(_) => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = ConfigLoader::resolve(&cli.input, None)?;
    let app = App::new(settings, SystemEntrezClient::new());
    let result = app.execute(&ConsoleOutput)?;
    ConsoleOutput::print_summary(&result);
    Ok(())
}
