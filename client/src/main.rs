use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use scopelink_client::RemoteClient;
use scopelink_shared::{
    request, set_parameters, GetMosaicSettings, GetObjective, GetStagePosition, MoveStage,
    Request, SetParameters, TakeMovie,
};

/// Remote control for a ScopeLink acquisition host
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Host address
    #[arg(long, default_value = "127.0.0.1:9360")]
    host: String,

    /// Validate and estimate without touching hardware or disk
    #[arg(long)]
    test_mode: bool,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print mosaic calibration for every objective
    MosaicSettings,
    /// Print the current objective
    Objective,
    /// Print the current stage position
    StagePosition,
    /// Move the stage to (x, y)
    MoveStage { x: f64, y: f64 },
    /// Activate a named parameter set
    SetParameters { name: String },
    /// Acquire a movie
    TakeMovie {
        directory: String,
        name: String,
        #[arg(long, default_value_t = 1)]
        length: u32,
        /// Parameter set to acquire under ("default" means the active set)
        #[arg(long)]
        parameters: Option<String>,
        #[arg(long)]
        overwrite: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let command = match args.command {
        Cmd::MosaicSettings => request::Command::GetMosaicSettings(GetMosaicSettings {}),
        Cmd::Objective => request::Command::GetObjective(GetObjective {}),
        Cmd::StagePosition => request::Command::GetStagePosition(GetStagePosition {}),
        Cmd::MoveStage { x, y } => request::Command::MoveStage(MoveStage { x, y }),
        Cmd::SetParameters { name } => request::Command::SetParameters(SetParameters {
            target: Some(set_parameters::Target::Name(name)),
        }),
        Cmd::TakeMovie {
            directory,
            name,
            length,
            parameters,
            overwrite,
        } => request::Command::TakeMovie(TakeMovie {
            directory,
            name,
            length,
            parameters,
            overwrite,
        }),
    };

    let mut request = Request::new(command);
    if args.test_mode {
        request = request.with_test_mode();
    }

    let mut client = RemoteClient::connect(&args.host, "scopelink-cli").await?;
    let response = client.send(request).await?;

    if response.has_error() {
        bail!("command failed (host reported an error)");
    }

    let mut names: Vec<&String> = response.fields.keys().collect();
    names.sort();
    for name in names {
        println!("{} = {}", name, response.fields[name]);
    }

    Ok(())
}
