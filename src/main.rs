use anyhow::Result;
use clap::Parser;
use clap_repl::reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory};
use clap_repl::ClapEditor;
use poll_station::config::Config;
use poll_station::registry::Registry;
use poll_station::routes::mount;
use rocket::http::Method;
use rocket_cors::{AllowedOrigins, CorsOptions};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "poll-station", about = "Tiny in-memory polling server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Parser, Clone, Debug)]
#[command(name = "")]
pub enum Command {
    StartServer,
}

fn main() -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_ansi(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    match cli.command {
        Some(command) => process_command(command),
        None => cli_main(),
    }
}

fn process_command(command: Command) -> Result<()> {
    match command {
        Command::StartServer => {
            let config = Config::load()?;
            rocket::execute(start_server(config))?;
        }
    }
    Ok(())
}

pub fn cli_main() -> Result<()> {
    let prompt = DefaultPrompt {
        left_prompt: DefaultPromptSegment::Basic("poll-station".to_owned()),
        ..DefaultPrompt::default()
    };
    let rl = ClapEditor::<Command>::builder()
        .with_prompt(Box::new(prompt))
        .with_editor_hook(|reed| {
            match FileBackedHistory::with_file(10000, "/tmp/poll-station-history".into()) {
                Ok(history) => reed.with_history(Box::new(history)),
                Err(e) => {
                    tracing::warn!("No command history: {e}");
                    reed
                }
            }
        })
        .build();
    rl.repl(|command| {
        if let Err(e) = process_command(command) {
            tracing::error!("{e}");
        }
    });

    Ok(())
}

pub async fn start_server(config: Config) -> Result<()> {
    let cors = CorsOptions::default()
        .allowed_origins(AllowedOrigins::all())
        .allowed_methods(
            vec![Method::Get, Method::Post]
                .into_iter()
                .map(From::from)
                .collect(),
        )
        .allow_credentials(true);

    let figment = rocket::Config::figment()
        .merge(("address", config.address))
        .merge(("port", config.port));
    let registry = Registry::new(config.max_stations, config.max_polls);
    tracing::info!("Listening on {}:{}", config.address, config.port);

    mount(rocket::custom(figment), registry, &config.static_dir)
        .attach(cors.to_cors()?)
        .launch()
        .await?;
    Ok(())
}
