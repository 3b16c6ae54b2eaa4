use std::io;

use birdpost::api::ApiClient;
use birdpost::auth::ConsolePinPrompt;
use birdpost::config::RunConfig;
use birdpost::images::ThreadRngPicker;
use birdpost::pipeline::{self, RunContext, RunOutcome};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Starting birdpost");

    let config = RunConfig::from_env();
    let api = ApiClient::new(&config)?;
    let pin_prompt = ConsolePinPrompt;
    let mut picker = ThreadRngPicker;

    let mut ctx = RunContext::new(&config, &api, &pin_prompt, &mut picker)?;
    let mut stdout = io::stdout();

    match pipeline::run(&mut ctx, &mut stdout).await? {
        RunOutcome::Completed => log::info!("Run completed"),
        RunOutcome::Aborted => log::warn!("Run aborted; see {}", config.log_file.display()),
    }

    Ok(())
}
