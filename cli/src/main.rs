use std::io::stdout;

use clap::Parser;
use color_eyre::Result;
use engine::Fooocus;
use fooocus_client::{
    Settings,
    cli::{Cli, Command},
    load_config,
};
use log::debug;

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init();
    color_eyre::install()?;

    let cli = Cli::parse();
    let settings = Settings::resolve(&cli, load_config()?);
    debug!("{settings:#?}");

    let fooocus = Fooocus::new(settings.api_url).with_output_dir(settings.output_dir);
    let mut out = stdout();
    match &cli.command {
        Some(Command::Status { job_id }) => {
            engine::check_job(&fooocus, job_id, &mut out).await?;
        }
        None => {
            engine::run(&fooocus, &cli.generate.to_request(), &mut out).await?;
        }
    }

    Ok(())
}
