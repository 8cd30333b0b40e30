use cardpro::{
    args::{Args, Commands},
    commands,
    config::Config,
    logging,
    repository::repository::Repository,
    service::service::Service,
};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::from_args(&args)?;
    logging::init(&config.log_filter);

    tracing::debug!(database = %config.database_path.display(), "starting");
    let repository = Repository::open(&config.database_path).await?;
    let service = Service::new(repository);

    let command = args.command.unwrap_or(Commands::Interactive);
    commands::run(&service, command, config.json).await
}
