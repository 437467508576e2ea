use movie_recommender::{config::Config, services};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        train = %config.train_path.display(),
        test = %config.test_path.display(),
        output = %config.output_path.display(),
        mode = ?config.similarity_mode,
        "Starting recommendation run"
    );

    let summary = services::run(&config)?;
    if summary.failed > 0 {
        tracing::warn!(failed = summary.failed, "Some queries could not be answered");
    }

    Ok(())
}
