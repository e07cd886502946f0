use clap::Parser;

mod app;
mod chat;
mod classifier;
mod cli;
mod config;
mod domains;
mod embedding;
mod investors;
mod ranker;
mod web;

use config::Config;
use ranker::RankOutcome;

fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let cli::Command::Domains {} = args.command {
        // Listing labels needs neither the model nor the investor asset
        for (label, _) in domains::DOMAIN_SEEDS {
            println!("{label}");
        }
        return Ok(());
    }

    let config = Config::load_with(&args.data_dir);
    let app = app::App::new(&config)?;

    match args.command {
        cli::Command::Daemon {} => {
            web::start_daemon(app, &config.listen_addr);
            Ok(())
        }

        cli::Command::Predict { description } => {
            let predictions = app.predict_domain(&description)?;
            let labels: Vec<&str> = predictions.iter().map(|p| p.label.as_str()).collect();
            let distances: Vec<f32> = predictions.iter().map(|p| p.distance).collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "predicted_domains": labels,
                    "confidence_scores": distances,
                }))
                .unwrap()
            );
            Ok(())
        }

        cli::Command::Investors {
            domain,
            investor_type,
        } => {
            match app.find_investors(&domain, investor_type.as_deref())? {
                RankOutcome::Matches(matches) => {
                    println!("{}", serde_json::to_string_pretty(&matches).unwrap());
                }
                RankOutcome::NoMatch { domain } => {
                    println!("No investors found for domain: {domain}");
                }
            }
            Ok(())
        }

        cli::Command::Domains {} => unreachable!("handled above"),
    }
}
