//! EduHub command line

use bson::Bson;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info};

use eduhub::{
    analytics::{Analytics, Report},
    config::{Args, Command},
    db::MongoClient,
    indexes, instrumentation, logging,
    seed::{self, SampleData},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    logging::init(&args.log_level, args.log_format);

    if let Err(e) = args.validate() {
        error!("{}", e);
        std::process::exit(1);
    }

    info!("MongoDB: {} (database '{}')", args.mongodb_uri, args.mongodb_db);
    let db = MongoClient::new(&args.mongodb_uri, &args.mongodb_db).await?;

    match args.command {
        Command::Seed { seed, drop } => {
            if drop {
                seed::reset(&db).await?;
            }
            let mut rng = StdRng::seed_from_u64(seed);
            let data = SampleData::generate(&mut rng, chrono::Utc::now());
            let summary = data.insert_all(&db).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Indexes => {
            let applied = indexes::apply_indexes(&db).await?;
            println!("{} index declaration(s) applied", applied);
        }
        Command::Report { report } => {
            print_report(&db, report).await?;
        }
        Command::Explain { report } => {
            let timing = instrumentation::explain_with_timing(&db, || report.query()).await?;
            let stage = instrumentation::winning_stage(&timing.plan).unwrap_or("unknown");
            info!("Report '{}' winning stage: {}", report, stage);
            println!("{}", to_json(Bson::Document(timing.plan))?);
        }
    }

    Ok(())
}

async fn print_report(db: &MongoClient, report: Report) -> anyhow::Result<()> {
    let rows = Analytics::new(db).run_raw(report).await?;
    let rows = Bson::Array(rows.into_iter().map(Bson::Document).collect());
    println!("{}", to_json(rows)?);
    Ok(())
}

fn to_json(value: Bson) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&value.into_relaxed_extjson())
}
