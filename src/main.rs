use clap::{Arg, ArgAction, Command};
use serde_json::json;
use std::path::PathBuf;
use tracing::error;
use uuid::Uuid;

use scribe_worker::{pipeline, Config, RunIdentifiers};

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout carries exactly one JSON status line.
    tracing_subscriber::fmt()
        .with_env_filter("scribe_worker=info,warn")
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("scribe-worker")
        .version("0.1.0")
        .about("Transcript extraction and entity/tone/style/safety classification")
        .arg(
            Arg::new("file")
                .long("file")
                .value_name("PATH")
                .help("Media file to analyze (text, audio or video)")
                .required(true),
        )
        .arg(
            Arg::new("analysis-id")
                .long("analysis-id")
                .value_name("ID")
                .help("Identifier for this analysis run")
                .required(true),
        )
        .arg(
            Arg::new("transcript-id")
                .long("transcript-id")
                .value_name("ID")
                .help("Transcript identifier (generated when omitted)"),
        )
        .arg(
            Arg::new("creator-id")
                .long("creator-id")
                .value_name("ID")
                .help("Creator identifier (generated when omitted)"),
        )
        .arg(
            Arg::new("no-db")
                .long("no-db")
                .help("Skip the database insert")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let file = PathBuf::from(matches.get_one::<String>("file").expect("required arg"));
    let ids = RunIdentifiers {
        analysis_id: matches
            .get_one::<String>("analysis-id")
            .expect("required arg")
            .clone(),
        transcript_id: matches
            .get_one::<String>("transcript-id")
            .cloned()
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        creator_id: matches
            .get_one::<String>("creator-id")
            .cloned()
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
    };
    let no_db = matches.get_flag("no-db");

    let config = Config::from_env();

    let outcome = pipeline::run(&config, &file, ids, no_db).await.and_then(
        |record| Ok(serde_json::to_string(&record)?),
    );

    match outcome {
        Ok(line) => println!("{}", line),
        Err(e) => {
            error!("Run failed: {}", e);
            println!("{}", json!({ "status": "failed", "error": e.to_string() }));
            std::process::exit(1);
        }
    }
}
