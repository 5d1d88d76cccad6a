use std::io::{self, Write};

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scholar::agent::QueryAgent;
use scholar::cli::{Command, Session};
use scholar::config::Config;
use scholar::llm::SummaryLength;

#[derive(Parser)]
#[command(name = "scholar")]
#[command(about = "Academic assistant: answer questions, suggest study tips, summarize text")]
struct Args {
    /// Summary length used by `summarize:` (brief, medium, detailed)
    #[arg(long, default_value = "brief")]
    summary_length: SummaryLength,

    /// Model to use, e.g. `openai/gpt-4o-mini` (overrides LLM_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Run a single command such as "question: What is entropy?" and exit
    #[arg(short, long)]
    command: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scholar=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let mut config = Config::from_env();
    if let Some(model) = args.model {
        config = config.with_model(model);
    }

    let agent = match QueryAgent::from_config(&config) {
        Ok(agent) => agent,
        Err(e) => {
            eprintln!("Initialization Error: {e}");
            eprintln!("Please ensure your API key is correctly set.");
            std::process::exit(1);
        }
    };

    tracing::info!(model = %agent.config().model_id, "Agent ready");

    let session = Session::new(&agent, args.summary_length);
    let mut stdout = io::stdout();

    match args.command {
        Some(line) => {
            session.execute(Command::parse(&line), &mut stdout).await?;
        }
        None => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            session.run(stdin, &mut stdout).await?;
        }
    }

    stdout.flush()?;
    Ok(())
}
