use avurna_scout::core::config::load_scout_config;
use avurna_scout::types::AnalyzeRequest;
use avurna_scout::{analyze, AppState};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
        .ok();

    let message = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if message.trim().is_empty() {
        eprintln!("Usage: analyze-url <message containing a URL>");
        eprintln!("  e.g. analyze-url \"chart revenue on example.com/report maxPages 8\"");
        eprintln!("\nEnv:");
        eprintln!("  AVURNA_SCOUT_CONFIG=path/to/avurna-scout.json (optional)");
        eprintln!("  OPENAI_API_KEY=... (optional, enables the abstractive summary)");
        std::process::exit(2);
    }

    let http_timeout = std::env::var("HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(45);
    let http_client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(http_timeout))
        .build()?;

    let state = Arc::new(AppState::new(http_client, load_scout_config()));
    let request = AnalyzeRequest {
        message: Some(message),
        summarize: state.llm.is_some(),
        ..Default::default()
    };

    let response = analyze::analyze_url(&state, &request).await?;
    for line in &response.trace {
        eprintln!("{}", line);
    }
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
