use std::io::Read;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use vouch_extract::{extract_work_experience, ExtractorConfig};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Read resume text from the file argument (or stdin), extract, print JSON.
fn run() -> Result<(), Box<dyn std::error::Error>> {
    let raw_text = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let config = ExtractorConfig::from_env()?;
    let result = extract_work_experience(&raw_text, &config)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
