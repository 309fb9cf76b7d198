use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use walkdir::WalkDir;

const SUPPORTED_EXTENSIONS: [&str; 3] = ["pdf", "docx", "txt"];

#[derive(Parser)]
#[command(
    name = "polysumm-cli",
    about = "Submit documents to a running Polysumm server"
)]
struct Cli {
    /// Base URL of the Polysumm HTTP server.
    #[arg(long, global = true, default_value = "http://127.0.0.1:4100")]
    server: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Summarize inline text or a single file.
    Summarize {
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long, default_value = "medium")]
        length: String,
        #[arg(long)]
        language: Option<String>,
        /// Print the full JSON response instead of the summary text.
        #[arg(long)]
        json: bool,
    },
    /// Summarize every pdf, docx, and txt file under a directory.
    Batch {
        #[arg(long)]
        dir: PathBuf,
        #[arg(long, default_value = "medium")]
        length: String,
        #[arg(long)]
        language: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    source: String,
    detected_language: String,
    model_used: String,
    summary_length: String,
    summary: String,
    chunk_count: usize,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

enum Input {
    Text(String),
    File(PathBuf),
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let endpoint = format!("{}/summarize", cli.server.trim_end_matches('/'));

    match cli.command {
        Command::Summarize {
            text,
            file,
            length,
            language,
            json,
        } => {
            let input = match (text, file) {
                (Some(text), None) => Input::Text(text),
                (None, Some(path)) => Input::File(path),
                _ => bail!("provide exactly one of --text or --file"),
            };
            let response =
                submit(&client, &endpoint, input, &length, language.as_deref()).await?;
            if json {
                print_json(&response);
            } else {
                println!("{}", response.summary);
            }
            Ok(())
        }
        Command::Batch {
            dir,
            length,
            language,
        } => run_batch(&client, &endpoint, &dir, &length, language.as_deref()).await,
    }
}

async fn run_batch(
    client: &reqwest::Client,
    endpoint: &str,
    dir: &Path,
    length: &str,
    language: Option<&str>,
) -> Result<()> {
    let files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file() && is_supported(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    if files.is_empty() {
        bail!("no pdf, docx, or txt files found under {}", dir.display());
    }

    let mut failures = 0usize;
    for path in files {
        match submit(client, endpoint, Input::File(path.clone()), length, language).await {
            Ok(response) => {
                println!(
                    "## {} [{}, {}, {} chunks]\n{}\n",
                    response.source,
                    response.detected_language,
                    response.model_used,
                    response.chunk_count,
                    response.summary
                );
            }
            Err(err) => {
                failures += 1;
                eprintln!("{}: {err:#}", path.display());
            }
        }
    }

    if failures > 0 {
        bail!("{failures} file(s) failed to summarize");
    }
    Ok(())
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}

async fn submit(
    client: &reqwest::Client,
    endpoint: &str,
    input: Input,
    length: &str,
    language: Option<&str>,
) -> Result<SummaryResponse> {
    let mut form = Form::new().text("length", length.to_string());
    if let Some(language) = language {
        form = form.text("language", language.to_string());
    }
    form = match input {
        Input::Text(text) => form.text("text", text),
        Input::File(path) => {
            let bytes = fs::read(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let file_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .ok_or_else(|| anyhow!("invalid file name: {}", path.display()))?
                .to_string();
            form.part("file", Part::bytes(bytes).file_name(file_name))
        }
    };

    let response = client
        .post(endpoint)
        .multipart(form)
        .send()
        .await
        .with_context(|| format!("failed to reach {endpoint}"))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|parsed| parsed.error)
            .unwrap_or(body);
        bail!("server returned {status}: {message}");
    }

    response
        .json::<SummaryResponse>()
        .await
        .context("failed to decode summary response")
}

fn print_json(response: &SummaryResponse) {
    let value = serde_json::json!({
        "source": response.source,
        "detected_language": response.detected_language,
        "model_used": response.model_used,
        "summary_length": response.summary_length,
        "summary": response.summary,
        "chunk_count": response.chunk_count,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
    );
}
