use anyhow::Context;
use clap::{Arg, ArgGroup, Command};
use log::LevelFilter;
use phishguard::batch;
use phishguard::engine::RawInput;
use phishguard::{DetectionEngine, Label, PhishGuardConfig, PredictionResult};
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let matches = Command::new("phishguard")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Phishing verdicts for URLs and emails with explanations")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path (TOML or YAML)")
                .default_value(PhishGuardConfig::default_path()),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Generate a default configuration file")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("test-config")
                .long("test-config")
                .help("Load configuration and artifacts, then report the strategy of each path")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("url")
                .short('u')
                .long("url")
                .value_name("URL")
                .help("Scan a single URL"),
        )
        .arg(
            Arg::new("subject")
                .short('s')
                .long("subject")
                .value_name("TEXT")
                .requires("body")
                .help("Email subject (used with --body)"),
        )
        .arg(
            Arg::new("body")
                .short('b')
                .long("body")
                .value_name("TEXT")
                .help("Scan an email body"),
        )
        .arg(
            Arg::new("email-file")
                .short('e')
                .long("email-file")
                .value_name("FILE")
                .help("Scan an email read from a file (optional leading Subject: line)"),
        )
        .arg(
            Arg::new("batch")
                .long("batch")
                .value_name("FILE")
                .help("Scan a list of URLs, one per line"),
        )
        .group(ArgGroup::new("input").args(["url", "body", "email-file", "batch"]))
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print results as JSON")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging with per-scan detail")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    if let Some(generate_path) = matches.get_one::<String>("generate-config") {
        generate_default_config(generate_path);
        return;
    }

    let config_path = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or(PhishGuardConfig::default_path());

    let config = match PhishGuardConfig::load_or_default(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            process::exit(1);
        }
    };

    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        config.log_level().unwrap_or(LevelFilter::Info)
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    let engine = match DetectionEngine::from_config(&config) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("❌ Failed to load model artifacts: {e}");
            process::exit(1);
        }
    };

    if matches.get_flag("test-config") {
        println!("🔍 Testing configuration...");
        println!();
        println!("Model directory: {}", config.models.dir);
        println!("URL path: {} strategy", engine.url_strategy().name());
        println!("Email path: {} strategy", engine.email_strategy().name());
        println!(
            "Limits: URL {} chars, email body {} chars",
            config.limits.max_url_length, config.limits.max_body_length
        );
        println!("✅ Configuration validated");
        return;
    }

    let json = matches.get_flag("json");
    let outcome = if let Some(list_file) = matches.get_one::<String>("batch") {
        run_batch(engine, &config, list_file, json).await
    } else {
        match single_input(&matches) {
            Ok(Some(input)) => run_single(&engine, &config, &input, json),
            Ok(None) => {
                eprintln!("Nothing to scan: pass --url, --body, --email-file or --batch");
                process::exit(2);
            }
            Err(e) => Err(e),
        }
    };

    if let Err(e) = outcome {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn generate_default_config(path: &str) {
    let config = PhishGuardConfig::default();
    match config.to_file(path) {
        Ok(()) => {
            println!("Default configuration written to: {path}");
            println!("Point [models] dir at the directory holding the trained artifacts.");
        }
        Err(e) => {
            eprintln!("Error writing configuration file: {e}");
            process::exit(1);
        }
    }
}

fn single_input(matches: &clap::ArgMatches) -> anyhow::Result<Option<RawInput>> {
    if let Some(url) = matches.get_one::<String>("url") {
        return Ok(Some(RawInput::Url(url.clone())));
    }

    if let Some(body) = matches.get_one::<String>("body") {
        return Ok(Some(RawInput::Email {
            subject: matches.get_one::<String>("subject").cloned(),
            body: body.clone(),
        }));
    }

    if let Some(path) = matches.get_one::<String>("email-file") {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read email file {path}"))?;
        return Ok(Some(RawInput::email_from_text(&text)));
    }

    Ok(None)
}

fn run_single(
    engine: &DetectionEngine,
    config: &PhishGuardConfig,
    input: &RawInput,
    json: bool,
) -> anyhow::Result<()> {
    config.limits.check(input)?;
    let result = engine.scan(input);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_report(&describe(input), &result);
    }
    Ok(())
}

async fn run_batch(
    engine: DetectionEngine,
    config: &PhishGuardConfig,
    list_file: &str,
    json: bool,
) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(list_file)
        .with_context(|| format!("Failed to read URL list {list_file}"))?;

    let mut inputs = Vec::new();
    for input in batch::parse_url_list(&text) {
        match config.limits.check(&input) {
            Ok(()) => inputs.push(input),
            Err(e) => log::warn!("Skipping {}: {e}", describe(&input)),
        }
    }

    let labels: Vec<String> = inputs.iter().map(describe).collect();
    let results = batch::scan_all(Arc::new(engine), inputs)
        .await
        .context("Batch scan worker failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    let flagged = results
        .iter()
        .filter(|r| r.prediction == Label::Phishing)
        .count();
    for (label, result) in labels.iter().zip(&results) {
        print_report(label, result);
    }
    println!("📊 {} scanned, {} flagged as phishing", results.len(), flagged);
    Ok(())
}

fn describe(input: &RawInput) -> String {
    match input {
        RawInput::Url(url) => url.clone(),
        RawInput::Email {
            subject: Some(subject),
            ..
        } => format!("email \"{subject}\""),
        RawInput::Email { subject: None, .. } => "email (no subject)".to_string(),
    }
}

fn print_report(target: &str, result: &PredictionResult) {
    let marker = match result.prediction {
        Label::Phishing => "🚨",
        Label::Safe => "✅",
    };

    println!("{marker} {target}");
    println!(
        "   Verdict: {} ({:.2}% confidence, {} risk)",
        result.prediction, result.confidence, result.risk_level
    );
    for reason in &result.reasons {
        println!("   - {reason}");
    }
    println!();
}
