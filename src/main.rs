use clap::{Arg, Command};
use log::LevelFilter;
use mailsort::samples::sample_emails;
use mailsort::{ClassificationEngine, ClassificationResult, Config, Email};
use std::process;

fn main() {
    let matches = Command::new("mailsort")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Rule-based email classification engine")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path (YAML); built-in defaults when omitted"),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Write the default configuration (rules included) to FILE")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("test-config")
                .long("test-config")
                .help("Validate the configuration and rule patterns, then exit")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("classify")
                .long("classify")
                .value_name("FILE")
                .help("Classify a JSON email record (or array of records) from FILE")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("demo")
                .long("demo")
                .help("Classify the built-in sample emails")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Emit results as JSON instead of text")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if let Some(generate_path) = matches.get_one::<String>("generate-config") {
        let config = Config::default();
        match config.to_file(generate_path) {
            Ok(()) => {
                println!("Default configuration written to: {generate_path}");
                println!("Rules included: {}", config.rules.len());
            }
            Err(e) => {
                eprintln!("Failed to write configuration: {e}");
                process::exit(1);
            }
        }
        return;
    }

    let config = match matches.get_one::<String>("config") {
        Some(path) => match Config::from_file(path) {
            Ok(config) => {
                log::info!("Loaded configuration from {path}");
                config
            }
            Err(e) => {
                eprintln!("Error loading config from {path}: {e}");
                process::exit(1);
            }
        },
        None => Config::default(),
    };

    let engine = match ClassificationEngine::new(config) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            process::exit(1);
        }
    };

    if matches.get_flag("test-config") {
        println!("Configuration is valid!");
        println!("  Rules: {}", engine.rules().len());
        println!("  Compiled regex patterns: {}", engine.compiled_pattern_count());
        println!(
            "  Match cap per email: {}",
            engine.config().classification.max_rules_per_email
        );
        println!(
            "  Confidence floor: {}",
            engine.config().classification.min_confidence
        );
        return;
    }

    let as_json = matches.get_flag("json");

    if matches.get_flag("demo") {
        for email in sample_emails() {
            let result = engine.classify(&email);
            print_result(&engine, &email, &result, as_json);
        }
        return;
    }

    if let Some(path) = matches.get_one::<String>("classify") {
        let emails = match load_emails(path) {
            Ok(emails) => emails,
            Err(e) => {
                eprintln!("Error reading {path}: {e}");
                process::exit(1);
            }
        };
        for email in emails {
            let result = engine.classify(&email);
            print_result(&engine, &email, &result, as_json);
        }
        return;
    }

    eprintln!("Nothing to do. Try --demo, --classify FILE, or --help.");
    process::exit(2);
}

fn load_emails(path: &str) -> anyhow::Result<Vec<Email>> {
    let content = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&content)?;
    let emails = match value {
        serde_json::Value::Array(records) => {
            records.iter().map(Email::from_record).collect()
        }
        record => vec![Email::from_record(&record)],
    };
    Ok(emails)
}

fn print_result(
    engine: &ClassificationEngine,
    email: &Email,
    result: &ClassificationResult,
    as_json: bool,
) {
    if as_json {
        match serde_json::to_string_pretty(result) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Failed to serialize result: {e}"),
        }
        return;
    }

    println!("Email {} from <{}>", email.id, email.sender);
    println!("  Subject: {}", email.subject);
    println!(
        "  Category: {} ({:.1}% confidence)",
        result.category,
        result.confidence * 100.0
    );
    if let (Some(spam_type), Some(risk)) = (&result.spam_type, result.risk_score) {
        println!("  Spam type: {spam_type} (risk {risk}/100)");
    }
    if result.is_spam(engine.config().classification.spam_threshold) {
        println!("  Verdict: spam (above threshold)");
    }
    for matched in &result.matched_rules {
        println!(
            "  Matched: {} [{}] (matched: \"{}\")",
            matched.rule_name, matched.weight, matched.matched_content
        );
    }
    println!("  {}", result.explanation);
    println!();
}
