use clap::{Arg, ArgAction, Command};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use langforge::engine::TranslationEngine;
use langforge::error::TranslateError;
use langforge::provider::{self, MockMode, MockProvider, ProviderOptions, TranslationProvider};
use langforge::settings::Settings;
use langforge::{languages, po};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = Command::new("langforge")
        .version("0.1.0")
        .about("Translate a gettext template catalog into all supported languages")
        .arg(
            Arg::new("template")
                .help("Path to the .pot template catalog")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("locale-dir")
                .long("locale-dir")
                .short('d')
                .help("Directory holding the per-language .po files")
                .default_value("locale"),
        )
        .arg(
            Arg::new("provider")
                .long("provider")
                .short('p')
                .help("Provider key (libretranslate, deepl-free, groq, openai); defaults to settings"),
        )
        .arg(
            Arg::new("api-key")
                .long("api-key")
                .short('k')
                .help("API key for key-based providers"),
        )
        .arg(
            Arg::new("url")
                .long("url")
                .help("Service URL for self-hostable providers"),
        )
        .arg(
            Arg::new("model")
                .long("model")
                .help("Model override for LLM-backed providers"),
        )
        .arg(
            Arg::new("language")
                .long("language")
                .short('l')
                .action(ArgAction::Append)
                .help("Translate only the given language(s) instead of the full set"),
        )
        .arg(
            Arg::new("mock")
                .long("mock")
                .short('m')
                .action(ArgAction::SetTrue)
                .help("Use the mock translator instead of a real provider"),
        )
        .arg(
            Arg::new("check")
                .long("check")
                .action(ArgAction::SetTrue)
                .help("Only test the provider connection, then exit"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .get_matches();

    let default_level = if matches.get_flag("verbose") {
        "langforge=debug"
    } else {
        "langforge=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with_writer(std::io::stderr)
        .init();

    let template_path = PathBuf::from(matches.get_one::<String>("template").unwrap());
    let locale_dir = PathBuf::from(matches.get_one::<String>("locale-dir").unwrap());

    // CLI flags override persisted settings.
    let settings = Settings::load(&Settings::default_path());
    let provider_key = matches
        .get_one::<String>("provider")
        .cloned()
        .unwrap_or_else(|| settings.active_api().provider.clone());
    let mut options: ProviderOptions = settings.provider_options();
    if let Some(key) = matches.get_one::<String>("api-key") {
        options.api_key = key.clone();
    }
    if let Some(url) = matches.get_one::<String>("url") {
        options.url = url.clone();
    }
    if let Some(model) = matches.get_one::<String>("model") {
        options.model = Some(model.clone());
    }

    let provider: Arc<dyn TranslationProvider> = if matches.get_flag("mock") {
        Arc::new(MockProvider::new(MockMode::Suffix))
    } else {
        provider::create(&provider_key, &options)?
    };

    if matches.get_flag("check") {
        if provider.test_connection().await {
            println!("✅ {} is reachable", provider.name());
            return Ok(());
        }
        eprintln!("❌ {} is not reachable", provider.name());
        std::process::exit(1);
    }

    let codes: Vec<&str> = match matches.get_many::<String>("language") {
        Some(requested) => {
            let mut codes = Vec::new();
            for code in requested {
                if !languages::is_supported(code) {
                    return Err(TranslateError::Config(format!(
                        "unsupported language '{}'",
                        code
                    ))
                    .into());
                }
                codes.push(code.as_str());
            }
            codes
        }
        None => languages::SUPPORTED_LANGUAGES
            .iter()
            .map(|(code, _)| *code)
            .collect(),
    };

    let textdomain = template_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("messages")
        .to_string();
    let template = po::load(&template_path, "en")?;

    println!(
        "Translating {} strings into {} languages via {}",
        template.entries.len(),
        codes.len(),
        provider.name()
    );

    let engine = TranslationEngine::new(provider, textdomain);
    let mut progress = |code: &str, status: &str, current: usize, total: usize| {
        let name = languages::display_name(code).unwrap_or(code);
        println!("[{}/{}] {} ({}): {}", current, total, name, code, status);
    };

    let results = engine
        .translate_project(&template, &codes, Path::new(&locale_dir), Some(&mut progress))
        .await?;

    let ok = results.iter().filter(|r| r.success).count();
    println!("Done: {}/{} languages succeeded", ok, results.len());
    if ok < results.len() {
        for result in results.iter().filter(|r| !r.success) {
            eprintln!("  {}: {}", result.code, result.message);
        }
    }

    Ok(())
}
