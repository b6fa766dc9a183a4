//! AI career advisor: analyze a resume against a job description with a hosted LLM

use career_advisor::cli::{self, AnalyzeArgs, Cli, Commands, ConfigAction};
use career_advisor::config::{ApiKey, Config, OutputFormat};
use career_advisor::error::{AdvisorError, Result};
use career_advisor::input::InputManager;
use career_advisor::llm::{AnalysisClient, GeminiClient};
use career_advisor::output::formatter::{save_report_to_file, suggest_filename, ReportGenerator};
use career_advisor::session::{AnalysisSession, Submission};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);

    if let Err(e) = run_command(cli.command, config_path).await {
        eprintln!("{} {}", "🔴".red(), e);
        if let Some(raw) = e.raw_response() {
            eprintln!("Raw AI Response that caused error:\n{}", raw);
        }
        process::exit(1);
    }
}

/// Only `analyze` and `config show` parse the config file; `path` and
/// `reset` must keep working when it is broken.
async fn run_command(command: Commands, config_path: PathBuf) -> Result<()> {
    match command {
        Commands::Analyze(args) => run_analysis(args, load_config(&config_path)?).await,
        Commands::Config { action } => match action.unwrap_or(ConfigAction::Show) {
            ConfigAction::Show => {
                let config = load_config(&config_path)?;
                let content = toml::to_string_pretty(&config)
                    .map_err(|e| AdvisorError::Configuration(format!("Failed to serialize config: {}", e)))?;
                println!("# {}\n{}", config_path.display(), content);
                Ok(())
            }
            ConfigAction::Path => {
                println!("{}", config_path.display());
                Ok(())
            }
            ConfigAction::Reset => {
                Config::reset(&config_path)?;
                println!("✅ Configuration reset to defaults: {}", config_path.display());
                Ok(())
            }
        },
    }
}

fn load_config(config_path: &Path) -> Result<Config> {
    Config::load_from(config_path).map_err(|e| {
        error!("Failed to load configuration from {}", config_path.display());
        e
    })
}

async fn run_analysis(args: AnalyzeArgs, mut config: Config) -> Result<()> {
    cli::validate_file_extension(&args.resume, &["pdf", "txt", "md"])
        .map_err(|e| AdvisorError::Validation(format!("Resume file: {}", e)))?;

    let output_format = match &args.output {
        Some(format) => cli::parse_output_format(format).map_err(AdvisorError::Validation)?,
        None => config.output.format,
    };
    if let Some(model) = args.model {
        config.llm.model = model;
    }

    let api_key = ApiKey::from_env()?;

    let input_manager = InputManager::new();
    let job_description = match &args.job {
        Some(path) => input_manager.load_job_description(path).await?,
        None => args.job_text.unwrap_or_default(),
    };
    let document = input_manager.load_resume(&args.resume).await?;

    let generator = GeminiClient::new(&config.llm, api_key)?;
    let client = AnalysisClient::from_config(generator, &config.llm);
    let mut session = AnalysisSession::new(client);

    info!("Starting analysis with model {}", config.llm.model);
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Analyzing your documents... This may take a moment.");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let submitted = session
        .submit(Submission::new(Some(document), job_description))
        .await
        .map(|_| ());
    spinner.finish_and_clear();
    submitted?;

    let completed = match session.acknowledge() {
        Some(outcome) => outcome?,
        None => return Err(AdvisorError::Service("analysis did not complete".to_string())),
    };

    let show_raw_json = args.raw_json || config.output.show_raw_json;
    let to_terminal = args.save.is_none() && output_format == OutputFormat::Console;
    let generator = ReportGenerator::with_options(
        config.output.color_output && to_terminal,
        show_raw_json,
        config.output.pretty_json,
    );
    let rendered = generator.generate_report(&completed.report, &output_format)?;

    match args.save {
        Some(path) => {
            // A directory gets a generated file name.
            let path = if path.is_dir() {
                path.join(suggest_filename(&output_format, &args.resume.to_string_lossy(), true))
            } else {
                path
            };
            save_report_to_file(&rendered, &path)?;
            eprintln!("✅ Analysis complete! Report saved to {}", path.display());
        }
        None => {
            eprintln!("✅ Analysis complete!");
            println!("{}", rendered);
        }
    }

    Ok(())
}
