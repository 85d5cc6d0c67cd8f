//! IPL Score Predictor CLI
//!
//! Predicts a final innings score range from the current match state.

use clap::{Parser, Subcommand};
use ipl::{Config, Result, ValidationPolicy};

#[derive(Parser)]
#[command(name = "ipl")]
#[command(about = "IPL innings score prediction from live match state", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict the final score range for a match in progress
    Predict {
        /// Batting team (name or short code)
        batting: String,
        /// Bowling team (name or short code)
        bowling: String,
        /// Current over, e.g. 10.3 for three balls into the 11th over
        #[arg(long)]
        overs: f64,
        /// Current runs
        #[arg(long)]
        runs: u32,
        /// Wickets fallen so far
        #[arg(long, default_value = "0")]
        wickets: u32,
        /// Runs scored in the last 5 overs
        #[arg(long = "runs-last-5", default_value = "0")]
        runs_last_5: u32,
        /// Wickets taken in the last 5 overs
        #[arg(long = "wickets-last-5", default_value = "0")]
        wickets_last_5: u32,
        /// Refuse to predict when the input raises warnings
        #[arg(long)]
        strict: bool,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Prompt for match states until an empty line or `quit`
    Interactive {
        /// Refuse to predict when the input raises warnings
        #[arg(long)]
        strict: bool,
    },
    /// List the supported teams in encoding order
    Teams,
    /// Model management commands
    Model {
        #[command(subcommand)]
        action: ModelCommands,
    },
    /// Write a default config
    Init,
}

#[derive(Subcommand)]
enum ModelCommands {
    /// Download the model if it is not present yet
    Fetch,
    /// Show model information
    Info,
}

#[derive(Clone, Debug)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use table, json, or csv.", s)),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    let result = match cli.command {
        Commands::Predict {
            batting,
            bowling,
            overs,
            runs,
            wickets,
            runs_last_5,
            wickets_last_5,
            strict,
            format,
        } => commands::predict(
            &config,
            commands::MatchArgs {
                batting,
                bowling,
                overs,
                runs,
                wickets,
                runs_last_5,
                wickets_last_5,
            },
            policy(&config, strict),
            format,
        ),
        Commands::Interactive { strict } => commands::interactive(&config, policy(&config, strict)),
        Commands::Teams => commands::teams(),
        Commands::Model { action } => match action {
            ModelCommands::Fetch => commands::model_fetch(&config),
            ModelCommands::Info => commands::model_info(&config),
        },
        Commands::Init => commands::init(&cli.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn policy(config: &Config, strict: bool) -> ValidationPolicy {
    if strict {
        ValidationPolicy::Strict
    } else {
        config.validation.policy
    }
}

mod commands {
    use super::*;
    use ipl::data::ModelFetcher;
    use ipl::features::MatchState;
    use ipl::model::{LinearModel, ScoreModel};
    use ipl::predict::{format_estimate, run_session, ScorePredictor};
    use ipl::{ScoreError, Team};
    use std::path::Path;

    pub struct MatchArgs {
        pub batting: String,
        pub bowling: String,
        pub overs: f64,
        pub runs: u32,
        pub wickets: u32,
        pub runs_last_5: u32,
        pub wickets_last_5: u32,
    }

    impl MatchArgs {
        fn into_state(self) -> Result<MatchState> {
            let batting: Team = self.batting.parse()?;
            let bowling: Team = self.bowling.parse()?;
            Ok(MatchState::new(
                batting,
                bowling,
                self.overs,
                self.runs,
                self.wickets,
                self.runs_last_5,
                self.wickets_last_5,
            ))
        }
    }

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        if let Some(dir) = Path::new(&config.model.path).parent() {
            std::fs::create_dir_all(dir)?;
            println!("Created {}/ directory", dir.display());
        }

        println!("\nNext steps:");
        println!("  1. Set [model.source] in {} or place the model at {}", config_path, config.model.path);
        println!("  2. Run 'ipl model fetch' to download the model");
        println!("  3. Run 'ipl predict MI CSK --overs 10.3 --runs 85' to predict");

        Ok(())
    }

    pub fn teams() -> Result<()> {
        println!("Teams (encoding order)");
        println!("───────────────────────────────");
        for team in Team::ALL {
            println!("  {}  {:<5} {}", team.index(), team.code(), team.name());
        }
        Ok(())
    }

    fn load_model(config: &Config) -> Result<LinearModel> {
        let fetcher = ModelFetcher::new(&config.fetch)?;
        let path = fetcher.ensure(&config.model.source, &config.model.path)?;
        LinearModel::load(&path)
    }

    pub fn model_fetch(config: &Config) -> Result<()> {
        let fetcher = ModelFetcher::new(&config.fetch)?;
        let path = fetcher.ensure(&config.model.source, &config.model.path)?;
        println!("Model available at {}", path.display());
        Ok(())
    }

    pub fn model_info(config: &Config) -> Result<()> {
        let path = Path::new(&config.model.path);
        if !path.exists() {
            return Err(ScoreError::ModelUnavailable(format!(
                "no model at {} - run 'ipl model fetch' first",
                path.display()
            )));
        }
        let model = LinearModel::load(path)?;

        println!("Model Information");
        println!("───────────────────────────────");
        println!("  Path:          {}", path.display());
        println!("  Source:        {}", config.model.source.describe());
        println!("  Features:      {}", model.input_dim());
        println!("  Intercept:     {:.4}", model.intercept);
        println!(
            "  Named columns: {}",
            if model.feature_names.is_some() { "yes" } else { "no" }
        );

        Ok(())
    }

    pub fn predict(
        config: &Config,
        args: MatchArgs,
        policy: ValidationPolicy,
        format: OutputFormat,
    ) -> Result<()> {
        let state = args.into_state()?;
        let predictor = ScorePredictor::with_policy(load_model(config)?, policy);
        let estimate = predictor.compute_range(&state)?;

        match format {
            OutputFormat::Table => {
                print!("{}", format_estimate(&state, &estimate));
            }
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "match": state,
                    "low": estimate.range.low,
                    "high": estimate.range.high,
                    "point_estimate": estimate.point_estimate,
                    "warnings": estimate.warnings,
                });
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
            OutputFormat::Csv => {
                println!("batting,bowling,overs,runs,wickets,runs_last_5,wickets_last_5,low,high");
                println!(
                    "{},{},{:.1},{},{},{},{},{},{}",
                    state.batting_team().code(),
                    state.bowling_team().code(),
                    state.overs(),
                    state.runs(),
                    state.wickets(),
                    state.runs_last_5(),
                    state.wickets_last_5(),
                    estimate.range.low,
                    estimate.range.high
                );
            }
        }

        Ok(())
    }

    pub fn interactive(config: &Config, policy: ValidationPolicy) -> Result<()> {
        println!("IPL Score Predictor (empty line or 'quit' to exit)");

        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        let summary = run_session(stdin.lock(), &mut stdout.lock(), policy, || load_model(config))?;
        log::info!(
            "Session ended: {} predictions, {} errors",
            summary.predictions,
            summary.errors
        );

        Ok(())
    }
}
