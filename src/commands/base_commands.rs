use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crate::domain::simulation::Track;
use crate::services::engine::{EngineError, SimulationEngine};
use crate::services::engine_config::{EngineConfig, EngineConfigError, load_engine_config_from_yaml_file};
use crate::services::yaml_store::YamlDirectoryStore;

#[derive(Parser)]
#[command(author, version, about)]
pub struct CliArgs {
    #[command(flatten)]
    pub engine: EngineArgs,
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command that opens the simulation store.
#[derive(Args, Debug, Clone)]
pub struct EngineArgs {
    /// Directory holding projects, model variables and outputs
    #[arg(short, long, global = true, env = "REVENUE_FORECASTS_DATA_DIR", default_value = "data")]
    pub data_dir: String,
    /// Engine config YAML
    #[arg(long, global = true, env = "REVENUE_FORECASTS_CONFIG")]
    pub config: Option<String>,
    /// Seed every random stream for a reproducible run
    #[arg(long, global = true, env = "REVENUE_FORECASTS_SEED")]
    pub seed: Option<u64>,
    /// Upper bound on a project's trial count
    #[arg(long, global = true, env = "REVENUE_FORECASTS_MAX_TRIALS")]
    pub max_trials: Option<usize>,
    /// Worker threads (defaults to the number of CPUs)
    #[arg(long, global = true, env = "REVENUE_FORECASTS_WORKERS")]
    pub workers: Option<usize>,
    /// Per-run deadline, e.g. 30s or 5m
    #[arg(long, global = true, env = "REVENUE_FORECASTS_RUN_DEADLINE")]
    pub run_deadline: Option<String>,
    /// Log run progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl EngineArgs {
    /// The config file (or defaults) with command-line overrides applied.
    pub fn engine_config(&self) -> Result<EngineConfig, EngineConfigError> {
        let mut config = match &self.config {
            Some(path) => load_engine_config_from_yaml_file(path)?,
            None => EngineConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(max_trials) = self.max_trials {
            config.max_trials = max_trials;
        }
        if let Some(workers) = self.workers {
            config.worker_threads = Some(workers);
        }
        if let Some(run_deadline) = &self.run_deadline {
            config.run_deadline = run_deadline.clone();
        }
        config.validate()?;
        Ok(config)
    }

    pub fn open_engine(&self) -> Result<SimulationEngine<YamlDirectoryStore>, EngineError> {
        let config = self.engine_config()?;
        SimulationEngine::new(YamlDirectoryStore::new(&self.data_dir), config)
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackArg {
    Normal,
    Admin,
    CrossCheck,
}

impl From<TrackArg> for Track {
    fn from(track: TrackArg) -> Self {
        match track {
            TrackArg::Normal => Track::Normal,
            TrackArg::Admin => Track::Admin,
            TrackArg::CrossCheck => Track::CrossCheck,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Yaml,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Store a contributor's factor distributions and rerun the affected simulations
    Submit {
        /// Project id
        #[arg(short, long)]
        project: String,
        /// Contributor id
        #[arg(short, long)]
        contributor: String,
        /// Factors YAML file
        #[arg(short, long)]
        factors: String,
        /// Optional file to write the submission receipt to (YAML)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Rerun a project's simulation from the stored submissions
    Run {
        /// Project id
        #[arg(short, long)]
        project: String,
        /// Simulation track
        #[arg(short, long, value_enum, default_value_t = TrackArg::Normal)]
        track: TrackArg,
    },
    /// Sample histograms of the pooled factor distributions of a project
    Aggregate {
        /// Project id
        #[arg(short, long)]
        project: String,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
        format: OutputFormat,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Directory to write one PNG histogram per factor into
        #[arg(long)]
        plot_dir: Option<String>,
    },
    /// Print the stored yearly statistics of a project's simulation
    Report {
        /// Project id
        #[arg(short, long)]
        project: String,
        /// Simulation track
        #[arg(short, long, value_enum, default_value_t = TrackArg::Normal)]
        track: TrackArg,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
