use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use log::{error, info};

use covid_clean::utils::logging::console::{
    print_batch_summary, print_sample_rows, print_schema_info,
};
use covid_clean::{
    DatasetAcquirer, Error, KaggleDownloader, NoopAcquirer, OutputFormat, PipelineConfig,
};

#[derive(Parser)]
#[command(name = "covid-clean")]
#[command(about = "Download and clean the COVID-19 case-surveillance dataset")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the raw dataset if it is not present yet
    Download,
    /// Load, clean and persist the dataset (default)
    Clean,
    /// Print the schema and first rows of the clean artifact
    Inspect {
        /// Number of rows to print
        #[arg(long, default_value_t = 10)]
        rows: usize,
    },
}

#[derive(Args)]
struct Settings {
    /// JSON configuration file; flags override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding downloaded datasets
    #[arg(long, global = true)]
    raw_data_root: Option<PathBuf>,

    /// Directory receiving the clean artifact
    #[arg(long, global = true)]
    interim_data_root: Option<PathBuf>,

    /// Kaggle dataset identifier (owner/dataset)
    #[arg(long, global = true)]
    kaggle_repo: Option<String>,

    /// Folder below the raw data root holding the dataset (default: covid19-dataset)
    #[arg(long, global = true)]
    destination_folder: Option<String>,

    /// File name of the raw table inside the dataset folder
    #[arg(long, global = true)]
    raw_filename: Option<String>,

    /// Drop rows with missing indicator values (required unless set in the config file)
    #[arg(long, global = true)]
    drop_missing_rows: Option<bool>,

    /// Rescale age to [0, 1] using the observed min and max
    #[arg(long, global = true)]
    rescale_age: Option<bool>,

    /// Format of the clean artifact
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Never download; use files already on disk
    #[arg(long, global = true)]
    offline: bool,
}

impl Commands {
    /// Whether the command runs the transformer and so needs a drop policy
    const fn cleans(&self) -> bool {
        matches!(self, Self::Clean)
    }
}

impl Settings {
    fn into_config(self, needs_drop_policy: bool) -> covid_clean::Result<(PipelineConfig, bool)> {
        let file_config = self
            .config
            .as_deref()
            .map(PipelineConfig::from_json_file)
            .transpose()?;

        let drop_missing_rows = match self
            .drop_missing_rows
            .or(file_config.as_ref().map(|c| c.drop_missing_rows))
        {
            Some(drop) => drop,
            None if needs_drop_policy => {
                return Err(Error::config(
                    "drop_missing_rows",
                    "must be set explicitly with --drop-missing-rows or in the config file",
                ));
            }
            // Never read outside `clean`
            None => false,
        };

        let mut config = file_config.unwrap_or_else(|| PipelineConfig::new(drop_missing_rows, false));
        config.drop_missing_rows = drop_missing_rows;
        if let Some(rescale_age) = self.rescale_age {
            config.rescale_age = rescale_age;
        }
        if let Some(root) = self.raw_data_root {
            config.raw_data_root = root;
        }
        if let Some(root) = self.interim_data_root {
            config.interim_data_root = root;
        }
        if let Some(repo) = self.kaggle_repo {
            config.dataset_repo = repo;
        }
        if let Some(folder) = self.destination_folder {
            config.dataset_folder = Some(folder);
        }
        if let Some(filename) = self.raw_filename {
            config.raw_filename = filename;
        }
        if let Some(format) = self.format {
            config.output_format = format;
        }

        config.validate()?;
        Ok((config, self.offline))
    }
}

fn acquirer(offline: bool) -> anyhow::Result<Box<dyn DatasetAcquirer>> {
    if offline {
        return Ok(Box::new(NoopAcquirer));
    }
    let downloader = KaggleDownloader::new().context("Failed to set up the Kaggle downloader")?;
    Ok(Box::new(downloader))
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let command = cli.command.unwrap_or(Commands::Clean);
    let (config, offline) = cli.settings.into_config(command.cleans())?;

    match command {
        Commands::Download => {
            let destination = config.dataset_dir();
            acquirer(offline)?.ensure_downloaded(&config.dataset_repo, &destination)?;
            info!("Raw dataset available at {}", destination.display());
        }
        Commands::Clean => {
            let report = covid_clean::run(&config, acquirer(offline)?.as_ref())?;
            info!(
                "Saved {} rows ({} dropped of {}) to {} in {:?}",
                report.clean_rows,
                report.dropped_rows(),
                report.raw_rows,
                report.output_path.display(),
                report.elapsed
            );
        }
        Commands::Inspect { rows } => {
            let batch = covid_clean::load_clean(&config).with_context(|| {
                format!(
                    "Failed to load the clean dataset from {}",
                    config.clean_file_path().display()
                )
            })?;
            print_batch_summary(&batch);
            print_schema_info(&batch);
            print_sample_rows(&batch, rows)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let category = e
                .chain()
                .find_map(|cause| cause.downcast_ref::<Error>())
                .map_or("internal", Error::category);
            error!("[{category}] {e:#}");
            ExitCode::FAILURE
        }
    }
}
