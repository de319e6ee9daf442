use chrono::{Duration, Local, NaiveDate};
use clap::Parser;

const DEFAULT_CLIPPINGS_PATH: &str = "./My Clippings.txt";
const DEFAULT_OUTPUT_PATH: &str = "./output/";
const DEFAULT_DATABASE_PATH: &str = "./clippings.db";

#[derive(Parser, Debug)]
#[command(name = "kindle-clippings")]
#[command(about = "Group Kindle 'My Clippings.txt' highlights by book")]
pub struct CliArgs {
    /// Path to the clippings file, or a directory to search for one
    #[arg(short = 'i', long)]
    pub clippings_path: Option<String>,

    /// Directory for the per-book HTML files
    #[arg(short, long)]
    pub output_path: Option<String>,

    /// Path to the SQLite database file
    #[arg(short, long)]
    pub database_path: Option<String>,

    /// Skip writing HTML files
    #[arg(long)]
    pub no_html: bool,

    /// Skip writing to the database
    #[arg(long)]
    pub no_db: bool,

    /// Only clippings added on or after this date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Only clippings added on or before this date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Only clippings from the last N days (mutually exclusive with --from/--to)
    #[arg(short, long)]
    pub last: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub clippings_path: String,
    pub output_path: String,
    pub database_path: String,
    pub write_html: bool,
    pub write_db: bool,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    InvalidDateFormat(String),
    InvalidDateRange,
    MutuallyExclusiveFlags,
    MissingFromDate,
    InvalidLastDays(u32),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidDateFormat(s) => {
                write!(f, "Invalid date format: '{}'. Expected YYYY-MM-DD", s)
            }
            ConfigError::InvalidDateRange => {
                write!(f, "Invalid date range: --from must be before or equal to --to")
            }
            ConfigError::MutuallyExclusiveFlags => {
                write!(f, "Use --from/--to OR --last, not both")
            }
            ConfigError::MissingFromDate => {
                write!(f, "--to needs a --from date")
            }
            ConfigError::InvalidLastDays(days) => {
                write!(f, "--last {} reaches past the earliest supported date", days)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let cli = CliArgs::parse();
        Self::from_args(cli, Local::now().date_naive())
    }

    fn from_args(cli: CliArgs, today: NaiveDate) -> Result<Self, ConfigError> {
        let date_range = resolve_dates(&cli, today)?;

        let clippings_path = cli
            .clippings_path
            .or_else(|| std::env::var("CLIPPINGS_PATH").ok())
            .unwrap_or_else(|| DEFAULT_CLIPPINGS_PATH.to_string());

        let output_path = cli
            .output_path
            .or_else(|| std::env::var("OUTPUT_PATH").ok())
            .unwrap_or_else(|| DEFAULT_OUTPUT_PATH.to_string());

        let database_path = cli
            .database_path
            .or_else(|| std::env::var("DATABASE_PATH").ok())
            .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string());

        Ok(Config {
            clippings_path,
            output_path,
            database_path,
            write_html: !cli.no_html,
            write_db: !cli.no_db,
            date_range,
        })
    }
}

fn resolve_dates(
    cli: &CliArgs,
    today: NaiveDate,
) -> Result<Option<(NaiveDate, NaiveDate)>, ConfigError> {
    let has_from_to = cli.from.is_some() || cli.to.is_some();
    let has_last = cli.last.is_some();

    if has_from_to && has_last {
        return Err(ConfigError::MutuallyExclusiveFlags);
    }

    if let Some(days) = cli.last {
        return compute_last_n_days(today, days).map(Some);
    }

    if cli.to.is_some() && cli.from.is_none() {
        return Err(ConfigError::MissingFromDate);
    }

    if let Some(ref from_str) = cli.from {
        let from = parse_date(from_str)?;
        let to = match &cli.to {
            Some(to_str) => parse_date(to_str)?,
            None => today,
        };

        if from > to {
            return Err(ConfigError::InvalidDateRange);
        }

        return Ok(Some((from, to)));
    }

    // No window: every clipping in the file.
    Ok(None)
}

fn parse_date(s: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| ConfigError::InvalidDateFormat(s.to_string()))
}

fn compute_last_n_days(today: NaiveDate, days: u32) -> Result<(NaiveDate, NaiveDate), ConfigError> {
    let from = today
        .checked_sub_signed(Duration::days(days.into()))
        .ok_or(ConfigError::InvalidLastDays(days))?;
    Ok((from, today))
}
