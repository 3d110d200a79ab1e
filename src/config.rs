use std::path::PathBuf;

use clap::Parser;

/// Default location of the city table, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "Dataset/workation_cleaned.csv";

/// Command-line arguments for the dashboard.
#[derive(Debug, Parser)]
#[command(
    name = "workation-explorer",
    version,
    about = "Dashboard for finding the best cities to combine work and travel"
)]
pub struct CliArgs {
    /// Path to the city table (.csv, .json or .parquet)
    #[arg(short = 'd', long = "data", default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_path_defaults() {
        let args = CliArgs::parse_from(["workation-explorer"]);
        assert_eq!(args.data, PathBuf::from(DEFAULT_DATA_PATH));
    }

    #[test]
    fn data_path_override() {
        let args = CliArgs::parse_from(["workation-explorer", "--data", "cities.parquet"]);
        assert_eq!(args.data, PathBuf::from("cities.parquet"));
        let args = CliArgs::parse_from(["workation-explorer", "-d", "x.json"]);
        assert_eq!(args.data, PathBuf::from("x.json"));
    }
}
