use std::path::PathBuf;

use clap::Parser;
use common::utils::config::AppConfig;
use xref_pipeline::{pipeline::DEFAULT_SAMPLE_SIZE, QueryRequest};

const EPILOGUE: &str = "\
The JSON cross-reference file is obtained from the gh-pages branch of the
vtk-examples GitHub site and cached in your temp directory. It is downloaded
again once the cached copy is more than ten minutes old.";

/// Get examples that use a particular VTK class for a given language.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None, after_help = EPILOGUE)]
pub struct Args {
    /// The desired VTK class, e.g. vtkActor
    pub vtk_class: String,

    /// The desired language: CSharp, Cxx, Java or Python (any case)
    pub language: String,

    /// All examples (warning: can be a very long list)
    #[arg(short = 'a', long = "all-values")]
    pub all_values: bool,

    /// The maximum number of examples
    #[arg(short = 'n', long, default_value_t = DEFAULT_SAMPLE_SIZE)]
    pub number: usize,

    /// Seed for the example sampler, for reproducible output
    #[arg(long, env = "XREF_SEED")]
    pub seed: Option<u64>,

    /// Download the index even if the cached copy is still fresh
    #[arg(long)]
    pub refresh: bool,

    /// Directory for the cached index (defaults to the temp directory)
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,
}

impl Args {
    pub fn request(&self) -> QueryRequest {
        QueryRequest::new(self.vtk_class.as_str(), self.language.as_str())
            .with_max_count(self.number)
            .with_take_all(self.all_values)
            .with_force_refresh(self.refresh)
    }

    /// Command-line values win over the config file and environment.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.cache_dir {
            config.cache_dir = Some(dir.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_request_a_small_sample() {
        let args = Args::try_parse_from(["select-examples", "vtkActor", "python"])
            .expect("minimal invocation parses");
        let request = args.request();

        assert_eq!(request.class_name, "vtkActor");
        assert_eq!(request.language, "python");
        assert_eq!(request.max_count, 5);
        assert!(!request.take_all);
        assert!(!request.force_refresh);
    }

    #[test]
    fn flags_map_onto_the_request() {
        let args = Args::try_parse_from([
            "select-examples",
            "vtkPolyData",
            "Cxx",
            "-a",
            "-n",
            "12",
            "--refresh",
            "--seed",
            "7",
        ])
        .expect("full invocation parses");
        let request = args.request();

        assert_eq!(request.max_count, 12);
        assert!(request.take_all);
        assert!(request.force_refresh);
        assert_eq!(args.seed, Some(7));
    }

    #[test]
    fn cache_dir_overrides_config() {
        let args = Args::try_parse_from([
            "select-examples",
            "vtkActor",
            "Java",
            "--cache-dir",
            "/var/cache/xref",
        ])
        .expect("parses");
        let mut config = AppConfig::default();
        args.apply_overrides(&mut config);

        assert_eq!(config.cache_dir, Some(PathBuf::from("/var/cache/xref")));
    }

    #[test]
    fn class_and_language_are_required() {
        assert!(Args::try_parse_from(["select-examples", "vtkActor"]).is_err());
    }
}
