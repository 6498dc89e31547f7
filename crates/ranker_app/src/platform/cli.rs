use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use ranker_engine::{
    HttpNarrativeGenerator, HttpProgressService, LocalProgressService, NarrativeGenerator,
    ProgressService, ServiceSettings, UnavailableGenerator,
};
use ranker_logging::LogDestination;

#[derive(Parser, Debug)]
#[command(name = "ranker")]
#[command(version, about = "Rank your dream jobs and get AI careers feedback")]
pub struct Args {
    /// Identity the progress is saved under
    #[arg(long)]
    pub identity: String,

    /// Base URL of a hosted progress service. Overrides --store-dir.
    #[arg(long, conflicts_with_all = ["store_dir", "generator_url"])]
    pub service_url: Option<String>,

    /// Directory for locally saved progress
    #[arg(long, default_value = "./progress")]
    pub store_dir: PathBuf,

    /// Text-generation endpoint used in local mode
    #[arg(long)]
    pub generator_url: Option<String>,

    #[arg(long, value_enum, default_value_t = LogChoice::File)]
    pub log: LogChoice,

    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogChoice {
    Terminal,
    File,
    Both,
}

impl From<LogChoice> for LogDestination {
    fn from(choice: LogChoice) -> Self {
        match choice {
            LogChoice::Terminal => LogDestination::Terminal,
            LogChoice::File => LogDestination::File,
            LogChoice::Both => LogDestination::Both,
        }
    }
}

impl Args {
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    /// Builds the hosted client when a service URL is given, the file-backed
    /// service otherwise.
    pub fn build_service(&self) -> Result<Arc<dyn ProgressService>> {
        let settings = ServiceSettings::default();
        if let Some(url) = &self.service_url {
            let service = HttpProgressService::new(url, settings)
                .with_context(|| format!("Invalid --service-url {url}"))?;
            return Ok(Arc::new(service));
        }

        let generator: Arc<dyn NarrativeGenerator> = match &self.generator_url {
            Some(url) => Arc::new(
                HttpNarrativeGenerator::new(url, settings.connect_timeout)
                    .with_context(|| format!("Invalid --generator-url {url}"))?,
            ),
            None => Arc::new(UnavailableGenerator),
        };
        Ok(Arc::new(LocalProgressService::new(
            self.store_dir.clone(),
            generator,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_local_store_and_file_logging() {
        let args = Args::try_parse_from(["ranker", "--identity", "amy"]).unwrap();
        assert_eq!(args.identity, "amy");
        assert_eq!(args.store_dir, PathBuf::from("./progress"));
        assert_eq!(args.log, LogChoice::File);
        assert_eq!(args.log_level(), LevelFilter::Info);
        assert!(args.service_url.is_none());
    }

    #[test]
    fn identity_is_required() {
        assert!(Args::try_parse_from(["ranker"]).is_err());
    }

    #[test]
    fn service_url_excludes_generator_url() {
        let parsed = Args::try_parse_from([
            "ranker",
            "--identity",
            "amy",
            "--service-url",
            "http://localhost:9000/api",
            "--generator-url",
            "http://localhost:9001",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn verbose_terminal_logging() {
        let args =
            Args::try_parse_from(["ranker", "--identity", "amy", "--log", "terminal", "-v"])
                .unwrap();
        assert_eq!(LogDestination::from(args.log), LogDestination::Terminal);
        assert_eq!(args.log_level(), LevelFilter::Debug);
    }

    #[test]
    fn bad_service_url_is_reported() {
        let args = Args::try_parse_from([
            "ranker",
            "--identity",
            "amy",
            "--service-url",
            "not a url",
        ])
        .unwrap();
        assert!(args.build_service().is_err());
    }
}
