use clap::Parser;
use p2s_api_types::{ContentKind, OutputType, PosterDensity, SlideLength};
use p2s_client::{ClientConfig, ClientResult, ConfigLoader};
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[clap(
    name = "p2s",
    author,
    version,
    about = "Turn documents into slides or posters with a Paper2Slides service"
)]
pub struct Cli {
    #[clap(help = "Documents to upload (PDF, Markdown, ...)")]
    pub files: Vec<PathBuf>,

    #[clap(long, short, env = "P2S_CONFIG", help = "YAML configuration file")]
    pub config: Option<PathBuf>,

    #[clap(long, env = "P2S_API_BASE", help = "Base URL of the service [default: http://localhost:8152]")]
    pub api_base: Option<String>,

    #[clap(long, env = "P2S_CONTENT", help = "Source kind: paper or general")]
    pub content: Option<ContentKind>,

    #[clap(long, env = "P2S_OUTPUT_TYPE", help = "Output: slides or poster")]
    pub output_type: Option<OutputType>,

    #[clap(long, env = "P2S_STYLE", help = "academic, doraemon, or a free-form style description")]
    pub style: Option<String>,

    #[clap(long, env = "P2S_LENGTH", help = "Slide deck length: short, medium or long")]
    pub length: Option<SlideLength>,

    #[clap(long, env = "P2S_DENSITY", help = "Poster density: sparse, medium or dense")]
    pub density: Option<PosterDensity>,

    #[clap(long, env = "P2S_LANGUAGE", help = "Output language, e.g. vietnamese or english")]
    pub language: Option<String>,

    #[clap(long, env = "P2S_FAST_MODE", help = "Ask the service for its faster, lower quality pipeline")]
    pub fast_mode: bool,

    #[clap(long, env = "P2S_MESSAGE", help = "Instruction text sent with the upload")]
    pub message: Option<String>,

    #[clap(long, env = "P2S_POLL_INTERVAL", help = "Seconds between status checks [default: 5]")]
    pub poll_interval: Option<f64>,

    #[clap(long, env = "P2S_MAX_WAIT", help = "Seconds to wait for generation [default: 1800]")]
    pub max_wait: Option<u64>,

    #[clap(long, env = "P2S_OUTPUT_DIR", help = "Directory for the slide content file [default: .]")]
    pub output_dir: Option<PathBuf>,

    #[clap(long, env = "P2S_NO_SAVE", help = "Do not write the slide content file")]
    pub no_save: bool,

    #[clap(long, short, env = "P2S_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Overlay the values given on the command line or in the environment.
    pub fn apply(&self, config: &mut ClientConfig) {
        if !self.files.is_empty() {
            config.files = self.files.clone();
        }
        if let Some(api_base) = &self.api_base {
            config.api.base_url = api_base.clone();
        }

        let generation = &mut config.generation;
        if let Some(content) = self.content {
            generation.content = content;
        }
        if let Some(output_type) = self.output_type {
            generation.output_type = output_type;
        }
        if let Some(style) = &self.style {
            generation.style = style.clone();
        }
        if let Some(length) = self.length {
            generation.length = length;
        }
        if let Some(density) = self.density {
            generation.density = density;
        }
        if let Some(language) = &self.language {
            generation.language = language.clone();
        }
        if self.fast_mode {
            generation.fast_mode = true;
        }
        if let Some(message) = &self.message {
            generation.message = Some(message.clone());
        }

        if let Some(interval) = self.poll_interval {
            config.polling.interval_secs = interval;
            if config.polling.max_interval_secs < interval {
                config.polling.max_interval_secs = interval;
            }
        }
        if let Some(max_wait) = self.max_wait {
            config.polling.max_wait_secs = max_wait;
        }

        if let Some(dir) = &self.output_dir {
            config.output.directory = dir.clone();
        }
        if self.no_save {
            config.output.save_content = false;
        }
    }

    /// Build the effective configuration: defaults, then the YAML file,
    /// then command-line and environment values.
    pub async fn resolve_config(&self) -> ClientResult<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => {
                log::info!("Loading configuration from {}", path.display());
                ConfigLoader::from_file(path).await?
            }
            None => ClientConfig::default(),
        };

        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use p2s_client::ClientError;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("p2s").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_flags_parse() {
        let cli = parse(&[
            "paper.pdf",
            "notes.md",
            "--content",
            "paper",
            "--output-type",
            "poster",
            "--density",
            "dense",
            "--fast-mode",
            "--poll-interval",
            "2.5",
        ]);

        assert_eq!(cli.files, vec![PathBuf::from("paper.pdf"), PathBuf::from("notes.md")]);
        assert_eq!(cli.content, Some(ContentKind::Paper));
        assert_eq!(cli.output_type, Some(OutputType::Poster));
        assert_eq!(cli.density, Some(PosterDensity::Dense));
        assert!(cli.fast_mode);
        assert_eq!(cli.poll_interval, Some(2.5));
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn test_invalid_enum_value_is_rejected() {
        let result = Cli::try_parse_from(["p2s", "paper.pdf", "--length", "huge"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_overrides_config_values() {
        let mut config = ClientConfig::default();
        config.generation.language = "english".to_string();
        config.generation.style = "doraemon".to_string();
        config.files = vec![PathBuf::from("from-yaml.pdf")];

        let cli = Cli {
            files: vec![PathBuf::from("from-cli.pdf")],
            language: Some("vietnamese".to_string()),
            max_wait: Some(60),
            no_save: true,
            ..Default::default()
        };
        cli.apply(&mut config);

        assert_eq!(config.files, vec![PathBuf::from("from-cli.pdf")]);
        assert_eq!(config.generation.language, "vietnamese");
        // Untouched options keep the file's value.
        assert_eq!(config.generation.style, "doraemon");
        assert_eq!(config.polling.max_wait_secs, 60);
        assert!(!config.output.save_content);
    }

    #[test]
    fn test_long_poll_interval_raises_backoff_cap() {
        let mut config = ClientConfig::default();
        let cli = Cli {
            poll_interval: Some(120.0),
            ..Default::default()
        };
        cli.apply(&mut config);

        assert_eq!(config.polling.interval_secs, 120.0);
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_resolve_config_from_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p2s.yaml");
        std::fs::write(
            &path,
            "api:\n  base_url: http://gpu-box:8152\ngeneration:\n  output_type: poster\n",
        )
        .unwrap();

        let cli = Cli {
            config: Some(path),
            style: Some("minimal".to_string()),
            ..Default::default()
        };
        let config = cli.resolve_config().await.unwrap();

        assert_eq!(config.api.base_url, "http://gpu-box:8152");
        assert_eq!(config.generation.output_type, OutputType::Poster);
        assert_eq!(config.generation.style, "minimal");
    }

    #[tokio::test]
    async fn test_resolve_config_rejects_bad_url() {
        let cli = Cli {
            api_base: Some("ftp://example.com".to_string()),
            ..Default::default()
        };
        let err = cli.resolve_config().await.unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
        assert_eq!(err.exit_code(), 1);
    }
}
