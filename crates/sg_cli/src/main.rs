use std::io::{self, Read};
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use clap::{Args, Parser, Subcommand};
use sg_core::types::{DEFAULT_MAX_LENGTH, DEFAULT_MIN_LENGTH, MAX_LENGTH_RANGE, MIN_LENGTH_RANGE};
use sg_core::OperationOutcome;
use sg_inference::config::{DEFAULT_INFERENCE_URL, DEFAULT_SENTIMENT_MODEL, DEFAULT_SUMMARIZATION_MODEL};
use sg_inference::{
    BackendKind, DevicePreference, InferenceConfig, ModelProvider, SentimentHandler,
    SummarizationHandler,
};
use sg_web::AppState;
use tracing::{error, info};

mod logging;

#[derive(Parser, Debug)]
#[command(name = "study-genie", author, version, about = "Sentiment analysis and text summarization", long_about = None)]
struct Cli {
    #[command(flatten)]
    inference: InferenceArgs,
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct InferenceArgs {
    /// Where the models run: a hosted inference service, or built-in local models for offline use
    #[arg(long, value_enum, env = "SG_BACKEND", default_value_t = BackendKind::Http, global = true)]
    backend: BackendKind,
    /// Base URL of a Hugging Face Inference API compatible service
    #[arg(long, env = "SG_INFERENCE_URL", default_value = DEFAULT_INFERENCE_URL, global = true)]
    inference_url: String,
    #[arg(long, env = "HF_API_TOKEN", hide_env_values = true, global = true)]
    api_token: Option<String>,
    #[arg(long, env = "SG_SENTIMENT_MODEL", default_value = DEFAULT_SENTIMENT_MODEL, global = true)]
    sentiment_model: String,
    #[arg(long, env = "SG_SUMMARIZATION_MODEL", default_value = DEFAULT_SUMMARIZATION_MODEL, global = true)]
    summarization_model: String,
    #[arg(long, value_enum, env = "SG_DEVICE", default_value_t = DevicePreference::Auto, global = true)]
    device: DevicePreference,
    /// Decode summaries deterministically instead of sampling
    #[arg(long, global = true)]
    deterministic: bool,
    /// Skip the test request sent to hosted models when they are loaded
    #[arg(long, global = true)]
    no_warmup: bool,
}

impl From<InferenceArgs> for InferenceConfig {
    fn from(args: InferenceArgs) -> Self {
        Self {
            backend: args.backend,
            base_url: args.inference_url,
            api_token: args.api_token,
            sentiment_model: args.sentiment_model,
            summarization_model: args.summarization_model,
            device: args.device,
            do_sample: !args.deterministic,
            warmup: !args.no_warmup,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the Study Genie page
    Serve {
        #[arg(long, env = "SG_ADDR", default_value = "127.0.0.1:8501")]
        addr: SocketAddr,
        /// Load models on first use instead of at startup
        #[arg(long)]
        lazy: bool,
    },
    /// Classify the sentiment of TEXT, or of stdin when TEXT is omitted or "-"
    Sentiment {
        text: Option<String>,
    },
    /// Summarize TEXT, or stdin when TEXT is omitted or "-"
    Summarize {
        text: Option<String>,
        /// Minimum summary length
        #[arg(
            long,
            default_value_t = DEFAULT_MIN_LENGTH,
            value_parser = clap::value_parser!(u32).range(MIN_LENGTH_RANGE.0 as i64..=MIN_LENGTH_RANGE.1 as i64)
        )]
        min_length: u32,
        /// Maximum summary length
        #[arg(
            long,
            default_value_t = DEFAULT_MAX_LENGTH,
            value_parser = clap::value_parser!(u32).range(MAX_LENGTH_RANGE.0 as i64..=MAX_LENGTH_RANGE.1 as i64)
        )]
        max_length: u32,
    },
}

fn read_text(text: Option<String>) -> io::Result<String> {
    match text {
        Some(text) if text != "-" => Ok(text),
        _ => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn report<T>(outcome: OperationOutcome<T>, render: impl FnOnce(T)) -> ExitCode {
    match outcome {
        OperationOutcome::Success { result } => {
            render(result);
            ExitCode::SUCCESS
        }
        OperationOutcome::ValidationWarning { message } => {
            eprintln!("⚠️ {}", message);
            ExitCode::from(2)
        }
        OperationOutcome::InferenceFailure { message }
        | OperationOutcome::InitializationFailure { message } => {
            eprintln!("❌ {}", message);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = InferenceConfig::from(cli.inference);
    tracing::debug!("Using {:?}", config);

    match cli.command {
        Commands::Serve { addr, lazy } => {
            let state = AppState::from_config(&config)?;
            if !lazy {
                info!("🧠 Loading models...");
                if let Err(e) = state.provider.preload().await {
                    error!("Error loading models: {}", e);
                    return Err(e.into());
                }
            }
            sg_web::serve(addr, state).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Sentiment { text } => {
            let text = read_text(text)?;
            let provider = Arc::new(ModelProvider::from_config(&config)?);
            let outcome = SentimentHandler::new(provider).analyze(&text).await;
            Ok(report(outcome, |result| {
                println!("Sentiment:  {}", result.label);
                println!("Confidence: {}", result.confidence());
            }))
        }
        Commands::Summarize { text, min_length, max_length } => {
            let text = read_text(text)?;
            let provider = Arc::new(ModelProvider::from_config(&config)?);
            let handler = SummarizationHandler::new(provider, config.do_sample);
            let outcome = handler.summarize(&text, min_length, max_length).await;
            Ok(report(outcome, |result| println!("{}", result.summary_text)))
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
