use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use digest_datastore::{HistoryRecord, ModelConfiguration, PgDataStore, ProviderKind};
use video_digest::{
    export::{render_transcript, transcript_file_name},
    tracing::init_tracing_subscriber,
    yt::ytdlp::YtDlp,
    ProviderRegistry, SummaryLength, VideoProcessor, VideoProcessorBuilder,
};

#[derive(Parser)]
#[command(
    name = "video-digest",
    about = "Summarize YouTube videos with a configurable LLM provider"
)]
struct Cli {
    /// Database connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Working directory for downloaded subtitles
    #[arg(long, env = "VIDEO_DIGEST_WORKDIR", default_value = "/var/tmp/video-digest")]
    workdir: PathBuf,

    /// Path to the yt-dlp executable
    #[arg(long, env = "YTDLP_PATH", default_value = "yt-dlp")]
    yt_dlp_path: PathBuf,

    /// Path to yt-dlp cookies file
    #[arg(long, env = "YTDLP_COOKIES_PATH")]
    cookies_path: Option<PathBuf>,

    /// Subtitle languages passed to yt-dlp
    #[arg(long, env = "YTDLP_SUB_LANGS", default_value = YtDlp::DEFAULT_SUB_LANGS)]
    sub_langs: String,

    /// OpenAI-compatible API base URL
    #[arg(long, env = "OPENAI_BASE_URL", default_value = video_digest::openai::DEFAULT_BASE_URL)]
    openai_base_url: String,

    /// Anthropic API base URL
    #[arg(long, env = "ANTHROPIC_BASE_URL", default_value = video_digest::anthropic::DEFAULT_BASE_URL)]
    anthropic_base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch a video's transcript, summarize it and store the result
    Process {
        /// YouTube video URL
        url: String,

        /// Summary length: short, medium or long
        #[arg(long, default_value = "medium")]
        length: String,
    },
    /// Browse previously processed videos
    #[command(subcommand)]
    History(HistoryCommand),
    /// Manage LLM model configurations
    #[command(subcommand)]
    Models(ModelsCommand),
}

#[derive(Subcommand)]
enum HistoryCommand {
    /// List the most recent records
    List {
        #[arg(long, default_value = "10")]
        limit: i64,
    },
    /// Show the most recent record
    Latest,
    /// Show one record in full
    Show { id: i64 },
    /// Write a record's transcript to a text file
    Export {
        id: i64,

        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },
}

#[derive(Subcommand)]
enum ModelsCommand {
    /// List registered configurations
    List,
    /// Show the configuration summaries are generated with
    Active,
    /// Register a new configuration
    Register(RegisterArgs),
    /// Make a configuration the only active one
    Activate { id: i64 },
    /// Clear a configuration's active flag
    Deactivate { id: i64 },
}

#[derive(Args)]
struct RegisterArgs {
    /// Display name
    #[arg(long)]
    name: String,

    /// Provider kind, e.g. openai or anthropic
    #[arg(long, default_value = "openai")]
    provider: String,

    /// Provider-specific model identifier, e.g. gpt-4o
    #[arg(long)]
    model_id: String,

    /// API key; the provider is inferred from well-known key prefixes
    #[arg(long, env = "MODEL_API_KEY", hide_env_values = true)]
    api_key: String,
}

type Processor = VideoProcessor<PgDataStore, ProviderRegistry, YtDlp, YtDlp>;

async fn build_processor(cli: &Cli) -> anyhow::Result<Processor> {
    let store = PgDataStore::init(&cli.database_url).await?;

    let registry = ProviderRegistry::default()
        .with_openai_base_url(&cli.openai_base_url)
        .with_anthropic_base_url(&cli.anthropic_base_url);

    let yt_dlp = YtDlp::new(&cli.workdir)
        .with_binary(&cli.yt_dlp_path)
        .with_cookies(cli.cookies_path.clone())
        .with_sub_langs(&cli.sub_langs);

    Ok(VideoProcessorBuilder::new()
        .store(store)
        .summarizers(registry)
        .transcript_fetcher(yt_dlp.clone())
        .info_fetcher(yt_dlp)
        .build())
}

fn print_record(record: &HistoryRecord, full: bool) {
    println!(
        "#{} [{}] {} ({})",
        record.id,
        record.created_at.format("%Y-%m-%d %H:%M"),
        record.title.as_deref().unwrap_or("Untitled video"),
        record.duration.as_deref().unwrap_or("-"),
    );
    println!("  url: {}", record.video_url);
    if let Some(thumbnail) = &record.thumbnail_url {
        println!("  thumbnail: {thumbnail}");
    }
    println!("  length: {}", record.summary_length);
    if full {
        println!("\nSummary:\n{}\n\nTranscript:\n{}", record.summary, record.transcript);
    } else {
        println!("  summary: {}", record.summary.lines().next().unwrap_or_default());
    }
}

fn print_model(model: &ModelConfiguration) {
    println!(
        "{} #{} {} ({}/{})",
        if model.is_active { "*" } else { " " },
        model.id,
        model.name,
        model.provider,
        model.model_id,
    );
}

async fn run_history(processor: &Processor, command: HistoryCommand) -> anyhow::Result<()> {
    match command {
        HistoryCommand::List { limit } => {
            let records = processor.history(limit).await?;
            if records.is_empty() {
                println!("No videos processed yet");
            }
            for record in &records {
                print_record(record, false);
            }
        }
        HistoryCommand::Latest => match processor.latest().await? {
            Some(record) => print_record(&record, true),
            None => println!("No videos processed yet"),
        },
        HistoryCommand::Show { id } => {
            let record = processor
                .history_record(id)
                .await?
                .with_context(|| format!("History record {id} not found"))?;
            print_record(&record, true);
        }
        HistoryCommand::Export { id, output_dir } => {
            let record = processor
                .history_record(id)
                .await?
                .with_context(|| format!("History record {id} not found"))?;

            let path = output_dir.join(transcript_file_name(record.title.as_deref()));
            tokio::fs::write(&path, render_transcript(&record))
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;

            tracing::info!(id, path = ?path, "Exported transcript");
            println!("{}", path.display());
        }
    }
    Ok(())
}

async fn run_models(processor: &Processor, command: ModelsCommand) -> anyhow::Result<()> {
    let service = processor.service();

    match command {
        ModelsCommand::List => {
            let models = service.list_models().await?;
            if models.is_empty() {
                println!("No models registered");
            }
            for model in &models {
                print_model(model);
            }
        }
        ModelsCommand::Active => print_model(&service.get_active_model().await?),
        ModelsCommand::Register(args) => {
            let provider = ProviderKind::from(args.provider.as_str());
            let model = service
                .register_model(&args.name, provider, &args.model_id, &args.api_key)
                .await?;

            if !ProviderRegistry::supports(&model.provider) {
                tracing::warn!(provider = %model.provider, "No adapter available for provider");
            }
            print_model(&model);
        }
        ModelsCommand::Activate { id } => {
            service.activate_model(id).await?;
            print_model(&service.get_active_model().await?);
        }
        ModelsCommand::Deactivate { id } => service.deactivate_model(id).await?,
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    let processor = build_processor(&cli).await?;

    match cli.command {
        Command::Process { url, length } => {
            let length = SummaryLength::parse_lenient(&length);
            match processor.process(&url, length).await {
                Ok(record) => print_record(&record, true),
                Err(e) => {
                    let kind = if e.is_client_error() {
                        "invalid request"
                    } else {
                        "processing failed"
                    };
                    tracing::error!(error = %e, kind, "Failed to process video");
                    return Err(anyhow::Error::new(e).context(kind));
                }
            }
        }
        Command::History(command) => run_history(&processor, command).await?,
        Command::Models(command) => run_models(&processor, command).await?,
    }

    Ok(())
}
