//! textbook-qa 命令行入口

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use textbook_qa_lib::{load_config, AppConfig, AppError};

#[derive(Parser)]
#[command(name = "textbook-qa", version, about = "Question answering over open textbooks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// 各子命令共用的参数
#[derive(Args)]
struct CommonArgs {
    /// Config file path (default: ./textbook-qa.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Example identifier, overrides the config file
    #[arg(long)]
    example: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    Serve {
        #[command(flatten)]
        common: CommonArgs,

        /// Bind address, e.g. 0.0.0.0:8080
        #[arg(long)]
        bind: Option<String>,
    },

    /// Import textbook files (txt, md, markdown) into the example database
    Ingest {
        #[command(flatten)]
        common: CommonArgs,

        /// Remove existing documents first
        #[arg(long)]
        replace: bool,

        /// Files to import
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Answer a single question from the command line
    Ask {
        #[command(flatten)]
        common: CommonArgs,

        /// The question
        question: String,
    },
}

fn resolve_config(common: &CommonArgs) -> Result<AppConfig, AppError> {
    let mut config = load_config(common.config.as_deref())?;
    if let Some(example) = &common.example {
        config.example = example.clone();
    }
    Ok(config)
}

async fn execute(command: Commands) -> Result<(), AppError> {
    match command {
        Commands::Serve { common, bind } => {
            let mut config = resolve_config(&common)?;
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            textbook_qa_lib::serve(config).await
        }
        Commands::Ingest {
            common,
            replace,
            files,
        } => {
            let config = resolve_config(&common)?;
            let reports = textbook_qa_lib::run_ingest(&config, &files, replace)?;
            let total: usize = reports.iter().map(|r| r.documents).sum();
            for report in &reports {
                println!(
                    "{}: {} sections, {} paragraphs, {} documents",
                    report.file, report.sections, report.paragraphs, report.documents
                );
            }
            println!("Imported {} documents into {}", total, config.database_path().display());
            Ok(())
        }
        Commands::Ask { common, question } => {
            let config = resolve_config(&common)?;
            let prediction = textbook_qa_lib::ask_question(&config, &question)?;
            println!("Answer: {}", prediction.answer);
            println!();
            println!("Most Relevant Section:");
            println!("{}", prediction.section);
            Ok(())
        }
    }
}

/// 记录失败原因并给出进程退出码
fn exit_code(err: &AppError) -> i32 {
    tracing::error!(error = %err, "命令执行失败");
    1
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("textbook_qa_lib=info".parse().unwrap())
                .add_directive("textbook_qa=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = execute(cli.command).await {
        process::exit(exit_code(&e));
    }
}
