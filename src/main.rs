use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use manga_utils::cli::{
    execute_compress, execute_describe, execute_rename, Cli, Commands, CompressConfig,
    DescribeConfig,
};

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Rename { parent_directory } => {
            execute_rename(parent_directory).await?;
        }
        Commands::Compress {
            source,
            delete,
            no_move,
            super_resolution,
            scale,
            done_dir,
            json,
            quiet,
        } => {
            let summary = execute_compress(CompressConfig {
                source,
                delete,
                no_move,
                super_resolution,
                scale,
                done_dir,
                json,
                quiet,
            })
            .await?;
            if !json {
                println!("📊 {summary}");
            }
        }
        Commands::Describe {
            folder,
            title,
            author,
            artist,
            description,
            genres,
            status,
            nsfw,
        } => {
            execute_describe(DescribeConfig {
                folder,
                title,
                author,
                artist,
                description,
                genres,
                status,
                nsfw,
            })
            .await?;
        }
    }

    Ok(())
}
