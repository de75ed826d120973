// SPDX-FileCopyrightText: 2026 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use bucketfs::{DEFAULT_URL_EXPIRY, EntryType};
use clap::{Parser, Subcommand};

use cmd::commands::{self, PutSource};
use cmd::common::{GlobalArgs, open_fs};

#[derive(Parser)]
#[command(author, version, about = "Browse an S3 bucket as a filesystem", long_about = None)]
#[command(name = "bfs")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the stats of a file or directory
    Stat {
        path: String,
        /// Only look for this kind of entry
        #[arg(long = "type")]
        entry_type: Option<EntryType>,
    },
    /// List the immediate children of a directory
    Ls {
        #[arg(default_value = "/")]
        path: String,
    },
    /// Print a file
    Cat { path: String },
    /// Write a file from --content, --from, or standard input
    Put {
        path: String,
        /// Literal content
        #[arg(short, long, conflicts_with = "from")]
        content: Option<String>,
        /// Host file to upload
        #[arg(short, long)]
        from: Option<PathBuf>,
        /// Append to the current content
        #[arg(short, long)]
        append: bool,
    },
    /// Delete a file
    Rm { path: String },
    /// Create a directory marker
    Mkdir { path: String },
    /// Delete a directory marker, leaving its contents
    Rmdir { path: String },
    /// Print a signed URL
    Url {
        path: String,
        /// GET, PUT, POST or DELETE
        #[arg(short, long, default_value = "GET")]
        method: String,
        /// Lifetime in seconds
        #[arg(short, long, default_value_t = DEFAULT_URL_EXPIRY.as_secs())]
        expires: u64,
        /// Sign the directory marker key
        #[arg(long)]
        dir: bool,
    },
    /// Replace the custom metadata of an entry
    Patch {
        path: String,
        /// key=value pairs
        #[arg(required = true)]
        properties: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    diagnostics::init_diagnostics();

    let cli = Cli::parse();
    let fs = open_fs(&cli.global)?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Stat { path, entry_type } => {
            commands::stat_command(&fs, &path, entry_type, &mut out).await?
        }
        Commands::Ls { path } => commands::ls_command(&fs, &path, &mut out).await?,
        Commands::Cat { path } => commands::cat_command(&fs, &path, &mut out).await?,
        Commands::Put {
            path,
            content,
            from,
            append,
        } => {
            let source = match (content, from) {
                (Some(content), _) => PutSource::Content(content),
                (None, Some(from)) => PutSource::File(from),
                (None, None) => PutSource::Stdin,
            };
            commands::put_command(&fs, &path, source, append).await?
        }
        Commands::Rm { path } => commands::rm_command(&fs, &path).await?,
        Commands::Mkdir { path } => commands::mkdir_command(&fs, &path).await?,
        Commands::Rmdir { path } => commands::rmdir_command(&fs, &path).await?,
        Commands::Url {
            path,
            method,
            expires,
            dir,
        } => commands::url_command(&fs, &path, &method, expires, dir, &mut out).await?,
        Commands::Patch { path, properties } => {
            commands::patch_command(&fs, &path, &properties).await?
        }
    }
    out.flush()?;
    Ok(())
}
