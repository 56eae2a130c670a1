// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::io::Write;
use std::io::stdin;
use std::io::stdout;
use std::path::Path;

use clap::Parser;
use clap::Subcommand;
use log::debug;
use studyloop_core::ItemKind;
use studyloop_core::Quality;
use studyloop_core::Timestamp;

use crate::cmd::OutputFormat;
use crate::cmd::export::export_topics;
use crate::cmd::import::import_topics;
use crate::cmd::queue::print_queue;
use crate::cmd::review::review_item;
use crate::cmd::stats::print_stats;
use crate::cmd::status::print_status;
use crate::cmd::study::study;
use crate::config::Config;
use crate::db::Database;
use crate::error::Fallible;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the database file. Overrides the configuration file.
    #[arg(long, global = true)]
    database: Option<String>,
    /// Path to a TOML configuration file. By default, `studyloop.toml` in the
    /// current directory is used if it exists.
    #[arg(long, global = true)]
    config: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import topic files (`*.json`) from a directory.
    Import {
        /// Directory to search recursively.
        directory: String,
    },
    /// Export all topics as JSON.
    Export {
        /// Optional path to the output file. By default, the output is printed to stdout.
        #[arg(long)]
        output: Option<String>,
    },
    /// Print dashboard statistics across all topics.
    Stats {
        #[arg(long, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print the status of every topic.
    Status {
        #[arg(long, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print the items of a topic that are due, in session order.
    Queue {
        topic: String,
        #[arg(long, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Record a single review.
    Review {
        topic: String,
        /// One of: flashcard, quiz, fill-in-blank, spot-the-error, case-study.
        kind: String,
        /// Position of the item within its kind.
        index: usize,
        /// Recall quality from 0 (blackout) to 5 (perfect).
        quality: i64,
    },
    /// Study the due items of a topic interactively.
    Study {
        topic: String,
        /// Maximum number of items in the session.
        #[arg(long)]
        limit: Option<usize>,
    },
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Cli = Cli::parse();
    let config = Config::load(cli.config.as_deref().map(Path::new))?;
    let database = config.database_path(cli.database.as_deref());
    debug!("using database {}", database.display());
    let mut db = Database::new(&database)?;
    // Read once: every command evaluates against a single instant.
    let now = Timestamp::now();
    let mut out = stdout().lock();
    match cli.command {
        Command::Import { directory } => {
            let count = import_topics(&mut db, Path::new(&directory), now)?;
            writeln!(out, "Imported {count} topics.")?;
            Ok(())
        }
        Command::Export { output } => {
            export_topics(&db, output.as_deref().map(Path::new), &mut out)
        }
        Command::Stats { format } => print_stats(&db, format, now, &mut out),
        Command::Status { format } => print_status(&db, format, now, &mut out),
        Command::Queue { topic, format } => print_queue(&db, &topic, format, now, &mut out),
        Command::Review {
            topic,
            kind,
            index,
            quality,
        } => {
            let kind = ItemKind::try_from(kind)?;
            let quality = Quality::try_from(quality)?;
            review_item(&mut db, &topic, kind, index, quality, now, &mut out)?;
            Ok(())
        }
        Command::Study { topic, limit } => {
            let limit = config.session_limit(limit);
            let mut input = stdin().lock();
            study(&mut db, &topic, limit, now, &mut input, &mut out)?;
            Ok(())
        }
    }
}
