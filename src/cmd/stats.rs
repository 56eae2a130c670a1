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

use serde::Serialize;
use studyloop_core::GlobalStats;
use studyloop_core::Timestamp;
use studyloop_core::global_stats;

use crate::cmd::OutputFormat;
use crate::db::Database;
use crate::error::Fallible;

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
struct StatsReport {
    topics: usize,
    items: usize,
    #[serde(flatten)]
    stats: GlobalStats,
    reviews_today: usize,
}

fn collect(db: &Database, now: Timestamp) -> Fallible<StatsReport> {
    let topics = db.all_topics()?;
    Ok(StatsReport {
        topics: topics.len(),
        items: topics.iter().map(|t| t.item_count()).sum(),
        stats: global_stats(&topics, now),
        reviews_today: db.count_reviews_on(now.date())?,
    })
}

pub fn print_stats(
    db: &Database,
    format: OutputFormat,
    now: Timestamp,
    out: &mut dyn Write,
) -> Fallible<()> {
    let report = collect(db, now)?;
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?,
        OutputFormat::Text => {
            writeln!(out, "Topics:        {}", report.topics)?;
            writeln!(out, "Items:         {}", report.items)?;
            writeln!(out, "Due today:     {}", report.stats.due)?;
            writeln!(out, "Weak:          {}", report.stats.weak)?;
            writeln!(out, "New:           {}", report.stats.new)?;
            writeln!(out, "Reviews today: {}", report.reviews_today)?;
        }
    }
    Ok(())
}
