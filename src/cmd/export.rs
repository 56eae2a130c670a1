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

use std::fs::write;
use std::io::Write;
use std::path::Path;

use log::info;

use crate::db::Database;
use crate::error::Fallible;

/// Write every topic, with review state, as a pretty-printed JSON array. With
/// no `output` path the JSON goes to `out`.
pub fn export_topics(db: &Database, output: Option<&Path>, out: &mut dyn Write) -> Fallible<()> {
    let topics = db.all_topics()?;
    let json = serde_json::to_string_pretty(&topics)?;
    match output {
        Some(path) => {
            write(path, json)?;
            info!("exported {} topics to {}", topics.len(), path.display());
        }
        None => writeln!(out, "{json}")?,
    }
    Ok(())
}
