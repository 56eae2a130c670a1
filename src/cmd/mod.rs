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

use std::fmt::Display;
use std::fmt::Formatter;

use clap::ValueEnum;
use studyloop_core::Topic;

use crate::db::Database;
use crate::error::Fallible;
use crate::error::fail;

pub mod export;
pub mod import;
pub mod queue;
pub mod review;
pub mod stats;
pub mod status;
pub mod study;

#[derive(ValueEnum, Clone, Copy, PartialEq, Debug)]
pub enum OutputFormat {
    /// Human-readable text.
    Text,
    /// JSON.
    Json,
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

fn require_topic(db: &Database, id: &str) -> Fallible<Topic> {
    match db.get_topic(id)? {
        Some(topic) => Ok(topic),
        None => fail(format!("no topic with id '{id}'.")),
    }
}
