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

use std::fs::read_to_string;
use std::path::Path;
use std::path::PathBuf;

use log::debug;
use serde::Deserialize;

use crate::error::Fallible;
use crate::error::fail;

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "studyloop.toml";

pub const DEFAULT_DATABASE_FILE: &str = "studyloop.db";

#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Path to the SQLite database.
    pub database: Option<PathBuf>,
    pub session: SessionConfig,
}

#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Maximum number of items per study session.
    pub limit: Option<usize>,
}

impl Config {
    pub fn parse(text: &str) -> Fallible<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load the configuration. An explicit path must exist; the default file
    /// is optional.
    pub fn load(path: Option<&Path>) -> Fallible<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return fail(format!("config file not found: {}", path.display()));
                }
                debug!("reading config from {}", path.display());
                Self::parse(&read_to_string(path)?)
            }
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    debug!("reading config from {}", path.display());
                    Self::parse(&read_to_string(path)?)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// The database path, with a command-line value taking precedence.
    pub fn database_path(&self, flag: Option<&str>) -> PathBuf {
        match (flag, &self.database) {
            (Some(flag), _) => PathBuf::from(flag),
            (None, Some(path)) => path.clone(),
            (None, None) => PathBuf::from(DEFAULT_DATABASE_FILE),
        }
    }

    /// The session limit, with a command-line value taking precedence.
    pub fn session_limit(&self, flag: Option<usize>) -> Option<usize> {
        flag.or(self.session.limit)
    }
}
