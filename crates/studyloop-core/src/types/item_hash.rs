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

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;

/// Content hash of a learnable item. Covers the item's kind and payload but
/// not its review state, so it survives reviews.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemHash {
    #[serde(skip)]
    inner: blake3::Hash,
}

impl ItemHash {
    pub fn hash_bytes(bytes: &[u8]) -> Self {
        Self {
            inner: blake3::hash(bytes),
        }
    }

    pub fn to_hex(self) -> String {
        self.inner.to_hex().to_string()
    }

    pub fn from_hex(s: &str) -> Fallible<Self> {
        let inner =
            blake3::Hash::from_hex(s).map_err(|_| ErrorReport::new(format!("invalid item hash: {s}")))?;
        Ok(Self { inner })
    }
}

impl Display for ItemHash {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl TryFrom<String> for ItemHash {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ItemHash::from_hex(&value)
    }
}

impl From<ItemHash> for String {
    fn from(hash: ItemHash) -> String {
        hash.to_hex()
    }
}

/// Incremental hasher. Every field is length-prefixed so that adjacent
/// fields cannot run into each other.
pub struct Hasher {
    inner: blake3::Hasher,
}

impl Hasher {
    pub fn new() -> Self {
        Self {
            inner: blake3::Hasher::new(),
        }
    }

    pub fn field(&mut self, data: &str) {
        self.inner.update(&(data.len() as u64).to_le_bytes());
        self.inner.update(data.as_bytes());
    }

    pub fn optional(&mut self, data: Option<&str>) {
        match data {
            Some(data) => {
                self.inner.update(&[1]);
                self.field(data);
            }
            None => {
                self.inner.update(&[0]);
            }
        }
    }

    pub fn finalize(self) -> ItemHash {
        ItemHash {
            inner: self.inner.finalize(),
        }
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}
