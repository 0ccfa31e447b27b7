//! Project records: a rack of modules with a power supply.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::module::{ModuleSpec, PowerRails};

/// Project id format: `prj_<base36 millis>_<9 base36 chars>`.
const PROJECT_ID_PATTERN: &str = r"^prj_[0-9a-z]+_[0-9a-z]{9}$";

static PROJECT_ID_REGEX: OnceLock<Regex> = OnceLock::new();

fn project_id_regex() -> &'static Regex {
    PROJECT_ID_REGEX.get_or_init(|| Regex::new(PROJECT_ID_PATTERN).expect("invalid regex pattern"))
}

/// Checks if a project id has the assigned-id format.
pub fn is_valid_project_id(id: &str) -> bool {
    project_id_regex().is_match(id)
}

/// The rack a project is built into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RackSpec {
    /// Rack width in HP.
    pub width: u32,
    /// Supply capacity per rail in mA.
    pub power_supply: PowerRails,
}

/// System-assigned bookkeeping. Never taken from user input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetadata {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u32,
}

impl ProjectMetadata {
    /// Metadata for a project created at `now`.
    pub fn fresh(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }

    /// Metadata for the next revision, never moving `updated_at` backwards.
    ///
    /// Returns `None` when the version counter is exhausted.
    pub fn next(&self, now: DateTime<Utc>) -> Option<Self> {
        Some(Self {
            created_at: self.created_at,
            updated_at: now.max(self.updated_at),
            version: self.version.checked_add(1)?,
        })
    }
}

/// A saved project whose system-assigned fields cannot be trusted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("project id '{0}' is not an assigned id (prj_<base36>_<9 base36 chars>)")]
    MalformedId(String),

    #[error("project '{id}' was updated at {updated_at}, before it was created at {created_at}")]
    UpdatedBeforeCreated {
        id: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    },

    #[error("project '{0}' has version 0; versions start at 1")]
    ZeroVersion(String),
}

/// A project: an ordered list of modules plus the rack they live in.
///
/// Modules are owned copies; adding a module to a project never aliases the
/// editor's working module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSpec {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub modules: Vec<ModuleSpec>,
    pub rack: RackSpec,
    pub metadata: ProjectMetadata,
}

impl ProjectSpec {
    /// Summed draw of every module, per rail.
    pub fn total_draw(&self) -> PowerRails {
        self.modules
            .iter()
            .fold(PowerRails::default(), |acc, m| acc.add(&m.power_draw))
    }

    /// Summed width of every module in HP.
    pub fn total_width_hp(&self) -> u32 {
        self.modules.iter().map(|m| m.width).sum()
    }

    /// Checks the fields only the system assigns: the id format, a version
    /// of at least 1, and `updated_at >= created_at`.
    pub fn check_identity(&self) -> Result<(), IdentityError> {
        if !is_valid_project_id(&self.id) {
            return Err(IdentityError::MalformedId(self.id.clone()));
        }
        if self.metadata.version == 0 {
            return Err(IdentityError::ZeroVersion(self.id.clone()));
        }
        if self.metadata.updated_at < self.metadata.created_at {
            return Err(IdentityError::UpdatedBeforeCreated {
                id: self.id.clone(),
                created_at: self.metadata.created_at,
                updated_at: self.metadata.updated_at,
            });
        }
        Ok(())
    }
}
