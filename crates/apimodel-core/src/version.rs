//! API version identifiers.

use crate::error::ModelError;
use apimodel_config::ModelBuildConfig;
use chrono::NaiveDate;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

const GROUP_VERSION_FORMAT: &str = "%Y-%m-%d";
const GROUP_VERSION_LEN: usize = 10;

/// Identifies one version of an API surface.
///
/// A version has an optional group date, an optional `major.minor` pair and
/// an optional status label: `1.0`, `2.1-beta`, `2017-05-01`,
/// `2017-05-01.1.0-rc`. At least one of the group date or the major version
/// is always present.
///
/// Ordering compares group date, major, minor (missing minor counts as 0),
/// then status, where a release sorts after any pre-release label of the
/// same number (`1.0-beta < 1.0`). Status labels compare case-insensitively.
#[derive(Debug, Clone)]
pub struct ApiVersion {
    group: Option<NaiveDate>,
    major: Option<u32>,
    minor: Option<u32>,
    status: Option<String>,
}

impl ApiVersion {
    /// `major.minor` version without a group date or status.
    pub fn new(major: u32, minor: u32) -> Self {
        Self {
            group: None,
            major: Some(major),
            minor: Some(minor),
            status: None,
        }
    }

    /// Date-only version such as `2017-05-01`.
    pub fn from_group(group: NaiveDate) -> Self {
        Self {
            group: Some(group),
            major: None,
            minor: None,
            status: None,
        }
    }

    /// Attach a status label (`alpha`, `beta`, `rc1`, ...).
    pub fn with_status(mut self, status: impl Into<String>) -> Result<Self, ModelError> {
        let status = status.into();
        if let Err(reason) = validate_status(&status) {
            return Err(ModelError::InvalidVersion {
                value: format!("{self}-{status}"),
                reason: reason.to_string(),
            });
        }
        self.status = Some(status);
        Ok(self)
    }

    pub fn group(&self) -> Option<NaiveDate> {
        self.group
    }

    pub fn major(&self) -> Option<u32> {
        self.major
    }

    pub fn minor(&self) -> Option<u32> {
        self.minor
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// True when the version carries a status label.
    pub fn is_prerelease(&self) -> bool {
        self.status.is_some()
    }

    fn normalized_status(&self) -> Option<String> {
        self.status.as_ref().map(|status| status.to_ascii_lowercase())
    }
}

fn validate_status(status: &str) -> Result<(), &'static str> {
    if status.is_empty() {
        return Err("status must not be empty");
    }
    if !status.chars().all(|ch| ch.is_ascii_alphanumeric()) {
        return Err("status must be alphanumeric");
    }
    Ok(())
}

fn parse_component(text: &str, name: &str) -> Result<u32, String> {
    text.parse::<u32>()
        .map_err(|_| format!("{name} version `{text}` is not a number"))
}

fn parse_version(text: &str) -> Result<ApiVersion, String> {
    let trimmed = text.trim();
    let body = trimmed.strip_prefix(['v', 'V']).unwrap_or(trimmed);
    if body.is_empty() {
        return Err("version is empty".to_string());
    }

    let group = body
        .get(..GROUP_VERSION_LEN)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, GROUP_VERSION_FORMAT).ok());
    let rest = if group.is_some() {
        &body[GROUP_VERSION_LEN..]
    } else {
        body
    };

    let (numbers, status) = match rest.split_once('-') {
        Some((numbers, status)) => (numbers, Some(status)),
        None => (rest, None),
    };

    let numbers = if group.is_some() && !numbers.is_empty() {
        numbers
            .strip_prefix('.')
            .ok_or_else(|| "expected `.` after the group version".to_string())?
    } else {
        numbers
    };

    let (major, minor) = if numbers.is_empty() {
        if group.is_none() {
            return Err("missing major version".to_string());
        }
        (None, None)
    } else {
        let mut parts = numbers.split('.');
        let major = parts.next().map(|part| parse_component(part, "major")).transpose()?;
        let minor = parts.next().map(|part| parse_component(part, "minor")).transpose()?;
        if parts.next().is_some() {
            return Err("too many version components".to_string());
        }
        (major, minor)
    };

    if let Some(status) = status {
        validate_status(status).map_err(str::to_string)?;
    }

    Ok(ApiVersion {
        group,
        major,
        minor,
        status: status.map(str::to_string),
    })
}

impl FromStr for ApiVersion {
    type Err = ModelError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        parse_version(text).map_err(|reason| ModelError::InvalidVersion {
            value: text.to_string(),
            reason,
        })
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(group) = self.group {
            write!(f, "{}", group.format(GROUP_VERSION_FORMAT))?;
        }
        if let Some(major) = self.major {
            if self.group.is_some() {
                f.write_str(".")?;
            }
            write!(f, "{major}.{}", self.minor.unwrap_or(0))?;
        }
        if let Some(status) = &self.status {
            write!(f, "-{status}")?;
        }
        Ok(())
    }
}

impl Ord for ApiVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.group
            .cmp(&other.group)
            .then_with(|| self.major.cmp(&other.major))
            .then_with(|| self.minor.unwrap_or(0).cmp(&other.minor.unwrap_or(0)))
            .then_with(|| match (self.normalized_status(), other.normalized_status()) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(left), Some(right)) => left.cmp(&right),
            })
    }
}

impl PartialOrd for ApiVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ApiVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ApiVersion {}

impl Hash for ApiVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.group.hash(state);
        self.major.hash(state);
        self.minor.unwrap_or(0).hash(state);
        self.normalized_status().hash(state);
    }
}

impl Serialize for ApiVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ApiVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(D::Error::custom)
    }
}

/// Parse the configured version list, sorted ascending with duplicates removed.
pub fn configured_api_versions(config: &ModelBuildConfig) -> Result<Vec<ApiVersion>, ModelError> {
    let mut versions = config
        .api_versions
        .iter()
        .map(|text| text.parse::<ApiVersion>())
        .collect::<Result<Vec<_>, _>>()?;
    versions.sort();
    versions.dedup();
    Ok(versions)
}
