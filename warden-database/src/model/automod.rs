use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Message filters AutoMod can run, in evaluation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoModFilter {
    Keywords,
    Invites,
    Links,
    Mentions,
    Caps,
}

impl AutoModFilter {
    pub const ALL: [AutoModFilter; 5] = [
        AutoModFilter::Keywords,
        AutoModFilter::Invites,
        AutoModFilter::Links,
        AutoModFilter::Mentions,
        AutoModFilter::Caps,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AutoModFilter::Keywords => "keywords",
            AutoModFilter::Invites => "invites",
            AutoModFilter::Links => "links",
            AutoModFilter::Mentions => "mentions",
            AutoModFilter::Caps => "caps",
        }
    }
}

impl fmt::Display for AutoModFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AutoModFilter {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim().to_ascii_lowercase();
        AutoModFilter::ALL
            .into_iter()
            .find(|filter| filter.as_str() == wanted)
            .ok_or_else(|| anyhow::anyhow!("unknown AutoMod filter `{raw}`"))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoModConfig {
    pub enabled_filters: BTreeSet<AutoModFilter>,
    pub ignored_channels: BTreeSet<u64>,
    pub ignored_roles: BTreeSet<u64>,
    /// Stored lower-case.
    pub keywords: BTreeSet<String>,
}

impl AutoModConfig {
    pub fn is_active(&self) -> bool {
        !self.enabled_filters.is_empty()
    }

    pub fn is_enabled(&self, filter: AutoModFilter) -> bool {
        self.enabled_filters.contains(&filter)
    }
}

#[cfg(test)]
mod tests {
    use super::{AutoModConfig, AutoModFilter};

    #[test]
    fn filters_parse_case_insensitively() {
        assert_eq!("Caps".parse::<AutoModFilter>().unwrap(), AutoModFilter::Caps);
        assert_eq!(" links ".parse::<AutoModFilter>().unwrap(), AutoModFilter::Links);
        assert!("spam".parse::<AutoModFilter>().is_err());
    }

    #[test]
    fn config_tolerates_missing_fields() {
        let config: AutoModConfig =
            serde_json::from_str(r#"{"enabled_filters":["keywords"]}"#).unwrap();
        assert!(config.is_enabled(AutoModFilter::Keywords));
        assert!(config.keywords.is_empty());
        assert!(config.is_active());
    }
}
