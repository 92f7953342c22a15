// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Configuration of an [`Allure`] translator.
//!
//! [`Allure`]: crate::writer::Allure

use std::{collections::HashMap, env, str::FromStr};

use smart_default::SmartDefault;

use crate::{
    error::{ConfigError, ConfigResult},
    model::Label,
};

/// Placeholder substituted in link patterns.
pub const PLACEHOLDER: &str = "{}";

/// Property key prefix of link patterns: `allure.link.<category>.pattern`.
const LINK_PREFIX: &str = "allure.link.";

/// Property key suffix of link patterns.
const LINK_SUFFIX: &str = ".pattern";

/// Property key prefix of extra labels: `allure.label.<name>`.
const LABEL_PREFIX: &str = "allure.label.";

/// Property key of the [`NamingStrategy`].
const NAMING_KEY: &str = "cucumber.naming-strategy";

/// Property key of the host name.
const HOST_KEY: &str = "allure.hostName";

/// Way a [`gherkin::Step`] is named in a report.
#[derive(Clone, Copy, Debug, Eq, PartialEq, SmartDefault)]
pub enum NamingStrategy {
    /// Raw keyword followed by the step text: `Given  a is 5`.
    #[default]
    Long,

    /// Step text only: `a is 5`.
    Short,
}

impl FromStr for NamingStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "long" => Ok(Self::Long),
            "short" => Ok(Self::Short),
            _ => Err(ConfigError::UnknownNamingStrategy { value: s.to_owned() }),
        }
    }
}

/// URL templates of links, keyed by their category (`issue`, `tms`, ...).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LinkPatterns(HashMap<String, String>);

impl LinkPatterns {
    /// Registers the `pattern` of the given link `category`, replacing the
    /// previous one, if any.
    ///
    /// # Errors
    ///
    /// If the `pattern` has no [`PLACEHOLDER`] to substitute.
    pub fn insert(
        &mut self,
        category: impl Into<String>,
        pattern: impl Into<String>,
    ) -> ConfigResult<()> {
        let (category, pattern) = (category.into(), pattern.into());
        if !pattern.contains(PLACEHOLDER) {
            return Err(ConfigError::MissingPlaceholder { category, pattern });
        }
        _ = self.0.insert(category, pattern);
        Ok(())
    }

    /// Returns the pattern of the given link `category`, if registered.
    #[must_use]
    pub fn get(&self, category: &str) -> Option<&str> {
        self.0.get(category).map(String::as_str)
    }

    /// Resolves the URL of the link `id` in the given `category`.
    ///
    /// [`None`] if no pattern is registered for the `category`.
    #[must_use]
    pub fn resolve(&self, category: &str, id: &str) -> Option<String> {
        self.get(category).map(|p| p.replacen(PLACEHOLDER, id, 1))
    }

    /// Indicates whether no patterns are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Configuration of an [`Allure`] translator.
///
/// Usually read by the executor from its environment (properties file, CLI)
/// and passed in.
///
/// [`Allure`]: crate::writer::Allure
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Config {
    /// URL templates of links.
    pub links: LinkPatterns,

    /// Extra [`Label`]s merged into every [`TestResult`].
    ///
    /// [`TestResult`]: crate::model::TestResult
    pub labels: Vec<Label>,

    /// [`NamingStrategy`] of steps.
    pub naming: NamingStrategy,

    /// Host name to report. Falls back to the `HOSTNAME` environment
    /// variable, and then to `localhost`.
    pub host: Option<String>,
}

impl Config {
    /// Creates a new default [`Config`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a [`Config`] out of `allure.properties`-like key-value pairs.
    ///
    /// Recognized keys:
    /// - `allure.link.<category>.pattern`;
    /// - `allure.label.<name>`;
    /// - `cucumber.naming-strategy` (`long` or `short`);
    /// - `allure.hostName`.
    ///
    /// Other keys are ignored.
    ///
    /// # Errors
    ///
    /// If a link pattern has no [`PLACEHOLDER`], or the naming strategy is
    /// unknown.
    pub fn from_properties<K, V>(
        props: impl IntoIterator<Item = (K, V)>,
    ) -> ConfigResult<Self>
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut config = Self::default();
        for (key, value) in props {
            let (key, value) = (key.as_ref().trim(), value.into());
            if let Some(category) = key
                .strip_prefix(LINK_PREFIX)
                .and_then(|k| k.strip_suffix(LINK_SUFFIX))
            {
                config.links.insert(category, value)?;
            } else if let Some(name) = key.strip_prefix(LABEL_PREFIX) {
                config.labels.push(Label::new(name, value));
            } else if key == NAMING_KEY {
                config.naming = value.parse()?;
            } else if key == HOST_KEY {
                config.host = Some(value);
            }
        }
        Ok(config)
    }

    /// Registers the link `pattern` of the given `category`.
    ///
    /// # Errors
    ///
    /// If the `pattern` has no [`PLACEHOLDER`] to substitute.
    pub fn with_link(
        mut self,
        category: impl Into<String>,
        pattern: impl Into<String>,
    ) -> ConfigResult<Self> {
        self.links.insert(category, pattern)?;
        Ok(self)
    }

    /// Adds an extra [`Label`] to every [`TestResult`].
    ///
    /// [`TestResult`]: crate::model::TestResult
    #[must_use]
    pub fn with_label(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.labels.push(Label::new(name, value));
        self
    }

    /// Sets the [`NamingStrategy`] of steps.
    #[must_use]
    pub const fn with_naming(mut self, naming: NamingStrategy) -> Self {
        self.naming = naming;
        self
    }

    /// Sets the host name to report.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Resolves the host name to report.
    #[must_use]
    pub fn host_name(&self) -> String {
        self.host
            .clone()
            .or_else(|| env::var("HOSTNAME").ok().filter(|h| !h.is_empty()))
            .unwrap_or_else(|| "localhost".to_owned())
    }
}

/// Splits the given `input` into a `name=value` pair.
///
/// # Errors
///
/// If the `input` has no `=`, or its name part is empty.
pub fn parse_pair(input: &str) -> ConfigResult<(String, String)> {
    input
        .split_once('=')
        .filter(|(name, _)| !name.trim().is_empty())
        .map(|(name, value)| (name.trim().to_owned(), value.trim().to_owned()))
        .ok_or_else(|| ConfigError::not_a_pair(input))
}
