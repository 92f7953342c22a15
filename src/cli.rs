// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! CLI options of an [`Allure`] translator.
//!
//! Meant to be flattened into an executor's own CLI:
//! ```rust
//! # use clap::Parser;
//! #
//! #[derive(clap::Parser)]
//! struct Opts {
//!     #[command(flatten)]
//!     allure: cucumber_allure::cli::Cli,
//! }
//!
//! let opts = Opts::parse_from([
//!     "runner",
//!     "--allure-link",
//!     "issue=https://example.org/issue/{}",
//!     "--allure-naming",
//!     "short",
//! ]);
//! let config = opts.allure.to_config().unwrap();
//! assert!(config.links.get("issue").is_some());
//! ```
//!
//! [`Allure`]: crate::writer::Allure

use crate::{
    config::{self, Config, NamingStrategy},
    error::ConfigResult,
    model::Label,
};

/// CLI options of an [`Allure`] translator.
///
/// [`Allure`]: crate::writer::Allure
#[derive(Clone, Debug, Default, clap::Args)]
#[group(skip)]
pub struct Cli {
    /// URL template of a link category, with `{}` standing for the link id.
    ///
    /// May be repeated, e.g. `--allure-link issue=https://jira/browse/{}`.
    #[arg(
        long = "allure-link",
        value_name = "type=pattern",
        value_parser = config::parse_pair,
        global = true
    )]
    pub links: Vec<(String, String)>,

    /// Extra label to add to every scenario report. May be repeated.
    #[arg(
        long = "allure-label",
        value_name = "name=value",
        value_parser = config::parse_pair,
        global = true
    )]
    pub labels: Vec<(String, String)>,

    /// Naming of steps: raw keyword and text, or text only.
    #[arg(long = "allure-naming", value_name = "long|short", global = true)]
    pub naming: Option<NamingStrategy>,

    /// Host name to report instead of the `HOSTNAME` one.
    #[arg(long = "allure-host", value_name = "name", global = true)]
    pub host: Option<String>,
}

impl Cli {
    /// Converts these [`Cli`] options into a [`Config`].
    ///
    /// # Errors
    ///
    /// If any link pattern has no `{}` placeholder.
    pub fn to_config(&self) -> ConfigResult<Config> {
        let mut config = Config::default();
        for (category, pattern) in &self.links {
            config.links.insert(category.as_str(), pattern.as_str())?;
        }
        config.labels.extend(
            self.labels.iter().map(|(name, value)| Label::new(name, value)),
        );
        config.naming = self.naming.unwrap_or_default();
        config.host.clone_from(&self.host);
        Ok(config)
    }
}
