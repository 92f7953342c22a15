// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Names, paths and descriptions of report records.

use std::{env, path::Path};

use once_cell::sync::Lazy;

use crate::config::NamingStrategy;

/// Normalizes the given `path` of a `.feature` file: strips the current
/// project directory off it and uses `/` as the separator.
#[must_use]
pub fn normalize_path(path: &Path) -> String {
    /// Path of the current project directory.
    static CURRENT_DIR: Lazy<String> = Lazy::new(|| {
        env::var("CARGO_WORKSPACE_DIR")
            .or_else(|_| env::var("CARGO_MANIFEST_DIR"))
            .unwrap_or_else(|_| {
                env::current_dir()
                    .map(|path| path.display().to_string())
                    .unwrap_or_default()
            })
            .replace('\\', "/")
    });

    let path = path.display().to_string().replace('\\', "/");
    let path = match path.strip_prefix(CURRENT_DIR.as_str()) {
        Some(rest) if !CURRENT_DIR.is_empty() => rest,
        _ => path.as_str(),
    };
    path.trim_start_matches('/').trim_start_matches("./").to_owned()
}

/// Returns the fully qualified name of a scenario: its normalized source
/// `path` and `line`.
#[must_use]
pub fn full_name(path: &str, line: usize) -> String {
    format!("{path}:{line}")
}

/// Returns the `package` label of a scenario: its normalized source `path`
/// as a dotted name, followed by the `feature` name.
#[must_use]
pub fn package(path: &str, feature: &str) -> String {
    let path = path.replace('.', "_").replace('/', ".");
    if path.is_empty() {
        feature.to_owned()
    } else {
        format!("{path}.{feature}")
    }
}

/// Names the given [`gherkin::Step`] according to the [`NamingStrategy`].
///
/// The raw keyword keeps its trailing space, so [`NamingStrategy::Long`]
/// gives `Given  a is 5`.
#[must_use]
pub fn step_name(step: &gherkin::Step, naming: NamingStrategy) -> String {
    match naming {
        NamingStrategy::Long => format!("{} {}", step.keyword, step.value),
        NamingStrategy::Short => step.value.clone(),
    }
}

/// Builds the description of a scenario: the [`gherkin::Feature`]'s one,
/// then the [`gherkin::Scenario`]'s one.
///
/// Lines of the [`gherkin::Scenario`]'s description keep their indentation
/// when the raw `source` of the `.feature` file is available.
#[must_use]
pub fn description(
    feature: &gherkin::Feature,
    scenario: &gherkin::Scenario,
    source: Option<&str>,
) -> Option<String> {
    let scenario = scenario.description.as_deref().map(|text| {
        source
            .and_then(|src| src.get(scenario.span.start..))
            .and_then(|src| indented(src, text))
            .unwrap_or_else(|| text.to_owned())
    });

    match (feature.description.as_deref(), scenario) {
        (Some(f), Some(s)) => Some(format!("{f}\n{s}")),
        (Some(f), None) => Some(f.to_owned()),
        (None, s) => s,
    }
}

/// Recovers the raw lines of the `text` from the `source` starting at its
/// header line.
///
/// [`None`] if any line cannot be found.
fn indented(source: &str, text: &str) -> Option<String> {
    let mut raw = source.lines().skip(1);
    text.lines()
        .map(|wanted| {
            raw.find(|line| line.trim() == wanted.trim())
                .map(str::trim_end)
        })
        .collect::<Option<Vec<_>>>()
        .map(|lines| lines.join("\n"))
}
