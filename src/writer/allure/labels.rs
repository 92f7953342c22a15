// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`Label`]s and [`Link`]s derived from tags, source location and
//! configuration.

use itertools::Itertools as _;
use lazy_regex::regex_is_match;

use crate::{
    config::LinkPatterns,
    event::TestCase,
    model::{Label, Link, StatusDetails},
};

/// Recognized severity levels.
const SEVERITIES: [&str; 5] = ["blocker", "critical", "normal", "minor", "trivial"];

/// Everything derived from the tags and the location of a [`TestCase`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Extracted {
    /// [`Label`]s.
    pub labels: Vec<Label>,

    /// [`Link`]s.
    pub links: Vec<Link>,

    /// Result flags (`known`, `muted`, `flaky`) only.
    pub flags: StatusDetails,
}

/// Location of a [`TestCase`] used to derive [`Label`]s.
#[derive(Clone, Copy, Debug)]
pub struct Origin<'a> {
    /// Normalized source path of the `.feature` file.
    pub path: &'a str,

    /// Host the executor runs on.
    pub host: &'a str,

    /// Name of the executing thread.
    pub thread: &'a str,
}

/// Derives [`Label`]s, [`Link`]s and result flags of the given [`TestCase`].
///
/// Links of a category without pattern get no URL, unless they're plain
/// `@link=`s already holding an absolute URL.
#[must_use]
pub fn extract(
    case: &TestCase,
    origin: Origin<'_>,
    links: &LinkPatterns,
    extra: &[Label],
) -> Extracted {
    let mut out = Extracted::default();
    let mut stories = vec![];

    for tag in case.tags().map(|t| t.trim_start_matches('@')).unique() {
        match tag.split_once('=') {
            Some((key, value)) => {
                composite(&mut out, &mut stories, tag, key, value.trim(), links);
            }
            None => simple(&mut out, tag),
        }
    }

    let feature = case.feature.name.as_str();
    let scenario = case.scenario.name.as_str();
    if stories.is_empty() {
        stories.push(scenario.to_owned());
    }
    out.labels.push(Label::new("feature", feature));
    out.labels
        .extend(stories.into_iter().map(|s| Label::new("story", s)));
    out.labels.push(Label::new("suite", feature));
    if let Some(rule) = &case.rule {
        out.labels.push(Label::new("subSuite", rule.name.as_str()));
    }
    out.labels.extend([
        Label::new("package", super::naming::package(origin.path, feature)),
        Label::new("testClass", scenario),
        Label::new("host", origin.host),
        Label::new("thread", origin.thread),
        Label::new("framework", "cucumber-rs"),
        Label::new("language", "rust"),
    ]);
    out.labels.extend(extra.iter().cloned());

    out
}

/// Handles a tag without a value.
fn simple(out: &mut Extracted, tag: &str) {
    let lower = tag.to_ascii_lowercase();
    match lower.as_str() {
        "known" => out.flags.known = true,
        "muted" => out.flags.muted = true,
        "flaky" => out.flags.flaky = true,
        level if SEVERITIES.contains(&level) => {
            out.labels.push(Label::new("severity", level));
        }
        _ => out.labels.push(Label::new("tag", tag)),
    }
}

/// Handles a `key=value` tag.
fn composite(
    out: &mut Extracted,
    stories: &mut Vec<String>,
    tag: &str,
    key: &str,
    value: &str,
    links: &LinkPatterns,
) {
    let key = key.trim().to_ascii_lowercase();
    match key.as_str() {
        "severity" => {
            let level = value.to_ascii_lowercase();
            if SEVERITIES.contains(&level.as_str()) {
                out.labels.push(Label::new("severity", level));
            } else {
                tracing::warn!(tag, "unknown severity level, kept as a tag");
                out.labels.push(Label::new("tag", tag));
            }
        }
        "owner" | "epic" => out.labels.push(Label::new(key.as_str(), value)),
        "story" => stories.push(value.to_owned()),
        "issue" => out.links.push(link("issue", value, links)),
        "tmslink" | "tms" => out.links.push(link("tms", value, links)),
        "link" => out.links.push(link("link", value, links)),
        _ => {
            tracing::warn!(tag, "unsupported composite tag, kept as a tag");
            out.labels.push(Label::new("tag", tag));
        }
    }
}

/// Creates a [`Link`] of the given `category`, resolving its URL.
fn link(category: &str, id: &str, links: &LinkPatterns) -> Link {
    let url = links.resolve(category, id).or_else(|| {
        let absolute = (category == "link"
            && regex_is_match!(r"^[a-zA-Z][a-zA-Z0-9+.\-]*://\S+$", id))
            .then(|| id.to_owned());
        if absolute.is_none() {
            tracing::warn!(
                category,
                id,
                "no `allure.link.{category}.pattern` configured, link has no URL"
            );
        }
        absolute
    });
    Link { name: id.to_owned(), link_type: category.to_owned(), url }
}
