// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Collecting of [`Attachment`]s.

use mime::Mime;
use uuid::Uuid;

use crate::{
    error::{Error, Result},
    event::WorkerId,
    model::Attachment,
    writer::Sink,
};

/// Name of a [`gherkin::Table`] attachment.
pub const DATA_TABLE: &str = "Data table";

/// MIME type of a [`gherkin::Table`] attachment.
pub const TSV: &str = "text/tab-separated-values";

/// Name of a text output attachment.
pub const TEXT_OUTPUT: &str = "Text output";

/// Stores the `content` in the [`Sink`] and attaches it to the `target`.
///
/// Returns the generated source identifier, unique among the `target`'s
/// [`Attachment`]s.
///
/// # Errors
///
/// If the [`Sink`] fails to store the `content`.
pub fn attach<S: Sink + ?Sized>(
    target: &mut Vec<Attachment>,
    name: &str,
    mime_type: &str,
    content: &[u8],
    sink: &S,
    worker: WorkerId,
) -> Result<String> {
    let ext = extension(mime_type);
    let source = loop {
        let candidate = format!("{}-attachment{ext}", Uuid::new_v4());
        if !target.iter().any(|a| a.source == candidate) {
            break candidate;
        }
    };

    sink.write_attachment(&source, content).map_err(|e| Error::Attachment {
        worker,
        source_id: source.clone(),
        source: e,
    })?;

    tracing::trace!(%worker, name, %source, "attachment stored");
    target.push(Attachment {
        name: name.to_owned(),
        mime_type: mime_type.to_owned(),
        source: source.clone(),
    });
    Ok(source)
}

/// Returns the file extension (with the leading dot) of the given MIME type,
/// or an empty string if it's unknown.
#[must_use]
pub fn extension(mime_type: &str) -> &'static str {
    let Ok(mime) = mime_type.trim().parse::<Mime>() else {
        return "";
    };
    match (mime.type_().as_str(), mime.subtype().as_str()) {
        ("text", "plain") => ".txt",
        ("text", "tab-separated-values") => ".tsv",
        ("text", "csv") => ".csv",
        ("text", "html") => ".html",
        ("text", "xml") | ("application", "xml") => ".xml",
        ("text", "uri-list") => ".uri",
        ("application", "json") => ".json",
        ("application", "pdf") => ".pdf",
        ("application", "zip") => ".zip",
        ("image", "png") => ".png",
        ("image", "jpeg") => ".jpg",
        ("image", "gif") => ".gif",
        ("image", "svg") => ".svg",
        ("image", "bmp") => ".bmp",
        ("video", "mp4") => ".mp4",
        ("video", "webm") => ".webm",
        _ => "",
    }
}

/// Renders the given [`gherkin::Table`] as tab-separated values, each row
/// terminated by a newline.
#[must_use]
pub fn data_table(table: &gherkin::Table) -> String {
    table.rows.iter().fold(String::new(), |mut out, row| {
        out.push_str(&row.join("\t"));
        out.push('\n');
        out
    })
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::{
        model::{TestResult, TestResultContainer},
        writer::Memory,
    };

    struct Failing;

    impl Sink for Failing {
        fn write_attachment(&self, _: &str, _: &[u8]) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }

        fn write_result(
            &self,
            _: TestResult,
            _: TestResultContainer,
        ) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn derives_extension_from_mime_type() {
        assert_eq!(extension("text/plain"), ".txt");
        assert_eq!(extension("text/plain; charset=utf-8"), ".txt");
        assert_eq!(extension("image/png"), ".png");
        assert_eq!(extension("application/json"), ".json");
        assert_eq!(extension("application/x-unknown"), "");
        assert_eq!(extension("not a mime"), "");
    }

    #[test]
    fn attaches_with_unique_sources() {
        let sink = Memory::new();
        let mut target = vec![];

        let first =
            attach(&mut target, "log", "text/plain", b"one", &sink, WorkerId(0))
                .unwrap();
        let second =
            attach(&mut target, "log", "text/plain", b"two", &sink, WorkerId(0))
                .unwrap();

        assert_ne!(first, second);
        assert!(first.ends_with("-attachment.txt"));
        assert_eq!(target.len(), 2);
        assert_eq!(sink.attachment(&second).as_deref(), Some(&b"two"[..]));
    }

    #[test]
    fn sink_failure_is_an_error() {
        let mut target = vec![];

        let err = attach(
            &mut target,
            "log",
            "application/octet-stream",
            b"x",
            &Failing,
            WorkerId(3),
        )
        .unwrap_err();

        assert!(matches!(err, Error::Attachment { worker: WorkerId(3), .. }));
        assert!(target.is_empty());
    }

    #[test]
    fn renders_data_table() {
        let feature = gherkin::Feature::parse(
            "\
Feature: Tables
  Scenario: table
    Given a table
      | a | b |
      | 1 | 2 |
",
            gherkin::GherkinEnv::default(),
        )
        .unwrap();
        let table = feature.scenarios[0].steps[0].table.as_ref().unwrap();

        assert_eq!(data_table(table), "a\tb\n1\t2\n");
    }
}
