// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Content fingerprints for history identifiers.

use md5::{Digest as _, Md5};

use crate::model::Parameter;

/// Computes a stable 128-bit fingerprint of the given ordered `parts`,
/// rendered as lowercase hex.
///
/// Parts are separated, so `["ab", "c"]` and `["a", "bc"]` differ.
#[must_use]
pub fn fingerprint<I>(parts: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    let mut hasher = Md5::new();
    for part in parts {
        hasher.update(part.as_ref());
        hasher.update(b"\0");
    }
    format!("{:x}", hasher.finalize())
}

/// Computes the history identifier of a scenario out of its normalized
/// source `path`, its `signature` and its [`Parameter`]s.
///
/// [`Parameter`]s are sorted first, so their order doesn't matter.
#[must_use]
pub fn history_id(path: &str, signature: &str, params: &[Parameter]) -> String {
    let mut pairs = params
        .iter()
        .map(|p| format!("{}={}", p.name, p.value))
        .collect::<Vec<_>>();
    pairs.sort_unstable();

    fingerprint(
        [path.to_owned(), signature.to_owned()].into_iter().chain(pairs),
    )
}
