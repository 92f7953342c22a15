// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Configuration and validation errors.

use derive_more::with_trait::{Display, Error};

/// Configuration errors.
#[derive(Clone, Debug, Display, Eq, Error, PartialEq)]
pub enum ConfigError {
    /// Value is expected to be a `name=value` pair.
    #[display("Expected `name=value` pair, got `{input}`")]
    NotAPair {
        /// Malformed input.
        #[error(not(source))]
        input: String,
    },

    /// Link pattern doesn't contain a `{}` placeholder to substitute.
    #[display("Link pattern `{pattern}` of `{category}` has no `{{}}` placeholder")]
    MissingPlaceholder {
        /// Link category.
        #[error(not(source))]
        category: String,

        /// Offending pattern.
        #[error(not(source))]
        pattern: String,
    },

    /// Unknown naming strategy.
    #[display("Unknown naming strategy `{value}`, expected `long` or `short`")]
    UnknownNamingStrategy {
        /// Offending value.
        #[error(not(source))]
        value: String,
    },
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    /// Creates a new [`ConfigError::NotAPair`] error.
    #[must_use]
    pub fn not_a_pair(input: impl Into<String>) -> Self {
        Self::NotAPair { input: input.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_placeholder_display_escapes_braces() {
        let err = ConfigError::MissingPlaceholder {
            category: "issue".into(),
            pattern: "https://example.org/issue".into(),
        };

        assert_eq!(
            err.to_string(),
            "Link pattern `https://example.org/issue` of `issue` has no `{}` \
             placeholder",
        );
    }

    #[test]
    fn not_a_pair_display() {
        assert_eq!(
            ConfigError::not_a_pair("oops").to_string(),
            "Expected `name=value` pair, got `oops`",
        );
    }
}
