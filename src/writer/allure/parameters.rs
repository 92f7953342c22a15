// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [Scenario Outline] example rows as report [`Parameter`]s.
//!
//! [Scenario Outline]: https://cucumber.io/docs/gherkin/reference#scenario-outline

use crate::model::Parameter;

/// Extracts [`Parameter`]s of the given [`gherkin::Scenario`] instantiated
/// from an example row, in column order.
///
/// Understands both [`Scenario`]s expanded by [`feature::Ext`] (keeping only
/// their own row) and ones keeping all their [`Examples`], in which case the
/// row is located by the [`Scenario`]'s line.
///
/// Empty for regular [`Scenario`]s.
///
/// [`Examples`]: gherkin::Examples
/// [`Scenario`]: gherkin::Scenario
/// [`feature::Ext`]: crate::feature::Ext
#[must_use]
pub fn extract(scenario: &gherkin::Scenario) -> Vec<Parameter> {
    if let [only] = scenario.examples.as_slice() {
        if let Some([header, row]) = only.table.as_ref().map(|t| t.rows.as_slice())
        {
            return zip(header, row);
        }
    }

    scenario
        .examples
        .iter()
        .find_map(|ex| {
            let table = ex.table.as_ref()?;
            let (header, rows) = table.rows.split_first()?;
            let id = scenario.position.line.checked_sub(table.position.line + 1)?;
            rows.get(id).map(|row| zip(header, row))
        })
        .unwrap_or_default()
}

/// Pairs the `header` cells with the `row` ones.
fn zip(header: &[String], row: &[String]) -> Vec<Parameter> {
    header
        .iter()
        .zip(row)
        .map(|(name, value)| Parameter { name: name.clone(), value: value.clone() })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::Ext as _;

    const OUTLINE: &str = "\
Feature: Examples
  Scenario Outline: Outline with <a>
    Given a is <a>
    And b is <b>

    Examples: first
      | a | b  |
      | 1 | 2  |
      | 3 | 40 |
";

    fn parse(text: &str) -> gherkin::Feature {
        gherkin::Feature::parse(text, gherkin::GherkinEnv::default()).unwrap()
    }

    fn pairs(params: &[Parameter]) -> Vec<(&str, &str)> {
        params.iter().map(|p| (p.name.as_str(), p.value.as_str())).collect()
    }

    #[test]
    fn expanded_rows_keep_column_order() {
        let feature = parse(OUTLINE).expand_examples().unwrap();

        assert_eq!(pairs(&extract(&feature.scenarios[0])), [("a", "1"), ("b", "2")]);
        assert_eq!(pairs(&extract(&feature.scenarios[1])), [("a", "3"), ("b", "40")]);
    }

    #[test]
    fn locates_row_by_line() {
        let feature = parse(OUTLINE);
        let mut scenario = feature.scenarios[0].clone();
        scenario.position.line = scenario.examples[0].position.line + 3;

        assert_eq!(pairs(&extract(&scenario)), [("a", "3"), ("b", "40")]);
    }

    #[test]
    fn locates_row_below_examples_description() {
        let feature = parse(
            "\
Feature: Examples
  Scenario Outline: Outline with <a>
    Given a is <a>

    Examples: described
      Small numbers only.
      | a |
      | 1 |
      | 7 |
",
        );
        let mut scenario = feature.scenarios[0].clone();
        scenario.position.line = 9;

        assert_eq!(pairs(&extract(&scenario)), [("a", "7")]);
    }

    #[test]
    fn regular_scenarios_have_none() {
        let feature = parse(
            "\
Feature: Plain
  Scenario: one
    Given a is 5
",
        );

        assert!(extract(&feature.scenarios[0]).is_empty());
    }
}
