//! Scripted Gherkin executor feeding an [`Allure`] translator.

#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use cucumber_allure::{
    event::{Cause, Hook, HookType, Outcome, Source, TestCase, TestStep},
    gherkin, Allure, Config, Event, FeatureExt as _, Lifecycle, Memory, Sink,
};
use regex::Regex;

/// Smallest valid PNG image.
pub const PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D,
    0x49, 0x48, 0x44, 0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01,
    0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4, 0x89,
];

/// State shared by the steps of a single scenario.
#[derive(Debug, Default)]
pub struct World {
    a: i64,
    b: i64,
    result: i64,

    /// Events emitted by the running step.
    emitted: Vec<Lifecycle>,
}

/// Step definition body.
pub type Body = fn(&mut World, &[&str]) -> Outcome;

/// Hook registered in an [`Executor`].
#[derive(Clone, Debug)]
struct HookDef {
    hook: Hook,
    tag: Option<String>,
    outcome: Outcome,
}

/// Executes `.feature` files against scripted step definitions, emitting
/// [`Lifecycle`] events the way a real executor does.
pub struct Executor {
    steps: Vec<(Regex, Body)>,
    hooks: Vec<HookDef>,
    filter: Option<String>,
    dry_run: bool,
}

impl Default for Executor {
    fn default() -> Self {
        Self {
            steps: vec![
                def(r"^a is (\d+)$", |w, args| {
                    w.a = args[0].parse().unwrap();
                    Outcome::Passed
                }),
                def(r"^b is (\d+)$", |w, args| {
                    w.b = args[0].parse().unwrap();
                    Outcome::Passed
                }),
                def(r"^I add a to b$", |w, _| {
                    w.result = w.a + w.b;
                    Outcome::Passed
                }),
                def(r"^result is (\d+)$", |w, args| {
                    let expected = args[0].parse::<i64>().unwrap();
                    if w.result == expected {
                        Outcome::Passed
                    } else {
                        Outcome::Failed(Cause::assertion(format!(
                            "assertion `left == right` failed\n  \
                             left: {}\n right: {expected}",
                            w.result,
                        )))
                    }
                }),
                def(r"^step is broken$", |_, _| {
                    Outcome::Failed(
                        Cause::error("called `Option::unwrap()` on a `None` value")
                            .with_trace("at tests/common/mod.rs"),
                    )
                }),
                def(r"^step is yet to be implemented$", |_, _| {
                    Outcome::Pending(Some(Cause::error("TODO: implement me")))
                }),
                def(r"^ambiguous step present$", |_, _| Outcome::Passed),
                def(r"^ambiguous step .+$", |_, _| Outcome::Passed),
                def(r"^something bad should happen$", |_, _| Outcome::Passed),
                def(r"^cat is (sad|murmur)$", |_, _| Outcome::Passed),
                def(r"^Pet the cat$", |_, _| Outcome::Passed),
                def(r"^Cat is happy$", |_, _| Outcome::Passed),
                def(r"^users are:$", |_, _| Outcome::Passed),
                def(r"^text is embedded$", |w, _| {
                    w.emitted.push(Lifecycle::embed(
                        "TextAttachment",
                        "text/plain",
                        "text attachment",
                    ));
                    Outcome::Passed
                }),
                def(r"^image is embedded$", |w, _| {
                    w.emitted.push(Lifecycle::embed(
                        "ImageAttachment",
                        "image/png",
                        PNG,
                    ));
                    Outcome::Passed
                }),
                def(r"^output is written$", |w, _| {
                    w.emitted.push(Lifecycle::Write("some output".into()));
                    Outcome::Passed
                }),
            ],
            hooks: vec![],
            filter: None,
            dry_run: false,
        }
    }
}

fn def(pattern: &str, body: Body) -> (Regex, Body) {
    (Regex::new(pattern).unwrap(), body)
}

impl Executor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a [`HookType::Before`] hook running on scenarios tagged
    /// with `tag`, or on every one.
    pub fn before(
        mut self,
        name: &str,
        tag: Option<&str>,
        outcome: Outcome,
    ) -> Self {
        self.hooks.push(HookDef {
            hook: Hook::before(name),
            tag: tag.map(Into::into),
            outcome,
        });
        self
    }

    /// Registers a [`HookType::After`] hook running on scenarios tagged with
    /// `tag`, or on every one.
    pub fn after(
        mut self,
        name: &str,
        tag: Option<&str>,
        outcome: Outcome,
    ) -> Self {
        self.hooks.push(HookDef {
            hook: Hook::after(name),
            tag: tag.map(Into::into),
            outcome,
        });
        self
    }

    /// Runs only scenarios matching the given tag expression.
    pub fn tags(mut self, expr: &str) -> Self {
        self.filter = Some(expr.into());
        self
    }

    /// Reports defined steps and hooks as passed without running them.
    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Runs the `.feature` file at the given path relative to
    /// `tests/features` on a single worker.
    pub fn run(&self, rel: &str) -> Arc<Memory> {
        self.run_with(Config::default(), rel)
    }

    /// Same as [`Executor::run()`], but with the given [`Config`].
    pub fn run_with(&self, config: Config, rel: &str) -> Arc<Memory> {
        let sink = Arc::new(Memory::new());
        let allure = Allure::with_config(Arc::clone(&sink), config);
        self.feed(&allure, rel, 0);
        assert_eq!(allure.active(), 0, "scenario left active");
        sink
    }

    /// Feeds all the events of the `.feature` file into the `allure`
    /// translator as emitted by the given `worker`.
    pub fn feed<S: Sink>(&self, allure: &Allure<S>, rel: &str, worker: usize) {
        let (path, text, feature) = load(rel);
        allure
            .handle_event(Event::new(worker, Lifecycle::SourceRead { path, text }))
            .unwrap();
        for case in self.cases(&feature) {
            for ev in self.case_events(&case) {
                allure.handle_event(Event::new(worker, ev)).unwrap();
            }
        }
    }

    /// Returns [`TestCase`]s of the given [`gherkin::Feature`] passing the
    /// tag filter.
    pub fn cases(&self, feature: &gherkin::Feature) -> Vec<TestCase> {
        let feature = Source::new(feature.clone());
        let plain = feature.scenarios.iter().map(|sc| TestCase {
            feature: feature.clone(),
            rule: None,
            scenario: Source::new(sc.clone()),
        });
        let ruled = feature.rules.iter().flat_map(|r| {
            let feature = feature.clone();
            let rule = Source::new(r.clone());
            r.scenarios.iter().map(move |sc| TestCase {
                feature: feature.clone(),
                rule: Some(rule.clone()),
                scenario: Source::new(sc.clone()),
            })
        });
        plain
            .chain(ruled)
            .filter(|case| {
                self.filter.as_deref().map_or(true, |expr| {
                    matches(expr, &case.tags().collect::<Vec<_>>())
                })
            })
            .collect()
    }

    /// Executes the given [`TestCase`], returning the emitted events.
    pub fn case_events(&self, case: &TestCase) -> Vec<Lifecycle> {
        let tags = case.tags().collect::<Vec<_>>();
        let mut out = vec![Lifecycle::TestCaseStarted(case.clone())];
        let mut world = World::default();

        let mut failed = false;
        for h in self.hooks_of(HookType::Before, &tags) {
            let outcome = self.hook_outcome(h);
            failed |= outcome != Outcome::Passed;
            out.push(Lifecycle::hook_started(h.hook.clone()));
            out.push(Lifecycle::hook_finished(h.hook.clone(), outcome));
        }

        let steps = case
            .background_steps()
            .map(|st| TestStep::Background(Source::new(st.clone())))
            .chain(
                case.scenario
                    .steps
                    .iter()
                    .map(|st| TestStep::Step(Source::new(st.clone()))),
            )
            .collect::<Vec<_>>();
        for step in steps {
            out.push(Lifecycle::TestStepStarted(step.clone()));
            let outcome = if failed {
                Outcome::Skipped
            } else {
                self.execute(&mut world, step.gherkin().unwrap())
            };
            out.append(&mut world.emitted);
            failed |= outcome != Outcome::Passed;
            out.push(Lifecycle::TestStepFinished(step, outcome));
        }

        for h in self.hooks_of(HookType::After, &tags) {
            out.push(Lifecycle::hook_started(h.hook.clone()));
            out.push(Lifecycle::hook_finished(
                h.hook.clone(),
                self.hook_outcome(h),
            ));
        }

        out.push(Lifecycle::TestCaseFinished);
        out
    }

    fn execute(&self, world: &mut World, step: &gherkin::Step) -> Outcome {
        let matched = self
            .steps
            .iter()
            .filter_map(|(re, body)| re.captures(&step.value).map(|c| (c, body)))
            .collect::<Vec<_>>();
        match matched.as_slice() {
            [] => Outcome::Undefined(None),
            [_] if self.dry_run => Outcome::Passed,
            [(caps, body)] => {
                let args = caps
                    .iter()
                    .skip(1)
                    .flatten()
                    .map(|m| m.as_str())
                    .collect::<Vec<_>>();
                body(world, &args)
            }
            many => Outcome::Ambiguous(Some(Cause::error(format!(
                "{} step definitions match `{}`",
                many.len(),
                step.value,
            )))),
        }
    }

    fn hooks_of<'s>(
        &'s self,
        ty: HookType,
        tags: &'s [&'s str],
    ) -> impl Iterator<Item = &'s HookDef> {
        self.hooks.iter().filter(move |h| {
            h.hook.ty == ty && h.tag.as_deref().map_or(true, |t| matches(t, tags))
        })
    }

    fn hook_outcome(&self, hook: &HookDef) -> Outcome {
        if self.dry_run {
            Outcome::Passed
        } else {
            hook.outcome.clone()
        }
    }
}

/// Reads and parses the `.feature` file at the given path relative to
/// `tests/features`, expanding its outlines.
pub fn load(rel: &str) -> (PathBuf, String, gherkin::Feature) {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/features")
        .join(rel);
    let text = fs::read_to_string(&path).unwrap();
    let mut feature =
        gherkin::Feature::parse(&text, gherkin::GherkinEnv::default()).unwrap();
    feature.path = Some(path.clone());
    (path, text, feature.expand_examples().unwrap())
}

/// Evaluates a tag expression built of `or`, `and` and `not` over the given
/// `tags`.
pub fn matches(expr: &str, tags: &[&str]) -> bool {
    let has = |tag: &str| tags.contains(&tag.trim().trim_start_matches('@'));
    expr.split(" or ").any(|conj| {
        conj.split(" and ").all(|term| match term.trim().strip_prefix("not ") {
            Some(tag) => !has(tag),
            None => has(term),
        })
    })
}
