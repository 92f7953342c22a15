mod common;

use std::{collections::HashSet, sync::Arc};

use cucumber_allure::{
    event::TestCase, Allure, Event, FeatureExt as _, Lifecycle, Memory, Status,
};
use tokio::task;

use self::common::{load, Executor};

const WORKERS: usize = 3;

async fn run_worker(
    allure: Arc<Allure<Arc<Memory>>>,
    executor: Arc<Executor>,
    cases: Vec<TestCase>,
    worker: usize,
) {
    for case in cases {
        for ev in executor.case_events(&case) {
            allure.handle_event(Event::new(worker, ev)).unwrap();
            task::yield_now().await;
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 3)]
async fn scenarios_of_concurrent_workers_stay_apart() {
    let sink = Arc::new(Memory::new());
    let allure = Arc::new(Allure::new(Arc::clone(&sink)));
    let executor = Arc::new(Executor::new());

    let mut cases = vec![];
    let mut scenarios = 0;
    for rel in ["parallel.feature", "examples.feature", "simple.feature"] {
        let (path, text, feature) = load(rel);
        allure
            .handle_event(Event::new(0, Lifecycle::SourceRead { path, text }))
            .unwrap();
        scenarios += feature.count_scenarios();
        cases.extend(executor.cases(&feature));
    }
    let total = cases.len();
    assert_eq!(total, scenarios);

    let mut batches = vec![vec![]; WORKERS];
    for (i, case) in cases.into_iter().enumerate() {
        batches[i % WORKERS].push(case);
    }
    let tasks = batches
        .into_iter()
        .enumerate()
        .map(|(worker, batch)| {
            task::spawn(run_worker(
                Arc::clone(&allure),
                Arc::clone(&executor),
                batch,
                worker,
            ))
        })
        .collect::<Vec<_>>();
    for t in tasks {
        t.await.unwrap();
    }

    assert_eq!(allure.active(), 0);
    let results = sink.results();
    assert_eq!(results.len(), total);
    assert_eq!(sink.containers().len(), total);
    assert!(results.iter().all(|r| r.status == Some(Status::Passed)));

    let expected = [
        ["Given  a is 1", "And  b is 3", "When  I add a to b", "Then  result is 4"],
        ["Given  a is 2", "And  b is 4", "When  I add a to b", "Then  result is 6"],
        ["Given  a is 7", "And  b is 8", "When  I add a to b", "Then  result is 15"],
    ];
    for steps in expected {
        assert!(
            results.iter().any(|r| r
                .steps
                .iter()
                .map(|s| s.name.as_str())
                .eq(steps.iter().copied())),
            "no result with steps {steps:?}",
        );
    }

    let uuids = results.iter().map(|r| r.uuid.as_str()).collect::<HashSet<_>>();
    assert_eq!(uuids.len(), total);

    let threads = results
        .iter()
        .flat_map(|r| r.label_values("thread"))
        .collect::<HashSet<_>>();
    assert_eq!(threads.len(), WORKERS);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn same_scenario_on_many_workers() {
    let sink = Arc::new(Memory::new());
    let allure = Arc::new(Allure::new(Arc::clone(&sink)));
    let executor = Arc::new(Executor::new());
    let (_, _, feature) = load("simple.feature");
    let case = executor.cases(&feature).remove(0);

    let tasks = (0..8)
        .map(|worker| {
            task::spawn(run_worker(
                Arc::clone(&allure),
                Arc::clone(&executor),
                vec![case.clone(); 5],
                worker,
            ))
        })
        .collect::<Vec<_>>();
    for t in tasks {
        t.await.unwrap();
    }

    let results = sink.results();
    assert_eq!(results.len(), 40);
    assert!(results.iter().all(|r| r.steps.len() == 4));
    assert_eq!(
        results.iter().map(|r| r.history_id.as_str()).collect::<HashSet<_>>().len(),
        1,
    );
}
