use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use flate2::Compression;
use flate2::write::GzEncoder;
use s2ds_client::Transport;
use s2ds_datasets::{DatasetEvent, DatasetOptions, Datasets, Error, Shard};
use serde_json::{Value, json};

/// Serves a fixed release index, shard listings and shard bodies from memory,
/// recording every shard that gets opened.
#[derive(Default)]
struct MockTransport {
    releases: Vec<String>,
    listings: HashMap<(String, String), Vec<String>>,
    bodies:   HashMap<String, Vec<u8>>,
    opened:   RefCell<Vec<String>>,
}

impl MockTransport {
    fn new(releases: &[&str]) -> Self {
        Self {
            releases: releases.iter().map(|r| r.to_string()).collect(),
            ..Default::default()
        }
    }

    fn shard(mut self, dataset: &str, release: &str, url: &str, body: Vec<u8>) -> Self {
        self.listings
            .entry((dataset.to_string(), release.to_string()))
            .or_default()
            .push(url.to_string());
        self.bodies.insert(url.to_string(), body);
        self
    }

    fn opened(&self) -> Vec<String> { self.opened.borrow().clone() }
}

fn not_found(url: String) -> s2ds_client::Error { s2ds_client::Error::Status { url, status: 404 } }

impl Transport for MockTransport {
    type Body = Cursor<Vec<u8>>;

    fn release_ids(&self) -> s2ds_client::Result<Vec<String>> { Ok(self.releases.clone()) }

    fn shard_urls(&self, dataset: &str, release_id: &str) -> s2ds_client::Result<Vec<String>> {
        self.listings
            .get(&(dataset.to_string(), release_id.to_string()))
            .cloned()
            .ok_or_else(|| not_found(format!("mock://release/{release_id}/dataset/{dataset}")))
    }

    fn open_shard(&self, url: &str) -> s2ds_client::Result<Self::Body> {
        self.opened.borrow_mut().push(url.to_string());
        self.bodies
            .get(url)
            .cloned()
            .map(Cursor::new)
            .ok_or_else(|| not_found(url.to_string()))
    }
}

fn gzip(text: impl AsRef<[u8]>) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_ref()).unwrap();
    encoder.finish().unwrap()
}

fn two_by_two() -> MockTransport {
    MockTransport::new(&["r1", "r2"])
        .shard("papers", "r2", "s1", gzip("{\"id\":\"1a\"}\n{\"id\":\"1b\"}\n"))
        .shard("papers", "r2", "s2", gzip("{\"id\":\"2a\"}\n{\"id\":\"2b\"}\n"))
}

fn ids(records: &[Value]) -> Vec<&str> { records.iter().map(|r| r["id"].as_str().unwrap()).collect() }

#[derive(Debug)]
enum TestError {
    Pipeline(Error),
    Rejected,
}

impl From<Error> for TestError {
    fn from(e: Error) -> Self { TestError::Pipeline(e) }
}

#[test]
fn shards_are_listed_unchanged() {
    let datasets = Datasets::new(
        MockTransport::new(&["r1"])
            .shard("papers", "r1", "u1", vec![])
            .shard("papers", "r1", "u2", vec![]),
    );

    assert_eq!(datasets.shards("papers", "r1").unwrap(), vec!["u1", "u2"]);
}

#[test]
fn stream_all_visits_shard_then_line_order() {
    let datasets = Datasets::new(two_by_two());

    let mut seen = Vec::new();
    datasets
        .stream_all("papers", |record| -> Result<(), Error> {
            seen.push(record);
            Ok(())
        })
        .unwrap();

    assert_eq!(ids(&seen), vec!["1a", "1b", "2a", "2b"]);
    assert_eq!(datasets.transport().opened(), vec!["s1", "s2"]);
}

#[test]
fn records_iterator_matches_stream_all() {
    let datasets = Datasets::new(two_by_two());

    let records: Vec<Value> = datasets
        .records("papers")
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(ids(&records), vec!["1a", "1b", "2a", "2b"]);
}

#[test]
fn shards_are_opened_lazily() {
    let datasets = Datasets::new(two_by_two());

    let mut records = datasets.records("papers").unwrap();
    assert!(datasets.transport().opened().is_empty());
    assert_eq!(records.remaining_shards(), 2);

    records.next().unwrap().unwrap();
    assert_eq!(datasets.transport().opened(), vec!["s1"]);

    records.next().unwrap().unwrap();
    records.next().unwrap().unwrap();
    assert_eq!(datasets.transport().opened(), vec!["s1", "s2"]);
}

#[test]
fn latest_release_is_used() {
    let transport = MockTransport::new(&["r1", "r2"])
        .shard("papers", "r1", "old", gzip("{\"id\":\"old\"}\n"))
        .shard("papers", "r2", "new", gzip("{\"id\":\"new\"}\n"));
    let datasets = Datasets::new(transport);

    let records: Vec<Value> = datasets.records("papers").unwrap().map(Result::unwrap).collect();
    assert_eq!(ids(&records), vec!["new"]);
}

#[test]
fn handler_error_stops_before_next_shard() {
    let datasets = Datasets::new(two_by_two());

    let mut accepted = Vec::new();
    let result = datasets.stream_all("papers", |record| {
        if !accepted.is_empty() {
            return Err(TestError::Rejected);
        }
        accepted.push(record);
        Ok(())
    });

    assert!(matches!(result, Err(TestError::Rejected)));
    assert_eq!(ids(&accepted), vec!["1a"]);
    assert_eq!(datasets.transport().opened(), vec!["s1"]);
}

#[test]
fn invalid_line_aborts_shard() {
    let transport = MockTransport::new(&["r1"]).shard(
        "papers",
        "r1",
        "bad",
        gzip("{\"id\":\"ok\"}\n{\"id\": oops}\n{\"id\":\"never\"}\n"),
    );
    let datasets = Datasets::new(transport);

    let mut seen = Vec::new();
    let result = datasets.stream_shard("bad", |record| -> Result<(), Error> {
        seen.push(record);
        Ok(())
    });

    match result {
        Err(Error::Parse { shard, line, .. }) => {
            assert_eq!(shard, "bad");
            assert_eq!(line, 2);
        }
        other => panic!("expected parse error, got {other:?}"),
    }
    assert_eq!(ids(&seen), vec!["ok"]);
}

#[test]
fn non_utf8_line_is_a_parse_error() {
    let transport = MockTransport::new(&["r1"]).shard(
        "papers",
        "r1",
        "latin1",
        gzip(b"{\"id\":\"ok\"}\n{\"id\":\"caf\xe9\"}\n{\"id\":\"never\"}\n"),
    );
    let datasets = Datasets::new(transport);

    let mut seen = Vec::new();
    let result = datasets.stream_all("papers", |record| -> Result<(), Error> {
        seen.push(record);
        Ok(())
    });

    match result {
        Err(Error::Parse { shard, line, .. }) => {
            assert_eq!(shard, "latin1");
            assert_eq!(line, 2);
        }
        other => panic!("expected parse error, got {other:?}"),
    }
    assert_eq!(ids(&seen), vec!["ok"]);
}

#[test]
fn parse_error_in_first_shard_skips_the_rest() {
    let transport = MockTransport::new(&["r1"])
        .shard("papers", "r1", "s1", gzip("nope\n"))
        .shard("papers", "r1", "s2", gzip("{}\n"));
    let datasets = Datasets::new(transport);

    let mut records = datasets.records("papers").unwrap();
    assert!(matches!(records.next(), Some(Err(Error::Parse { .. }))));
    assert!(records.next().is_none());
    assert_eq!(datasets.transport().opened(), vec!["s1"]);
}

#[test]
fn corrupt_gzip_is_read_error() {
    let body = b"definitely not a gzip member".to_vec();
    let datasets = Datasets::new(MockTransport::new(&["r1"]).shard("papers", "r1", "torn", body));

    let result: Result<Vec<Value>, Error> = datasets.shard_records("torn").unwrap().collect();
    assert!(matches!(result, Err(Error::Read { .. })), "unexpected: {result:?}");
}

#[test]
fn unknown_dataset_is_not_found() {
    let datasets = Datasets::new(two_by_two());

    match datasets.records("authors") {
        Err(Error::Client(err)) => assert!(err.is_not_found()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected an error"),
    }
}

#[test]
fn layer_sees_every_raw_line() {
    let datasets = Datasets::new(two_by_two());
    let lines = Rc::new(Cell::new(0u32));
    let layered = Rc::new(RefCell::new(Vec::new()));

    let counter = Rc::clone(&lines);
    let shards = Rc::clone(&layered);

    let mut seen = Vec::new();
    datasets
        .stream_all_with(
            "papers",
            move |shard, raw| {
                shards.borrow_mut().push(shard.index);
                let counter = Rc::clone(&counter);
                Box::new(raw.inspect(move |_| counter.set(counter.get() + 1)))
            },
            |record| -> Result<(), Error> {
                seen.push(record);
                Ok(())
            },
        )
        .unwrap();

    assert_eq!(ids(&seen), vec!["1a", "1b", "2a", "2b"]);
    assert_eq!(lines.get(), 4);
    assert_eq!(*layered.borrow(), vec![0, 1]);
}

#[test]
fn events_follow_the_pipeline() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let options = DatasetOptions::default().on_event(Arc::new(move |event: &DatasetEvent| {
        sink.lock().unwrap().push(event.clone());
    }));
    let datasets = Datasets::new(two_by_two()).with_options(options);

    let count = datasets.records("papers").unwrap().count();
    assert_eq!(count, 4);

    let s1 = Shard {
        index: 0,
        total: 2,
        url:   "s1".into(),
    };
    let s2 = Shard {
        index: 1,
        total: 2,
        url:   "s2".into(),
    };
    assert_eq!(
        *events.lock().unwrap(),
        vec![
            DatasetEvent::ReleaseResolved {
                release_id: "r2".into(),
            },
            DatasetEvent::ShardsListed {
                dataset:    "papers".into(),
                release_id: "r2".into(),
                count:      2,
            },
            DatasetEvent::ShardStarted { shard: s1.clone() },
            DatasetEvent::ShardStreamed {
                shard:   s1,
                records: 2,
            },
            DatasetEvent::ShardStarted { shard: s2.clone() },
            DatasetEvent::ShardStreamed {
                shard:   s2,
                records: 2,
            },
        ]
    );
}

#[test]
fn download_all_writes_raw_numbered_files() {
    let bodies = [gzip("{\"n\":0}\n"), gzip("{\"n\":1}\n"), gzip("{\"n\":2}\n")];
    let transport = MockTransport::new(&["r1"])
        .shard("ds", "r1", "a", bodies[0].clone())
        .shard("ds", "r1", "b", bodies[1].clone())
        .shard("ds", "r1", "c", bodies[2].clone());
    let datasets = Datasets::new(transport);
    let temp = tempfile::tempdir().unwrap();
    let dir = temp.path().join("nested").join("ds");

    let written = datasets.download_all("ds", &dir).unwrap();

    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["ds_000.gz", "ds_001.gz", "ds_002.gz"]);
    for (path, body) in written.iter().zip(&bodies) {
        assert_eq!(&std::fs::read(path).unwrap(), body);
    }
    assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 3);
}

#[test]
fn download_all_overwrites_previous_run() {
    let transport = MockTransport::new(&["r1"]).shard("ds", "r1", "a", gzip("{}\n"));
    let datasets = Datasets::new(transport);
    let temp = tempfile::tempdir().unwrap();
    std::fs::write(temp.path().join("ds_000.gz"), b"stale and much longer than the shard").unwrap();

    datasets.download_all("ds", temp.path()).unwrap();

    assert_eq!(std::fs::read(temp.path().join("ds_000.gz")).unwrap(), gzip("{}\n"));
}

#[test]
fn download_all_resolves_before_touching_disk() {
    let datasets = Datasets::new(two_by_two());
    let temp = tempfile::tempdir().unwrap();
    let dir = temp.path().join("authors");

    assert!(datasets.download_all("authors", &dir).is_err());
    assert!(!dir.exists());
}

#[test]
fn download_shard_reports_bytes() {
    let body = gzip("{\"id\":1}\n");
    let datasets = Datasets::new(MockTransport::new(&["r1"]).shard("ds", "r1", "only", body.clone()));
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("only.gz");

    let bytes = datasets.download_shard("only", &path).unwrap();

    assert_eq!(bytes, body.len() as u64);
    assert_eq!(std::fs::read(&path).unwrap(), body);
}

#[test]
fn download_shard_into_missing_directory_fails() {
    let datasets = Datasets::new(MockTransport::new(&["r1"]).shard("ds", "r1", "only", gzip("{}\n")));
    let temp = tempfile::tempdir().unwrap();

    let err = datasets
        .download_shard("only", temp.path().join("missing").join("only.gz"))
        .unwrap_err();
    assert!(matches!(err, Error::Write { .. }), "unexpected: {err}");
}

#[test]
fn records_stay_json_values() {
    let transport = MockTransport::new(&["r1"]).shard(
        "abstracts",
        "r1",
        "s",
        gzip("{\"corpusid\":42,\"abstract\":\"x\",\"openaccessinfo\":null}\n"),
    );
    let datasets = Datasets::new(transport);

    let record = datasets.records("abstracts").unwrap().next().unwrap().unwrap();
    assert_eq!(record, json!({"corpusid": 42, "abstract": "x", "openaccessinfo": null}));
}
