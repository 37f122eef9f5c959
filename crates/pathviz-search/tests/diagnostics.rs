use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};
use pathviz_core::Grid;
use pathviz_search::{AStar, Dijkstra};

/// Keeps every record so the test can inspect what a search reported.
struct Capture {
    records: Mutex<Vec<(Level, String)>>,
}

impl Capture {
    fn warnings(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|(level, _)| *level == Level::Warn)
            .map(|(_, text)| text.clone())
            .collect()
    }
}

impl Log for Capture {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.records
            .lock()
            .unwrap()
            .push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

static CAPTURE: Capture = Capture {
    records: Mutex::new(Vec::new()),
};

// The global logger is process-wide, so this binary holds a single test.
#[test]
fn taking_over_a_held_grid_is_warned() {
    log::set_logger(&CAPTURE).unwrap();
    log::set_max_level(LevelFilter::Trace);

    let g = Grid::new(4, 4).unwrap();
    let first = Dijkstra::new(&g, g.start(), g.goal()).unwrap();
    assert!(CAPTURE.warnings().is_empty());

    let second = AStar::new(&g, g.start(), g.goal()).unwrap();
    let warnings = CAPTURE.warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].starts_with("astar:"));
    assert!(warnings[0].contains("still held by another search"));

    // A grid given back properly is taken without complaint.
    drop(first);
    drop(second);
    let _third = Dijkstra::new(&g, g.start(), g.goal()).unwrap();
    assert_eq!(CAPTURE.warnings().len(), 1);
}
