#![no_main]

use libfuzzer_sys::fuzz_target;
use road_scenery::{parse_scenery, LaneGraph};

fuzz_target!(|data: &[u8]| {
    let Ok(xml) = std::str::from_utf8(data) else {
        return;
    };
    // Fehler sind erlaubt, Panics nicht
    if let Ok(report) = parse_scenery(xml) {
        let _ = report.summary();
        let _ = LaneGraph::build(&report.scenery);
    }
});
