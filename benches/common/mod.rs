#![allow(dead_code)]
use std::fs;
use std::path::Path;

use plc::ast::Source;
use test_support::bench_cases;

const PROGRAMS_DIR: &str = "tests/programs";

/// `(label, program text)` for every fixture benchmarked under `tag`.
pub fn workloads(tag: &str) -> Vec<(String, String)> {
    bench_cases(Path::new(PROGRAMS_DIR), Some(tag))
        .unwrap_or_else(|err| panic!("load bench cases: {err:#}"))
        .into_iter()
        .map(|case| {
            let text = fs::read_to_string(&case.program_path)
                .unwrap_or_else(|err| panic!("read {}: {err}", case.program_path.display()));
            (case.name, text)
        })
        .collect()
}

pub fn load_source(text: &str) -> Source {
    plc::check(text).unwrap_or_else(|err| panic!("check failed: {err}"))
}
