use criterion::{Criterion, criterion_group, criterion_main};
use junit_diff::core::mapping::MappingTable;
use junit_diff::core::models::{Model, TestId, TestResult};
use junit_diff::core::parser::read_report;
use junit_diff::core::source::Source;
use std::fmt::Write as _;
use std::fs;

const CASES: usize = 5_000;

fn synthetic_report() -> String {
    let mut xml = String::from("<?xml version=\"1.0\"?>\n<testsuite name=\"bench\">\n");
    for i in 0..CASES {
        let _ = match i % 50 {
            0 => writeln!(
                xml,
                "<testcase classname=\"com.example.legacy.Suite{}\" name=\"test{}\" time=\"0.{}\"><failure message=\"m\">trace</failure></testcase>",
                i / 100, i, i % 10
            ),
            _ => writeln!(
                xml,
                "<testcase classname=\"com.example.legacy.Suite{}\" name=\"test{}\" time=\"0.{}\"/>",
                i / 100, i, i % 10
            ),
        };
    }
    xml.push_str("</testsuite>\n");
    xml
}

fn bench_read_report(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bench.xml");
    fs::write(&path, synthetic_report()).unwrap();

    let mut mapping = MappingTable::new();
    mapping.insert("com\\.example\\.(legacy)\\.", "modern");
    let unmapped = MappingTable::new();

    c.bench_function("read_report", |b| {
        b.iter(|| {
            let source = Source::file(&path).unwrap();
            let mut committed: Vec<(TestId, TestResult)> = Vec::new();
            read_report(&source, &unmapped, &mut committed).unwrap();
        });
    });

    c.bench_function("read_report_mapped_into_model", |b| {
        b.iter(|| {
            let sources = vec![Source::file(&path).unwrap(), Source::file(&path).unwrap()];
            let mut model = Model::new(sources);
            for index in 0..model.sources().len() {
                let mut committed: Vec<(TestId, TestResult)> = Vec::new();
                read_report(&model.sources()[index], &mapping, &mut committed).unwrap();
                model.extend(committed);
            }
            model.len()
        });
    });
}

criterion_group!(benches, bench_read_report);
criterion_main!(benches);
