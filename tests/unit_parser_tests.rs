//! # Parser Module Unit Tests / Parser 模块单元测试
//!
//! Tests for streaming JUnit reports into a result sink: states, durations,
//! name mapping and how far a broken report gets before it stops.
//!
//! 将 JUnit 报告流式读取到结果接收器的测试：状态、耗时、名称映射，
//! 以及损坏的报告在停止前能读取多少内容。

mod common;

use common::*;
use junit_diff::core::error::ReportError;
use junit_diff::core::mapping::MappingTable;
use junit_diff::core::models::{Model, TestId, TestResult, TestState};
use junit_diff::core::parser::read_report;
use junit_diff::core::source::Source;
use junit_diff::infra::archive::ArchiveHandle;

fn parse(content: &str) -> (Result<usize, ReportError>, Vec<(TestId, TestResult)>) {
    parse_mapped(content, &MappingTable::new())
}

fn parse_mapped(
    content: &str,
    mapping: &MappingTable,
) -> (Result<usize, ReportError>, Vec<(TestId, TestResult)>) {
    let dir = setup_test_environment();
    let path = write_file(dir.path(), "report.xml", content);
    let source = Source::file(&path).unwrap();
    let mut results: Vec<(TestId, TestResult)> = Vec::new();
    let outcome = read_report(&source, mapping, &mut results);
    (outcome, results)
}

#[cfg(test)]
mod state_tests {
    use super::*;

    #[test]
    fn test_pass_failure_and_error() {
        let xml = report(&[
            passed("a.Test", "ok", "0.5"),
            failed("a.Test", "bad", "0.7"),
            errored("a.Test", "boom", "1"),
        ]);
        let (outcome, results) = parse(&xml);
        assert_eq!(outcome.unwrap(), 3);

        let states: Vec<(&str, TestState, Option<f64>)> = results
            .iter()
            .map(|(id, r)| (id.name(), r.state, r.duration))
            .collect();
        assert_eq!(
            states,
            vec![
                ("ok", TestState::Pass, Some(0.5)),
                ("bad", TestState::Failure, Some(0.7)),
                ("boom", TestState::Error, Some(1.0)),
            ]
        );
    }

    #[test]
    fn test_last_marker_wins() {
        let xml = report(&[
            r#"<testcase classname="a" name="fe" time="1"><failure/><error/></testcase>"#.to_string(),
            r#"<testcase classname="a" name="ef" time="1"><error/><failure/></testcase>"#.to_string(),
        ]);
        let (_, results) = parse(&xml);
        assert_eq!(results[0].1.state, TestState::Error);
        assert_eq!(results[1].1.state, TestState::Failure);
    }

    #[test]
    fn test_tag_names_are_case_insensitive() {
        let xml = r#"<testsuite>
<TestCase classname="a.Test" name="x" time="0.1"><FAILURE message="m"/></TestCase>
</testsuite>"#;
        let (outcome, results) = parse(xml);
        assert_eq!(outcome.unwrap(), 1);
        assert_eq!(results[0].1.state, TestState::Failure);
    }

    #[test]
    fn test_markers_outside_a_test_case_are_ignored() {
        let xml = r#"<testsuite>
<error message="suite setup failed"/>
<testcase classname="a.Test" name="x" time="0.1"/>
</testsuite>"#;
        let (outcome, results) = parse(xml);
        assert_eq!(outcome.unwrap(), 1);
        assert_eq!(results[0].1.state, TestState::Pass);
    }

    #[test]
    fn test_other_elements_are_skipped() {
        let xml = r#"<?xml version="1.0"?>
<testsuites>
  <testsuite name="outer">
    <properties><property name="java.version" value="17"/></properties>
    <testcase classname="a.Test" name="x" time="0.1">
      <system-out><![CDATA[<failure/> is only text here]]></system-out>
    </testcase>
  </testsuite>
</testsuites>"#;
        let (outcome, results) = parse(xml);
        assert_eq!(outcome.unwrap(), 1);
        assert_eq!(results[0].1.state, TestState::Pass);
    }
}

#[cfg(test)]
mod attribute_tests {
    use super::*;

    #[test]
    fn test_missing_time_gives_no_duration() {
        let (outcome, results) = parse(r#"<testcase classname="a" name="b"/>"#);
        assert_eq!(outcome.unwrap(), 1);
        assert_eq!(results[0].1.duration, None);
    }

    #[test]
    fn test_missing_names_become_unknown() {
        let (_, results) = parse(r#"<testcase time="0.1"/>"#);
        assert_eq!(results[0].0.key(), "???#???");
    }

    #[test]
    fn test_attribute_entities_are_unescaped() {
        let (_, results) = parse(r#"<testcase classname="a&amp;b" name="x &lt; y" time="2.5"/>"#);
        assert_eq!(results[0].0.class_name(), "a&b");
        assert_eq!(results[0].0.name(), "x < y");
        assert_eq!(results[0].1.duration, Some(2.5));
    }

    #[test]
    fn test_mapping_rewrites_class_name() {
        let mut mapping = MappingTable::new();
        mapping.insert("com\\.example\\.(legacy)\\.", "modern");
        let xml = report(&[passed("com.example.legacy.FooTest", "t", "0.1")]);
        let (_, results) = parse_mapped(&xml, &mapping);
        assert_eq!(results[0].0.class_name(), "com.example.modern.FooTest");
    }
}

#[cfg(test)]
mod failure_tests {
    use super::*;

    #[test]
    fn test_malformed_xml_keeps_earlier_results() {
        let xml = r#"<testsuite>
<testcase classname="a" name="first" time="0.1"/>
<testcase classname="a" name="second" time="0.2">
</testsuite>"#;
        let (outcome, results) = parse(xml);
        assert!(matches!(outcome, Err(ReportError::Xml { .. })));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0.name(), "first");
    }

    #[test]
    fn test_non_numeric_time_stops_the_source() {
        let xml = report(&[
            passed("a", "first", "0.1"),
            passed("a", "second", "fast"),
            passed("a", "third", "0.3"),
        ]);
        let (outcome, results) = parse(&xml);
        match outcome {
            Err(ReportError::InvalidDuration { value, .. }) => assert_eq!(value, "fast"),
            other => panic!("Expected InvalidDuration, got {:?}", other),
        }
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_bad_mapping_stops_the_source() {
        let mut mapping = MappingTable::new();
        mapping.insert("no-group", "x");
        let xml = report(&[passed("has.no-group.Test", "t", "0.1")]);
        let (outcome, results) = parse_mapped(&xml, &mapping);
        assert!(matches!(outcome, Err(ReportError::Mapping { .. })));
        assert!(results.is_empty());
    }
}

#[cfg(test)]
mod source_tests {
    use super::*;

    #[test]
    fn test_file_source_can_be_read_twice() {
        let dir = setup_test_environment();
        let path = write_file(dir.path(), "twice.xml", &report(&[passed("a", "b", "1")]));
        let source = Source::file(&path).unwrap();
        let mapping = MappingTable::new();

        let mut first: Vec<(TestId, TestResult)> = Vec::new();
        let mut second: Vec<(TestId, TestResult)> = Vec::new();
        assert_eq!(read_report(&source, &mapping, &mut first).unwrap(), 1);
        assert_eq!(read_report(&source, &mapping, &mut second).unwrap(), 1);
    }

    #[test]
    fn test_archive_entry_into_model() {
        let dir = setup_test_environment();
        let one = report(&[passed("a", "x", "0.1")]);
        let two = report(&[failed("a", "x", "0.2")]);
        let zip = write_zip(
            dir.path(),
            "reports.zip",
            &[("one.xml", one.as_str()), ("two.xml", two.as_str())],
        );
        let archive = ArchiveHandle::open(&zip).unwrap();
        let sources: Vec<Source> = archive
            .entries_with_suffix(".xml")
            .unwrap()
            .into_iter()
            .map(|(index, name)| Source::archive_entry(archive.clone(), index, &name))
            .collect();
        assert!(sources[0].name().ends_with("reports.zip#one.xml"));

        let mapping = MappingTable::new();
        let mut model = Model::new(sources);
        for index in 0..model.sources().len() {
            let mut committed: Vec<(TestId, TestResult)> = Vec::new();
            read_report(&model.sources()[index], &mapping, &mut committed).unwrap();
            model.extend(committed);
        }

        let row = model.results(&TestId::new("a", "x")).unwrap();
        assert_eq!(row[0].as_ref().unwrap().state, TestState::Pass);
        assert_eq!(row[1].as_ref().unwrap().state, TestState::Failure);
    }
}
