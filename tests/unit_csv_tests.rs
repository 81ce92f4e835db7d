//! # CSV Writer Unit Tests / CSV 写入器单元测试
//!
//! Tests for the comparison matrix layout written by `CsvWriter`.
//!
//! `CsvWriter` 写出的比较矩阵格式的测试。

mod common;

use common::*;
use junit_diff::core::models::{Model, TestId, TestResult, TestState};
use junit_diff::core::source::Source;
use junit_diff::reporting::csv::{CsvWriter, generate_csv_report};
use tempfile::TempDir;

fn model_with_sources(dir: &TempDir, names: &[&str]) -> Model {
    let sources = names
        .iter()
        .map(|name| Source::file(&write_file(dir.path(), name, &report(&[]))).unwrap())
        .collect();
    Model::new(sources)
}

fn render(model: &Model) -> String {
    let mut writer = CsvWriter::new(model, Vec::new());
    writer.write().unwrap();
    String::from_utf8(writer.into_inner()).unwrap()
}

fn result(model: &Model, column: usize, state: TestState, duration: Option<f64>) -> TestResult {
    let mut result = TestResult::new(model.sources()[column].id(), duration);
    result.state = state;
    result
}

#[cfg(test)]
mod layout_tests {
    use super::*;

    #[test]
    fn test_header_only_for_empty_model() {
        let dir = setup_test_environment();
        let model = model_with_sources(&dir, &["run-a.xml", "run-b.xml"]);
        assert_eq!(render(&model), "class,name,run-a.xml,duration,run-b.xml,duration\n");
    }

    #[test]
    fn test_rows_are_sorted_and_absent_slots_stay_empty() {
        let dir = setup_test_environment();
        let mut model = model_with_sources(&dir, &["run-a.xml", "run-b.xml"]);

        let pass_a = result(&model, 0, TestState::Pass, Some(0.5));
        let fail_b = result(&model, 1, TestState::Failure, Some(0.7));
        let pass_only_a = result(&model, 0, TestState::Pass, Some(0.1));
        let error_b = result(&model, 1, TestState::Error, None);
        model.add_result(TestId::new("com.acme.FooTest", "testBaz"), pass_only_a);
        model.add_result(TestId::new("com.acme.FooTest", "testBar"), pass_a);
        model.add_result(TestId::new("com.acme.FooTest", "testBar"), fail_b);
        model.add_result(TestId::new("com.acme.AaaTest", "testQux"), error_b);

        let expected = "\
class,name,run-a.xml,duration,run-b.xml,duration
com.acme.AaaTest,testQux,,,ERROR,
com.acme.FooTest,testBar,PASS,0.5,FAILURE,0.7
com.acme.FooTest,testBaz,PASS,0.1,,
";
        assert_eq!(render(&model), expected);
    }

    #[test]
    fn test_fields_with_commas_are_quoted() {
        let dir = setup_test_environment();
        let mut model = model_with_sources(&dir, &["a.xml", "b.xml"]);
        let pass = result(&model, 0, TestState::Pass, Some(1.0));
        model.add_result(TestId::new("a.Test", "params[1, \"x\"]"), pass);

        let output = render(&model);
        let row = output.lines().nth(1).unwrap();
        assert_eq!(row, "a.Test,\"params[1, \"\"x\"\"]\",PASS,1.0,,");
    }

    #[test]
    fn test_generate_csv_report_writes_file() {
        let dir = setup_test_environment();
        let mut model = model_with_sources(&dir, &["a.xml", "b.xml"]);
        let pass = result(&model, 1, TestState::Pass, Some(2.0));
        model.add_result(TestId::new("x", "y"), pass);

        let output = dir.path().join("out.csv");
        assert_eq!(generate_csv_report(&model, &output).unwrap(), 1);
        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(written, "class,name,a.xml,duration,b.xml,duration\nx,y,,,PASS,2.0\n");
    }

    #[test]
    fn test_unwritable_output_is_an_error() {
        let dir = setup_test_environment();
        let model = model_with_sources(&dir, &["a.xml", "b.xml"]);
        let output = dir.path().join("no-such-dir").join("out.csv");
        assert!(generate_csv_report(&model, &output).is_err());
    }
}
