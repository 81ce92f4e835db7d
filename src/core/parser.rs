//! # Report Parser Module / 报告解析模块
//!
//! Streams one JUnit-style XML report and feeds its test cases into a result
//! sink, normally the [`Model`](crate::core::models::Model). Only the flat
//! `testcase` / `failure` / `error` structure is interpreted; everything else
//! in the document is skipped.
//!
//! 以流式方式读取一个 JUnit 风格的 XML 报告，
//! 并将其中的测试用例写入结果接收器（通常为 `Model`）。
//! 仅解析扁平的 `testcase` / `failure` / `error` 结构，其余内容均被跳过。
//!
//! ```xml
//! <testcase classname="x.y.Z" name="testAbc" time="0.25">
//!     <failure message="expected 1"/>
//! </testcase>
//! ```

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::io::BufRead;

use crate::core::error::ReportError;
use crate::core::mapping::{MappingTable, NameMapper};
use crate::core::models::{ResultSink, TestId, TestResult, TestState};
use crate::core::source::Source;

const TEST_CASE: &[u8] = b"testcase";
const CLASSNAME: &[u8] = b"classname";
const NAME: &[u8] = b"name";
const TIME: &[u8] = b"time";
const ERROR: &[u8] = b"error";
const FAILURE: &[u8] = b"failure";

/// Parse state: either between test cases or inside one, holding the pending result.
#[derive(Debug)]
enum ParseState {
    Idle,
    InTestCase { id: TestId, result: TestResult },
}

/// Reads one source into `sink`, returning the number of results committed.
///
/// On error the results committed so far stay in the sink and the rest of the
/// source is skipped.
pub fn read_report<S: ResultSink + ?Sized>(
    source: &Source,
    mapping: &MappingTable,
    sink: &mut S,
) -> Result<usize, ReportError> {
    let input = source.open()?;
    ReportReader::new(source, mapping).read_into(input, sink)
}

/// Event handler for a single report. Holds the per-report regex cache.
pub struct ReportReader<'a> {
    source: &'a Source,
    mapper: NameMapper<'a>,
    state: ParseState,
    committed: usize,
}

impl<'a> ReportReader<'a> {
    pub fn new(source: &'a Source, mapping: &'a MappingTable) -> Self {
        Self {
            source,
            mapper: NameMapper::new(mapping),
            state: ParseState::Idle,
            committed: 0,
        }
    }

    /// Drives the XML event loop over `input` until end of document.
    pub fn read_into<R: BufRead, S: ResultSink + ?Sized>(
        mut self,
        input: R,
        sink: &mut S,
    ) -> Result<usize, ReportError> {
        let mut reader = Reader::from_reader(input);
        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(element)) => self.start_element(&element)?,
                Ok(Event::Empty(element)) => {
                    self.start_element(&element)?;
                    self.end_element(element.name().as_ref(), sink);
                }
                Ok(Event::End(element)) => self.end_element(element.name().as_ref(), sink),
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(err) => {
                    return Err(ReportError::xml(
                        self.source.name(),
                        format_args!("{} (at byte {})", err, reader.error_position()),
                    ));
                }
            }
            buf.clear();
        }
        Ok(self.committed)
    }

    fn start_element(&mut self, element: &BytesStart<'_>) -> Result<(), ReportError> {
        let tag = element.name();
        let tag = tag.as_ref();
        if tag.eq_ignore_ascii_case(TEST_CASE) {
            let (id, result) = self.begin_test_case(element)?;
            self.state = ParseState::InTestCase { id, result };
        } else if tag.eq_ignore_ascii_case(ERROR) {
            self.upgrade(TestState::Error);
        } else if tag.eq_ignore_ascii_case(FAILURE) {
            self.upgrade(TestState::Failure);
        }
        Ok(())
    }

    fn end_element<S: ResultSink + ?Sized>(&mut self, tag: &[u8], sink: &mut S) {
        if !tag.eq_ignore_ascii_case(TEST_CASE) {
            return;
        }
        if let ParseState::InTestCase { id, result } =
            std::mem::replace(&mut self.state, ParseState::Idle)
        {
            sink.add_result(id, result);
            self.committed += 1;
        }
    }

    /// Last write wins when both `<error>` and `<failure>` appear.
    fn upgrade(&mut self, state: TestState) {
        if let ParseState::InTestCase { result, .. } = &mut self.state {
            result.state = state;
        }
    }

    fn begin_test_case(
        &mut self,
        element: &BytesStart<'_>,
    ) -> Result<(TestId, TestResult), ReportError> {
        let mut class_name = None;
        let mut name = None;
        let mut time = None;
        for attribute in element.attributes() {
            let attribute = attribute.map_err(|err| ReportError::xml(self.source.name(), err))?;
            let value = attribute
                .unescape_value()
                .map_err(|err| ReportError::xml(self.source.name(), err))?
                .into_owned();
            match attribute.key.as_ref() {
                CLASSNAME => class_name = Some(value),
                NAME => name = Some(value),
                TIME => time = Some(value),
                _ => {}
            }
        }

        let class_name = class_name.unwrap_or_default();
        let mapped = self
            .mapper
            .map(&class_name)
            .map_err(|error| ReportError::Mapping {
                source_name: self.source.name().to_string(),
                error,
            })?;
        let id = TestId::new(mapped, name.unwrap_or_default());

        let duration = match time {
            Some(raw) => Some(raw.trim().parse::<f64>().map_err(|_| {
                ReportError::InvalidDuration {
                    source_name: self.source.name().to_string(),
                    test: id.to_string(),
                    value: raw.clone(),
                }
            })?),
            None => None,
        };

        Ok((id, TestResult::new(self.source.id(), duration)))
    }
}
