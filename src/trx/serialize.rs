// Serialize a TestRun into TRX XML

use std::io::Cursor;

use anyhow::{Context, Result};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::{
    ADAPTER_TYPE_NAME, ALL_LOADED_RESULTS_ID, RESULTS_NOT_IN_A_LIST_ID, TRX_NAMESPACE, TestRun,
    UNIT_TEST_TYPE, UnitTestResult, format_duration,
};
use crate::time::to_trx_timestamp;

type XmlWriter = Writer<Cursor<Vec<u8>>>;

impl TestRun {
    /// Serialize to a TRX document
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        serialize_test_run(self, &mut writer)?;

        let mut bytes = writer.into_inner().into_inner();
        bytes.push(b'\n');
        String::from_utf8(bytes).context("TRX output is not valid UTF-8")
    }
}

fn serialize_test_run(run: &TestRun, writer: &mut XmlWriter) -> Result<()> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let id = run.id.to_string();
    let root = BytesStart::new("TestRun").with_attributes([
        ("id", id.as_str()),
        ("name", run.name.as_str()),
        ("runUser", run.run_user.as_str()),
        ("xmlns", TRX_NAMESPACE),
    ]);
    writer.write_event(Event::Start(root))?;

    let (creation, queuing, start, finish) = (
        to_trx_timestamp(&run.times.creation),
        to_trx_timestamp(&run.times.queuing),
        to_trx_timestamp(&run.times.start),
        to_trx_timestamp(&run.times.finish),
    );
    writer.write_event(Event::Empty(BytesStart::new("Times").with_attributes([
        ("creation", creation.as_str()),
        ("queuing", queuing.as_str()),
        ("start", start.as_str()),
        ("finish", finish.as_str()),
    ])))?;

    let settings_id = run.settings.id.to_string();
    writer.write_event(Event::Empty(BytesStart::new("TestSettings").with_attributes([
        ("name", run.settings.name.as_str()),
        ("id", settings_id.as_str()),
    ])))?;

    writer.write_event(Event::Start(BytesStart::new("Results")))?;
    for result in &run.results {
        serialize_result(result, writer)?;
    }
    writer.write_event(Event::End(BytesEnd::new("Results")))?;

    writer.write_event(Event::Start(BytesStart::new("TestDefinitions")))?;
    for result in &run.results {
        serialize_definition(result, writer)?;
    }
    writer.write_event(Event::End(BytesEnd::new("TestDefinitions")))?;

    writer.write_event(Event::Start(BytesStart::new("TestEntries")))?;
    for result in &run.results {
        let test_id = result.test.id.to_string();
        let execution_id = result.execution_id.to_string();
        writer.write_event(Event::Empty(BytesStart::new("TestEntry").with_attributes([
            ("testId", test_id.as_str()),
            ("executionId", execution_id.as_str()),
            ("testListId", ALL_LOADED_RESULTS_ID),
        ])))?;
    }
    writer.write_event(Event::End(BytesEnd::new("TestEntries")))?;

    writer.write_event(Event::Start(BytesStart::new("TestLists")))?;
    writer.write_event(Event::Empty(BytesStart::new("TestList").with_attributes([
        ("name", "Results Not in a List"),
        ("id", RESULTS_NOT_IN_A_LIST_ID),
    ])))?;
    writer.write_event(Event::Empty(BytesStart::new("TestList").with_attributes([
        ("name", "All Loaded Results"),
        ("id", ALL_LOADED_RESULTS_ID),
    ])))?;
    writer.write_event(Event::End(BytesEnd::new("TestLists")))?;

    serialize_summary(run, writer)?;

    writer.write_event(Event::End(BytesEnd::new("TestRun")))?;
    Ok(())
}

fn serialize_result(result: &UnitTestResult, writer: &mut XmlWriter) -> Result<()> {
    let execution_id = result.execution_id.to_string();
    let test_id = result.test.id.to_string();
    let duration = format_duration(result.duration);

    let mut element = BytesStart::new("UnitTestResult").with_attributes([
        ("executionId", execution_id.as_str()),
        ("testId", test_id.as_str()),
        ("testName", result.test.name.as_str()),
        ("computerName", result.computer_name.as_str()),
        ("duration", duration.as_str()),
    ]);
    if let Some(start) = &result.start_time {
        element.push_attribute(("startTime", to_trx_timestamp(start).as_str()));
    }
    if let Some(end) = &result.end_time {
        element.push_attribute(("endTime", to_trx_timestamp(end).as_str()));
    }
    element.push_attribute(("testType", UNIT_TEST_TYPE));
    element.push_attribute(("outcome", result.outcome.as_str()));
    element.push_attribute(("testListId", ALL_LOADED_RESULTS_ID));
    if let Some(dir) = &result.relative_results_directory {
        element.push_attribute(("relativeResultsDirectory", dir.as_str()));
    }

    if result.error.is_none() && result.result_files.is_empty() {
        writer.write_event(Event::Empty(element))?;
        return Ok(());
    }

    writer.write_event(Event::Start(element))?;

    if let Some(error) = &result.error {
        writer.write_event(Event::Start(BytesStart::new("Output")))?;
        writer.write_event(Event::Start(BytesStart::new("ErrorInfo")))?;
        write_text_element(writer, "Message", &error.message)?;
        if let Some(stack) = &error.stack_trace {
            write_text_element(writer, "StackTrace", stack)?;
        }
        writer.write_event(Event::End(BytesEnd::new("ErrorInfo")))?;
        writer.write_event(Event::End(BytesEnd::new("Output")))?;
    }

    if !result.result_files.is_empty() {
        writer.write_event(Event::Start(BytesStart::new("ResultFiles")))?;
        for file in &result.result_files {
            writer.write_event(Event::Empty(
                BytesStart::new("ResultFile").with_attributes([("path", file.as_str())]),
            ))?;
        }
        writer.write_event(Event::End(BytesEnd::new("ResultFiles")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("UnitTestResult")))?;
    Ok(())
}

fn serialize_definition(result: &UnitTestResult, writer: &mut XmlWriter) -> Result<()> {
    let test_id = result.test.id.to_string();
    let execution_id = result.execution_id.to_string();

    writer.write_event(Event::Start(BytesStart::new("UnitTest").with_attributes([
        ("name", result.test.name.as_str()),
        ("storage", result.test.code_base.as_str()),
        ("id", test_id.as_str()),
    ])))?;
    writer.write_event(Event::Empty(
        BytesStart::new("Execution").with_attributes([("id", execution_id.as_str())]),
    ))?;
    writer.write_event(Event::Empty(BytesStart::new("TestMethod").with_attributes([
        ("codeBase", result.test.code_base.as_str()),
        ("adapterTypeName", ADAPTER_TYPE_NAME),
        ("className", result.test.class_name.as_str()),
        ("name", result.test.method_name.as_str()),
    ])))?;
    writer.write_event(Event::End(BytesEnd::new("UnitTest")))?;
    Ok(())
}

fn serialize_summary(run: &TestRun, writer: &mut XmlWriter) -> Result<()> {
    let counters = run.counters();
    let values = [
        ("total", counters.total),
        ("executed", counters.executed),
        ("passed", counters.passed),
        ("failed", counters.failed),
        ("error", 0),
        ("timeout", 0),
        ("aborted", 0),
        ("inconclusive", 0),
        ("passedButRunAborted", 0),
        ("notRunnable", 0),
        ("notExecuted", counters.not_executed),
        ("disconnected", 0),
        ("warning", 0),
        ("completed", 0),
        ("inProgress", 0),
        ("pending", counters.pending),
    ];
    let rendered: Vec<(&str, String)> = values
        .iter()
        .map(|(name, value)| (*name, value.to_string()))
        .collect();

    writer.write_event(Event::Start(
        BytesStart::new("ResultSummary").with_attributes([("outcome", run.summary_outcome())]),
    ))?;
    writer.write_event(Event::Empty(
        BytesStart::new("Counters")
            .with_attributes(rendered.iter().map(|(name, value)| (*name, value.as_str()))),
    ))?;
    writer.write_event(Event::End(BytesEnd::new("ResultSummary")))?;
    Ok(())
}

fn write_text_element(writer: &mut XmlWriter, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use super::super::{ErrorInfo, Outcome, Times, UnitTest};
    use super::*;

    fn times() -> Times {
        let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        Times {
            creation: at,
            queuing: at,
            start: at,
            finish: at,
        }
    }

    fn result(name: &str, outcome: Outcome) -> UnitTestResult {
        UnitTestResult {
            test: UnitTest {
                id: Uuid::new_v4(),
                name: name.to_string(),
                method_name: name.to_string(),
                class_name: "Root".to_string(),
                code_base: String::new(),
            },
            execution_id: Uuid::new_v4(),
            computer_name: "ci-box".to_string(),
            outcome,
            duration: Duration::from_millis(5),
            start_time: None,
            end_time: None,
            error: None,
            relative_results_directory: None,
            result_files: Vec::new(),
        }
    }

    #[test]
    fn test_empty_run_document() {
        let run = TestRun::new("me@box 2023-11-14 22:13:20", "me", times());
        let xml = run.to_xml().unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("name=\"me@box 2023-11-14 22:13:20\""));
        assert!(xml.contains("runUser=\"me\""));
        assert!(xml.contains(TRX_NAMESPACE));
        assert!(xml.contains("start=\"2023-11-14T22:13:20.000Z\""));
        assert!(xml.contains("<TestSettings name=\"Default\""));
        assert!(xml.contains("<ResultSummary outcome=\"Completed\">"));
        assert!(xml.contains("total=\"0\""));
        assert!(!xml.contains("<UnitTestResult"));
        assert!(xml.trim_end().ends_with("</TestRun>"));
    }

    #[test]
    fn test_failed_result_escapes_error_text() {
        let mut failed = result("compares <a> & <b>", Outcome::Failed);
        failed.error = Some(ErrorInfo {
            message: "expected 1 < 2 & \"x\"".to_string(),
            stack_trace: Some("at <anonymous>".to_string()),
        });
        let mut run = TestRun::new("run", "me", times());
        run.add_result(failed);

        let xml = run.to_xml().unwrap();

        assert!(xml.contains("testName=\"compares &lt;a&gt; &amp; &lt;b&gt;\""));
        assert!(xml.contains("<Message>expected 1 &lt; 2 &amp;"));
        assert!(xml.contains("<StackTrace>at &lt;anonymous&gt;</StackTrace>"));
        assert!(xml.contains("outcome=\"Failed\""));
        assert!(xml.contains("<ResultSummary outcome=\"Failed\">"));
    }

    #[test]
    fn test_result_files_and_directory() {
        let mut with_files = result("screenshot", Outcome::Passed);
        with_files.relative_results_directory = Some("abc".to_string());
        with_files.add_result_file("shot.png");
        let mut run = TestRun::new("run", "me", times());
        run.add_result(with_files);

        let xml = run.to_xml().unwrap();

        assert!(xml.contains("relativeResultsDirectory=\"abc\""));
        assert!(xml.contains("<ResultFile path=\"shot.png\"/>"));
        assert!(xml.contains("duration=\"00:00:00.0050000\""));
    }

    #[test]
    fn test_definitions_and_entries_match_results() {
        let mut run = TestRun::new("run", "me", times());
        run.add_result(result("a", Outcome::Passed));
        run.add_result(result("b", Outcome::Pending));

        let xml = run.to_xml().unwrap();

        assert_eq!(xml.matches("<UnitTestResult ").count(), 2);
        assert_eq!(xml.matches("<UnitTest ").count(), 2);
        assert_eq!(xml.matches("<TestEntry ").count(), 2);
        assert!(xml.contains("pending=\"1\""));
        assert!(xml.contains("executed=\"1\""));
    }
}
