//! Integration tests for the summarizer pipeline and the context chat.

use std::io::Write;
use std::sync::Arc;

use tempfile::{NamedTempFile, TempDir};

use chauffeur::{
    ContextChat, KeywordRetriever, LlmColumnMapper, MockProvider, NormalizationOutcome,
    Normalizer, PromptTemplate, RuleBasedMapper, Summarizer, SummaryError,
};

/// Helper to create a temporary file with given content.
fn create_test_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

const DISPATCH_EXPORT: &str = "conf_no,client,driver,from,to,fare,job_date,remarks\n\
                               1001,Smith,Alice,Heathrow,Savoy,100,2024-03-01,child seat\n\
                               1002,Jones,Alice,Ritz,Gatwick,200,2024-03-02,\n\
                               1003,Brown,Bob,Savoy,Heathrow,50,2024-03-02,NA\n";

const STANDARD_LABELS: &str =
    r#"["Booking", "PAX", "Chauffer", "Pickup", "Dropoff", "Price", "Date", "Notes"]"#;

fn llm_summarizer(mock: Arc<MockProvider>) -> Summarizer {
    Summarizer::new().with_normalizer(Normalizer::new(LlmColumnMapper::new(mock)))
}

// =============================================================================
// Summarizer
// =============================================================================

#[test]
fn test_llm_standardized_summary() {
    let file = create_test_file(DISPATCH_EXPORT);
    let mock = Arc::new(MockProvider::answering(STANDARD_LABELS));

    let outcome = llm_summarizer(mock.clone())
        .summarize(file.path())
        .expect("summary failed");

    assert_eq!(mock.call_count(), 1);
    assert!(mock.prompts()[0].contains("conf_no"));
    assert_eq!(
        outcome.table.headers(),
        &["Booking", "PAX", "Chauffer", "Pickup", "Dropoff", "Price", "Date", "Notes"]
    );

    let report = &outcome.report;
    assert!(report.contains_line("Dataset contains 3 total bookings/rides/calls."));
    assert!(report.contains_line(
        "Columns standardized and present: Booking, PAX, Chauffer, Pickup, Dropoff, Price, Date, Notes"
    ));
    assert!(report.contains_line("Total Company Earnings: $350.00"));
    assert!(report.contains_line("Top earning chauffer: Alice ($300.00)"));
    assert!(report.contains_line("Top 3 chauffers account for 100.0% of total earnings"));
    assert!(report.contains_line("Ride Details (1):"));
    assert!(report.contains_line("Notes: child seat"));
}

#[test]
fn test_chatty_response_falls_back_to_original_header() {
    let file = create_test_file(DISPATCH_EXPORT);
    let mock = Arc::new(MockProvider::answering(
        r#"Sure! Here are the columns: ["Booking", "PAX"]"#,
    ));

    let outcome = llm_summarizer(mock).summarize(file.path()).expect("summary failed");

    let normalization = outcome.normalization.expect("normalizer configured");
    assert!(matches!(
        normalization.outcome,
        NormalizationOutcome::FellBack { .. }
    ));
    assert_eq!(outcome.table.headers()[0], "conf_no");
    assert!(outcome
        .report
        .contains_line("Column standardization failed - using original column names"));
    // original names: no Price column, so those steps degrade to one line
    assert!(outcome
        .report
        .contains_line("Error: Price column not found in the dataset."));
}

#[test]
fn test_provider_outage_still_produces_report() {
    let file = create_test_file(DISPATCH_EXPORT);
    let mock = Arc::new(MockProvider::new().then_fail("connection refused"));

    let outcome = llm_summarizer(mock).summarize(file.path()).expect("summary failed");
    assert!(!outcome.normalization.unwrap().applied());
    assert_eq!(outcome.report.lines()[0], "Data Analysis Summary");
}

#[test]
fn test_rules_mapper_needs_no_provider() {
    let file = create_test_file(DISPATCH_EXPORT);
    let outcome = Summarizer::new()
        .with_normalizer(Normalizer::new(RuleBasedMapper::new()))
        .summarize(file.path())
        .expect("summary failed");

    let headers = outcome.table.headers();
    assert_eq!(headers[0], "Booking");
    assert_eq!(headers[2], "Chauffer");
    assert_eq!(headers[5], "Price");
    assert!(outcome.report.contains_line("Total Company Earnings: $350.00"));
}

#[test]
fn test_tsv_input() {
    let file = create_test_file("Chauffer\tPrice\nA\t$1,200.50\nB\t99.5\n");
    let outcome = Summarizer::new().summarize(file.path()).expect("summary failed");

    assert_eq!(outcome.source.format, "tsv");
    assert!(outcome.report.contains_line("Total Company Earnings: $1,300.00"));
}

#[test]
fn test_semicolon_export_with_decimal_commas() {
    let file = create_test_file(
        "Chauffer;Price;Notes\nAlice;45,50;child seat\nBob;30,00;\nBob;-$20.00;refund\n",
    );
    let outcome = Summarizer::new().summarize(file.path()).expect("summary failed");

    assert_eq!(outcome.source.format, "csv-semicolon");
    let report = &outcome.report;
    assert!(report.contains_line("2 non-numeric price values were ignored."));
    assert!(report.contains_line("Total Company Earnings: -$20.00"));
}

#[test]
fn test_header_only_file() {
    let file = create_test_file("Booking,Chauffer,Price,Notes\n");
    let outcome = Summarizer::new().summarize(file.path()).expect("summary failed");

    assert_eq!(outcome.source.row_count, 0);
    let text = outcome.report.to_text();
    assert!(!text.contains("NaN"));
    assert!(text.contains("No rows available for this analysis."));
}

#[test]
fn test_missing_file() {
    let result = Summarizer::new().summarize("/nonexistent/bookings.csv");
    assert!(matches!(
        result,
        Err(SummaryError::SourceUnavailable { .. })
    ));
}

#[test]
fn test_generate_summary_round_trip_into_chat() {
    let file = create_test_file(DISPATCH_EXPORT);
    let dir = TempDir::new().expect("Failed to create temp dir");
    let output = dir.path().join("nested").join("data_summary.txt");

    let mock = Arc::new(MockProvider::answering(STANDARD_LABELS));
    let (_, written) = llm_summarizer(mock)
        .generate_summary(file.path(), &output)
        .expect("summary failed");
    assert!(written.exists());

    let chat_mock = Arc::new(MockProvider::answering("Alice earned the most."));
    let chat = ContextChat::new(chat_mock.clone(), PromptTemplate::SummaryOnly)
        .with_summary_file(&written)
        .expect("summary readable");

    let answer = chat.answer("Who earned the most?").expect("answer");
    assert_eq!(answer, "Alice earned the most.");
    assert!(chat_mock.prompts()[0].contains("Top earning chauffer: Alice ($300.00)"));
}

// =============================================================================
// Context chat with retrieval
// =============================================================================

#[test]
fn test_retrieval_chat_uses_record_file() {
    let records = create_test_file(
        "Booking 1001: Alice drove Smith from Heathrow to Savoy, child seat fitted.\n\
         Booking 1002: Alice drove Jones from Ritz to Gatwick.\n\
         Booking 1003: Bob drove Brown from Savoy to Heathrow.\n",
    );
    let retriever = KeywordRetriever::load(records.path()).expect("records readable");
    assert_eq!(retriever.documents().len(), 3);

    let mock = Arc::new(MockProvider::answering("Booking 1001."));
    let chat = ContextChat::new(mock.clone(), PromptTemplate::Retrieval)
        .with_summary("UNUSED SUMMARY")
        .with_retriever(retriever);

    chat.answer("Which booking had a child seat?").expect("answer");
    let prompt = &mock.prompts()[0];
    assert!(prompt.contains("child seat fitted"));
    assert!(!prompt.contains("UNUSED SUMMARY"));
}

#[test]
fn test_chat_missing_summary_file() {
    let mock = Arc::new(MockProvider::new());
    let result = ContextChat::new(mock, PromptTemplate::SummaryOnly)
        .with_summary_file("/nonexistent/data_summary.txt");
    assert!(matches!(
        result,
        Err(SummaryError::SourceUnavailable { .. })
    ));
}
