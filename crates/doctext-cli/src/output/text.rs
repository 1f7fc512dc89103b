use doctext_core::{ExtractionOutcome, ExtractionSource};

pub fn print(outcome: &ExtractionOutcome, show_source: bool) {
    if show_source {
        let source = match outcome.source {
            ExtractionSource::Local(method) => format!("local ({method})"),
            ExtractionSource::Ocr => "ocr".to_string(),
            ExtractionSource::Failed => "none, every stage failed".to_string(),
        };
        eprintln!("source: {source}");
    }

    if outcome.text.is_empty() {
        eprintln!("no text extracted");
    } else {
        println!("{}", outcome.text);
    }
}
