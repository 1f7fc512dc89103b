use doctext_core::error::DocTextError;
use doctext_core::ExtractionOutcome;

pub fn print(outcome: &ExtractionOutcome) -> Result<(), DocTextError> {
    let json = serde_json::to_string_pretty(outcome)?;
    println!("{json}");
    Ok(())
}
