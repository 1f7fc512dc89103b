use doctext_core::error::DocTextError;
use doctext_core::Dispatcher;
use std::path::PathBuf;
use tracing::info;

use crate::output;

pub fn run(
    input_file: PathBuf,
    name: Option<String>,
    output_format: &str,
    show_source: bool,
) -> Result<(), DocTextError> {
    let bytes = std::fs::read(&input_file)?;
    let identifier = name.unwrap_or_else(|| input_file.to_string_lossy().into_owned());
    info!(file = %input_file.display(), bytes = bytes.len(), "read input file");

    let dispatcher = Dispatcher::from_env()?;
    let outcome = dispatcher.extract_with_source(&identifier, &bytes);

    match output_format {
        "json" => output::json::print(&outcome)?,
        _ => output::text::print(&outcome, show_source),
    }

    Ok(())
}
