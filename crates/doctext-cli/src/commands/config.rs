use doctext_core::config::OcrConfig;
use doctext_core::error::DocTextError;
use doctext_core::extraction::pdftotext::PdftotextExtractor;

pub fn show() -> Result<(), DocTextError> {
    let config = OcrConfig::from_env()?;

    println!("OCR service: AWS Textract\n");
    println!("  region        {}", config.region);
    println!("  endpoint      {}", config.endpoint_url());
    println!("  access key    {}", mask(&config.credentials.access_key_id));
    println!(
        "  session token {}",
        if config.credentials.session_token.is_some() {
            "set"
        } else {
            "not set"
        }
    );

    println!(
        "\nLocal PDF extraction: pdftotext {}",
        if PdftotextExtractor::is_available() {
            "found"
        } else {
            "not found (PDFs will go to OCR)"
        }
    );
    Ok(())
}

fn mask(key: &str) -> String {
    let skip = key.chars().count().saturating_sub(4);
    let tail: String = key.chars().skip(skip).collect();
    format!("****{tail}")
}
