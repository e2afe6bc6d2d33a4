use std::path::PathBuf;

use crate::output;

pub fn run(
    text_file: PathBuf,
    name: &str,
    output_format: &str,
    verbose: bool,
) -> Result<(), timeverify_core::error::TimeVerifyError> {
    let text = std::fs::read_to_string(&text_file)?;
    let parsed = timeverify_core::parsing::parse_text(&text, name.trim());

    match output_format {
        "json" => output::json::print(&parsed.entries)?,
        _ => {
            output::table::print_entries(&parsed.entries);
            if verbose {
                output::table::print_trace(&parsed.trace);
            }
            if parsed.undated_lines > 0 {
                eprintln!("{} line(s) without a date skipped", parsed.undated_lines);
            }
        }
    }

    Ok(())
}
