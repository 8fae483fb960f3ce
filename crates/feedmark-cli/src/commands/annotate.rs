//! Annotate command - apply a saved feedback document to writing.

use std::path::PathBuf;

use colored::Colorize;
use feedmark::report::review_report_html;
use feedmark::Feedmark;

use super::read_input;

pub fn run(
    feedback: PathBuf,
    writing: PathBuf,
    output: Option<PathBuf>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let document = read_input(&feedback)?;
    let student_writing = read_input(&writing)?;

    let result = Feedmark::new().review_offline(&document, &student_writing)?;

    match output {
        Some(path) => {
            std::fs::write(&path, review_report_html(&result))?;
            println!(
                "Annotated {} passages from {} suggestions",
                result.annotated.highlight_count().to_string().yellow(),
                result.pairs.len().to_string().white().bold()
            );
            println!(
                "{} {}",
                "Saved to".green().bold(),
                path.display().to_string().white()
            );
        }
        None => {
            if verbose {
                eprintln!(
                    "{} {} suggestions",
                    "Parsed".cyan().bold(),
                    result.pairs.len()
                );
            }
            println!("{}", result.annotated);
        }
    }

    Ok(())
}
