//! Batch command - feedback for every row of an uploaded file.

use std::path::PathBuf;

use colored::Colorize;
use feedmark::report::batch_report_html;

use super::{default_report_path, read_input, GeneratorChoice};

pub fn run(
    file: PathBuf,
    criteria: PathBuf,
    output: Option<PathBuf>,
    json_output: bool,
    generator: &GeneratorChoice,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }
    let criteria = read_input(&criteria)?;

    let feedmark = generator.engine()?;
    let result = feedmark
        .review_batch_file(&file, &criteria)
        .map_err(|e| e.user_message())?;

    if json_output {
        println!("{}", result.to_json()?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Batch feedback for".cyan().bold(),
        file.display().to_string().white()
    );
    println!(
        "{} students, {} questions, {} responses",
        result.records.len().to_string().white().bold(),
        result.questions.len().to_string().white().bold(),
        result.record_count().to_string().white().bold()
    );

    let missing = result.missing_feedback();
    if missing > 0 {
        println!(
            "{}",
            format!("{} responses received no feedback", missing).yellow()
        );
    }

    if verbose {
        println!();
        for (owner, records) in &result.records {
            let answered = records.iter().filter(|r| r.has_feedback()).count();
            println!("  Student {:<10} {}/{} with feedback", owner, answered, records.len());
        }
        println!();
    }

    let output_path = output.unwrap_or_else(|| default_report_path(&file));
    std::fs::write(&output_path, batch_report_html(&result))?;

    println!(
        "{} {}",
        "Saved to".green().bold(),
        output_path.display().to_string().white()
    );

    Ok(())
}
