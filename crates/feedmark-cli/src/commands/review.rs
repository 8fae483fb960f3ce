//! Review command - get feedback on one piece of writing.

use std::path::PathBuf;

use colored::Colorize;
use feedmark::report::review_report_html;
use feedmark::SingleRequest;

use super::{default_report_path, read_input, GeneratorChoice};

pub fn run(
    writing: PathBuf,
    criteria: PathBuf,
    outcome: Option<PathBuf>,
    output: Option<PathBuf>,
    generator: &GeneratorChoice,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut request = SingleRequest::new(read_input(&writing)?)
        .with_marking_criteria(read_input(&criteria)?);
    if let Some(ref path) = outcome {
        request = request.with_learning_outcome(read_input(path)?);
    }

    println!(
        "{} {} {}",
        "Reviewing".cyan().bold(),
        writing.display().to_string().white(),
        format!("({})", generator.provider).dimmed()
    );

    let feedmark = generator.engine()?;
    let result = feedmark.review(&request).map_err(|e| e.user_message())?;

    println!(
        "Found {} suggestions, {} highlighted passages",
        result.pairs.len().to_string().white().bold(),
        result.annotated.highlight_count().to_string().yellow()
    );

    if verbose {
        println!();
        println!("{}", "Suggestions:".yellow().bold());
        for (i, pair) in result.pairs.iter().enumerate() {
            println!("  {}. \"{}\"", i + 1, pair.original);
            println!("     {} {}", "->".dimmed(), pair.improvement);
        }
        println!();
    }

    let output_path = output.unwrap_or_else(|| default_report_path(&writing));
    std::fs::write(&output_path, review_report_html(&result))?;

    println!(
        "{} {}",
        "Saved to".green().bold(),
        output_path.display().to_string().white()
    );

    Ok(())
}
