//! Human-readable output.

use colored::Colorize;

use medirec_engine::{EngineConfig, PredictionOutcome, PredictionService};
use medirec_index::EncodeReport;
use medirec_knowledge::TableKind;
use medirec_model::Classifier;

fn print_list(title: &str, items: &[String]) {
    println!("{}", title.bold());
    if items.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for item in items {
        println!("  - {item}");
    }
}

pub fn print_outcome(outcome: &PredictionOutcome) {
    match outcome {
        PredictionOutcome::Rejected { message } => println!("{}", message.yellow()),
        PredictionOutcome::Recommended(r) => {
            println!("{} {}", "Predicted disease:".bold(), r.disease.cyan().bold());
            println!();
            println!("{}", "Description".bold());
            println!("  {}", r.record.description);
            print_list("Precautions", &r.record.precautions);
            print_list("Medications", &r.record.medications);
            print_list("Diet", &r.record.diets);
            print_list("Workout", &r.record.workouts);
        }
    }
}

pub fn print_report(report: &EncodeReport) {
    println!(
        "{} {}",
        "Recognized:".green(),
        if report.recognized.is_empty() {
            "(none)".to_string()
        } else {
            report.recognized.join(", ")
        }
    );
    if !report.ignored.is_empty() {
        println!("{} {}", "Ignored:".yellow(), report.ignored.join(", "));
    }
    if report.recognized.is_empty() {
        println!(
            "{}",
            "No symptom was recognized; the prediction is for an empty symptom set.".yellow()
        );
    }
    println!();
}

pub fn print_check(config: &EngineConfig, service: &PredictionService) {
    println!("{}", "Engine loaded".green().bold());
    println!(
        "  symptoms:  {} ({})",
        service.symptoms().len(),
        service.symptoms().digest()
    );
    println!(
        "  labels:    {} ({})",
        service.labels().len(),
        service.labels().digest()
    );
    println!(
        "  model:     {} classes over {} features ({})",
        service.classifier().classes().len(),
        service.classifier().feature_count(),
        config.model_path.display()
    );
    for kind in TableKind::ALL {
        let table = service.knowledge().table(kind);
        println!(
            "  {:<11} {} rows, {} diseases ({})",
            format!("{kind}:"),
            table.len(),
            table.disease_count(),
            table.source_digest()
        );
    }
}
