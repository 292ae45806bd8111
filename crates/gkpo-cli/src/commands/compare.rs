//! Compare command implementation.

use crate::input;
use crate::output;
use gkpo_canonical::{compare, CompareOptions, EquivalenceReport};

pub fn run(
    a: String,
    b: String,
    show_diff: bool,
    ignore: Option<Vec<String>>,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let left = input::read_json_file(&a)?;
    let right = input::read_json_file(&b)?;

    let mut options = CompareOptions {
        show_diff,
        ..CompareOptions::default()
    };
    if let Some(ignore) = ignore {
        options.ignore = ignore;
    }

    let report = compare(&left, &right, &options);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&a, &b, &report);
    }

    // digest equality is the exit-code contract
    if !report.equivalent {
        std::process::exit(1);
    }

    Ok(())
}

fn print_report(a: &str, b: &str, report: &EquivalenceReport) {
    println!("== GKPO Equivalence Report ==");
    println!("A: {}", a);
    println!("B: {}", b);
    println!("opal_hash A: {}", report.left.opal_hash);
    println!("opal_hash B: {}", report.right.opal_hash);
    println!(
        "inside_R  A: {}  reasons: {}",
        report.left.inside_r,
        output::format_reasons(&report.left.reasons)
    );
    println!(
        "inside_R  B: {}  reasons: {}",
        report.right.inside_r,
        output::format_reasons(&report.right.reasons)
    );
    println!(
        "\nEquivalent (by hash)? {}",
        if report.equivalent { "YES" } else { "NO" }
    );

    if let Some(diffs) = &report.diffs {
        println!("\n-- Canonical diff (excluding ignored keys) --");
        if diffs.is_empty() {
            println!("(no differences)");
        }
        for diff in diffs {
            println!("{}:", diff.path);
            println!("  A={}", output::format_diff_value(diff.left.as_ref()));
            println!("  B={}\n", output::format_diff_value(diff.right.as_ref()));
        }
    }
}
