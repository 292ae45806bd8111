//! Verify command implementation.

use crate::input;
use crate::output;
use gkpo_canonical::{verify_opal_hash, HashVerification};
use serde_json::json;

pub fn run(
    paths: Vec<String>,
    strict: bool,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut all_ok = true;
    let mut results = Vec::new();

    for path in paths {
        let raw = input::read_json_file(&path)?;
        let verification = verify_opal_hash(&raw);
        all_ok = all_ok && verification.is_match();
        results.push((path, verification));
    }

    if json_output {
        let json_results: Vec<_> = results
            .iter()
            .map(|(path, verification)| match verification {
                HashVerification::Match(computed) => json!({
                    "path": path,
                    "verdict": "Match",
                    "computed": computed.as_str(),
                }),
                HashVerification::Mismatch { claimed, computed } => json!({
                    "path": path,
                    "verdict": "Mismatch",
                    "claimed": claimed,
                    "computed": computed.as_str(),
                }),
                HashVerification::Missing { computed } => json!({
                    "path": path,
                    "verdict": "Missing",
                    "computed": computed.as_str(),
                }),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&json_results)?);
    } else {
        output::print_table_header();
        for (path, verification) in &results {
            let (computed, verdict) = match verification {
                HashVerification::Match(computed) => (computed, "Match"),
                HashVerification::Mismatch { computed, .. } => (computed, "Mismatch"),
                HashVerification::Missing { computed } => (computed, "Missing"),
            };
            println!("{:<66} {:<9} {}", computed.as_str(), verdict, path);
        }
    }

    if strict && !all_ok {
        std::process::exit(1);
    }

    Ok(())
}
