//! Canonicalize command implementation.

use crate::input;
use crate::output;
use gkpo_canonical::canonicalize_and_hash;
use gkpo_canonical::forms::is_truthy;
use serde_json::json;

pub fn run(input: Option<String>, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let raw = input::read_json(input.as_deref())?;
    let doc = canonicalize_and_hash(&raw);

    if json_output {
        let report = json!({
            "projection": doc.projection.as_value(),
            "opal_hash": doc.opal_hash.as_str(),
            "reducibility": doc.reducibility.to_value(),
            "document": doc.to_value(),
        });
        println!("{}", output::format_json(&report));
        return Ok(());
    }

    println!("{}", output::format_json(doc.projection.as_value()));
    println!("opal_hash: {}", doc.opal_hash);
    println!(
        "inside_R: {} reasons: {}",
        doc.inside_r(),
        output::format_reasons(&doc.reducibility.reasons)
    );
    if is_truthy(&doc.reducibility.witness) {
        println!("witness: {}", output::format_json(&doc.reducibility.witness));
    }

    Ok(())
}
