//! Check command implementation.

use crate::input;
use crate::output;
use gkpo_canonical::canonicalize_and_hash;

pub fn run(paths: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    for path in paths {
        let raw = input::read_json_file(&path)?;
        let doc = canonicalize_and_hash(&raw);
        println!(
            "{}: {} | inside_R={} reasons={}",
            path,
            doc.opal_hash,
            doc.inside_r(),
            output::format_reasons(&doc.reducibility.reasons)
        );
    }

    Ok(())
}
