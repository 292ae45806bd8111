//! Encode command implementation.

use crate::input;
use crate::output;
use gkpo_adapters::Method;

pub fn run(method: Method, input: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let params = input::read_json(input.as_deref())?;
    let doc = method.encode(&params)?;
    tracing::info!(%method, opal_hash = %doc.opal_hash, "encoded native params");

    println!("{}", output::format_json(&doc.to_value()));
    Ok(())
}
