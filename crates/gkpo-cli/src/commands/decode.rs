//! Decode command implementation.

use crate::input;
use crate::output;
use gkpo_adapters::Method;

pub fn run(method: Method, input: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let doc = input::read_json(input.as_deref())?;
    let params = method.decode(&doc)?;

    println!("{}", output::format_json(&params));
    Ok(())
}
