use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Print `value` between the JSON marker lines other tooling scrapes for.
pub fn print_bracketed<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", shutter_core::report::bracketed_json(value)?);
    Ok(())
}
