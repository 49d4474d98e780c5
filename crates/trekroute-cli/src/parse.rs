use serde_json::{json, Value};
use trekroute_core::{is_vague_name, parse_location_name};

pub(crate) fn describe(text: &str) -> Value {
    let location = parse_location_name(text);
    let vague = !location.is_empty() && is_vague_name(&location);
    json!({
        "input": text,
        "location": location,
        "vague": vague,
        "lookup": !location.is_empty() && !vague,
    })
}

pub(crate) fn run_parse(text: &str) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&describe(text))?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_lookup_candidate() {
        let out = describe("Trek from Phakding to Namche Bazaar (3440m)");
        assert_eq!(out["location"], "Namche Bazaar");
        assert_eq!(out["vague"], false);
        assert_eq!(out["lookup"], true);
    }

    #[test]
    fn vague_name_is_not_looked_up() {
        let out = describe("Gorak Shep to Everest Base Camp");
        assert_eq!(out["vague"], true);
        assert_eq!(out["lookup"], false);
    }

    #[test]
    fn empty_parse_is_neither_vague_nor_looked_up() {
        let out = describe("(acclimatisation)");
        assert_eq!(out["location"], "");
        assert_eq!(out["vague"], false);
        assert_eq!(out["lookup"], false);
    }
}
