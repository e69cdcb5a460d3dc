use std::io::Read;

use anyhow::Context;
use serde_json::Value;

/// Read a text input. `-` reads stdin.
pub fn read_text(path: &str) -> anyhow::Result<String> {
    if path == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read stdin")?;
        return Ok(buffer);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read input file {path}"))
}

/// Parse a JSON object given on the command line.
pub fn parse_object(raw: &str, field: &str) -> anyhow::Result<Value> {
    let value: Value =
        serde_json::from_str(raw).with_context(|| format!("invalid JSON for {field}"))?;
    if !value.is_object() {
        anyhow::bail!("{field} must be a JSON object");
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::{parse_object, read_text};

    #[test]
    fn reads_file_contents() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile should create");
        write!(file, "IEEE Gold Medal, 2020").expect("write should work");

        let text = read_text(file.path().to_str().expect("utf-8 path")).expect("read");
        assert_eq!(text, "IEEE Gold Medal, 2020");
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = read_text("/nonexistent/case.txt").expect_err("should fail");
        assert!(err.to_string().contains("/nonexistent/case.txt"));
    }

    #[test]
    fn object_patch_parses() {
        let value = parse_object(r#"{"applicant": {"field": "ml"}}"#, "--patch").expect("parse");
        assert_eq!(value["applicant"]["field"], "ml");
    }

    #[test]
    fn non_object_patch_is_rejected() {
        let err = parse_object("[1, 2]", "--patch").expect_err("should fail");
        assert!(err.to_string().contains("--patch must be a JSON object"));
    }
}
