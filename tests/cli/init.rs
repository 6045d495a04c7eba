use anyhow::Result;

use crate::{CliTest, stderr};

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.run(&["init"])?;
    assert_eq!(output.status.code(), Some(0));

    let content = std::fs::read_to_string(test.project_dir().join(".atomauditrc.json"))?;
    assert!(content.contains("capabilities"));
    let parsed: serde_json::Value = serde_json::from_str(&content)?;
    assert_eq!(parsed["capabilities"]["handleApi"], true);
    Ok(())
}

#[test]
fn test_init_refuses_to_overwrite() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".atomauditrc.json", "{}")?;

    let output = test.run(&["init"])?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("already exists"));
    Ok(())
}
