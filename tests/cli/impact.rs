use anyhow::Result;

use crate::{CliTest, stderr, stdout};

fn chain_fixture() -> Result<CliTest> {
    let test = CliTest::with_file(
        "src/state.ts",
        r#"
import { atom } from "jotai";
export const baseAtom = atom(1);
export const doubledAtom = atom((get) => get(baseAtom) * 2);
export const quadAtom = atom((get) => get(doubledAtom) * 2);
"#,
    )?;
    test.write_file(
        "src/App.tsx",
        r#"
import { useAtomValue } from "jotai";
import { quadAtom } from "./state";
export function View() {
    const value = useAtomValue(quadAtom);
    return value;
}
"#,
    )?;
    Ok(test)
}

#[test]
fn test_impact_walks_reverse_dependencies() -> Result<()> {
    let test = chain_fixture()?;

    let output = test.run(&["impact", "baseAtom"])?;
    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    assert!(out.contains("1 hop: src/state.ts::doubledAtom"), "stdout: {}", out);
    assert!(out.contains("2 hops: src/state.ts::quadAtom"), "stdout: {}", out);
    assert!(out.contains("View"), "stdout: {}", out);
    Ok(())
}

#[test]
fn test_impact_json_output() -> Result<()> {
    let test = chain_fixture()?;

    let output = test.run(&["impact", "baseAtom", "--format", "json"])?;
    assert_eq!(output.status.code(), Some(0));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output))?;
    assert_eq!(value["root"], "src/state.ts::baseAtom");
    let affected = value["affected"].as_array().unwrap();
    assert_eq!(affected.len(), 2);
    assert_eq!(affected[0]["stateId"], "src/state.ts::doubledAtom");
    assert_eq!(affected[0]["distance"], 1);
    Ok(())
}

#[test]
fn test_impact_unknown_state_fails() -> Result<()> {
    let test = chain_fixture()?;

    let output = test.run(&["impact", "missingAtom"])?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Unknown state"));
    Ok(())
}

#[test]
fn test_impact_ambiguous_name_fails() -> Result<()> {
    let test = chain_fixture()?;
    test.write_file(
        "src/other.ts",
        r#"
import { atom } from "jotai";
export const baseAtom = atom(0);
"#,
    )?;

    let output = test.run(&["impact", "baseAtom"])?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("ambiguous"));

    // The full id still works.
    let by_id = test.run(&["impact", "src/state.ts::baseAtom"])?;
    assert_eq!(by_id.status.code(), Some(0));
    Ok(())
}
