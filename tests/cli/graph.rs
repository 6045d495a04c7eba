use anyhow::Result;

use crate::{CliTest, stdout};

#[test]
fn test_graph_lists_states_and_edges() -> Result<()> {
    let test = CliTest::with_file(
        "src/state.ts",
        r#"
import { atom, selector } from "recoil";
export const baseState = atom({ key: "base", default: 1 });
export const doubled = selector({
    key: "doubled",
    get: ({ get }) => get(baseState) * 2,
});
"#,
    )?;

    let output = test.run(&["graph"])?;
    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    assert!(out.contains("2 states"), "stdout: {}", out);
    assert!(out.contains("1 edge"), "stdout: {}", out);
    assert!(
        out.contains("src/state.ts::doubled -> src/state.ts::baseState (via recoil:get)"),
        "stdout: {}",
        out
    );
    Ok(())
}

#[test]
fn test_graph_json_output() -> Result<()> {
    let test = CliTest::with_file(
        "src/state.ts",
        r#"
import { atom } from "jotai";
export const countAtom = atom(0);
export const doubledAtom = atom((get) => get(countAtom) * 2);
"#,
    )?;

    let output = test.run(&["graph", "--format", "json"])?;
    assert_eq!(output.status.code(), Some(0));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output))?;
    assert_eq!(value["states"].as_array().unwrap().len(), 2);
    let edges = value["edges"].as_array().unwrap();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0]["via"], "jotai:get");
    Ok(())
}
