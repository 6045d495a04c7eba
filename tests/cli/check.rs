use anyhow::Result;

use crate::{CliTest, stderr, stdout};

const CROSS_STORE_STATE: &str = r#"
import { selector } from "recoil";
import { atom } from "jotai";
export const sharedAtomB = atom(0);
export const illegalSel = selector({
    key: "illegalSel",
    get: ({ get }) => get(sharedAtomB),
});
"#;

const CROSS_STORE_APP: &str = r#"
import { useRecoilValue } from "recoil";
import { illegalSel } from "./state";
export function View() {
    const value = useRecoilValue(illegalSel);
    return value;
}
"#;

#[test]
fn test_check_reports_cross_store_read() -> Result<()> {
    let test = CliTest::with_file("src/state.ts", CROSS_STORE_STATE)?;
    test.write_file("src/App.tsx", CROSS_STORE_APP)?;

    let output = test.run(&["check"])?;
    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.contains("legacy-reads-target"), "stdout: {}", out);
    assert!(out.contains("illegalSel"), "stdout: {}", out);
    assert!(out.contains("sharedAtomB"), "stdout: {}", out);
    Ok(())
}

#[test]
fn test_check_clean_project_passes() -> Result<()> {
    let test = CliTest::with_file(
        "src/state.ts",
        r#"
import { atom } from "jotai";
export const countAtom = atom(0);
"#,
    )?;
    test.write_file(
        "src/App.tsx",
        r#"
import { useAtomValue, useSetAtom } from "jotai";
import { countAtom } from "./state";
export function Counter() {
    const count = useAtomValue(countAtom);
    const setCount = useSetAtom(countAtom);
    const onClick = () => setCount(count + 1);
    return <button onClick={onClick}>{count}</button>;
}
"#,
    )?;

    let output = test.run(&["check"])?;
    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    assert!(out.contains("no issues found"), "stdout: {}", out);
    Ok(())
}

#[test]
fn test_check_json_output() -> Result<()> {
    let test = CliTest::with_file("src/state.ts", CROSS_STORE_STATE)?;
    test.write_file("src/App.tsx", CROSS_STORE_APP)?;

    let output = test.run(&["check", "--format", "json"])?;
    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output))?;
    let issues = value["issues"].as_array().unwrap();
    assert!(!issues.is_empty());
    assert_eq!(issues[0]["rule"], "legacy-reads-target");
    assert_eq!(value["summary"]["errors"], 1);
    Ok(())
}

#[test]
fn test_check_rule_filter() -> Result<()> {
    let test = CliTest::with_file("src/state.ts", CROSS_STORE_STATE)?;
    test.write_file("src/App.tsx", CROSS_STORE_APP)?;

    // Only the read-only-atom rule: the cross-store finding is filtered out
    // and there are no plain Recoil atoms, so the project passes.
    let output = test.run(&["check", "read-only-atom"])?;
    assert_eq!(output.status.code(), Some(0));
    Ok(())
}

#[test]
fn test_check_core_profile_skips_handle_analysis() -> Result<()> {
    let test = CliTest::with_file(
        "src/store.ts",
        r#"
import { createStore } from "jotai";
export const appStore = createStore();
"#,
    )?;
    test.write_file(
        "src/state.ts",
        r#"
import { selector } from "recoil";
import { atom } from "jotai";
import { appStore } from "./store";
export const sharedAtomB = atom(0);
export const illegalSel2 = selector({
    key: "illegalSel2",
    get() {
        return appStore.get(sharedAtomB);
    },
});
"#,
    )?;

    let extended = test.run(&["check"])?;
    assert_eq!(extended.status.code(), Some(1));
    assert!(stdout(&extended).contains("legacy-reads-target"));

    let core = test.run(&["check", "--profile", "core"])?;
    assert_eq!(core.status.code(), Some(0));
    Ok(())
}

#[test]
fn test_check_empty_scope_is_an_error() -> Result<()> {
    let test = CliTest::new()?;
    let output = test.run(&["check"])?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("No source files"));
    Ok(())
}

#[test]
fn test_help() -> Result<()> {
    let test = CliTest::new()?;
    let output = test.run(&["--help"])?;
    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    assert!(out.contains("check"));
    assert!(out.contains("impact"));
    Ok(())
}

#[test]
fn test_config_ignores() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        ".atomauditrc.json",
        r#"{ "ignores": ["**/generated/**"] }"#,
    )?;
    test.write_file("src/state.ts", CROSS_STORE_STATE)?;
    test.write_file(
        "generated/bad.ts",
        r#"this is not valid typescript ((("#,
    )?;

    let output = test.run(&["check"])?;
    // The unparseable generated file is ignored; only the cross-store
    // finding remains.
    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.contains("legacy-reads-target"), "stdout: {}", out);
    assert!(!out.contains("parse-error"), "stdout: {}", out);
    Ok(())
}

#[test]
fn test_parse_errors_are_reported_not_fatal() -> Result<()> {
    let test = CliTest::with_file("src/state.ts", CROSS_STORE_STATE)?;
    test.write_file("src/broken.ts", "const = = =;")?;

    let output = test.run(&["check"])?;
    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.contains("parse-error"), "stdout: {}", out);
    assert!(out.contains("legacy-reads-target"), "stdout: {}", out);
    Ok(())
}
