//! Library identities: which imported names mean what.
//!
//! Recognition is always based on the *imported* name after following import
//! aliasing (`import { atom as recoilAtom } from "recoil"` still counts), so
//! these tables speak in terms of `(module, original name)` pairs.

use crate::core::bindings::SetterFlavor;

pub const RECOIL: &str = "recoil";
pub const JOTAI: &str = "jotai";
pub const JOTAI_UTILS: &str = "jotai/utils";
pub const REACT: &str = "react";

/// Read hooks and the via tag their events carry.
pub fn read_hook_via(module: &str, name: &str) -> Option<&'static str> {
    match (module, name) {
        (RECOIL, "useRecoilValue") => Some("recoil:useRecoilValue"),
        (RECOIL, "useRecoilValueLoadable") => Some("recoil:useRecoilValueLoadable"),
        (RECOIL, "useRecoilState") => Some("recoil:useRecoilState"),
        (RECOIL, "useRecoilStateLoadable") => Some("recoil:useRecoilStateLoadable"),
        (JOTAI, "useAtomValue") => Some("jotai:useAtomValue"),
        (JOTAI, "useAtom") => Some("jotai:useAtom"),
        _ => None,
    }
}

/// Hooks returning a setter (or resetter) directly.
pub fn setter_factory(module: &str, name: &str) -> Option<SetterFlavor> {
    match (module, name) {
        (RECOIL, "useSetRecoilState") => Some(SetterFlavor::Set),
        (RECOIL, "useResetRecoilState") => Some(SetterFlavor::Reset),
        (JOTAI, "useSetAtom") => Some(SetterFlavor::Set),
        _ => None,
    }
}

/// Hooks returning a `[value, setter]` tuple.
pub fn is_tuple_factory(module: &str, name: &str) -> bool {
    matches!(
        (module, name),
        (RECOIL, "useRecoilState") | (RECOIL, "useRecoilStateLoadable") | (JOTAI, "useAtom")
    )
}

/// Whether a module path is one of the recognized libraries. Wrapper
/// analysis stops recursing into callees imported from these modules
/// rather than treating them as user functions.
pub fn is_library_module(module: &str) -> bool {
    matches!(module, RECOIL | JOTAI | JOTAI_UTILS | REACT)
}

pub fn is_recoil_callback_factory(module: &str, name: &str) -> bool {
    module == RECOIL && name == "useRecoilCallback"
}

pub fn is_jotai_callback_factory(module: &str, name: &str) -> bool {
    module == JOTAI_UTILS && name == "useAtomCallback"
}

/// The generic React memo-wrap that may sit between a callback factory and
/// its function argument.
pub fn is_memo_wrap(module: &str, name: &str) -> bool {
    module == REACT && name == "useCallback"
}

pub fn is_store_factory(module: &str, name: &str) -> bool {
    module == JOTAI && name == "createStore"
}

pub fn is_recoil_selector_factory(module: &str, name: &str) -> bool {
    module == RECOIL && matches!(name, "selector" | "selectorFamily")
}

/// Methods of a Recoil snapshot that read state.
pub const SNAPSHOT_READ_METHODS: &[&str] = &["get", "getPromise", "getLoadable"];
