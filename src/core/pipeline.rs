//! Pipeline - composes bindings and extractors under a capability profile,
//! deduplicates, and orders the output deterministically.
//!
//! `analyze` is a pure function from a loaded project to
//! `{usage events, dependency edges}`: identical inputs give byte-identical
//! output, regardless of the presentation order of source files. All scratch
//! maps (bindings, handles, wrapper caches) live and die inside one call.

use serde::{Deserialize, Serialize};

use crate::core::bindings::{HandleSet, SetterBindings, forward_bindings, resolve_setter_bindings};
use crate::core::data::{DependencyEdge, StateSymbol, UsageEvent};
use crate::core::extract::{
    Extractor, PipelineContext, callbacks::Callbacks, dependencies::Dependencies,
    direct_hooks::DirectHooks, handle_api::HandleApi, setter_calls::SetterCalls,
};
use crate::core::facade::Resolver;
use crate::core::index::SymbolIndex;
use crate::core::parsers::Project;

/// The four analysis switches. "Core" turns them all off, "extended" all on.
/// The rule evaluators and impact query run unchanged against whichever
/// event set the profile produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CapabilityProfile {
    pub callbacks: bool,
    pub wrappers: bool,
    pub forwarding: bool,
    pub handle_api: bool,
}

impl CapabilityProfile {
    pub fn core() -> Self {
        Self {
            callbacks: false,
            wrappers: false,
            forwarding: false,
            handle_api: false,
        }
    }

    pub fn extended() -> Self {
        Self {
            callbacks: true,
            wrappers: true,
            forwarding: true,
            handle_api: true,
        }
    }
}

impl Default for CapabilityProfile {
    fn default() -> Self {
        Self::extended()
    }
}

/// The analyzer's output: both arrays sorted under their canonical total
/// orders, with exact duplicates removed.
#[derive(Debug, Default)]
pub struct AnalysisOutput {
    pub usage_events: Vec<UsageEvent>,
    pub dependency_edges: Vec<DependencyEdge>,
}

/// Analysis result plus the symbol index it was computed against.
pub struct ProjectAnalysis {
    pub states: Vec<StateSymbol>,
    pub output: AnalysisOutput,
}

impl ProjectAnalysis {
    pub fn state(&self, id: &str) -> Option<&StateSymbol> {
        self.states.iter().find(|state| state.id == id)
    }
}

pub fn analyze(project: &Project, profile: &CapabilityProfile) -> ProjectAnalysis {
    let resolver = Resolver::build(project);
    let index = SymbolIndex::build(project, &resolver);

    // Phase 1: capability-gated bindings.
    let handles = if profile.handle_api {
        HandleSet::detect(project, &resolver)
    } else {
        HandleSet::default()
    };
    let direct = resolve_setter_bindings(project, &resolver, &index, profile.wrappers);
    let setters: SetterBindings = if profile.forwarding {
        forward_bindings(project, &resolver, &direct)
    } else {
        direct
    };

    // Phase 2: the pipeline context.
    let ctx = PipelineContext {
        project,
        resolver: &resolver,
        index: &index,
        setters: &setters,
        handles: &handles,
        profile: *profile,
    };

    // Phase 3: run the gated extractors.
    let extractors: Vec<Box<dyn Extractor>> = vec![
        Box::new(DirectHooks),
        Box::new(SetterCalls),
        Box::new(Callbacks),
        Box::new(HandleApi),
        Box::new(Dependencies),
    ];
    let mut events: Vec<UsageEvent> = Vec::new();
    let mut edges: Vec<DependencyEdge> = Vec::new();
    for extractor in extractors {
        if !extractor.enabled(profile) {
            continue;
        }
        let mut output = extractor.run(&ctx);
        events.append(&mut output.events);
        edges.append(&mut output.edges);
    }

    // Phase 4: dedup on the identity tuples, then the canonical total order.
    events.sort_by(|a, b| a.identity().cmp(&b.identity()));
    events.dedup_by(|a, b| a.identity() == b.identity());
    events.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

    edges.sort_by(|a, b| a.identity().cmp(&b.identity()));
    edges.dedup_by(|a, b| a.identity() == b.identity());
    edges.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

    ProjectAnalysis {
        states: index.states().to_vec(),
        output: AnalysisOutput {
            usage_events: events,
            dependency_edges: edges,
        },
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::data::{ActorKind, EventType, Phase};
    use crate::issues::{Issue, Report as _, Rule};
    use crate::rules::run_rules;

    fn analyze_sources(sources: &[(&str, &str)], profile: &CapabilityProfile) -> ProjectAnalysis {
        let project = Project::from_sources(sources).unwrap();
        analyze(&project, profile)
    }

    fn extended(sources: &[(&str, &str)]) -> ProjectAnalysis {
        analyze_sources(sources, &CapabilityProfile::extended())
    }

    const COUNTER: &str = r#"
        import { atom } from "recoil";
        export const counterState = atom({ key: "counter", default: 0 });
    "#;

    // Scenario: a Recoil selector reads a Jotai atom through the injected
    // `get` - the edge, its paired dependency read, and the rule finding.
    #[test]
    fn test_recoil_selector_reads_jotai_atom() {
        let state = r#"
            import { selector } from "recoil";
            import { atom } from "jotai";
            export const sharedAtomB = atom(0);
            export const illegalSel = selector({
                key: "illegalSel",
                get: ({ get }) => get(sharedAtomB),
            });
        "#;
        let analysis = extended(&[("src/state.ts", state)]);

        assert_eq!(analysis.output.dependency_edges.len(), 1);
        let edge = &analysis.output.dependency_edges[0];
        assert_eq!(edge.from_state_id, "src/state.ts::illegalSel");
        assert_eq!(edge.to_state_id, "src/state.ts::sharedAtomB");
        assert_eq!(edge.via, "recoil:get");

        let dep_reads: Vec<_> = analysis
            .output
            .usage_events
            .iter()
            .filter(|e| e.phase == Phase::Dependency)
            .collect();
        assert_eq!(dep_reads.len(), 1);
        let read = dep_reads[0];
        assert_eq!(read.event_type, EventType::Read);
        assert_eq!(read.state_id, "src/state.ts::sharedAtomB");
        assert_eq!(read.actor.kind, ActorKind::State);
        assert_eq!(read.actor.state_id.as_deref(), Some("src/state.ts::illegalSel"));
        assert_eq!(read.location, edge.location);
        assert_eq!(read.via, edge.via);

        let issues = run_rules(&analysis, &[]);
        let cross: Vec<_> = issues
            .iter()
            .filter(|i| i.rule() == Rule::LegacyReadsTarget)
            .collect();
        assert_eq!(cross.len(), 1);
    }

    // Scenario: a Recoil selector reads a Jotai atom through an imperative
    // store handle inside its compute function.
    #[test]
    fn test_recoil_selector_uses_store_handle() {
        let store = r#"
            import { createStore } from "jotai";
            export const appStore = createStore();
        "#;
        let state = r#"
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
        "#;
        let sources = &[("src/state.ts", state), ("src/store.ts", store)];

        let analysis = extended(sources);
        assert_eq!(analysis.output.dependency_edges.len(), 1);
        let edge = &analysis.output.dependency_edges[0];
        assert_eq!(edge.via, "jotai:store.get");
        assert_eq!(edge.from_state_id, "src/state.ts::illegalSel2");
        // The handle read inside the compute function must not double as a
        // runtime read.
        assert!(
            analysis
                .output
                .usage_events
                .iter()
                .all(|e| e.phase == Phase::Dependency)
        );

        let issues = run_rules(&analysis, &[]);
        assert!(issues.iter().any(|i| i.rule() == Rule::LegacyReadsTarget));

        // The core profile has no handle analysis, so the edge disappears.
        let core = analyze_sources(sources, &CapabilityProfile::core());
        assert!(core.output.dependency_edges.is_empty());
    }

    // Scenario: a custom hook hides the setter; the consumer's call still
    // binds to the wrapped state.
    #[test]
    fn test_wrapper_hook_hides_setter() {
        let hooks = r#"
            import { useSetRecoilState } from "recoil";
            import { counterState } from "./state";
            export const useSetCounter = () => useSetRecoilState(counterState);
        "#;
        let app = r#"
            import { useSetCounter } from "./hooks";
            export function Controls() {
                const set = useSetCounter();
                const onClick = () => set(1);
                return null;
            }
        "#;
        let analysis = extended(&[
            ("src/state.ts", COUNTER),
            ("src/hooks.ts", hooks),
            ("src/App.tsx", app),
        ]);

        let writes: Vec<_> = analysis
            .output
            .usage_events
            .iter()
            .filter(|e| e.event_type == EventType::RuntimeWrite)
            .collect();
        assert_eq!(writes.len(), 1);
        let write = writes[0];
        assert_eq!(write.state_id, "src/state.ts::counterState");
        assert_eq!(write.via, "setter-call");
        assert_eq!(write.actor.kind, ActorKind::Function);
        assert_eq!(write.actor.name, "onClick");
    }

    // Scenario: one-hop prop forwarding binds the child's prop parameter.
    #[test]
    fn test_one_hop_prop_forwarding() {
        let toggle = r#"
            import { atom } from "recoil";
            export const toggleState = atom({ key: "toggle", default: false });
        "#;
        let app = r#"
            import { useRecoilState } from "recoil";
            import { toggleState } from "./state";
            export function Parent() {
                const [enabled, setEnabled] = useRecoilState(toggleState);
                return <Switch onChecked={setEnabled} />;
            }
            function Switch({ onChecked }) {
                onChecked(true);
                return null;
            }
        "#;
        let sources = &[("src/state.ts", toggle), ("src/App.tsx", app)];

        let analysis = extended(sources);
        let forwarded_writes: Vec<_> = analysis
            .output
            .usage_events
            .iter()
            .filter(|e| e.event_type == EventType::RuntimeWrite && e.via == "setter-call")
            .collect();
        assert_eq!(forwarded_writes.len(), 1);
        assert_eq!(forwarded_writes[0].state_id, "src/state.ts::toggleState");
        assert_eq!(forwarded_writes[0].actor.name, "Switch");

        // The written toggle atom is not a read-only migration candidate.
        let issues = run_rules(&analysis, &[]);
        assert!(issues.iter().all(|i| i.rule() != Rule::ReadOnlyAtom));

        // Without the forwarding capability the write is invisible.
        let no_forwarding = analyze_sources(
            sources,
            &CapabilityProfile {
                forwarding: false,
                ..CapabilityProfile::extended()
            },
        );
        assert!(
            no_forwarding
                .output
                .usage_events
                .iter()
                .all(|e| e.via != "setter-call")
        );
    }

    // Scenario: writes reachable from initializeState are initialization,
    // not runtime - even in the core profile, through the bare `set` shape.
    #[test]
    fn test_init_write_excluded_from_runtime() {
        let app = r#"
            import { useRecoilValue } from "recoil";
            import { counterState } from "./state";
            function initializeCounter(set) {
                set(counterState, 1);
            }
            export function Root() {
                return <RecoilRoot initializeState={({ set }) => initializeCounter(set)} />;
            }
            export function Display() {
                const value = useRecoilValue(counterState);
                return value;
            }
        "#;
        let sources = &[("src/state.ts", COUNTER), ("src/App.tsx", app)];
        let analysis = analyze_sources(sources, &CapabilityProfile::core());

        let init_writes: Vec<_> = analysis
            .output
            .usage_events
            .iter()
            .filter(|e| e.event_type == EventType::InitWrite)
            .collect();
        assert_eq!(init_writes.len(), 1);
        assert_eq!(init_writes[0].state_id, "src/state.ts::counterState");
        assert_eq!(init_writes[0].via, "init:set");
        assert!(
            analysis
                .output
                .usage_events
                .iter()
                .all(|e| e.event_type != EventType::RuntimeWrite)
        );

        // Runtime reads exist and runtime writes do not, so the plain atom
        // is flagged as a read-only migration candidate.
        let issues = run_rules(&analysis, &[]);
        assert!(issues.iter().any(|i| i.rule() == Rule::ReadOnlyAtom));
    }

    // Scenario: a wrapper that packs a tuple into a returned object still
    // binds the destructured setter at the consumer.
    #[test]
    fn test_object_returning_wrapper_end_to_end() {
        let state = r#"
            import { atom } from "recoil";
            export const titleState = atom({ key: "title", default: "" });
        "#;
        let hooks = r#"
            import { useRecoilState } from "recoil";
            import { titleState } from "./state";
            export function useTitle() {
                const [title, setTitle] = useRecoilState(titleState);
                return { title, setTitle };
            }
        "#;
        let app = r#"
            import { useTitle } from "./hooks";
            export function Editor() {
                const { setTitle } = useTitle();
                const onChange = (e) => setTitle(e.target.value);
                return null;
            }
        "#;
        let analysis = extended(&[
            ("src/state.ts", state),
            ("src/hooks.ts", hooks),
            ("src/App.tsx", app),
        ]);

        let writes: Vec<_> = analysis
            .output
            .usage_events
            .iter()
            .filter(|e| {
                e.event_type == EventType::RuntimeWrite
                    && e.location.file_path == "src/App.tsx"
            })
            .collect();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].state_id, "src/state.ts::titleState");
        assert_eq!(writes[0].via, "setter-call");
    }

    #[test]
    fn test_direct_hook_reads_and_jsx_setter_reference() {
        let app = r#"
            import { useRecoilState, useRecoilValue } from "recoil";
            import { counterState } from "./state";
            export function Counter() {
                const [count, setCount] = useRecoilState(counterState);
                return <button onClick={setCount}>{count}</button>;
            }
            export function Mirror() {
                const value = useRecoilValue(counterState);
                return value;
            }
        "#;
        let analysis = extended(&[("src/state.ts", COUNTER), ("src/App.tsx", app)]);

        let reads: Vec<_> = analysis
            .output
            .usage_events
            .iter()
            .filter(|e| e.event_type == EventType::Read)
            .collect();
        assert_eq!(reads.len(), 2);
        assert!(reads.iter().any(|e| e.via == "recoil:useRecoilState" && e.actor.name == "Counter"));
        assert!(reads.iter().any(|e| e.via == "recoil:useRecoilValue" && e.actor.name == "Mirror"));

        let references: Vec<_> = analysis
            .output
            .usage_events
            .iter()
            .filter(|e| e.via == "setter-reference")
            .collect();
        assert_eq!(references.len(), 1);
        assert_eq!(references[0].event_type, EventType::RuntimeWrite);
        assert_eq!(references[0].state_id, "src/state.ts::counterState");
    }

    #[test]
    fn test_recoil_callback_snapshot_and_set() {
        let app = r#"
            import { useRecoilCallback } from "recoil";
            import { counterState } from "./state";
            export function Logger() {
                const bump = useRecoilCallback(({ snapshot, set }) => async () => {
                    const value = await snapshot.getPromise(counterState);
                    set(counterState, value + 1);
                });
                return bump;
            }
        "#;
        let sources = &[("src/state.ts", COUNTER), ("src/App.tsx", app)];
        let analysis = extended(sources);

        assert!(
            analysis
                .output
                .usage_events
                .iter()
                .any(|e| e.via == "callback:snapshot.getPromise"
                    && e.event_type == EventType::Read
                    && e.actor.name == "Logger")
        );
        assert!(
            analysis
                .output
                .usage_events
                .iter()
                .any(|e| e.via == "callback:set" && e.event_type == EventType::RuntimeWrite)
        );

        // Without the callback capability the snapshot read disappears.
        let core = analyze_sources(sources, &CapabilityProfile::core());
        assert!(
            core.output
                .usage_events
                .iter()
                .all(|e| !e.via.starts_with("callback:snapshot"))
        );
    }

    #[test]
    fn test_jotai_callback_with_memo_wrap() {
        let state = r#"
            import { atom } from "jotai";
            export const countAtom = atom(0);
        "#;
        let app = r#"
            import { useCallback } from "react";
            import { useAtomCallback } from "jotai/utils";
            import { countAtom } from "./state";
            export function Reader() {
                const read = useAtomCallback(
                    useCallback((get, dispatch) => {
                        dispatch(countAtom, get(countAtom) + 1);
                        return get(countAtom);
                    }, [])
                );
                return read;
            }
        "#;
        let analysis = extended(&[("src/state.ts", state), ("src/App.tsx", app)]);

        let callback_reads = analysis
            .output
            .usage_events
            .iter()
            .filter(|e| e.via == "callback:get")
            .count();
        assert_eq!(callback_reads, 2);
        assert!(
            analysis
                .output
                .usage_events
                .iter()
                .any(|e| e.via == "callback:set" && e.event_type == EventType::RuntimeWrite)
        );
    }

    #[test]
    fn test_imperative_handle_reads_and_writes() {
        let store = r#"
            import { createStore } from "jotai";
            export const appStore = createStore();
        "#;
        let state = r#"
            import { atom } from "jotai";
            export const countAtom = atom(0);
        "#;
        let app = r#"
            import { appStore } from "./store";
            import { countAtom } from "./state";
            export function flush() {
                const current = appStore.get(countAtom);
                appStore.set(countAtom, current + 1);
            }
        "#;
        let analysis = extended(&[
            ("src/store.ts", store),
            ("src/state.ts", state),
            ("src/App.tsx", app),
        ]);

        assert!(
            analysis
                .output
                .usage_events
                .iter()
                .any(|e| e.via == "jotai:store.get" && e.event_type == EventType::Read)
        );
        assert!(
            analysis
                .output
                .usage_events
                .iter()
                .any(|e| e.via == "jotai:store.set" && e.event_type == EventType::RuntimeWrite)
        );
    }

    #[test]
    fn test_jotai_derived_and_family_dependencies() {
        let state = r#"
            import { atom } from "jotai";
            import { atomFamily, atomWithDefault } from "jotai/utils";
            export const baseAtom = atom(1);
            export const doubledAtom = atom((get) => get(baseAtom) * 2);
            export const cachedAtom = atomWithDefault((get) => get(baseAtom));
            export const rowAtoms = atomFamily((id) => atom((get) => get(baseAtom) + id));
        "#;
        let analysis = extended(&[("src/state.ts", state)]);

        let froms: Vec<_> = analysis
            .output
            .dependency_edges
            .iter()
            .map(|e| e.from_state_id.as_str())
            .collect();
        assert!(froms.contains(&"src/state.ts::doubledAtom"));
        assert!(froms.contains(&"src/state.ts::cachedAtom"));
        assert!(froms.contains(&"src/state.ts::rowAtoms"));
        assert!(
            analysis
                .output
                .dependency_edges
                .iter()
                .all(|e| e.to_state_id == "src/state.ts::baseAtom" && e.via == "jotai:get")
        );
    }

    #[test]
    fn test_selector_family_curried_get() {
        let state = r#"
            import { atom, atomFamily, selectorFamily } from "recoil";
            export const itemState = atomFamily({ key: "item", default: null });
            export const itemQuery = selectorFamily({
                key: "itemQuery",
                get: (id) => ({ get }) => get(itemState(id)),
            });
        "#;
        let analysis = extended(&[("src/state.ts", state)]);

        assert_eq!(analysis.output.dependency_edges.len(), 1);
        let edge = &analysis.output.dependency_edges[0];
        assert_eq!(edge.from_state_id, "src/state.ts::itemQuery");
        assert_eq!(edge.to_state_id, "src/state.ts::itemState");
        assert_eq!(edge.via, "recoil:get");
    }

    #[test]
    fn test_selector_get_with_named_context_parameter() {
        let state = r#"
            import { atom, selector } from "recoil";
            export const baseState = atom({ key: "base", default: 1 });
            export const viaContext = selector({
                key: "viaContext",
                get: (ctx) => ctx.get(baseState) + 1,
            });
        "#;
        let analysis = extended(&[("src/state.ts", state)]);

        assert_eq!(analysis.output.dependency_edges.len(), 1);
        let edge = &analysis.output.dependency_edges[0];
        assert_eq!(edge.from_state_id, "src/state.ts::viaContext");
        assert_eq!(edge.to_state_id, "src/state.ts::baseState");
        assert_eq!(edge.via, "recoil:get");
    }

    #[test]
    fn test_atom_with_selector_reference_default() {
        let state = r#"
            import { atom, selector } from "recoil";
            export const baseState = atom({ key: "base", default: 1 });
            export const derivedSel = selector({
                key: "derivedSel",
                get: ({ get }) => get(baseState) * 2,
            });
            export const seededState = atom({ key: "seeded", default: derivedSel });
        "#;
        let analysis = extended(&[("src/state.ts", state)]);

        let seeded = analysis.state("src/state.ts::seededState").unwrap();
        assert!(!seeded.plain_recoil_atom);
        // The atom owns the referenced selector's reads in addition to the
        // selector owning them itself.
        let owners: Vec<_> = analysis
            .output
            .dependency_edges
            .iter()
            .filter(|e| e.to_state_id == "src/state.ts::baseState")
            .map(|e| e.from_state_id.as_str())
            .collect();
        assert!(owners.contains(&"src/state.ts::derivedSel"));
        assert!(owners.contains(&"src/state.ts::seededState"));
    }

    #[test]
    fn test_output_is_order_insensitive_and_idempotent() {
        let a = (
            "src/state.ts",
            r#"
                import { atom, selector } from "recoil";
                export const baseState = atom({ key: "base", default: 1 });
                export const doubled = selector({
                    key: "doubled",
                    get: ({ get }) => get(baseState) * 2,
                });
            "#,
        );
        let b = (
            "src/App.tsx",
            r#"
                import { useRecoilValue, useSetRecoilState } from "recoil";
                import { baseState, doubled } from "./state";
                export function View() {
                    const value = useRecoilValue(doubled);
                    const setBase = useSetRecoilState(baseState);
                    return <button onClick={setBase}>{value}</button>;
                }
            "#,
        );

        let forward = extended(&[a, b]);
        let reversed = extended(&[b, a]);
        let again = extended(&[a, b]);

        assert_eq!(forward.output.usage_events, reversed.output.usage_events);
        assert_eq!(forward.output.dependency_edges, reversed.output.dependency_edges);
        assert_eq!(forward.output.usage_events, again.output.usage_events);
        assert_eq!(forward.output.dependency_edges, again.output.dependency_edges);
    }

    #[test]
    fn test_output_invariants_hold() {
        let analysis = extended(&[
            (
                "src/state.ts",
                r#"
                    import { atom, selector } from "recoil";
                    import { atom as jatom } from "jotai";
                    export const aState = atom({ key: "a", default: 1 });
                    export const bAtom = jatom(2);
                    export const mixedSel = selector({
                        key: "mixed",
                        get: ({ get }) => get(aState) + get(bAtom),
                    });
                "#,
            ),
            (
                "src/App.tsx",
                r#"
                    import { useRecoilValue, useSetRecoilState } from "recoil";
                    import { aState, mixedSel } from "./state";
                    export function View() {
                        const value = useRecoilValue(mixedSel);
                        const setA = useSetRecoilState(aState);
                        const onClick = () => setA(value + 1);
                        return <button onClick={onClick}>{value}</button>;
                    }
                "#,
            ),
        ]);

        let state_ids: Vec<_> = analysis.states.iter().map(|s| s.id.as_str()).collect();

        // Every event's state exists in the index.
        for event in &analysis.output.usage_events {
            assert!(state_ids.contains(&event.state_id.as_str()));
            // Dependency phase implies a state actor and a matching edge.
            if event.phase == Phase::Dependency {
                assert_eq!(event.event_type, EventType::Read);
                assert_eq!(event.actor.kind, ActorKind::State);
                let actor_state = event.actor.state_id.as_deref().unwrap();
                assert!(analysis.output.dependency_edges.iter().any(|edge| {
                    edge.from_state_id == actor_state
                        && edge.to_state_id == event.state_id
                        && edge.location == event.location
                        && edge.via == event.via
                }));
            }
        }

        // No duplicate identities; canonical order is strictly increasing.
        for pair in analysis.output.usage_events.windows(2) {
            assert!(pair[0].identity() != pair[1].identity());
            assert!(pair[0].sort_key() <= pair[1].sort_key());
        }
        for pair in analysis.output.dependency_edges.windows(2) {
            assert!(pair[0].identity() != pair[1].identity());
            assert!(pair[0].sort_key() <= pair[1].sort_key());
        }
    }

    #[test]
    fn test_write_only_rule_fires() {
        let app = r#"
            import { useSetRecoilState } from "recoil";
            import { counterState } from "./state";
            export function Fire() {
                const setCounter = useSetRecoilState(counterState);
                const onClick = () => setCounter(9);
                return null;
            }
        "#;
        let analysis = extended(&[("src/state.ts", COUNTER), ("src/App.tsx", app)]);
        let issues = run_rules(&analysis, &[]);
        let write_only: Vec<&Issue> = issues
            .iter()
            .filter(|i| i.rule() == Rule::WriteOnlyState)
            .collect();
        assert_eq!(write_only.len(), 1);
        // A written state is not read-only.
        assert!(issues.iter().all(|i| i.rule() != Rule::ReadOnlyAtom));
    }
}
