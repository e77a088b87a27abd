//! Recursion detection over the static call graph.
//!
//! GLSL ES 1.00 forbids recursion, direct or through other functions. Each
//! back edge found by a depth-first walk is reported at its call site.

use rustc_hash::FxHashMap;
use wgl_diagnostic::ErrorCode;
use wgl_ir::{Name, Span};
use wgl_stack::ensure_sufficient_stack;

use super::{Checker, FunctionKey};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Visit {
    InProgress,
    Done,
}

type CallGraph = FxHashMap<FunctionKey, Vec<(FunctionKey, Span)>>;

fn visit(
    node: FunctionKey,
    graph: &CallGraph,
    state: &mut FxHashMap<FunctionKey, Visit>,
    cycles: &mut Vec<(Name, Span)>,
) {
    ensure_sufficient_stack(|| {
        if state.contains_key(&node) {
            return;
        }
        state.insert(node, Visit::InProgress);
        for &(callee, span) in graph.get(&node).map_or(&[][..], Vec::as_slice) {
            match state.get(&callee) {
                Some(Visit::InProgress) => cycles.push((callee.0, span)),
                Some(Visit::Done) => {}
                None => visit(callee, graph, state, cycles),
            }
        }
        state.insert(node, Visit::Done);
    });
}

impl Checker<'_> {
    pub(crate) fn check_recursion(&mut self) {
        let mut graph = CallGraph::default();
        for edge in &self.calls {
            graph
                .entry(edge.caller)
                .or_default()
                .push((edge.callee, edge.span));
        }

        let mut roots: Vec<FunctionKey> = graph.keys().copied().collect();
        roots.sort_unstable();
        let mut state = FxHashMap::default();
        let mut cycles = Vec::new();
        for root in roots {
            visit(root, &graph, &mut state, &mut cycles);
        }

        for (callee, span) in cycles {
            let message = format!("recursive call to `{}`", self.name_str(callee));
            self.error(ErrorCode::E2024, span, message);
        }
    }
}
