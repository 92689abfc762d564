// src/select/cascade.rs

//! Dependency cascade: which rules fire, and which of their declared
//! dependencies survive into the emitted step.

use std::collections::{HashMap, VecDeque};

use petgraph::Direction;
use petgraph::graphmap::DiGraphMap;
use tracing::{debug, trace};

use crate::errors::{MonodiffError, Result};
use crate::select::patterns::RuleMatcher;
use crate::select::rule::WatchRule;

/// Why a rule ended up in the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerReason {
    /// One of the rule's own patterns matched a changed file.
    Direct,
    /// Only reachable through `depends_on` from a triggered rule.
    Cascade,
}

/// A triggered rule paired with its filtered dependency list.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRule<'a> {
    pub rule: &'a WatchRule,
    pub reason: TriggerReason,
    /// Declared dependencies restricted to triggered keys.
    ///
    /// `None` when nothing survives the filter.
    pub depends_on: Option<Vec<String>>,
}

/// Map each non-empty key to the index of the rule declaring it.
///
/// Two rules sharing a key make dependency resolution ambiguous, so that is
/// the one structural error we reject.
pub fn index_keys(rules: &[WatchRule]) -> Result<HashMap<&str, usize>> {
    let mut owners: HashMap<&str, usize> = HashMap::with_capacity(rules.len());
    for (idx, rule) in rules.iter().enumerate() {
        if let Some(key) = rule.key() {
            if let Some(&first) = owners.get(key) {
                return Err(MonodiffError::DuplicateKey {
                    key: key.to_string(),
                    first,
                    second: idx,
                });
            }
            owners.insert(key, idx);
        }
    }
    Ok(owners)
}

/// Forward propagation graph over rule indices.
///
/// Edge direction: dependency -> dependent. For a rule `D` with
/// `depends_on = ["K"]` we add `owner(K) -> D`, so reaching `K` activates `D`.
/// Rules are nodes by index, which keeps keyless dependents reachable.
/// References to unknown keys add nothing.
pub fn propagation_graph(rules: &[WatchRule], owners: &HashMap<&str, usize>) -> DiGraphMap<usize, ()> {
    let mut graph: DiGraphMap<usize, ()> = DiGraphMap::new();

    for idx in 0..rules.len() {
        graph.add_node(idx);
    }

    for (idx, rule) in rules.iter().enumerate() {
        for dep in rule.depends_on.iter() {
            match owners.get(dep.as_str()) {
                Some(&owner) => {
                    graph.add_edge(owner, idx, ());
                }
                None => trace!(rule = idx, dependency = %dep, "dangling dependency ignored"),
            }
        }
    }

    graph
}

/// Compute every triggered rule, in declared order.
pub fn resolve<'a, S: AsRef<str>>(changed_files: &[S], rules: &'a [WatchRule]) -> Result<Vec<ResolvedRule<'a>>> {
    let owners = index_keys(rules)?;

    let mut reasons: Vec<Option<TriggerReason>> = Vec::with_capacity(rules.len());
    for rule in rules {
        let matcher = RuleMatcher::new(rule.patterns.as_slice())?;
        reasons.push(
            matcher
                .any_match(changed_files)
                .then_some(TriggerReason::Direct),
        );
    }

    let graph = propagation_graph(rules, &owners);
    cascade(&graph, &mut reasons);

    let is_triggered_key = |key: &str| {
        owners
            .get(key)
            .is_some_and(|&owner| reasons[owner].is_some())
    };

    let resolved: Vec<ResolvedRule<'a>> = rules
        .iter()
        .zip(reasons.iter())
        .filter_map(|(rule, reason)| {
            let reason = (*reason)?;
            let deps: Vec<String> = rule
                .depends_on
                .iter()
                .filter(|dep| is_triggered_key(dep.as_str()))
                .cloned()
                .collect();
            Some(ResolvedRule {
                rule,
                reason,
                depends_on: if deps.is_empty() { None } else { Some(deps) },
            })
        })
        .collect();

    debug!(
        rules = rules.len(),
        direct = resolved.iter().filter(|r| r.reason == TriggerReason::Direct).count(),
        cascaded = resolved.iter().filter(|r| r.reason == TriggerReason::Cascade).count(),
        "resolved dependency cascade"
    );

    Ok(resolved)
}

/// Worklist walk from all directly triggered rules to a fixed point.
///
/// Each node is enqueued at most once, so cycles terminate and every member
/// of a cycle fires once any member does.
fn cascade(graph: &DiGraphMap<usize, ()>, reasons: &mut [Option<TriggerReason>]) {
    let mut queue: VecDeque<usize> = reasons
        .iter()
        .enumerate()
        .filter_map(|(idx, r)| r.map(|_| idx))
        .collect();

    while let Some(current) = queue.pop_front() {
        for next in graph.neighbors_directed(current, Direction::Outgoing) {
            if reasons[next].is_none() {
                reasons[next] = Some(TriggerReason::Cascade);
                queue.push_back(next);
            }
        }
    }
}
