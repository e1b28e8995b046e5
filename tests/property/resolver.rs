use std::collections::{HashMap, HashSet};

use petgraph::algo::{is_cyclic_directed, tarjan_scc};
use petgraph::graphmap::DiGraphMap;
use petgraph::visit::Dfs;
use proptest::prelude::*;
use stabledag::{DependencyGraph, ResolveError};

/// One `add` call: element index plus dependency indices.
type Row = (usize, Vec<usize>);

// Rows over `num` elements. Every element is added at least once (in a
// shuffled order at the end), so no dependency is ever unknown.
fn rows_strategy(max_elements: usize, acyclic: bool) -> impl Strategy<Value = (usize, Vec<Row>)> {
    (1..=max_elements).prop_flat_map(move |num| {
        let row = (0..num, proptest::collection::vec(0..num, 0..4)).prop_map(move |(name, deps)| {
            let deps = if acyclic {
                // Only depend on lower indices.
                deps.into_iter().filter(|&d| d < name).collect()
            } else {
                deps
            };
            (name, deps)
        });
        let tail = Just((0..num).collect::<Vec<_>>()).prop_shuffle();

        (proptest::collection::vec(row, 0..25), tail).prop_map(move |(mut rows, tail)| {
            rows.extend(tail.into_iter().map(|name| (name, Vec::new())));
            (num, rows)
        })
    })
}

fn build(rows: &[Row]) -> DependencyGraph<usize> {
    let mut graph = DependencyGraph::new();
    for (name, deps) in rows {
        graph.add(*name, deps.iter().copied());
    }
    graph
}

/// Edges point from a dependency to the element depending on it.
fn digraph(rows: &[Row]) -> DiGraphMap<usize, ()> {
    let mut g: DiGraphMap<usize, ()> = DiGraphMap::new();
    for (name, deps) in rows {
        g.add_node(*name);
        for dep in deps {
            g.add_edge(*dep, *name, ());
        }
    }
    g
}

fn has_cycle(rows: &[Row]) -> bool {
    is_cyclic_directed(&digraph(rows))
}

/// Elements that can never be freed: members of a cycle (including
/// self-dependencies) and everything depending on them, transitively.
fn stuck_elements(rows: &[Row]) -> HashSet<usize> {
    let g = digraph(rows);
    let mut dfs = Dfs::empty(&g);
    let mut stuck = HashSet::new();

    for scc in tarjan_scc(&g) {
        let cyclic = scc.len() > 1 || g.contains_edge(scc[0], scc[0]);
        if !cyclic {
            continue;
        }
        for start in scc {
            dfs.move_to(start);
            while let Some(node) = dfs.next(&g) {
                stuck.insert(node);
            }
        }
    }

    stuck
}

/// Forward-scan resolution on a plain working copy of the edge list.
///
/// After producing an element, every later element is checked for a
/// dependency on it; an element whose count drops to zero is swapped to the
/// end of the free prefix. Returns the produced elements and whether some
/// elements were never freed.
fn scan_model(rows: &[Row]) -> (Vec<usize>, bool) {
    let mut edges: Vec<usize> = Vec::new();
    let mut deps: HashMap<usize, HashSet<usize>> = HashMap::new();
    for (name, row_deps) in rows {
        if !deps.contains_key(name) {
            edges.push(*name);
        }
        deps.entry(*name).or_default().extend(row_deps.iter().copied());
    }

    let mut refcounts: HashMap<usize, usize> =
        edges.iter().map(|e| (*e, deps[e].len())).collect();

    let mut fmax = 0;
    for i in 0..edges.len() {
        if deps[&edges[i]].is_empty() {
            edges.swap(fmax, i);
            fmax += 1;
        }
    }

    let mut produced = Vec::new();
    let mut fcur = 0;
    while fcur < fmax {
        let this = edges[fcur];
        produced.push(this);

        for i in fcur + 1..edges.len() {
            if deps[&edges[i]].contains(&this) {
                let count = refcounts.get_mut(&edges[i]).expect("count per element");
                *count -= 1;
                if *count == 0 {
                    edges.swap(fmax, i);
                    fmax += 1;
                }
            }
        }
        fcur += 1;
    }

    (produced, fmax != edges.len())
}

proptest! {
    #[test]
    fn successful_orders_are_total_and_topological((num, rows) in rows_strategy(10, false)) {
        let graph = build(&rows);

        match graph.resolve() {
            Ok(order) => {
                prop_assert!(!has_cycle(&rows));
                prop_assert_eq!(order.len(), num);

                let unique: HashSet<_> = order.iter().collect();
                prop_assert_eq!(unique.len(), num);

                let pos: HashMap<usize, usize> =
                    order.iter().enumerate().map(|(i, e)| (*e, i)).collect();
                for (name, deps) in &rows {
                    for dep in deps {
                        prop_assert!(pos[dep] < pos[name], "{} must precede {}", dep, name);
                    }
                }
            }
            Err(err) => {
                prop_assert_eq!(err, ResolveError::CircularDependency);
                prop_assert!(has_cycle(&rows));
            }
        }
    }

    #[test]
    fn acyclic_graphs_always_resolve((_num, rows) in rows_strategy(10, true)) {
        prop_assert!(build(&rows).resolve().is_ok());
    }

    #[test]
    fn repeating_every_add_changes_nothing((_num, rows) in rows_strategy(8, false)) {
        let once = build(&rows).resolve();

        let mut doubled = rows.clone();
        doubled.extend(rows.iter().cloned());
        prop_assert_eq!(once, build(&doubled).resolve());
    }

    #[test]
    fn split_adds_match_merged_adds((_num, rows) in rows_strategy(8, false)) {
        // Merge all rows for the same element into one add, at the position of
        // its first appearance.
        let mut first_seen: Vec<usize> = Vec::new();
        let mut merged: HashMap<usize, Vec<usize>> = HashMap::new();
        for (name, deps) in &rows {
            if !merged.contains_key(name) {
                first_seen.push(*name);
            }
            merged.entry(*name).or_default().extend(deps.iter().copied());
        }
        let merged_rows: Vec<Row> = first_seen
            .into_iter()
            .map(|name| (name, merged.remove(&name).unwrap_or_default()))
            .collect();

        prop_assert_eq!(build(&rows).resolve(), build(&merged_rows).resolve());
    }

    #[test]
    fn edgeless_graphs_keep_insertion_order(names in proptest::collection::vec(0..50usize, 0..20)) {
        let mut graph = DependencyGraph::new();
        let mut expected = Vec::new();
        for name in names {
            if !graph.contains(&name) {
                expected.push(name);
            }
            graph.add(name, []);
        }

        prop_assert_eq!(graph.resolve(), Ok(expected));
    }

    #[test]
    fn order_matches_forward_scan((_num, rows) in rows_strategy(13, false)) {
        let graph = build(&rows);
        let (expected, stuck) = scan_model(&rows);

        let mut produced = Vec::new();
        let mut errors = Vec::new();
        for item in graph.resolve_iter() {
            match item {
                Ok(element) => produced.push(*element),
                Err(err) => errors.push(err),
            }
        }

        prop_assert_eq!(&produced, &expected);
        if stuck {
            prop_assert_eq!(errors, vec![ResolveError::CircularDependency]);
        } else {
            prop_assert!(errors.is_empty());
        }
    }

    #[test]
    fn cycle_error_comes_only_after_every_freeable_element(
        (num, rows) in rows_strategy(10, false),
        take in 0..12usize,
    ) {
        let graph = build(&rows);
        let stuck = stuck_elements(&rows);
        let freeable = num - stuck.len();
        let (expected, _) = scan_model(&rows);

        let items: Vec<_> = graph.resolve_iter().collect();
        for (i, item) in items.iter().enumerate().take(freeable) {
            prop_assert_eq!(item, &Ok(&expected[i]));
        }
        if stuck.is_empty() {
            prop_assert_eq!(items.len(), num);
        } else {
            prop_assert_eq!(items.len(), freeable + 1);
            prop_assert_eq!(&items[freeable], &Err(ResolveError::CircularDependency));
        }

        // Stopping anywhere up to the cycle never sees an error.
        let k = take.min(freeable);
        let prefix: Vec<_> = graph.resolve_iter().take(k).collect();
        prop_assert_eq!(prefix.len(), k);
        for (i, item) in prefix.iter().enumerate() {
            prop_assert_eq!(item, &Ok(&expected[i]));
        }
    }
}
