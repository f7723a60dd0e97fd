use std::collections::HashMap;

use super::*;
use itertools::Itertools;

type Ops = Vec<Operation<Prefix<u32>, i32>>;
type Ops6 = Vec<Operation<Prefix<u128>, i32>>;

fn apply<A: Address>(
    ops: Vec<Operation<Prefix<A>, i32>>,
) -> (PrefixTrie<A, i32>, HashMap<Prefix<A>, i32>, bool) {
    let mut trie = PrefixTrie::new();
    let mut hmap = HashMap::new();
    let mut returns_match = true;

    for op in ops {
        match op {
            Operation::Add(p, t) => {
                returns_match &= trie.insert(p, t).unwrap() == hmap.insert(p, t);
            }
            Operation::Remove(p) => {
                returns_match &= trie.take(&p) == hmap.remove(&p);
            }
        }
    }
    (trie, hmap, returns_match)
}

qc!(new, _new);
fn _new(list: Vec<(Prefix<u32>, i32)>) -> bool {
    let mut trie = PrefixTrie::new();
    let mut hmap = HashMap::new();

    for (p, t) in list {
        trie.insert(p, t).unwrap();
        hmap.insert(p, t);
    }

    // assert that the iterator of both is the same
    trie.len() == hmap.len() && trie.into_iter().eq(hmap.into_iter().sorted())
}

qc!(new_mods, _new_mods);
fn _new_mods(ops: Ops) -> bool {
    let (trie, hmap, returns_match) = apply(ops);
    returns_match && trie.len() == hmap.len() && trie.into_iter().eq(hmap.into_iter().sorted())
}

qc!(new_mods_ipv6, _new_mods_ipv6);
fn _new_mods_ipv6(ops: Ops6) -> bool {
    let (trie, hmap, returns_match) = apply(ops);
    returns_match && trie.len() == hmap.len() && trie.into_iter().eq(hmap.into_iter().sorted())
}

qc!(exact_match, _exact_match);
fn _exact_match(ops: Ops) -> bool {
    let queries = ops
        .iter()
        .map(|op| match op {
            Operation::Add(p, _) | Operation::Remove(p) => *p,
        })
        .collect::<Vec<_>>();
    let (trie, hmap, _) = apply(ops);
    queries.iter().all(|p| {
        trie.lookup_prefix(p) == hmap.get(p) && trie.contains_prefix(p) == hmap.contains_key(p)
    })
}

qc!(longest_match, _longest_match);
fn _longest_match(ops: Ops) -> bool {
    let queries = query_addrs(&ops);
    let (trie, hmap, _) = apply(ops);
    queries
        .into_iter()
        .all(|addr| trie.lookup(addr) == reference_lpm(&hmap, addr))
}

qc!(longest_match_ipv6, _longest_match_ipv6);
fn _longest_match_ipv6(ops: Ops6) -> bool {
    let queries = query_addrs(&ops);
    let (trie, hmap, _) = apply(ops);
    queries
        .into_iter()
        .all(|addr| trie.lookup(addr) == reference_lpm(&hmap, addr))
}

qc!(longest_match_prefix, _longest_match_prefix);
fn _longest_match_prefix((ops, queries): (Ops, Vec<Prefix<u32>>)) -> bool {
    let (trie, hmap, _) = apply(ops);
    queries.iter().all(|q| {
        let want = hmap
            .iter()
            .filter(|(p, _)| p.contains(q))
            .max_by_key(|(p, _)| p.prefix_len());
        trie.longest_match(q) == want
    })
}

// after removals, the tree must look exactly as if the removed prefixes were never inserted.
qc!(remove_reverts_insert, _remove_reverts_insert);
fn _remove_reverts_insert(ops: Ops) -> bool {
    let (trie, hmap, _) = apply(ops);
    let fresh: PrefixTrie<u32, i32> = hmap.into_iter().collect();
    trie.node_count() == fresh.node_count() && format!("{trie:?}") == format!("{fresh:?}")
}

// every node except the root either stores a value or branches.
qc!(minimal, _minimal);
fn _minimal(ops: Ops6) -> bool {
    let (trie, _, _) = apply(ops);
    let mut nodes = vec![crate::arena::Handle::ROOT];
    let mut ok = true;
    while let Some(idx) = nodes.pop() {
        let node = &trie.arena[idx];
        let children = [node.left, node.right].into_iter().flatten().collect::<Vec<_>>();
        if idx != crate::arena::Handle::ROOT {
            ok &= node.value.is_some() || children.len() == 2;
        }
        for child in &children {
            let child_p = &trie.arena[*child].prefix;
            ok &= node.prefix.contains(child_p) && node.prefix != *child_p;
            ok &= child_p.bit(node.prefix.prefix_len()) == (Some(*child) == node.right);
        }
        nodes.extend(children);
    }
    ok
}

qc!(clear_with, _clear_with);
fn _clear_with(ops: Ops) -> bool {
    let (mut trie, hmap, _) = apply(ops);
    let mut seen = Vec::new();
    trie.clear_with(|p, v| seen.push((p, v)));
    trie.is_empty()
        && trie.node_count() == 1
        && seen.into_iter().eq(hmap.into_iter().sorted())
}

qc!(equality, _equality);
fn _equality(ops: Ops) -> bool {
    let (trie, _, _) = apply(ops);
    let clone = trie.clone().into_iter().collect::<PrefixTrie<_, _>>();
    trie == clone && trie.len() == clone.len() && trie.is_empty() == clone.is_empty()
}
