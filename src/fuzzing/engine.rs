use std::collections::HashMap;

use super::*;
use itertools::Itertools;

type Ops = Vec<Operation<Cidr, i32>>;

impl Arbitrary for Cidr {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        if bool::arbitrary(g) {
            Cidr::V4(Prefix::arbitrary(g))
        } else {
            Cidr::V6(Prefix::arbitrary(g))
        }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        match self {
            Cidr::V4(p) => Box::new(p.shrink().map(Cidr::V4)),
            Cidr::V6(p) => Box::new(p.shrink().map(Cidr::V6)),
        }
    }
}

/// Apply all operations through the byte-oriented interface.
fn apply(ops: &Ops) -> (Lpm<i32>, HashMap<Cidr, i32>, bool) {
    let mut lpm = Lpm::new();
    let mut hmap = HashMap::new();
    let mut returns_match = true;

    for op in ops {
        match *op {
            Operation::Add(c, t) => {
                let res = lpm.insert(&c.to_bytes(), c.prefix_len(), t);
                returns_match &= res == Ok(hmap.insert(c, t));
            }
            Operation::Remove(c) => {
                let res = lpm.take(&c.to_bytes(), c.prefix_len());
                returns_match &= res == Ok(hmap.remove(&c));
            }
        }
    }
    (lpm, hmap, returns_match)
}

fn split(ops: &Ops) -> (Vec<Operation<Prefix<u32>, i32>>, Vec<Operation<Prefix<u128>, i32>>) {
    let mut v4 = Vec::new();
    let mut v6 = Vec::new();
    for op in ops {
        match *op {
            Operation::Add(Cidr::V4(p), t) => v4.push(Operation::Add(p, t)),
            Operation::Remove(Cidr::V4(p)) => v4.push(Operation::Remove(p)),
            Operation::Add(Cidr::V6(p), t) => v6.push(Operation::Add(p, t)),
            Operation::Remove(Cidr::V6(p)) => v6.push(Operation::Remove(p)),
        }
    }
    (v4, v6)
}

qc!(dual_stack_mods, _dual_stack_mods);
fn _dual_stack_mods(ops: Ops) -> bool {
    let (lpm, hmap, returns_match) = apply(&ops);
    returns_match
        && lpm.len() == hmap.len()
        && lpm.is_empty() == hmap.is_empty()
        && lpm
            .iter()
            .map(|(c, t)| (c, *t))
            .eq(hmap.into_iter().sorted())
}

qc!(dual_stack_lookup, _dual_stack_lookup);
fn _dual_stack_lookup(ops: Ops) -> bool {
    let (lpm, hmap, _) = apply(&ops);
    let (v4_ops, v6_ops) = split(&ops);
    let v4_entries = hmap
        .iter()
        .filter_map(|(c, t)| match c {
            Cidr::V4(p) => Some((p, t)),
            Cidr::V6(_) => None,
        })
        .collect::<Vec<_>>();
    let v6_entries = hmap
        .iter()
        .filter_map(|(c, t)| match c {
            Cidr::V6(p) => Some((p, t)),
            Cidr::V4(_) => None,
        })
        .collect::<Vec<_>>();

    query_addrs(&v4_ops).into_iter().all(|a| {
        lpm.lookup(&a.to_be_bytes()) == Ok(reference_lpm(v4_entries.iter().copied(), a))
    }) && query_addrs(&v6_ops).into_iter().all(|a| {
        lpm.lookup(&a.to_be_bytes()) == Ok(reference_lpm(v6_entries.iter().copied(), a))
    })
}

qc!(exact_match, _exact_match);
fn _exact_match(ops: Ops) -> bool {
    let (lpm, hmap, _) = apply(&ops);
    ops.iter().all(|op| {
        let c = match op {
            Operation::Add(c, _) | Operation::Remove(c) => c,
        };
        lpm.lookup_prefix(&c.to_bytes(), c.prefix_len()) == Ok(hmap.get(c))
            && lpm.lookup_cidr(c) == hmap.get(c)
    })
}

qc!(clear_family, _clear_family);
fn _clear_family((ops, v4): (Ops, bool)) -> bool {
    let (mut lpm, hmap, _) = apply(&ops);
    let family = if v4 {
        AddressFamily::Ipv4
    } else {
        AddressFamily::Ipv6
    };
    lpm.clear_family(family);
    lpm.iter()
        .map(|(c, t)| (c, *t))
        .eq(hmap.into_iter().filter(|(c, _)| c.family() != family).sorted())
}

qc!(clear_with, _clear_with);
fn _clear_with(ops: Ops) -> bool {
    let (mut lpm, hmap, _) = apply(&ops);
    let mut seen = Vec::new();
    lpm.clear_with(|c, t| seen.push((c, t)));
    lpm.is_empty() && lpm.len() == 0 && seen.into_iter().eq(hmap.into_iter().sorted())
}

// rejected calls never modify the table.
qc!(invalid_input, _invalid_input);
fn _invalid_input((ops, bytes, len): (Ops, Vec<u8>, u8)) -> bool {
    let (mut lpm, _, _) = apply(&ops);
    let before = lpm.clone();

    let ok = match bytes.len() {
        4 | 16 => {
            let width = bytes.len() as u32 * 8;
            if len as u32 > width {
                let err = Error::InvalidPrefixLength {
                    len: len.into(),
                    width: width as u8,
                };
                lpm.insert(&bytes, len, 0) == Err(err)
                    && lpm.remove(&bytes, len) == Err(err)
                    && lpm.lookup_prefix(&bytes, len) == Err(err)
            } else {
                true
            }
        }
        n => {
            let err = Error::InvalidAddressLength { len: n };
            lpm.insert(&bytes, len, 0) == Err(err)
                && lpm.remove(&bytes, len) == Err(err)
                && lpm.lookup(&bytes) == Err(err)
        }
    };
    ok && lpm == before
}
