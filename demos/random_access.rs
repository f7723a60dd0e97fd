use std::net::Ipv4Addr;

use lpm_trie::*;

use rand::prelude::*;

fn main() {
    let mut lpm = Lpm::<u32>::new();

    let mut rng = thread_rng();

    for _ in 0..1_000_000 {
        let addr = Ipv4Addr::new(rng.gen(), rng.gen(), 0, 0);
        let len = rng.gen_range(1..=16);

        if rng.gen_bool(0.7) {
            let value: u32 = rng.gen::<u8>() as u32;
            lpm.insert(&addr.octets(), len, value).unwrap();
        } else if rng.gen_bool(0.1) {
            // drop everything, as a full route refresh would
            lpm.clear_family(AddressFamily::Ipv4);
        } else {
            lpm.remove(&addr.octets(), len).unwrap();
        }
        random_lookup(&lpm, &mut rng);
    }
}

fn random_lookup(lpm: &Lpm<u32>, rng: &mut ThreadRng) {
    let addr = Ipv4Addr::from(rng.gen::<u32>());
    std::hint::black_box(lpm.lookup_addr(addr.into()));
}
