#![no_main]

use std::collections::BTreeMap;
use std::ops::ControlFlow;

use libfuzzer_sys::fuzz_target;
use treap::Treap;

fuzz_target!(|data: &[u8]| {
    let mut t: Treap<(u8, u8)> = Treap::new(|a, b| a.0.cmp(&b.0), |a, b| a.1.cmp(&b.1));
    let mut model = BTreeMap::new();

    for chunk in data.chunks_exact(3).take(512) {
        let (op, key, priority) = (chunk[0], chunk[1], chunk[2]);
        match op % 4 {
            0 | 1 => {
                t = t.upsert((key, priority));
                model.insert(key, priority);
            }
            2 => {
                t = t.delete(&(key, 0));
                model.remove(&key);
            }
            _ => {
                if let Some((top, rest)) = t.pop() {
                    model.remove(&top.0);
                    t = rest;
                }
            }
        }
    }

    let mut seen = Vec::new();
    let _ = t.visit_ascend(&(0, 0), |item| {
        seen.push(*item);
        ControlFlow::Continue(())
    });
    let expected: Vec<(u8, u8)> = model.into_iter().collect();
    assert_eq!(seen, expected);
});
