//! Tie-Break Tests
//!
//! Equal virtual times are broken by declaration order, and the winner's
//! accrual breaks the tie for the next round. Four identical groups
//! produce a stable, repeating service order.

use crate::scheduler::{ContextId, GroupConfig, GroupId};

use super::{new_sched, step};

#[test]
fn test_declaration_order_breaks_ties() {
    let groups = [
        GroupConfig::new("g0", 1, 0),
        GroupConfig::new("g1", 1, 0),
        GroupConfig::new("g2", 1, 0),
        GroupConfig::new("g3", 1, 0),
    ];
    let mut sched = new_sched(&groups);
    let mut ids = [ContextId::IDLE; 4];
    for (index, id) in ids.iter_mut().enumerate() {
        *id = sched.add_context(GroupId::new(index)).unwrap();
    }
    for id in ids {
        sched.ready(id);
    }

    // Hand-checked service order. The first three slices go to g0..g2 at
    // vtime 0; g3 then runs alone at the bottom and earns a longer slice
    // (gap 500 to everyone else), after which the cycle restarts.
    let table = [
        (0, 0, 500),
        (500, 1, 1000),
        (1000, 2, 1500),
        (1500, 3, 2500),
        (2500, 0, 3000),
        (3000, 1, 3500),
        (3500, 2, 4500),
        (4500, 0, 5000),
        (5000, 1, 5500),
    ];
    for (now, winner, deadline) in table {
        step(&mut sched, now, ids[winner], deadline);
    }

    let final_vtimes: Vec<i64> = (0..4)
        .map(|index| sched.group(GroupId::new(index)).unwrap().vtime())
        .collect();
    assert_eq!(final_vtimes, vec![1500, 1000, 1500, 1000]);

    for (index, id) in ids.into_iter().enumerate() {
        let group = sched.group(GroupId::new(index)).unwrap();
        assert_eq!(
            sched.context(id).unwrap().vtime(),
            group.min_vtime(),
            "sole ready member defines the group minimum"
        );
    }
}

#[test]
fn test_first_update_prefers_lowest_group_index() {
    let groups = [
        GroupConfig::new("left", 1, 0),
        GroupConfig::new("right", 1, 0),
    ];
    let mut sched = new_sched(&groups);
    let left = sched.add_context(GroupId::new(0)).unwrap();
    let right = sched.add_context(GroupId::new(1)).unwrap();

    // Readying in reverse order must not matter; only group declaration
    // order does.
    sched.ready(right);
    sched.ready(left);
    step(&mut sched, 0, left, 500);
}
