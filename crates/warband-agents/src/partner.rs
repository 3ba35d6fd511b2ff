//! Partner matching: persistent 1:1 pairing between two agents.
//!
//! A partner link lives in memory as two back-references, `a.partner = b`
//! and `b.partner = a`. Links are only ever written both sides at once, in
//! the same call, so no other match attempt in the same tick can observe a
//! half-written link.
//!
//! Selection is a single greedy pass (closest remaining lifetime wins), not a
//! globally optimal matching across the pool.

use tracing::{debug, warn};

use crate::agent::Agent;

/// Find (or establish) `agent`'s partner within `pool`.
///
/// 1. A stored partner found in the pool is returned as is. A stored partner
///    missing from the pool is a stale link: it is cleared and the search is
///    retried once.
/// 2. A pool member whose own memory names `agent` re-establishes the link.
/// 3. Otherwise the unpartnered, fully spawned pool member whose remaining
///    lifetime is closest to `agent`'s (and within `tolerance` ticks) is
///    linked. Ties go to the earliest in pool order.
///
/// Returns `None` when nobody qualifies; the caller retries on a later tick.
pub fn find_partner<'a>(
    agent: &mut Agent,
    pool: &'a mut [Agent],
    tolerance: u32,
) -> Option<&'a mut Agent> {
    find_partner_inner(agent, pool, tolerance, true)
}

fn find_partner_inner<'a>(
    agent: &mut Agent,
    pool: &'a mut [Agent],
    tolerance: u32,
    retry_stale: bool,
) -> Option<&'a mut Agent> {
    if let Some(partner_id) = agent.memory.partner {
        if let Some(index) = pool.iter().position(|p| p.id == partner_id) {
            return pool.get_mut(index);
        }
        warn!(agent = %agent.name, partner = %partner_id, "partner gone, clearing stale link");
        agent.memory.partner = None;
        if !retry_stale {
            return None;
        }
        return find_partner_inner(agent, pool, tolerance, false);
    }

    let index = pool
        .iter()
        .position(|p| p.id != agent.id && p.memory.partner == Some(agent.id))
        .or_else(|| closest_lifetime(agent, pool, tolerance))?;
    let partner = pool.get_mut(index)?;

    agent.memory.partner = Some(partner.id);
    partner.memory.partner = Some(agent.id);
    debug!(agent = %agent.name, partner = %partner.name, "partner link established");
    Some(partner)
}

/// Index of the free candidate with the closest remaining lifetime.
fn closest_lifetime(agent: &Agent, pool: &[Agent], tolerance: u32) -> Option<usize> {
    let own = agent.ticks_to_live()?;
    pool.iter()
        .enumerate()
        .filter(|(_, candidate)| {
            candidate.id != agent.id && candidate.memory.partner.is_none() && !candidate.is_spawning()
        })
        .filter_map(|(index, candidate)| {
            let diff = candidate.ticks_to_live()?.abs_diff(own);
            (diff <= tolerance).then_some((index, diff))
        })
        .min_by_key(|(_, diff)| *diff)
        .map(|(index, _)| index)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use warband_types::AgentId;

    use super::*;
    use crate::actions::test_support::*;

    fn linked(a: &Agent, b: &Agent) -> bool {
        a.memory.partner == Some(b.id) && b.memory.partner == Some(a.id)
    }

    #[test]
    fn pairs_two_fresh_agents_symmetrically() {
        let mut a = agent_with_ttl("destroyer", 800);
        let mut pool = vec![agent_with_ttl("healer", 750)];
        let b_id = pool.first().unwrap().id;

        let partner = find_partner(&mut a, &mut pool, 600).map(|p| p.id);
        assert_eq!(partner, Some(b_id));
        assert!(linked(&a, pool.first().unwrap()));
    }

    #[test]
    fn repeated_calls_return_the_same_partner() {
        let mut a = agent_with_ttl("destroyer", 800);
        let mut pool = vec![agent_with_ttl("healer", 700), agent_with_ttl("healer", 790)];

        let first = find_partner(&mut a, &mut pool, 600).map(|p| p.id);
        for _ in 0..3 {
            assert_eq!(find_partner(&mut a, &mut pool, 600).map(|p| p.id), first);
        }
        let linked_count = pool.iter().filter(|p| p.memory.partner == Some(a.id)).count();
        assert_eq!(linked_count, 1);
    }

    #[test]
    fn closest_lifetime_wins_and_ties_keep_pool_order() {
        let mut a = agent_with_ttl("destroyer", 1000);
        let mut pool = vec![
            agent_with_ttl("healer", 500),
            agent_with_ttl("healer", 1050),
            agent_with_ttl("healer", 950),
        ];
        let expected = pool.get(1).unwrap().id;
        assert_eq!(find_partner(&mut a, &mut pool, 600).map(|p| p.id), Some(expected));
    }

    #[test]
    fn candidates_outside_tolerance_or_spawning_or_taken_are_skipped() {
        let mut a = agent_with_ttl("destroyer", 1400);
        let too_young = agent_with_ttl("healer", 100);
        let mut spawning = agent_with_ttl("healer", 1400);
        spawning.unit.spawning = true;
        let mut taken = agent_with_ttl("healer", 1400);
        taken.memory.partner = Some(AgentId::new());
        let mut pool = vec![too_young, spawning, taken];

        assert!(find_partner(&mut a, &mut pool, 600).is_none());
        assert!(a.memory.partner.is_none());
        assert!(pool.first().unwrap().memory.partner.is_none());
    }

    #[test]
    fn forgotten_link_is_recovered() {
        let mut a = agent_with_ttl("destroyer", 800);
        let mut b = agent_with_ttl("healer", 100);
        b.memory.partner = Some(a.id);
        let mut pool = vec![agent_with_ttl("healer", 800), b];
        let b_id = pool.get(1).unwrap().id;

        assert_eq!(find_partner(&mut a, &mut pool, 600).map(|p| p.id), Some(b_id));
        assert_eq!(a.memory.partner, Some(b_id));
    }

    #[test]
    fn stale_partner_is_cleared_and_replaced() {
        let mut a = agent_with_ttl("destroyer", 800);
        a.memory.partner = Some(AgentId::new());
        let mut pool = vec![agent_with_ttl("healer", 750)];
        let b_id = pool.first().unwrap().id;

        assert_eq!(find_partner(&mut a, &mut pool, 600).map(|p| p.id), Some(b_id));
        assert!(linked(&a, pool.first().unwrap()));
    }

    #[test]
    fn stale_partner_with_empty_pool_clears_link() {
        let mut a = agent_with_ttl("destroyer", 800);
        a.memory.partner = Some(AgentId::new());
        let mut pool: Vec<Agent> = Vec::new();

        assert!(find_partner(&mut a, &mut pool, 600).is_none());
        assert!(a.memory.partner.is_none());
    }

    #[test]
    fn spawning_agent_does_not_pick_a_partner() {
        let mut a = agent_with_ttl("destroyer", 800);
        a.unit.ticks_to_live = None;
        let mut pool = vec![agent_with_ttl("healer", 750)];
        assert!(find_partner(&mut a, &mut pool, 600).is_none());
    }
}
