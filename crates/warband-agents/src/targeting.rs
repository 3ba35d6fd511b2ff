//! Target acquisition: stateless queries over a room's contents.
//!
//! Every query returns `None` when nothing qualifies. Callers treat that as
//! "idle or park", never as a fault.
//!
//! Queries come in two flavours. The raw flavour returns the nearest
//! candidate by range, which is cheap. The reachable flavour sorts candidates
//! by range and asks the [`Reachability`] oracle about each in turn, which is
//! much more expensive and only worth it when walking toward an unreachable
//! target would be costly.

use warband_types::{Position, StructureType};
use warband_world::{HasPosition, Reachability, RoomView, Structure, Unit, closest_by_range};

use crate::agent::Agent;

/// The closest candidate to `from` that the oracle says can be reached.
pub fn closest_reachable<'a, T, I>(
    from: &Position,
    candidates: I,
    oracle: &dyn Reachability,
) -> Option<&'a T>
where
    T: HasPosition + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut by_range: Vec<&T> = candidates.into_iter().collect();
    // Stable sort keeps snapshot order among equally distant candidates.
    by_range.sort_by_key(|candidate| from.range_to(&candidate.pos()));
    by_range
        .into_iter()
        .find(|candidate| oracle.is_reachable(from, &candidate.pos()))
}

/// The closest hostile unit in the agent's room.
///
/// With `ignore_edge_hostiles`, hostiles on exit tiles are skipped: they are
/// usually unreachable or about to leave.
pub fn closest_hostile<'a>(
    agent: &Agent,
    room: &'a RoomView,
    oracle: &dyn Reachability,
    check_reachable: bool,
    ignore_edge_hostiles: bool,
) -> Option<&'a Unit> {
    let candidates = room
        .hostiles
        .iter()
        .filter(|hostile| !ignore_edge_hostiles || !hostile.pos.is_edge());

    if check_reachable {
        closest_reachable(&agent.pos(), candidates, oracle)
    } else {
        closest_by_range(&agent.pos(), candidates)
    }
}

/// The closest hostile structure of the most important type present.
///
/// `table` is walked in order. The first type with at least one candidate
/// wins; types without candidates are skipped. When reachability is checked,
/// a type whose candidates are all unreachable counts as having none.
pub fn closest_prioritized_structure<'a>(
    agent: &Agent,
    room: &'a RoomView,
    table: &[StructureType],
    oracle: &dyn Reachability,
    check_reachable: bool,
) -> Option<&'a Structure> {
    let pos = agent.pos();
    for structure_type in table {
        let mut candidates = room
            .hostile_structures
            .iter()
            .filter(|s| s.structure_type == *structure_type)
            .peekable();
        if candidates.peek().is_none() {
            continue;
        }
        if check_reachable {
            if let Some(found) = closest_reachable(&pos, candidates, oracle) {
                return Some(found);
            }
        } else {
            return closest_by_range(&pos, candidates);
        }
    }
    None
}

/// The closest allied unit below full hits, possibly the agent itself.
pub fn closest_hurt_friendly<'a>(agent: &Agent, room: &'a RoomView) -> Option<&'a Unit> {
    closest_by_range(&agent.pos(), room.allies.iter().filter(|ally| ally.is_hurt()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use warband_world::{ATTACK_STRUCTURE_PRIORITIES, Body, OpenTerrain, SealedTiles};

    use super::*;
    use crate::actions::test_support::*;

    fn hostile(x: u8, y: u8) -> Unit {
        Unit::new(at(x, y), 1000, 1000, fighter())
    }

    fn hostile_structure(structure_type: StructureType, x: u8, y: u8) -> Structure {
        Structure::new(structure_type, at(x, y), 1000, 1000)
    }

    #[test]
    fn nothing_to_find_is_none() {
        let agent = agent_at(at(25, 25), "guard");
        let room = RoomView::new(home());
        assert!(closest_hostile(&agent, &room, &OpenTerrain, false, true).is_none());
        assert!(closest_hostile(&agent, &room, &OpenTerrain, true, true).is_none());
        assert!(
            closest_prioritized_structure(
                &agent,
                &room,
                ATTACK_STRUCTURE_PRIORITIES,
                &OpenTerrain,
                false
            )
            .is_none()
        );
        assert!(closest_hurt_friendly(&agent, &room).is_none());
    }

    #[test]
    fn edge_hostiles_are_ignored_on_request() {
        let agent = agent_at(at(2, 25), "guard");
        let mut room = RoomView::new(home());
        let on_edge = hostile(0, 25);
        let inside = hostile(10, 25);
        room.hostiles = vec![on_edge.clone(), inside.clone()];

        let found = closest_hostile(&agent, &room, &OpenTerrain, false, true).unwrap();
        assert_eq!(found.id, inside.id);
        let found = closest_hostile(&agent, &room, &OpenTerrain, false, false).unwrap();
        assert_eq!(found.id, on_edge.id);
    }

    #[test]
    fn reachable_search_skips_sealed_hostiles() {
        let agent = agent_at(at(25, 25), "guard");
        let mut room = RoomView::new(home());
        let sealed = hostile(26, 25);
        let open = hostile(30, 25);
        room.hostiles = vec![sealed.clone(), open.clone()];
        let terrain: SealedTiles = [sealed.pos].into_iter().collect();

        let raw = closest_hostile(&agent, &room, &terrain, false, true).unwrap();
        assert_eq!(raw.id, sealed.id);
        let reachable = closest_hostile(&agent, &room, &terrain, true, true).unwrap();
        assert_eq!(reachable.id, open.id);
    }

    #[test]
    fn table_order_beats_distance() {
        let agent = agent_at(at(25, 25), "destroyer");
        let mut room = RoomView::new(home());
        let near_extension = hostile_structure(StructureType::Extension, 26, 25);
        let far_tower = hostile_structure(StructureType::Tower, 45, 45);
        let farther_tower = hostile_structure(StructureType::Tower, 47, 47);
        room.hostile_structures = vec![near_extension, farther_tower, far_tower.clone()];

        let found = closest_prioritized_structure(
            &agent,
            &room,
            ATTACK_STRUCTURE_PRIORITIES,
            &OpenTerrain,
            false,
        )
        .unwrap();
        assert_eq!(found.id, far_tower.id);
    }

    #[test]
    fn unreachable_types_fall_through_when_checking() {
        let agent = agent_at(at(25, 25), "destroyer");
        let mut room = RoomView::new(home());
        let walled_spawn = hostile_structure(StructureType::Spawn, 40, 40);
        let tower = hostile_structure(StructureType::Tower, 30, 30);
        room.hostile_structures = vec![walled_spawn.clone(), tower.clone()];
        let terrain: SealedTiles = [walled_spawn.pos].into_iter().collect();

        let raw = closest_prioritized_structure(
            &agent,
            &room,
            ATTACK_STRUCTURE_PRIORITIES,
            &terrain,
            false,
        )
        .unwrap();
        assert_eq!(raw.id, walled_spawn.id);

        let reachable = closest_prioritized_structure(
            &agent,
            &room,
            ATTACK_STRUCTURE_PRIORITIES,
            &terrain,
            true,
        )
        .unwrap();
        assert_eq!(reachable.id, tower.id);
    }

    #[test]
    fn hurt_friendly_is_the_nearest_injured_ally() {
        let medic = agent_at(at(10, 10), "healer");
        let mut room = RoomView::new(home());
        let healthy = Unit::new(at(11, 10), 100, 1000, Body::default());
        let mut hurt_far = Unit::new(at(20, 10), 100, 1000, Body::default());
        hurt_far.hits = 10;
        let mut hurt_near = Unit::new(at(14, 10), 100, 1000, Body::default());
        hurt_near.hits = 90;
        room.allies = vec![healthy, hurt_far, hurt_near.clone()];

        assert_eq!(closest_hurt_friendly(&medic, &room).map(|u| u.id), Some(hurt_near.id));
    }
}
