//! The combat toolkit shared by every combat overlord.

use tracing::{debug, warn};
use warband_agents::{
    Actuator, Agent, CombatConfig, Pipeline, RANGED_HEAL_RANGE, closest_hostile,
    closest_hurt_friendly, closest_prioritized_structure, find_partner,
    pairwise_move,
};
use warband_types::{
    ActionResult, ExitSide, MEMORY_VERSION, OverlordMemory, Position, ROOM_MAX_COORD,
    TravelOptions,
};
use warband_world::{
    ATTACK_STRUCTURE_PRIORITIES, Reachability, RoomCoordinates, RoomView, Structure,
    Target, Unit,
};

use crate::directive::Directive;

/// Partner matching, targeting, paired movement, and retreat positioning for
/// a group of agents tied to one directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatOverlord {
    /// Mission anchor.
    pub directive: Directive,
    /// Combat tunables, including the move options used for every move.
    pub config: CombatConfig,
    /// Persisted state (the cached fallback).
    pub memory: OverlordMemory,
}

impl CombatOverlord {
    /// Toolkit for `directive` with the given tunables.
    pub fn new(directive: Directive, config: CombatConfig) -> Self {
        Self {
            directive,
            config,
            memory: OverlordMemory {
                version: MEMORY_VERSION,
                ..OverlordMemory::default()
            },
        }
    }

    /// Move a leader/follower pair toward `target` with this overlord's move
    /// options and allowed range.
    pub fn pairwise_move(
        &self,
        leader: &Agent,
        follower: &Agent,
        target: &Position,
        actuator: &mut dyn Actuator,
    ) -> Option<ActionResult> {
        pairwise_move(
            leader,
            follower,
            target,
            &self.config.move_options,
            self.config.allowed_range,
            actuator,
        )
    }

    /// Find or establish `agent`'s partner within `pool`.
    pub fn find_partner<'a>(&self, agent: &mut Agent, pool: &'a mut [Agent]) -> Option<&'a mut Agent> {
        find_partner(agent, pool, self.config.partner_tolerance)
    }

    /// Closest hostile unit in the agent's room.
    pub fn find_closest_hostile<'a>(
        &self,
        agent: &Agent,
        room: &'a RoomView,
        oracle: &dyn Reachability,
    ) -> Option<&'a Unit> {
        closest_hostile(
            agent,
            room,
            oracle,
            self.config.check_reachable,
            self.config.ignore_edge_hostiles,
        )
    }

    /// Closest hostile structure of the most important type in the room.
    pub fn find_closest_prioritized_structure<'a>(
        &self,
        agent: &Agent,
        room: &'a RoomView,
        oracle: &dyn Reachability,
    ) -> Option<&'a Structure> {
        closest_prioritized_structure(
            agent,
            room,
            ATTACK_STRUCTURE_PRIORITIES,
            oracle,
            self.config.check_reachable,
        )
    }

    /// Closest injured ally, possibly the healer itself.
    pub fn find_closest_hurt_friendly<'a>(&self, healer: &Agent, room: &'a RoomView) -> Option<&'a Unit> {
        closest_hurt_friendly(healer, room)
    }

    /// Approach and heal the closest injured ally, or park when nobody is
    /// hurt.
    ///
    /// Beyond melee range the healer keeps closing in; at range 2-3 it heals
    /// at range while it moves, adjacent it heals directly.
    pub fn medic_actions(
        &self,
        healer: &Agent,
        room: &RoomView,
        actuator: &mut dyn Actuator,
    ) -> ActionResult {
        let Some(patient) = self.find_closest_hurt_friendly(healer, room) else {
            return actuator.park(healer);
        };

        let range = healer.range_to(&patient.pos);
        if range > 1 {
            actuator.travel_to(healer, &patient.pos, &TravelOptions::default().with_moving_target());
        }

        let target = Target::Unit(patient);
        if range <= 1 {
            actuator.heal(healer, &target)
        } else if range <= RANGED_HEAL_RANGE {
            actuator.ranged_heal(healer, &target)
        } else {
            ActionResult::NotInRange
        }
    }

    /// Heal the agent itself if it is hurt and its heal pipeline is still
    /// free this tick.
    pub fn heal_self_if_possible(
        &self,
        agent: &Agent,
        actuator: &mut dyn Actuator,
    ) -> Option<ActionResult> {
        if agent.is_hurt() && actuator.can_execute(agent.id, Pipeline::Melee) {
            Some(actuator.heal(agent, &Target::Unit(&agent.unit)))
        } else {
            None
        }
    }

    /// Attack `target` when adjacent, stepping onto its tile in the same
    /// tick so it cannot simply walk away; otherwise close in.
    ///
    /// Units are chased with the moving-target hint, structures with the
    /// plain move options. Returns [`ActionResult::NotInRange`] while closing
    /// in.
    pub fn attack_and_chase(
        &self,
        agent: &Agent,
        target: &Target<'_>,
        actuator: &mut dyn Actuator,
    ) -> ActionResult {
        let target_pos = target.pos();
        if agent.pos().is_near_to(&target_pos) {
            let result = actuator.attack(agent, target);
            if let Some(direction) = agent.pos().direction_to(&target_pos) {
                actuator.move_dir(agent, direction);
            }
            return result;
        }

        let options = match target {
            Target::Unit(_) => self.config.move_options.with_moving_target(),
            Target::Structure(_) => self.config.move_options,
        };
        actuator.travel_to(agent, &target_pos, &options);
        ActionResult::NotInRange
    }

    /// The retreat position just across the exit nearest the directive.
    ///
    /// Cached in overlord memory for as long as the directive stays put.
    pub fn fallback(&mut self, rooms: &dyn RoomCoordinates) -> Position {
        let anchor = self.directive.pos;
        if self.memory.fallback_anchor == Some(anchor) {
            if let Some(cached) = self.memory.fallback {
                return cached;
            }
        }

        let fallback = fallback_position(&anchor, rooms);
        debug!(directive = %self.directive, %fallback, "fallback computed");
        self.memory.fallback = Some(fallback);
        self.memory.fallback_anchor = Some(anchor);
        fallback
    }
}

/// One tile past the exit nearest to `anchor`, in the neighbouring room.
///
/// The nearest side is the minimum of the four distances to the left, right,
/// top, and bottom edges; ties resolve in that order. If the neighbouring
/// room cannot be resolved, the anchor itself is returned.
pub fn fallback_position(anchor: &Position, rooms: &dyn RoomCoordinates) -> Position {
    let Some(side) = ExitSide::ALL
        .into_iter()
        .min_by_key(|side| anchor.range_to_side(*side))
    else {
        warn!(%anchor, "no exit side to fall back through, holding anchor");
        return *anchor;
    };

    let (dx, dy) = side.room_offset();
    let Some(room) = rooms.relative_room_name(anchor.room, dx, dy) else {
        warn!(%anchor, ?side, "fallback room unresolved, holding anchor");
        return *anchor;
    };

    let just_inside = ROOM_MAX_COORD.saturating_sub(1);
    match side {
        ExitSide::Left => Position::new(just_inside, anchor.y, room),
        ExitSide::Right => Position::new(1, anchor.y, room),
        ExitSide::Top => Position::new(anchor.x, just_inside, room),
        ExitSide::Bottom => Position::new(anchor.x, 1, room),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use warband_agents::{Intent, IntentLog};
    use warband_types::{AgentId, AgentMemory, RoomName, StructureType};
    use warband_world::{Body, WorldGrid};

    use super::*;

    fn home() -> RoomName {
        RoomName::from_coords(0, 0)
    }

    fn at(x: u8, y: u8) -> Position {
        Position::new(x, y, home())
    }

    fn fighter(pos: Position) -> Agent {
        let body = Body {
            attack: 4,
            heal: 2,
            moves: 4,
            ..Body::default()
        };
        Agent::new(
            AgentId::new(),
            "fighter",
            Unit::new(pos, 1000, 1400, body),
            AgentMemory::new("destroyer", "duo"),
        )
    }

    fn toolkit(anchor: Position) -> CombatOverlord {
        CombatOverlord::new(Directive::new("siege", anchor), CombatConfig::default())
    }

    #[test]
    fn fallback_goes_west_from_near_the_left_edge() {
        let fallback = fallback_position(&at(2, 25), &WorldGrid::unbounded());
        assert_eq!(fallback.x, 48);
        assert_eq!(fallback.y, 25);
        assert_eq!(fallback.room, RoomName::from_coords(-1, 0));
        assert!(!fallback.in_same_room(&at(2, 25)));
    }

    #[test]
    fn fallback_picks_the_nearest_side() {
        let grid = WorldGrid::unbounded();
        let right = fallback_position(&at(45, 20), &grid);
        assert_eq!((right.x, right.y, right.room), (1, 20, RoomName::from_coords(1, 0)));
        let top = fallback_position(&at(20, 3), &grid);
        assert_eq!((top.x, top.y, top.room), (20, 48, RoomName::from_coords(0, -1)));
        let bottom = fallback_position(&at(20, 46), &grid);
        assert_eq!((bottom.x, bottom.y, bottom.room), (20, 1, RoomName::from_coords(0, 1)));
    }

    #[test]
    fn fallback_ties_prefer_left_then_right_then_top() {
        let grid = WorldGrid::unbounded();
        // Left and top both at distance 10.
        assert_eq!(fallback_position(&at(10, 10), &grid).room, RoomName::from_coords(-1, 0));
        // Right and bottom both at distance 10.
        assert_eq!(fallback_position(&at(39, 39), &grid).room, RoomName::from_coords(1, 0));
        // Right and top both at distance 19.
        assert_eq!(fallback_position(&at(30, 19), &grid).room, RoomName::from_coords(1, 0));
    }

    #[test]
    fn unresolved_fallback_holds_the_anchor() {
        let grid = WorldGrid::bounded(home(), RoomName::from_coords(3, 3));
        let anchor = at(2, 25);
        assert_eq!(fallback_position(&anchor, &grid), anchor);
    }

    #[test]
    fn fallback_is_cached_until_the_anchor_moves() {
        let mut overlord = toolkit(at(2, 25));
        let first = overlord.fallback(&WorldGrid::unbounded());
        assert_eq!(overlord.memory.fallback, Some(first));

        // A translator that resolves nothing proves the cache is used.
        let nowhere = WorldGrid::bounded(RoomName::from_coords(9, 9), RoomName::from_coords(9, 9));
        assert_eq!(overlord.fallback(&nowhere), first);

        overlord.directive.pos = at(47, 25);
        let moved = overlord.fallback(&WorldGrid::unbounded());
        assert_eq!(moved.room, RoomName::from_coords(1, 0));
    }

    #[test]
    fn medic_parks_when_nobody_is_hurt() {
        let overlord = toolkit(at(25, 25));
        let healer = fighter(at(10, 10));
        let mut room = RoomView::new(home());
        room.allies = vec![healer.unit.clone()];
        let mut log = IntentLog::new();

        assert_eq!(overlord.medic_actions(&healer, &room, &mut log), ActionResult::Ok);
        assert!(matches!(log.movement_of(healer.id), Some(Intent::Park { .. })));
    }

    #[test]
    fn medic_heals_at_range_while_closing_in() {
        let overlord = toolkit(at(25, 25));
        let healer = fighter(at(10, 10));
        let mut patient = Unit::new(at(13, 10), 1000, 1000, Body::default());
        patient.hits = 400;
        let mut room = RoomView::new(home());
        room.allies = vec![healer.unit.clone(), patient.clone()];
        let mut log = IntentLog::new();

        assert_eq!(overlord.medic_actions(&healer, &room, &mut log), ActionResult::Ok);
        assert!(matches!(
            log.movement_of(healer.id),
            Some(Intent::Travel { options, .. }) if options.moving_target
        ));
        assert!(log
            .for_agent(healer.id)
            .any(|intent| matches!(intent, Intent::RangedHeal { target, .. } if *target == patient.id)));
    }

    #[test]
    fn medic_heals_adjacent_patients_directly() {
        let overlord = toolkit(at(25, 25));
        let healer = fighter(at(10, 10));
        let mut patient = Unit::new(at(11, 10), 1000, 1000, Body::default());
        patient.hits = 10;
        let mut room = RoomView::new(home());
        room.allies = vec![patient.clone()];
        let mut log = IntentLog::new();

        assert_eq!(overlord.medic_actions(&healer, &room, &mut log), ActionResult::Ok);
        assert!(log.movement_of(healer.id).is_none());
        assert!(log
            .for_agent(healer.id)
            .any(|intent| matches!(intent, Intent::Heal { .. })));
    }

    #[test]
    fn attack_and_chase_steps_onto_adjacent_targets() {
        let overlord = toolkit(at(25, 25));
        let agent = fighter(at(20, 20));
        let hostile = Unit::new(at(21, 21), 500, 1000, Body::default());
        let mut log = IntentLog::new();

        let result = overlord.attack_and_chase(&agent, &Target::Unit(&hostile), &mut log);
        assert_eq!(result, ActionResult::Ok);
        assert!(matches!(
            log.movement_of(agent.id),
            Some(Intent::Move { direction: warband_types::Direction::BottomRight, .. })
        ));
    }

    #[test]
    fn attack_and_chase_merges_move_options_by_target_kind() {
        let overlord = toolkit(at(25, 25));
        let agent = fighter(at(20, 20));
        let hostile = Unit::new(at(30, 20), 500, 1000, Body::default());
        let tower = Structure::new(StructureType::Tower, at(30, 30), 3000, 3000);

        let mut log = IntentLog::new();
        let result = overlord.attack_and_chase(&agent, &Target::Unit(&hostile), &mut log);
        assert_eq!(result, ActionResult::NotInRange);
        assert!(matches!(
            log.movement_of(agent.id),
            Some(Intent::Travel { options, .. }) if options.moving_target && options.allow_hostile
        ));

        let mut log = IntentLog::new();
        overlord.attack_and_chase(&agent, &Target::Structure(&tower), &mut log);
        assert!(matches!(
            log.movement_of(agent.id),
            Some(Intent::Travel { options, .. }) if !options.moving_target && options.ensure_path
        ));
    }

    #[test]
    fn self_heal_only_when_hurt_and_pipeline_free() {
        let overlord = toolkit(at(25, 25));
        let mut agent = fighter(at(20, 20));
        let mut log = IntentLog::new();
        assert_eq!(overlord.heal_self_if_possible(&agent, &mut log), None);

        agent.unit.hits = 500;
        let hostile = Unit::new(at(21, 20), 500, 1000, Body::default());
        overlord.attack_and_chase(&agent, &Target::Unit(&hostile), &mut log);
        assert_eq!(overlord.heal_self_if_possible(&agent, &mut log), None);

        let mut fresh = IntentLog::new();
        assert_eq!(
            overlord.heal_self_if_possible(&agent, &mut fresh),
            Some(ActionResult::Ok)
        );
    }
}
