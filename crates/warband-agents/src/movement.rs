//! Paired movement: keep a leader and follower together across rooms.
//!
//! Moves are only issued when both agents can honour them in the same tick,
//! or when the follower catching up is explicitly the goal. Issuing a step
//! to a fatigued follower while the leader walks off is what breaks escort
//! formations, so that combination never happens here.

use tracing::trace;
use warband_types::{ActionResult, Position, TravelOptions};

use crate::actions::Actuator;
use crate::agent::Agent;

/// Stuck tolerance used while the follower catches up.
const CATCH_UP_STUCK_VALUE: u32 = 1;

/// Move a leader/follower pair one tick closer to `target`.
///
/// - Different rooms: the leader advances only when it is not standing on an
///   exit tile, so it does not bounce across the border while waiting; the
///   follower always heads for the leader.
/// - Same room, farther apart than `allowed_range`: only the follower moves,
///   stepping straight off an exit tile if it is on one, otherwise pathing
///   with a short stuck tolerance.
/// - Same room, within range, follower rested: the leader advances; an
///   adjacent follower steps in the leader's direction, a more distant one
///   paths to the leader.
/// - Otherwise (follower fatigued) nobody moves.
///
/// Returns the leader's move result, or `None` if the leader held position.
pub fn pairwise_move(
    leader: &Agent,
    follower: &Agent,
    target: &Position,
    options: &TravelOptions,
    allowed_range: u32,
    actuator: &mut dyn Actuator,
) -> Option<ActionResult> {
    let catch_up = TravelOptions::default().with_stuck_value(CATCH_UP_STUCK_VALUE);

    if !leader.same_room_as(follower) {
        let outcome = if leader.pos().is_edge() {
            trace!(leader = %leader.name, "leader waiting on exit tile");
            None
        } else {
            Some(actuator.travel_to(leader, target, options))
        };
        actuator.travel_to(follower, &leader.pos(), &TravelOptions::default());
        return outcome;
    }

    let range = leader.range_to(&follower.pos());
    if range > allowed_range {
        if follower.pos().is_edge() {
            actuator.move_off_exit_toward(follower, &leader.pos());
        } else {
            actuator.travel_to(follower, &leader.pos(), &catch_up);
        }
        return None;
    }

    if follower.fatigue() > 0 {
        trace!(follower = %follower.name, "follower fatigued, holding formation");
        return None;
    }

    let outcome = actuator.travel_to(leader, target, options);
    if range == 1 {
        if let Some(direction) = follower.pos().direction_to(&leader.pos()) {
            actuator.move_dir(follower, direction);
        }
    } else {
        actuator.travel_to(follower, &leader.pos(), &catch_up);
    }
    Some(outcome)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use warband_types::RoomName;

    use super::*;
    use crate::actions::test_support::*;
    use crate::actions::{Intent, IntentLog};

    fn pair(leader_pos: Position, follower_pos: Position) -> (Agent, Agent) {
        (agent_at(leader_pos, "destroyer"), agent_at(follower_pos, "healer"))
    }

    fn away() -> RoomName {
        RoomName::from_coords(1, 0)
    }

    #[test]
    fn leader_on_edge_waits_for_follower_in_another_room() {
        let (leader, follower) = pair(Position::new(49, 20, home()), Position::new(10, 20, away()));
        let target = Position::new(25, 25, away());
        let mut spy = Spy::default();

        let outcome = pairwise_move(&leader, &follower, &target, &TravelOptions::combat(), 1, &mut spy);
        assert_eq!(outcome, None);
        assert!(spy.calls_for(leader.id).is_empty());
        assert_eq!(spy.calls_for(follower.id), vec!["travel_to"]);
        assert_eq!(spy.destination_of(follower.id), Some(leader.pos()));
    }

    #[test]
    fn leader_off_edge_advances_across_rooms() {
        let (leader, follower) = pair(Position::new(20, 20, home()), Position::new(10, 20, away()));
        let target = Position::new(25, 25, away());
        let mut spy = Spy::default();

        let outcome = pairwise_move(&leader, &follower, &target, &TravelOptions::combat(), 1, &mut spy);
        assert_eq!(outcome, Some(ActionResult::Ok));
        assert_eq!(spy.destination_of(leader.id), Some(target));
        assert_eq!(spy.destination_of(follower.id), Some(leader.pos()));
    }

    #[test]
    fn follower_catches_up_when_too_far() {
        let (leader, follower) = pair(at(20, 20), at(25, 20));
        let mut log = IntentLog::new();

        let outcome = pairwise_move(&leader, &follower, &at(40, 40), &TravelOptions::combat(), 1, &mut log);
        assert_eq!(outcome, None);
        assert!(log.movement_of(leader.id).is_none());
        assert!(matches!(
            log.movement_of(follower.id),
            Some(Intent::Travel { options, .. }) if options.stuck_value == Some(1)
        ));
    }

    #[test]
    fn follower_on_edge_steps_off_toward_leader() {
        let (leader, follower) = pair(at(20, 20), at(0, 20));
        let mut log = IntentLog::new();

        pairwise_move(&leader, &follower, &at(40, 40), &TravelOptions::combat(), 1, &mut log);
        assert!(matches!(log.movement_of(follower.id), Some(Intent::MoveOffExit { .. })));
    }

    #[test]
    fn adjacent_rested_pair_moves_in_formation() {
        let (leader, follower) = pair(at(20, 20), at(19, 20));
        let mut log = IntentLog::new();

        let outcome = pairwise_move(&leader, &follower, &at(40, 20), &TravelOptions::combat(), 1, &mut log);
        assert_eq!(outcome, Some(ActionResult::Ok));
        assert!(matches!(log.movement_of(leader.id), Some(Intent::Travel { .. })));
        assert!(matches!(
            log.movement_of(follower.id),
            Some(Intent::Move { direction: warband_types::Direction::Right, .. })
        ));
    }

    #[test]
    fn fatigued_follower_freezes_the_pair() {
        let (leader, mut follower) = pair(at(20, 20), at(19, 20));
        follower.unit.fatigue = 4;
        let mut spy = Spy::default();

        let outcome = pairwise_move(&leader, &follower, &at(40, 20), &TravelOptions::combat(), 1, &mut spy);
        assert_eq!(outcome, None);
        assert!(spy.calls.is_empty());
    }

    #[test]
    fn wider_allowed_range_paths_the_follower() {
        let (leader, follower) = pair(at(20, 20), at(17, 20));
        let mut log = IntentLog::new();

        let outcome = pairwise_move(&leader, &follower, &at(40, 20), &TravelOptions::combat(), 3, &mut log);
        assert_eq!(outcome, Some(ActionResult::Ok));
        assert!(matches!(log.movement_of(follower.id), Some(Intent::Travel { .. })));
    }
}
