/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::DispatchConfig;
use crate::shared::structs::{DIRN_DOWN, DIRN_UP, SPEED_MOVE, SPEED_STOP};
use crate::shared::{Command, CommandSet, Elevator, Request};

/**
 * Per-turn dispatch decision engine.
 *
 * The engine is a pure function of one turn's snapshot: it receives the
 * elevators (already stamped with their positional ids) and the outstanding
 * passenger requests, and produces the id -> Command mapping to submit for
 * that turn. It performs no I/O and keeps no state across turns.
 *
 * Commands are built by three ordered passes over two views of the elevator
 * list:
 *
 * - View A ("working"): passes remove an elevator from it once assigned, so
 *   later passes in the chain skip it.
 * - View B ("all"): an independent snapshot used only by the pickup pass;
 *   removing an elevator from B does not remove it from A and vice versa.
 *
 * Both views index the same elevator records, so the `busy` flag set through
 * one view is visible through the other. A later pass may therefore overwrite
 * an earlier pass's command for the same id; the mapping keeps the last
 * write.
 *
 * # Fields
 * - `legacy_handle_overwrite`: when set, the handle pass ignores the `busy`
 *   flag and can overwrite a pickup command issued earlier in the turn.
 * - `door_open_direction`:     direction stamped on drop-off stop commands
 *   and used as the arrival direction in the handle pass.
 */
pub struct DispatchEngine {
    legacy_handle_overwrite: bool,
    door_open_direction: i8,
}

impl DispatchEngine {
    pub fn new(config: &DispatchConfig) -> DispatchEngine {
        DispatchEngine {
            legacy_handle_overwrite: config.legacy_handle_overwrite,
            door_open_direction: config.door_open_direction,
        }
    }

    /// Runs the three dispatch passes and returns the command mapping for
    /// this turn. The per-turn `busy`/`very_busy`/`served` flags are written
    /// through the mutable slices; callers discard them with the snapshot.
    pub fn plan(&self, elevators: &mut [Elevator], requests: &mut [Request]) -> CommandSet {
        let mut commands = CommandSet::new();

        // View A shrinks as passes assign; view B shrinks only in the
        // pickup pass. Both are index lists over the same records.
        let mut working: Vec<usize> = (0..elevators.len()).collect();
        let mut all: Vec<usize> = working.clone();

        self.drop_off_pass(elevators, &mut working, &mut commands);
        self.pickup_pass(elevators, requests, &mut all, &mut commands);
        self.handle_pass(elevators, &mut working, &mut commands);

        commands
    }

    // Stops the first elevator that is standing on one of its own pressed
    // buttons. At most one assignment per turn; the pass stops after it.
    fn drop_off_pass(
        &self,
        elevators: &mut [Elevator],
        working: &mut Vec<usize>,
        commands: &mut CommandSet,
    ) {
        for pos in 0..working.len() {
            let i = working[pos];
            if elevators[i].pressed_buttons.contains(&elevators[i].floor) {
                commands.insert(
                    elevators[i].id.clone(),
                    Command {
                        direction: self.door_open_direction,
                        speed: SPEED_STOP,
                    },
                );
                elevators[i].busy = true;
                working.remove(pos);
                return;
            }
        }
    }

    // Assigns the closest eligible elevator to each unserved request. An
    // already-busy elevator only qualifies if it is stopping at the
    // request's floor with the request's direction, in which case its stop
    // command is re-stamped; an idle elevator only qualifies if it carries
    // no in-cab calls. The winner leaves view B but stays in view A.
    fn pickup_pass(
        &self,
        elevators: &mut [Elevator],
        requests: &mut [Request],
        all: &mut Vec<usize>,
        commands: &mut CommandSet,
    ) {
        for request in requests.iter_mut().filter(|r| !r.served) {
            // Stable sort: ties keep original list order.
            let mut candidates = all.clone();
            candidates.sort_by_key(|&i| (elevators[i].floor - request.floor).abs());

            for i in candidates {
                let command = if elevators[i].busy {
                    let stops_here = elevators[i].floor == request.floor
                        && commands
                            .get(&elevators[i].id)
                            .map_or(false, |c| {
                                c.speed == SPEED_STOP && c.direction == request.direction
                            });
                    if !stops_here {
                        continue;
                    }
                    Command {
                        direction: request.direction,
                        speed: SPEED_STOP,
                    }
                } else {
                    if !elevators[i].pressed_buttons.is_empty() {
                        continue;
                    }
                    route_to_floor(request.floor, request.direction, &elevators[i])
                };

                commands.insert(elevators[i].id.clone(), command);
                request.served = true;
                elevators[i].busy = true;
                elevators[i].very_busy = true;
                all.retain(|&j| j != i);
                break;
            }
        }
    }

    // Routes the first remaining elevator with pending in-cab calls toward
    // its closest pressed floor. Gated on the busy flag unless the legacy
    // overwrite behavior is configured. At most one assignment per turn.
    fn handle_pass(
        &self,
        elevators: &mut [Elevator],
        working: &mut Vec<usize>,
        commands: &mut CommandSet,
    ) {
        for pos in 0..working.len() {
            let i = working[pos];
            if !self.legacy_handle_overwrite && elevators[i].busy {
                continue;
            }
            let floor = elevators[i].floor;
            // min_by_key returns the first minimum, so ties go to the
            // earlier button in the list.
            let target = elevators[i]
                .pressed_buttons
                .iter()
                .copied()
                .min_by_key(|b| (b - floor).abs());
            if let Some(target) = target {
                commands.insert(
                    elevators[i].id.clone(),
                    route_to_floor(target, self.door_open_direction, &elevators[i]),
                );
                working.remove(pos);
                return;
            }
        }
    }
}

/// Shared floor-routing rule: move one floor toward `target`, or stop with
/// `arrival_direction` when already there.
pub fn route_to_floor(target: i64, arrival_direction: i8, elevator: &Elevator) -> Command {
    if target > elevator.floor {
        Command {
            direction: DIRN_UP,
            speed: SPEED_MOVE,
        }
    } else if target < elevator.floor {
        Command {
            direction: DIRN_DOWN,
            speed: SPEED_MOVE,
        }
    } else {
        Command {
            direction: arrival_direction,
            speed: SPEED_STOP,
        }
    }
}
