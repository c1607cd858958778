/*
 * Unit tests for the dispatch module
 *
 * The unit tests follows the Arrange, Act, Assert pattern.
 *
 * Tests:
 *  - test_drop_off_stops_at_pressed_floor
 *  - test_drop_off_assigns_at_most_one_elevator
 *  - test_pickup_routes_idle_elevator
 *  - test_pickup_prefers_closest_elevator
 *  - test_pickup_tie_breaks_by_list_order
 *  - test_pickup_skips_carrying_elevators
 *  - test_pickup_joins_elevator_stopping_at_floor
 *  - test_pickup_ignores_mismatched_direction
 *  - test_pickup_serves_request_exactly_once
 *  - test_handle_routes_to_closest_button
 *  - test_handle_tie_breaks_by_button_order
 *  - test_handle_respects_busy_flag
 *  - test_handle_legacy_ignores_busy_flag
 *  - test_route_to_floor
 */

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod dispatch_tests {
    use crate::config::DispatchConfig;
    use crate::dispatch::{route_to_floor, DispatchEngine};
    use crate::shared::structs::{DIRN_DOWN, DIRN_STOP, DIRN_UP, SPEED_MOVE, SPEED_STOP};
    use crate::shared::{Command, Elevator, Request};

    fn engine() -> DispatchEngine {
        DispatchEngine::new(&DispatchConfig::default())
    }

    fn legacy_engine() -> DispatchEngine {
        DispatchEngine::new(&DispatchConfig {
            legacy_handle_overwrite: true,
            door_open_direction: DIRN_UP,
        })
    }

    fn elevator(id: &str, floor: i64, pressed_buttons: &[i64]) -> Elevator {
        Elevator::new(id.to_string(), floor, pressed_buttons.to_vec())
    }

    #[test]
    fn test_drop_off_stops_at_pressed_floor() {
        // Arrange: one cab standing on a floor it has a pressed button for
        let mut elevators = vec![elevator("0", 3, &[3])];
        let mut requests: Vec<Request> = Vec::new();

        // Act
        let commands = engine().plan(&mut elevators, &mut requests);

        // Assert: a single stop command, door facing up
        assert_eq!(commands.len(), 1);
        assert_eq!(
            commands["0"],
            Command {
                direction: DIRN_UP,
                speed: SPEED_STOP
            }
        );
        assert!(elevators[0].busy);
        assert!(!elevators[0].very_busy);
    }

    #[test]
    fn test_drop_off_assigns_at_most_one_elevator() {
        // Arrange: two cabs both due for a drop-off; the pass stops after
        // the first, the second falls through to the handle pass
        let mut elevators = vec![elevator("0", 3, &[3]), elevator("1", 5, &[7])];
        let mut requests: Vec<Request> = Vec::new();

        // Act
        let commands = engine().plan(&mut elevators, &mut requests);

        // Assert: first cab stops, second is routed toward its button
        assert_eq!(commands.len(), 2);
        assert_eq!(
            commands["0"],
            Command {
                direction: DIRN_UP,
                speed: SPEED_STOP
            }
        );
        assert_eq!(
            commands["1"],
            Command {
                direction: DIRN_UP,
                speed: SPEED_MOVE
            }
        );
        assert!(elevators[0].busy);
        assert!(!elevators[1].busy);
    }

    #[test]
    fn test_pickup_routes_idle_elevator() {
        // Arrange: idle cab at the bottom, passenger waiting on floor 5
        let mut elevators = vec![elevator("0", 0, &[])];
        let mut requests = vec![Request::new(5, DIRN_UP)];

        // Act
        let commands = engine().plan(&mut elevators, &mut requests);

        // Assert: cab moves up toward the request
        assert_eq!(commands.len(), 1);
        assert_eq!(
            commands["0"],
            Command {
                direction: DIRN_UP,
                speed: SPEED_MOVE
            }
        );
        assert!(requests[0].served);
        assert!(elevators[0].busy);
        assert!(elevators[0].very_busy);
    }

    #[test]
    fn test_pickup_prefers_closest_elevator() {
        // Arrange: the cab above is closer to the request than the one below
        let mut elevators = vec![elevator("0", 0, &[]), elevator("1", 9, &[])];
        let mut requests = vec![Request::new(5, DIRN_UP)];

        // Act
        let commands = engine().plan(&mut elevators, &mut requests);

        // Assert: only the closer cab is dispatched, moving down
        assert_eq!(commands.len(), 1);
        assert_eq!(
            commands["1"],
            Command {
                direction: DIRN_DOWN,
                speed: SPEED_MOVE
            }
        );
        assert!(!elevators[0].busy);
        assert!(elevators[1].busy);
    }

    #[test]
    fn test_pickup_tie_breaks_by_list_order() {
        // Arrange: both cabs are one floor away from the request
        let mut elevators = vec![elevator("0", 4, &[]), elevator("1", 6, &[])];
        let mut requests = vec![Request::new(5, DIRN_UP)];

        // Act
        let commands = engine().plan(&mut elevators, &mut requests);

        // Assert: the earlier cab in the snapshot wins the tie
        assert_eq!(commands.len(), 1);
        assert_eq!(
            commands["0"],
            Command {
                direction: DIRN_UP,
                speed: SPEED_MOVE
            }
        );
    }

    #[test]
    fn test_pickup_skips_carrying_elevators() {
        // Arrange: the closest cab is idle but still has an in-cab call, so
        // the pickup goes to the farther empty cab
        let mut elevators = vec![elevator("0", 5, &[7]), elevator("1", 0, &[])];
        let mut requests = vec![Request::new(5, DIRN_UP)];

        // Act
        let commands = engine().plan(&mut elevators, &mut requests);

        // Assert: empty cab takes the pickup, carrying cab is routed to its
        // own call by the handle pass
        assert_eq!(commands.len(), 2);
        assert_eq!(
            commands["1"],
            Command {
                direction: DIRN_UP,
                speed: SPEED_MOVE
            }
        );
        assert_eq!(
            commands["0"],
            Command {
                direction: DIRN_UP,
                speed: SPEED_MOVE
            }
        );
        assert!(requests[0].served);
        assert!(elevators[1].very_busy);
        assert!(!elevators[0].very_busy);
    }

    #[test]
    fn test_pickup_joins_elevator_stopping_at_floor() {
        // Arrange: cab is stopping at floor 5 for a drop-off and a passenger
        // on the same floor wants to travel in the door direction
        let mut elevators = vec![elevator("0", 5, &[5])];
        let mut requests = vec![Request::new(5, DIRN_UP)];

        // Act
        let commands = engine().plan(&mut elevators, &mut requests);

        // Assert: the pickup re-stamps the stop command; one entry survives
        assert_eq!(commands.len(), 1);
        assert_eq!(
            commands["0"],
            Command {
                direction: DIRN_UP,
                speed: SPEED_STOP
            }
        );
        assert!(requests[0].served);
        assert!(elevators[0].very_busy);
    }

    #[test]
    fn test_pickup_ignores_mismatched_direction() {
        // Arrange: cab is stopping at floor 5 facing up, passenger wants to
        // go down
        let mut elevators = vec![elevator("0", 5, &[5])];
        let mut requests = vec![Request::new(5, DIRN_DOWN)];

        // Act
        let commands = engine().plan(&mut elevators, &mut requests);

        // Assert: only the drop-off command remains, request stays unserved
        assert_eq!(commands.len(), 1);
        assert_eq!(
            commands["0"],
            Command {
                direction: DIRN_UP,
                speed: SPEED_STOP
            }
        );
        assert!(!requests[0].served);
    }

    #[test]
    fn test_pickup_serves_request_exactly_once() {
        // Arrange: three eligible cabs, one request
        let mut elevators = vec![
            elevator("0", 2, &[]),
            elevator("1", 4, &[]),
            elevator("2", 8, &[]),
        ];
        let mut requests = vec![Request::new(5, DIRN_DOWN)];

        // Act
        let commands = engine().plan(&mut elevators, &mut requests);

        // Assert: exactly one cab is committed to the request
        assert_eq!(commands.len(), 1);
        assert_eq!(
            commands["1"],
            Command {
                direction: DIRN_UP,
                speed: SPEED_MOVE
            }
        );
        assert!(requests[0].served);
        assert_eq!(
            elevators.iter().filter(|e| e.busy).count(),
            1,
            "only one cab may be committed to a request"
        );
    }

    #[test]
    fn test_handle_routes_to_closest_button() {
        // Arrange: cab between two of its own calls, no passengers waiting
        let mut elevators = vec![elevator("0", 5, &[2, 7])];
        let mut requests: Vec<Request> = Vec::new();

        // Act
        let commands = engine().plan(&mut elevators, &mut requests);

        // Assert: routed toward floor 7 (distance 2 beats distance 3)
        assert_eq!(commands.len(), 1);
        assert_eq!(
            commands["0"],
            Command {
                direction: DIRN_UP,
                speed: SPEED_MOVE
            }
        );
    }

    #[test]
    fn test_handle_tie_breaks_by_button_order() {
        // Arrange: both calls are two floors away
        let mut elevators = vec![elevator("0", 5, &[3, 7])];
        let mut requests: Vec<Request> = Vec::new();

        // Act
        let commands = engine().plan(&mut elevators, &mut requests);

        // Assert: the earlier button in the list wins, cab moves down
        assert_eq!(
            commands["0"],
            Command {
                direction: DIRN_DOWN,
                speed: SPEED_MOVE
            }
        );
    }

    #[test]
    fn test_handle_respects_busy_flag() {
        // Arrange: cab already committed this turn but still carrying a call
        let mut busy_elevator = elevator("0", 5, &[7]);
        busy_elevator.busy = true;
        let mut elevators = vec![busy_elevator];
        let mut requests: Vec<Request> = Vec::new();

        // Act
        let commands = engine().plan(&mut elevators, &mut requests);

        // Assert: the default engine leaves the committed cab alone
        assert!(commands.is_empty());
    }

    #[test]
    fn test_handle_legacy_ignores_busy_flag() {
        // Arrange: same committed cab, legacy-overwrite engine
        let mut busy_elevator = elevator("0", 5, &[7]);
        busy_elevator.busy = true;
        let mut elevators = vec![busy_elevator];
        let mut requests: Vec<Request> = Vec::new();

        // Act
        let commands = legacy_engine().plan(&mut elevators, &mut requests);

        // Assert: the legacy handle pass assigns it anyway
        assert_eq!(commands.len(), 1);
        assert_eq!(
            commands["0"],
            Command {
                direction: DIRN_UP,
                speed: SPEED_MOVE
            }
        );
    }

    #[test]
    fn test_route_to_floor() {
        // Arrange
        let cab = elevator("0", 5, &[]);

        // Act / Assert: above, below, and arrival
        assert_eq!(
            route_to_floor(8, DIRN_DOWN, &cab),
            Command {
                direction: DIRN_UP,
                speed: SPEED_MOVE
            }
        );
        assert_eq!(
            route_to_floor(2, DIRN_UP, &cab),
            Command {
                direction: DIRN_DOWN,
                speed: SPEED_MOVE
            }
        );
        assert_eq!(
            route_to_floor(5, DIRN_DOWN, &cab),
            Command {
                direction: DIRN_DOWN,
                speed: SPEED_STOP
            }
        );
        // Arrival direction is passed through untouched
        assert_eq!(
            route_to_floor(5, DIRN_STOP, &cab),
            Command {
                direction: DIRN_STOP,
                speed: SPEED_STOP
            }
        );
    }
}
