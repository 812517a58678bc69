//! End-to-end tests for the map pipeline.
//!
//! Exercises: encoded record → Layout → door pairs → DoorGraph
//! → partition search → normalized MapRecord
//!
//! All tests are pure logic, no filesystem.

use areamap_logic::blockmodel::BlockModelDetector;
use areamap_logic::config::{PartitionConfig, SearchPolicy};
use areamap_logic::episode::{map_layout, MapRecord, Outcome};
use areamap_logic::error::{DecodeError, EpisodeError};
use areamap_logic::graph::{DoorGraph, EdgeKind};
use areamap_logic::layout::Layout;
use areamap_logic::rooms::{Direction, Door, DoorSubtype, Room, RoomSet};
use areamap_logic::search::search_partition;
use areamap_logic::validity::{AreaLimits, RoomExtent, ValidityChecker, Violation};
use proptest::prelude::*;

// ── Helpers ────────────────────────────────────────────────────────────

fn door(x: i64, y: i64, direction: Direction, ptr: u64) -> Door {
    Door {
        x,
        y,
        direction,
        subtype: DoorSubtype::Normal,
        exit_ptr: 0x18000 + ptr,
        entrance_ptr: 0x9000 + ptr,
    }
}

fn room(name: &str, width: usize, height: usize, doors: Vec<Door>) -> Room {
    Room {
        name: name.to_string(),
        map: vec![vec![1; width]; height],
        doors,
    }
}

/// Five rooms forming the loop Landing Site → Hall → Shaft → Floor → Toilet
/// → Landing Site. The Toilet hangs over the left end of Floor.
fn loop_rooms() -> Vec<Room> {
    vec![
        room(
            "Landing Site",
            2,
            1,
            vec![door(1, 0, Direction::Right, 1), door(0, 0, Direction::Down, 2)],
        ),
        room(
            "Hall",
            2,
            1,
            vec![door(0, 0, Direction::Left, 3), door(1, 0, Direction::Down, 4)],
        ),
        room(
            "Shaft",
            1,
            2,
            vec![door(0, 0, Direction::Up, 5), door(0, 1, Direction::Down, 6)],
        ),
        room(
            "Floor",
            4,
            1,
            vec![door(3, 0, Direction::Up, 7), door(0, 0, Direction::Up, 8)],
        ),
        room(
            "Toilet",
            1,
            2,
            vec![door(0, 0, Direction::Up, 9), door(0, 1, Direction::Down, 10)],
        ),
    ]
}

fn room_set(rooms: Vec<Room>) -> RoomSet {
    RoomSet::new(rooms, "Toilet", "Landing Site").unwrap()
}

/// Placement steps in the environment's order, ending with the no-op room.
fn loop_record(room_count: i64) -> Vec<i64> {
    vec![
        0, 0, 0, //
        1, 2, 0, //
        2, 3, 1, //
        3, 0, 3, //
        4, 0, 1, //
        room_count, 0, 0,
    ]
}

fn config(areas: usize) -> PartitionConfig {
    PartitionConfig {
        num_areas: areas,
        trials: 500,
        ..PartitionConfig::default()
    }
}

fn run(rooms: &RoomSet, record: &[i64], config: &PartitionConfig) -> Result<Outcome, EpisodeError> {
    let layout = Layout::decode(record, rooms.len()).unwrap();
    map_layout(rooms, &layout, config, &BlockModelDetector::default())
}

fn expect_map(outcome: Outcome) -> MapRecord {
    match outcome {
        Outcome::Mapped { record, .. } => record,
        Outcome::Skipped { trials } => panic!("no valid partition in {trials} trials"),
    }
}

/// Rooms sharing `area`, by room index.
fn members(record: &MapRecord, area: usize) -> Vec<usize> {
    (0..record.area.len())
        .filter(|&i| record.area[i] == Some(area))
        .collect()
}

// ── Pipeline tests ─────────────────────────────────────────────────────

#[test]
fn loop_splits_into_two_connected_areas() {
    let rooms = room_set(loop_rooms());
    let record = expect_map(run(&rooms, &loop_record(5), &config(2)).unwrap());

    assert_eq!(record.rooms, vec![[0, 0], [2, 0], [3, 1], [0, 3], [0, 1]]);
    assert_eq!(record.doors.len(), 5);
    assert_eq!(record.toilet_intersections, vec![3]);
    assert_eq!(record.area[0], Some(0), "anchor must be area 0");
    assert_eq!(record.area[4], record.area[3], "toilet must follow its partner");

    // along the loop, each area is one contiguous run
    let order = [0usize, 1, 2, 3, 4];
    let changes = (0..order.len())
        .filter(|&i| record.area[order[i]] != record.area[order[(i + 1) % order.len()]])
        .count();
    assert_eq!(changes, 2);
    assert!(!members(&record, 0).is_empty());
    assert!(!members(&record, 1).is_empty());
}

#[test]
fn toilet_stays_with_partner_for_more_areas() {
    let rooms = room_set(loop_rooms());
    for areas in 2..=3 {
        let record = expect_map(run(&rooms, &loop_record(5), &config(areas)).unwrap());
        assert_eq!(record.area[4], record.area[3], "k = {areas}");
        assert_eq!(record.area[0], Some(0), "k = {areas}");
        for area in 0..areas {
            assert!(!members(&record, area).is_empty(), "k = {areas}, area {area} empty");
        }
    }
}

#[test]
fn pipeline_is_deterministic() {
    let rooms = room_set(loop_rooms());
    let cfg = config(2);
    let first = run(&rooms, &loop_record(5), &cfg).unwrap();
    let second = run(&rooms, &loop_record(5), &cfg).unwrap();
    assert_eq!(first, second);
}

#[test]
fn exhaustive_search_runs_full_budget() {
    let rooms = room_set(loop_rooms());
    let cfg = PartitionConfig {
        trials: 40,
        policy: SearchPolicy::Exhaustive,
        ..config(2)
    };
    match run(&rooms, &loop_record(5), &cfg).unwrap() {
        Outcome::Mapped { stats, .. } => {
            assert_eq!(stats.trials_run, 40);
            assert!(stats.trial < 40);
        }
        Outcome::Skipped { .. } => panic!("expected a map"),
    }
}

#[test]
fn unmatched_door_names_its_room() {
    let mut rooms = loop_rooms();
    rooms[2].doors.push(door(0, 0, Direction::Right, 11));
    let rooms = room_set(rooms);

    match run(&rooms, &loop_record(5), &config(2)) {
        Err(EpisodeError::DoorMismatch { key, count, rooms }) => {
            assert_eq!((key.x, key.y, key.vertical), (4, 1, false));
            assert_eq!(count, 1);
            assert_eq!(rooms, vec!["#2 Shaft".to_string()]);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[test]
fn oversized_room_is_skipped_not_failed() {
    let rooms = room_set(loop_rooms());
    let cfg = PartitionConfig {
        max_area_width: 3,
        trials: 20,
        ..config(2)
    };
    // Floor alone is four tiles wide
    assert_eq!(
        run(&rooms, &loop_record(5), &cfg).unwrap(),
        Outcome::Skipped { trials: 20 }
    );
}

#[test]
fn absent_room_gets_null_area() {
    let mut rooms = loop_rooms();
    rooms.push(room("Spare", 3, 3, vec![]));
    let rooms = room_set(rooms);

    let record = expect_map(run(&rooms, &loop_record(6), &config(2)).unwrap());
    assert_eq!(record.area.len(), 6);
    assert_eq!(record.area[5], None);
    assert_eq!(record.rooms[5], [0, 0]);

    let json = serde_json::to_value(&record).unwrap();
    assert!(json["area"][5].is_null());
}

#[test]
fn decode_errors_surface_before_mapping() {
    let rooms = room_set(loop_rooms());
    let mut record = loop_record(5);
    record[3] = 0;
    assert_eq!(
        Layout::decode(&record, rooms.len()),
        Err(DecodeError::DuplicatePlacement {
            step: 1,
            room: 0,
            first: 0
        })
    );
}

// ── Property tests ─────────────────────────────────────────────────────
//
// Graphs are a spanning path 0-1-…-(n-1) plus random chords. The last vertex
// is the Toilet and the path edge into it is its overlap link, so the
// partner is vertex n-2. Acceptance is cross-checked against a union-find
// over the same edge list, independent of `DoorGraph`.

const OPEN: AreaLimits = AreaLimits {
    max_width: 100,
    max_height: 100,
};

#[derive(Debug, Clone)]
struct Case {
    areas: usize,
    n: usize,
    chords: Vec<(usize, usize)>,
    labels: Vec<usize>,
}

fn edge_list(n: usize, chords: &[(usize, usize)]) -> Vec<(usize, usize)> {
    (1..n).map(|v| (v - 1, v)).chain(chords.iter().copied()).collect()
}

fn build_graph(n: usize, chords: &[(usize, usize)]) -> DoorGraph {
    let present: Vec<usize> = (0..n).collect();
    let mut graph = DoorGraph::new(n, &present);
    for v in 1..n - 1 {
        graph.add_edge(v - 1, v, EdgeKind::Door);
    }
    graph.add_edge(n - 2, n - 1, EdgeKind::Toilet);
    for &(a, b) in chords {
        graph.add_edge(a, b, EdgeKind::Door);
    }
    graph
}

fn unit_extents(n: usize) -> Vec<RoomExtent> {
    (0..n as i64)
        .map(|i| RoomExtent {
            min_x: i,
            max_x: i + 1,
            min_y: 0,
            max_y: 1,
        })
        .collect()
}

fn find(parent: &mut [usize], v: usize) -> usize {
    let mut root = v;
    while parent[root] != root {
        root = parent[root];
    }
    let mut cur = v;
    while parent[cur] != root {
        let next = parent[cur];
        parent[cur] = root;
        cur = next;
    }
    root
}

/// Every area non-empty and joined by its own edges, Toilet beside partner.
fn union_find_accepts(n: usize, edges: &[(usize, usize)], labels: &[usize], areas: usize) -> bool {
    let mut parent: Vec<usize> = (0..n).collect();
    for &(a, b) in edges {
        if labels[a] == labels[b] {
            let (ra, rb) = (find(&mut parent, a), find(&mut parent, b));
            parent[ra] = rb;
        }
    }
    for area in 0..areas {
        let mut roots: Vec<usize> = (0..n)
            .filter(|&v| labels[v] == area)
            .map(|v| find(&mut parent, v))
            .collect();
        roots.sort_unstable();
        roots.dedup();
        if roots.len() != 1 {
            return false;
        }
    }
    labels[n - 1] == labels[n - 2]
}

/// `areas` in 2..6, with enough vertices for a cut in front of the Toilet.
fn graph_shape() -> impl Strategy<Value = (usize, usize, Vec<(usize, usize)>)> {
    (2usize..6)
        .prop_flat_map(|areas| (Just(areas), areas + 1..12))
        .prop_flat_map(|(areas, n)| {
            (Just(areas), Just(n), prop::collection::vec((0..n, 0..n), 0..6))
        })
}

/// Contiguous runs along the path. With `toilet_alone` the last run is the
/// Toilet by itself, cut away from its partner.
fn contiguous_case(toilet_alone: bool) -> impl Strategy<Value = Case> {
    graph_shape().prop_flat_map(move |(areas, n, chords)| {
        let picks = if toilet_alone { areas - 2 } else { areas - 1 };
        let interior: Vec<usize> = (1..n - 1).collect();
        prop::sample::subsequence(interior, picks).prop_map(move |mut cuts| {
            if toilet_alone {
                cuts.push(n - 1);
            }
            let labels = (0..n)
                .map(|v| cuts.iter().filter(|&&c| c <= v).count())
                .collect();
            Case {
                areas,
                n,
                chords: chords.clone(),
                labels,
            }
        })
    })
}

fn arbitrary_case() -> impl Strategy<Value = Case> {
    graph_shape().prop_flat_map(|(areas, n, chords)| {
        prop::collection::vec(0..areas, n).prop_map(move |labels| Case {
            areas,
            n,
            chords: chords.clone(),
            labels,
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn contiguous_runs_are_accepted(case in contiguous_case(false)) {
        let graph = build_graph(case.n, &case.chords);
        let extents = unit_extents(case.n);
        let checker =
            ValidityChecker::new(&graph, &extents, OPEN, case.areas, case.n - 1, case.n - 2)
                .unwrap();
        prop_assert!(union_find_accepts(
            case.n,
            &edge_list(case.n, &case.chords),
            &case.labels,
            case.areas
        ));
        prop_assert_eq!(checker.violations(&case.labels), Vec::<Violation>::new());
    }

    #[test]
    fn toilet_cut_from_partner_is_rejected(case in contiguous_case(true)) {
        let graph = build_graph(case.n, &case.chords);
        let extents = unit_extents(case.n);
        let checker =
            ValidityChecker::new(&graph, &extents, OPEN, case.areas, case.n - 1, case.n - 2)
                .unwrap();
        prop_assert!(!union_find_accepts(
            case.n,
            &edge_list(case.n, &case.chords),
            &case.labels,
            case.areas
        ));
        prop_assert_eq!(
            checker.violations(&case.labels),
            vec![Violation::ToiletSplit {
                toilet_area: case.areas - 1,
                partner_area: case.areas - 2,
            }]
        );
    }

    #[test]
    fn checker_agrees_with_union_find(case in arbitrary_case()) {
        let graph = build_graph(case.n, &case.chords);
        let extents = unit_extents(case.n);
        let checker =
            ValidityChecker::new(&graph, &extents, OPEN, case.areas, case.n - 1, case.n - 2)
                .unwrap();
        let expected = union_find_accepts(
            case.n,
            &edge_list(case.n, &case.chords),
            &case.labels,
            case.areas,
        );
        prop_assert_eq!(checker.is_valid(&case.labels), expected, "{:?}", case);
    }

    #[test]
    fn searched_partitions_pass_union_find(
        (areas, n, chords) in graph_shape(),
        first_seed in 0u64..1000,
    ) {
        let graph = build_graph(n, &chords);
        let extents = unit_extents(n);
        let checker = ValidityChecker::new(&graph, &extents, OPEN, areas, n - 1, n - 2).unwrap();
        let cfg = PartitionConfig {
            num_areas: areas,
            trials: 30,
            first_seed,
            ..PartitionConfig::default()
        };

        let detector = BlockModelDetector::default();
        if let Some(result) = search_partition(&graph, &checker, &detector, &cfg).unwrap() {
            prop_assert_eq!(result.labels.len(), n);
            prop_assert!(
                union_find_accepts(n, &edge_list(n, &chords), &result.labels, areas),
                "{:?}",
                result.labels
            );
        }
    }
}
