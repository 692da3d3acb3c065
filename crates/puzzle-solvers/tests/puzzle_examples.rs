//! End-to-end runs of every puzzle example through the public API.

use puzzle_solvers::circuits::analyze;
use puzzle_solvers::*;

const MANIFOLD: &str = "\
.......S.......
...............
.......^.......
...............
......^.^......
...............
.....^.^.^.....
...............
....^.^...^....
...............
...^.^...^.^...
...............
..^...^.....^..
...............
.^.^.^.^.^...^.
...............";

const WAREHOUSE: &str = "\
..@@.@@@@.
@@@.@.@.@@
@@@@@.@.@@
@.@@@@..@.
@@.@@@@.@@
.@@@@@@@.@
.@.@.@.@@@
@.@@@.@@@@
.@@@@@@@@.
@.@.@@@.@.";

const PRESENTS: &str = "\
0:
###
##.
##.

1:
###
##.
.##

2:
.##
###
##.

3:
##.
###
##.

4:
###
#..
###

5:
###
.#.
###

4x4: 0 0 0 0 2 0
12x5: 1 0 1 0 2 2
12x5: 1 0 1 0 3 2";

const FACTORY: &str = "\
[.##.] (3) (1,3) (2) (2,3) (0,2) (0,1) {3,5,4,7}
[...#.] (0,2,3,4) (2,3) (0,4) (0,1,2) (1,2,3,4) {7,5,12,7,2}
[.###.#] (0,1,2,3,4) (0,3,4) (0,1,2,4,5) (1,2) {10,11,11,5,10,5}";

const SERVER_RACK: &str = "\
svr: aaa bbb
aaa: fft
fft: ccc
bbb: tty
tty: ccc
ccc: ddd eee
ddd: hub
hub: fff
eee: dac
dac: fff
fff: ggg hhh
ggg: out
hhh: out";

const RED_TILES: &str = "\
7,1
11,1
11,7
9,7
9,5
2,5
2,3
7,3";

const DATABASE: &str = "\
3-5
10-14
16-20
12-18

1
5
8
11
17
32";

const JUNCTIONS: &str = "\
162,817,812
57,618,57
906,360,560
592,479,940
352,342,300
466,668,158
542,29,236
431,825,988
739,650,466
52,470,668
216,146,977
819,987,18
117,168,530
805,96,715
346,949,466
970,615,88
941,993,340
862,61,35
984,92,344
425,690,689";

#[test]
fn test_manifold() {
    let grid = Grid::parse(MANIFOLD).unwrap();
    let start = grid.find_start().unwrap();
    assert_eq!(count_splits(&grid, start), 21);
    assert_eq!(count_timelines(&grid, start), 40);

    for side_exit in [SideExit::Drop, SideExit::Complete] {
        let report = simulate_timelines(&grid, start, &BeamConfig { side_exit });
        assert_eq!(report.exited_bottom + report.exited_sides, report.injected);
    }
}

#[test]
fn test_warehouse() {
    let grid = Grid::parse(WAREHOUSE).unwrap();
    assert_eq!(accessible_rolls(&grid), 13);
    assert_eq!(removable_rolls(&grid), 43);
}

#[test]
fn test_presents() {
    let puzzle = PackingPuzzle::parse(PRESENTS).unwrap();
    assert_eq!(count_packable(&puzzle.catalog, &puzzle.regions), 2);

    let result = pack_region_with(&puzzle.catalog, &puzzle.regions[2], &PackConfig::default());
    assert!(!result.fits);
    assert!(result.search_exhausted);
}

#[test]
fn test_factory() {
    let machines = Machine::parse_all(FACTORY).unwrap();
    let lights: usize = machines
        .iter()
        .map(|m| min_presses(&m.lights, &m.buttons).unwrap().presses().unwrap())
        .sum();
    let joltage: u64 = machines
        .iter()
        .map(|m| min_counter_presses(&m.joltage, &m.buttons).unwrap().unwrap())
        .sum();
    assert_eq!(lights, 7);
    assert_eq!(joltage, 33);
}

#[test]
fn test_server_rack() {
    let graph = Graph::parse(SERVER_RACK).unwrap();
    assert_eq!(count_paths(&graph, "svr", "out"), Ok(8));
    assert_eq!(count_paths_through(&graph, "svr", "out", &["dac", "fft"]), Ok(2));

    // Without eee -> dac the node dac is still in the graph but unreachable
    let cut = Graph::parse(&SERVER_RACK.replace("eee: dac\n", "eee:\n")).unwrap();
    assert!(cut.contains("dac"));
    assert_eq!(count_paths_through(&cut, "svr", "out", &["dac", "fft"]), Ok(0));
    assert_eq!(count_paths_through(&cut, "svr", "out", &["fft"]), Ok(2));
}

#[test]
fn test_junctions() {
    let points = parse_points(JUNCTIONS).unwrap();
    let report = analyze(&points, 10);
    assert_eq!(report.largest_product, 40);
    assert_eq!(report.final_connection.map(|c| c.x_product), Some(25272));

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["largestProduct"], 40);
    assert_eq!(json["finalConnection"]["xProduct"], 25272);
}

#[test]
fn test_red_tiles() {
    let red = parse_tiles(RED_TILES).unwrap();
    assert_eq!(largest_rectangle(&red), 50);
    assert_eq!(largest_enclosed_rectangle(&red), Ok(24));

    let json = serde_json::to_value(tiles::analyze(&red).unwrap()).unwrap();
    assert_eq!(json["largest"], 50);
    assert_eq!(json["largestEnclosed"], 24);
}

#[test]
fn test_ingredient_database() {
    let inventory = Inventory::parse(DATABASE).unwrap();
    assert_eq!(inventory.count_fresh(), 3);
    assert_eq!(inventory.fresh.covered(), 14);

    let json = serde_json::to_value(ranges::analyze(&inventory)).unwrap();
    assert_eq!(json["freshAvailable"], 3);
    assert_eq!(json["freshIds"], 14);
    assert_eq!(json["mergedRanges"][1]["end"], 20);
}
