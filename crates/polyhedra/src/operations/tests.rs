use super::*;
use crate::test_support::{
    all_edges_equal, cube, cuboctahedron, dodecahedron, euler_characteristic, face_census, icosahedron, is_convex,
    octahedron, prism, rhombicuboctahedron, square_pyramid, tetrahedron,
};
use crate::cfg::PRECISION;
use nalgebra::{Rotation3, Unit};
use proptest::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn run(op: Operation, p: &Polyhedron, options: &OpOptions) -> OperationResult {
    init_tracing();
    let out = operate(op, p, options).unwrap();
    let anim = &out.animation_data;
    assert_eq!(anim.start.num_vertices(), anim.end_vertices.len());
    assert_eq!(euler_characteristic(&out.result), 2);
    out
}

fn counts(p: &Polyhedron) -> (usize, usize) {
    (p.num_vertices(), p.num_faces())
}

/// Some vertex has two triangles next to each other in its face cycle.
fn has_adjacent_triangles(p: &Polyhedron) -> bool {
    (0..p.num_vertices()).any(|v| {
        let cycle = p.vertex_face_cycle(v).unwrap();
        (0..cycle.len()).any(|i| {
            p.num_sides(cycle[i]) == 3 && p.num_sides(cycle[(i + 1) % cycle.len()]) == 3
        })
    })
}

#[test]
fn operation_names_round_trip() {
    for op in Operation::ALL {
        assert_eq!(op.name().parse::<Operation>().unwrap(), op);
        assert_eq!(op.to_string(), op.name());
    }
    assert!(matches!(
        "frobnicate".parse::<Operation>(),
        Err(Error::InvalidOption { operation: "operate", .. })
    ));
}

#[test]
fn keywords_parse() {
    assert_eq!("gyro".parse::<Gyrate>().unwrap(), Gyrate::Gyro);
    assert_eq!("back".parse::<Direction>().unwrap(), Direction::Back);
    assert_eq!("meta".parse::<Align>().unwrap(), Align::Meta);
    assert_eq!("right".parse::<Twist>().unwrap().opposite(), Twist::Left);
    assert!(matches!(
        "sideways".parse::<Twist>(),
        Err(Error::InvalidOption { operation: "twist", .. })
    ));
}

#[test]
fn option_keys_follow_the_relation_table() {
    let options = OpOptions::new().face_type(3).twist(Twist::Left);
    assert_eq!(options.keys(), vec!["faceType", "twist"]);
    assert!(OpOptions::new().keys().is_empty());
}

#[test]
fn unrecognized_options_are_rejected_before_running() {
    let c = cube();
    let err = operate(Operation::Truncate, &c, &OpOptions::new().twist(Twist::Left)).unwrap_err();
    assert_eq!(
        err,
        Error::UnrecognizedOption {
            operation: "truncate",
            key: "twist"
        }
    );
    let err = operate(Operation::Augment, &c, &OpOptions::new().direction(Direction::Back)).unwrap_err();
    assert!(matches!(err, Error::UnrecognizedOption { key: "direction", .. }));
    let err = operate(Operation::Gyrate, &c, &OpOptions::new().twist(Twist::Right)).unwrap_err();
    assert!(matches!(err, Error::UnrecognizedOption { key: "twist", .. }));
}

#[test]
fn operate_named_dispatches() {
    init_tracing();
    let out = operate_named("rectify", &cube(), &OpOptions::new()).unwrap();
    assert_eq!(counts(&out.result), (12, 14));
    assert!(operate_named("bogus", &cube(), &OpOptions::new()).is_err());
}

#[test]
fn truncate_makes_uniform_solids() {
    let out = run(Operation::Truncate, &cube(), &OpOptions::new());
    assert_eq!(counts(&out.result), (24, 14));
    assert_eq!(face_census(&out.result), vec![(3, 8), (8, 6)]);
    assert!(all_edges_equal(&out.result, 1e-9));
    assert!(is_convex(&out.result, 1e-9));

    let out = run(Operation::Truncate, &tetrahedron(), &OpOptions::new());
    assert_eq!(face_census(&out.result), vec![(3, 4), (6, 4)]);
    assert!(all_edges_equal(&out.result, 1e-9));
    // the animation starts from the collapsed copies of the original corners
    assert_eq!(out.animation_data.start.num_vertices(), 12);
}

#[test]
fn rectify_meets_at_edge_midpoints() {
    let out = run(Operation::Rectify, &cube(), &OpOptions::new());
    assert_eq!(face_census(&out.result), vec![(3, 8), (4, 6)]);
    assert!(all_edges_equal(&out.result, 1e-9));

    let out = run(Operation::Rectify, &tetrahedron(), &OpOptions::new());
    assert_eq!(counts(&out.result), (6, 8));
}

#[test]
fn dual_swaps_vertices_and_faces() {
    let out = run(Operation::Dual, &cube(), &OpOptions::new());
    assert_eq!(counts(&out.result), (6, 8));
    assert!(all_edges_equal(&out.result, 1e-9));
    assert!(is_convex(&out.result, 1e-9));

    let out = run(Operation::Dual, &dodecahedron(), &OpOptions::new());
    assert_eq!(face_census(&out.result), vec![(3, 20)]);
}

#[test]
fn cumulate_on_a_rectified_solid() {
    let out = run(Operation::Cumulate, &cuboctahedron(), &OpOptions::new().face_type(3));
    // each of the 12 shared corners is split between its two triangles
    assert_eq!(out.animation_data.start.num_vertices(), 24);
    assert_eq!(counts(&out.result), (8, 6));
    assert_eq!(face_census(&out.result), vec![(4, 6)]);
    assert!(all_edges_equal(&out.result, 1e-6));
}

#[test]
fn cumulate_takes_alternate_octahedron_faces() {
    let out = run(Operation::Cumulate, &octahedron(), &OpOptions::new());
    assert_eq!(counts(&out.result), (4, 4));
    assert!(all_edges_equal(&out.result, 1e-6));
}

#[test]
fn cumulate_undoes_truncation() {
    let truncated = run(Operation::Truncate, &tetrahedron(), &OpOptions::new()).result;
    let out = run(Operation::Cumulate, &truncated, &OpOptions::new().face_type(3));
    assert_eq!(counts(&out.result), (4, 4));
    assert_eq!(face_census(&out.result), vec![(3, 4)]);
}

#[test]
fn cumulate_polygon_reports_small_faces() {
    let c = cube();
    assert_eq!(cumulate_polygon(&c, &Vec3::new(0.2, -0.1, 1.05)), Some(4));
    let truncated = run(Operation::Truncate, &c, &OpOptions::new()).result;
    assert_eq!(cumulate_polygon(&truncated, &Vec3::new(0.0, 0.0, 1.05)), None);
}

#[test]
fn cumulate_without_a_matching_face_fails() {
    assert!(operate(Operation::Cumulate, &cube(), &OpOptions::new().face_type(5)).is_err());
}

#[test]
fn expand_cube_gives_rhombicuboctahedron() {
    let out = run(Operation::Expand, &cube(), &OpOptions::new());
    assert_eq!(counts(&out.result), (24, 26));
    assert_eq!(face_census(&out.result), vec![(3, 8), (4, 18)]);
    assert!(all_edges_equal(&out.result, 1e-9));
    assert!(is_convex(&out.result, 1e-9));
}

#[test]
fn snub_of_either_twist() {
    for twist in [Twist::Left, Twist::Right] {
        let out = run(Operation::Snub, &cube(), &OpOptions::new().twist(twist));
        assert_eq!(counts(&out.result), (24, 38));
        assert_eq!(face_census(&out.result), vec![(3, 32), (4, 6)]);
        assert!(all_edges_equal(&out.result, 1e-6));
        assert!(is_convex(&out.result, 1e-6));
    }
    let out = run(Operation::Snub, &tetrahedron(), &OpOptions::new());
    assert_eq!(counts(&out.result), (12, 20));
    assert!(all_edges_equal(&out.result, 1e-6));
}

#[test]
fn contract_inverts_expand() {
    let r = rhombicuboctahedron();
    let out = run(Operation::Contract, &r, &OpOptions::new().face_type(4));
    assert_eq!(counts(&out.result), (8, 6));
    let out = run(Operation::Contract, &r, &OpOptions::new().face_type(3));
    assert_eq!(counts(&out.result), (6, 8));
    assert!(all_edges_equal(&out.result, 1e-6));
}

#[test]
fn contract_inverts_snub() {
    let snubbed = run(Operation::Snub, &cube(), &OpOptions::new().twist(Twist::Right)).result;
    let out = run(Operation::Contract, &snubbed, &OpOptions::new().face_type(4));
    assert_eq!(counts(&out.result), (8, 6));
}

#[test]
fn contract_needs_an_expanded_face() {
    assert!(operate(Operation::Contract, &cube(), &OpOptions::new().face_type(4)).is_err());
}

#[test]
fn elongate_and_shorten_round_trip() {
    let pyramid = square_pyramid();
    let out = run(Operation::Elongate, &pyramid, &OpOptions::new());
    assert_eq!(counts(&out.result), (9, 9));
    assert_eq!(face_census(&out.result), vec![(3, 4), (4, 5)]);
    assert!(all_edges_equal(&out.result, 1e-9));

    let back = run(Operation::Shorten, &out.result, &OpOptions::new());
    assert_eq!(counts(&back.result), (5, 5));
    assert_eq!(face_census(&back.result), face_census(&pyramid));
}

#[test]
fn gyroelongate_and_shorten_round_trip() {
    for twist in [Twist::Left, Twist::Right] {
        let out = run(Operation::Gyroelongate, &square_pyramid(), &OpOptions::new().twist(twist));
        assert_eq!(counts(&out.result), (9, 13));
        assert_eq!(face_census(&out.result), vec![(3, 12), (4, 1)]);
        assert!(all_edges_equal(&out.result, 1e-9));
        assert!(is_convex(&out.result, 1e-9));

        let back = run(Operation::Shorten, &out.result, &OpOptions::new());
        assert_eq!(counts(&back.result), (5, 5));
    }
}

#[test]
fn shorten_needs_a_band() {
    assert!(matches!(
        operate(Operation::Shorten, &dodecahedron(), &OpOptions::new()),
        Err(Error::Classification { .. })
    ));
}

#[test]
fn shorten_leaves_bare_prisms_alone() {
    for p in [cube(), prism(6), octahedron(), tetrahedron()] {
        assert!(matches!(
            operate(Operation::Shorten, &p, &OpOptions::new()),
            Err(Error::Classification { .. })
        ));
    }
}

#[test]
fn augment_then_diminish_restores_counts() {
    let c = cube();
    let out = run(Operation::Augment, &c, &OpOptions::new());
    assert_eq!(counts(&out.result), (9, 9));
    assert_eq!(face_census(&out.result), vec![(3, 4), (4, 5)]);
    assert!(all_edges_equal(&out.result, 1e-9));
    // the cap rises out of the base face
    assert_eq!(out.animation_data.start.num_vertices(), 9);

    let back = run(Operation::Diminish, &out.result, &OpOptions::new());
    assert_eq!(counts(&back.result), (8, 6));
    assert_eq!(face_census(&back.result), vec![(4, 6)]);
}

#[test]
fn augment_a_hexagon_with_a_cupola() {
    let p = prism(6);
    for gyrate in [Gyrate::Ortho, Gyrate::Gyro] {
        let options = OpOptions::new().face_type(6).gyrate(gyrate);
        let out = run(Operation::Augment, &p, &options);
        assert_eq!(counts(&out.result), (15, 14));
        let back = run(Operation::Diminish, &out.result, &OpOptions::new().using(Using::Cupola(3)));
        assert_eq!(counts(&back.result), counts(&p));
    }
}

#[test]
fn augment_option_mismatches() {
    let c = cube();
    assert!(matches!(
        operate(Operation::Augment, &c, &OpOptions::new().face_type(5)),
        Err(Error::InvalidOption { .. })
    ));
    assert!(matches!(
        operate(Operation::Augment, &c, &OpOptions::new().using(Using::Pyramid(3))),
        Err(Error::InvalidOption { .. })
    ));
    assert!(matches!(
        operate(Operation::Augment, &c, &OpOptions::new().face(99)),
        Err(Error::InvalidOption { .. })
    ));
    // a decagon takes either a pentagonal cupola or a rotunda
    assert!(matches!(
        operate(Operation::Augment, &prism(10), &OpOptions::new().face_type(10)),
        Err(Error::Ambiguous { .. })
    ));
}

#[test]
fn diminish_icosahedron() {
    let out = run(Operation::Diminish, &icosahedron(), &OpOptions::new().using(Using::Pyramid(5)));
    assert_eq!(counts(&out.result), (11, 16));
    assert_eq!(face_census(&out.result), vec![(3, 15), (5, 1)]);
}

#[test]
fn diminish_without_a_cap_fails() {
    assert!(matches!(
        operate(Operation::Diminish, &cube(), &OpOptions::new()),
        Err(Error::Classification { .. })
    ));
}

#[test]
fn gyrate_turns_a_gyrobicupola_into_an_orthobicupola() {
    let c = cuboctahedron();
    assert!(!has_adjacent_triangles(&c));
    for direction in [Direction::Forward, Direction::Back] {
        let out = run(Operation::Gyrate, &c, &OpOptions::new().direction(direction));
        assert_eq!(counts(&out.result), (12, 14));
        assert_eq!(face_census(&out.result), vec![(3, 8), (4, 6)]);
        assert!(all_edges_equal(&out.result, 1e-9));
        assert!(has_adjacent_triangles(&out.result));
    }
}

#[test]
fn gyrate_rejects_pyramids() {
    assert!(operate(Operation::Gyrate, &square_pyramid(), &OpOptions::new()).is_err());
}

#[test]
fn seeded_scaled_duals() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..5 {
        let scale: f64 = rng.gen_range(0.2..5.0);
        let shift = Vec3::new(rng.gen_range(-3.0..3.0), rng.gen_range(-3.0..3.0), rng.gen_range(-3.0..3.0));
        let d = dodecahedron().map_vertices(|(_, p)| p * scale + shift);
        let out = run(Operation::Dual, &d, &OpOptions::new());
        assert_eq!(counts(&out.result), (12, 20));
        assert!(all_edges_equal(&out.result, 1e-6));
    }
}

/// An input and options that `op` accepts.
fn accepted_input(op: Operation) -> (Polyhedron, OpOptions) {
    match op {
        Operation::Cumulate => (cuboctahedron(), OpOptions::new().face_type(3)),
        Operation::Contract => (rhombicuboctahedron(), OpOptions::new().face_type(4)),
        Operation::Elongate | Operation::Gyroelongate => (square_pyramid(), OpOptions::new()),
        Operation::Shorten => {
            let elongated = operate(Operation::Elongate, &square_pyramid(), &OpOptions::new()).unwrap();
            (elongated.result, OpOptions::new())
        }
        Operation::Diminish => (icosahedron(), OpOptions::new()),
        Operation::Gyrate => (cuboctahedron(), OpOptions::new()),
        _ => (cube(), OpOptions::new()),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn operators_are_deterministic(
        scale in 0.5f64..3.0,
        shift in proptest::array::uniform3(-5.0f64..5.0),
    ) {
        let shift = Vec3::from(shift);
        for op in Operation::ALL {
            let (p, options) = accepted_input(op);
            let p = p.map_vertices(|(_, v)| v * scale + shift);
            let first = operate(op, &p, &options).unwrap().result;
            let second = operate(op, &p, &options).unwrap().result;
            prop_assert_eq!(first.faces(), second.faces());
            prop_assert_eq!(first.num_vertices(), second.num_vertices());
            for (a, b) in first.vertices().iter().zip(second.vertices()) {
                prop_assert!((a - b).norm() < PRECISION, "{op}: {a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn operators_ignore_rigid_motion(
        axis in proptest::array::uniform3(-1.0f64..1.0),
        angle in 0.0f64..std::f64::consts::TAU,
        shift in proptest::array::uniform3(-5.0f64..5.0),
    ) {
        let axis = Vec3::from(axis);
        prop_assume!(axis.norm() > 1e-3);
        let rotation = Rotation3::from_axis_angle(&Unit::new_normalize(axis), angle);
        let shift = Vec3::from(shift);
        let moved = cube().map_vertices(|(_, p)| rotation * p + shift);

        for op in [Operation::Truncate, Operation::Expand, Operation::Dual, Operation::Augment] {
            let plain = operate(op, &cube(), &OpOptions::new()).unwrap().result;
            let out = operate(op, &moved, &OpOptions::new()).unwrap().result;
            prop_assert_eq!(counts(&out), counts(&plain));
            prop_assert_eq!(face_census(&out), face_census(&plain));
            prop_assert!(all_edges_equal(&out, 1e-6));
        }
    }
}
