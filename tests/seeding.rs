//! Integration tests for seeding policies and standard seed placement.

use bracket_engine::{
    assign_seeds, standard_seed_order, Participant, ParticipantId, SeedingPolicy, SeedAssignment,
    TournamentError,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_roster(n: usize) -> Vec<Participant> {
    (0..n)
        .map(|i| Participant::new(format!("P{i}")).with_seed(i as u32 + 1))
        .collect()
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

#[test]
fn rejects_fewer_than_two_participants() {
    let roster = seeded_roster(1);
    assert_eq!(
        assign_seeds(&roster, &SeedingPolicy::Random, &mut rng()),
        Err(TournamentError::InsufficientParticipants { count: 1 })
    );
    assert_eq!(
        assign_seeds(&[], &SeedingPolicy::Ranked, &mut rng()),
        Err(TournamentError::InsufficientParticipants { count: 0 })
    );
}

#[test]
fn random_is_a_permutation_and_reproducible_with_same_rng() {
    let roster = seeded_roster(12);
    let a = assign_seeds(&roster, &SeedingPolicy::Random, &mut rng()).unwrap();
    let b = assign_seeds(&roster, &SeedingPolicy::Random, &mut rng()).unwrap();
    assert_eq!(a, b);

    let mut sorted = a.clone();
    sorted.sort();
    let mut expected: Vec<ParticipantId> = roster.iter().map(|p| p.id).collect();
    expected.sort();
    assert_eq!(sorted, expected);
}

#[test]
fn ranked_sorts_by_seed_with_unseeded_last_in_roster_order() {
    let a = Participant::new("A").with_seed(3);
    let b = Participant::new("B");
    let c = Participant::new("C").with_seed(1);
    let d = Participant::new("D");
    let e = Participant::new("E").with_seed(2);
    let roster = vec![a.clone(), b.clone(), c.clone(), d.clone(), e.clone()];

    let order = assign_seeds(&roster, &SeedingPolicy::Ranked, &mut rng()).unwrap();
    assert_eq!(order, vec![c.id, e.id, a.id, b.id, d.id]);
}

#[test]
fn manual_accepts_a_bijection() {
    let roster = seeded_roster(3);
    let policy = SeedingPolicy::Manual {
        assignments: vec![
            SeedAssignment { participant_id: roster[0].id, seed: 2 },
            SeedAssignment { participant_id: roster[1].id, seed: 0 },
            SeedAssignment { participant_id: roster[2].id, seed: 1 },
        ],
    };
    let order = assign_seeds(&roster, &policy, &mut rng()).unwrap();
    assert_eq!(order, vec![roster[1].id, roster[2].id, roster[0].id]);
}

#[test]
fn manual_rejects_duplicate_participant() {
    let roster = seeded_roster(2);
    let policy = SeedingPolicy::Manual {
        assignments: vec![
            SeedAssignment { participant_id: roster[0].id, seed: 0 },
            SeedAssignment { participant_id: roster[0].id, seed: 1 },
        ],
    };
    assert!(matches!(
        assign_seeds(&roster, &policy, &mut rng()),
        Err(TournamentError::InvalidSeeding(_))
    ));
}

#[test]
fn manual_rejects_bad_seeds_and_unknown_participants() {
    let roster = seeded_roster(2);
    let stranger = Participant::new("Stranger");

    let cases = vec![
        // wrong count
        vec![SeedAssignment { participant_id: roster[0].id, seed: 0 }],
        // out of range
        vec![
            SeedAssignment { participant_id: roster[0].id, seed: 0 },
            SeedAssignment { participant_id: roster[1].id, seed: 2 },
        ],
        // same seed twice
        vec![
            SeedAssignment { participant_id: roster[0].id, seed: 1 },
            SeedAssignment { participant_id: roster[1].id, seed: 1 },
        ],
        // not registered
        vec![
            SeedAssignment { participant_id: roster[0].id, seed: 0 },
            SeedAssignment { participant_id: stranger.id, seed: 1 },
        ],
    ];
    for assignments in cases {
        let policy = SeedingPolicy::Manual { assignments };
        assert!(matches!(
            assign_seeds(&roster, &policy, &mut rng()),
            Err(TournamentError::InvalidSeeding(_))
        ));
    }
}

#[test]
fn standard_order_pairs_top_against_bottom() {
    assert_eq!(standard_seed_order(2), vec![1, 2]);
    assert_eq!(standard_seed_order(4), vec![1, 4, 2, 3]);
    assert_eq!(standard_seed_order(8), vec![1, 8, 4, 5, 2, 7, 3, 6]);
}

#[test]
fn standard_order_keeps_top_four_in_separate_quarters() {
    let order = standard_seed_order(16);
    let quarter_of = |seed: usize| order.iter().position(|&s| s == seed).unwrap() / 4;
    let mut quarters: Vec<usize> = (1..=4).map(quarter_of).collect();
    quarters.sort();
    assert_eq!(quarters, vec![0, 1, 2, 3]);
    // 1 and 2 in opposite halves
    assert_ne!(quarter_of(1) / 2, quarter_of(2) / 2);
}

#[test]
fn seeding_policy_json_shape() {
    let ranked: SeedingPolicy = serde_json::from_str(r#"{"policy":"ranked"}"#).unwrap();
    assert_eq!(ranked, SeedingPolicy::Ranked);
    let manual: SeedingPolicy = serde_json::from_str(
        r#"{"policy":"manual","assignments":[
            {"participant_id":"6f1c1b8e-3d59-4a8e-9a3c-2f0b8d3f9a11","seed":0}
        ]}"#,
    )
    .unwrap();
    assert!(matches!(manual, SeedingPolicy::Manual { ref assignments } if assignments.len() == 1));
}
