//! Integration tests for bracket building: padding, byes, linkage, regeneration.

use bracket_engine::{
    generate_bracket, pad_slots, record_result, Match, MatchStatus, Participant, ParticipantId,
    SeedAssignment, SeedingPolicy, Tournament, TournamentError, TournamentFormat,
    TournamentStatus,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn tournament_with_participants(n: usize) -> Tournament {
    let participants: Vec<Participant> = (0..n)
        .map(|i| Participant::new(format!("P{}", i + 1)).with_seed(i as u32 + 1))
        .collect();
    let mut t = Tournament::with_participants("Spring Open", n.max(2), participants);
    t.status = TournamentStatus::Open;
    t
}

fn seed_id(t: &Tournament, seed: u32) -> ParticipantId {
    t.participants.iter().find(|p| p.seed == Some(seed)).unwrap().id
}

fn at(t: &Tournament, round: u32, position: u32) -> &Match {
    t.matches
        .iter()
        .find(|m| m.round == round && m.bracket_position == position)
        .unwrap()
}

fn build(t: &mut Tournament, policy: &SeedingPolicy) {
    generate_bracket(t, policy, &mut StdRng::seed_from_u64(1)).unwrap();
}

#[test]
fn five_ranked_participants_give_byes_to_top_three_seeds() {
    let mut t = tournament_with_participants(5);
    build(&mut t, &SeedingPolicy::Ranked);

    assert_eq!(t.status, TournamentStatus::InProgress);
    assert_eq!(t.matches.len(), 7);
    assert_eq!(t.total_rounds(), 3);

    let round1: Vec<&Match> = t.matches.iter().filter(|m| m.round == 1).collect();
    assert_eq!(round1.len(), 4);
    let byes: Vec<&&Match> = round1.iter().filter(|m| m.is_bye).collect();
    assert_eq!(byes.len(), 3);
    for m in &byes {
        assert_eq!(m.status, MatchStatus::Bye);
        assert!(m.winner_id.is_some());
    }
    let mut bye_winners: Vec<ParticipantId> = byes.iter().filter_map(|m| m.winner_id).collect();
    bye_winners.sort();
    let mut top_three = vec![seed_id(&t, 1), seed_id(&t, 2), seed_id(&t, 3)];
    top_three.sort();
    assert_eq!(bye_winners, top_three);

    let real = at(&t, 1, 1);
    assert!(!real.is_bye);
    assert!(real.winner_id.is_none());
    assert_eq!(real.participant1_id, Some(seed_id(&t, 4)));
    assert_eq!(real.participant2_id, Some(seed_id(&t, 5)));
    assert_eq!(real.status, MatchStatus::Scheduled);
}

#[test]
fn byes_are_propagated_at_build_time() {
    let mut t = tournament_with_participants(5);
    build(&mut t, &SeedingPolicy::Ranked);

    // Seed 1 waits for the 4 v 5 winner.
    let top = at(&t, 2, 0);
    assert_eq!(top.participant1_id, Some(seed_id(&t, 1)));
    assert_eq!(top.participant2_id, None);
    assert_eq!(top.status, MatchStatus::Pending);

    // Seeds 2 and 3 both had byes and already face each other.
    let bottom = at(&t, 2, 1);
    assert_eq!(bottom.participant1_id, Some(seed_id(&t, 2)));
    assert_eq!(bottom.participant2_id, Some(seed_id(&t, 3)));
    assert_eq!(bottom.status, MatchStatus::Scheduled);

    let final_match = at(&t, 3, 0);
    assert_eq!(final_match.status, MatchStatus::Pending);
    assert!(final_match.next_match_id.is_none());
}

#[test]
fn power_of_two_roster_has_no_byes() {
    let mut t = tournament_with_participants(8);
    build(&mut t, &SeedingPolicy::Ranked);
    assert_eq!(t.matches.len(), 7);
    assert!(t.matches.iter().all(|m| !m.is_bye));
    for m in t.matches.iter().filter(|m| m.round == 1) {
        assert_eq!(m.status, MatchStatus::Scheduled);
    }
    for m in t.matches.iter().filter(|m| m.round > 1) {
        assert_eq!(m.status, MatchStatus::Pending);
        assert!(m.participant1_id.is_none() && m.participant2_id.is_none());
    }
    // 1 v 8 opens the bracket
    let first = at(&t, 1, 0);
    assert_eq!(first.participant1_id, Some(seed_id(&t, 1)));
    assert_eq!(first.participant2_id, Some(seed_id(&t, 8)));
}

#[test]
fn three_participants_top_seed_waits_in_final() {
    let mut t = tournament_with_participants(3);
    build(&mut t, &SeedingPolicy::Ranked);
    assert_eq!(t.matches.len(), 3);
    let final_match = at(&t, 2, 0);
    assert_eq!(final_match.participant1_id, Some(seed_id(&t, 1)));
    assert_eq!(final_match.status, MatchStatus::Pending);
}

#[test]
fn match_numbers_are_sequential_and_linkage_points_to_next_round() {
    let mut t = tournament_with_participants(11);
    build(&mut t, &SeedingPolicy::Random);

    let numbers: Vec<u32> = t.matches.iter().map(|m| m.match_number).collect();
    assert_eq!(numbers, (1..=15).collect::<Vec<u32>>());

    let finals: Vec<&Match> = t.matches.iter().filter(|m| m.is_final()).collect();
    assert_eq!(finals.len(), 1);
    assert_eq!(finals[0].round, 4);

    for m in t.matches.iter().filter(|m| !m.is_final()) {
        let next = t.get_match(m.next_match_id.unwrap()).unwrap();
        assert_eq!(next.round, m.round + 1);
        assert_eq!(next.bracket_position, m.bracket_position / 2);
    }
}

#[test]
fn ranked_and_manual_builds_are_deterministic() {
    let shape = |t: &Tournament| -> Vec<(u32, u32, Option<ParticipantId>, Option<ParticipantId>)> {
        t.matches
            .iter()
            .map(|m| (m.round, m.bracket_position, m.participant1_id, m.participant2_id))
            .collect()
    };

    let mut t = tournament_with_participants(6);
    build(&mut t, &SeedingPolicy::Ranked);
    let first = shape(&t);
    generate_bracket(&mut t, &SeedingPolicy::Ranked, &mut StdRng::seed_from_u64(99)).unwrap();
    assert_eq!(shape(&t), first);

    let manual = SeedingPolicy::Manual {
        assignments: t
            .participants
            .iter()
            .rev()
            .enumerate()
            .map(|(seed, p)| SeedAssignment { participant_id: p.id, seed })
            .collect(),
    };
    generate_bracket(&mut t, &manual, &mut StdRng::seed_from_u64(3)).unwrap();
    let manual_first = shape(&t);
    generate_bracket(&mut t, &manual, &mut StdRng::seed_from_u64(4)).unwrap();
    assert_eq!(shape(&t), manual_first);
    // Last registered is now the top seed.
    assert_eq!(at(&t, 1, 0).winner_id, Some(seed_id(&t, 6)));
}

#[test]
fn unplayed_bracket_is_rebuilt_from_current_roster() {
    let mut t = tournament_with_participants(4);
    build(&mut t, &SeedingPolicy::Ranked);
    let ids: Vec<_> = t.matches.iter().map(|m| m.id).collect();

    generate_bracket(&mut t, &SeedingPolicy::Ranked, &mut StdRng::seed_from_u64(1)).unwrap();
    assert_eq!(t.matches.len(), 3);
    assert!(t.matches.iter().all(|m| !ids.contains(&m.id)));
    assert_eq!(t.status, TournamentStatus::InProgress);
    assert!(t.matches.iter().all(Match::invariants_hold));
}

#[test]
fn played_result_blocks_rebuild() {
    let mut t = tournament_with_participants(4);
    build(&mut t, &SeedingPolicy::Ranked);
    let opener = at(&t, 1, 0).id;
    record_result(&mut t, opener, 2, 0).unwrap();
    let before = t.matches.clone();

    let err = generate_bracket(&mut t, &SeedingPolicy::Ranked, &mut StdRng::seed_from_u64(1));
    assert_eq!(err, Err(TournamentError::AlreadyInProgress));
    assert_eq!(t.matches, before);
}

#[test]
fn insufficient_participants_leaves_tournament_untouched() {
    let mut t = tournament_with_participants(1);
    let err = generate_bracket(&mut t, &SeedingPolicy::Random, &mut StdRng::seed_from_u64(1));
    assert_eq!(err, Err(TournamentError::InsufficientParticipants { count: 1 }));
    assert!(t.matches.is_empty());
    assert_eq!(t.status, TournamentStatus::Open);
}

#[test]
fn other_formats_have_no_builder() {
    let mut t = tournament_with_participants(4).with_format(TournamentFormat::RoundRobin);
    let err = generate_bracket(&mut t, &SeedingPolicy::Random, &mut StdRng::seed_from_u64(1));
    assert_eq!(err, Err(TournamentError::UnsupportedFormat(TournamentFormat::RoundRobin)));
    assert!(t.matches.is_empty());
}

#[test]
fn cancelled_tournament_cannot_build() {
    let mut t = tournament_with_participants(4);
    t.cancel().unwrap();
    let err = generate_bracket(&mut t, &SeedingPolicy::Random, &mut StdRng::seed_from_u64(1));
    assert_eq!(
        err,
        Err(TournamentError::InvalidState {
            actual: TournamentStatus::Cancelled
        })
    );
}

#[test]
fn pad_slots_never_pairs_two_placeholders() {
    for n in 2..=40usize {
        let ids: Vec<ParticipantId> = (0..n).map(|_| uuid::Uuid::new_v4()).collect();
        let slots = pad_slots(&ids);
        assert_eq!(slots.len(), n.next_power_of_two());
        assert_eq!(slots.iter().flatten().count(), n);
        for pair in slots.chunks_exact(2) {
            assert!(pair[0].is_some() || pair[1].is_some(), "n = {n}");
        }
    }
}

proptest! {
    #[test]
    fn bracket_shape_holds_for_any_roster(n in 2usize..=70, seed in any::<u64>()) {
        let mut t = tournament_with_participants(n);
        generate_bracket(&mut t, &SeedingPolicy::Random, &mut StdRng::seed_from_u64(seed)).unwrap();

        let size = n.next_power_of_two();
        prop_assert_eq!(t.matches.len(), size - 1);
        prop_assert_eq!(t.total_rounds(), size.trailing_zeros());
        for r in 1..=t.total_rounds() {
            let count = t.matches.iter().filter(|m| m.round == r).count();
            prop_assert_eq!(count, size >> r);
        }
        prop_assert_eq!(t.matches.iter().filter(|m| m.is_bye).count(), size - n);

        for m in &t.matches {
            prop_assert!(m.invariants_hold());
            if let (Some(w), Some(next)) = (m.winner_id, m.next_match_id) {
                let next = t.get_match(next).unwrap();
                prop_assert_eq!(next.participant(m.feeds_slot()), Some(w));
            }
        }
    }
}

#[test]
fn manual_seeds_are_placed_like_ranked_seeds() {
    let mut t = tournament_with_participants(4);
    let manual = SeedingPolicy::Manual {
        assignments: t
            .participants
            .iter()
            .enumerate()
            .map(|(seed, p)| SeedAssignment { participant_id: p.id, seed })
            .collect(),
    };
    let slots = |t: &Tournament| -> Vec<_> {
        t.matches.iter().map(|m| (m.participant1_id, m.participant2_id)).collect()
    };
    build(&mut t, &manual);
    let manual_slots = slots(&t);
    build(&mut t, &SeedingPolicy::Ranked);
    assert_eq!(slots(&t), manual_slots);

    // Seeds 0 and 1 open in different matches: 1 v 4 and 2 v 3.
    assert_eq!(at(&t, 1, 0).participant1_id, Some(seed_id(&t, 1)));
    assert_eq!(at(&t, 1, 0).participant2_id, Some(seed_id(&t, 4)));
    assert_eq!(at(&t, 1, 1).participant1_id, Some(seed_id(&t, 2)));
    assert_eq!(at(&t, 1, 1).participant2_id, Some(seed_id(&t, 3)));
}
