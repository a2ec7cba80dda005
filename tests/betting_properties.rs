use poker_rounds::agents::PolicyTable;
use poker_rounds::betting::BettingRound;
use poker_rounds::config::TableConfig;
use poker_rounds::engine::{NullObserver, TableView};
use poker_rounds::game::{Street, Table};
use poker_rounds::participant::{Participant, Strategy as Style};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn any_bot() -> impl Strategy<Value = Style> {
    prop_oneof![Just(Style::Aggressive), Just(Style::Cautious), Just(Style::Erratic)]
}

fn any_seats() -> impl Strategy<Value = Vec<(Style, u64)>> {
    prop::collection::vec((any_bot(), 0u64..400), 2..7)
}

fn build(seats: &[(Style, u64)]) -> Vec<Participant> {
    seats
        .iter()
        .enumerate()
        .map(|(i, &(style, stack))| Participant::new(format!("bot{i}"), style, stack))
        .collect()
}

fn bots_only(participants: &[Participant], config: &TableConfig) -> PolicyTable {
    PolicyTable::for_participants(participants, config, |_| unreachable!("bots only"))
}

proptest! {
    #[test]
    fn a_round_conserves_chips_and_matches_bets(
        seats in any_seats(),
        start in 0usize..6,
        min_bet in 0u64..60,
        seed in any::<u64>(),
    ) {
        let config = TableConfig::default();
        let mut ps = build(&seats);
        let before: u64 = ps.iter().map(Participant::stack).sum();
        let mut pols = bots_only(&ps, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let out = BettingRound::new(Street::Preflop, start % ps.len(), min_bet)
            .run(&mut ps, 0, &mut pols, &mut rng, &mut NullObserver)
            .unwrap();

        let after: u64 = ps.iter().map(Participant::stack).sum();
        prop_assert_eq!(after + out.pot, before);
        let paid: u64 = out.actions.iter().map(|a| a.paid).sum();
        prop_assert_eq!(paid, out.pot);
        for p in &ps {
            if p.can_act() {
                prop_assert_eq!(p.contribution(), out.highest_bet);
            }
            if !p.is_folded() {
                prop_assert!(p.contribution() <= out.highest_bet);
            }
        }
    }

    #[test]
    fn a_hand_conserves_chips(seats in any_seats(), seed in any::<u64>()) {
        let config = TableConfig::default();
        let ps = build(&seats);
        let before: u64 = ps.iter().map(Participant::stack).sum();
        let mut table = Table::with_participants(config, ps).unwrap();
        let mut pols = table.policies(|_| unreachable!("bots only"));
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let result = table.play_hand(&mut pols, &mut rng, &mut NullObserver).unwrap();

        let after: u64 = table.participants().iter().map(Participant::stack).sum();
        prop_assert_eq!(after, before);
        prop_assert_eq!(table.pot(), 0);
        if let Some(w) = result.winner {
            prop_assert!(!table.participants()[w].is_folded());
        }
        prop_assert!(table.community().len() <= 5);
    }
}
