//! End-to-end scenarios driven through `MatchSession`.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use matchday_core::AggregateId;
use matchday_match::{
    Attribution, ClockState, EventKind, Fixture, HomeAway, LineupEntry, MatchId, MatchSession,
    MatchTime, Participant, PeriodKind, RemovalConfirmation, FULL_FEED_LEN,
};
use matchday_roster::PlayerId;

struct Squad {
    session: MatchSession,
    starters: Vec<PlayerId>,
    bench: Vec<PlayerId>,
}

fn player() -> PlayerId {
    PlayerId::new(AggregateId::new())
}

fn kicked_off() -> Squad {
    let mut session = MatchSession::new(MatchId::new(AggregateId::new()));
    session
        .schedule(Fixture {
            opponent: "US Valle".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 4, 6).unwrap(),
            time: None,
            location: Some("Stadio Comunale".to_string()),
            field: Some("B".to_string()),
            home_away: HomeAway::Home,
        })
        .unwrap();

    let starters: Vec<PlayerId> = (0..3).map(|_| player()).collect();
    let bench = vec![player(), player()];
    session
        .set_lineup(
            starters
                .iter()
                .zip([1, 5, 9])
                .map(|(p, n)| LineupEntry {
                    player_id: *p,
                    jersey_number: n,
                    position: None,
                })
                .collect(),
            bench.clone(),
            vec![3, 8, 11],
            BTreeMap::from([(bench[0], 12), (bench[1], 16)]),
        )
        .unwrap();
    session.start().unwrap();

    Squad {
        session,
        starters,
        bench,
    }
}

#[test]
fn goal_after_125_seconds_is_stamped_2_05() {
    let Squad {
        mut session,
        starters,
        ..
    } = kicked_off();
    session.advance(125).unwrap();
    session
        .record_goal(
            Attribution::Own,
            Some(Participant::Player {
                player_id: starters[2],
            }),
            None,
        )
        .unwrap();

    let state = session.state();
    assert_eq!(state.home_score(), 1);
    assert_eq!(state.away_score(), 0);
    assert_eq!(state.events().len(), 1);
    assert_eq!(state.events()[0].kind, EventKind::Goal);
    assert_eq!(state.events()[0].time, MatchTime { minute: 2, second: 5 });
}

#[test]
fn removing_one_event_keeps_the_others_and_the_score() {
    let Squad {
        mut session,
        starters,
        ..
    } = kicked_off();
    let goal = session
        .record_goal(
            Attribution::Own,
            Some(Participant::Player {
                player_id: starters[0],
            }),
            None,
        )
        .unwrap();
    session.advance(3).unwrap();
    let card = session
        .record_card(
            EventKind::YellowCard,
            Some(Participant::Opponent { jersey: Some(8) }),
            None,
        )
        .unwrap();
    session.advance(3).unwrap();
    let foul = session
        .record_other_event(EventKind::Foul, Some(Attribution::Opponent), "")
        .unwrap();

    session.remove_event(card).unwrap();

    let ids: Vec<_> = session.state().events().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![goal, foul]);
    assert_eq!(session.state().home_score(), 1);

    // Unknown ids change nothing.
    let before = session.history().len();
    session.remove_event(card).unwrap();
    assert_eq!(session.history().len(), before);
}

#[test]
fn removing_the_goal_entry_keeps_the_score() {
    let Squad {
        mut session,
        starters,
        ..
    } = kicked_off();
    session.advance(125).unwrap();
    let goal = session
        .record_goal(
            Attribution::Own,
            Some(Participant::Player {
                player_id: starters[1],
            }),
            None,
        )
        .unwrap();
    assert_eq!(session.state().events()[0].time.to_string(), "2:05");

    session.remove_event(goal).unwrap();

    let state = session.state();
    assert!(state.events().is_empty());
    assert_eq!(state.home_score(), 1);
    assert_eq!(state.totals().own_goals, 0);
}

#[test]
fn remove_last_period_follows_confirmation_rules() {
    let Squad { mut session, .. } = kicked_off();

    let err = session
        .remove_last_period(RemovalConfirmation::SkipConfirmation)
        .unwrap_err();
    assert_eq!(err.message(), "cannot remove the only period");

    session.advance(10).unwrap();
    session.add_period(PeriodKind::Extra, None).unwrap();
    assert_eq!(session.state().periods().len(), 2);
    assert_eq!(session.state().clock(), ClockState::Running { period: 1 });

    assert!(session.remove_last_period(RemovalConfirmation::Pending).is_err());
    assert!(session.last_error().is_some());

    session
        .remove_last_period(RemovalConfirmation::Confirmed)
        .unwrap();
    assert_eq!(session.state().periods().len(), 1);
    assert_eq!(session.state().clock(), ClockState::Running { period: 0 });
    assert_eq!(session.state().current_time().to_string(), "0:10");
}

#[test]
fn full_match_with_interval_and_substitution() {
    let Squad {
        mut session,
        starters,
        bench,
    } = kicked_off();

    session.advance(20 * 60).unwrap();
    let sub = session.substitute(starters[1], bench[1], None, None).unwrap();
    let foul = session
        .record_other_event(EventKind::Foul, Some(Attribution::Own), "")
        .unwrap();
    session.enter_interval().unwrap();

    // Nothing can be recorded or removed during the interval.
    assert!(session
        .record_other_event(EventKind::Corner, None, "late corner")
        .is_err());
    assert!(session.remove_substitution(sub).is_err());
    assert!(session.remove_event(foul).is_err());
    assert_eq!(session.state().events().len(), 1);
    assert!(session.remove_goal(Attribution::Own).is_err());
    assert_eq!(session.advance(30).unwrap(), 0);

    session.add_period(PeriodKind::Regular, None).unwrap();
    session.remove_event(foul).unwrap();
    session.start().unwrap();
    session.advance(5 * 60).unwrap();
    session
        .record_goal(
            Attribution::Opponent,
            Some(Participant::Opponent { jersey: Some(11) }),
            None,
        )
        .unwrap();
    session.finish().unwrap();

    let state = session.state();
    assert_eq!(state.clock(), ClockState::Finished);
    assert_eq!((state.home_score(), state.away_score()), (0, 1));
    assert_eq!(state.playing_time(), 25 * 60);
    assert_eq!(state.players_on_field(), vec![starters[0], bench[1], starters[2]]);
    assert_eq!(state.substitutions()[0].player_in_jersey.number(), Some(16));

    let kinds: Vec<&str> = state
        .recent_activity(FULL_FEED_LEN)
        .iter()
        .map(|a| a.kind_name())
        .collect();
    // Times are per period: the 20:00 substitution sorts above the 5:00 goal.
    assert_eq!(kinds, vec!["substitution", "goal"]);

    assert!(session.start().is_err());
    assert_eq!(
        session.last_error().map(|e| e.message()),
        Some("the match is finished")
    );
}
