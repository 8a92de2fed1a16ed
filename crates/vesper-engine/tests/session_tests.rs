//! Integration tests for multi-level sessions and scoreboard reporting.

use vesper_engine::prelude::*;

const DT: f64 = 1.0 / 60.0;

/// A level whose goal sits under the player's spawn: cleared on frame one.
fn instant(name: &str) -> LevelLayout {
    LevelLayout::new(name, GameMode::TopDown, Vec2::ZERO).with_static(StaticKind::Goal, 0.0, 0.0, 32.0, 32.0)
}

fn session(levels: Vec<LevelLayout>) -> Session<MemoryScoreboard> {
    Session::new("ada", levels, EngineConfig::default(), MemoryScoreboard::new()).unwrap()
}

#[test]
fn clearing_every_level_reports_once() {
    let mut session = session(vec![instant("one"), instant("two"), instant("three")]);

    let mut names = Vec::new();
    while session.state() == SessionState::Playing {
        names.push(session.current().layout().name.clone());
        session.update(DT, &ControlIntents::idle()).unwrap();
    }
    assert_eq!(names, ["one", "two", "three"]);
    assert_eq!(session.level_index(), 2);
    assert_eq!(session.elapsed_playtime(), DT + DT + DT);

    let entries = session.scoreboard().entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "ada");
    assert_eq!(entries[0].elapsed_playtime, DT + DT + DT);

    // Finished sessions ignore further play.
    session.update(DT, &ControlIntents::idle()).unwrap();
    assert_eq!(session.scoreboard().entries().len(), 1);
    assert_eq!(session.elapsed_playtime(), DT + DT + DT);
}

#[test]
fn game_over_ends_the_run() {
    let deadly = LevelLayout::new("pit", GameMode::TopDown, Vec2::ZERO)
        .with_static(StaticKind::Spike { damage: 500.0 }, 0.0, 0.0, 32.0, 32.0);
    let mut session = session(vec![deadly, instant("never")]);

    let report = session.update(DT, &ControlIntents::idle()).unwrap();
    assert_eq!(report.state, LevelState::GameOver);
    assert_eq!(session.state(), SessionState::Finished);
    assert_eq!(session.level_index(), 0);
    assert_eq!(session.scoreboard().entries().len(), 1);
}

#[test]
fn inventory_carries_into_the_next_level() {
    let first = LevelLayout::new("store", GameMode::TopDown, Vec2::ZERO)
        .with_static(StaticKind::Potion { heal: 30.0 }, 8.0, 8.0, 16.0, 16.0)
        .with_static(StaticKind::Goal, 60.0, 0.0, 16.0, 32.0);
    let mut session = session(vec![first, instant("next")]);

    let mut script = ScriptedIntents::default().then(ControlIntents::moving(Vec2::RIGHT), 600);
    // Stop as soon as the second level is up.
    while session.level_index() == 0 {
        let intents = script.next_intents(session.current().frame());
        session.update(DT, &intents).unwrap();
    }
    let player = session.current().player().as_player().unwrap();
    assert_eq!(player.inventory.len(), 1);
    assert_eq!(session.current().frame(), 0);
    assert_eq!(session.current().state(), LevelState::Running);
}

#[test]
fn run_stops_when_finished() {
    let mut session = session(vec![instant("one")]);
    let mut idle = ScriptedIntents::default();
    assert_eq!(session.run(DT, &mut idle, 100).unwrap(), SessionState::Finished);
    assert_eq!(session.current().frame(), 1);

    let board = session.into_scoreboard();
    assert_eq!(board.top(1)[0].score, 0);
}

#[test]
fn scoreboard_ranks_runs() {
    let mut board = MemoryScoreboard::new();
    for (name, score, time) in [("slow", 500, 80.0), ("fast", 500, 40.0), ("low", 100, 10.0)] {
        board.submit(ScoreEntry {
            name: name.to_owned(),
            elapsed_playtime: time,
            score,
        });
    }
    let ranked: Vec<_> = board.entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(ranked, ["fast", "slow", "low"]);
}
