use hilltop::feed::HillEvent;
use hilltop::testing::TestHill;
use hilltop::types::Window;
use tokio_stream::StreamExt;

/// Durations of the entries in one window, longest first.
fn durations(hill: &TestHill, window: Window) -> Vec<f64> {
    hill.orchestrator
        .leaderboard(window)
        .iter()
        .map(|e| e.duration_secs)
        .collect()
}

#[tokio::test]
async fn successive_reigns_fill_the_board_ranked() {
    let hill = TestHill::new();

    // Each holder reigns a bit shorter than the one before.
    hill.submit("h0").await.unwrap();
    for (i, secs) in [500, 400, 300, 200, 100].iter().enumerate() {
        hill.advance_secs(*secs);
        hill.submit(&format!("h{}", i + 1)).await.unwrap();
    }

    assert_eq!(
        durations(&hill, Window::AllTime),
        [500.0, 400.0, 300.0, 200.0, 100.0]
    );
    // All reigns are fresh, so the timed windows agree.
    assert_eq!(
        durations(&hill, Window::Last7Days),
        durations(&hill, Window::AllTime)
    );
}

#[tokio::test]
async fn beating_the_minimum_on_a_full_board_evicts_it() {
    let hill = TestHill::new();

    hill.submit("h0").await.unwrap();
    for (i, secs) in [500, 400, 300, 200, 100].iter().enumerate() {
        hill.advance_secs(*secs);
        hill.submit(&format!("h{}", i + 1)).await.unwrap();
    }

    // The sixth reign lasts 150s: longer than the current minimum of 100.
    hill.advance_secs(150);
    let outcome = hill.submit("X").await.unwrap();

    assert_eq!(outcome.closed.unwrap().accepted, Window::ALL);
    assert_eq!(
        durations(&hill, Window::AllTime),
        [500.0, 400.0, 300.0, 200.0, 150.0]
    );
    // The evicted entry is gone from the store too.
    assert_eq!(hill.board.len(), 5);
}

#[tokio::test]
async fn short_reign_bounces_off_a_full_board() {
    let hill = TestHill::new();

    hill.submit("h0").await.unwrap();
    for (i, secs) in [500, 400, 300, 200, 100].iter().enumerate() {
        hill.advance_secs(*secs);
        hill.submit(&format!("h{}", i + 1)).await.unwrap();
    }

    // A 50s reign cannot beat the minimum of 100.
    hill.advance_secs(50);
    let outcome = hill.submit("Y").await.unwrap();

    assert!(outcome.closed.unwrap().accepted.is_empty());
    assert_eq!(
        durations(&hill, Window::AllTime),
        [500.0, 400.0, 300.0, 200.0, 100.0]
    );
    assert_eq!(hill.board.len(), 5);
}

#[tokio::test]
async fn leaderboard_query_is_idempotent() {
    let hill = TestHill::new();
    hill.submit("Alice").await.unwrap();
    hill.advance_secs(120);
    hill.submit("Bob").await.unwrap();

    let first = hill.orchestrator.leaderboard(Window::AllTime);
    let second = hill.orchestrator.leaderboard(Window::AllTime);
    assert_eq!(first, second);
}

#[tokio::test]
async fn watch_reigns_streams_every_transition() {
    let hill = TestHill::new();
    let mut watch = hill.orchestrator.watch_reigns().await.unwrap();

    hill.submit("Alice").await.unwrap();
    hill.advance_secs(10);
    hill.submit("Bob").await.unwrap();

    assert_eq!(watch.next().await.unwrap().holder_name, "Alice");
    assert_eq!(watch.next().await.unwrap().holder_name, "Bob");
}

#[tokio::test]
async fn feed_reports_each_windows_post_change_ranking() {
    let hill = TestHill::new();
    hill.submit("Alice").await.unwrap();
    hill.advance_secs(300);

    let (_sub, mut rx) = hill.orchestrator.subscribe();
    hill.submit("Bob").await.unwrap();

    let mut board_events = 0;
    while let Ok(event) = rx.try_recv() {
        if let HillEvent::BoardChanged { entries, .. } = event {
            board_events += 1;
            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].holder_name, "Alice");
            assert_eq!(entries[0].duration_secs, 300.0);
        }
    }
    assert_eq!(board_events, 3);
}

#[tokio::test]
async fn cancelled_subscriber_misses_later_mutations() {
    let hill = TestHill::new();
    let (sub, mut rx) = hill.orchestrator.subscribe();

    hill.submit("Alice").await.unwrap();
    sub.cancel();
    hill.advance_secs(10);
    hill.submit("Bob").await.unwrap();

    let mut seen = Vec::new();
    while let Ok(event) = rx.try_recv() {
        seen.push(event);
    }
    assert_eq!(seen.len(), 1);
    assert!(matches!(&seen[0], HillEvent::ReignChanged { reign, .. } if reign.holder_name == "Alice"));
}
