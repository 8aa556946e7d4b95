//! Property-based tests for the reconnect schedule and connection FSM.

use std::time::Duration;

use huddle_core::{Backoff, BackoffConfig, Connection, ConnectionAction, ConnectionState};
use proptest::prelude::*;

fn arbitrary_config() -> impl Strategy<Value = BackoffConfig> {
    (1u64..5_000, 1u64..60_000, 0.0f64..=1.0).prop_map(|(initial, max, jitter)| BackoffConfig {
        initial: Duration::from_millis(initial),
        max: Duration::from_millis(max),
        jitter,
    })
}

#[test]
fn prop_delay_never_exceeds_cap() {
    proptest!(|(config in arbitrary_config(), samples in prop::collection::vec(0.0f64..1.0, 1..64))| {
        let mut backoff = Backoff::new(config);
        for sample in samples {
            let delay = backoff.next_delay(sample);
            prop_assert!(delay <= config.max, "delay {:?} above cap {:?}", delay, config.max);
        }
    });
}

#[test]
fn prop_delay_grows_without_jitter() {
    proptest!(|(initial in 1u64..5_000, max in 1u64..120_000, steps in 1usize..32)| {
        let mut backoff = Backoff::new(BackoffConfig {
            initial: Duration::from_millis(initial),
            max: Duration::from_millis(max),
            jitter: 0.0,
        });

        let mut previous = Duration::ZERO;
        for _ in 0..steps {
            let delay = backoff.next_delay(0.0);
            prop_assert!(delay >= previous);
            previous = delay;
        }
    });
}

#[derive(Debug, Clone)]
enum Input {
    Opened,
    Failed(f64),
    Disconnected(f64),
    RetryElapsed,
}

fn arbitrary_input() -> impl Strategy<Value = Input> {
    prop_oneof![
        Just(Input::Opened),
        (0.0f64..1.0).prop_map(Input::Failed),
        (0.0f64..1.0).prop_map(Input::Disconnected),
        Just(Input::RetryElapsed),
    ]
}

#[test]
fn prop_fsm_status_tracks_state() {
    proptest!(|(inputs in prop::collection::vec(arbitrary_input(), 0..64))| {
        let mut conn = Connection::default();
        conn.start().expect("start from idle");

        for input in inputs {
            let before = conn.state().clone();
            let result = match input {
                Input::Opened => conn.opened("sid"),
                Input::Failed(sample) => conn.failed("refused", sample),
                Input::Disconnected(sample) => conn.disconnected("closed", sample),
                Input::RetryElapsed => conn.retry_elapsed(),
            };

            match result {
                Ok(actions) => {
                    for action in actions {
                        if let ConnectionAction::Wait { delay } = action {
                            prop_assert!(delay <= Duration::from_millis(10_000));
                        }
                    }
                },
                // Rejected inputs leave the state untouched.
                Err(_) => {
                    prop_assert_eq!(conn.state(), &before);
                },
            }
            prop_assert_eq!(
                conn.status().connected,
                matches!(conn.state(), ConnectionState::Connected { .. })
            );
        }

        prop_assert!(conn.shutdown().len() <= 1);
        prop_assert_eq!(conn.state(), &ConnectionState::Closed);
    });
}
