//! Alert state machine
//!
//! Two states per endpoint: HEALTHY (`alert_active == false`) and ALERTING
//! (`alert_active == true`). Alerting is edge-triggered: a record is emitted
//! only on the transition into or out of ALERTING, never on every breach.
//!
//! One flag covers both causes. A DOWN activation and a LATENCY activation
//! share `alert_active`; while it is set, further breaches of either kind are
//! silent, and one fully healthy measurement (UP with latency within the
//! threshold or absent) clears it with a single RECOVERED record.

use crate::model::{Measurement, ProbeStatus};

use super::config::AlertConfig;
use super::history::AlertRecord;

/// Apply one freshly recorded measurement to the endpoint's alert state.
///
/// Mutates counters and the active flag in place and returns the transition
/// record, if this measurement caused one. Callers must hold the endpoint's
/// exclusive scope for the duration of record + evaluate.
pub fn evaluate(config: &mut AlertConfig, measurement: &Measurement) -> Option<AlertRecord> {
    match measurement.status {
        // A DOWN result takes priority: no latency was measured, so there is
        // nothing to evaluate against the latency threshold.
        ProbeStatus::Down => {
            config.consecutive_failures += 1;

            if config.consecutive_failures >= config.consecutive_fail_threshold
                && !config.alert_active
            {
                config.alert_active = true;
                config.last_alert_at = Some(measurement.observed_at);
                return Some(AlertRecord::down(
                    measurement.endpoint_id,
                    config.consecutive_failures,
                    measurement.observed_at,
                ));
            }
            None
        }
        ProbeStatus::Up => {
            config.consecutive_failures = 0;

            match measurement.latency_ms {
                Some(latency) if latency > config.latency_threshold_ms => {
                    if !config.alert_active {
                        config.alert_active = true;
                        config.last_alert_at = Some(measurement.observed_at);
                        return Some(AlertRecord::latency(
                            measurement.endpoint_id,
                            latency,
                            config.latency_threshold_ms,
                            measurement.observed_at,
                        ));
                    }
                    None
                }
                _ => {
                    if config.alert_active {
                        config.alert_active = false;
                        return Some(AlertRecord::recovered(
                            measurement.endpoint_id,
                            measurement.observed_at,
                        ));
                    }
                    None
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::history::AlertKind;
    use crate::model::EndpointId;
    use chrono::Utc;

    fn m(status: ProbeStatus, latency_ms: Option<u64>) -> Measurement {
        Measurement {
            endpoint_id: EndpointId(1),
            observed_at: Utc::now(),
            status,
            latency_ms,
            error: None,
        }
    }

    fn config(latency_ms: u64, fails: u32) -> AlertConfig {
        AlertConfig::new(latency_ms, fails)
    }

    #[test]
    fn test_down_streak_activates_on_threshold() {
        // Scenario A: threshold 3; third DOWN flips the alert, exactly once
        let mut cfg = config(500, 3);

        assert!(evaluate(&mut cfg, &m(ProbeStatus::Down, None)).is_none());
        assert!(evaluate(&mut cfg, &m(ProbeStatus::Down, None)).is_none());
        assert!(!cfg.alert_active);

        let alert = evaluate(&mut cfg, &m(ProbeStatus::Down, None)).unwrap();
        assert!(cfg.alert_active);
        assert_eq!(cfg.consecutive_failures, 3);
        assert_eq!(alert.kind, AlertKind::Down);
        assert_eq!(alert.value, Some(3));
        assert!(cfg.last_alert_at.is_some());
    }

    #[test]
    fn test_sustained_down_streak_alerts_once() {
        let mut cfg = config(500, 2);
        let mut alerts = 0;
        for _ in 0..6 {
            if evaluate(&mut cfg, &m(ProbeStatus::Down, None)).is_some() {
                alerts += 1;
            }
        }
        assert_eq!(alerts, 1);
        assert_eq!(cfg.consecutive_failures, 6);
        assert!(cfg.alert_active);
    }

    #[test]
    fn test_consecutive_failures_tracks_trailing_down_run() {
        let mut cfg = config(500, 100);
        let sequence = [
            (ProbeStatus::Down, 1),
            (ProbeStatus::Down, 2),
            (ProbeStatus::Up, 0),
            (ProbeStatus::Down, 1),
            (ProbeStatus::Down, 2),
            (ProbeStatus::Down, 3),
            (ProbeStatus::Up, 0),
        ];

        for (status, expected) in sequence {
            let latency = status.is_up().then_some(50);
            evaluate(&mut cfg, &m(status, latency));
            assert_eq!(cfg.consecutive_failures, expected);
        }
    }

    #[test]
    fn test_latency_breach_is_edge_triggered() {
        // Scenario B: threshold 200 ms; breach alerts once, repeat breach is silent
        let mut cfg = config(200, 3);

        assert!(evaluate(&mut cfg, &m(ProbeStatus::Up, Some(150))).is_none());
        assert!(!cfg.alert_active);

        let alert = evaluate(&mut cfg, &m(ProbeStatus::Up, Some(250))).unwrap();
        assert!(cfg.alert_active);
        assert_eq!(alert.kind, AlertKind::Latency);
        assert_eq!(alert.value, Some(250));

        assert!(evaluate(&mut cfg, &m(ProbeStatus::Up, Some(260))).is_none());
        assert!(cfg.alert_active);
    }

    #[test]
    fn test_recovery_emits_one_record() {
        // Scenario C: from ALERTING, a healthy UP clears the flag once
        let mut cfg = config(200, 3);
        evaluate(&mut cfg, &m(ProbeStatus::Up, Some(250)));
        assert!(cfg.alert_active);

        let alert = evaluate(&mut cfg, &m(ProbeStatus::Up, Some(50))).unwrap();
        assert!(!cfg.alert_active);
        assert_eq!(alert.kind, AlertKind::Recovered);
        assert_eq!(alert.value, None);

        assert!(evaluate(&mut cfg, &m(ProbeStatus::Up, Some(50))).is_none());
    }

    #[test]
    fn test_recovery_from_down_alert() {
        let mut cfg = config(500, 2);
        evaluate(&mut cfg, &m(ProbeStatus::Down, None));
        evaluate(&mut cfg, &m(ProbeStatus::Down, None));
        assert!(cfg.alert_active);

        let alert = evaluate(&mut cfg, &m(ProbeStatus::Up, Some(100))).unwrap();
        assert_eq!(alert.kind, AlertKind::Recovered);
        assert_eq!(cfg.consecutive_failures, 0);
        assert!(!cfg.alert_active);
    }

    #[test]
    fn test_up_without_latency_recovers() {
        let mut cfg = config(200, 3);
        evaluate(&mut cfg, &m(ProbeStatus::Up, Some(999)));
        assert!(cfg.alert_active);

        let alert = evaluate(&mut cfg, &m(ProbeStatus::Up, None)).unwrap();
        assert_eq!(alert.kind, AlertKind::Recovered);
    }

    #[test]
    fn test_breach_while_down_alerting_is_silent() {
        // Latency breach after a DOWN activation does not re-alert
        let mut cfg = config(200, 1);
        let down_alert = evaluate(&mut cfg, &m(ProbeStatus::Down, None)).unwrap();
        assert_eq!(down_alert.kind, AlertKind::Down);

        assert!(evaluate(&mut cfg, &m(ProbeStatus::Up, Some(900))).is_none());
        assert!(cfg.alert_active);
        assert_eq!(cfg.consecutive_failures, 0);
    }

    #[test]
    fn test_threshold_edit_does_not_transition() {
        let mut cfg = config(200, 3);
        evaluate(&mut cfg, &m(ProbeStatus::Up, Some(300)));
        assert!(cfg.alert_active);

        // Raising the threshold above the last observed latency changes only
        // the rule inputs for the next measurement.
        cfg.latency_threshold_ms = 1000;
        assert!(cfg.alert_active);

        let alert = evaluate(&mut cfg, &m(ProbeStatus::Up, Some(300))).unwrap();
        assert_eq!(alert.kind, AlertKind::Recovered);
    }

    #[test]
    fn test_last_alert_at_untouched_by_recovery() {
        let mut cfg = config(200, 3);
        evaluate(&mut cfg, &m(ProbeStatus::Up, Some(300)));
        let activated_at = cfg.last_alert_at;
        assert!(activated_at.is_some());

        evaluate(&mut cfg, &m(ProbeStatus::Up, Some(50)));
        assert_eq!(cfg.last_alert_at, activated_at);
    }
}
