use snowfield::config::DayCycleConfig;
use snowfield::core::{DayCycleTimer, DayPhase};
use snowfield::math::ClearColor;

/// Walk enough to fill the lap window, then let the next frame close the lap
fn lap(timer: &mut DayCycleTimer) -> Option<ClearColor> {
    assert_eq!(timer.tick(0.1, 4), None);
    timer.tick(0.1, 0)
}

fn laps(timer: &mut DayCycleTimer, n: u32) {
    for _ in 0..n {
        lap(timer);
    }
}

#[cfg(test)]
mod day_cycle_tests {
    use super::*;

    #[test]
    fn test_starts_in_daylight() {
        let timer = DayCycleTimer::new(DayCycleConfig::default());
        assert_eq!(timer.lap_count(), 0);
        assert_eq!(timer.day_channel(), 0.4);
        assert_eq!(timer.night_channel(), 0.5);
        assert_eq!(timer.phase(), DayPhase::Day);
    }

    #[test]
    fn test_each_helper_lap_counts_once() {
        let mut timer = DayCycleTimer::new(DayCycleConfig::default());
        laps(&mut timer, 3);
        assert_eq!(timer.lap_count(), 3);
        assert!((timer.cycle() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_no_color_change_before_dimming() {
        let mut timer = DayCycleTimer::new(DayCycleConfig::default());
        for _ in 1..45 {
            assert_eq!(lap(&mut timer), None);
        }
        assert_eq!(timer.lap_count(), 44);
        assert_eq!(timer.clear_color(), ClearColor::new(0.0, 0.4, 0.9, 0.0));
    }

    #[test]
    fn test_dims_strictly_down_to_floor() {
        let mut timer = DayCycleTimer::new(DayCycleConfig::default());
        laps(&mut timer, 44);

        let mut prev = (timer.day_channel(), timer.night_channel());
        for _ in 45..140 {
            let emitted = lap(&mut timer);
            let now = (timer.day_channel(), timer.night_channel());

            assert!(now.0 >= 0.02 && now.1 >= 0.12, "below floor at lap {}", timer.lap_count());
            if prev.0 > 0.02 {
                assert!(now.0 < prev.0, "day channel stalled at lap {}", timer.lap_count());
            }
            if prev.1 > 0.12 {
                assert!(now.1 < prev.1, "night channel stalled at lap {}", timer.lap_count());
            }
            if now != prev {
                assert_eq!(emitted, Some(ClearColor::new(0.0, now.0, now.1, 0.0)));
            }
            prev = now;
        }

        assert_eq!(timer.lap_count(), 139);
        assert_eq!(timer.phase(), DayPhase::Dimming);
        lap(&mut timer);
        assert_eq!((timer.day_channel(), timer.night_channel()), (0.02, 0.12));
        assert_eq!(timer.phase(), DayPhase::Night);
    }

    #[test]
    fn test_brightens_after_night() {
        let mut timer = DayCycleTimer::new(DayCycleConfig::default());
        laps(&mut timer, 160);
        assert_eq!((timer.day_channel(), timer.night_channel()), (0.02, 0.12));

        let mut prev = timer.day_channel();
        for _ in 161..200 {
            lap(&mut timer);
            assert_eq!(timer.phase(), DayPhase::Brightening);
            let now = timer.day_channel();
            if prev < 0.4 {
                assert!(now > prev, "day channel stalled at lap {}", timer.lap_count());
            }
            assert!(now <= 0.4);
            prev = now;
        }
        assert_eq!(timer.day_channel(), 0.4);
        assert_eq!(timer.night_channel(), 0.5);
    }

    #[test]
    fn test_wraps_at_two_hundred() {
        let mut timer = DayCycleTimer::new(DayCycleConfig::default());
        laps(&mut timer, 199);
        assert_eq!(timer.lap_count(), 199);

        lap(&mut timer);
        assert_eq!(timer.lap_count(), 0);
        assert_eq!(timer.phase(), DayPhase::Day);

        laps(&mut timer, 1);
        assert_eq!(timer.lap_count(), 1);
    }

    #[test]
    fn test_snow_latches_past_lap_fifty() {
        let mut timer = DayCycleTimer::new(DayCycleConfig::default());
        laps(&mut timer, 50);
        assert!(!timer.snow_enabled());

        lap(&mut timer);
        assert!(timer.snow_enabled());

        // Survives the wrap back to lap 0
        laps(&mut timer, 149);
        assert_eq!(timer.lap_count(), 0);
        assert!(timer.snow_enabled());
    }

    #[test]
    fn test_custom_lap_window() {
        let config = DayCycleConfig {
            lap_window: (10, 20),
            ..Default::default()
        };
        let mut timer = DayCycleTimer::new(config.clone());
        // Both keys held: 6, then 12, which laps on the following frame
        timer.tick(0.1, 2);
        timer.tick(0.1, 2);
        assert_eq!(timer.tick_count(), 12);
        timer.tick(0.1, 0);
        assert_eq!(timer.lap_count(), 1);

        // Overshooting the window leaves the counter stuck above it
        let mut stuck = DayCycleTimer::new(config);
        stuck.tick(0.1, 8);
        for _ in 0..10 {
            stuck.tick(0.1, 0);
        }
        assert_eq!(stuck.tick_count(), 24);
        assert_eq!(stuck.lap_count(), 0);
    }
}
