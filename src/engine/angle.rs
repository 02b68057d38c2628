//! Mapping of minutes onto a 24 hour dial. Noon sits at 270° and midnight at 90°, so the day
//! runs clockwise in screen coordinates with midnight at the bottom.

use crate::utils::time::MINUTES_PER_DAY;

const MIDDAY_MINUTE: f64 = 720.;
const DEGREES_PER_MINUTE: f64 = 360. / MINUTES_PER_DAY as f64;

/// Brings any angle into `[0, 360)`.
pub fn normalize_angle(mut angle: f64) -> f64 {
    while angle < 0. {
        angle += 360.;
    }
    while angle >= 360. {
        angle -= 360.;
    }
    angle
}

/// Angle of a minute on the dial. Accepts minutes outside of a single day.
pub fn minute_to_angle(minute: i64) -> f64 {
    let minute = minute.rem_euclid(MINUTES_PER_DAY) as f64;
    let minutes_from_midday = minute - MIDDAY_MINUTE;
    normalize_angle(-90. + minutes_from_midday * DEGREES_PER_MINUTE)
}

/// Clockwise arc width between two minutes.
pub fn sweep_angle(start_minute: i64, end_minute: i64) -> f64 {
    let sweep = minute_to_angle(end_minute) - minute_to_angle(start_minute);
    if sweep < 0. {
        sweep + 360.
    } else {
        sweep
    }
}

#[cfg(test)]
mod tests {
    use super::{minute_to_angle, normalize_angle, sweep_angle};

    #[test]
    fn known_positions() {
        assert_eq!(minute_to_angle(480), 210.);
        assert_eq!(minute_to_angle(600), 240.);
        assert_eq!(minute_to_angle(720), 270.);
        assert_eq!(minute_to_angle(0), 90.);
        assert_eq!(minute_to_angle(1080), 0.);
    }

    #[test]
    fn unbounded_minutes_wrap() {
        assert_eq!(minute_to_angle(1470), minute_to_angle(30));
        assert_eq!(minute_to_angle(-60), minute_to_angle(1380));
        assert_eq!(minute_to_angle(1440), minute_to_angle(0));
    }

    #[test]
    fn sweep_across_the_seam() {
        // 17:30 to 18:30 crosses the 0° mark.
        assert_eq!(sweep_angle(1050, 1110), 15.);
        // 23:30 to 00:30 on the next day.
        assert_eq!(sweep_angle(1410, 1470), 15.);
        assert_eq!(sweep_angle(480, 540), 15.);
    }

    #[test]
    fn angles_stay_in_range() {
        for minute in (-3000..3000).step_by(7) {
            let angle = minute_to_angle(minute);
            assert!((0. ..360.).contains(&angle), "{minute} {angle}");
            let sweep = sweep_angle(minute, minute + 97);
            assert!((0. ..360.).contains(&sweep), "{minute} {sweep}");
        }
        assert_eq!(normalize_angle(-720.), 0.);
        assert_eq!(normalize_angle(725.), 5.);
    }
}
