use chrono::{DateTime, Duration, Utc};

/// A half-open time window `[start, start + duration)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub start: DateTime<Utc>,
    pub duration_minutes: i64,
}

impl Slot {
    pub fn new(start: DateTime<Utc>, duration_minutes: i64) -> Self {
        Self {
            start,
            duration_minutes,
        }
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.start + Duration::minutes(self.duration_minutes)
    }

    /// Standard interval intersection: `a.start < b.end && b.start < a.end`.
    /// Half-open, so back-to-back slots do not overlap.
    pub fn overlaps(&self, other: &Slot) -> bool {
        other.start < self.end() && self.start < other.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, hour, min, 0).unwrap()
    }

    #[test]
    fn end_is_start_plus_duration() {
        let slot = Slot::new(at(10, 0), 60);
        assert_eq!(slot.end(), at(11, 0));
    }

    #[test]
    fn partial_overlap_detected() {
        let a = Slot::new(at(10, 0), 60);
        let b = Slot::new(at(10, 30), 60);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn containment_detected() {
        let outer = Slot::new(at(9, 0), 180);
        let inner = Slot::new(at(10, 0), 30);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn boundary_adjacent_slots_do_not_overlap() {
        let a = Slot::new(at(10, 0), 60);
        let b = Slot::new(at(11, 0), 60);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn disjoint_slots_do_not_overlap() {
        let a = Slot::new(at(9, 0), 30);
        let b = Slot::new(at(14, 0), 30);
        assert!(!a.overlaps(&b));
    }
}
