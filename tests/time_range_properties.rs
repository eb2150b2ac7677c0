//! Property tests for `timeRange` parsing.

use chrono::Datelike;
use ogdzh::dcat::TimeInterval;
use proptest::prelude::*;

proptest! {
    #[test]
    fn year_range_spans_whole_years(start in 1000i32..=9999, end in 1000i32..=9999) {
        let interval = TimeInterval::parse(&format!("{start}-{end}")).unwrap();
        prop_assert_eq!(interval.start.year(), start);
        prop_assert_eq!((interval.start.month(), interval.start.day()), (1, 1));
        prop_assert_eq!(interval.end.year(), end);
        prop_assert_eq!((interval.end.month(), interval.end.day()), (12, 31));
    }

    #[test]
    fn single_year_with_padding(year in 1000i32..=9999, pad in " {0,3}") {
        let interval = TimeInterval::parse(&format!("{pad}{year}{pad}")).unwrap();
        let expected = format!("{year}-01-01/{year}-12-31");
        prop_assert_eq!(interval.to_string(), expected);
    }

    #[test]
    fn trailing_garbage_is_rejected(year in 1000i32..=9999, junk in "[a-z.]{1,5}") {
        let glued = format!("{year}{junk}");
        let ranged = format!("{year}-{junk}");
        prop_assert!(TimeInterval::parse(&glued).is_none());
        prop_assert!(TimeInterval::parse(&ranged).is_none());
    }

    #[test]
    fn arbitrary_input_never_panics(raw in "\\PC{0,20}") {
        let _ = TimeInterval::parse(&raw);
    }
}
