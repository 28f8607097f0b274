//! Tests for booking link discovery

mod common;

use common::{booking_page, ACTION_PATH};
use padel_booker::parser::SlotScanner;
use proptest::prelude::*;

fn scanner() -> SlotScanner {
    SlotScanner::from_base_str("https://intranet.upv.es").unwrap()
}

#[test]
fn test_full_page_two_courts() {
    let html = booking_page(&[2, 5], "20:00");
    let links = scanner().scan(&html, "20:00");

    assert_eq!(links.len(), 2);
    assert_eq!(
        links[0].as_str(),
        format!("https://intranet.upv.es{ACTION_PATH}?p_pista=2&p_res_tipo=PDEL&p_res_horaini=20:00:00")
    );
    assert!(links[1].as_str().contains("p_pista=5"));
}

#[test]
fn test_other_hour_not_matched() {
    let html = booking_page(&[1, 2], "20:30");

    assert!(scanner().scan(&html, "20:00").is_empty());
    assert_eq!(scanner().scan(&html, "20:30").len(), 2);
}

#[test]
fn test_page_without_free_courts() {
    let html = booking_page(&[], "20:00");
    assert!(scanner().scan(&html, "20:00").is_empty());
}

#[test]
fn test_mixed_hours_in_one_table() {
    let html = format!(
        "{}{}{}",
        booking_page(&[1], "19:00"),
        booking_page(&[3], "20:00"),
        booking_page(&[4], "21:00")
    );

    let links = scanner().scan(&html, "20:00");
    assert_eq!(links.len(), 1);
    assert!(links[0].as_str().contains("p_pista=3"));
}

#[test]
fn test_latin9_page_content_is_ignored() {
    let html = format!(
        "<p>Reservas de pádel · €</p>{}",
        booking_page(&[1], "08:00")
    );
    assert_eq!(scanner().scan(&html, "08:00").len(), 1);
}

proptest! {
    #[test]
    fn scan_never_panics(html in ".*", hour in 0u32..24, minute in 0u32..60) {
        let target = format!("{hour:02}:{minute:02}");
        let _ = scanner().scan(&html, &target);
    }

    #[test]
    fn no_marker_means_no_links(html in "[^s&]*") {
        prop_assert!(scanner().scan(&html, "20:00").is_empty());
    }

    #[test]
    fn only_the_target_time_matches(
        target_hour in 0u32..24,
        target_minute in 0u32..60,
        other_hour in 0u32..24,
        other_minute in 0u32..60,
    ) {
        let target = format!("{target_hour:02}:{target_minute:02}");
        let other = format!("{other_hour:02}:{other_minute:02}");
        let html = booking_page(&[7], &other);

        let links = scanner().scan(&html, &target);
        prop_assert_eq!(links.len(), usize::from(target == other));
    }
}
