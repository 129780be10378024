use super::*;

fn ongoing_trigger(threshold: usize) -> NextPageTrigger {
    let mut trigger = NextPageTrigger::new(threshold);
    trigger.observe(PagingStatus::Ongoing, false, 0);
    trigger
}

#[test]
fn trigger_index_saturates_at_zero() {
    assert_eq!(next_page_trigger_index(10, 3), 7);
    assert_eq!(next_page_trigger_index(3, 3), 0);
    assert_eq!(next_page_trigger_index(2, 3), 0);
    assert_eq!(next_page_trigger_index(0, 3), 0);
    assert_eq!(next_page_trigger_index(5, 0), 5);
}

#[test]
fn fires_once_at_trigger_index() {
    let mut trigger = ongoing_trigger(3);
    let fired: Vec<usize> = (0..10)
        .filter(|&index| trigger.on_item_built(index, 10, PagingStatus::Ongoing, true))
        .collect();
    assert_eq!(fired, vec![7]);

    // Rebuilding the same item is suppressed.
    assert!(!trigger.on_item_built(7, 10, PagingStatus::Ongoing, true));
    assert!(trigger.has_requested_next_page());
}

#[test]
fn new_page_re_arms_trigger() {
    let mut trigger = ongoing_trigger(3);
    assert!(trigger.on_item_built(7, 10, PagingStatus::Ongoing, true));

    trigger.observe(PagingStatus::Ongoing, true, 1);

    assert!(!trigger.has_requested_next_page());
    assert!(trigger.on_item_built(17, 20, PagingStatus::Ongoing, true));
}

#[test]
fn no_request_without_next_page() {
    let mut trigger = NextPageTrigger::new(3);
    trigger.observe(PagingStatus::Completed, false, 0);
    assert!(!trigger.on_item_built(7, 10, PagingStatus::Completed, false));
}

#[test]
fn error_listing_never_requests() {
    let mut trigger = NextPageTrigger::new(3);
    trigger.observe(PagingStatus::SubsequentPageError, false, 0);
    assert!(!trigger.on_item_built(7, 10, PagingStatus::SubsequentPageError, true));
}

#[test]
fn retry_transition_keeps_suppression() {
    let mut trigger = ongoing_trigger(3);
    assert!(trigger.on_item_built(7, 10, PagingStatus::Ongoing, true));

    trigger.observe(PagingStatus::SubsequentPageError, false, 1);
    trigger.observe(PagingStatus::Ongoing, false, 1);
    // The retry emitted its own request after clearing the error.
    trigger.begin_build(2);

    assert!(trigger.has_requested_next_page());
    assert!(!trigger.on_item_built(7, 10, PagingStatus::Ongoing, true));

    // The retried page landing re-arms it.
    trigger.observe(PagingStatus::Ongoing, true, 2);
    trigger.begin_build(2);
    assert!(trigger.on_item_built(8, 11, PagingStatus::Ongoing, true));
}

#[test]
fn bare_error_clear_re_arms_on_next_build() {
    let mut trigger = ongoing_trigger(3);
    assert!(trigger.on_item_built(7, 10, PagingStatus::Ongoing, true));

    trigger.observe(PagingStatus::SubsequentPageError, false, 1);
    trigger.observe(PagingStatus::Ongoing, false, 1);
    assert!(trigger.has_requested_next_page());

    trigger.begin_build(1);
    assert!(!trigger.has_requested_next_page());
    assert!(trigger.on_item_built(7, 10, PagingStatus::Ongoing, true));
}

#[test]
fn page_appended_after_error_re_arms_trigger() {
    let mut trigger = ongoing_trigger(3);
    assert!(trigger.on_item_built(2, 5, PagingStatus::Ongoing, true));

    trigger.observe(PagingStatus::SubsequentPageError, false, 1);
    assert!(!trigger.on_item_built(2, 5, PagingStatus::SubsequentPageError, true));

    // append_page clears the error and brings new items in one step.
    trigger.observe(PagingStatus::Ongoing, true, 1);
    trigger.begin_build(1);
    assert!(trigger.on_item_built(7, 10, PagingStatus::Ongoing, true));
}

#[test]
fn later_observation_drops_pending_error_clear() {
    let mut trigger = ongoing_trigger(3);
    assert!(trigger.on_item_built(7, 10, PagingStatus::Ongoing, true));

    trigger.observe(PagingStatus::SubsequentPageError, false, 1);
    trigger.observe(PagingStatus::Ongoing, false, 1);
    trigger.observe(PagingStatus::Ongoing, false, 2);

    // Plain Ongoing to Ongoing re-arms right away.
    assert!(!trigger.has_requested_next_page());
    trigger.begin_build(2);
    assert!(!trigger.has_requested_next_page());
}

#[test]
fn threshold_above_item_count_fires_on_first_item() {
    let mut trigger = ongoing_trigger(5);
    assert!(trigger.on_item_built(0, 2, PagingStatus::Ongoing, true));
}

#[test]
fn empty_listing_does_not_panic() {
    let mut trigger = NextPageTrigger::new(3);
    trigger.observe(PagingStatus::LoadingFirstPage, false, 0);
    assert!(trigger.on_item_built(0, 0, PagingStatus::LoadingFirstPage, true));
}

#[test]
fn successive_empty_pages_each_re_arm() {
    let mut trigger = NextPageTrigger::new(3);
    trigger.observe(PagingStatus::LoadingFirstPage, true, 1);
    assert!(trigger.on_item_built(0, 0, PagingStatus::LoadingFirstPage, true));
    assert!(!trigger.on_item_built(0, 0, PagingStatus::LoadingFirstPage, true));

    // Another empty page moves the next key.
    trigger.observe(PagingStatus::LoadingFirstPage, true, 2);
    assert!(trigger.on_item_built(0, 0, PagingStatus::LoadingFirstPage, true));
}
