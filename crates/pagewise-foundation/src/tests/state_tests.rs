use super::*;

fn state(items: Option<Vec<u32>>, error: bool, next_key: Option<u32>) -> PagingState<u32, u32> {
    let error = error.then(|| PageError::msg("boom"));
    PagingState::new(items, error, next_key)
}

/// The six predicates from the status table, evaluated independently of
/// `classify` so the two can be cross-checked.
fn predicates(items: Option<usize>, error: bool, next: bool) -> Vec<PagingStatus> {
    let mut matched = Vec::new();
    if items.is_none() && !error {
        matched.push(PagingStatus::LoadingFirstPage);
    }
    if items.is_none() && error {
        matched.push(PagingStatus::FirstPageError);
    }
    if items == Some(0) && !next && !error {
        matched.push(PagingStatus::NoItemsFound);
    }
    let non_empty = matches!(items, Some(count) if count > 0);
    if non_empty && next && !error {
        matched.push(PagingStatus::Ongoing);
    }
    if non_empty && error {
        matched.push(PagingStatus::SubsequentPageError);
    }
    if non_empty && !next && !error {
        matched.push(PagingStatus::Completed);
    }
    matched
}

#[test]
fn every_triple_maps_to_exactly_one_status() {
    let item_counts = [None, Some(0), Some(1), Some(5)];
    for items in item_counts {
        for error in [false, true] {
            for next in [false, true] {
                let classified = PagingStatus::classify(items, error, next);
                let matched = predicates(items, error, next);
                assert!(
                    matched.len() <= 1,
                    "predicates overlap for {items:?}/{error}/{next}: {matched:?}"
                );
                match matched.first() {
                    Some(expected) => assert_eq!(
                        classified, *expected,
                        "classify disagrees for {items:?}/{error}/{next}"
                    ),
                    // Empty lists outside the table fall back to the first-page arms.
                    None => {
                        assert_eq!(items, Some(0));
                        let fallback = if error {
                            PagingStatus::FirstPageError
                        } else {
                            PagingStatus::LoadingFirstPage
                        };
                        assert_eq!(classified, fallback);
                    }
                }
            }
        }
    }
}

#[test]
fn initial_state_is_loading_first_page() {
    let initial: PagingState<u32, &str> = PagingState::initial(1);
    assert_eq!(initial.status(), PagingStatus::LoadingFirstPage);
    assert_eq!(initial.next_key(), Some(&1));
    assert_eq!(initial.items(), None);
    assert_eq!(initial.item_count(), 0);
}

#[test]
fn status_follows_fields() {
    assert_eq!(state(None, true, Some(1)).status(), PagingStatus::FirstPageError);
    assert_eq!(state(Some(vec![]), false, None).status(), PagingStatus::NoItemsFound);
    assert_eq!(state(Some(vec![1]), false, Some(2)).status(), PagingStatus::Ongoing);
    assert_eq!(
        state(Some(vec![1]), true, Some(2)).status(),
        PagingStatus::SubsequentPageError
    );
    assert_eq!(state(Some(vec![1, 2]), false, None).status(), PagingStatus::Completed);
}

#[test]
fn append_shares_storage_until_snapshot_is_held() {
    let mut current = state(Some(vec![1, 2]), false, Some(3));
    let snapshot = current.clone();
    assert!(current.shares_items_with(&snapshot));

    current.append_items(vec![3]);

    assert_eq!(current.items(), Some(&[1, 2, 3][..]));
    assert_eq!(snapshot.items(), Some(&[1, 2][..]));
    assert!(!current.shares_items_with(&snapshot));
}

#[test]
fn listing_and_error_helpers() {
    let listing: Vec<_> = PagingStatus::ALL
        .into_iter()
        .filter(|status| status.has_listing())
        .collect();
    assert_eq!(
        listing,
        vec![
            PagingStatus::Ongoing,
            PagingStatus::SubsequentPageError,
            PagingStatus::Completed
        ]
    );
    assert!(PagingStatus::FirstPageError.is_error());
    assert!(!PagingStatus::NoItemsFound.is_error());
}
