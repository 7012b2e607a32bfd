use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CarddivError::archive_open("x")
            .to_string()
            .contains("archive open error:")
    );
    assert!(CarddivError::empty_deck("x").to_string().contains("empty deck:"));
    assert!(CarddivError::decode("x").to_string().contains("decode error:"));
    assert!(
        CarddivError::not_found("x")
            .to_string()
            .contains("deck not found:")
    );
    assert!(
        CarddivError::validation("x")
            .to_string()
            .contains("validation error:")
    );
}

#[test]
fn range_errors_carry_counts() {
    let err = CarddivError::IndexOutOfRange { index: 40, len: 36 };
    assert_eq!(
        err.to_string(),
        "card index 40 out of range (deck has 36 cards)"
    );

    let err = CarddivError::InsufficientCards {
        requested: 10,
        available: 3,
    };
    assert!(err.to_string().contains("draw 10"));
}

#[test]
fn only_construction_failures_trigger_fallback() {
    assert!(CarddivError::archive_open("x").is_deck_unavailable());
    assert!(CarddivError::empty_deck("x").is_deck_unavailable());
    assert!(CarddivError::decode("x").is_deck_unavailable());
    assert!(CarddivError::not_found("x").is_deck_unavailable());
    assert!(!CarddivError::validation("x").is_deck_unavailable());
    assert!(!CarddivError::IndexOutOfRange { index: 1, len: 1 }.is_deck_unavailable());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CarddivError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
