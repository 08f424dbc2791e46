// Integration tests for dataset invariants.
// These tests are native-friendly and avoid wasm/browser APIs.

use std::collections::HashSet;

fn assert_clean(name: &str, entries: &[&str]) {
    let mut seen = HashSet::new();
    for e in entries {
        assert!(!e.is_empty(), "empty entry in {}", name);
        assert_eq!(e.trim(), *e, "entry '{}' in {} has stray whitespace", e, name);
        assert!(seen.insert(*e), "duplicate entry '{}' in {}", e, name);
    }
}

#[test]
fn rotating_datasets_are_clean_and_rotatable() {
    for (name, entries) in [
        ("POWER_QUOTES", new_year_wish::POWER_QUOTES),
        ("MOTIVATIONAL_LINES", new_year_wish::MOTIVATIONAL_LINES),
        ("CELEBRATION_MESSAGES", new_year_wish::CELEBRATION_MESSAGES),
        ("ADDITIONAL_QUOTES", new_year_wish::ADDITIONAL_QUOTES),
    ] {
        assert_clean(name, entries);
        // A rotation needs at least two entries to be visible.
        assert!(entries.len() >= 2, "{} too short to rotate", name);
    }
}

#[test]
fn static_section_datasets_are_clean() {
    assert_clean("TOGETHERNESS_MESSAGES", new_year_wish::TOGETHERNESS_MESSAGES);
    assert_clean("GRATITUDE_MESSAGES", new_year_wish::GRATITUDE_MESSAGES);
    assert!(!new_year_wish::TOGETHERNESS_MESSAGES.is_empty());
    assert!(!new_year_wish::GRATITUDE_MESSAGES.is_empty());
}

#[test]
fn wish_message_types_out_in_reasonable_time() {
    let msg = new_year_wish::WISH_MESSAGE;
    assert!(!msg.trim().is_empty());
    // At 50 ms per character the reveal should finish well inside ten seconds.
    let reveal_ms = msg.chars().count() as u64 * new_year_wish::typewriter::TYPE_TICK_MS as u64;
    assert!(reveal_ms < 10_000, "wish message takes {}ms to type", reveal_ms);
}

#[test]
fn datasets_do_not_leak_between_sections() {
    let quotes: HashSet<&str> = new_year_wish::POWER_QUOTES.iter().copied().collect();
    for line in new_year_wish::MOTIVATIONAL_LINES {
        assert!(!quotes.contains(line), "'{}' appears in both quote sets", line);
    }
    for line in new_year_wish::ADDITIONAL_QUOTES {
        assert!(!quotes.contains(line), "'{}' appears in both quote sets", line);
    }
}
