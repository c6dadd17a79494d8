use medsum::nlp::split_sections;
use proptest::prelude::*;

proptest! {
    #[test]
    fn ids_are_dense_and_contents_trimmed(
        blocks in prop::collection::vec("[ a-zA-Z.\n]{0,12}", 0..8)
    ) {
        let text = blocks.join("\n\n");
        let sections = split_sections(&text);
        for (expected, section) in sections.iter().enumerate() {
            prop_assert_eq!(section.id, expected);
            prop_assert!(!section.content.is_empty());
            prop_assert_eq!(section.content.trim(), section.content.as_str());
        }
    }
}

#[test]
fn blank_trailing_block_is_ignored() {
    let sections = split_sections("A.\n\nB.\n\n\n");
    let contents: Vec<_> = sections.iter().map(|s| (s.id, s.content.as_str())).collect();
    assert_eq!(contents, vec![(0, "A."), (1, "B.")]);
}
