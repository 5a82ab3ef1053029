use crate::metadata::{merge_vectors, File, Tag};

#[test]
fn test_merge_appends_only_new_elements() {
    let merged = merge_vectors(vec![1, 2, 3], &[2, 4, 1, 5]);
    assert_eq!(merged, vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_merge_with_empty_sides() {
    assert_eq!(merge_vectors(Vec::<i32>::new(), &[1, 2]), vec![1, 2]);
    assert_eq!(merge_vectors(vec![1, 2], &[]), vec![1, 2]);
}

#[test]
fn test_merge_keeps_duplicates_within_second_list() {
    // Only the original first list is checked, so repeats in the second survive.
    let merged = merge_vectors(vec![1], &[2, 2]);
    assert_eq!(merged, vec![1, 2, 2]);
}

#[test]
fn test_merge_compares_files_case_insensitively() {
    let merged = merge_vectors(vec![File::new("A.esp")], &[File::new("a.ESP"), File::new("B.esp")]);
    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].name, "A.esp");
    assert_eq!(merged[1].name, "B.esp");
}

#[test]
fn test_merge_treats_differing_conditions_as_distinct() {
    let plain = File::new("A.esp");
    let conditional = File::with_condition("A.esp", "file(\"B.esp\")");
    let merged = merge_vectors(vec![plain], &[conditional.clone()]);
    assert_eq!(merged.len(), 2);
    assert_eq!(merged[1], conditional);
}

#[test]
fn test_merge_tags_by_full_value() {
    let merged = merge_vectors(
        vec![Tag::addition("Relev")],
        &[Tag::removal("Relev"), Tag::addition("Relev")],
    );
    assert_eq!(merged, vec![Tag::addition("Relev"), Tag::removal("Relev")]);
}
