//! Edit distance for property name suggestions

/// Levenshtein distance between `a` and `b`, or `None` once it is known to
/// exceed `limit`.
pub fn bounded_levenshtein(a: &str, b: &str, limit: usize) -> Option<usize> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.len().abs_diff(b.len()) > limit {
        return None;
    }
    if a.is_empty() || b.is_empty() {
        return Some(a.len().max(b.len()));
    }

    let mut prev_row: Vec<usize> = (0..=b.len()).collect();
    let mut curr_row = vec![0; b.len() + 1];

    for (i, a_char) in a.iter().enumerate() {
        curr_row[0] = i + 1;
        let mut row_min = curr_row[0];
        for (j, b_char) in b.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            curr_row[j + 1] = (prev_row[j + 1] + 1)
                .min(curr_row[j] + 1)
                .min(prev_row[j] + cost);
            row_min = row_min.min(curr_row[j + 1]);
        }
        // Every later row is at least this row's minimum
        if row_min > limit {
            return None;
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    Some(prev_row[b.len()]).filter(|&d| d <= limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_and_empty() {
        assert_eq!(bounded_levenshtein("width", "width", 2), Some(0));
        assert_eq!(bounded_levenshtein("", "ab", 2), Some(2));
        assert_eq!(bounded_levenshtein("", "abc", 2), None);
    }

    #[test]
    fn test_edits() {
        assert_eq!(bounded_levenshtein("wdth", "width", 2), Some(1));
        assert_eq!(bounded_levenshtein("colr", "color", 2), Some(1));
        assert_eq!(bounded_levenshtein("hieght", "height", 2), Some(2));
        assert_eq!(bounded_levenshtein("kitten", "sitting", 3), Some(3));
    }

    #[test]
    fn test_limit() {
        assert_eq!(bounded_levenshtein("kitten", "sitting", 2), None);
        assert_eq!(bounded_levenshtein("a", "abcdef", 2), None);
        assert_eq!(bounded_levenshtein("margin", "padding", 2), None);
    }
}
