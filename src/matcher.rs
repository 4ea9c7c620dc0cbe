//! Incremental patient matching.
//!
//! Plain case-insensitive substring containment over given names, family
//! names and the identity code. The result keeps index order; it is a stable
//! filter, not a ranking.

use crate::patient::PatientRecord;

/// Upper bound on the match list shown in the dropdown
pub const MAX_MATCHES: usize = 10;

/// Check a single record against an already-lowercased, non-empty needle.
pub fn record_matches(record: &PatientRecord, needle_lower: &str) -> bool {
    record.given_names.to_lowercase().contains(needle_lower)
        || record.family_names.to_lowercase().contains(needle_lower)
        || record
            .identity_code
            .as_deref()
            .is_some_and(|code| code.to_lowercase().contains(needle_lower))
}

/// Filter `index` by `query`, keeping index order, capped at [`MAX_MATCHES`].
///
/// An empty query yields nothing; the caller shows recent selections instead.
pub fn match_patients(query: &str, index: &[PatientRecord]) -> Vec<PatientRecord> {
    if query.is_empty() {
        return Vec::new();
    }

    let needle = query.to_lowercase();
    index
        .iter()
        .filter(|record| record_matches(record, &needle))
        .take(MAX_MATCHES)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn clinic() -> Vec<PatientRecord> {
        vec![
            PatientRecord::new("1", "Ana", "Lopez", Some("ALOP01")),
            PatientRecord::new("2", "Beto", "Cruz", None),
        ]
    }

    #[test]
    fn family_name_substring() {
        let ids: Vec<_> = match_patients("lo", &clinic()).into_iter().map(|p| p.id).collect();
        assert_eq!(ids, ["1"]);
    }

    #[test]
    fn case_insensitive_on_both_sides() {
        let ids: Vec<_> = match_patients("CRUZ", &clinic()).into_iter().map(|p| p.id).collect();
        assert_eq!(ids, ["2"]);
        let ids: Vec<_> = match_patients("alop", &clinic()).into_iter().map(|p| p.id).collect();
        assert_eq!(ids, ["1"]);
    }

    #[test]
    fn no_match_is_empty_not_error() {
        assert!(match_patients("zz", &clinic()).is_empty());
    }

    #[test]
    fn empty_query_yields_nothing() {
        assert!(match_patients("", &clinic()).is_empty());
        assert!(match_patients("", &[]).is_empty());
    }

    #[test]
    fn missing_identity_code_is_skipped() {
        // "cruz" lives only in a family name; the absent code must not trip the match
        let beto = PatientRecord::new("2", "Beto", "Cruz", None);
        assert!(record_matches(&beto, "cruz"));
        assert!(!record_matches(&beto, "alop"));
    }

    #[test]
    fn substring_not_prefix() {
        let ids: Vec<_> = match_patients("et", &clinic()).into_iter().map(|p| p.id).collect();
        assert_eq!(ids, ["2"]);
    }

    #[test]
    fn whitespace_is_part_of_the_query() {
        let index = vec![
            PatientRecord::new("1", "Ana María", "Lopez", None),
            PatientRecord::new("2", "Beto", "Cruz", None),
        ];
        let ids: Vec<_> = match_patients(" ", &index).into_iter().map(|p| p.id).collect();
        assert_eq!(ids, ["1"]);
    }

    #[test]
    fn capped_and_in_index_order() {
        let index: Vec<_> = (0..25)
            .map(|i| PatientRecord::new(i.to_string(), format!("Paciente{i}"), "Garcia", None))
            .collect();
        let matches = match_patients("garcia", &index);
        assert_eq!(matches.len(), MAX_MATCHES);
        let ids: Vec<_> = matches.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"]);
    }

    fn arb_index() -> impl Strategy<Value = Vec<PatientRecord>> {
        proptest::collection::vec(
            ("[a-cA-CñÑ ]{0,6}", "[a-cA-C]{0,6}", proptest::option::of("[A-C0-9]{0,6}")),
            0..30,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (given, family, code))| {
                    PatientRecord::new(i.to_string(), given, family, code.as_deref())
                })
                .collect()
        })
    }

    /// Straightforward reference: lowercase every field and look for the query.
    fn expected_ids(query: &str, index: &[PatientRecord]) -> Vec<String> {
        if query.is_empty() {
            return Vec::new();
        }
        let q = query.to_lowercase();
        let mut out = Vec::new();
        for record in index {
            let mut fields = vec![record.given_names.to_lowercase(), record.family_names.to_lowercase()];
            if let Some(code) = &record.identity_code {
                fields.push(code.to_lowercase());
            }
            if fields.iter().any(|f| f.contains(q.as_str())) {
                out.push(record.id.clone());
            }
            if out.len() == 10 {
                break;
            }
        }
        out
    }

    proptest! {
        #[test]
        fn agrees_with_reference_filter(query in "[a-cA-CñÑ0-9 ]{0,3}", index in arb_index()) {
            let got: Vec<String> = match_patients(&query, &index).into_iter().map(|p| p.id).collect();
            prop_assert!(got.len() <= MAX_MATCHES);
            prop_assert_eq!(got, expected_ids(&query, &index));
        }

        #[test]
        fn matches_keep_index_order(query in "[a-c]{1,2}", index in arb_index()) {
            let positions: Vec<usize> = match_patients(&query, &index)
                .iter()
                .map(|p| p.id.parse().unwrap_or(usize::MAX))
                .collect();
            prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }

        #[test]
        fn empty_query_never_matches(index in arb_index()) {
            prop_assert!(match_patients("", &index).is_empty());
        }
    }
}
