//! Role-based masking of sensitive fields.
//!
//! Masking is a presentation-time, lossy transformation applied to rows the
//! viewer was already permitted to fetch. It bounds what a field reveals to a
//! short suffix; it is not a substitute for row-level access control, which
//! the data store enforces separately.
//!
//! Every function here is total: absent or empty input degrades to a
//! placeholder, never an error, and masking already-masked output returns the
//! same string.

use super::role::Role;

/// Placeholder shown for absent values.
pub const EMPTY_PLACEHOLDER: &str = "\u{2014}";

fn prefix_chars(value: &str, n: usize) -> String {
    value.chars().take(n).collect()
}

fn suffix_chars(value: &str, n: usize) -> String {
    let total = value.chars().count();
    value.chars().skip(total.saturating_sub(n)).collect()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Mask a person's name for the given role.
///
/// Single-token names keep their first two characters; multi-token names keep
/// the first two characters of the first and last token, with middle tokens
/// dropped entirely.
///
/// # Examples
/// ```
/// use fleetgate::domain::{mask_name, Role};
///
/// assert_eq!(mask_name(Some("John Michael Smith"), Role::Inspector), "Jo*** Sm***");
/// assert_eq!(mask_name(Some("Cher"), Role::Inspector), "Ch***");
/// assert_eq!(mask_name(None, Role::Inspector), "\u{2014}");
/// ```
pub fn mask_name(name: Option<&str>, role: Role) -> String {
    let Some(name) = non_empty(name) else {
        return EMPTY_PLACEHOLDER.to_owned();
    };
    if role.is_unmasked() {
        return name.to_owned();
    }
    let mut tokens = name.split_whitespace();
    let Some(first) = tokens.next() else {
        return EMPTY_PLACEHOLDER.to_owned();
    };
    match tokens.last() {
        None => format!("{}***", prefix_chars(first, 2)),
        Some(last) => format!("{}*** {}***", prefix_chars(first, 2), prefix_chars(last, 2)),
    }
}

fn mask_with_prefix(value: Option<&str>, role: Role, mask_prefix: &str) -> String {
    let Some(value) = non_empty(value) else {
        return EMPTY_PLACEHOLDER.to_owned();
    };
    if role.is_unmasked() {
        return value.to_owned();
    }
    if value.chars().count() <= 4 {
        return "****".to_owned();
    }
    format!("{mask_prefix}{}", suffix_chars(value, 4))
}

/// Mask a plate number, revealing at most its last four characters.
pub fn mask_plate_number(plate: Option<&str>, role: Role) -> String {
    mask_with_prefix(plate, role, "***")
}

/// Mask a national id, revealing at most its last four characters.
pub fn mask_national_id(national_id: Option<&str>, role: Role) -> String {
    mask_with_prefix(national_id, role, "****")
}

/// Mask a generic identifier, revealing at most its last four characters.
pub fn mask_id(id: Option<&str>, role: Role) -> String {
    mask_with_prefix(id, role, "****-")
}

#[cfg(test)]
mod tests {
    //! Masking bound, idempotence, and identity properties.
    use super::*;
    use crate::domain::role::ALL_ROLES;
    use rstest::rstest;

    fn masked_roles() -> impl Iterator<Item = Role> {
        ALL_ROLES.into_iter().filter(|r| !r.is_unmasked())
    }

    #[rstest]
    #[case("John Michael Smith", "Jo*** Sm***")]
    #[case("Cher", "Ch***")]
    #[case("Ana Maria de la Cruz", "An*** Cr***")]
    #[case("  padded  name  ", "pa*** na***")]
    fn mask_name_shapes(#[case] input: &str, #[case] expected: &str) {
        for role in masked_roles() {
            assert_eq!(mask_name(Some(input), role), expected, "role {role}");
        }
    }

    #[test]
    fn absent_values_degrade_to_placeholder() {
        for role in ALL_ROLES {
            assert_eq!(mask_name(None, role), EMPTY_PLACEHOLDER);
            assert_eq!(mask_name(Some("   "), role), EMPTY_PLACEHOLDER);
            assert_eq!(mask_plate_number(None, role), EMPTY_PLACEHOLDER);
            assert_eq!(mask_national_id(Some(""), role), EMPTY_PLACEHOLDER);
            assert_eq!(mask_id(None, role), EMPTY_PLACEHOLDER);
        }
    }

    #[test]
    fn owner_sees_raw_values() {
        assert_eq!(mask_name(Some("John Smith"), Role::Owner), "John Smith");
        assert_eq!(
            mask_plate_number(Some("ABC1234"), Role::Owner),
            "ABC1234"
        );
        assert_eq!(
            mask_national_id(Some("1029384756"), Role::Owner),
            "1029384756"
        );
        assert_eq!(mask_id(Some("record-77"), Role::Owner), "record-77");
    }

    #[rstest]
    #[case("ABC1234", "***1234")]
    #[case("AB12", "****")]
    #[case("A", "****")]
    fn mask_plate_shapes(#[case] input: &str, #[case] expected: &str) {
        for role in masked_roles() {
            assert_eq!(mask_plate_number(Some(input), role), expected);
        }
    }

    #[rstest]
    #[case("1029384756", "****4756")]
    #[case("1234", "****")]
    fn mask_national_id_shapes(#[case] input: &str, #[case] expected: &str) {
        for role in masked_roles() {
            assert_eq!(mask_national_id(Some(input), role), expected);
        }
    }

    #[test]
    fn mask_id_uses_dashed_prefix() {
        for role in masked_roles() {
            assert_eq!(mask_id(Some("record-0077"), role), "****-0077");
        }
    }

    /// Masked output never contains any prefix of the raw value longer than
    /// four characters, and at most its last four characters survive.
    #[test]
    fn masking_reveals_at_most_a_bounded_suffix() {
        let samples = ["ABCDEFGH1234", "XY99 QRS 777", "0123456789abcdef"];
        for raw in samples {
            for role in masked_roles() {
                let masked = mask_plate_number(Some(raw), role);
                let suffix = suffix_chars(raw, 4);
                let prefix5 = prefix_chars(raw, 5);
                assert!(masked.ends_with(&suffix));
                assert!(!masked.contains(&prefix5), "masked {masked} leaks {prefix5}");
            }
        }
    }

    /// Masking already-masked output returns the same string.
    #[rstest]
    #[case("ABC1234")]
    #[case("AB12")]
    fn plate_masking_is_idempotent(#[case] raw: &str) {
        for role in masked_roles() {
            let once = mask_plate_number(Some(raw), role);
            let twice = mask_plate_number(Some(&once), role);
            assert_eq!(once, twice);
        }
    }

    #[rstest]
    #[case("John Michael Smith")]
    #[case("Cher")]
    fn name_masking_is_idempotent(#[case] raw: &str) {
        for role in masked_roles() {
            let once = mask_name(Some(raw), role);
            let twice = mask_name(Some(&once), role);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn id_and_national_id_masking_are_idempotent() {
        for role in masked_roles() {
            let id_once = mask_id(Some("record-0077"), role);
            assert_eq!(mask_id(Some(&id_once), role), id_once);
            let nid_once = mask_national_id(Some("1029384756"), role);
            assert_eq!(mask_national_id(Some(&nid_once), role), nid_once);
        }
    }

    #[test]
    fn non_ascii_names_do_not_panic() {
        for role in masked_roles() {
            let masked = mask_name(Some("Ægir Ólafsson"), role);
            assert_eq!(masked, "Æg*** Ól***");
        }
    }
}
