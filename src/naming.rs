use log::debug;

/// Separator between a base name and its numeric suffix.
pub const SUFFIX_SEPARATOR: char = '.';

/// Returns a name which is not contained in `existing_names`.
///
/// If `name` is free it is returned unchanged. Otherwise `name` gets a
/// `.NNN` suffix, where `NNN` is the smallest positive number not already
/// taken by a `"<name>.<digits>"` sibling, zero-padded to three digits.
/// Numbers above 999 simply widen the field.
///
/// `existing_names` can be anything iterable over strings: a slice, a
/// `HashSet`, or the keys of a `HashMap`.
///
/// ```
/// use selset::naming::uniquify;
///
/// assert_eq!(uniquify("hey", &["there"]), "hey");
/// assert_eq!(uniquify("hey", &["hey.001", "hey.005"]), "hey");
/// assert_eq!(uniquify("hey", &["hey", "hey.001", "hey.005"]), "hey.002");
/// assert_eq!(uniquify("hey", &["hey", "hey.005", "hey.001", "hey.left"]), "hey.002");
/// ```
pub fn uniquify<I, S>(name: &str, existing_names: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut taken = false;
    let mut numbers = vec![];

    for other in existing_names {
        let other = other.as_ref();

        if other == name {
            taken = true;
        } else if let Some(n) = sibling_number(name, other) {
            numbers.push(n);
        }
    }

    if !taken {
        return name.to_string();
    }

    numbers.sort_unstable();

    let mut candidate: u64 = 1;
    for n in numbers {
        if candidate < n {
            break;
        }
        candidate = n.saturating_add(1);
    }

    let unique = format!("{}{}{:03}", name, SUFFIX_SEPARATOR, candidate);
    debug!("[uniquify] {} -> {}", name, unique);
    unique
}

/// Splits `name` into its base name and numeric suffix.
///
/// ```
/// use selset::naming::split_suffix;
///
/// assert_eq!(split_suffix("arm.L.002"), ("arm.L", Some(2)));
/// assert_eq!(split_suffix("arm.L"), ("arm.L", None));
/// ```
pub fn split_suffix(name: &str) -> (&str, Option<u64>) {
    match name.rsplit_once(SUFFIX_SEPARATOR) {
        Some((base, suffix)) => match parse_suffix(suffix) {
            Some(n) => (base, Some(n)),
            None => (name, None),
        },
        None => (name, None),
    }
}

// "<base>.<digits>" -> digits
fn sibling_number(base: &str, other: &str) -> Option<u64> {
    other
        .strip_prefix(base)?
        .strip_prefix(SUFFIX_SEPARATOR)
        .and_then(parse_suffix)
}

fn parse_suffix(suffix: &str) -> Option<u64> {
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // Too large to ever be reached by a candidate.
    suffix.parse().ok()
}
