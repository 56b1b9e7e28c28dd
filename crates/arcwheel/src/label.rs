use derive_more::{AsRef, Deref, Display, From, Into};

/// Short text drawn on a segment's knob.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Display, Deref, From, Into, AsRef)]
pub struct Label(String);

crate::impl_string_newtype!(Label);

/// Derives a knob label from a display name.
///
/// Names with a space yield the first letter of the first word and the first letter of
/// the word after the first space, uppercased. Anything else yields its uppercased first
/// letter.
pub fn initials(name: &str) -> Label {
    let mut parts = name.splitn(2, ' ');
    let first = parts.next().and_then(|w| w.chars().next());
    let second = parts
        .next()
        .and_then(|w| w.chars().next())
        .filter(|c| !c.is_whitespace());

    Label(
        first
            .into_iter()
            .chain(second)
            .flat_map(char::to_uppercase)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initials() {
        let cases = vec![
            ("marina heights", "MH"),
            ("Oak Street Lofts", "OS"),
            ("villa", "V"),
            ("", ""),
            ("ümlaut ärea", "ÜÄ"),
            ("double  space", "D"),
            ("trailing ", "T"),
        ];

        for (name, expected) in cases {
            assert_eq!(initials(name).as_str(), expected, "name = {name:?}");
        }
    }
}
