/// Maximum length of a bus or interface name, per the D-Bus specification.
pub(super) const MAX_NAME_LEN: usize = 255;

/// Validate a dot-separated D-Bus name (shared by interface names and
/// well-known bus names): at least two elements, each element matching
/// `[A-Za-z_][A-Za-z0-9_-]*`, total length at most 255 bytes.
///
/// Well-known bus names additionally permit a leading digit in non-first
/// elements (the spec relaxed this historically); interface name elements
/// never do. `allow_leading_digit` selects which rule applies.
pub(super) const fn validate_dotted(bytes: &[u8], allow_leading_digit: bool) -> bool {
    if bytes.is_empty() || bytes.len() > MAX_NAME_LEN {
        return false;
    }

    let mut bytes = bytes;
    let mut elements = 0usize;
    let mut element_len = 0usize;
    let mut first_in_element = true;

    while let [b, rest @ ..] = bytes {
        match b {
            b'.' => {
                if element_len == 0 {
                    return false;
                }

                elements += 1;
                element_len = 0;
                first_in_element = true;
            }
            b'0'..=b'9' => {
                if first_in_element && !allow_leading_digit {
                    return false;
                }

                element_len += 1;
                first_in_element = false;
            }
            b'A'..=b'Z' | b'a'..=b'z' | b'_' | b'-' => {
                element_len += 1;
                first_in_element = false;
            }
            _ => return false,
        }

        bytes = rest;
    }

    if element_len == 0 {
        return false;
    }

    elements += 1;
    elements >= 2
}

/// Test whether a bus name is a unique (connection-private) name, i.e. it
/// begins with `:`.
pub(super) const fn is_unique_name(bytes: &[u8]) -> bool {
    matches!(bytes, [b':', ..])
}
