//! Significant line counting.

/// ASCII whitespace as the C locale defines it: space, `\t`, `\n`, `\v`,
/// `\f` and `\r`.
pub(crate) fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

/// Count non-blank lines.
///
/// Each `\n` counts one line and swallows any whitespace directly after it,
/// so runs of blank lines collapse into the line that precedes them. A final
/// line without a trailing `\n` counts too. Whitespace at the very start of
/// the buffer is not skipped.
pub fn sloc(data: &[u8]) -> usize {
    let Some(&last) = data.last() else {
        return 0;
    };

    let mut count = 0;
    let mut i = 0;
    while i < data.len() {
        let b = data[i];
        i += 1;
        if b == b'\n' {
            while i < data.len() && is_space(data[i]) {
                i += 1;
            }
            count += 1;
        }
    }

    if last != b'\n' {
        count += 1;
    }
    count
}
