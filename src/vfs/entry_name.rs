/// the longest file name most host filesystems allow, in bytes
pub const MAX_NAME_LEN: usize = 255;

/// builds the name a file is listed under inside a tag directory: its base name with the file id
/// inserted before the extension, so `report.pdf` with id 42 becomes `report.42.pdf`.
///
/// Names longer than [`MAX_NAME_LEN`] have the part before the id shortened. The `.<id><extension>`
/// suffix is always kept whole since [`decode_entry_name`] needs it
pub fn encode_entry_name(id: u32, path: &str) -> String {
    let base = path.rsplit('/').find(|it| !it.is_empty()).unwrap_or("");
    let extension = match base.rfind('.') {
        Some(index) => &base[index..],
        None => "",
    };
    let stem = &base[..base.len() - extension.len()];
    let suffix = format!(".{id}{extension}");
    let stem = truncate(stem, MAX_NAME_LEN.saturating_sub(suffix.len()));
    format!("{stem}{suffix}")
}

/// pulls the file id back out of a name built by [`encode_entry_name`].
///
/// A name with a single `.` belongs to a file without an extension, so the id is the last part.
/// Otherwise the id is the second to last part, since the stem of an extensionless file never
/// contains a `.`. `None` means the name isn't a file entry, and should be treated as a tag name instead
pub fn decode_entry_name(name: &str) -> Option<u32> {
    let parts: Vec<&str> = name.split('.').collect();
    match parts.len() {
        0 | 1 => None,
        2 => parse_id(parts[1]),
        len => parse_id(parts[len - 2]),
    }
}

/// ids start at 1, so 0 is never a file
fn parse_id(part: &str) -> Option<u32> {
    if part.is_empty() || !part.bytes().all(|it| it.is_ascii_digit()) {
        return None;
    }
    part.parse::<u32>().ok().filter(|id| *id != 0)
}

/// shortens `value` to at most `max_len` bytes without splitting a character
fn truncate(value: &str, max_len: usize) -> &str {
    if value.len() <= max_len {
        return value;
    }
    let mut end = max_len;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}
