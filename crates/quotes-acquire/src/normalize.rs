/// Characters stripped from both ends of an extracted string: Unicode
/// whitespace plus the ASCII file/group/record/unit separators.
fn is_strippable(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Clean one extracted string: trim surrounding whitespace, then delete
/// every `\n` left in the interior.
///
/// Interior spaces and tabs are kept. Trimming must come first so that a
/// trailing newline cannot shield whitespace in front of it.
pub fn clean_text(text: &str) -> String {
    text.trim_matches(is_strippable).replace('\n', "")
}
