//! Rebuild text from a sequence of tags.

use log::warn;

use super::tag::Tag;

/// Text rebuilt from tags, with a record of any damage seen along the way.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Replayed {
    pub text: String,
    /// Copy positions that pointed outside the text produced so far and were skipped.
    pub clamped: usize,
    /// The tag stream ended inside a tag.
    pub truncated: bool,
}

/// Replay tags against a growing output.
///
/// Each tag copies `run_length` characters starting `distance` back from the current end,
/// one character at a time so a run can repeat characters it has just produced. Source
/// positions outside the output are skipped and counted. The literal is appended unless
/// it is the sentinel.
pub fn replay(tags: &[Tag]) -> Replayed {
    let mut out: Vec<char> = Vec::new();
    let mut clamped = 0;

    for tag in tags {
        let start = out.len() as isize - tag.distance() as isize;
        for i in 0..tag.run_length() as isize {
            let idx = start + i;
            if idx >= 0 && (idx as usize) < out.len() {
                out.push(out[idx as usize]);
            } else {
                clamped += 1;
            }
        }
        if !tag.is_sentinel() {
            out.push(tag.literal());
        }
    }

    if clamped > 0 {
        warn!("Skipped {} copy positions outside the decoded text.", clamped);
    }
    Replayed {
        text: out.into_iter().collect(),
        clamped,
        truncated: false,
    }
}

/// Remove every trailing newline and carriage return.
pub fn strip_line_endings(text: &mut String) {
    let keep = text.trim_end_matches(|c: char| c == '\n' || c == '\r').len();
    text.truncate(keep);
}
