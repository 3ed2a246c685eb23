const HANGUL_SYLLABLE_BASE: u32 = 0xAC00;
const HANGUL_SYLLABLE_LAST: u32 = 0xD7A3;
const LEAD_BASE: u32 = 0x1100;
const VOWEL_BASE: u32 = 0x1161;
const TAIL_BASE: u32 = 0x11A7;
const VOWEL_COUNT: u32 = 21;
const TAIL_COUNT: u32 = 28;

pub const EOS: char = '~';
pub const WORD_SEP: char = ' ';

/// Character sequence a label turns into as synthesis-model input.
///
/// Precomposed Hangul syllables are decomposed into conjoining jamo; every other
/// character passes through. Words are separated by one `WORD_SEP` and the
/// sequence always ends with `EOS`.
pub fn text_to_sequence(text: &str) -> Vec<char> {
    let mut sequence = Vec::with_capacity(text.len() + 1);
    for (word_idx, word) in text.split_whitespace().enumerate() {
        if word_idx > 0 {
            sequence.push(WORD_SEP);
        }
        for c in word.chars() {
            push_decomposed(c, &mut sequence);
        }
    }
    sequence.push(EOS);
    sequence
}

pub fn sequence_length(text: &str) -> usize {
    text_to_sequence(text).len()
}

fn push_decomposed(c: char, out: &mut Vec<char>) {
    let code = c as u32;
    if !(HANGUL_SYLLABLE_BASE..=HANGUL_SYLLABLE_LAST).contains(&code) {
        out.push(c);
        return;
    }
    let offset = code - HANGUL_SYLLABLE_BASE;
    let lead = offset / (VOWEL_COUNT * TAIL_COUNT);
    let vowel = (offset % (VOWEL_COUNT * TAIL_COUNT)) / TAIL_COUNT;
    let tail = offset % TAIL_COUNT;

    out.extend(char::from_u32(LEAD_BASE + lead));
    out.extend(char::from_u32(VOWEL_BASE + vowel));
    if tail != 0 {
        out.extend(char::from_u32(TAIL_BASE + tail));
    }
}
