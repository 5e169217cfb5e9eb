//! Numeral-word decoder.
//!
//! Numeral literals are spelled with formal kanji glyphs: digits
//! (`零壱弐参肆伍陸漆捌玖`), small units (`拾佰仟` for ×10/×100/×1000,
//! applied to the digit just before them, or to an implicit one), and
//! large group glyphs (`萬億兆` for ×10⁴/×10⁸/×10¹², each closing the
//! running section into the grand total).

use std::collections::HashMap;

use lazy_static::lazy_static;

lazy_static! {
    static ref DIGIT_LOOKUP: HashMap<char, f64> = {
        let mut map = HashMap::new();
        map.insert('零', 0.0);
        map.insert('壱', 1.0);
        map.insert('弐', 2.0);
        map.insert('参', 3.0);
        map.insert('肆', 4.0);
        map.insert('伍', 5.0);
        map.insert('陸', 6.0);
        map.insert('漆', 7.0);
        map.insert('捌', 8.0);
        map.insert('玖', 9.0);
        map
    };
    static ref UNIT_LOOKUP: HashMap<char, f64> = {
        let mut map = HashMap::new();
        map.insert('拾', 10.0);
        map.insert('佰', 100.0);
        map.insert('仟', 1000.0);
        map
    };
    static ref GROUP_LOOKUP: HashMap<char, f64> = {
        let mut map = HashMap::new();
        map.insert('萬', 1e4);
        map.insert('億', 1e8);
        map.insert('兆', 1e12);
        map
    };
}

/// Decodes a numeral word into its value. Returns `None` when the word
/// contains a glyph outside the three tables; the caller turns that into
/// an `InvalidNumeral` error.
pub fn decode_numeral(word: &str) -> Option<f64> {
    let mut group_value = 0.0;
    let mut section_value = 0.0;
    let mut pending_digit = 0.0;

    for glyph in word.chars() {
        if let Some(digit) = DIGIT_LOOKUP.get(&glyph) {
            pending_digit = *digit;
        } else if let Some(unit) = UNIT_LOOKUP.get(&glyph) {
            let digit = if pending_digit == 0.0 {
                1.0
            } else {
                pending_digit
            };
            section_value += digit * unit;
            pending_digit = 0.0;
        } else if let Some(group) = GROUP_LOOKUP.get(&glyph) {
            section_value += pending_digit;
            group_value += section_value * group;
            section_value = 0.0;
            pending_digit = 0.0;
        } else {
            return None;
        }
    }

    Some(group_value + section_value + pending_digit)
}
