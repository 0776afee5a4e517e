//! Rendering a day of intervals as a one-line terminal bar.
//!
//! # Algorithm Summary
//!
//! 1. Break the day into 60 characters of 24 minutes each, and each character
//!    into 8 bits of 3 minutes each.
//! 2. A bit is on if most of its 3 minutes is covered by intervals.
//! 3. Once a character's 8 bits are known, pick the entry of [`BLOCK_MASKS`]
//!    that is bitwise closest to them.
//! 4. Each entry maps to a block-drawing glyph, possibly in inverted video
//!    (e.g. a partially-filled left box inverted to read as a partially-filled
//!    right box).
//!
//! Bars are read left to right, so within a character the high bit is the
//! earliest 3 minutes.

use std::sync::LazyLock;

use chrono::{DateTime, Duration, Utc};

use crate::interval::Interval;

/// Number of characters in a bar.
pub const BAR_WIDTH: usize = 60;

/// Number of bits each character is made of.
pub const BITS_PER_GLYPH: usize = 8;

/// The span of time represented by one bit.
const BIT_SPAN: Duration = Duration::minutes(3);

/// A bit is on when its covered time exceeds this.
const BIT_ON_THRESHOLD: Duration = Duration::seconds(90);

// Left-partial block drawing characters, seven eighths down to one eighth.
// The full block (U+2588) precedes them.
const FULL_BLOCK: char = '\u{2588}';
const LEFT_BLOCKS: [char; 7] = [
    '\u{2589}', '\u{258A}', '\u{258B}', '\u{258C}', '\u{258D}', '\u{258E}', '\u{258F}',
];
/// About 1/8 wide.
const LIGHT_VERTICAL_LINE: char = '\u{2502}';
/// About 3/8 wide.
const HEAVY_VERTICAL_LINE: char = '\u{2503}';

// SGR sequences: 7 = inverted, 33 = yellow foreground, 0 = reset.
const SGR_INVERTED: &str = "\x1b[7;33m";
const SGR_YELLOW: &str = "\x1b[33m";
const SGR_NORMAL: &str = "\x1b[0;33m";
const SGR_RESET: &str = "\x1b[m";

/// Coverage patterns a character can display, matched by Hamming distance.
pub const BLOCK_MASKS: [u8; 58] = [
    // [0-1] off, full
    0x00, 0xff,
    // [2-8] left boxes
    0xfe, 0xfc, 0xf8, 0xf0, 0xe0, 0xc0, 0x80,
    // [9-15] right boxes
    0x7f, 0x3f, 0x1f, 0x0f, 0x07, 0x03, 0x01,
    // [16-26] thin vertical line
    0x40, 0x20, 0x10, 0x08, 0x04, 0x02, 0x60, 0x30, 0x18, 0x0c, 0x06,
    // [27-37] inverted thin vertical line
    0xbf, 0xdf, 0xef, 0xf7, 0xfb, 0xfd, 0x9f, 0xcf, 0xe7, 0xf3, 0xf9,
    // [38-47] thick vertical line
    0x70, 0x78, 0x7c, 0x7e, 0x38, 0x3c, 0x3e, 0x1c, 0x1e, 0x0e,
    // [48-57] inverted thick vertical line
    0x8f, 0x87, 0x83, 0x81, 0xc7, 0xc3, 0xc1, 0xe3, 0xe1, 0xf1,
];

/// Best [`BLOCK_MASKS`] index for every possible mask.
static NEAREST_PATTERN: [u8; 256] = build_nearest_table();

/// Runs the linear first-minimum scan for every mask.
#[allow(clippy::cast_possible_truncation)]
const fn build_nearest_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut mask = 0;
    while mask < table.len() {
        let mut best = 0;
        let mut best_distance = u32::MAX;
        let mut i = 0;
        while i < BLOCK_MASKS.len() {
            let distance = (BLOCK_MASKS[i] ^ mask as u8).count_ones();
            if distance < best_distance {
                best = i;
                best_distance = distance;
            }
            i += 1;
        }
        table[mask] = best as u8;
        mask += 1;
    }
    table
}

/// Returns the index of the [`BLOCK_MASKS`] entry closest to `mask`.
///
/// Ties go to the earliest entry.
pub fn nearest_pattern(mask: u8) -> usize {
    usize::from(NEAREST_PATTERN[usize::from(mask)])
}

/// A character to draw and whether to draw it in inverted video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub inverted: bool,
}

impl Glyph {
    const fn normal(ch: char) -> Self {
        Self {
            ch,
            inverted: false,
        }
    }

    const fn inverted(ch: char) -> Self {
        Self { ch, inverted: true }
    }
}

/// Maps a [`BLOCK_MASKS`] index to its glyph.
///
/// An inverted glyph swaps foreground and background, so an inverted left
/// box reads as the complementary right box.
pub const fn glyph_for(pattern: usize) -> Glyph {
    match pattern {
        0 => Glyph::inverted(FULL_BLOCK),
        1 => Glyph::normal(FULL_BLOCK),
        2..=8 => Glyph::normal(LEFT_BLOCKS[pattern - 2]),
        9..=15 => Glyph::inverted(LEFT_BLOCKS[15 - pattern]),
        16..=26 => Glyph::normal(LIGHT_VERTICAL_LINE),
        27..=37 => Glyph::inverted(LIGHT_VERTICAL_LINE),
        38..=47 => Glyph::normal(HEAVY_VERTICAL_LINE),
        _ => Glyph::inverted(HEAVY_VERTICAL_LINE),
    }
}

/// Output buffer plus the terminal color state it has left behind.
struct BarState {
    buf: String,
    /// No glyph has been written yet.
    empty: bool,
    /// The terminal is currently in inverted video.
    inverted: bool,
}

impl BarState {
    fn new() -> Self {
        let mut buf = String::with_capacity(2 + BAR_WIDTH * 4 + 4 * SGR_INVERTED.len());
        buf.push('[');
        Self {
            buf,
            empty: true,
            inverted: false,
        }
    }

    fn write_inverted(&mut self, ch: char) {
        if self.empty || !self.inverted {
            self.buf.push_str(SGR_INVERTED);
            self.empty = false;
            self.inverted = true;
        }
        self.buf.push(ch);
    }

    fn write_normal(&mut self, ch: char) {
        if self.empty {
            // Colors are already normal.
            self.buf.push_str(SGR_YELLOW);
            self.empty = false;
        } else if self.inverted {
            self.buf.push_str(SGR_NORMAL);
            self.inverted = false;
        }
        self.buf.push(ch);
    }

    fn put(&mut self, glyph: Glyph) {
        if glyph.inverted {
            self.write_inverted(glyph.ch);
        } else {
            self.write_normal(glyph.ch);
        }
    }

    fn finish(mut self) -> String {
        self.buf.push_str(SGR_RESET);
        self.buf.push(']');
        self.buf
    }
}

/// The bar for a day with no intervals.
pub static EMPTY_BAR: LazyLock<String> = LazyLock::new(|| {
    let mut bar = BarState::new();
    for _ in 0..BAR_WIDTH {
        bar.put(glyph_for(0));
    }
    bar.finish()
});

/// Renders the 24 hours starting at `morning` as a bar.
///
/// `intervals` must be sorted and non-overlapping. This is not checked:
/// intervals outside the day never cover a bit, and overlapping intervals
/// count their shared time twice.
pub fn render_bar(morning: DateTime<Utc>, intervals: &[Interval]) -> String {
    if intervals.is_empty() {
        return EMPTY_BAR.clone();
    }

    let mut bar = BarState::new();
    let mut cursor = 0;
    let mut mask: u8 = 0;
    let mut bit_end = morning;

    for bit in 0..BAR_WIDTH * BITS_PER_GLYPH {
        let bit_start = bit_end;
        bit_end = bit_start + BIT_SPAN;

        let mut covered = Duration::zero();
        while let Some(interval) = intervals.get(cursor) {
            if bit_end < interval.start {
                break;
            }
            if bit_start <= interval.end {
                covered += bit_end.min(interval.end) - bit_start.max(interval.start);
            }
            if bit_end <= interval.end {
                // Also overlaps the next bit.
                break;
            }
            cursor += 1;
        }

        if covered > BIT_ON_THRESHOLD {
            mask |= 1 << (BITS_PER_GLYPH - 1 - bit % BITS_PER_GLYPH);
        }
        if bit % BITS_PER_GLYPH == BITS_PER_GLYPH - 1 {
            bar.put(glyph_for(nearest_pattern(mask)));
            mask = 0;
        }
    }

    tracing::trace!(intervals = intervals.len(), %morning, "rendered bar");
    bar.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn nine_am() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2017, 7, 1, 9, 0, 0).unwrap()
    }

    fn minutes_after(morning: DateTime<Utc>, start: i64, end: i64) -> Interval {
        Interval {
            start: morning + Duration::minutes(start),
            end: morning + Duration::minutes(end),
            label: String::new(),
        }
    }

    fn blocks(n: usize) -> String {
        FULL_BLOCK.to_string().repeat(n)
    }

    fn hamming(a: u8, b: u8) -> u32 {
        (a ^ b).count_ones()
    }

    #[test]
    fn empty_bar_is_all_inverted_blocks() {
        let expected = format!("[{SGR_INVERTED}{}{SGR_RESET}]", blocks(BAR_WIDTH));
        assert_eq!(*EMPTY_BAR, expected);
        assert_eq!(render_bar(nine_am(), &[]), expected);
    }

    #[test]
    fn sweep_over_untouched_day_matches_empty_bar() {
        // Entirely before the day, so no bit is covered.
        let morning = nine_am();
        let interval = minutes_after(morning, -120, -60);
        assert_eq!(render_bar(morning, &[interval]), *EMPTY_BAR);
    }

    #[test]
    fn interval_within_one_character() {
        let morning = nine_am();
        let bar = render_bar(morning, &[minutes_after(morning, 4, 20)]);
        assert_eq!(
            bar,
            format!(
                "[{SGR_YELLOW}{HEAVY_VERTICAL_LINE}{SGR_INVERTED}{}{SGR_RESET}]",
                blocks(59)
            )
        );
    }

    #[test]
    fn several_intervals_switch_colors_only_on_transitions() {
        let morning = nine_am();
        let bar = render_bar(
            morning,
            &[
                minutes_after(morning, 4, 20),
                minutes_after(morning, 60, 240),
                minutes_after(morning, 270, 306),
            ],
        );

        let expected = format!(
            "[{SGR_YELLOW}\u{2503}{SGR_INVERTED}\u{2588}\u{258C}{SGR_NORMAL}{}\
             {SGR_INVERTED}\u{2588}\u{258E}{SGR_NORMAL}\u{258A}{SGR_INVERTED}{}{SGR_RESET}]",
            blocks(7),
            blocks(47),
        );
        assert_eq!(bar, expected);
    }

    #[test]
    fn full_day_is_all_normal_blocks() {
        let morning = nine_am();
        let bar = render_bar(morning, &[minutes_after(morning, 0, 24 * 60)]);
        assert_eq!(bar, format!("[{SGR_YELLOW}{}{SGR_RESET}]", blocks(BAR_WIDTH)));
    }

    #[test]
    fn bit_needs_more_than_half_coverage() {
        let morning = nine_am();
        // Exactly 90 seconds of the first bit: not enough.
        let half = Interval {
            start: morning + Duration::seconds(90),
            end: morning + Duration::seconds(180),
            label: String::new(),
        };
        assert_eq!(render_bar(morning, &[half]), *EMPTY_BAR);

        // 91 seconds sets the high bit, which is nearest to 0x80 first.
        let more = Interval {
            start: morning + Duration::seconds(89),
            end: morning + Duration::seconds(180),
            label: String::new(),
        };
        let bar = render_bar(morning, &[more]);
        assert!(bar.starts_with(&format!("[{SGR_YELLOW}\u{258F}{SGR_INVERTED}")));
    }

    #[test]
    fn rendering_is_deterministic() {
        let morning = nine_am();
        let intervals = vec![
            minutes_after(morning, 13, 95),
            minutes_after(morning, 400, 401),
            minutes_after(morning, 700, 1000),
        ];
        assert_eq!(render_bar(morning, &intervals), render_bar(morning, &intervals));
    }

    #[test]
    fn bar_has_sixty_glyphs() {
        let morning = nine_am();
        let bar = render_bar(
            morning,
            &[minutes_after(morning, 13, 95), minutes_after(morning, 700, 1000)],
        );
        let glyphs = bar
            .chars()
            .filter(|ch| matches!(ch, '\u{2502}' | '\u{2503}' | '\u{2588}'..='\u{258F}'))
            .count();
        assert_eq!(glyphs, BAR_WIDTH);
    }

    #[test]
    fn lookup_table_matches_linear_scan() {
        for mask in 0..=u8::MAX {
            let mut best = 0;
            for (i, &pattern) in BLOCK_MASKS.iter().enumerate() {
                if hamming(pattern, mask) < hamming(BLOCK_MASKS[best], mask) {
                    best = i;
                }
            }
            assert_eq!(nearest_pattern(mask), best, "mask {mask:#010b}");
        }
    }

    #[test]
    fn trivial_masks_take_the_trivial_patterns() {
        assert_eq!(nearest_pattern(0x00), 0);
        assert_eq!(nearest_pattern(0xff), 1);
    }

    #[test]
    fn ties_go_to_the_first_pattern() {
        // 0xe0 (index 6) and 0x80 (index 8) are both one bit away.
        assert_eq!(nearest_pattern(0b1010_0000), 6);
    }

    #[test]
    fn every_table_entry_matches_itself() {
        for (i, &pattern) in BLOCK_MASKS.iter().enumerate() {
            assert_eq!(nearest_pattern(pattern), i);
        }
    }

    #[test]
    fn glyph_mapping_by_range() {
        assert_eq!(glyph_for(0), Glyph::inverted('\u{2588}'));
        assert_eq!(glyph_for(1), Glyph::normal('\u{2588}'));
        assert_eq!(glyph_for(2), Glyph::normal('\u{2589}'));
        assert_eq!(glyph_for(8), Glyph::normal('\u{258F}'));
        assert_eq!(glyph_for(9), Glyph::inverted('\u{258F}'));
        assert_eq!(glyph_for(15), Glyph::inverted('\u{2589}'));
        assert_eq!(glyph_for(16), Glyph::normal('\u{2502}'));
        assert_eq!(glyph_for(37), Glyph::inverted('\u{2502}'));
        assert_eq!(glyph_for(38), Glyph::normal('\u{2503}'));
        assert_eq!(glyph_for(57), Glyph::inverted('\u{2503}'));
    }
}
